//! Object listings and regex filtering

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::traits::ObjectInfo;

/// Objects returned by a single listing call, in backend order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectListing {
    pub items: Vec<ObjectInfo>,

    /// The backend reported more results than this page holds
    pub truncated: bool,
}

impl ObjectListing {
    pub fn new(items: Vec<ObjectInfo>, truncated: bool) -> Self {
        Self { items, truncated }
    }

    /// Build an untruncated listing from bare keys
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            items: keys.into_iter().map(ObjectInfo::key_only).collect(),
            truncated: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.key.as_str()).collect()
    }

    /// Keep only the objects whose key matches `pattern`, preserving order
    pub fn filter(&self, pattern: &FilterPattern) -> ObjectListing {
        ObjectListing {
            items: self
                .items
                .iter()
                .filter(|i| pattern.is_match(&i.key))
                .cloned()
                .collect(),
            truncated: self.truncated,
        }
    }
}

/// A compiled, unanchored key filter
#[derive(Debug, Clone)]
pub struct FilterPattern {
    regex: Regex,
}

impl FilterPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// True when the pattern occurs anywhere in `key`
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> ObjectListing {
        ObjectListing::from_keys(["x-wing/a.txt", "x-wing/b.log", "x-wing/c.txt"])
    }

    #[test]
    fn test_filter_keeps_matching_keys_in_order() {
        let pattern = FilterPattern::new(r"\.txt$").unwrap();
        let filtered = sample().filter(&pattern);
        assert_eq!(filtered.keys(), vec!["x-wing/a.txt", "x-wing/c.txt"]);
    }

    #[test]
    fn test_filter_is_unanchored() {
        let pattern = FilterPattern::new("b").unwrap();
        assert_eq!(sample().filter(&pattern).keys(), vec!["x-wing/b.log"]);

        let pattern = FilterPattern::new("wing").unwrap();
        assert_eq!(sample().filter(&pattern).len(), 3);
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let pattern = FilterPattern::new(r"\.csv$").unwrap();
        assert!(sample().filter(&pattern).is_empty());
    }

    #[test]
    fn test_filter_preserves_backend_order() {
        let listing = ObjectListing::from_keys(["x-wing/z.txt", "x-wing/a.txt", "x-wing/m.txt"]);
        let pattern = FilterPattern::new("txt").unwrap();
        assert_eq!(
            listing.filter(&pattern).keys(),
            vec!["x-wing/z.txt", "x-wing/a.txt", "x-wing/m.txt"]
        );
    }

    #[test]
    fn test_filter_keeps_truncated_flag() {
        let mut listing = sample();
        listing.truncated = true;
        let pattern = FilterPattern::new("a").unwrap();
        assert!(listing.filter(&pattern).truncated);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FilterPattern::new("[unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }
}
