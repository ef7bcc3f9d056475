//! list command - List objects under the prefix
//!
//! Reads a single listing page. An empty listing prints a message instead of
//! an empty list.

use std::fmt;

use bm_core::{BucketManager, ObjectInfo, ObjectListing, ObjectStore, Settings};
use clap::Args;
use serde::Serialize;

use super::report_error;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List objects under the prefix
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show modification time and size for each object
    #[arg(short, long)]
    pub long: bool,
}

/// Listing output shared by `list` and `filter`
#[derive(Debug, Serialize)]
pub(super) struct ListingOutput<'a> {
    bucket: &'a str,
    prefix: &'a str,
    #[serde(skip_serializing_if = "no_items")]
    items: &'a [ObjectInfo],
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip)]
    long: bool,
    /// Objects read from the backend before any filtering
    #[serde(skip)]
    listed: usize,
}

fn no_items(items: &&[ObjectInfo]) -> bool {
    items.is_empty()
}

impl<'a> ListingOutput<'a> {
    /// `empty_message` is shown in place of the keys when the listing is empty
    pub(super) fn new(
        settings: &'a Settings,
        listing: &'a ObjectListing,
        empty_message: String,
        long: bool,
    ) -> Self {
        Self {
            bucket: &settings.bucket,
            prefix: &settings.prefix,
            items: &listing.items,
            truncated: listing.truncated,
            message: listing.is_empty().then_some(empty_message),
            long,
            listed: listing.len(),
        }
    }

    /// Record how many objects were read when `items` is a filtered subset
    pub(super) fn with_listed(mut self, listed: usize) -> Self {
        self.listed = listed;
        self
    }
}

/// Warning shown when a listing stopped after the first page
pub(super) fn truncation_warning(listed: usize) -> String {
    format!("Listing truncated: only the first {listed} objects were read")
}

impl fmt::Display for ListingOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            return write!(f, "{message}");
        }

        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if self.long {
                let date = item
                    .last_modified
                    .map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| " ".repeat(19));
                let size = item.size_human.as_deref().unwrap_or("-");
                write!(f, "[{date}] {size:>10} {}", item.key)?;
            } else {
                write!(f, "{}", item.key)?;
            }
        }
        Ok(())
    }
}

/// Print a listing and warn when the backend had more pages
pub(super) fn print_listing(formatter: &Formatter, output: &ListingOutput<'_>) {
    formatter.output(output);
    if output.truncated {
        formatter.warning(&truncation_warning(output.listed));
    }
}

/// Execute the list command
pub async fn execute<S: ObjectStore>(
    args: ListArgs,
    manager: &BucketManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    let settings = manager.settings();

    match manager.list().await {
        Ok(listing) => {
            let empty = format!("No files found under {}/{}", settings.bucket, settings.prefix);
            print_listing(
                formatter,
                &ListingOutput::new(settings, &listing, empty, args.long),
            );
            ExitCode::Success
        }
        Err(e) => report_error(formatter, "Failed to list objects", &e),
    }
}
