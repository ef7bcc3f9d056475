//! filter command - List objects whose key matches a regex

use bm_core::{BucketManager, FilterPattern, ObjectStore};
use clap::Args;

use super::list::{print_listing, ListingOutput};
use super::report_error;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List objects whose key matches a regular expression
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Regular expression, matched anywhere in the key
    pub pattern: String,

    /// Show modification time and size for each object
    #[arg(short, long)]
    pub long: bool,
}

/// Execute the filter command
pub async fn execute<S: ObjectStore>(
    args: FilterArgs,
    manager: &BucketManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    let pattern = match FilterPattern::new(&args.pattern) {
        Ok(p) => p,
        Err(e) => return report_error(formatter, "Cannot filter", &e),
    };

    match manager.filter(&pattern).await {
        Ok(selection) => {
            let empty = format!("No files matching '{}'", pattern.as_str());
            let output =
                ListingOutput::new(manager.settings(), &selection.matched, empty, args.long)
                    .with_listed(selection.listed);
            print_listing(formatter, &output);
            ExitCode::Success
        }
        Err(e) => report_error(formatter, "Failed to list objects", &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputConfig;
    use bm_core::{MockObjectStore, ObjectListing, Settings};

    fn quiet() -> Formatter {
        Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        })
    }

    fn args(pattern: &str) -> FilterArgs {
        FilterArgs {
            pattern: pattern.to_string(),
            long: false,
        }
    }

    #[tokio::test]
    async fn test_invalid_pattern_skips_listing() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().never();
        let manager = BucketManager::new(store, Settings::default());

        let code = execute(args("(unclosed"), &manager, &quiet()).await;
        assert_eq!(code, ExitCode::UsageError);
    }

    #[tokio::test]
    async fn test_filter_success() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().times(1).returning(|_, _| {
            Ok(ObjectListing::from_keys([
                "x-wing/a.txt",
                "x-wing/b.log",
                "x-wing/c.txt",
            ]))
        });
        let manager = BucketManager::new(store, Settings::default());

        let code = execute(args(r"\.txt$"), &manager, &quiet()).await;
        assert_eq!(code, ExitCode::Success);
    }

    #[test]
    fn test_no_match_message() {
        let settings = Settings::default();
        let matched = ObjectListing::default();
        let output = ListingOutput::new(&settings, &matched, "No files matching 'zzz'".into(), false);
        assert_eq!(output.to_string(), "No files matching 'zzz'");
    }
}
