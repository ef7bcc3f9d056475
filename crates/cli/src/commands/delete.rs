//! delete command - Delete objects whose key matches a regex
//!
//! Each matching key gets its own delete request, in listing order. A failed
//! key is reported and the remaining keys are still attempted. There is no
//! confirmation step and deletions cannot be undone.

use bm_core::{BucketManager, Error, FilterPattern, ObjectStore};
use clap::Args;
use serde::Serialize;

use super::list::truncation_warning;
use super::report_error;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, ProgressBar};

/// Delete objects whose key matches a regular expression
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Regular expression, matched anywhere in the key
    pub pattern: String,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    status: &'static str,
    deleted: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<FailedKey>,
    total: usize,
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct FailedKey {
    key: String,
    error: String,
}

impl DeleteOutput {
    fn nothing(message: String, truncated: bool) -> Self {
        Self {
            status: "success",
            deleted: Vec::new(),
            failed: Vec::new(),
            total: 0,
            truncated,
            message: Some(message),
        }
    }
}

/// Human-readable line reported after each delete attempt
fn delete_result_line(key: &str, err: Option<&Error>) -> String {
    match err {
        None => format!("Deleted: {key}"),
        Some(e) => format!("Failed to delete {key}: {e}"),
    }
}

/// Execute the delete command
pub async fn execute<S: ObjectStore>(
    args: DeleteArgs,
    manager: &BucketManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    let pattern = match FilterPattern::new(&args.pattern) {
        Ok(p) => p,
        Err(e) => return report_error(formatter, "Cannot delete", &e),
    };

    let plan = match manager.plan_delete(&pattern).await {
        Ok(plan) => plan,
        Err(e) => return report_error(formatter, "Failed to list objects", &e),
    };

    let settings = manager.settings();
    let truncated = plan.truncated();
    if truncated {
        formatter.warning(&truncation_warning(plan.listed));
    }

    if plan.listing_was_empty() || plan.matched.is_empty() {
        let message = if plan.listing_was_empty() {
            format!("Nothing to delete under {}/{}", settings.bucket, settings.prefix)
        } else {
            format!("No files matching '{}' to delete", pattern.as_str())
        };
        if formatter.is_json() {
            formatter.json(&DeleteOutput::nothing(message, truncated));
        } else {
            formatter.println(&message);
        }
        return ExitCode::Success;
    }

    let progress = ProgressBar::counter(formatter.config(), plan.matched.len() as u64, "Deleting");
    let report = manager
        .execute_delete(&plan, |key, err| {
            progress.suspend(|| match err {
                None if formatter.is_json() => {}
                None => formatter.println(&delete_result_line(key, None)),
                Some(_) => formatter.error(&delete_result_line(key, err)),
            });
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    if formatter.is_json() {
        let output = DeleteOutput {
            status: if report.is_success() { "success" } else { "partial" },
            total: report.deleted.len(),
            failed: report
                .failed
                .iter()
                .map(|(key, e)| FailedKey {
                    key: key.clone(),
                    error: e.to_string(),
                })
                .collect(),
            deleted: report.deleted,
            truncated,
            message: None,
        };
        formatter.json(&output);
        return if output.failed.is_empty() {
            ExitCode::Success
        } else {
            ExitCode::GeneralError
        };
    }

    if report.is_success() {
        formatter.success(&format!("Deleted {} object(s).", report.deleted.len()));
        ExitCode::Success
    } else {
        formatter.error(&format!(
            "Failed to delete {} of {} object(s).",
            report.failed.len(),
            report.attempted()
        ));
        ExitCode::GeneralError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputConfig;
    use bm_core::{MockObjectStore, ObjectInfo, ObjectListing, Settings};

    fn quiet() -> Formatter {
        Formatter::new(OutputConfig {
            quiet: true,
            no_progress: true,
            ..Default::default()
        })
    }

    fn args(pattern: &str) -> DeleteArgs {
        DeleteArgs {
            pattern: pattern.to_string(),
        }
    }

    fn listing_store(keys: &'static [&'static str]) -> MockObjectStore {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .returning(move |_, _| Ok(ObjectListing::from_keys(keys.iter().copied())));
        store
    }

    #[tokio::test]
    async fn test_empty_listing_deletes_nothing() {
        let mut store = listing_store(&[]);
        store.expect_delete_object().never();
        let manager = BucketManager::new(store, Settings::default());

        assert_eq!(execute(args(".*"), &manager, &quiet()).await, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_no_match_deletes_nothing() {
        let mut store = listing_store(&["x-wing/a.txt"]);
        store.expect_delete_object().never();
        let manager = BucketManager::new(store, Settings::default());

        assert_eq!(execute(args("log$"), &manager, &quiet()).await, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_deletes_each_match() {
        let mut store = listing_store(&["x-wing/a.txt", "x-wing/b.log", "x-wing/c.txt"]);
        store
            .expect_delete_object()
            .withf(|_, key| key.ends_with(".txt"))
            .times(2)
            .returning(|_, _| Ok(()));
        let manager = BucketManager::new(store, Settings::default());

        assert_eq!(execute(args(r"\.txt$"), &manager, &quiet()).await, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_partial_failure_is_general_error() {
        let mut store = listing_store(&["x-wing/a.txt", "x-wing/c.txt"]);
        store
            .expect_delete_object()
            .withf(|_, key| key == "x-wing/a.txt")
            .times(1)
            .returning(|_, _| Err(Error::Auth("AccessDenied".into())));
        store
            .expect_delete_object()
            .withf(|_, key| key == "x-wing/c.txt")
            .times(1)
            .returning(|_, _| Ok(()));
        let manager = BucketManager::new(store, Settings::default());

        assert_eq!(
            execute(args("txt"), &manager, &quiet()).await,
            ExitCode::GeneralError
        );
    }

    #[tokio::test]
    async fn test_invalid_pattern_skips_listing() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().never();
        store.expect_delete_object().never();
        let manager = BucketManager::new(store, Settings::default());

        assert_eq!(execute(args("[z-a]"), &manager, &quiet()).await, ExitCode::UsageError);
    }

    #[tokio::test]
    async fn test_truncated_listing_deletes_first_page_matches() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().times(1).returning(|_, _| {
            Ok(ObjectListing::new(
                vec![
                    ObjectInfo::key_only("x-wing/a.txt"),
                    ObjectInfo::key_only("x-wing/b.log"),
                ],
                true,
            ))
        });
        store
            .expect_delete_object()
            .withf(|_, key| key == "x-wing/a.txt")
            .times(1)
            .returning(|_, _| Ok(()));
        let manager = BucketManager::new(store, Settings::default());

        assert_eq!(execute(args(r"\.txt$"), &manager, &quiet()).await, ExitCode::Success);
    }

    #[test]
    fn test_delete_result_lines_name_the_key() {
        assert_eq!(
            delete_result_line("x-wing/a.txt", None),
            "Deleted: x-wing/a.txt"
        );

        let err = Error::Auth("AccessDenied".into());
        assert_eq!(
            delete_result_line("x-wing/c.txt", Some(&err)),
            "Failed to delete x-wing/c.txt: Authentication failed: AccessDenied"
        );
    }

    #[test]
    fn test_json_nothing_shape() {
        let output = DeleteOutput::nothing("Nothing to delete".into(), false);
        let json = serde_json::to_value(output).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "deleted": [],
                "total": 0,
                "truncated": false,
                "message": "Nothing to delete"
            })
        );
    }

    #[test]
    fn test_json_reports_truncation() {
        let output = DeleteOutput::nothing("No files matching 'csv' to delete".into(), true);
        let json = serde_json::to_value(output).unwrap();
        assert_eq!(json["truncated"], true);
    }
}
