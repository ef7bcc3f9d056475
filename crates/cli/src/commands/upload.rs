//! upload command - Upload a local file under the prefix
//!
//! The object is written to `prefix + remote_name` and replaces any object
//! already stored at that key.

use std::fmt;
use std::path::PathBuf;

use bm_core::{BucketManager, Error, ObjectStore, UploadReceipt};
use clap::builder::NonEmptyStringValueParser;
use clap::Args;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Upload a local file
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Local file to upload
    pub local_path: PathBuf,

    /// Object name, stored under the configured prefix
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub remote_name: String,

    /// Content type (guessed from the file extension when omitted)
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadOutput {
    status: &'static str,
    source: String,
    bucket: String,
    key: String,
    size_bytes: u64,
    size_human: String,
}

impl UploadOutput {
    fn new(source: &std::path::Path, bucket: &str, receipt: UploadReceipt) -> Self {
        Self {
            status: "success",
            source: source.display().to_string(),
            bucket: bucket.to_string(),
            key: receipt.key,
            size_bytes: receipt.size_bytes,
            size_human: humansize::format_size(receipt.size_bytes, humansize::BINARY),
        }
    }
}

impl fmt::Display for UploadOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Uploaded {} -> {}/{} ({})",
            self.source, self.bucket, self.key, self.size_human
        )
    }
}

/// Execute the upload command
pub async fn execute<S: ObjectStore>(
    args: UploadArgs,
    manager: &BucketManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    let content_type = args.content_type.clone().or_else(|| {
        mime_guess::from_path(&args.local_path)
            .first()
            .map(|m| m.essence_str().to_string())
    });

    match manager
        .upload(&args.local_path, &args.remote_name, content_type)
        .await
    {
        Ok(receipt) => {
            formatter.output(&UploadOutput::new(
                &args.local_path,
                &manager.settings().bucket,
                receipt,
            ));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&upload_error_message(&args.local_path, &e));
            ExitCode::from_error(&e)
        }
    }
}

/// User-facing message for each upload failure class
fn upload_error_message(local_path: &std::path::Path, err: &Error) -> String {
    match err {
        Error::LocalFileNotFound(path) => format!("File not found: {}", path.display()),
        Error::PermissionDenied(path) => {
            format!("Permission denied: cannot read {}", path.display())
        }
        other => format!("Failed to upload {}: {other}", local_path.display()),
    }
}
