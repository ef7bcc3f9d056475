//! CLI command definitions and execution
//!
//! Parsing is done by clap: an unknown command or a wrong number of
//! positional arguments exits with usage help before any command runs.
//! The storage client is then created once and handed to the selected
//! command through a [`BucketManager`].

use clap::{Parser, Subcommand};

use bm_core::{BucketManager, ConfigManager, Credentials, ObjectStore, Overrides, Settings};
use bm_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod delete;
mod filter;
mod list;
mod upload;

/// bm - bucket manager
///
/// Lists, uploads, filters and deletes objects under one prefix of an S3 bucket.
/// Credentials are read from AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY,
/// optionally loaded from a `.env` file in the working directory.
#[derive(Parser, Debug)]
#[command(name = "bm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Bucket to operate on [default: developer-task]
    #[arg(long, global = true, env = "BM_BUCKET")]
    pub bucket: Option<String>,

    /// Key prefix scoping every operation [default: x-wing/]
    #[arg(long, global = true, env = "BM_PREFIX")]
    pub prefix: Option<String>,

    /// Endpoint URL for S3-compatible services
    #[arg(long, global = true, env = "AWS_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List objects under the prefix
    List(list::ListArgs),

    /// Upload a local file under the prefix, overwriting any existing object
    Upload(upload::UploadArgs),

    /// List objects whose key matches a regular expression
    Filter(filter::FilterArgs),

    /// Delete objects whose key matches a regular expression
    Delete(delete::DeleteArgs),
}

impl Cli {
    fn output_config(&self) -> OutputConfig {
        OutputConfig {
            json: self.json,
            no_color: self.no_color,
            no_progress: self.no_progress,
            quiet: self.quiet,
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(cli.output_config());

    let manager = match connect(&cli).await {
        Ok(manager) => manager,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    run(cli.command, &manager, &formatter).await
}

/// Resolve credentials and settings, then build the one storage client
async fn connect(cli: &Cli) -> bm_core::Result<BucketManager<S3Client>> {
    let credentials = Credentials::from_env()?;
    let file = ConfigManager::new()?.load()?;
    let settings = Settings::resolve(cli.overrides(), &file)?;

    tracing::debug!(
        bucket = %settings.bucket,
        prefix = %settings.prefix,
        region = %credentials.region,
        "initializing storage client"
    );

    let client = S3Client::new(credentials, settings.endpoint.as_deref()).await?;
    Ok(BucketManager::new(client, settings))
}

/// Dispatch a parsed command against an already-built manager
pub async fn run<S: ObjectStore>(
    command: Commands,
    manager: &BucketManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    match command {
        Commands::List(args) => list::execute(args, manager, formatter).await,
        Commands::Upload(args) => upload::execute(args, manager, formatter).await,
        Commands::Filter(args) => filter::execute(args, manager, formatter).await,
        Commands::Delete(args) => delete::execute(args, manager, formatter).await,
    }
}

/// Print an operation error and map it to an exit code
fn report_error(formatter: &Formatter, context: &str, err: &bm_core::Error) -> ExitCode {
    formatter.error(&format!("{context}: {err}"));
    ExitCode::from_error(err)
}
