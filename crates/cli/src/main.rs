//! bm - bucket manager
//!
//! Lists, uploads, filters and deletes objects under one prefix of an
//! S3 bucket.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bucket_manager::commands::{self, Cli};

#[tokio::main]
async fn main() {
    // Variables already present in the environment win over `.env`
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("bm=debug,bm_core=debug,bm_s3=debug,bucket_manager=debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
