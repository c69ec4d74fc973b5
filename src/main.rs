//! OpenAPI from routes - serves the documentation of the bookstore demo.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-routes [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Serve Swagger UI at `http://127.0.0.1:5000/v1/docs/swagger_ui`:
//! ```bash
//! openapi-from-routes --mount /v1
//! ```
//!
//! Export the document instead of serving it:
//! ```bash
//! openapi-from-routes -f yaml -o swagger.yaml
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-from-routes -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_routes::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI from routes starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args).await?;

    Ok(())
}
