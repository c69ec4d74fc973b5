use crate::config::OpenApiSettings;
use crate::demo;
use crate::serializer::{serialize, write_to_file, Format};
use crate::server;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Serve the OpenAPI documentation of the bookstore demo application
#[derive(Parser, Debug)]
#[command(name = "openapi-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Address to listen on
    #[arg(short = 'b', long = "bind", default_value = "127.0.0.1:5000")]
    pub bind: String,

    /// Prefix the documentation is mounted under (overrides the settings file)
    #[arg(short = 'm', long = "mount")]
    pub mounted_at: Option<String>,

    /// YAML settings file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Write the document to this file and exit instead of serving it
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => Format::Yaml,
            OutputFormat::Json => Format::Json,
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if let Some(ref config) = args.config_path {
        if !config.is_file() {
            anyhow::bail!("Settings file does not exist: {}", config.display());
        }
        info!("Settings file: {}", config.display());
    }

    match args.output_path {
        Some(ref output) => info!("Output file: {}", output.display()),
        None => info!("Listening on: {}", args.bind),
    }

    Ok(args)
}

/// Settings from the settings file, or the demo defaults.
pub fn load_settings(args: &CliArgs) -> Result<OpenApiSettings> {
    let mut settings = match args.config_path {
        Some(ref path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings: {}", path.display()))?;
            OpenApiSettings::from_yaml_str(&text)
                .with_context(|| format!("Invalid settings: {}", path.display()))?
        }
        None => OpenApiSettings::new("Bookstore API", "1.0.0"),
    };

    if let Some(ref prefix) = args.mounted_at {
        settings.mounted_at = prefix.clone();
    }
    Ok(settings)
}

/// Run the main workflow
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args)?;

    let mut open_api = demo::open_api(settings).context("Failed to set up documentation")?;
    let routes = demo::routes(open_api.registry()).context("Failed to document routes")?;
    let docs = open_api
        .init(&routes)
        .context("Failed to build OpenAPI document")?;

    if let Some(ref output) = args.output_path {
        let format = args
            .output_format
            .map(Format::from)
            .unwrap_or_else(|| Format::from_path(output));
        let content = serialize(&docs.document, format)?;
        write_to_file(&content, output)?;
        info!("OpenAPI document written to: {}", output.display());
        return Ok(());
    }

    info!("Documentation at http://{}{}/swagger_ui", args.bind, docs.docs_prefix);
    let app = server::mount(demo::app(), Arc::new(docs));
    server::serve(app, &args.bind)
        .await
        .context("Server failed")?;

    Ok(())
}
