//! Qonversion API command line client
//!
//! Sends a single request to the Qonversion API and prints the response

use anyhow::{Context, Result};
use clap::Parser;
use qonversion::utils::logging::init_logging;
use qonversion::{ApiRequestor, FileConfig, Headers, ParamValue, Params, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "qonversion", version, about = "Send a request to the Qonversion API")]
struct Cli {
    /// HTTP method: get, post or delete
    method: String,

    /// Path relative to the API base, e.g. /users/u1
    path: String,

    /// Request parameter as key=value
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Extra header as name:value
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// API key, overriding QONVERSION_API_KEY and the config file
    #[arg(long)]
    api_key: Option<String>,

    /// API base URL, overriding QONVERSION_API_BASE and the config file
    #[arg(long)]
    api_base: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected name:value, got {:?}", raw))
}

/// Interpret a command line value as bool, integer or string
fn param_value(raw: String) -> ParamValue {
    if let Ok(b) = raw.parse::<bool>() {
        ParamValue::Bool(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        ParamValue::Int(i)
    } else {
        ParamValue::Str(raw)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => FileConfig::load_default()?,
    };
    let settings = match &file {
        Some(file) => Settings::with_file(file),
        None => Settings::new(),
    }
    .context("Failed to load client settings")?;

    init_logging(&settings.logging.level, &settings.logging.format)?;
    debug!("Logging system initialized for {}", qonversion::version_info());

    let mut requestor = ApiRequestor::new(settings.client_config())?;
    if let Some(api_key) = cli.api_key {
        requestor = requestor.with_api_key(api_key);
    }
    if let Some(api_base) = cli.api_base {
        requestor = requestor.with_api_base(api_base);
    }
    info!("Using API base {}", requestor.api_base());

    let params = if cli.params.is_empty() {
        None
    } else {
        Some(
            cli.params
                .into_iter()
                .map(|(k, v)| (k, param_value(v)))
                .collect::<Params>(),
        )
    };
    let headers = if cli.headers.is_empty() {
        None
    } else {
        Some(cli.headers.into_iter().collect::<Headers>())
    };

    match requestor.request(&cli.method, &cli.path, params, headers).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(response.data())?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let status = e
                .http_status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            eprintln!("{} (HTTP {}): {}", e.error_type(), status, e.message());
            Ok(ExitCode::FAILURE)
        }
    }
}
