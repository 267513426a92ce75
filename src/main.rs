//! wanderhawaii tour catalog server & CLI
//!
//! Dual-mode application:
//! - MCP Server Mode (default): JSON-RPC tool server on stdio
//! - CLI Mode: one-shot search and suggestions
//!
//! Tools: `search_tours`, `load_more`, `shuffle_tours`, `clear_filters`,
//! `suggest_terms`.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use wanderhawaii::cli::{self, Cli, Commands};
use wanderhawaii::config::{load_config, AppConfig};
use wanderhawaii::error::AppError;
use wanderhawaii::{mcp, tools};

/// Upper bound for one CLI invocation, catalog fetch included
const CLI_TIMEOUT_SECS: u64 = 120;

#[tokio::main]
async fn main() -> Result<()> {
    // Detect mode: CLI if args present, MCP server otherwise
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        run_cli_mode().await
    } else {
        run_mcp_mode().await
    }
}

/// Run in CLI mode
async fn run_cli_mode() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    let result = match load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Some(Commands::Search(args)) => execute_search_cli(args, &config).await,
            Some(Commands::Suggest(args)) => execute_suggest_cli(args, &config),
            None => {
                eprintln!("Error: No command specified. Use --help for usage information.");
                std::process::exit(1);
            }
        },
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

/// Execute search command in CLI mode
async fn execute_search_cli(args: cli::SearchArgs, config: &AppConfig) -> Result<String> {
    use tokio::time::{timeout, Duration};

    let result = timeout(
        Duration::from_secs(CLI_TIMEOUT_SECS),
        tools::search::execute_search(args, config),
    )
    .await;

    match result {
        Ok(Ok(tool_result)) => Ok(tool_result
            .content
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(AppError::Timeout(format!(
            "Request exceeded {} second timeout",
            CLI_TIMEOUT_SECS
        ))
        .into()),
    }
}

/// Execute suggest command in CLI mode
fn execute_suggest_cli(args: cli::SuggestArgs, config: &AppConfig) -> Result<String> {
    let table = config.synonym_table()?;
    let tool_result = tools::suggest::execute_suggest(&args, &table)?;
    Ok(tool_result
        .content
        .first()
        .map(|c| c.text.clone())
        .unwrap_or_default())
}

/// Map errors to exit codes
fn get_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::InvalidInput(_)) => 1,
        Some(AppError::CatalogFetchFailed(_)) => 2,
        Some(AppError::CatalogParseFailed(_)) | Some(AppError::ConfigError(_)) => 3,
        Some(AppError::Timeout(_)) => 4,
        Some(AppError::Internal(_)) | None => 5,
    }
}

/// Run in MCP server mode
async fn run_mcp_mode() -> Result<()> {
    // Honours RUST_LOG; logs go to stderr so stdout carries only JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting wanderhawaii MCP Server");

    let config = load_config(None)?;
    mcp::handle_stdio(config).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let code = |e: AppError| get_exit_code(&anyhow::Error::from(e));
        assert_eq!(code(AppError::InvalidInput("x".into())), 1);
        assert_eq!(code(AppError::CatalogFetchFailed("x".into())), 2);
        assert_eq!(code(AppError::CatalogParseFailed("x".into())), 3);
        assert_eq!(code(AppError::ConfigError("x".into())), 3);
        assert_eq!(code(AppError::Timeout("x".into())), 4);
        assert_eq!(code(AppError::Internal("x".into())), 5);
        assert_eq!(get_exit_code(&anyhow::anyhow!("boom")), 5);
    }
}
