//! duckrest - command-line caller for a DuckDB REST server.

mod cli;
mod error;
mod output;
mod script;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use duckrest_core::logging::{init_logging, log_dir, LogConfig};
use duckrest_core::DuckRestClient;

use cli::{CliOpts, Command};
use error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let opts = CliOpts::parse();

    let mut log_config = LogConfig::for_stderr(log_dir());
    if let Some(filter) = &opts.log_filter {
        log_config = log_config.with_filter(filter.clone());
    }
    let _logging_guard = init_logging(log_config);

    let client = DuckRestClient::with_options(opts.client_config(), opts.client_options());
    tracing::info!(
        command = opts.command.name(),
        base_url = %client.config().base_url(),
        "Starting duckrest"
    );

    match run_command(&client, &opts.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(command = opts.command.name(), error = %e, "Command failed");
            output::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run_command(client: &DuckRestClient, command: &Command) -> Result<(), CliError> {
    match command {
        Command::Health => output::print_json(&client.health_check().await?),
        Command::Tables => output::print_json(&client.list_tables().await?),
        Command::Info => output::print_json(&client.get_info().await?),
        Command::Schema { table } => output::print_json(&client.describe_table(table).await?),
        Command::Query { sql } => output::print_json(&client.query(sql).await?),
        Command::Execute { sql } => output::print_json(&client.execute(sql).await?),
        Command::Run { file } => run_script(client, file).await,
    }
}

/// Execute a script's statements in order, stopping at the first failure.
async fn run_script(client: &DuckRestClient, path: &Path) -> Result<(), CliError> {
    let statements = script::load_statements(path)?;
    tracing::info!(path = %path.display(), statements = statements.len(), "Running script");

    for (i, sql) in statements.iter().enumerate() {
        let index = i + 1;
        let result = client
            .execute(sql)
            .await
            .map_err(|source| CliError::Statement { index, source })?;
        output::print_statement(index, sql, &result)?;
    }

    tracing::info!(path = %path.display(), "Script completed");
    Ok(())
}
