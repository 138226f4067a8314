use clap::{Parser, Subcommand};
use duckrest_core::{ClientConfig, ClientOptions, SchemaPathEncoding};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct CliOpts {
    #[arg(long, env = "DUCKREST_URL", help = "Base URL of the DuckDB REST server")]
    url: String,

    #[arg(
        long,
        env = "DUCKREST_TOKEN",
        hide_env_values = true,
        help = "API token sent as a bearer credential"
    )]
    token: String,

    #[arg(
        long,
        env = "DUCKREST_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Per-request timeout in seconds (no timeout when unset)"
    )]
    timeout_secs: Option<u64>,

    #[arg(long, help = "Put table names into /schema paths without escaping")]
    raw_schema_path: bool,

    #[arg(long, help = "Log filter directives, overriding DUCKREST_LOG and RUST_LOG")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the server is up
    Health,
    /// List tables with their row counts
    Tables,
    /// Show database information
    Info,
    /// Describe the columns of a table
    Schema { table: String },
    /// Run a read query and print the rows
    Query { sql: String },
    /// Run a write or DDL statement
    Execute { sql: String },
    /// Run every statement of a SQL script in order, stopping at the first failure
    Run { file: PathBuf },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Tables => "tables",
            Self::Info => "info",
            Self::Schema { .. } => "schema",
            Self::Query { .. } => "query",
            Self::Execute { .. } => "execute",
            Self::Run { .. } => "run",
        }
    }
}

impl CliOpts {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.url, &self.token)
    }

    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new();
        if let Some(secs) = self.timeout_secs {
            options = options.with_timeout(Duration::from_secs(secs));
        }
        if self.raw_schema_path {
            options = options.with_schema_path_encoding(SchemaPathEncoding::Raw);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOpts {
        let base = ["duckrest", "--url", "http://localhost:8000/", "--token", "secret"];
        CliOpts::try_parse_from(base.iter().chain(args)).unwrap()
    }

    #[test]
    fn test_parse_query_subcommand() {
        let opts = parse(&["query", "SELECT * FROM t"]);
        assert_eq!(opts.command, Command::Query { sql: "SELECT * FROM t".into() });
        assert_eq!(opts.command.name(), "query");
    }

    #[test]
    fn test_client_config_strips_trailing_slash() {
        let opts = parse(&["health"]);
        let config = opts.client_config();
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.auth_token(), "secret");
    }

    #[test]
    fn test_default_options() {
        let opts = parse(&["tables"]);
        let options = opts.client_options();
        assert_eq!(options.timeout, None);
        assert_eq!(options.schema_path_encoding, SchemaPathEncoding::Percent);
    }

    #[test]
    fn test_timeout_and_raw_schema_path() {
        let opts = parse(&["--timeout-secs", "30", "--raw-schema-path", "schema", "a/b"]);
        let options = opts.client_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.schema_path_encoding, SchemaPathEncoding::Raw);
        assert_eq!(opts.command, Command::Schema { table: "a/b".into() });
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let args = ["duckrest", "--url", "u", "--token", "t", "--timeout-secs", "0", "health"];
        assert!(CliOpts::try_parse_from(args).is_err());
    }

    #[test]
    fn test_run_takes_a_path() {
        let opts = parse(&["run", "load.sql"]);
        assert_eq!(opts.command, Command::Run { file: PathBuf::from("load.sql") });
    }
}
