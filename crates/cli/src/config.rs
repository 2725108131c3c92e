//! Runtime configuration resolved from arguments and environment

use minibank_business::RequestContext;
use minibank_persistence::DatabaseConfig;
use tracing_subscriber::EnvFilter;

use crate::Cli;

/// Everything a command needs besides its own arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub request: RequestContext,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            database: DatabaseConfig::new(&cli.db),
            request: RequestContext::new(&cli.employee, cli.role.to_role()),
        }
    }
}

/// Install the fmt subscriber. Logs go to stderr so exports on stdout stay clean.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use minibank_business::Role;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["minibank", "status"]).unwrap();
        let config = AppConfig::from_cli(&cli);
        assert_eq!(config.request.employee, "teller");
        assert_eq!(config.request.role, Role::Standard);
        assert!(config.database.create_if_missing);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "minibank",
            "interest",
            "--role",
            "extended",
            "--employee",
            "boss",
            "--db",
            "/tmp/bank.db",
        ])
        .unwrap();
        let config = AppConfig::from_cli(&cli);
        assert_eq!(config.request.role, Role::Extended);
        assert_eq!(config.request.employee, "boss");
        assert_eq!(config.database.path.to_str(), Some("/tmp/bank.db"));
    }

    #[test]
    fn test_operation_args() {
        let cli = Cli::try_parse_from(["minibank", "operation", "post", "3", "withdrawal", "12.50"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["minibank", "operation", "post", "3", "interest", "12.50"]);
        assert!(cli.is_err());
    }
}
