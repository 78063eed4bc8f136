//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Arguments for `serve`.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// Arguments for `show`.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Resume identifier
    pub id: i64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for `list`.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Maximum number of resumes to list
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for `export`.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Resume identifier
    pub id: i64,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to configuration file (default: standard location)
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_command_debug() {
        let cmd = ListCommand {
            limit: 5,
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("limit: 5"));
    }

    #[test]
    fn test_config_command_variants() {
        let cmd = ConfigCommand::Validate { file: None };
        assert!(matches!(cmd, ConfigCommand::Validate { file: None }));
    }
}
