mod check;
mod generate;

pub use check::CheckCommand;
pub use generate::GenerateCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// restbridge - typed TypeScript clients from backend descriptors
#[derive(Parser)]
#[command(name = "restbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate TypeScript client code.
    Generate(GenerateCommand),

    /// Validate configuration and descriptors without writing output.
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Generate(cmd) => cmd.execute(),
            Commands::Check(cmd) => cmd.execute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from(["restbridge", "generate", "--output", "out"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["restbridge", "check", "-c", "restbridge.toml"]);
        assert!(cli.is_ok());
    }
}
