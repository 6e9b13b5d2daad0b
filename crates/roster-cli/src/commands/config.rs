//! Configuration commands.

use anyhow::Result;
use clap::Subcommand;
use roster_core::RosterConfig;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
}

pub fn handle_command(command: &ConfigCommand, config: &RosterConfig) -> Result<String> {
    match command {
        ConfigCommand::Show => Ok(config.to_toml_string()?),
    }
}
