//! TokenlistCli Subcommands

mod init;
mod normalize;
mod probe;
mod sync;
mod tokens;
mod validate;

use self::{
    init::InitCmd, normalize::NormalizeCmd, probe::ProbeCmd, sync::SyncCmd, tokens::TokensCmd,
    validate::ValidateCmd,
};
use crate::config::{self, TokenlistCliConfig};
use abscissa_core::{config::Override, Command, Configurable, FrameworkError, Runnable};
use clap::Parser;
use std::path::PathBuf;

/// TokenlistCli Subcommands
/// Subcommands need to be listed in an enum.
#[derive(Command, Debug, Parser, Runnable)]
pub enum TokenlistCliCmd {
    /// Write a starter config file
    Init(InitCmd),
    /// Validate every chain under the assets root
    Validate(ValidateCmd),
    /// Check that remote logo URLs are reachable
    Probe(ProbeCmd),
    /// Rewrite addresses and logo file names to the canonical casing
    Normalize(NormalizeCmd),
    /// Merge tokens from external lists into a chain's common list
    Sync(SyncCmd),
    /// Look up tokens
    #[clap(subcommand)]
    Tokens(TokensCmd),
}

/// Entry point for the application. It needs to be a struct to allow using subcommands!
#[derive(Command, Debug, Parser)]
#[clap(author, about, version)]
pub struct EntryPoint {
    #[clap(subcommand)]
    cmd: TokenlistCliCmd,

    /// Enable verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Use the specified config file
    #[clap(short, long)]
    pub config: Option<String>,
}

impl Runnable for EntryPoint {
    fn run(&self) {
        self.cmd.run()
    }
}

/// This trait allows you to define how application configuration is loaded.
impl Configurable<TokenlistCliConfig> for EntryPoint {
    /// Location of the configuration file. Without one the defaults apply.
    fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(PathBuf::from(path)),
            None => config::default_config_path(),
        }
    }

    /// Apply changes to the config after it's been loaded, e.g. overriding
    /// values in a config file using command-line options.
    fn process_config(
        &self,
        config: TokenlistCliConfig,
    ) -> Result<TokenlistCliConfig, FrameworkError> {
        match &self.cmd {
            TokenlistCliCmd::Init(cmd) => cmd.override_config(config),
            TokenlistCliCmd::Validate(cmd) => cmd.override_config(config),
            TokenlistCliCmd::Probe(cmd) => cmd.override_config(config),
            TokenlistCliCmd::Normalize(cmd) => cmd.override_config(config),
            TokenlistCliCmd::Sync(cmd) => cmd.override_config(config),
            TokenlistCliCmd::Tokens(cmd) => cmd.override_config(config),
        }
    }
}
