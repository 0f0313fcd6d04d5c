mod chains;
mod list;
mod show;

use crate::{config::TokenlistCliConfig, prelude::*};
use abscissa_core::{config, Command, FrameworkError, Runnable};
use clap::Parser;
use std::path::PathBuf;
use tokenlist::registry::TokenRegistry;

use self::chains::ChainsCmd;
use self::list::ListCmd;
use self::show::ShowCmd;

/// `tokens` subcommand
///
/// Read-only lookups over the lists loaded from the assets root.
#[derive(Command, Debug, Parser, Runnable)]
pub enum TokensCmd {
    /// List chain IDs with their token counts
    Chains(ChainsCmd),
    /// List the tokens of a chain
    List(ListCmd),
    /// Show one token
    Show(ShowCmd),
}

impl TokensCmd {
    fn root(&self) -> Option<&PathBuf> {
        match self {
            TokensCmd::Chains(cmd) => cmd.root.as_ref(),
            TokensCmd::List(cmd) => cmd.root.as_ref(),
            TokensCmd::Show(cmd) => cmd.root.as_ref(),
        }
    }
}

impl config::Override<TokenlistCliConfig> for TokensCmd {
    fn override_config(
        &self,
        mut config: TokenlistCliConfig,
    ) -> Result<TokenlistCliConfig, FrameworkError> {
        if let Some(root) = self.root() {
            config.assets_root = root.clone();
        }

        Ok(config)
    }
}

/// Loads the registry from the configured assets root, exiting on failure.
fn load_registry(config: &TokenlistCliConfig) -> TokenRegistry {
    TokenRegistry::load(&config.assets_root).unwrap_or_else(|err| {
        status_err!("{}", err);
        std::process::exit(1);
    })
}
