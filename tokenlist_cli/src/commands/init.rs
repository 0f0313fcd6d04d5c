//! `init` subcommand

use crate::{
    config::{TokenlistCliConfig, CONFIG_FILE_NAME},
    prelude::*,
};
use abscissa_core::{config, Command, FrameworkError, Runnable};
use clap::Parser;
use std::{fs, path::PathBuf};
use tokenlist::AddressPolicy;

#[derive(Command, Debug, Parser)]
pub struct InitCmd {
    /// Address casing the repository uses: checksum or lowercase
    #[clap(long)]
    pub policy: AddressPolicy,

    /// Where to write the config file
    #[clap(long, default_value = CONFIG_FILE_NAME)]
    pub output: PathBuf,

    /// Replace an existing file
    #[clap(long)]
    pub force: bool,
}

impl Runnable for InitCmd {
    /// Write the loaded config, with the chosen policy, as a starting point.
    fn run(&self) {
        if self.output.exists() && !self.force {
            status_err!(
                "{} already exists, pass --force to replace it",
                self.output.display()
            );
            std::process::exit(1);
        }

        let config = TokenlistCliConfig {
            address_policy: Some(self.policy),
            ..APP.config().as_ref().clone()
        };
        let content = config.to_toml().unwrap_or_else(|err| {
            status_err!("{}", err);
            std::process::exit(1);
        });

        if let Err(err) = fs::write(&self.output, content) {
            status_err!("can't write {}: {}", self.output.display(), err);
            std::process::exit(1);
        }

        status_ok!("Created", "{}", self.output.display());
    }
}

impl config::Override<TokenlistCliConfig> for InitCmd {
    fn override_config(
        &self,
        config: TokenlistCliConfig,
    ) -> Result<TokenlistCliConfig, FrameworkError> {
        Ok(config)
    }
}
