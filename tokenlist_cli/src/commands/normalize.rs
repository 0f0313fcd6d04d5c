//! `normalize` subcommand

use crate::{config::TokenlistCliConfig, prelude::*};
use abscissa_core::{config, Command, FrameworkError, Runnable};
use clap::Parser;
use std::path::PathBuf;
use tokenlist::{normalize::Normalizer, AddressPolicy};

#[derive(Command, Debug, Parser)]
pub struct NormalizeCmd {
    /// Assets root holding one directory per chain
    #[clap(long)]
    pub root: Option<PathBuf>,

    /// Address casing to rewrite to: checksum or lowercase
    #[clap(long)]
    pub policy: Option<AddressPolicy>,

    /// Report what would change without writing anything
    #[clap(long)]
    pub dry_run: bool,
}

impl Runnable for NormalizeCmd {
    fn run(&self) {
        let config = APP.config();
        let policy = config.policy().unwrap_or_else(|err| {
            status_err!("{}", err);
            std::process::exit(1);
        });

        let normalizer = Normalizer {
            policy,
            raw_base_url: &config.raw_base_url,
            dry_run: self.dry_run,
        };
        let summary = normalizer
            .normalize_root(&config.assets_root)
            .unwrap_or_else(|err| {
                status_err!("{}", err);
                std::process::exit(1);
            });

        for address in &summary.invalid_addresses {
            status_warn!("left invalid address {} untouched", address);
        }
        for file in &summary.skipped_files {
            status_warn!("skipped {}, it is not valid JSON", file);
        }

        let verb = if self.dry_run { "Would rewrite" } else { "Rewrote" };
        status_ok!(
            verb,
            "{} addresses and {} logo URIs in {} files, renamed {} logos ({})",
            summary.addresses_rewritten,
            summary.logo_uris_rewritten,
            summary.files_changed,
            summary.logos_renamed,
            policy
        );
    }
}

impl config::Override<TokenlistCliConfig> for NormalizeCmd {
    fn override_config(
        &self,
        mut config: TokenlistCliConfig,
    ) -> Result<TokenlistCliConfig, FrameworkError> {
        if let Some(root) = &self.root {
            config.assets_root = root.clone();
        }
        if let Some(policy) = self.policy {
            config.address_policy = Some(policy);
        }

        Ok(config)
    }
}
