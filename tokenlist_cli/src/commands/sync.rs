//! `sync` subcommand

use crate::{
    config::TokenlistCliConfig,
    error::{Error, ErrorKind},
    prelude::*,
};
use abscissa_core::{config, Command, FrameworkError, Runnable};
use clap::Parser;
use std::path::PathBuf;
use tokenlist::{
    registry::find_chain,
    sync::{self, MergeSummary},
    AddressPolicy,
};

#[derive(Command, Debug, Parser)]
pub struct SyncCmd {
    /// Chain whose common list receives the new tokens
    pub chain_id: u64,

    /// External token list URL. Repeatable; defaults to the configured sources.
    #[clap(long = "source")]
    pub sources: Vec<String>,

    /// Assets root holding one directory per chain
    #[clap(long)]
    pub root: Option<PathBuf>,

    /// Address casing for added tokens: checksum or lowercase
    #[clap(long)]
    pub policy: Option<AddressPolicy>,

    /// Report what would be added without writing anything
    #[clap(long)]
    pub dry_run: bool,
}

impl Runnable for SyncCmd {
    fn run(&self) {
        let config = APP.config().clone();
        let chain_id = self.chain_id;
        let dry_run = self.dry_run;

        let summary =
            abscissa_tokio::run(&APP, async move { sync_chain(&config, chain_id, dry_run).await })
                .unwrap_or_else(|e| {
                    status_err!("executor exited with error: {}", e);
                    std::process::exit(1);
                })
                .unwrap_or_else(|e| {
                    status_err!("{}", e);
                    std::process::exit(1);
                });

        let verb = if dry_run { "Would add" } else { "Added" };
        status_ok!(
            verb,
            "{} tokens to chain {}, skipped {}",
            summary.added,
            chain_id,
            summary.skipped
        );
    }
}

async fn sync_chain(
    config: &TokenlistCliConfig,
    chain_id: u64,
    dry_run: bool,
) -> Result<MergeSummary, Error> {
    let policy = config.policy()?;
    if config.sync.sources.is_empty() {
        return Err(ErrorKind::Config
            .context("no sources: pass --source URL or set [sync] sources")
            .into());
    }

    let chain = find_chain(&config.assets_root, chain_id)?;

    Ok(sync::sync_chain(&chain, &config.sync.sources, policy, dry_run).await?)
}

impl config::Override<TokenlistCliConfig> for SyncCmd {
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
        if !self.sources.is_empty() {
            config.sync.sources = self.sources.clone();
        }

        Ok(config)
    }
}
