//! `probe` subcommand

use crate::{config::TokenlistCliConfig, error::Error, prelude::*};
use abscissa_core::{config, Command, FrameworkError, Runnable};
use clap::Parser;
use std::path::PathBuf;
use tokenlist::{
    probe::{self, ProbeOutcome, ProbeResult, Prober},
    registry::TokenRegistry,
};

#[derive(Command, Debug, Parser)]
pub struct ProbeCmd {
    /// Assets root holding one directory per chain
    #[clap(long)]
    pub root: Option<PathBuf>,
}

impl Runnable for ProbeCmd {
    /// Probe every remote logo URL and list the unreachable ones. Never fails on
    /// unreachable URLs.
    fn run(&self) {
        let config = APP.config().clone();

        let results = abscissa_tokio::run(&APP, async move { probe_logos(&config).await })
            .unwrap_or_else(|e| {
                status_err!("executor exited with error: {}", e);
                std::process::exit(1);
            })
            .unwrap_or_else(|e| {
                status_err!("{}", e);
                std::process::exit(1);
            });

        let mut unreachable = 0;
        for result in &results {
            if let ProbeOutcome::Unreachable { reason } = &result.outcome {
                unreachable += 1;
                println!(
                    "chain {} {} {}: {}",
                    result.logo.chain_id, result.logo.token, result.logo.url, reason
                );
            }
        }

        if unreachable == 0 {
            status_ok!("Probed", "{} remote logos, all reachable", results.len());
        } else {
            status_warn!("{} of {} remote logos are unreachable", unreachable, results.len());
        }
    }
}

async fn probe_logos(config: &TokenlistCliConfig) -> Result<Vec<ProbeResult>, Error> {
    let registry = TokenRegistry::load(&config.assets_root)?;
    let logos = probe::remote_logos(&registry, &config.raw_base_url);
    let prober = Prober::new(config.probe.clone())?;

    Ok(prober.probe_all(logos).await)
}

impl config::Override<TokenlistCliConfig> for ProbeCmd {
    fn override_config(
        &self,
        mut config: TokenlistCliConfig,
    ) -> Result<TokenlistCliConfig, FrameworkError> {
        if let Some(root) = &self.root {
            config.assets_root = root.clone();
        }

        Ok(config)
    }
}
