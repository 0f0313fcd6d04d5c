//! `validate` subcommand

use crate::{
    config::TokenlistCliConfig,
    error::Error,
    prelude::*,
};
use abscissa_core::{config, Command, FrameworkError, Runnable};
use clap::Parser;
use std::path::PathBuf;
use tokenlist::{
    probe::{self, Prober},
    registry::TokenRegistry,
    AddressPolicy, Report, Validator,
};

#[derive(Command, Debug, Parser)]
pub struct ValidateCmd {
    /// Assets root holding one directory per chain
    #[clap(long)]
    pub root: Option<PathBuf>,

    /// Address casing to enforce: checksum or lowercase
    #[clap(long)]
    pub policy: Option<AddressPolicy>,

    /// Print the report as JSON
    #[clap(long)]
    pub json: bool,

    /// Also probe remote logo URLs. Unreachable ones are reported as warnings.
    #[clap(long)]
    pub probe: bool,
}

impl Runnable for ValidateCmd {
    /// Validate the assets root and exit non-zero if validation failed.
    fn run(&self) {
        let config = APP.config().clone();
        let with_probe = self.probe;

        let report = abscissa_tokio::run(&APP, async move { validate(&config, with_probe).await })
            .unwrap_or_else(|e| {
                status_err!("executor exited with error: {}", e);
                std::process::exit(1);
            })
            .unwrap_or_else(|e| {
                status_err!("{}", e);
                std::process::exit(1);
            });

        if self.json {
            let out = serde_json::to_string_pretty(&report).unwrap_or_else(|err| {
                status_err!("Can't convert report to JSON: {}", err);
                std::process::exit(1);
            });
            println!("{}", out);
        } else {
            print!("{}", report.render_text());
        }

        if !report.passed() {
            std::process::exit(1);
        }
    }
}

async fn validate(config: &TokenlistCliConfig, with_probe: bool) -> Result<Report, Error> {
    let validator = Validator::new(config.validator_config()?);
    let mut report = validator.validate_root(&config.assets_root)?;

    if with_probe {
        let registry = TokenRegistry::load(&config.assets_root)?;
        let logos = probe::remote_logos(&registry, &config.raw_base_url);
        info!("probing {} remote logos", logos.len());

        let results = Prober::new(config.probe.clone())?.probe_all(logos).await;
        probe::apply_to_report(&results, &mut report);
    }

    Ok(report)
}

impl config::Override<TokenlistCliConfig> for ValidateCmd {
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
