use crate::prelude::*;
use abscissa_core::{Command, Runnable};
use clap::Parser;
use std::path::PathBuf;

#[derive(Command, Debug, Parser)]
pub struct ChainsCmd {
    /// Assets root holding one directory per chain
    #[clap(long)]
    pub root: Option<PathBuf>,
}

impl Runnable for ChainsCmd {
    /// List all chains
    fn run(&self) {
        let registry = super::load_registry(&APP.config());

        for chain_id in registry.chains() {
            println!(
                "{}\t{} tokens\t{} popular",
                chain_id,
                registry.tokens(chain_id).len(),
                registry.popular(chain_id).len()
            );
        }
    }
}
