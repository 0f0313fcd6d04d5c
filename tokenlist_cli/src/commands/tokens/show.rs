use crate::prelude::*;
use abscissa_core::{Command, Runnable};
use clap::Parser;
use serde::Serialize;
use std::{path::PathBuf, str};

#[derive(Command, Debug, Parser)]
pub struct ShowCmd {
    pub chain_id: u64,
    pub address: String,

    /// Assets root holding one directory per chain
    #[clap(long)]
    pub root: Option<PathBuf>,
}

impl Runnable for ShowCmd {
    fn run(&self) {
        let registry = super::load_registry(&APP.config());

        let token = match registry.get_token(self.chain_id, &self.address) {
            Some(token) => token,
            None => {
                status_err!("{} not found on chain {}", self.address, self.chain_id);
                std::process::exit(1);
            }
        };

        // customize indentation for token details
        let buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(buf, formatter);
        if let Err(err) = token.serialize(&mut serializer) {
            status_err!("Can't convert token to JSON: {}", err);
            std::process::exit(1);
        }

        match str::from_utf8(&serializer.into_inner()) {
            Ok(out) => println!("{}", out),
            Err(err) => {
                status_err!("{}", err);
                std::process::exit(1);
            }
        }
    }
}
