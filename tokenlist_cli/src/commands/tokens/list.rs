use crate::prelude::*;
use abscissa_core::{Command, Runnable};
use clap::Parser;
use std::path::PathBuf;
use tokenlist::registry::{Filter, Token};

#[derive(Command, Debug, Parser)]
pub struct ListCmd {
    pub chain_id: u64,

    /// Only the popular list
    #[clap(long)]
    pub popular: bool,

    /// Only tokens with this symbol, ignoring case
    #[clap(long)]
    pub symbol: Option<String>,

    /// Assets root holding one directory per chain
    #[clap(long)]
    pub root: Option<PathBuf>,
}

impl Runnable for ListCmd {
    fn run(&self) {
        let registry = super::load_registry(&APP.config());
        if registry.chain(self.chain_id).is_none() {
            status_err!("no lists for chain {}", self.chain_id);
            std::process::exit(1);
        }

        let source = if self.popular {
            registry.popular(self.chain_id)
        } else {
            registry.tokens(self.chain_id)
        };
        let tokens: Vec<&Token> = match &self.symbol {
            Some(symbol) => {
                let filter = Filter::Symbol(symbol.clone());
                source.iter().filter(|t| filter.matches(t)).collect()
            }
            None => source.iter().collect(),
        };

        let out = serde_json::to_string_pretty(&tokens).unwrap_or_else(|err| {
            status_err!("Can't convert tokens to JSON: {}", err);
            std::process::exit(1);
        });
        println!("{}", out);
    }
}
