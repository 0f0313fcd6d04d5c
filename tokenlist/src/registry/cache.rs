/// Provides an in-memory view of every chain's lists for easy querying and filtering.
use crate::{
    error::TokenListError,
    registry::{
        self,
        assets::{ListKind, Token, TokenList},
        paths::{discover, ChainDir},
    },
};
use std::{collections::BTreeMap, path::Path};
use tracing::warn;

/// Both lists of one chain. A list is `None` when the file is absent or could not be parsed.
#[derive(Clone, Debug)]
pub struct ChainLists {
    pub dir: ChainDir,
    pub common: Option<TokenList>,
    pub popular: Option<TokenList>,
}

impl ChainLists {
    pub fn list(&self, kind: ListKind) -> Option<&TokenList> {
        match kind {
            ListKind::Common => self.common.as_ref(),
            ListKind::Popular => self.popular.as_ref(),
        }
    }
}

/// Represents a token attribute to filter by
#[derive(Clone, Debug)]
pub enum Filter {
    /// Exact symbol, ignoring case
    Symbol(String),
    /// Substring of the name, ignoring case
    Name(String),
    Decimals(u32),
}

impl Filter {
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            Filter::Symbol(s) => token.symbol.eq_ignore_ascii_case(s),
            Filter::Name(n) => token.name.to_lowercase().contains(&n.to_lowercase()),
            Filter::Decimals(d) => token.decimals == *d,
        }
    }
}

/// Used to cache the lists of every chain under an assets root for lookups.
#[derive(Clone, Debug, Default)]
pub struct TokenRegistry {
    chains: BTreeMap<u64, ChainLists>,
}

impl TokenRegistry {
    /// Loads every chain directory under `root`. Lists that fail to deserialize are skipped
    /// with a warning; run the validator to find out why.
    pub fn load(root: &Path) -> Result<TokenRegistry, TokenListError> {
        let mut chains = BTreeMap::new();

        for dir in discover(root)?.chains {
            let common = load_list(&dir, ListKind::Common)?;
            let popular = load_list(&dir, ListKind::Popular)?;
            chains.insert(
                dir.chain_id,
                ChainLists {
                    dir,
                    common,
                    popular,
                },
            );
        }

        Ok(TokenRegistry { chains })
    }

    /// Chain IDs in ascending order
    pub fn chains(&self) -> Vec<u64> {
        self.chains.keys().copied().collect()
    }

    pub fn chain(&self, chain_id: u64) -> Option<&ChainLists> {
        self.chains.get(&chain_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainLists> {
        self.chains.values()
    }

    /// All tokens of a chain, i.e. its common list. Empty if the chain is unknown.
    pub fn tokens(&self, chain_id: u64) -> &[Token] {
        self.list_tokens(chain_id, ListKind::Common)
    }

    /// The popular subset of a chain's tokens
    pub fn popular(&self, chain_id: u64) -> &[Token] {
        self.list_tokens(chain_id, ListKind::Popular)
    }

    /// Returns the token with `address` on `chain_id`, comparing addresses case-insensitively.
    /// The common list is searched first.
    pub fn get_token(&self, chain_id: u64, address: &str) -> Option<&Token> {
        self.tokens(chain_id)
            .iter()
            .chain(self.popular(chain_id).iter())
            .find(|t| t.address.eq_ignore_ascii_case(address))
    }

    /// Returns the tokens of `chain_id` that match `filter`
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use tokenlist::registry::{Filter, TokenRegistry};
    ///
    /// let registry = TokenRegistry::load(Path::new("assets"))?;
    ///
    /// // every token on mainnet with the symbol USDC
    /// let tokens = registry.tokens_filtered(1, &Filter::Symbol("usdc".to_string()));
    /// ```
    pub fn tokens_filtered(&self, chain_id: u64, filter: &Filter) -> Vec<&Token> {
        self.tokens(chain_id)
            .iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    fn list_tokens(&self, chain_id: u64, kind: ListKind) -> &[Token] {
        self.chains
            .get(&chain_id)
            .and_then(|c| c.list(kind))
            .map(|l| l.tokens.as_slice())
            .unwrap_or(&[])
    }
}

fn load_list(dir: &ChainDir, kind: ListKind) -> Result<Option<TokenList>, TokenListError> {
    let path = dir.list_path(kind);
    match registry::read_list(&path) {
        Ok(list) => Ok(list),
        Err(TokenListError::Json(err)) => {
            warn!("skipping {}: {}", path.display(), err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
