/// Discovery of chain directories under an assets root: `<root>/<chainId>/{common.json,popular.json,logos/}`
use crate::{error::TokenListError, registry::assets::ListKind};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// A directory named after a positive chain ID
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ChainDir {
    pub chain_id: u64,
    pub path: PathBuf,
}

impl ChainDir {
    pub fn list_path(&self, kind: ListKind) -> PathBuf {
        self.path.join(kind.file_name())
    }

    pub fn logos_dir(&self) -> PathBuf {
        self.path.join("logos")
    }
}

/// Result of walking the assets root
#[derive(Clone, Debug, Default, Serialize)]
pub struct Discovery {
    /// One entry per chain ID, sorted by chain ID
    pub chains: Vec<ChainDir>,
    /// Directories whose name parses to a chain ID that was already seen
    pub duplicates: Vec<ChainDir>,
}

/// Returns the chain directories under `root`. Entries that aren't directories or whose name
/// isn't a positive integer are skipped. When two names parse to the same chain ID (`01` and `1`)
/// the canonically spelled one wins and the other is reported as a duplicate.
pub fn discover(root: &Path) -> Result<Discovery, TokenListError> {
    let entries = fs::read_dir(root).map_err(|e| TokenListError::io(root, e))?;
    let mut names = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| TokenListError::io(root, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => names.push((name.to_string(), path)),
            None => debug!("skipping non utf-8 entry {}", path.display()),
        }
    }
    names.sort();

    let mut chains = BTreeMap::<u64, ChainDir>::new();
    let mut duplicates = Vec::new();

    for (name, path) in names {
        let chain_id = match parse_chain_id(&name) {
            Some(id) => id,
            None => {
                debug!("skipping {}: not a chain directory", path.display());
                continue;
            }
        };

        let canonical = name == chain_id.to_string();
        let dir = ChainDir { chain_id, path };
        match chains.get_mut(&chain_id) {
            Some(existing) if canonical => duplicates.push(std::mem::replace(existing, dir)),
            Some(_) => duplicates.push(dir),
            None => {
                chains.insert(chain_id, dir);
            }
        }
    }

    Ok(Discovery {
        chains: chains.into_values().collect(),
        duplicates,
    })
}

/// Finds a single chain directory by ID
pub fn find_chain(root: &Path, chain_id: u64) -> Result<ChainDir, TokenListError> {
    discover(root)?
        .chains
        .into_iter()
        .find(|c| c.chain_id == chain_id)
        .ok_or_else(|| {
            TokenListError::InvalidChainDirectory(format!(
                "no directory for chain {} under {}",
                chain_id,
                root.display()
            ))
        })
}

fn parse_chain_id(name: &str) -> Option<u64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    name.parse::<u64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;

    #[assay]
    fn parses_chain_directory_names() {
        assert_eq!(parse_chain_id("1"), Some(1));
        assert_eq!(parse_chain_id("42161"), Some(42161));
        assert_eq!(parse_chain_id("01"), Some(1));
        assert_eq!(parse_chain_id("0"), None);
        assert_eq!(parse_chain_id("-1"), None);
        assert_eq!(parse_chain_id("+1"), None);
        assert_eq!(parse_chain_id("logos"), None);
        assert_eq!(parse_chain_id(""), None);
    }

    #[assay]
    fn discovers_sorted_chains_and_duplicates() {
        let root = tempfile::tempdir().unwrap();
        for name in ["56", "1", "01", "README", "137"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        fs::write(root.path().join("2"), "not a dir").unwrap();

        let discovery = discover(root.path()).unwrap();
        let ids: Vec<u64> = discovery.chains.iter().map(|c| c.chain_id).collect();

        assert_eq!(ids, vec![1, 56, 137]);
        assert_eq!(discovery.chains[0].path, root.path().join("1"));
        assert_eq!(discovery.duplicates.len(), 1);
        assert_eq!(discovery.duplicates[0].path, root.path().join("01"));
    }

    #[assay]
    fn missing_root_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope");

        assert!(matches!(
            discover(&missing),
            Err(TokenListError::Io { .. })
        ));
    }
}
