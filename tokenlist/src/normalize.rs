//! One-shot rewrite of address casing across lists and logo file names.
//!
//! Works on raw JSON values so key order and fields outside the token model survive.
use crate::{
    address::{Address, AddressPolicy},
    config::DEFAULT_RAW_BASE_URL,
    error::TokenListError,
    logo::LogoUri,
    registry::{
        self,
        assets::ListKind,
        paths::{discover, ChainDir},
    },
};
use serde::Serialize;
use serde_json::Value;
use std::{fs, path::Path};
use tracing::{info, warn};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NormalizeSummary {
    pub files_changed: usize,
    pub addresses_rewritten: usize,
    pub logo_uris_rewritten: usize,
    pub logos_renamed: usize,
    /// Addresses that could not be parsed and were left as they are
    pub invalid_addresses: Vec<String>,
    /// Files that are not valid JSON and were skipped
    pub skipped_files: Vec<String>,
}

impl NormalizeSummary {
    fn merge(&mut self, other: NormalizeSummary) {
        self.files_changed += other.files_changed;
        self.addresses_rewritten += other.addresses_rewritten;
        self.logo_uris_rewritten += other.logo_uris_rewritten;
        self.logos_renamed += other.logos_renamed;
        self.invalid_addresses.extend(other.invalid_addresses);
        self.skipped_files.extend(other.skipped_files);
    }
}

/// Normalizes every chain under `root`, recognizing repository logo URLs under the default
/// raw base URL.
pub fn normalize(
    root: &Path,
    policy: AddressPolicy,
    dry_run: bool,
) -> Result<NormalizeSummary, TokenListError> {
    Normalizer {
        policy,
        raw_base_url: DEFAULT_RAW_BASE_URL,
        dry_run,
    }
    .normalize_root(root)
}

pub struct Normalizer<'a> {
    pub policy: AddressPolicy,
    pub raw_base_url: &'a str,
    /// Compute the summary without touching any file
    pub dry_run: bool,
}

impl<'a> Normalizer<'a> {
    pub fn normalize_root(&self, root: &Path) -> Result<NormalizeSummary, TokenListError> {
        let mut summary = NormalizeSummary::default();

        for chain in discover(root)?.chains {
            summary.merge(self.normalize_chain(&chain)?);
        }

        info!(
            files = summary.files_changed,
            addresses = summary.addresses_rewritten,
            logos = summary.logos_renamed,
            dry_run = self.dry_run,
            "normalized to {}",
            self.policy
        );

        Ok(summary)
    }

    pub fn normalize_chain(&self, chain: &ChainDir) -> Result<NormalizeSummary, TokenListError> {
        let mut summary = NormalizeSummary::default();

        for kind in ListKind::ALL {
            let path = chain.list_path(kind);
            if !path.is_file() {
                continue;
            }

            let raw = fs::read_to_string(&path).map_err(|e| TokenListError::io(&path, e))?;
            let mut doc: Value = match serde_json::from_str(&raw) {
                Ok(doc) => doc,
                Err(err) => {
                    warn!("skipping {}: {}", path.display(), err);
                    summary.skipped_files.push(path.display().to_string());
                    continue;
                }
            };

            if self.normalize_document(&mut doc, &mut summary) {
                summary.files_changed += 1;
                if !self.dry_run {
                    registry::write_document(&path, &doc)?;
                }
            }
        }

        self.rename_logos(chain, &mut summary)?;

        Ok(summary)
    }

    /// Rewrites token addresses and local logo URIs in place. Returns whether anything changed.
    pub fn normalize_document(&self, doc: &mut Value, summary: &mut NormalizeSummary) -> bool {
        let tokens = match doc.get_mut("tokens").and_then(Value::as_array_mut) {
            Some(tokens) => tokens,
            None => return false,
        };
        let mut changed = false;

        for token in tokens.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(Value::String(address)) = token.get_mut("address") {
                match Address::parse(address) {
                    Ok(parsed) => {
                        let canonical = self.policy.render(&parsed);
                        if *address != canonical {
                            *address = canonical;
                            summary.addresses_rewritten += 1;
                            changed = true;
                        }
                    }
                    Err(_) => summary.invalid_addresses.push(address.clone()),
                }
            }

            if let Some(Value::String(uri)) = token.get_mut("logoURI") {
                if let Some(rewritten) = self.canonical_logo_uri(uri) {
                    *uri = rewritten;
                    summary.logo_uris_rewritten += 1;
                    changed = true;
                }
            }
        }

        changed
    }

    /// The logo URI with its embedded address in canonical casing, `None` when already canonical
    /// or not a local logo.
    fn canonical_logo_uri(&self, uri: &str) -> Option<String> {
        let logo = LogoUri::parse(uri, self.raw_base_url)?;
        let embedded = logo.address()?;
        let canonical = self.policy.render(&Address::parse(embedded).ok()?);
        if canonical == embedded {
            return None;
        }

        let at = uri.rfind(embedded)?;
        let mut rewritten = uri.to_string();
        rewritten.replace_range(at..at + embedded.len(), &canonical);

        Some(rewritten)
    }

    fn rename_logos(
        &self,
        chain: &ChainDir,
        summary: &mut NormalizeSummary,
    ) -> Result<(), TokenListError> {
        let dir = chain.logos_dir();
        if !dir.is_dir() {
            return Ok(());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| TokenListError::io(&dir, e))? {
            entries.push(entry.map_err(|e| TokenListError::io(&dir, e))?.path());
        }
        entries.sort();

        for path in entries {
            let (stem, ext) = match (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|s| s.to_str()),
            ) {
                (Some(stem), Some(ext)) => (stem, ext),
                _ => continue,
            };
            let address = match Address::parse(stem) {
                Ok(address) => address,
                Err(_) => continue,
            };

            let canonical = self.policy.render(&address);
            if canonical == stem {
                continue;
            }

            let target = dir.join(format!("{}.{}", canonical, ext));
            // on case-sensitive file systems both spellings can exist side by side
            if target.exists() && !same_file(&path, &target) {
                warn!(
                    "not renaming {}: {} already exists",
                    path.display(),
                    target.display()
                );
                continue;
            }

            if !self.dry_run {
                fs::rename(&path, &target).map_err(|e| TokenListError::io(&path, e))?;
            }
            summary.logos_renamed += 1;
        }

        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
