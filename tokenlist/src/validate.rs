//! The validation pipeline: discover chains, check each list token by token, check the lists
//! against each other, check logo files, and fold everything into a [`Report`].
use crate::{
    config::ValidatorConfig,
    error::{TokenListError, Violation, ViolationKind},
    logo::{png_dimensions, ImageKind},
    registry::{
        assets::ListKind,
        paths::{discover, ChainDir},
    },
    report::{ChainReport, Report},
};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub use self::token::{CheckedToken, TokenContext};

pub mod consistency;
pub mod document;
pub mod token;

/// Tokens of one list as seen by the validator
#[derive(Debug)]
struct CheckedDocument {
    path: PathBuf,
    present: bool,
    tokens: Vec<CheckedToken>,
}

impl CheckedDocument {
    fn addresses(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| t.address.as_deref())
    }
}

pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Validator { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates every chain directory under `root`. Only I/O failures are returned as errors;
    /// everything wrong with the data itself ends up in the report.
    pub fn validate_root(&self, root: &Path) -> Result<Report, TokenListError> {
        let discovery = discover(root)?;
        let mut report = Report::default();

        for dup in &discovery.duplicates {
            warn!(
                "chain {} already has a directory, skipping {}",
                dup.chain_id,
                dup.path.display()
            );
            report.warnings.push(format!(
                "duplicate directory {} for chain {} was not validated",
                dup.path.display(),
                dup.chain_id
            ));
        }

        for chain in &discovery.chains {
            let chain_report = self.validate_chain(chain)?;
            report = report.merge(Report {
                chains: vec![chain_report],
                warnings: Vec::new(),
            });
        }

        info!(
            chains = report.chains.len(),
            errors = report.error_count(),
            "validation finished"
        );

        Ok(report)
    }

    /// Validates both lists of one chain, their subset relation and their logo files.
    pub fn validate_chain(&self, chain: &ChainDir) -> Result<ChainReport, TokenListError> {
        let mut report = ChainReport::new(chain.chain_id);

        let common = self.check_document(chain, ListKind::Common, &mut report)?;
        let popular = self.check_document(chain, ListKind::Popular, &mut report)?;

        self.check_subset(&common, &popular, &mut report);

        let referenced = self.check_logos(chain, [&common, &popular], &mut report)?;
        self.check_orphan_logos(chain, &referenced, &mut report)?;

        for doc in [&common, &popular] {
            report.stats.files_processed += 1;
            if report.file_is_invalid(&doc.path) {
                report.stats.files_invalid += 1;
            } else {
                report.stats.files_valid += 1;
            }
        }
        report.count_logos();
        report.records.sort_by(|a, b| a.file.cmp(&b.file));

        Ok(report)
    }

    fn check_document(
        &self,
        chain: &ChainDir,
        kind: ListKind,
        report: &mut ChainReport,
    ) -> Result<CheckedDocument, TokenListError> {
        let path = chain.list_path(kind);
        let mut doc = CheckedDocument {
            present: path.is_file(),
            path,
            tokens: Vec::new(),
        };
        debug!("validating {}", doc.path.display());

        if !doc.present {
            report.push(
                &doc.path,
                None,
                Violation::new(
                    ViolationKind::MissingDocument,
                    format!("{} is missing", kind.file_name()),
                ),
            );
            return Ok(doc);
        }

        let bytes = fs::read(&doc.path).map_err(|e| TokenListError::io(&doc.path, e))?;
        let raw = match String::from_utf8(bytes) {
            Ok(raw) => raw,
            Err(e) => {
                report.push(
                    &doc.path,
                    None,
                    Violation::new(ViolationKind::ParseError, format!("not UTF-8: {}", e)),
                );
                return Ok(doc);
            }
        };

        let values = match document::parse_tokens(&raw) {
            Ok(values) => values,
            Err(violation) => {
                report.push(&doc.path, None, violation);
                return Ok(doc);
            }
        };

        if values.is_empty() {
            warn!("{} has no tokens", doc.path.display());
            report
                .warnings
                .push(format!("{} has an empty tokens list", doc.path.display()));
        }

        let ctx = TokenContext {
            chain_id: chain.chain_id,
            policy: self.config.address_policy,
            raw_base_url: &self.config.raw_base_url,
        };

        // tokens are checked one at a time, in document order
        for (index, value) in values.iter().enumerate() {
            let checked = token::check_token(value, index, &ctx);
            for error in &checked.errors {
                report.push(&doc.path, Some(checked.id.as_str()), error.clone());
            }
            doc.tokens.push(checked);
        }

        for violation in consistency::duplicate_addresses(doc.addresses()) {
            report.push(&doc.path, None, violation);
        }
        if let Some(violation) =
            consistency::chain_id_consistency(doc.tokens.iter().filter_map(|t| t.chain_id))
        {
            report.push(&doc.path, None, violation);
        }

        Ok(doc)
    }

    /// Skipped when either list is missing or already has errors, so a broken common list
    /// doesn't turn every popular token into a subset violation.
    fn check_subset(
        &self,
        common: &CheckedDocument,
        popular: &CheckedDocument,
        report: &mut ChainReport,
    ) {
        let blocked: Vec<&CheckedDocument> = [common, popular]
            .into_iter()
            .filter(|doc| !doc.present || report.file_is_invalid(&doc.path))
            .collect();

        if !blocked.is_empty() {
            for doc in blocked {
                debug!("subset check skipped, {} has errors", doc.path.display());
                report.warnings.push(format!(
                    "subset check skipped because {} has errors",
                    doc.path.display()
                ));
            }
            return;
        }

        let missing: HashSet<&str> =
            consistency::missing_from_common(common.addresses(), popular.addresses())
                .into_iter()
                .collect();

        for token in &popular.tokens {
            if let Some(address) = token.address.as_deref() {
                if missing.contains(address) {
                    report.push(
                        &popular.path,
                        Some(token.id.as_str()),
                        consistency::subset_violation(address),
                    );
                }
            }
        }
    }

    /// Checks each distinct local logo once, attributing problems to the first token that
    /// references it. Returns every referenced logo path, including those of tokens that failed
    /// their own checks.
    fn check_logos(
        &self,
        chain: &ChainDir,
        docs: [&CheckedDocument; 2],
        report: &mut ChainReport,
    ) -> Result<HashSet<PathBuf>, TokenListError> {
        let mut referenced = HashSet::new();
        let mut checked = HashSet::new();

        for doc in docs {
            for token in &doc.tokens {
                if let Some(path) = token
                    .referenced_logo
                    .as_ref()
                    .and_then(|l| l.local_path(&chain.path))
                {
                    referenced.insert(path);
                }

                let path = match token.logo.as_ref().and_then(|l| l.local_path(&chain.path)) {
                    Some(path) => path,
                    None => continue,
                };
                if !checked.insert(path.clone()) {
                    continue;
                }

                for violation in self.check_logo_file(&path)? {
                    report.push(&doc.path, Some(token.id.as_str()), violation);
                }
            }
        }

        Ok(referenced)
    }

    /// Existence, image signature, size and (for PNG) dimensions of one logo file.
    pub fn check_logo_file(&self, path: &Path) -> Result<Vec<Violation>, TokenListError> {
        if !path.is_file() {
            return Ok(vec![Violation::new(
                ViolationKind::MissingLogoFile,
                format!("logo file {} does not exist", path.display()),
            )]);
        }

        let bytes = fs::read(path).map_err(|e| TokenListError::io(path, e))?;
        let limits = &self.config.logo;
        let mut violations = Vec::new();

        match ImageKind::sniff(&bytes) {
            ImageKind::Unknown => violations.push(Violation::new(
                ViolationKind::InvalidLogoFormat,
                format!("logo file {} is not a PNG or JPEG image", path.display()),
            )),
            ImageKind::Png => {
                if let Some((width, height)) = png_dimensions(&bytes) {
                    if width > limits.max_dimension || height > limits.max_dimension {
                        violations.push(Violation::new(
                            ViolationKind::OversizedLogoFile,
                            format!(
                                "logo file {} is {}x{}, larger than {}px",
                                path.display(),
                                width,
                                height,
                                limits.max_dimension
                            ),
                        ));
                    }
                }
            }
            ImageKind::Jpeg => {}
        }

        if bytes.len() as u64 > limits.max_size_bytes {
            violations.push(Violation::new(
                ViolationKind::OversizedLogoFile,
                format!(
                    "logo file {} is {} bytes, limit is {}",
                    path.display(),
                    bytes.len(),
                    limits.max_size_bytes
                ),
            ));
        }

        Ok(violations)
    }

    fn check_orphan_logos(
        &self,
        chain: &ChainDir,
        referenced: &HashSet<PathBuf>,
        report: &mut ChainReport,
    ) -> Result<(), TokenListError> {
        let dir = chain.logos_dir();
        if !dir.is_dir() {
            return Ok(());
        }

        let mut orphans = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| TokenListError::io(&dir, e))? {
            let path = entry.map_err(|e| TokenListError::io(&dir, e))?.path();
            if path.is_file() && !referenced.contains(&path) {
                orphans.push(path);
            }
        }
        orphans.sort();

        for orphan in orphans {
            report.warnings.push(format!(
                "logo {} is not referenced by any token",
                orphan.display()
            ));
        }

        Ok(())
    }
}
