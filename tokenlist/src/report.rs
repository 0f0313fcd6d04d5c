//! Aggregated validation results.
//!
//! Reports are plain values. Each chain produces a [`ChainReport`], and [`Report::merge`]
//! folds them together, so nothing is shared or mutated across chains.
use crate::error::{Violation, ViolationKind};
use serde::Serialize;
use std::{
    fmt::{self, Write},
    path::{Path, PathBuf},
};

/// Violations collected for one token, or for a whole file when `token` is `None`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViolationRecord {
    pub file: PathBuf,
    pub token: Option<String>,
    pub errors: Vec<Violation>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub files_processed: usize,
    pub files_valid: usize,
    pub files_invalid: usize,
    pub missing_logos: usize,
    pub invalid_logos: usize,
    pub oversized_logos: usize,
}

impl Stats {
    fn add(&mut self, other: &Stats) {
        self.files_processed += other.files_processed;
        self.files_valid += other.files_valid;
        self.files_invalid += other.files_invalid;
        self.missing_logos += other.missing_logos;
        self.invalid_logos += other.invalid_logos;
        self.oversized_logos += other.oversized_logos;
    }

    pub fn passed(&self) -> bool {
        self.files_invalid == 0 && self.missing_logos == 0 && self.invalid_logos == 0
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ChainReport {
    pub chain_id: u64,
    pub stats: Stats,
    pub records: Vec<ViolationRecord>,
    pub warnings: Vec<String>,
}

impl ChainReport {
    pub fn new(chain_id: u64) -> Self {
        ChainReport {
            chain_id,
            ..Default::default()
        }
    }

    /// Appends a violation to the record for `(file, token)`, creating it if needed.
    pub fn push(&mut self, file: &Path, token: Option<&str>, violation: Violation) {
        match self
            .records
            .iter_mut()
            .find(|r| r.file == file && r.token.as_deref() == token)
        {
            Some(record) => record.errors.push(violation),
            None => self.records.push(ViolationRecord {
                file: file.to_path_buf(),
                token: token.map(str::to_string),
                errors: vec![violation],
            }),
        }
    }

    /// Every violation recorded against `file`
    pub fn violations_in<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a Violation> {
        self.records
            .iter()
            .filter(move |r| r.file == file)
            .flat_map(|r| r.errors.iter())
    }

    /// A file is invalid when it has any violation that is neither a logo problem nor a warning.
    pub fn file_is_invalid(&self, file: &Path) -> bool {
        self.violations_in(file)
            .any(|v| !v.kind.is_logo() && !v.kind.is_warning())
    }

    /// Recounts the logo columns from the records.
    pub(crate) fn count_logos(&mut self) {
        let mut stats = self.stats;
        stats.missing_logos = 0;
        stats.invalid_logos = 0;
        stats.oversized_logos = 0;

        for v in self.records.iter().flat_map(|r| r.errors.iter()) {
            match v.kind {
                ViolationKind::MissingLogoFile => stats.missing_logos += 1,
                ViolationKind::InvalidLogoFormat => stats.invalid_logos += 1,
                ViolationKind::OversizedLogoFile => stats.oversized_logos += 1,
                _ => {}
            }
        }

        self.stats = stats;
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    pub chains: Vec<ChainReport>,
    /// Warnings not tied to a single chain
    pub warnings: Vec<String>,
}

impl Report {
    pub fn merge(mut self, other: Report) -> Report {
        self.chains.extend(other.chains);
        self.warnings.extend(other.warnings);
        self
    }

    pub fn totals(&self) -> Stats {
        let mut totals = Stats::default();
        for chain in &self.chains {
            totals.add(&chain.stats);
        }
        totals
    }

    pub fn passed(&self) -> bool {
        self.totals().passed()
    }

    pub fn records(&self) -> impl Iterator<Item = &ViolationRecord> {
        self.chains.iter().flat_map(|c| c.records.iter())
    }

    /// All collected violations of one kind
    pub fn violations_of(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.records()
            .flat_map(|r| r.errors.iter())
            .filter(|v| v.kind == kind)
            .collect()
    }

    /// Number of violations that fail the run
    pub fn error_count(&self) -> usize {
        self.records()
            .flat_map(|r| r.errors.iter())
            .filter(|v| !v.kind.is_warning())
            .count()
    }

    pub fn chain(&self, chain_id: u64) -> Option<&ChainReport> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    pub fn chain_mut(&mut self, chain_id: u64) -> Option<&mut ChainReport> {
        self.chains.iter_mut().find(|c| c.chain_id == chain_id)
    }

    /// Human-readable report: records grouped by chain and file, then warnings and a summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> fmt::Result {
        for chain in &self.chains {
            if chain.records.is_empty() {
                continue;
            }
            writeln!(out, "chain {}", chain.chain_id)?;

            let mut current: Option<&Path> = None;
            for record in &chain.records {
                if current != Some(record.file.as_path()) {
                    writeln!(out, "  {}", record.file.display())?;
                    current = Some(record.file.as_path());
                }
                let label = record.token.as_deref().unwrap_or("(file)");
                for error in &record.errors {
                    writeln!(out, "    {}: {}", label, error)?;
                }
            }
        }

        let warnings: Vec<String> = self
            .warnings
            .iter()
            .cloned()
            .chain(self.chains.iter().flat_map(|c| {
                c.warnings
                    .iter()
                    .map(move |w| format!("chain {}: {}", c.chain_id, w))
            }))
            .collect();
        if !warnings.is_empty() {
            writeln!(out, "warnings")?;
            for w in warnings {
                writeln!(out, "  {}", w)?;
            }
        }

        let totals = self.totals();
        writeln!(out, "summary")?;
        writeln!(out, "  chains:          {}", self.chains.len())?;
        writeln!(out, "  files processed: {}", totals.files_processed)?;
        writeln!(out, "  files valid:     {}", totals.files_valid)?;
        writeln!(out, "  files invalid:   {}", totals.files_invalid)?;
        writeln!(out, "  missing logos:   {}", totals.missing_logos)?;
        writeln!(out, "  invalid logos:   {}", totals.invalid_logos)?;
        writeln!(out, "  oversized logos: {}", totals.oversized_logos)?;
        writeln!(
            out,
            "{}",
            if totals.passed() {
                "validation passed"
            } else {
                "validation FAILED"
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;

    fn chain_with(kind: ViolationKind) -> ChainReport {
        let mut chain = ChainReport::new(1);
        chain.push(
            Path::new("assets/1/common.json"),
            Some("tokens[0] TST"),
            Violation::new(kind, "boom"),
        );
        chain.count_logos();
        chain
    }

    #[assay]
    fn push_groups_by_file_and_token() {
        let mut chain = ChainReport::new(1);
        let file = Path::new("assets/1/common.json");
        chain.push(file, Some("a"), Violation::new(ViolationKind::FieldError, "x"));
        chain.push(file, Some("a"), Violation::new(ViolationKind::TypeError, "y"));
        chain.push(file, None, Violation::new(ViolationKind::DuplicateAddressError, "z"));

        assert_eq!(chain.records.len(), 2);
        assert_eq!(chain.records[0].errors.len(), 2);
        assert!(chain.file_is_invalid(file));
        assert!(!chain.file_is_invalid(Path::new("assets/1/popular.json")));
    }

    #[assay]
    fn logo_problems_do_not_invalidate_files() {
        let chain = chain_with(ViolationKind::MissingLogoFile);

        assert!(!chain.file_is_invalid(Path::new("assets/1/common.json")));
        assert_eq!(chain.stats.missing_logos, 1);
        assert!(!chain.stats.passed());
    }

    #[assay]
    fn oversized_logos_are_warnings() {
        let chain = chain_with(ViolationKind::OversizedLogoFile);
        let report = Report {
            chains: vec![chain],
            warnings: vec![],
        };

        assert_eq!(report.totals().oversized_logos, 1);
        assert!(report.passed());
        assert_eq!(report.error_count(), 0);
    }

    #[assay]
    fn merges_and_renders() {
        let mut a = Report::default();
        a.chains.push(chain_with(ViolationKind::TypeError));
        a.chains[0].stats.files_processed = 2;
        a.chains[0].stats.files_invalid = 1;
        let mut b = Report::default();
        b.warnings.push("duplicate chain directory 01".to_string());

        let report = a.merge(b);
        assert_eq!(report.totals().files_invalid, 1);
        assert!(!report.passed());

        let text = report.render_text();
        assert!(text.contains("chain 1"));
        assert!(text.contains("tokens[0] TST: TypeError: boom"));
        assert!(text.contains("duplicate chain directory 01"));
        assert!(text.ends_with("validation FAILED\n"));
    }
}
