//! Reachability probing for remote logo URLs.
//!
//! URLs are probed in batches of `concurrency` requests with a pause between batches. Each URL
//! gets up to `max_retries` retries on timeouts, connection failures, 5xx and 429, with a
//! linearly growing delay. Unreachable URLs are warnings, never failures.
use crate::{
    config::ProbeConfig,
    error::{ProbeError, Violation, ViolationKind},
    logo::LogoUri,
    registry::{assets::ListKind, cache::TokenRegistry},
    report::Report,
};
use futures::future::join_all;
use reqwest::{redirect, StatusCode};
use serde::Serialize;
use std::{collections::HashSet, path::PathBuf};
use tracing::{debug, info, warn};

/// A remote logo and the first token that references it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RemoteLogo {
    pub chain_id: u64,
    pub file: PathBuf,
    pub token: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    Reachable { status: u16 },
    Unreachable { reason: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct ProbeResult {
    pub logo: RemoteLogo,
    pub attempts: u32,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn is_reachable(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Reachable { .. })
    }
}

/// Collects the distinct remote `logoURI`s of every loaded list, common before popular.
pub fn remote_logos(registry: &TokenRegistry, raw_base_url: &str) -> Vec<RemoteLogo> {
    let mut seen = HashSet::new();
    let mut logos = Vec::new();

    for chain in registry.iter() {
        for kind in ListKind::ALL {
            let list = match chain.list(kind) {
                Some(list) => list,
                None => continue,
            };

            for (index, token) in list.tokens.iter().enumerate() {
                let is_remote = LogoUri::parse(&token.logo_uri, raw_base_url)
                    .map(|l| l.is_remote())
                    .unwrap_or(false);
                if !is_remote || !seen.insert(token.logo_uri.clone()) {
                    continue;
                }

                logos.push(RemoteLogo {
                    chain_id: chain.dir.chain_id,
                    file: chain.dir.list_path(kind),
                    token: format!("tokens[{}] {}", index, token.symbol),
                    url: token.logo_uri.clone(),
                });
            }
        }
    }

    logos
}

/// Whether a failed attempt is worth retrying
pub fn is_retryable(err: &ProbeError) -> bool {
    match err {
        ProbeError::Status(code) => {
            *code == StatusCode::TOO_MANY_REQUESTS.as_u16() || (500..600).contains(code)
        }
        ProbeError::Request(e) => e.is_timeout() || e.is_connect(),
        ProbeError::Url(_) => false,
    }
}

pub struct Prober {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl Prober {
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(redirect::Policy::limited(config.max_retries as usize))
            .build()?;

        Ok(Prober { client, config })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probes every logo, at most `concurrency` at a time. Results keep the input order.
    pub async fn probe_all(&self, logos: Vec<RemoteLogo>) -> Vec<ProbeResult> {
        let batch_size = self.config.concurrency.max(1);
        let total = logos.len();
        let mut results = Vec::with_capacity(total);
        let mut pending = logos.into_iter();

        loop {
            let batch: Vec<RemoteLogo> = pending.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            if !results.is_empty() {
                tokio::time::sleep(self.config.batch_delay()).await;
            }

            debug!("probing {} urls ({}/{})", batch.len(), results.len(), total);
            results.extend(join_all(batch.into_iter().map(|logo| self.probe(logo))).await);
        }

        let unreachable = results.iter().filter(|r| !r.is_reachable()).count();
        info!(total, unreachable, "logo probe finished");

        results
    }

    /// Probes a single URL with retries.
    pub async fn probe(&self, logo: RemoteLogo) -> ProbeResult {
        let mut attempts = 0;

        let outcome = loop {
            attempts += 1;
            match self.attempt(&logo.url).await {
                Ok(status) => break ProbeOutcome::Reachable { status },
                Err(err) if is_retryable(&err) && attempts <= self.config.max_retries => {
                    debug!("retrying {} after attempt {}: {}", logo.url, attempts, err);
                    tokio::time::sleep(self.config.retry_delay(attempts)).await;
                }
                Err(err) => {
                    warn!("{} is unreachable: {}", logo.url, err);
                    break ProbeOutcome::Unreachable {
                        reason: err.to_string(),
                    };
                }
            }
        };

        ProbeResult {
            logo,
            attempts,
            outcome,
        }
    }

    /// One HEAD request, falling back to GET for servers that don't implement HEAD.
    async fn attempt(&self, url: &str) -> Result<u16, ProbeError> {
        let url = url::Url::parse(url)?;

        let mut status = self.client.head(url.clone()).send().await?.status();
        if status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED {
            status = self.client.get(url).send().await?.status();
        }

        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(ProbeError::Status(status.as_u16()))
        }
    }
}

/// Adds an `UnreachableURL` warning to the report for every unreachable logo.
pub fn apply_to_report(results: &[ProbeResult], report: &mut Report) {
    for result in results {
        let reason = match &result.outcome {
            ProbeOutcome::Reachable { .. } => continue,
            ProbeOutcome::Unreachable { reason } => reason,
        };
        let violation = Violation::new(
            ViolationKind::UnreachableUrl,
            format!(
                "{} is unreachable after {} attempt(s): {}",
                result.logo.url, result.attempts, reason
            ),
        );

        match report.chain_mut(result.logo.chain_id) {
            Some(chain) => chain.push(&result.logo.file, Some(result.logo.token.as_str()), violation),
            None => report.warnings.push(violation.to_string()),
        }
    }
}
