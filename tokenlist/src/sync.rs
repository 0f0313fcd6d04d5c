//! Pulls tokens from external lists into a chain's `common.json`.
//!
//! Lists are merged as raw JSON values so existing entries are written back exactly as they
//! were read, key order included.
use crate::{
    address::{Address, AddressPolicy},
    error::TokenListError,
    registry::{self, assets::ListKind, paths::ChainDir},
    validate::token::missing_fields,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MergeSummary {
    pub added: usize,
    pub skipped: usize,
}

impl MergeSummary {
    fn add(&mut self, other: MergeSummary) {
        self.added += other.added;
        self.skipped += other.skipped;
    }
}

/// Downloads an external list with the same `tokens` schema.
pub async fn fetch_token_list(url: &str) -> Result<Value, TokenListError> {
    debug!("fetching {}", url);
    let doc = registry::fetch_document(url).await?;
    if !doc.get("tokens").map_or(false, Value::is_array) {
        return Err(TokenListError::InvalidDocument(url.to_string()));
    }

    Ok(doc)
}

/// Appends the tokens of `incoming` that belong to `chain_id`, carry every required field and
/// are not yet in `common`. Added addresses are rendered per `policy`. Existing entries are
/// never touched.
pub fn merge_tokens(
    common: &mut Value,
    incoming: &Value,
    chain_id: u64,
    policy: AddressPolicy,
) -> MergeSummary {
    let mut summary = MergeSummary::default();
    let incoming = match incoming.get("tokens").and_then(Value::as_array) {
        Some(tokens) => tokens,
        None => return summary,
    };
    let tokens = match common.get_mut("tokens").and_then(Value::as_array_mut) {
        Some(tokens) => tokens,
        None => return summary,
    };

    let mut known: HashSet<String> = tokens
        .iter()
        .filter_map(|t| t.get("address").and_then(Value::as_str))
        .map(str::to_ascii_lowercase)
        .collect();

    for token in incoming {
        let object = match token.as_object() {
            Some(object) if is_complete(object) => object,
            _ => {
                debug!("skipping incomplete token {}", token);
                summary.skipped += 1;
                continue;
            }
        };

        if object["chainId"].as_u64() != Some(chain_id) {
            summary.skipped += 1;
            continue;
        }

        let address = match object["address"].as_str().map(Address::parse) {
            Some(Ok(address)) => address,
            _ => {
                debug!("skipping invalid address {}", object["address"]);
                summary.skipped += 1;
                continue;
            }
        };

        if !known.insert(address.to_lowercase()) {
            summary.skipped += 1;
            continue;
        }

        let mut added = object.clone();
        added.insert("address".to_string(), Value::String(policy.render(&address)));
        tokens.push(Value::Object(added));
        summary.added += 1;
    }

    summary
}

/// Every required field present, text fields non-empty and decimals a non-negative integer
fn is_complete(object: &Map<String, Value>) -> bool {
    let non_empty = |field: &str| {
        object[field]
            .as_str()
            .map_or(false, |text| !text.trim().is_empty())
    };

    missing_fields(object).is_empty()
        && ["address", "name", "symbol", "logoURI"]
            .into_iter()
            .all(non_empty)
        && object["decimals"].as_u64().is_some()
}

/// Fetches every source, merges them into the chain's common list in order and writes the
/// result unless `dry_run` is set or nothing was added. A missing `common.json` starts out
/// empty.
pub async fn sync_chain(
    chain: &ChainDir,
    sources: &[String],
    policy: AddressPolicy,
    dry_run: bool,
) -> Result<MergeSummary, TokenListError> {
    let path = chain.list_path(ListKind::Common);
    let mut common = registry::read_document(&path)?.unwrap_or_else(|| json!({ "tokens": [] }));
    if !common.get("tokens").map_or(false, Value::is_array) {
        return Err(TokenListError::InvalidDocument(path.display().to_string()));
    }
    let mut summary = MergeSummary::default();

    for url in sources {
        let incoming = fetch_token_list(url).await?;
        let merged = merge_tokens(&mut common, &incoming, chain.chain_id, policy);
        info!(
            added = merged.added,
            skipped = merged.skipped,
            "merged {} into chain {}",
            url,
            chain.chain_id
        );
        summary.add(merged);
    }

    if summary.added > 0 && !dry_run {
        registry::write_document(&path, &common)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;
    use std::{fs, path::Path};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    const CHECKSUM: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
    const OTHER: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    const THIRD: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn token(chain_id: u64, address: &str, symbol: &str) -> Value {
        json!({
            "chainId": chain_id,
            "address": address,
            "name": symbol,
            "symbol": symbol,
            "decimals": 6,
            "logoURI": format!("./logos/{}.png", address),
        })
    }

    /// An existing entry without a logoURI and with an extra key, under a leading `name`
    fn existing_common() -> String {
        let doc = json!({
            "name": "Common",
            "tokens": [{
                "chainId": 1,
                "address": CHECKSUM,
                "name": "Tether",
                "symbol": "USDT",
                "decimals": 6,
                "tags": ["stable"]
            }],
            "version": {"major": 1}
        });
        let mut data = serde_json::to_string_pretty(&doc).unwrap();
        data.push('\n');
        data
    }

    /// Serves `body` as a JSON response to every connection.
    async fn serve(body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let body = body.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 2048];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}/tokens.json", addr)
    }

    fn chain_dir(root: &Path) -> ChainDir {
        let path = root.join("1");
        fs::create_dir_all(&path).unwrap();
        ChainDir { chain_id: 1, path }
    }

    #[assay]
    fn merges_new_tokens_only() {
        let mut common = json!({ "tokens": [token(1, CHECKSUM, "USDT")] });
        let incoming = json!({
            "tokens": [
                token(1, &CHECKSUM.to_lowercase(), "USDT"),
                token(1, &OTHER.to_lowercase(), "USDC"),
                token(10, OTHER, "USDC"),
                token(1, "0x1234", "BAD"),
                token(1, OTHER, "USDC"),
            ]
        });

        let summary = merge_tokens(&mut common, &incoming, 1, AddressPolicy::Checksum);
        assert_eq!(summary, MergeSummary { added: 1, skipped: 4 });
        assert_eq!(common["tokens"].as_array().unwrap().len(), 2);
        assert_eq!(common["tokens"][0]["address"], CHECKSUM);
        assert_eq!(common["tokens"][1]["address"], OTHER);
        assert_eq!(common["tokens"][1]["symbol"], "USDC");
    }

    #[assay]
    fn renders_lowercase_when_configured() {
        let mut common = json!({ "tokens": [] });
        let incoming = json!({ "tokens": [token(1, OTHER, "USDC")] });

        merge_tokens(&mut common, &incoming, 1, AddressPolicy::Lowercase);
        assert_eq!(common["tokens"][0]["address"], OTHER.to_lowercase());
    }

    #[assay]
    fn incomplete_tokens_are_skipped() {
        let mut common: Value = serde_json::from_str(&existing_common()).unwrap();
        let before = common["tokens"][0].clone();

        let mut empty_name = token(1, OTHER, "USDC");
        empty_name["name"] = json!("");
        let mut null_decimals = token(1, OTHER, "USDC");
        null_decimals["decimals"] = Value::Null;
        let incoming = json!({
            "tokens": [
                {"chainId": 1, "address": THIRD},
                empty_name,
                null_decimals,
                "not a token",
            ]
        });

        let summary = merge_tokens(&mut common, &incoming, 1, AddressPolicy::Checksum);
        assert_eq!(summary, MergeSummary { added: 0, skipped: 4 });
        assert_eq!(common["tokens"].as_array().unwrap().len(), 1);
        assert_eq!(common["tokens"][0], before);
        assert!(common["tokens"][0].get("logoURI").is_none());
    }

    #[assay]
    async fn sync_writes_merged_list() {
        let root = tempfile::tempdir().unwrap();
        let chain = chain_dir(root.path());
        let path = chain.list_path(ListKind::Common);
        let original = existing_common();
        fs::write(&path, &original).unwrap();

        let mut incoming = token(1, &OTHER.to_lowercase(), "USDC");
        incoming["extensions"] = json!({"bridge": "native"});
        let url = serve(json!({ "tokens": [incoming, token(1, CHECKSUM, "USDT")] }).to_string()).await;

        let summary = sync_chain(&chain, &[url], AddressPolicy::Checksum, false)
            .await
            .unwrap();
        assert_eq!(summary, MergeSummary { added: 1, skipped: 1 });

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"name\": \"Common\",\n  \"tokens\""));
        assert!(written.ends_with("}\n"));

        let doc: Value = serde_json::from_str(&written).unwrap();
        let original: Value = serde_json::from_str(&original).unwrap();
        assert_eq!(doc["tokens"][0], original["tokens"][0]);
        assert!(doc["tokens"][0].get("logoURI").is_none());
        assert_eq!(doc["version"], original["version"]);

        let added = doc["tokens"][1].as_object().unwrap();
        assert_eq!(added["address"], OTHER);
        assert_eq!(added["extensions"]["bridge"], "native");
        let keys: Vec<&str> = added.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["chainId", "address", "name", "symbol", "decimals", "logoURI", "extensions"]
        );
    }

    #[assay]
    async fn dry_run_leaves_the_list_alone() {
        let root = tempfile::tempdir().unwrap();
        let chain = chain_dir(root.path());
        let path = chain.list_path(ListKind::Common);
        let original = existing_common();
        fs::write(&path, &original).unwrap();

        let url = serve(json!({ "tokens": [token(1, OTHER, "USDC")] }).to_string()).await;

        let summary = sync_chain(&chain, &[url], AddressPolicy::Checksum, true)
            .await
            .unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[assay]
    async fn nothing_is_written_without_additions() {
        let root = tempfile::tempdir().unwrap();
        let chain = chain_dir(root.path());
        let path = chain.list_path(ListKind::Common);
        // compact on purpose: any rewrite would pretty print it
        let original = json!({"name": "Common", "tokens": [token(1, CHECKSUM, "USDT")]}).to_string();
        fs::write(&path, &original).unwrap();

        let url = serve(
            json!({ "tokens": [token(1, &CHECKSUM.to_lowercase(), "USDT"), {"chainId": 1}] })
                .to_string(),
        )
        .await;

        let summary = sync_chain(&chain, &[url], AddressPolicy::Checksum, false)
            .await
            .unwrap();
        assert_eq!(summary, MergeSummary { added: 0, skipped: 2 });
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[assay]
    async fn missing_common_list_starts_empty() {
        let root = tempfile::tempdir().unwrap();
        let chain = chain_dir(root.path());
        let url = serve(json!({ "tokens": [token(1, OTHER, "USDC")] }).to_string()).await;

        sync_chain(&chain, &[url], AddressPolicy::Lowercase, false)
            .await
            .unwrap();

        let doc = registry::read_document(&chain.list_path(ListKind::Common))
            .unwrap()
            .unwrap();
        assert_eq!(doc["tokens"][0]["address"], OTHER.to_lowercase());
    }

    #[assay]
    async fn sources_without_tokens_are_errors() {
        let root = tempfile::tempdir().unwrap();
        let chain = chain_dir(root.path());
        let url = serve(json!({ "name": "Not a list" }).to_string()).await;

        let result = sync_chain(&chain, &[url], AddressPolicy::Checksum, false).await;
        assert!(matches!(result, Err(TokenListError::InvalidDocument(_))));
        assert!(!chain.list_path(ListKind::Common).exists());
    }
}
