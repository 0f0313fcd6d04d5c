/// Contains models for serializing and deserializing the `common.json` and `popular.json` lists of a chain
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Token {
    pub chain_id: u64,
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    /// Fields outside the required set (tags, extensions...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A token list document. Top-level keys other than `tokens` (name, version, timestamp...)
/// are kept in `extra` so rewriting a list does not drop them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TokenList {
    pub tokens: Vec<Token>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenList {
    /// Addresses in document order
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.address.as_str())
    }

    /// Case-insensitive membership check
    pub fn contains_address(&self, address: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| t.address.eq_ignore_ascii_case(address))
    }
}

/// The two lists every chain directory carries
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Common,
    Popular,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [ListKind::Common, ListKind::Popular];

    pub fn file_name(&self) -> &'static str {
        match self {
            ListKind::Common => "common.json",
            ListKind::Popular => "popular.json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;

    #[assay]
    fn keeps_unknown_top_level_keys() {
        let raw = r#"{"name":"Common","tokens":[{"chainId":1,"address":"0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B","name":"Test","symbol":"TST","decimals":18,"logoURI":"./logos/0xab5801a7d398351b8be11c439e05c5b3259aec9b.png"}],"version":{"major":1}}"#;
        let list: TokenList = serde_json::from_str(raw).unwrap();

        assert_eq!(list.tokens.len(), 1);
        assert_eq!(list.tokens[0].decimals, 18);
        assert!(list.contains_address("0xab5801a7d398351b8be11c439e05c5b3259aec9b"));
        assert_eq!(list.extra.get("name"), Some(&Value::from("Common")));

        let out = serde_json::to_value(&list).unwrap();
        assert!(out.get("version").is_some());
        assert_eq!(out["tokens"][0]["logoURI"], list.tokens[0].logo_uri);
    }
}
