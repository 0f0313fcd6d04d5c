#![allow(dead_code)]

use serde_json::{json, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Valid EIP-55 checksummed addresses
pub const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
pub const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const TEST_A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const TEST_B: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

/// PNG signature followed by an IHDR chunk declaring `width` x `height`
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

/// A token entry with every required field and a relative logo URI
pub fn token(chain_id: u64, address: &str, symbol: &str) -> Value {
    json!({
        "chainId": chain_id,
        "address": address,
        "name": format!("{} Token", symbol),
        "symbol": symbol,
        "decimals": 18,
        "logoURI": format!("./logos/{}.png", address),
    })
}

pub fn list(tokens: Vec<Value>) -> Value {
    json!({ "name": "Test List", "tokens": tokens })
}

/// An assets root in a temporary directory
pub struct Assets {
    dir: TempDir,
}

impl Assets {
    pub fn new() -> Assets {
        Assets {
            dir: tempfile::tempdir().expect("could not create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn chain_dir(&self, chain_id: u64) -> PathBuf {
        let path = self.root().join(chain_id.to_string());
        fs::create_dir_all(path.join("logos")).expect("could not create chain dir");
        path
    }

    pub fn write(&self, chain_id: u64, file_name: &str, doc: &Value) -> PathBuf {
        self.write_raw(chain_id, file_name, &serde_json::to_string_pretty(doc).unwrap())
    }

    pub fn write_raw(&self, chain_id: u64, file_name: &str, raw: &str) -> PathBuf {
        let path = self.chain_dir(chain_id).join(file_name);
        fs::write(&path, raw).expect("could not write list");
        path
    }

    pub fn write_logo(&self, chain_id: u64, address: &str, bytes: &[u8]) -> PathBuf {
        let path = self
            .chain_dir(chain_id)
            .join("logos")
            .join(format!("{}.png", address));
        fs::write(&path, bytes).expect("could not write logo");
        path
    }

    /// Writes both lists with the same tokens plus a logo for each one.
    pub fn valid_chain(&self, chain_id: u64, addresses: &[(&str, &str)]) {
        let tokens: Vec<Value> = addresses
            .iter()
            .map(|(address, symbol)| token(chain_id, address, symbol))
            .collect();

        self.write(chain_id, "common.json", &list(tokens.clone()));
        self.write(chain_id, "popular.json", &list(tokens));
        for (address, _) in addresses {
            self.write_logo(chain_id, address, &png(64, 64));
        }
    }
}
