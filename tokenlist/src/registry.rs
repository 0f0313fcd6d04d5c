use crate::error::TokenListError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{fs, path::Path};

pub use self::{assets::*, paths::*};

#[cfg(feature = "registry-cache")]
pub use self::cache::*;

pub mod assets;
#[cfg(feature = "registry-cache")]
pub mod cache;
pub mod paths;

/// Reads and deserializes a token list from disk. The result will contain `None` if the file
/// is not present.
pub fn read_list(path: &Path) -> Result<Option<TokenList>, TokenListError> {
    if !path.is_file() {
        return Ok(None);
    }

    let data = fs::read_to_string(path).map_err(|e| TokenListError::io(path, e))?;

    Ok(Some(parse_json(&data)?))
}

/// Reads a list as a raw JSON document, keeping key order and unknown fields. The result will
/// contain `None` if the file is not present.
pub fn read_document(path: &Path) -> Result<Option<Value>, TokenListError> {
    if !path.is_file() {
        return Ok(None);
    }

    let data = fs::read_to_string(path).map_err(|e| TokenListError::io(path, e))?;

    Ok(Some(parse_json(&data)?))
}

/// Writes a document with two space indentation and a trailing newline.
pub fn write_document(path: &Path, doc: &Value) -> Result<(), TokenListError> {
    let mut data = serde_json::to_string_pretty(doc)?;
    data.push('\n');

    fs::write(path, data).map_err(|e| TokenListError::io(path, e))
}

/// Retrieves an external token list, e.g. a published Uniswap-style list, as a raw document.
///
/// # Arguments
///
/// * `url` - Location of a JSON document with a `tokens` array
pub async fn fetch_document(url: &str) -> Result<Value, TokenListError> {
    let data = get_file_content(url).await?;

    parse_json(&data)
}

async fn get_file_content(url: &str) -> Result<String, TokenListError> {
    Ok(reqwest::get(url)
        .await?
        .error_for_status()?
        .text()
        .await?)
}

fn parse_json<T>(data: &str) -> Result<T, TokenListError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(data).map_err(|e| e.into())
}
