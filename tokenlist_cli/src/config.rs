//! TokenlistCli Config
//!
//! The config file is optional. `-c FILE` picks one explicitly, otherwise
//! `./tokenlist.toml` and then `<config dir>/tokenlist/config.toml` are tried.
//! Command-line flags override whatever the file sets.
use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokenlist::{
    config::{LogoConfig, ProbeConfig, ValidatorConfig, DEFAULT_RAW_BASE_URL},
    AddressPolicy,
};

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tokenlist.toml";

/// TokenlistCli Configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenlistCliConfig {
    /// Directory holding one subdirectory per chain
    pub assets_root: PathBuf,
    /// Canonical address casing. Has no default and must be set here or with `--policy`.
    pub address_policy: Option<AddressPolicy>,
    /// Raw-content URL prefix under which the assets are published
    pub raw_base_url: String,
    pub logo: LogoConfig,
    pub probe: ProbeConfig,
    pub sync: SyncConfig,
}

impl Default for TokenlistCliConfig {
    fn default() -> Self {
        TokenlistCliConfig {
            assets_root: PathBuf::from("assets"),
            address_policy: None,
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            logo: LogoConfig::default(),
            probe: ProbeConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

/// External lists merged by `tokenlist sync` when no `--source` is given
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub sources: Vec<String>,
}

impl TokenlistCliConfig {
    /// The configured address policy, or an error telling the user how to pick one.
    pub fn policy(&self) -> Result<AddressPolicy, Error> {
        self.address_policy.ok_or_else(|| {
            ErrorKind::Config
                .context(
                    "no address policy set: add address_policy to the config \
                     or pass --policy checksum|lowercase",
                )
                .into()
        })
    }

    pub fn validator_config(&self) -> Result<ValidatorConfig, Error> {
        Ok(ValidatorConfig {
            address_policy: self.policy()?,
            raw_base_url: self.raw_base_url.clone(),
            logo: self.logo.clone(),
        })
    }

    /// Serializes the config to TOML
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }
}

/// The config file to load when none is given on the command line
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("tokenlist").join("config.toml"))
        .filter(|path| path.is_file())
}
