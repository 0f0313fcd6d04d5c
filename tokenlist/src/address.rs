//! Account address parsing and canonical casing
use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::{fmt, str::FromStr};

const ADDRESS_HEX_LEN: usize = 40;

/// A 20 byte account address, parsed from its `0x` prefixed hex rendering.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Address([u8; 20]);

impl Address {
    /// Parses `0x` followed by 40 hex digits in any casing. Casing is not checked here,
    /// see [`AddressPolicy::check`] for that.
    pub fn parse(input: &str) -> Result<Address, AddressError> {
        let digits = input
            .strip_prefix("0x")
            .ok_or_else(|| AddressError::MissingPrefix(input.to_string()))?;

        if digits.len() != ADDRESS_HEX_LEN {
            return Err(AddressError::InvalidLength(input.to_string(), digits.len()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AddressError::InvalidHex(input.to_string()))?;

        Ok(Address(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase rendering, e.g. `0xab5801a7d398351b8be11c439e05c5b3259aec9b`
    pub fn to_lowercase(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksum rendering. A hex letter is uppercased when the matching
    /// nibble of keccak256(lowercase hex) is >= 8.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(ADDRESS_HEX_LEN + 2);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }

        out
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

/// Which casing counts as canonical for addresses stored in the lists.
///
/// Historically the validator required checksum casing while the normalizer wrote lowercase.
/// There is no default that resolves this silently: callers pick one explicitly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressPolicy {
    Checksum,
    Lowercase,
}

impl AddressPolicy {
    /// Renders `address` in this policy's canonical form.
    pub fn render(&self, address: &Address) -> String {
        match self {
            AddressPolicy::Checksum => address.to_checksum(),
            AddressPolicy::Lowercase => address.to_lowercase(),
        }
    }

    /// Parses `input` and checks it is written in canonical form. On success the parsed
    /// address is returned, otherwise a message suitable for a violation record.
    pub fn check(&self, input: &str) -> Result<Address, String> {
        let address = Address::parse(input).map_err(|e| e.to_string())?;
        let expected = self.render(&address);

        if expected != input {
            return Err(match self {
                AddressPolicy::Checksum => {
                    format!("address {} is not checksummed, expected {}", input, expected)
                }
                AddressPolicy::Lowercase => {
                    format!("address {} is not lowercase, expected {}", input, expected)
                }
            });
        }

        Ok(address)
    }
}

impl fmt::Display for AddressPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressPolicy::Checksum => f.write_str("checksum"),
            AddressPolicy::Lowercase => f.write_str("lowercase"),
        }
    }
}

impl FromStr for AddressPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "checksum" => Ok(AddressPolicy::Checksum),
            "lowercase" => Ok(AddressPolicy::Lowercase),
            other => Err(format!(
                "unknown address policy '{}', expected 'checksum' or 'lowercase'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;

    #[assay]
    fn checksums_known_addresses() {
        // EIP-55 reference vectors
        let vectors = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B",
            "0xdAC17F958D2ee523a2206206994597C13D831ec7",
        ];

        for v in vectors {
            let address = Address::parse(&v.to_lowercase()).unwrap();
            assert_eq!(address.to_checksum(), v);
        }
    }

    #[assay]
    fn rejects_malformed_addresses() {
        assert_eq!(
            Address::parse("ab5801a7d398351b8be11c439e05c5b3259aec9b"),
            Err(AddressError::MissingPrefix(
                "ab5801a7d398351b8be11c439e05c5b3259aec9b".to_string()
            ))
        );
        assert!(matches!(
            Address::parse("0xab5801"),
            Err(AddressError::InvalidLength(_, 6))
        ));
        assert!(matches!(
            Address::parse("0xzz5801a7d398351b8be11c439e05c5b3259aec9b"),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[assay]
    fn policy_checks_casing() {
        let checksum = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";
        let lower = "0xab5801a7d398351b8be11c439e05c5b3259aec9b";

        assert!(AddressPolicy::Checksum.check(checksum).is_ok());
        assert!(AddressPolicy::Checksum.check(lower).is_err());
        assert!(AddressPolicy::Lowercase.check(lower).is_ok());
        assert!(AddressPolicy::Lowercase.check(checksum).is_err());

        let address = Address::parse(lower).unwrap();
        assert_eq!(AddressPolicy::Checksum.render(&address), checksum);
        assert_eq!(AddressPolicy::Lowercase.render(&address), lower);
    }

    #[assay]
    fn parses_policy_names() {
        assert_eq!(
            "checksum".parse::<AddressPolicy>().unwrap(),
            AddressPolicy::Checksum
        );
        assert_eq!(
            "Lowercase".parse::<AddressPolicy>().unwrap(),
            AddressPolicy::Lowercase
        );
        assert!("mixed".parse::<AddressPolicy>().is_err());
    }
}
