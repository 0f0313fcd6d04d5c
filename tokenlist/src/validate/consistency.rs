//! Checks that span several tokens or both lists of a chain
use crate::error::{Violation, ViolationKind};
use std::collections::{BTreeSet, HashMap, HashSet};

/// One `DuplicateAddressError` per address that appears more than once (ignoring case),
/// naming every literal spelling in document order.
pub fn duplicate_addresses<'a>(addresses: impl IntoIterator<Item = &'a str>) -> Vec<Violation> {
    let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
    let mut index = HashMap::<String, usize>::new();

    for address in addresses {
        let key = address.to_ascii_lowercase();
        match index.get(&key) {
            Some(&i) => groups[i].1.push(address),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![address]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, values)| values.len() > 1)
        .map(|(_, values)| {
            Violation::new(
                ViolationKind::DuplicateAddressError,
                format!("duplicate address: {}", values.join(", ")),
            )
        })
        .collect()
}

/// A single `ChainIdMismatchError` when the tokens of a document declare more than one chain ID.
pub fn chain_id_consistency(ids: impl IntoIterator<Item = i64>) -> Option<Violation> {
    let distinct: BTreeSet<i64> = ids.into_iter().collect();
    if distinct.len() < 2 {
        return None;
    }

    let listed: Vec<String> = distinct.iter().map(|id| id.to_string()).collect();
    Some(Violation::new(
        ViolationKind::ChainIdMismatchError,
        format!("tokens declare multiple chainId values: {}", listed.join(", ")),
    ))
}

/// Popular addresses that have no case-insensitive match in the common list, in popular order.
pub fn missing_from_common<'a>(
    common: impl IntoIterator<Item = &'a str>,
    popular: impl IntoIterator<Item = &'a str>,
) -> Vec<&'a str> {
    let known: HashSet<String> = common
        .into_iter()
        .map(|a| a.to_ascii_lowercase())
        .collect();

    popular
        .into_iter()
        .filter(|a| !known.contains(&a.to_ascii_lowercase()))
        .collect()
}

pub fn subset_violation(address: &str) -> Violation {
    Violation::new(
        ViolationKind::SubsetViolationError,
        format!("popular token {} is not in common.json", address),
    )
}
