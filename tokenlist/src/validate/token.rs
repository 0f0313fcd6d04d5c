//! Per-token field checks
use crate::{
    address::AddressPolicy,
    error::{Violation, ViolationKind},
    logo::LogoUri,
    validate::document::type_name,
};
use serde_json::{Map, Value};

pub const REQUIRED_FIELDS: [&str; 6] = ["chainId", "address", "name", "symbol", "decimals", "logoURI"];

/// What a token is checked against
#[derive(Clone, Copy, Debug)]
pub struct TokenContext<'a> {
    /// Chain ID taken from the directory name
    pub chain_id: u64,
    pub policy: AddressPolicy,
    pub raw_base_url: &'a str,
}

/// Outcome of checking one token entry
#[derive(Clone, Debug, Default)]
pub struct CheckedToken {
    pub id: String,
    pub errors: Vec<Violation>,
    /// The address as written, if it is a string
    pub address: Option<String>,
    /// The declared chain ID, if it is an integer
    pub chain_id: Option<i64>,
    /// Set only when the logoURI passed its checks
    pub logo: Option<LogoUri>,
    /// Any logoURI of an accepted shape, even when the token failed other checks
    pub referenced_logo: Option<LogoUri>,
}

impl CheckedToken {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a single entry of `tokens`. Missing fields short-circuit: when any required field is
/// absent (or null), only `FieldError`s are reported and no type checks run for the token.
pub fn check_token(value: &Value, index: usize, ctx: &TokenContext) -> CheckedToken {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return CheckedToken {
                id: format!("tokens[{}]", index),
                errors: vec![Violation::new(
                    ViolationKind::SchemaError,
                    format!("token entry must be an object, found {}", type_name(other)),
                )],
                ..Default::default()
            }
        }
    };

    let mut checked = CheckedToken {
        id: token_id(object, index),
        address: object
            .get("address")
            .and_then(Value::as_str)
            .map(str::to_string),
        chain_id: object.get("chainId").and_then(Value::as_i64),
        referenced_logo: object
            .get("logoURI")
            .and_then(Value::as_str)
            .and_then(|uri| LogoUri::parse(uri, ctx.raw_base_url)),
        ..Default::default()
    };

    for field in missing_fields(object) {
        checked.errors.push(Violation::new(
            ViolationKind::FieldError,
            format!("missing required field \"{}\"", field),
        ));
    }
    if !checked.errors.is_empty() {
        return checked;
    }

    check_chain_id(&object["chainId"], ctx, &mut checked.errors);
    check_address(&object["address"], ctx, &mut checked.errors);
    check_text(&object["name"], "name", &mut checked.errors);
    check_text(&object["symbol"], "symbol", &mut checked.errors);
    check_decimals(&object["decimals"], &mut checked.errors);
    checked.logo = check_logo_uri(&object["logoURI"], checked.address.as_deref(), ctx, &mut checked.errors);

    checked
}

/// Required fields that are absent or null
pub fn missing_fields(object: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| matches!(object.get(*field), None | Some(Value::Null)))
        .collect()
}

fn token_id(object: &Map<String, Value>, index: usize) -> String {
    match object.get("symbol").and_then(Value::as_str) {
        Some(symbol) if !symbol.trim().is_empty() => format!("tokens[{}] {}", index, symbol),
        _ => format!("tokens[{}]", index),
    }
}

fn type_error(errors: &mut Vec<Violation>, message: String) {
    errors.push(Violation::new(ViolationKind::TypeError, message));
}

fn check_chain_id(value: &Value, ctx: &TokenContext, errors: &mut Vec<Violation>) {
    match value.as_u64() {
        Some(id) if id == ctx.chain_id => {}
        Some(id) => type_error(
            errors,
            format!(
                "chainId {} does not match chain directory {}",
                id, ctx.chain_id
            ),
        ),
        None => type_error(
            errors,
            format!("chainId must be a positive integer, found {}", value),
        ),
    }
}

fn check_address(value: &Value, ctx: &TokenContext, errors: &mut Vec<Violation>) {
    match value.as_str() {
        Some(address) => {
            if let Err(message) = ctx.policy.check(address) {
                errors.push(Violation::new(ViolationKind::AddressFormatError, message));
            }
        }
        None => type_error(
            errors,
            format!("address must be a string, found {}", type_name(value)),
        ),
    }
}

fn check_text(value: &Value, field: &str, errors: &mut Vec<Violation>) {
    match value.as_str() {
        Some(text) if text.trim().is_empty() => {
            type_error(errors, format!("{} must not be empty", field))
        }
        Some(_) => {}
        None => type_error(
            errors,
            format!("{} must be a string, found {}", field, type_name(value)),
        ),
    }
}

fn check_decimals(value: &Value, errors: &mut Vec<Violation>) {
    if value.as_u64().is_none() {
        type_error(
            errors,
            format!("decimals must be a non-negative integer, found {}", value),
        );
    }
}

fn check_logo_uri(
    value: &Value,
    address: Option<&str>,
    ctx: &TokenContext,
    errors: &mut Vec<Violation>,
) -> Option<LogoUri> {
    let uri = match value.as_str() {
        Some(uri) => uri,
        None => {
            type_error(
                errors,
                format!("logoURI must be a string, found {}", type_name(value)),
            );
            return None;
        }
    };

    let logo = match LogoUri::parse(uri, ctx.raw_base_url) {
        Some(logo) => logo,
        None => {
            type_error(
                errors,
                format!("logoURI {} does not match an accepted shape", uri),
            );
            return None;
        }
    };

    if let (Some(embedded), Some(address)) = (logo.address(), address) {
        if !embedded.eq_ignore_ascii_case(address) {
            type_error(
                errors,
                format!("logoURI {} does not reference address {}", uri, address),
            );
            return None;
        }
    }

    match logo.chain_id() {
        Some(id) if id != ctx.chain_id => {
            type_error(
                errors,
                format!("logoURI {} points at chain {}, expected {}", uri, id, ctx.chain_id),
            );
            None
        }
        _ => Some(logo),
    }
}
