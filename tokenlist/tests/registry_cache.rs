mod utils;

use assay::assay;
use tokenlist::registry::{Filter, TokenRegistry};
use utils::*;

#[assay]
fn registry_cache_happy_path() {
    let assets = Assets::new();
    assets.write(
        1,
        "common.json",
        &list(vec![
            token(1, USDT, "USDT"),
            token(1, USDC, "USDC"),
            token(1, TEST_A, "TA"),
        ]),
    );
    assets.write(1, "popular.json", &list(vec![token(1, USDC, "USDC")]));
    assets.write(10, "common.json", &list(vec![token(10, TEST_B, "TB")]));

    let registry = TokenRegistry::load(assets.root()).unwrap();
    assert_eq!(registry.chains(), vec![1, 10]);
    assert_eq!(registry.tokens(1).len(), 3);
    assert_eq!(registry.popular(1).len(), 1);
    assert!(registry.popular(10).is_empty());
    assert!(registry.tokens(137).is_empty());

    // lookups ignore address casing
    let token = registry.get_token(1, &USDC.to_lowercase()).unwrap();
    assert_eq!(token.symbol, "USDC");
    assert!(registry.get_token(10, USDC).is_none());

    let result = registry.tokens_filtered(1, &Filter::Symbol("usdt".to_string()));
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].address, USDT);

    let result = registry.tokens_filtered(1, &Filter::Name("token".to_string()));
    assert_eq!(result.len(), 3);

    let result = registry.tokens_filtered(1, &Filter::Decimals(6));
    assert!(result.is_empty());
}

#[assay]
fn unparsable_lists_are_skipped() {
    let assets = Assets::new();
    assets.write_raw(1, "common.json", "not json");
    assets.write(1, "popular.json", &list(vec![token(1, USDC, "USDC")]));

    let registry = TokenRegistry::load(assets.root()).unwrap();
    let chain = registry.chain(1).unwrap();
    assert!(chain.common.is_none());
    assert!(registry.tokens(1).is_empty());
    assert_eq!(registry.popular(1).len(), 1);
    assert!(registry.get_token(1, USDC).is_some());
}
