//! Tests for the multi-chain portfolio aggregation workflow

use mockito::{Server, ServerGuard};
use rust_decimal_macros::dec;

use defichat_server::config::Config;
use defichat_server::portfolio::{PortfolioService, TtlCache};

fn service_for(server: &ServerGuard, chain_ids: Vec<&str>) -> PortfolioService {
    let config = Config {
        chain_ids: chain_ids.into_iter().map(str::to_string).collect(),
        provider_api_url: server.url(),
        name_resolver_url: format!("{}/ens/resolve", server.url()),
        ..Config::default()
    };
    PortfolioService::new(&config, TtlCache::new())
}

#[tokio::test]
async fn named_address_resolves_and_prices_end_to_end() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/ens/resolve/vitalik.eth")
        .with_status(200)
        .with_body(r#"{"address": "0xd8da6bf26964af9d7eed9e03e53415d37aa96045"}"#)
        .create_async()
        .await;
    server
        .mock(
            "GET",
            "/balance/v1.2/1/balances/0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
        )
        .with_status(200)
        .with_body(r#"{"0xTOKEN": "2000000000000000000"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/token/v1.2/1/custom/0xTOKEN")
        .with_status(200)
        .with_body(r#"{"symbol": "TOK", "name": "Token", "logoURI": "https://icons.test/tok.png"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/price/v1.1/1")
        .with_status(200)
        .with_body(r#"{"0xTOKEN": "3.50"}"#)
        .create_async()
        .await;

    let service = service_for(&server, vec!["1"]);
    let result = service.aggregate("vitalik.eth").await.unwrap();

    // Original input is echoed back, not the resolved address
    assert_eq!(result.address, "vitalik.eth");
    assert!(result.errors.is_empty());
    assert_eq!(result.values.len(), 1);

    let row = &result.values[0];
    assert_eq!(row.address, "0xTOKEN");
    assert_eq!(row.amount, dec!(2));
    assert_eq!(row.symbol.as_deref(), Some("TOK"));
    assert_eq!(row.price, Some(dec!(3.50)));
    assert_eq!(row.value, Some(dec!(7.00)));
}

#[tokio::test]
async fn zero_balances_are_excluded() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/balance/v1.2/1/balances/0xabc")
        .with_status(200)
        .with_body(r#"{"0xZERO": "0", "0xLIVE": "1000000000000000000"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/token/v1.2/1/custom/0xLIVE")
        .with_status(200)
        .with_body(r#"{"symbol": "LIV", "name": "Live"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/price/v1.1/1")
        .with_status(200)
        .with_body(r#"{}"#)
        .create_async()
        .await;

    let service = service_for(&server, vec!["1"]);
    let result = service.aggregate("0xabc").await.unwrap();

    assert_eq!(result.values.len(), 1);
    assert_eq!(result.values[0].address, "0xLIVE");
}

#[tokio::test]
async fn rows_without_symbol_are_excluded() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/balance/v1.2/1/balances/0xabc")
        .with_status(200)
        .with_body(r#"{"0xNOSYM": "5000000000000000000"}"#)
        .create_async()
        .await;
    // Registry knows nothing about this token
    server
        .mock("GET", "/token/v1.2/1/custom/0xNOSYM")
        .with_status(200)
        .with_body(r#"{}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/price/v1.1/1")
        .with_status(200)
        .with_body(r#"{"0xNOSYM": "1.00"}"#)
        .create_async()
        .await;

    let service = service_for(&server, vec!["1"]);
    let result = service.aggregate("0xabc").await.unwrap();

    assert!(result.values.is_empty());
}

#[tokio::test]
async fn missing_price_leaves_value_unset() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/balance/v1.2/1/balances/0xabc")
        .with_status(200)
        .with_body(r#"{"0xTOKEN": "1000000000000000000"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/token/v1.2/1/custom/0xTOKEN")
        .with_status(200)
        .with_body(r#"{"symbol": "TOK"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/price/v1.1/1")
        .with_status(200)
        .with_body(r#"{}"#)
        .create_async()
        .await;

    let service = service_for(&server, vec!["1"]);
    let result = service.aggregate("0xabc").await.unwrap();

    assert_eq!(result.values.len(), 1);
    assert!(result.values[0].price.is_none());
    assert!(result.values[0].value.is_none());
}

#[tokio::test]
async fn chain_order_is_preserved_in_concatenation() {
    let mut server = Server::new_async().await;

    for (chain, token, symbol) in [
        ("1", "0xAAA", "AAA"),
        ("56", "0xBBB", "BBB"),
        ("137", "0xCCC", "CCC"),
    ] {
        server
            .mock(
                "GET",
                format!("/balance/v1.2/{}/balances/0xabc", chain).as_str(),
            )
            .with_status(200)
            .with_body(format!(r#"{{"{}": "1000000000000000000"}}"#, token))
            .create_async()
            .await;
        server
            .mock(
                "GET",
                format!("/token/v1.2/{}/custom/{}", chain, token).as_str(),
            )
            .with_status(200)
            .with_body(format!(r#"{{"symbol": "{}"}}"#, symbol))
            .create_async()
            .await;
        server
            .mock("POST", format!("/price/v1.1/{}", chain).as_str())
            .with_status(200)
            .with_body(r#"{}"#)
            .create_async()
            .await;
    }

    let service = service_for(&server, vec!["1", "56", "137"]);
    let result = service.aggregate("0xabc").await.unwrap();

    let chains: Vec<&str> = result.values.iter().map(|v| v.chain_id.as_str()).collect();
    assert_eq!(chains, vec!["1", "56", "137"]);
}

#[tokio::test]
async fn failing_chain_degrades_without_aborting_the_request() {
    let mut server = Server::new_async().await;

    for (chain, token, symbol) in [("1", "0xAAA", "AAA"), ("137", "0xCCC", "CCC")] {
        server
            .mock(
                "GET",
                format!("/balance/v1.2/{}/balances/0xabc", chain).as_str(),
            )
            .with_status(200)
            .with_body(format!(r#"{{"{}": "1000000000000000000"}}"#, token))
            .create_async()
            .await;
        server
            .mock(
                "GET",
                format!("/token/v1.2/{}/custom/{}", chain, token).as_str(),
            )
            .with_status(200)
            .with_body(format!(r#"{{"symbol": "{}"}}"#, symbol))
            .create_async()
            .await;
        server
            .mock("POST", format!("/price/v1.1/{}", chain).as_str())
            .with_status(200)
            .with_body(r#"{}"#)
            .create_async()
            .await;
    }
    // Chain 56 is down
    server
        .mock("GET", "/balance/v1.2/56/balances/0xabc")
        .with_status(502)
        .create_async()
        .await;

    let service = service_for(&server, vec!["1", "56", "137"]);
    let result = service.aggregate("0xabc").await.unwrap();

    let chains: Vec<&str> = result.values.iter().map(|v| v.chain_id.as_str()).collect();
    assert_eq!(chains, vec!["1", "137"]);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].chain_id, "56");
}

#[tokio::test]
async fn metadata_failure_is_captured_per_token() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/balance/v1.2/1/balances/0xabc")
        .with_status(200)
        .with_body(r#"{"0xTOKEN": "1000000000000000000"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/token/v1.2/1/custom/0xTOKEN")
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("POST", "/price/v1.1/1")
        .with_status(200)
        .with_body(r#"{}"#)
        .create_async()
        .await;

    let service = service_for(&server, vec!["1"]);
    let result = service.aggregate("0xabc").await.unwrap();

    // Row never got a symbol, so it is excluded, and the failure is visible
    assert!(result.values.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].token.as_deref(), Some("0xTOKEN"));
}

#[tokio::test]
async fn failed_name_resolution_aborts_the_request() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/ens/resolve/nobody.eth")
        .with_status(200)
        .with_body(r#"{"address": null}"#)
        .create_async()
        .await;

    let service = service_for(&server, vec!["1"]);
    let err = service.aggregate("nobody.eth").await.unwrap_err();
    assert!(err.to_string().contains("nobody.eth"));
}

#[tokio::test]
async fn raw_addresses_skip_the_resolver() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/balance/v1.2/1/balances/0xdeadbeef")
        .with_status(200)
        .with_body(r#"{}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/price/v1.1/1")
        .with_status(200)
        .with_body(r#"{}"#)
        .create_async()
        .await;

    let service = service_for(&server, vec!["1"]);
    let result = service.aggregate("0xdeadbeef").await.unwrap();

    assert_eq!(result.address, "0xdeadbeef");
    assert!(result.values.is_empty());
    assert!(result.errors.is_empty());
}
