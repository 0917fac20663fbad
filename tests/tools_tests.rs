//! Tests for the JSON-RPC tool surface

use mockito::{Matcher, Server};
use serde_json::json;

use defichat_server::{
    config::Config,
    tools::{handle_rpc_request, protocol::RpcRequest},
    AppState,
};

fn rpc(method: &str, params: serde_json::Value) -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0".to_string(),
        id: json!(1),
        method: method.to_string(),
        params: Some(params),
    }
}

#[tokio::test]
async fn tools_list_advertises_the_tool_set() {
    let state = AppState::from_config(Config::default());

    let response = handle_rpc_request(rpc("tools/list", json!({})), state)
        .await
        .unwrap();

    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["asset_price", "swap_tokens", "send_tokens", "portfolio"]
    );
}

#[tokio::test]
async fn unknown_method_is_rejected() {
    let state = AppState::from_config(Config::default());

    let response = handle_rpc_request(rpc("no_such_method", json!({})), state)
        .await
        .unwrap();

    assert_eq!(response.error.unwrap().code, -32601);
}

#[tokio::test]
async fn notifications_get_no_reply() {
    let state = AppState::from_config(Config::default());
    let req = RpcRequest {
        jsonrpc: "2.0".to_string(),
        id: serde_json::Value::Null,
        method: "tools/list".to_string(),
        params: None,
    };

    assert!(handle_rpc_request(req, state).await.is_none());
}

#[tokio::test]
async fn missing_tool_argument_is_invalid_params() {
    let state = AppState::from_config(Config::default());

    let response = handle_rpc_request(
        rpc("tools/call", json!({ "name": "asset_price", "arguments": {} })),
        state,
    )
    .await
    .unwrap();

    assert_eq!(response.error.unwrap().code, -32602);
}

#[tokio::test]
async fn asset_price_tool_returns_the_index_price() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v2/public/get_index_price")
        .match_query(Matcher::UrlEncoded("index_name".into(), "btc_usd".into()))
        .with_status(200)
        .with_body(r#"{"result": {"index_price": 64250.5}}"#)
        .create_async()
        .await;

    let config = Config {
        exchange_api_url: server.url(),
        ..Config::default()
    };
    let state = AppState::from_config(config);

    // Direct-call alias form
    let response = handle_rpc_request(rpc("asset_price", json!({ "asset": "BTC" })), state)
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["asset"], "BTC");
    assert_eq!(result["price"], json!(64250.5));
}

#[tokio::test]
async fn send_tokens_resolves_named_recipients() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/ens/resolve/friend.eth")
        .with_status(200)
        .with_body(r#"{"address": "0xfeedface"}"#)
        .create_async()
        .await;

    let config = Config {
        name_resolver_url: format!("{}/ens/resolve", server.url()),
        ..Config::default()
    };
    let state = AppState::from_config(config);

    let response = handle_rpc_request(
        rpc(
            "tools/call",
            json!({
                "name": "send_tokens",
                "arguments": { "from": "0xme", "to": "friend.eth", "amount": "1000" }
            }),
        ),
        state,
    )
    .await
    .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["ok"], json!(true));
    assert_eq!(result["to"], "0xfeedface");
}
