// src/main.rs

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use defichat_server::{
    api::{
        chat::{delete_chat_handler, post_chat_handler},
        health::health_handler,
        portfolio::get_portfolio_handler,
        price::get_price_handler,
        swap::post_swap_quote_handler,
        transfer::post_transfer_handler,
    },
    config::Config,
    tools::{
        handle_rpc_request,
        protocol::{error_codes, RpcRequest, RpcResponse},
    },
    AppState,
};
use std::env;
use std::net::SocketAddr;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) {
    let api_router = Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Chat
        .route("/chat", post(post_chat_handler).delete(delete_chat_handler))
        // Crypto tools over REST
        .route("/portfolio/:address", get(get_portfolio_handler))
        .route("/price/:asset", get(get_price_handler))
        .route("/swap/quote", post(post_swap_quote_handler))
        .route("/transfer", post(post_transfer_handler))
        // JSON-RPC endpoint for tool calls
        .route("/rpc", post(rpc_handler));

    let app = Router::new()
        .nest("/api", api_router)
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    info!("HTTP server listening on {}", addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}

// Forward JSON-RPC requests over HTTP to the tool dispatcher
async fn rpc_handler(State(state): State<AppState>, Json(req): Json<RpcRequest>) -> Json<RpcResponse> {
    match handle_rpc_request(req, state).await {
        Some(resp) => Json(resp),
        None => Json(RpcResponse::error(
            serde_json::Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}

// --- Stdio Tool Server Logic ---
async fn run_stdio_server(state: AppState) {
    info!("Starting tool server on stdin/stdout...");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        match stdin.read_line(&mut line).await {
            Ok(0) => {
                info!("EOF received, shutting down tool server");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!("Received: {}", line);

                let response = match serde_json::from_str::<RpcRequest>(line) {
                    Ok(request) => handle_rpc_request(request, state.clone()).await,
                    Err(parse_error) => {
                        error!("JSON parse error: {}", parse_error);
                        Some(RpcResponse::error(
                            serde_json::Value::Null,
                            error_codes::PARSE_ERROR,
                            format!("Parse error: {}", parse_error),
                        ))
                    }
                };

                if let Some(response) = response {
                    if let Ok(response_json) = serde_json::to_string(&response) {
                        debug!("Sending: {}", response_json);
                        if let Err(e) = stdout
                            .write_all(format!("{}\n", response_json).as_bytes())
                            .await
                        {
                            error!("Failed to write response: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }

    info!("Tool server shutting down");
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "defichat_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    if config.provider_api_key.is_none() {
        // Balance/metadata/price calls will fail provider auth without it
        tracing::warn!("PROVIDER_API_KEY is not set");
    }

    let state = AppState::from_config(config);

    // Check if running in stdio tool mode or HTTP server mode
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--mcp".to_string()) || env::var("MCP_MODE").is_ok() {
        run_stdio_server(state).await;
    } else {
        run_http_server(state).await;
    }
}
