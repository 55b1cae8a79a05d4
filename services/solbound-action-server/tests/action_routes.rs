//! Action route tests
//!
//! Drives the router end to end against the in-memory registry and upload
//! fakes; nothing leaves the process.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use solbound_action_server::config::ActionSettings;
use solbound_action_server::{create_router, AppState};
use solbound_crypto::Keypair;
use solbound_inventory::Inventory;
use solbound_issuer::{IssuerConfig, MintService};
use solbound_registry::InMemoryRegistry;
use solbound_storage::MemoryStorage;
use solbound_tx::VersionedTransaction;
use solbound_types::{InventoryItem, Pubkey, SecretKeyMaterial};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const ICON_BYTES: [u8; 6] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a];

struct TestApp {
    router: Router,
    registry: InMemoryRegistry,
    storage: MemoryStorage,
    _assets: TempDir,
}

fn item_key(i: u8) -> Keypair {
    Keypair::from_seed(&[i; 32])
}

fn requester() -> Pubkey {
    Keypair::from_seed(&[150; 32]).pubkey()
}

fn test_app(items: u8, public_base_url: Option<&str>) -> TestApp {
    let assets = TempDir::new().unwrap();
    std::fs::write(assets.path().join("solbound.png"), ICON_BYTES).unwrap();

    let inventory_items = (1..=items)
        .map(|i| {
            std::fs::write(assets.path().join(format!("og-{}.png", i)), [i; 8]).unwrap();
            InventoryItem {
                private_identity: SecretKeyMaterial::from_base58(&item_key(i).to_base58()).unwrap(),
                display_name: format!("Solbound OG #{}", i),
                category: "Legendary".to_string(),
                image_ref: format!("og-{}.png", i),
            }
        })
        .collect();

    let authority = Arc::new(Keypair::from_seed(&[200; 32]));
    let config = IssuerConfig {
        asset_dir: assets.path().to_path_buf(),
        reservation_ttl_secs: 0,
        ..IssuerConfig::default()
    };
    let registry = InMemoryRegistry::new(config.collection, authority.pubkey());
    let storage = MemoryStorage::new();

    let service = MintService::new(
        config,
        Inventory::from_items(inventory_items).unwrap(),
        authority,
        Arc::new(registry.clone()),
        Arc::new(registry.clone()),
        Arc::new(storage.clone()),
    );

    let state = AppState::new(
        service,
        ActionSettings::default(),
        public_base_url.map(str::to_string),
    );

    TestApp {
        router: create_router(Arc::new(state)),
        registry,
        storage,
        _assets: assets,
    }
}

/// Send a request and return status, headers and the JSON body
async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Host", "localhost:3000")
        .header("Content-Type", "application/json");

    let body = match body {
        Some(json_body) => Body::from(serde_json::to_vec(&json_body).unwrap()),
        None => Body::empty(),
    };

    let response = router.clone().oneshot(request.body(body).unwrap()).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));

    (status, headers, json)
}

async fn post_mint(router: &Router, body: Value) -> (StatusCode, Value) {
    let (status, _, json) = json_request(router, "POST", "/api/actions/mint", Some(body)).await;
    (status, json)
}

// =============================================================================
// Action description
// =============================================================================

#[tokio::test]
async fn test_get_describes_the_action() {
    let app = test_app(2, None);
    let (status, headers, json) = json_request(&app.router, "GET", "/api/actions/mint", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["icon"], "http://localhost:3000/solbound.png");
    assert_eq!(json["label"], "MINT");
    assert_eq!(json["title"], "Mint a Solbound.dev OG");
    assert_eq!(json["description"], "Burn 200k $BONK to get a Solbound OG collection NFT");
    assert_eq!(headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_options_matches_get() {
    let app = test_app(2, Some("https://solbound.dev"));
    let (_, _, get) = json_request(&app.router, "GET", "/api/actions/mint", None).await;
    let (status, headers, options) = json_request(&app.router, "OPTIONS", "/api/actions/mint", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(options, get);
    assert_eq!(options["icon"], "https://solbound.dev/solbound.png");
    assert!(headers["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .contains("POST"));
}

#[tokio::test]
async fn test_icon_is_served() {
    let app = test_app(1, None);
    let request = Request::builder().uri("/solbound.png").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], &ICON_BYTES[..]);
}

// =============================================================================
// Minting
// =============================================================================

#[tokio::test]
async fn test_post_returns_partially_signed_transaction() {
    let app = test_app(3, None);
    app.registry.mark_issued(item_key(1).pubkey(), Pubkey::new([9; 32])).await;

    let (status, json) = post_mint(&app.router, json!({ "account": requester().to_string() })).await;
    assert_eq!(status, StatusCode::OK);

    let tx = VersionedTransaction::from_base64(json["transaction"].as_str().unwrap()).unwrap();
    assert_eq!(tx.message.fee_payer(), Some(&requester()));
    assert_eq!(tx.missing_signers(), vec![requester()]);
    assert!(tx.signature_of(&item_key(2).pubkey()).is_some());

    // image then metadata document
    assert_eq!(app.storage.uploads().await.len(), 2);
}

#[tokio::test]
async fn test_invalid_account_is_rejected_before_scanning() {
    let app = test_app(2, None);

    for body in [
        json!({ "account": "not-a-wallet" }),
        json!({ "account": 42 }),
        json!({}),
    ] {
        let (status, json) = post_mint(&app.router, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "message": "Invalid account provided" }));
    }

    assert_eq!(app.registry.scan_count(), 0);
    assert!(app.storage.uploads().await.is_empty());
}

#[tokio::test]
async fn test_exhausted_inventory() {
    let app = test_app(2, None);
    for i in 1..=2 {
        app.registry.mark_issued(item_key(i).pubkey(), Pubkey::new([9; 32])).await;
    }

    let (status, json) = post_mint(&app.router, json!({ "account": requester().to_string() })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "message": "All NFTS have been minted" }));
    assert!(app.storage.uploads().await.is_empty());
}

#[tokio::test]
async fn test_upstream_failures_are_generic() {
    let app = test_app(2, None);
    app.registry.set_offline(true);

    let (status, json) = post_mint(&app.router, json!({ "account": requester().to_string() })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "message": "An error occurred" }));

    app.registry.set_offline(false);
    app.storage.set_failing(true);
    let (status, json) = post_mint(&app.router, json!({ "account": requester().to_string() })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "message": "An error occurred" }));
}

#[tokio::test]
async fn test_malformed_body() {
    let app = test_app(1, None);
    let request = Request::builder()
        .method("POST")
        .uri("/api/actions/mint")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"account\":"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json, json!({ "message": "An error occurred" }));
}

// =============================================================================
// Health and status
// =============================================================================

#[tokio::test]
async fn test_health_reports_inventory_size() {
    let app = test_app(3, None);
    let (status, _, json) = json_request(&app.router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["inventory_size"], 3);
    assert_eq!(json["collection"], "8kMLNM2TGXRu9drhceN3ZxqoDPYWgcjZJBr9HiCUfxzn");
    assert_eq!(app.registry.scan_count(), 0);
}

#[tokio::test]
async fn test_status_counts_issued_items() {
    let app = test_app(3, None);
    app.registry.mark_issued(item_key(3).pubkey(), Pubkey::new([9; 32])).await;

    let (status, _, json) = json_request(&app.router, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
    assert_eq!(json["issued"], 1);
    assert_eq!(json["remaining"], 2);
    assert_eq!(json["unknown"], 0);
}
