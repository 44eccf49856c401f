//! End-to-end checkout flow over the handlers, against the local JSON
//! store in a temp directory. Covers the observable contract: catalog
//! CRUD with duplicate-barcode rejection, cart aggregation semantics,
//! checkout, receipts, and the scan session.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tempfile::TempDir;

use mart_core::{NewProduct, Product, ProductPatch, SaleLine};
use mart_scan::SIMULATED_CODES;
use mart_server::config::ServerConfig;
use mart_server::error::ErrorCode;
use mart_server::routes::cart::{
    add_cart_item, checkout, get_cart, remove_cart_item, scan, update_cart_item,
    AddCartItemRequest, UpdateCartItemRequest,
};
use mart_server::routes::products::{
    create_product, delete_product, get_product_by_barcode, update_product,
};
use mart_server::routes::sales::{create_sale, get_receipt, list_sales, CreateSaleRequest};
use mart_server::state::AppState;
use mart_server::store::{LocalStore, Stores};

async fn test_state(dir: &TempDir) -> AppState {
    let store = Arc::new(LocalStore::open(dir.path().join("mart-local.json")).await);
    let stores = Stores {
        products: store.clone(),
        sales: store,
    };
    AppState::new(stores, ServerConfig::default())
}

async fn add_product(state: &AppState, barcode: &str, name: &str, price_cents: i64) -> Product {
    let (status, Json(product)) = create_product(
        State(state.clone()),
        Json(NewProduct {
            barcode: barcode.to_string(),
            name: name.to_string(),
            price_cents,
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    product
}

#[tokio::test]
async fn full_checkout_flow() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let choc = add_product(&state, "8901234567890", "Dairy Milk Chocolate", 150).await;
    let pepsi = add_product(&state, "8902345678901", "Pepsi Cola 500ml", 100).await;

    // Scan the chocolate twice, the pepsi once.
    for barcode in ["8901234567890", "8901234567890", "8902345678901"] {
        add_cart_item(
            State(state.clone()),
            Json(AddCartItemRequest {
                barcode: barcode.to_string(),
            }),
        )
        .await
        .unwrap();
    }

    let Json(view) = get_cart(State(state.clone())).await;
    assert_eq!(view.lines.len(), 2);
    assert_eq!(view.lines[0].product_id, choc.id);
    assert_eq!(view.lines[0].quantity, 2);
    assert_eq!(view.subtotal_cents, 400);

    // Checkout produces exactly one sale worth the prior subtotal and
    // clears the cart.
    let (status, Json(sale)) = checkout(State(state.clone())).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale.total_cents, 400);
    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.items[1].product_id, pepsi.id);
    assert_eq!(
        sale.total_cents,
        sale.items.iter().map(|i| i.line_total_cents).sum::<i64>()
    );

    let Json(view) = get_cart(State(state.clone())).await;
    assert!(view.lines.is_empty());

    let Json(sales) = list_sales(State(state.clone())).await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].id, sale.id);

    // Receipt downloads for the recorded sale.
    let (headers, text) = get_receipt(State(state.clone()), Path(sale.id.clone()))
        .await
        .unwrap();
    assert!(headers[1].1.contains(&sale.id));
    assert!(text.contains("Smart Mart"));
    assert!(text.contains("Dairy Milk Chocolate x 2"));
    assert!(text.contains("TOTAL: PKR 4.00"));

    // A second checkout on the now-empty cart fails and changes nothing.
    let err = checkout(State(state.clone())).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyCart);
    let Json(sales) = list_sales(State(state.clone())).await.unwrap();
    assert_eq!(sales.len(), 1);
}

#[tokio::test]
async fn duplicate_barcode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    add_product(&state, "8901234567890", "First", 100).await;

    let err = create_product(
        State(state.clone()),
        Json(NewProduct {
            barcode: "8901234567890".to_string(),
            name: "Second".to_string(),
            price_cents: 200,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateBarcode);
}

#[tokio::test]
async fn cart_noop_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let product = add_product(&state, "8901234567890", "Dairy Milk Chocolate", 150).await;

    add_cart_item(
        State(state.clone()),
        Json(AddCartItemRequest {
            barcode: "8901234567890".to_string(),
        }),
    )
    .await
    .unwrap();

    // Quantity below 1 leaves the cart unchanged.
    let Json(view) = update_cart_item(
        State(state.clone()),
        Path(product.id.clone()),
        Json(UpdateCartItemRequest { quantity: 0 }),
    )
    .await;
    assert_eq!(view.lines[0].quantity, 1);

    // Unknown product id leaves the cart unchanged.
    let Json(view) = update_cart_item(
        State(state.clone()),
        Path("no-such-product".to_string()),
        Json(UpdateCartItemRequest { quantity: 5 }),
    )
    .await;
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, 1);

    // A real quantity change is applied and the subtotal follows.
    let Json(view) = update_cart_item(
        State(state.clone()),
        Path(product.id.clone()),
        Json(UpdateCartItemRequest { quantity: 3 }),
    )
    .await;
    assert_eq!(view.subtotal_cents, 450);

    // Removing an absent line is a no-op; removing a present one works.
    let Json(view) = remove_cart_item(State(state.clone()), Path("no-such-product".to_string())).await;
    assert_eq!(view.lines.len(), 1);
    let Json(view) = remove_cart_item(State(state.clone()), Path(product.id.clone())).await;
    assert!(view.lines.is_empty());

    // Adding an unknown barcode is a 404.
    let err = add_cart_item(
        State(state.clone()),
        Json(AddCartItemRequest {
            barcode: "0000000000000".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn product_update_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let product = add_product(&state, "8901234567890", "Original", 100).await;

    let Json(updated) = update_product(
        State(state.clone()),
        Path(product.id.clone()),
        Json(ProductPatch {
            price_cents: Some(250),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.price_cents, 250);
    assert_eq!(updated.name, "Original");

    let Json(found) = get_product_by_barcode(State(state.clone()), Path("8901234567890".to_string()))
        .await
        .unwrap();
    assert_eq!(found.price_cents, 250);

    delete_product(State(state.clone()), Path(product.id.clone()))
        .await
        .unwrap();

    let err = delete_product(State(state.clone()), Path(product.id)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn direct_sale_creation_enforces_invariant() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    let items = vec![SaleLine {
        product_id: "a".to_string(),
        name: "Dairy Milk Chocolate".to_string(),
        unit_price_cents: 150,
        quantity: 2,
        line_total_cents: 300,
    }];

    let (status, Json(sale)) = create_sale(
        State(state.clone()),
        Json(CreateSaleRequest {
            items: items.clone(),
            total_cents: 300,
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale.total_cents, 300);
    assert!(sale.id.starts_with("SALE-"));

    // A claimed total that doesn't match the lines is rejected.
    let err = create_sale(
        State(state.clone()),
        Json(CreateSaleRequest {
            items,
            total_cents: 999,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // Receipt for an unknown sale is a 404.
    let err = get_receipt(State(state.clone()), Path("SALE-0".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test(start_paused = true)]
async fn scan_session_adds_demo_product() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;

    // Seed the full candidate set so whichever code the simulation picks
    // resolves to a product.
    for (i, code) in SIMULATED_CODES.iter().enumerate() {
        add_product(&state, code, &format!("Demo Product {i}"), 100 * (i as i64 + 1)).await;
    }

    let Json(response) = scan(State(state.clone())).await.unwrap();

    let code = response.code.expect("simulated session yields a code");
    assert!(SIMULATED_CODES.contains(&code.as_str()));

    let product = response.product.expect("demo code resolves to a product");
    assert_eq!(product.barcode, code);

    assert_eq!(response.cart.lines.len(), 1);
    assert_eq!(response.cart.lines[0].product_id, product.id);
}
