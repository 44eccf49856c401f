//! # Application State
//!
//! Shared state handed to every handler. Store handles, the session cart,
//! and configuration are separate fields rather than one grab-bag struct,
//! so each handler reaches for exactly what it needs.

use std::sync::{Arc, Mutex};

use crate::config::ServerConfig;
use crate::store::{ProductStore, SaleStore, Stores};
use mart_core::Cart;

// =============================================================================
// Cart State
// =============================================================================

/// The session cart.
///
/// ## Thread Safety
/// `Arc<Mutex<Cart>>`: handlers may run concurrently, but only one may
/// mutate the cart at a time. There is exactly one cart per process, so
/// at most one checkout is ever in flight.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

// =============================================================================
// App State
// =============================================================================

/// Everything the HTTP layer needs. Cloning is cheap (all `Arc`s).
#[derive(Clone)]
pub struct AppState {
    /// Product catalog store.
    pub products: Arc<dyn ProductStore>,

    /// Sales ledger store.
    pub sales: Arc<dyn SaleStore>,

    /// The session cart.
    pub cart: CartState,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assembles the application state from selected stores and config.
    pub fn new(stores: Stores, config: ServerConfig) -> Self {
        AppState {
            products: stores.products,
            sales: stores.sales,
            cart: CartState::new(),
            config: Arc::new(config),
        }
    }
}
