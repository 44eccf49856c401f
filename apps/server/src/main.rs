//! # Smart Mart POS Server Entry Point
//!
//! The actual setup lives in lib.rs so integration tests can drive the
//! same startup path.

#[tokio::main]
async fn main() {
    if let Err(e) = mart_server::run().await {
        eprintln!("Server failed: {e}");
        std::process::exit(1);
    }
}
