//! Coupon Domain Module
//!
//! Everything around the discount engine:
//! - API models (payloads, responses)
//! - Helpers (id generation, update merging)
//! - Coupon storage behind the `CouponStore` trait
//! - Application state
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use state::{AppState, SharedState};
pub use store::{CouponStore, InMemoryCouponStore, StoreError};
