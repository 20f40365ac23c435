//! Coupon Service State
//!
//! Shared state handed to every handler.

use super::store::{CouponStore, InMemoryCouponStore};
use std::sync::Arc;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state: the coupon store behind its trait
pub struct AppState {
    /// Coupon storage. The default store is in-memory and lock-free at the
    /// map level.
    pub coupons: Arc<dyn CouponStore>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates state backed by an empty in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryCouponStore::new()))
    }

    /// Creates state backed by the given store
    pub fn with_store(coupons: Arc<dyn CouponStore>) -> Self {
        Self { coupons }
    }
}
