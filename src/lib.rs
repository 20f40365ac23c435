//! Coupon Engine Library
//!
//! This library provides a discount rule engine for shopping carts and a
//! small REST service that stores coupons and applies them.

// Domain modules
pub mod coupons;
pub mod engine;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
