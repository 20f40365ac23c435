//! Coupon Storage
//!
//! The engine never owns coupons; handlers reach them through the
//! [`CouponStore`] trait. The in-memory implementation keeps two DashMaps:
//! coupons by id, and an index from rule to id that makes duplicate
//! detection atomic. Locks are always taken rule index first.

use crate::engine::{Coupon, CouponRule};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Failures reported by a coupon store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Coupon not found: {0}")]
    NotFound(String),

    /// Another coupon already carries the same type and details
    #[error("A similar coupon already exists: {existing_id}")]
    Duplicate { existing_id: String },
}

/// Storage seam for coupons.
///
/// Implementations hand out clones, so a caller always works on a consistent
/// snapshot of one coupon.
pub trait CouponStore: Send + Sync {
    /// Inserts a new coupon, rejecting one whose rule already exists
    fn insert(&self, coupon: Coupon) -> Result<Coupon, StoreError>;

    fn get(&self, id: &str) -> Option<Coupon>;

    /// All coupons in creation order
    fn list(&self) -> Vec<Coupon>;

    /// Replaces the rule of an existing coupon, keeping its id and position
    fn replace(&self, id: &str, rule: CouponRule) -> Result<Coupon, StoreError>;

    fn remove(&self, id: &str) -> Option<Coupon>;
}

#[derive(Debug, Clone)]
struct StoredCoupon {
    seq: u64,
    coupon: Coupon,
}

/// Process-local coupon store
#[derive(Debug, Default)]
pub struct InMemoryCouponStore {
    coupons: DashMap<String, StoredCoupon>,
    rules: DashMap<CouponRule, String>,
    next_seq: AtomicU64,
}

impl InMemoryCouponStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CouponStore for InMemoryCouponStore {
    fn insert(&self, coupon: Coupon) -> Result<Coupon, StoreError> {
        match self.rules.entry(coupon.rule.clone()) {
            Entry::Occupied(existing) => Err(StoreError::Duplicate {
                existing_id: existing.get().clone(),
            }),
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                self.coupons.insert(
                    coupon.id.clone(),
                    StoredCoupon {
                        seq,
                        coupon: coupon.clone(),
                    },
                );
                slot.insert(coupon.id.clone());
                Ok(coupon)
            }
        }
    }

    fn get(&self, id: &str) -> Option<Coupon> {
        self.coupons.get(id).map(|stored| stored.coupon.clone())
    }

    fn list(&self) -> Vec<Coupon> {
        let mut stored: Vec<StoredCoupon> = self
            .coupons
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        stored.sort_by_key(|s| s.seq);
        stored.into_iter().map(|s| s.coupon).collect()
    }

    fn replace(&self, id: &str, rule: CouponRule) -> Result<Coupon, StoreError> {
        match self.rules.entry(rule.clone()) {
            Entry::Occupied(existing) if existing.get() == id => self
                .get(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string())),
            Entry::Occupied(existing) => Err(StoreError::Duplicate {
                existing_id: existing.get().clone(),
            }),
            Entry::Vacant(slot) => {
                // The coupon is locked while its rule is swapped, so the rule
                // released below is the one this call actually replaced.
                let (updated, previous) = {
                    let mut stored = self
                        .coupons
                        .get_mut(id)
                        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                    let previous = std::mem::replace(&mut stored.coupon.rule, rule);
                    (stored.coupon.clone(), previous)
                };
                slot.insert(id.to_string());
                self.rules.remove(&previous);
                Ok(updated)
            }
        }
    }

    fn remove(&self, id: &str) -> Option<Coupon> {
        let (_, stored) = self.coupons.remove(id)?;
        self.rules.remove(&stored.coupon.rule);
        Some(stored.coupon)
    }
}
