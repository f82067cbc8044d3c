//! Shopping cart state: line items, per-item vouchers, and the time-bound
//! guest reward discount.

use serde::{Deserialize, Serialize};

use crate::{
    ProductId, UnixTimeMs, VoucherId, GUEST_REWARD_DURATION_MS, GUEST_REWARD_MULTIPLIER,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the display currency.
    pub price: f64,
}

/// A per-product discount amount optionally attached to a cart entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    /// Discount per unit, floored at zero when it exceeds the unit price.
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
    pub voucher: Option<Voucher>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardStatus {
    #[default]
    None,
    Active,
}

/// A time-bound blanket discount. At most one active at a time; re-activation
/// resets the expiry rather than stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuestReward {
    pub status: RewardStatus,
    pub expires_at: Option<UnixTimeMs>,
}

impl GuestReward {
    pub fn activate(&mut self, now: UnixTimeMs) {
        self.status = RewardStatus::Active;
        self.expires_at = Some(now.add_millis(GUEST_REWARD_DURATION_MS));
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, RewardStatus::Active)
    }

    /// Reverts to `None` if the expiry has passed. Returns true when the
    /// reward expired on this call.
    pub fn expire_if_due(&mut self, now: UnixTimeMs) -> bool {
        let due = match (self.status, self.expires_at) {
            (RewardStatus::Active, Some(expiry)) => now.is_after(expiry),
            _ => false,
        };
        if due {
            self.status = RewardStatus::None;
            self.expires_at = None;
        }
        due
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub entries: Vec<CartEntry>,
    pub reward: GuestReward,
}

impl Cart {
    /// Upserts a line item. Quantity at or below zero removes the entry.
    /// A `None` voucher on an update preserves any previously applied one.
    pub fn update_quantity(&mut self, product: Product, quantity: i32, voucher: Option<Voucher>) {
        if quantity <= 0 {
            self.remove(&product.id);
            return;
        }
        #[allow(clippy::cast_sign_loss)]
        let quantity = quantity as u32;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.product.id == product.id) {
            entry.quantity = quantity;
            entry.product = product;
            if voucher.is_some() {
                entry.voucher = voucher;
            }
        } else {
            self.entries.push(CartEntry {
                product,
                quantity,
                voucher,
            });
        }
    }

    /// No-op when the id is absent.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.entries.retain(|e| &e.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of `max(0, price − voucher) × qty`, times 0.95 once when the
    /// guest reward is active. The reward multiplier applies to the grand
    /// total, never per item.
    #[must_use]
    pub fn total(&self) -> f64 {
        let subtotal: f64 = self
            .entries
            .iter()
            .map(|entry| {
                let discount = entry.voucher.as_ref().map_or(0.0, |v| v.discount);
                (entry.product.price - discount).max(0.0) * f64::from(entry.quantity)
            })
            .sum();

        if self.reward.is_active() {
            subtotal * GUEST_REWARD_MULTIPLIER
        } else {
            subtotal
        }
    }
}
