//! Cart business logic - merges added products and computes totals.
//!
//! Adding a product that is already in the cart grows its existing row instead
//! of adding a second one. Every add, merged or not, also counts towards its
//! category's tally, which decides discount eligibility.
//!
//! The discount applies `rate` to the whole cart subtotal once for every
//! category whose tally reached `threshold`. With two qualifying categories
//! the subtotal is discounted twice, and the final total is not floored at
//! zero.

use crate::{
    config::CartSettings,
    entities::{CartEntry, CartState, CartSummary, Category, Product},
    errors::{Error, Result},
};
use std::collections::BTreeMap;
use tracing::debug;

/// Discount rule applied by [`Cart::summary`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountPolicy {
    /// Fraction of the subtotal taken off per qualifying category
    pub rate: f64,
    /// Adds within a category needed for it to qualify
    pub threshold: u32,
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self {
            rate: 0.20,
            threshold: 3,
        }
    }
}

impl From<&CartSettings> for DiscountPolicy {
    fn from(settings: &CartSettings) -> Self {
        Self {
            rate: settings.discount_rate,
            threshold: settings.discount_threshold,
        }
    }
}

/// Shopping cart with per-category add tally.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    entries: Vec<CartEntry>,
    tally: BTreeMap<Category, u32>,
    policy: DiscountPolicy,
}

impl Cart {
    /// Creates an empty cart using `policy` for discounts.
    #[must_use]
    pub fn new(policy: DiscountPolicy) -> Self {
        Self {
            entries: Vec::new(),
            tally: BTreeMap::new(),
            policy,
        }
    }

    /// Rows in the order their products were first added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of adds per category.
    #[must_use]
    pub const fn tally(&self) -> &BTreeMap<Category, u32> {
        &self.tally
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> CartState {
        if self.is_empty() {
            CartState::Empty
        } else {
            CartState::Populated
        }
    }

    /// Adds `quantity` units worth `line_total` in total.
    ///
    /// If `product_id` is already in the cart its quantity and line total are
    /// increased and its description replaced; otherwise a new row is appended.
    ///
    /// # Errors
    /// Returns [`Error::InvalidField`] if `quantity` is zero, `line_total`
    /// is negative or not finite, or the merged quantity would overflow. The
    /// cart is unchanged in that case.
    pub fn add_item(
        &mut self,
        product_id: &str,
        description: &str,
        category: Category,
        quantity: u32,
        line_total: f64,
    ) -> Result<&CartEntry> {
        if quantity == 0 {
            return Err(Error::invalid_field("quantity", "must be at least 1"));
        }
        if !line_total.is_finite() || line_total < 0.0 {
            return Err(Error::invalid_field(
                "line total",
                "must be a non-negative number",
            ));
        }

        let index = if let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.product_id == product_id)
        {
            let entry = &mut self.entries[index];
            entry.quantity = entry.quantity.checked_add(quantity).ok_or_else(|| {
                Error::invalid_field("quantity", "too many units of one product in the cart")
            })?;
            entry.line_total += line_total;
            description.clone_into(&mut entry.description);
            index
        } else {
            self.entries.push(CartEntry {
                product_id: product_id.to_string(),
                description: description.to_string(),
                category,
                quantity,
                line_total,
            });
            self.entries.len() - 1
        };

        *self.tally.entry(category).or_insert(0) += 1;
        debug!("Category counts updated: {:?}", self.tally);

        Ok(&self.entries[index])
    }

    /// Adds `quantity` units of `product` at its unit price.
    ///
    /// # Errors
    /// See [`Cart::add_item`].
    pub fn add_product(&mut self, product: &Product, quantity: u32) -> Result<&CartEntry> {
        let description = format!(
            "{}, {}, {}, {}",
            product.id,
            product.name,
            product.category(),
            product.info()
        );
        let line_total = product.price * f64::from(quantity);
        self.add_item(
            &product.id,
            &description,
            product.category(),
            quantity,
            line_total,
        )
    }

    /// Categories whose tally has reached the discount threshold.
    #[must_use]
    pub fn qualifying_categories(&self) -> Vec<Category> {
        self.tally
            .iter()
            .filter(|(_, count)| **count >= self.policy.threshold)
            .map(|(category, _)| *category)
            .collect()
    }

    /// Computes the subtotal, category discount and final total.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let subtotal: f64 = self.entries.iter().map(|entry| entry.line_total).sum();
        let discount: f64 = self
            .qualifying_categories()
            .iter()
            .map(|_| subtotal * self.policy.rate)
            .sum();

        CartSummary {
            subtotal,
            discount,
            final_total: subtotal - discount,
        }
    }
}
