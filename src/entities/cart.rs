//! Cart entities - one row per product in the cart and the computed totals.

use super::product::Category;

/// A merged cart row. There is at most one entry per product id.
#[derive(Clone, Debug, PartialEq)]
pub struct CartEntry {
    /// Id of the product this row aggregates
    pub product_id: String,
    /// Display text, refreshed on every add
    pub description: String,
    /// Category of the product
    pub category: Category,
    /// Units added so far
    pub quantity: u32,
    /// Sum of the line totals of every add
    pub line_total: f64,
}

/// Totals shown beneath the cart.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartSummary {
    /// Sum of all line totals
    pub subtotal: f64,
    /// Category discount
    pub discount: f64,
    /// `subtotal - discount`, not floored at zero
    pub final_total: f64,
}

/// Cart lifecycle. There is no way back to `Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartState {
    /// Nothing added yet
    Empty,
    /// At least one add has happened
    Populated,
}
