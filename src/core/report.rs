//! Text formatting for products, listings and cart totals.
//!
//! All functions are pure and return strings, leaving output to the front end.

use crate::{
    core::shop::ListingRow,
    entities::{CartEntry, CartSummary, Product, ProductDetails},
};

/// Formats an amount of money, e.g. `£12.50` or `-£4.00`.
#[must_use]
pub fn format_price(amount: f64) -> String {
    if amount < 0.0 {
        format!("-£{:.2}", amount.abs())
    } else {
        format!("£{amount:.2}")
    }
}

/// Multi-line description of a product, one labelled field per line.
#[must_use]
pub fn format_product_details(product: &Product) -> String {
    let mut lines = vec![
        format!("Product ID: {}", product.id),
        format!("Category: {}", product.category()),
        format!("Name: {}", product.name),
    ];
    match &product.details {
        ProductDetails::Electronics {
            brand,
            warranty_years,
        } => {
            lines.push(format!("Brand: {brand}"));
            lines.push(format!("Warranty: {warranty_years} years warranty"));
        }
        ProductDetails::Clothing { size, color } => {
            lines.push(format!("Size: {size}"));
            lines.push(format!("Color: {color}"));
        }
    }
    lines.push(format!("Price: {}", format_price(product.price)));
    lines.push(format!("Available Items: {}", product.available_items));
    lines.join("\n")
}

/// One line per product for the manager's product list.
#[must_use]
pub fn format_product_line(product: &Product) -> String {
    format!(
        "{:<10} {:<12} {:<24} {:>10}  {:>4} left  {}",
        product.id,
        product.category(),
        product.name,
        format_price(product.price),
        product.available_items,
        product.info()
    )
}

/// One line of the shop listing; low-stock rows are marked with `!`.
#[must_use]
pub fn format_listing_row(row: &ListingRow) -> String {
    let marker = if row.low_stock { '!' } else { ' ' };
    format!("{marker} {}", format_product_line(&row.product))
}

/// One line per cart row.
#[must_use]
pub fn format_cart_entry(entry: &CartEntry) -> String {
    format!(
        "{}  x{}  {}",
        entry.description,
        entry.quantity,
        format_price(entry.line_total)
    )
}

/// Total, discount and final total lines shown beneath the cart.
#[must_use]
pub fn format_summary(summary: &CartSummary) -> String {
    format!(
        "Total: {}\nCategory Discount: {}\nFinal Total: {}",
        format_price(summary.subtotal),
        format_price(summary.discount),
        format_price(summary.final_total)
    )
}
