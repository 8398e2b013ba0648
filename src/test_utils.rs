//! Shared test utilities.
//!
//! This module provides helpers for setting up scratch catalog files, sample
//! products with sensible defaults, and scripted consoles.

#![allow(clippy::unwrap_used)]

use crate::{
    console::Console,
    core::catalog::CatalogStore,
    entities::{ClothingSize, Product},
};
use std::io::Cursor;
use tempfile::TempDir;

/// Creates an empty catalog store whose file lives in a fresh temporary directory.
/// Keep the returned `TempDir` alive for as long as the store is used.
///
/// # Defaults
/// * capacity: 50
pub fn temp_store() -> (TempDir, CatalogStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = CatalogStore::new(dir.path().join("productList.txt"), 50);
    (dir, store)
}

/// Creates an electronics product with sensible defaults.
///
/// # Defaults
/// * name: `Sample Electronics <id>`
/// * `available_items`: 5
/// * price: 150.0
/// * brand: "Acme", warranty: 2 years
pub fn sample_electronics(id: &str) -> Product {
    Product::electronics(id, format!("Sample Electronics {id}"), 5, 150.0, "Acme", 2)
}

/// Creates a clothing product with sensible defaults.
///
/// # Defaults
/// * name: `Sample Clothing <id>`
/// * `available_items`: 8
/// * price: 25.0
/// * size: M, color: "Navy"
pub fn sample_clothing(id: &str) -> Product {
    Product::clothing(id, format!("Sample Clothing {id}"), 8, 25.0, ClothingSize::M, "Navy")
}

/// A console fed from `input`, capturing everything written.
pub fn scripted_console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

/// Everything a scripted console has written so far.
pub fn console_output(console: &Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8_lossy(console.output()).into_owned()
}
