//! Catalog business logic - Handles adding, listing, deleting and persisting products.
//!
//! A [`CatalogStore`] keeps products added during the current session in memory
//! and persists them by appending records to a flat text file. Listing, lookup
//! and deletion operate over the union of both sources: in-memory products
//! first, then persisted ones. The union is not deduplicated, so a product that
//! has been saved and is still in memory appears twice.

use crate::{
    config::settings::CatalogSettings,
    core::record::{self, ParsedCatalog},
    entities::{CategoryFilter, Product, ProductDetails},
    errors::{Error, Result},
};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Parses a stock count for a new product. Must be a positive integer.
///
/// # Errors
/// Returns [`Error::InvalidField`] for non-numeric, zero or negative input.
pub fn parse_available_items(input: &str) -> Result<u32> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| Error::invalid_field("available items", "please enter a valid integer"))?;
    if value <= 0 {
        return Err(Error::invalid_field(
            "available items",
            "please enter a positive integer",
        ));
    }
    u32::try_from(value)
        .map_err(|_| Error::invalid_field("available items", format!("{value} is too large")))
}

/// Parses a unit price. Must be a finite, non-negative number.
///
/// # Errors
/// Returns [`Error::InvalidField`] for anything else.
pub fn parse_price(input: &str) -> Result<f64> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| Error::invalid_field("price", "please enter a valid number"))?;
    validate_price(value)
}

/// Parses a warranty period in whole years.
///
/// # Errors
/// Returns [`Error::InvalidField`] unless the input is a non-negative integer.
pub fn parse_warranty(input: &str) -> Result<u32> {
    input.trim().parse().map_err(|_| {
        Error::invalid_field(
            "warranty period",
            "please enter a valid non-negative integer",
        )
    })
}

fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() {
        return Err(Error::invalid_field("price", "must be a valid number"));
    }
    if price < 0.0 {
        return Err(Error::invalid_field("price", "cannot be negative"));
    }
    Ok(price)
}

/// Trims a text field in place. Each field is stored on a single record line.
fn normalize_line(field: &'static str, value: &mut String) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.contains(['\n', '\r']) {
        return Err(Error::invalid_field(field, "cannot contain line breaks"));
    }
    *value = trimmed.to_string();
    Ok(())
}

fn validate_new_product(mut product: Product) -> Result<Product> {
    normalize_line("product ID", &mut product.id)?;
    normalize_line("product name", &mut product.name)?;
    match &mut product.details {
        ProductDetails::Electronics { brand, .. } => normalize_line("brand", brand)?,
        ProductDetails::Clothing { color, .. } => normalize_line("color", color)?,
    }

    if product.id.is_empty() {
        return Err(Error::invalid_field("product ID", "cannot be empty"));
    }
    if product.name.is_empty() {
        return Err(Error::invalid_field("product name", "cannot be empty"));
    }
    if product.available_items == 0 {
        return Err(Error::invalid_field(
            "available items",
            "please enter a positive integer",
        ));
    }
    validate_price(product.price)?;
    Ok(product)
}

/// Where a product in the combined view came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductSource {
    /// Added this session and held in memory
    Unsaved,
    /// Read from the catalog file
    Persisted,
}

/// Outcome of a successful delete.
#[derive(Clone, Debug, PartialEq)]
pub struct Removal {
    /// The product that was removed
    pub product: Product,
    /// Which side of the combined view it was removed from
    pub source: ProductSource,
    /// Products left across memory and file after the delete
    pub remaining: usize,
}

impl Removal {
    /// One-line description, e.g. `Electronics - E100 Television`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} - {} {}",
            self.product.category(),
            self.product.id,
            self.product.name
        )
    }
}

/// In-memory product list backed by an append-only flat file.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    capacity: usize,
    products: Vec<Product>,
}

impl CatalogStore {
    /// Creates an empty store persisting to `path` and holding at most
    /// `capacity` unsaved products.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            products: Vec::new(),
        }
    }

    /// Creates an empty store from the `[catalog]` configuration section.
    #[must_use]
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        Self::new(&settings.path, settings.capacity)
    }

    /// Path of the backing catalog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maximum number of products held in memory.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Products added this session, in insertion order.
    #[must_use]
    pub fn unsaved(&self) -> &[Product] {
        &self.products
    }

    /// Validates and adds a product to the in-memory list.
    ///
    /// The id, name, brand and color are trimmed before they are stored.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The in-memory list already holds `capacity` products
    /// - The id or name is blank, the stock is zero, or the price is negative or not finite
    /// - A text field contains a line break
    /// - A product with the same id exists in memory or in the catalog file
    pub fn add_product(&mut self, product: Product) -> Result<&Product> {
        if self.products.len() >= self.capacity {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let product = validate_new_product(product)?;

        let persisted = self.load().unwrap_or_else(|e| {
            warn!(
                "Could not read {:?} for duplicate check, checking memory only: {}",
                self.path, e
            );
            Vec::new()
        });
        if self
            .products
            .iter()
            .chain(&persisted)
            .any(|existing| existing.id == product.id)
        {
            return Err(Error::DuplicateProduct { id: product.id });
        }

        info!("Added {} product {}", product.category(), product.id);
        let index = self.products.len();
        self.products.push(product);
        Ok(&self.products[index])
    }

    /// Parses the catalog file, keeping rejected records and line spans.
    ///
    /// A missing file is treated as an empty catalog.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file exists but cannot be read.
    pub fn load_detailed(&self) -> Result<ParsedCatalog> {
        let Some(text) = self.read_file()? else {
            debug!("Catalog file {:?} does not exist yet", self.path);
            return Ok(ParsedCatalog::default());
        };
        let parsed = record::parse_catalog(&text);
        for rejected in &parsed.rejected {
            warn!("Skipping record in {:?}: {}", self.path, rejected);
        }
        debug!(
            "Loaded {} products from {:?}",
            parsed.records.len(),
            self.path
        );
        Ok(parsed)
    }

    /// Reads every well-formed product from the catalog file.
    ///
    /// The file is parsed from scratch on every call. Malformed records are
    /// logged and skipped.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<Vec<Product>> {
        self.load_detailed().map(ParsedCatalog::into_products)
    }

    /// In-memory products followed by persisted ones, undeduplicated.
    fn combined(&self) -> Result<Vec<Product>> {
        let mut products = self.products.clone();
        products.extend(self.load()?);
        Ok(products)
    }

    /// Lists products from memory and file, sorted ascending by id.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the catalog file cannot be read.
    pub fn list_products(&self, filter: CategoryFilter) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self
            .combined()?
            .into_iter()
            .filter(|product| filter.matches(product))
            .collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    /// Finds the first product with `id`, looking in memory before the file.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the catalog file cannot be read.
    pub fn find_product(&self, id: &str) -> Result<Option<Product>> {
        if let Some(product) = self.products.iter().find(|p| p.id == id) {
            return Ok(Some(product.clone()));
        }
        Ok(self.load()?.into_iter().find(|p| p.id == id))
    }

    /// Deletes the first product with `id`, looking in memory before the file.
    ///
    /// A persisted match is removed by rewriting the catalog file without that
    /// record's lines. Every other line is kept as it was. An unsaved match is
    /// removed even if the file cannot be read; the file then counts as empty
    /// in `remaining`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - No product has this id ([`Error::ProductNotFound`])
    /// - A persisted match cannot be removed because the file cannot be read or rewritten
    pub fn delete_product(&mut self, id: &str) -> Result<Removal> {
        if let Some(index) = self.products.iter().position(|p| p.id == id) {
            let persisted = self.load().map(|products| products.len()).unwrap_or_else(|e| {
                warn!(
                    "Could not read {:?} to count remaining products: {}",
                    self.path, e
                );
                0
            });
            let product = self.products.remove(index);
            let remaining = self.products.len() + persisted;
            info!("Removed unsaved product {}", product.id);
            return Ok(Removal {
                product,
                source: ProductSource::Unsaved,
                remaining,
            });
        }

        let text = self.read_file()?.unwrap_or_default();
        let parsed = record::parse_catalog(&text);
        let Some(position) = parsed.records.iter().position(|r| r.product.id == id) else {
            return Err(Error::ProductNotFound { id: id.to_string() });
        };

        let mut records = parsed.records;
        let removed = records.remove(position);
        let persisted_left = records.len();

        let kept: String = text
            .split_inclusive('\n')
            .enumerate()
            .filter(|(index, _)| !removed.lines.contains(index))
            .map(|(_, line)| line)
            .collect();
        self.replace_file(&kept)?;

        info!("Removed product {} from {:?}", removed.product.id, self.path);
        Ok(Removal {
            product: removed.product,
            source: ProductSource::Persisted,
            remaining: self.products.len() + persisted_left,
        })
    }

    /// Appends every in-memory product to the catalog file.
    ///
    /// The in-memory list is left as it is, so saving twice writes the same
    /// products twice. Returns the number of records written.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be opened or written.
    pub fn save(&self) -> Result<usize> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        let needs_separator = ends_without_newline(&mut file)?;

        let mut writer = BufWriter::new(file);
        if needs_separator {
            writer.write_all(b"\n")?;
        }
        for product in &self.products {
            writer.write_all(record::encode(product).as_bytes())?;
        }
        writer.flush()?;

        info!(
            "Saved {} products to {:?}",
            self.products.len(),
            self.path
        );
        Ok(self.products.len())
    }

    fn read_file(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes `contents` to a sibling temporary file and renames it over the catalog.
    fn replace_file(&self, contents: &str) -> Result<()> {
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

fn ends_without_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::{Category, ClothingSize};
    use crate::test_utils::*;

    #[test]
    fn test_parse_available_items() {
        assert_eq!(parse_available_items(" 12 ").unwrap(), 12);
        for bad in ["0", "-3", "ten", "", "1.5"] {
            assert!(
                matches!(
                    parse_available_items(bad),
                    Err(Error::InvalidField { field: "available items", .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_price_and_warranty() {
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert_eq!(parse_price("12.50").unwrap(), 12.5);
        assert!(parse_price("-1").is_err());
        assert!(parse_price("NaN").is_err());
        assert!(parse_price("inf").is_err());
        assert!(parse_price("cheap").is_err());

        assert_eq!(parse_warranty("0").unwrap(), 0);
        assert!(parse_warranty("-2").is_err());
    }

    #[test]
    fn test_add_product_validation() {
        let (_dir, mut store) = temp_store();

        let blank_id = Product::electronics("  ", "TV", 1, 10.0, "Sony", 1);
        assert!(matches!(
            store.add_product(blank_id),
            Err(Error::InvalidField { field: "product ID", .. })
        ));

        let no_stock = Product::electronics("E1", "TV", 0, 10.0, "Sony", 1);
        assert!(matches!(
            store.add_product(no_stock),
            Err(Error::InvalidField { field: "available items", .. })
        ));

        let negative = Product::electronics("E1", "TV", 1, -10.0, "Sony", 1);
        assert!(matches!(
            store.add_product(negative),
            Err(Error::InvalidField { field: "price", .. })
        ));

        assert!(store.unsaved().is_empty());
    }

    #[test]
    fn test_add_product_trims_id_and_name() {
        let (_dir, mut store) = temp_store();
        let added = store
            .add_product(Product::clothing(" C1 ", " Scarf ", 2, 5.0, ClothingSize::S, "Red"))
            .unwrap();
        assert_eq!(added.id, "C1");
        assert_eq!(added.name, "Scarf");
    }

    #[test]
    fn test_add_product_rejects_line_breaks() {
        let (_dir, mut store) = temp_store();

        let cases = [
            (Product::electronics("E\n1", "TV", 1, 10.0, "Sony", 1), "product ID"),
            (Product::electronics("E1", "TV\nPrice: 1", 1, 10.0, "Sony", 1), "product name"),
            (Product::electronics("E1", "TV", 1, 10.0, "So\rny", 1), "brand"),
            (Product::clothing("C1", "Shirt", 1, 5.0, ClothingSize::M, "Blue\nClothing:"), "color"),
        ];
        for (product, expected) in cases {
            let err = store.add_product(product).unwrap_err();
            assert!(
                matches!(err, Error::InvalidField { field, .. } if field == expected),
                "{expected} should be rejected, got {err}"
            );
        }
        assert!(store.unsaved().is_empty());
    }

    #[test]
    fn test_padded_fields_round_trip_trimmed() {
        let (_dir, mut store) = temp_store();
        store
            .add_product(Product::electronics("E1", "TV", 1, 10.0, " Sony ", 1))
            .unwrap();
        store
            .add_product(Product::clothing("C1", "Shirt", 1, 5.0, ClothingSize::M, "\tBlue  "))
            .unwrap();
        store.save().unwrap();

        let reloaded = CatalogStore::new(store.path(), 50).load().unwrap();
        assert_eq!(reloaded, store.unsaved());
        assert_eq!(reloaded[0].info(), "Sony, 1 years warranty");
        assert_eq!(reloaded[1].info(), "M, Blue");
    }

    #[test]
    fn test_label_text_inside_values_round_trips() {
        let (_dir, mut store) = temp_store();
        let tricky = Product::electronics(
            "E1",
            "Price: 1 Brand: Fake",
            2,
            49.0,
            "Product ID: X",
            3,
        );
        store.add_product(tricky.clone()).unwrap();
        store.save().unwrap();

        let parsed = CatalogStore::new(store.path(), 50).load_detailed().unwrap();
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.into_products(), vec![tricky]);
    }

    #[test]
    fn test_capacity_is_enforced_on_add() {
        let (_dir, mut store) = temp_store();
        for i in 0..50 {
            store.add_product(sample_electronics(&format!("E{i:03}"))).unwrap();
        }

        let result = store.add_product(sample_electronics("E050"));
        assert!(matches!(result, Err(Error::CapacityExceeded { capacity: 50 })));
        assert_eq!(store.unsaved().len(), 50);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let (_dir, mut store) = temp_store();
        store.add_product(sample_electronics("E1")).unwrap();
        store.save().unwrap();

        let mut fresh = CatalogStore::new(store.path(), 50);
        let result = fresh.add_product(sample_clothing("E1"));
        assert!(matches!(result, Err(Error::DuplicateProduct { id }) if id == "E1"));

        let result = store.add_product(sample_clothing("E1"));
        assert!(matches!(result, Err(Error::DuplicateProduct { .. })));
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let (_dir, mut store) = temp_store();
        let tv = Product::electronics("E100", "Television", 4, 299.99, "Sony", 2);
        let shirt = Product::clothing("C200", "Linen Shirt", 10, 19.0, ClothingSize::XL, "Sky blue");
        store.add_product(tv.clone()).unwrap();
        store.add_product(shirt.clone()).unwrap();

        assert_eq!(store.save().unwrap(), 2);

        let reloaded = CatalogStore::new(store.path(), 50).load().unwrap();
        assert_eq!(reloaded, vec![tv, shirt]);
    }

    #[test]
    fn test_save_appends_and_keeps_memory() {
        let (_dir, mut store) = temp_store();
        store.add_product(sample_electronics("E1")).unwrap();
        store.save().unwrap();

        // Memory is not cleared, so a second save writes the same record again.
        store.save().unwrap();
        assert_eq!(store.unsaved().len(), 1);
        assert_eq!(store.load().unwrap().len(), 2);

        // Listing merges memory and file without deduplicating.
        let ids: Vec<_> = store
            .list_products(CategoryFilter::All)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, ["E1", "E1", "E1"]);
    }

    #[test]
    fn test_save_separates_from_unterminated_file() {
        let (_dir, mut store) = temp_store();
        fs::write(store.path(), "Notes without a trailing newline").unwrap();
        store.add_product(sample_clothing("C1")).unwrap();
        store.save().unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("Notes without a trailing newline\nClothing:\n"));
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_an_empty_catalog() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_empty());
        assert!(store.list_products(CategoryFilter::All).unwrap().is_empty());
    }

    #[test]
    fn test_load_skips_malformed_records() {
        let (_dir, store) = temp_store();
        let good = record::encode(&sample_clothing("C1"));
        let bad = record::encode(&sample_electronics("E1")).replace("Price:", "Cost:");
        fs::write(store.path(), format!("{bad}{good}")).unwrap();

        let parsed = store.load_detailed().unwrap();
        assert_eq!(parsed.rejected.len(), 1);
        assert_eq!(parsed.into_products(), vec![sample_clothing("C1")]);
    }

    #[test]
    fn test_list_products_sorted_and_filtered() {
        let (_dir, mut store) = temp_store();
        store.add_product(sample_clothing("C9")).unwrap();
        store.add_product(sample_electronics("E5")).unwrap();
        store.save().unwrap();

        let mut session = CatalogStore::new(store.path(), 50);
        session.add_product(sample_clothing("A1")).unwrap();
        session.add_product(sample_electronics("B2")).unwrap();

        let all: Vec<_> = session
            .list_products(CategoryFilter::All)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(all, ["A1", "B2", "C9", "E5"]);

        let clothing: Vec<_> = session
            .list_products(CategoryFilter::Only(Category::Clothing))
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(clothing, ["A1", "C9"]);
    }

    #[test]
    fn test_find_product_prefers_memory() {
        let (_dir, mut store) = temp_store();
        store.add_product(sample_electronics("E1")).unwrap();
        store.save().unwrap();

        let found = store.find_product("E1").unwrap().unwrap();
        assert_eq!(found.id, "E1");
        assert!(store.find_product("missing").unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_product() {
        let (_dir, mut store) = temp_store();
        store.add_product(sample_electronics("E1")).unwrap();

        let result = store.delete_product("nope");
        assert!(matches!(result, Err(Error::ProductNotFound { id }) if id == "nope"));
        assert_eq!(store.unsaved().len(), 1);
    }

    #[test]
    fn test_delete_unsaved_product() {
        let (_dir, mut store) = temp_store();
        store.add_product(sample_electronics("E1")).unwrap();
        store.add_product(sample_clothing("C1")).unwrap();

        let removal = store.delete_product("E1").unwrap();
        assert_eq!(removal.source, ProductSource::Unsaved);
        assert_eq!(removal.remaining, 1);
        assert_eq!(removal.summary(), "Electronics - E1 Sample Electronics E1");
    }

    #[test]
    fn test_delete_unsaved_product_when_file_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the catalog file cannot be read as text.
        let mut store = CatalogStore::new(dir.path(), 50);
        store.add_product(sample_electronics("E1")).unwrap();

        let removal = store.delete_product("E1").unwrap();
        assert_eq!(removal.source, ProductSource::Unsaved);
        assert_eq!(removal.remaining, 0);
        assert!(store.unsaved().is_empty());
    }

    #[test]
    fn test_delete_persisted_product_keeps_other_lines() {
        let (_dir, store) = temp_store();
        let first = record::encode(&sample_electronics("E1"));
        let second = record::encode(&sample_clothing("C1"));
        let broken = "Clothing:\nProduct ID: C2\n";
        fs::write(store.path(), format!("{first}{broken}{second}")).unwrap();

        let mut store = CatalogStore::new(store.path(), 50);
        let removal = store.delete_product("C1").unwrap();
        assert_eq!(removal.source, ProductSource::Persisted);
        assert_eq!(removal.remaining, 1);

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, format!("{first}{broken}"));
        assert!(!store.path().with_extension("tmp").exists());
    }
}
