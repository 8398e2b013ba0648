//! Flat-file catalog record codec.
//!
//! The catalog file is a sequence of line-oriented records. Each record opens
//! with a category marker line (`Electronics:` or `Clothing:`) followed by one
//! labelled field per line in a fixed order:
//!
//! ```text
//! Electronics:
//! Product ID: E100
//! Product Name: Television
//! Available Items: 4
//! Price: 299.99
//! Brand: Sony
//! Warranty Period: 2
//! ```
//!
//! Decoding is atomic per record: a record either yields a complete
//! [`Product`] or is rejected with [`Error::MalformedRecord`], after which the
//! parser skips ahead to the next marker line.

use crate::{
    entities::{Category, ClothingSize, Product, ProductDetails},
    errors::{Error, Result},
};
use std::ops::Range;
use std::str::FromStr;

const PRODUCT_ID: &str = "Product ID:";
const PRODUCT_NAME: &str = "Product Name:";
const AVAILABLE_ITEMS: &str = "Available Items:";
const PRICE: &str = "Price:";
const BRAND: &str = "Brand:";
const WARRANTY_PERIOD: &str = "Warranty Period:";
const SIZE: &str = "Size:";
const COLOR: &str = "Color:";

/// Marker line that opens a record of the given category.
#[must_use]
pub const fn marker(category: Category) -> &'static str {
    match category {
        Category::Electronics => "Electronics:",
        Category::Clothing => "Clothing:",
    }
}

fn marker_category(line: &str) -> Option<Category> {
    Category::ALL.into_iter().find(|&c| line == marker(c))
}

/// Formats a decimal so it always carries a fractional part (`12.0`, not `12`)
/// and parses back to the same value.
#[must_use]
pub fn format_decimal(value: f64) -> String {
    format!("{value:?}")
}

/// Encodes one product as a record. Every line, including the last, ends in `\n`.
#[must_use]
pub fn encode(product: &Product) -> String {
    let mut fields = vec![
        (PRODUCT_ID, product.id.clone()),
        (PRODUCT_NAME, product.name.clone()),
        (AVAILABLE_ITEMS, product.available_items.to_string()),
        (PRICE, format_decimal(product.price)),
    ];
    match &product.details {
        ProductDetails::Electronics {
            brand,
            warranty_years,
        } => {
            fields.push((BRAND, brand.clone()));
            fields.push((WARRANTY_PERIOD, warranty_years.to_string()));
        }
        ProductDetails::Clothing { size, color } => {
            fields.push((SIZE, size.to_string()));
            fields.push((COLOR, color.clone()));
        }
    }

    let mut out = format!("{}\n", marker(product.category()));
    for (label, value) in fields {
        out.push_str(label);
        out.push(' ');
        out.push_str(&value);
        out.push('\n');
    }
    out
}

/// A successfully decoded record and where it sits in the source text.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedRecord {
    /// The decoded product
    pub product: Product,
    /// Zero-based line indices covered by the record, marker included
    pub lines: Range<usize>,
}

/// Result of decoding a whole catalog file.
#[derive(Debug, Default)]
pub struct ParsedCatalog {
    /// Well-formed records in file order
    pub records: Vec<ParsedRecord>,
    /// One [`Error::MalformedRecord`] per rejected record
    pub rejected: Vec<Error>,
}

impl ParsedCatalog {
    /// Consumes the parse result, keeping only the products.
    #[must_use]
    pub fn into_products(self) -> Vec<Product> {
        self.records.into_iter().map(|r| r.product).collect()
    }
}

/// Decodes every record in `text`. Lines outside records are ignored.
#[must_use]
pub fn parse_catalog(text: &str) -> ParsedCatalog {
    let lines: Vec<&str> = text.lines().collect();
    let mut parsed = ParsedCatalog::default();
    let mut cursor = 0;

    while cursor < lines.len() {
        let Some(category) = marker_category(lines[cursor]) else {
            cursor += 1;
            continue;
        };
        let start = cursor;
        cursor += 1;

        let mut reader = FieldReader {
            lines: &lines,
            cursor: &mut cursor,
        };
        match reader.read_product(category) {
            Ok(product) => parsed.records.push(ParsedRecord {
                product,
                lines: start..cursor,
            }),
            Err(e) => {
                parsed.rejected.push(e);
                while cursor < lines.len() && marker_category(lines[cursor]).is_none() {
                    cursor += 1;
                }
            }
        }
    }

    parsed
}

struct FieldReader<'a, 'c> {
    lines: &'a [&'a str],
    cursor: &'c mut usize,
}

impl<'a> FieldReader<'a, '_> {
    /// Reads the next line if it starts with `label`, returning the trimmed value.
    /// A mismatching line is left unconsumed so a following marker is not lost.
    fn field(&mut self, label: &str) -> Result<&'a str> {
        let line_number = *self.cursor + 1;
        let lines: &'a [&'a str] = self.lines;
        let Some(&line) = lines.get(*self.cursor) else {
            return Err(Error::MalformedRecord {
                line: line_number,
                reason: format!("unexpected end of file, expected '{label}'"),
            });
        };
        let value = line.strip_prefix(label).ok_or_else(|| Error::MalformedRecord {
            line: line_number,
            reason: format!("expected '{label}', found '{line}'"),
        })?;
        *self.cursor += 1;
        Ok(value.trim())
    }

    fn parsed<T: FromStr>(&mut self, label: &str) -> Result<T> {
        let line = *self.cursor + 1;
        let value = self.field(label)?;
        value.parse().map_err(|_| Error::MalformedRecord {
            line,
            reason: format!("'{value}' is not a valid value for '{label}'"),
        })
    }

    fn text(&mut self, label: &str) -> Result<String> {
        self.field(label).map(str::to_string)
    }

    fn read_product(&mut self, category: Category) -> Result<Product> {
        let id_line = *self.cursor + 1;
        let id = self.text(PRODUCT_ID)?;
        if id.is_empty() {
            return Err(Error::MalformedRecord {
                line: id_line,
                reason: "product ID is empty".to_string(),
            });
        }
        let name = self.text(PRODUCT_NAME)?;
        let available_items: u32 = self.parsed(AVAILABLE_ITEMS)?;
        let price_line = *self.cursor + 1;
        let price: f64 = self.parsed(PRICE)?;
        if !price.is_finite() || price < 0.0 {
            return Err(Error::MalformedRecord {
                line: price_line,
                reason: format!("price {price} must be a non-negative number"),
            });
        }

        let details = match category {
            Category::Electronics => ProductDetails::Electronics {
                brand: self.text(BRAND)?,
                warranty_years: self.parsed(WARRANTY_PERIOD)?,
            },
            Category::Clothing => ProductDetails::Clothing {
                size: self.parsed::<ClothingSize>(SIZE)?,
                color: self.text(COLOR)?,
            },
        };

        Ok(Product {
            id,
            name,
            available_items,
            price,
            details,
        })
    }
}
