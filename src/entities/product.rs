//! Product entity - Represents a catalog item of one of two variants.
//!
//! Every product shares an id, name, stock count and unit price. The variant
//! payload carries the electronics or clothing specific fields, and the
//! [`Category`] is derived from it rather than stored separately.

use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Product category, derived from the variant payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Electronics products (brand + warranty)
    Electronics,
    /// Clothing products (size + color)
    Clothing,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Self; 2] = [Self::Electronics, Self::Clothing];

    /// Display label, also used as the record marker stem in the catalog file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid_field("category", format!("'{s}' is not Electronics or Clothing"))
            })
    }
}

/// Which products a listing should include.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every product
    #[default]
    All,
    /// Only products of one category
    Only(Category),
}

impl CategoryFilter {
    /// Returns true if the product belongs in a listing with this filter.
    #[must_use]
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category() == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.pad("All"),
            Self::Only(category) => category.fmt(f),
        }
    }
}

/// The fixed set of clothing sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClothingSize {
    /// Small
    S,
    /// Medium
    M,
    /// Large
    L,
    /// Extra large
    XL,
    /// Double extra large
    XXL,
}

impl ClothingSize {
    /// All sizes in the order they are offered to the user.
    pub const ALL: [Self; 5] = [Self::S, Self::M, Self::L, Self::XL, Self::XXL];

    /// Code written to the catalog file and shown to users.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "XXL",
        }
    }

    /// Resolves a 1-based menu choice into a size.
    ///
    /// # Errors
    /// Returns [`Error::InvalidField`] if the input is not a number in `1..=5`.
    pub fn from_choice(input: &str) -> Result<Self> {
        let choice: usize = input
            .trim()
            .parse()
            .map_err(|_| Error::invalid_field("size choice", "please enter a valid number"))?;
        choice
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| {
                Error::invalid_field(
                    "size choice",
                    format!("please enter a number between 1 and {}", Self::ALL.len()),
                )
            })
    }
}

impl fmt::Display for ClothingSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for ClothingSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::invalid_field("size", format!("'{wanted}' is not one of S, M, L, XL, XXL"))
            })
    }
}

/// Variant-specific product fields.
#[derive(Clone, Debug, PartialEq)]
pub enum ProductDetails {
    /// Electronics payload
    Electronics {
        /// Manufacturer brand
        brand: String,
        /// Warranty period in years
        warranty_years: u32,
    },
    /// Clothing payload
    Clothing {
        /// Garment size
        size: ClothingSize,
        /// Garment color
        color: String,
    },
}

/// A catalog product.
#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    /// Unique identifier, used as the lookup and cart merge key
    pub id: String,
    /// Display name
    pub name: String,
    /// Units in stock
    pub available_items: u32,
    /// Unit price
    pub price: f64,
    /// Variant payload
    pub details: ProductDetails,
}

impl Product {
    /// Builds an electronics product.
    #[must_use]
    pub fn electronics(
        id: impl Into<String>,
        name: impl Into<String>,
        available_items: u32,
        price: f64,
        brand: impl Into<String>,
        warranty_years: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            available_items,
            price,
            details: ProductDetails::Electronics {
                brand: brand.into(),
                warranty_years,
            },
        }
    }

    /// Builds a clothing product.
    #[must_use]
    pub fn clothing(
        id: impl Into<String>,
        name: impl Into<String>,
        available_items: u32,
        price: f64,
        size: ClothingSize,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            available_items,
            price,
            details: ProductDetails::Clothing {
                size,
                color: color.into(),
            },
        }
    }

    /// The category implied by the variant payload.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self.details {
            ProductDetails::Electronics { .. } => Category::Electronics,
            ProductDetails::Clothing { .. } => Category::Clothing,
        }
    }

    /// Short variant summary, e.g. `Sony, 2 years warranty` or `M, Blue`.
    #[must_use]
    pub fn info(&self) -> String {
        match &self.details {
            ProductDetails::Electronics {
                brand,
                warranty_years,
            } => format!("{brand}, {warranty_years} years warranty"),
            ProductDetails::Clothing { size, color } => format!("{size}, {color}"),
        }
    }

    /// Whether stock has dropped below `threshold`.
    #[must_use]
    pub const fn is_low_stock(&self, threshold: u32) -> bool {
        self.available_items < threshold
    }
}
