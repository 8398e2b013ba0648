//! Shopping session - event dispatch between a front end and the catalog/cart.
//!
//! A front end registers handlers with [`Shop::subscribe`] and forwards user
//! actions as [`ShopEvent`]s to [`Shop::dispatch`]. The session updates its
//! stock snapshot and cart, then notifies every handler with the resulting
//! [`ShopUpdate`]s. Nothing here depends on how or on which thread the front
//! end renders.

use crate::{
    core::{
        cart::{Cart, DiscountPolicy},
        catalog::CatalogStore,
    },
    entities::{CartEntry, CartSummary, CategoryFilter, Product},
    errors::{Error, Result},
};
use tracing::{debug, info};

/// User actions a front end can forward to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopEvent {
    /// Show products of the given category
    FilterChanged(CategoryFilter),
    /// Show the details of one product
    ProductSelected(String),
    /// Put one unit of a product in the cart
    AddToCart(String),
    /// Show the cart and its totals
    CartRequested,
    /// Re-read stock from the catalog
    Reload,
}

/// One row of a product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    /// The product as currently stocked in this session
    pub product: Product,
    /// Fewer items left than the configured threshold
    pub low_stock: bool,
}

/// State changes pushed to registered handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum ShopUpdate {
    /// Products matching the current filter, sorted by id
    Listing {
        /// Filter the rows were selected with
        filter: CategoryFilter,
        /// Sorted rows
        rows: Vec<ListingRow>,
    },
    /// Full details of the selected product
    Details(Product),
    /// Cart contents and totals
    CartChanged {
        /// Cart rows
        entries: Vec<CartEntry>,
        /// Totals including the category discount
        summary: CartSummary,
    },
    /// A message for the user
    Notice(String),
}

type Handler<'h> = Box<dyn FnMut(&ShopUpdate) + 'h>;

/// A shopper's session over a snapshot of the catalog.
///
/// Stock taken by [`ShopEvent::AddToCart`] is deducted from the snapshot only;
/// the catalog file is not modified.
pub struct Shop<'h> {
    catalog: CatalogStore,
    stock: Vec<Product>,
    cart: Cart,
    filter: CategoryFilter,
    low_stock_threshold: u32,
    handlers: Vec<Handler<'h>>,
}

impl std::fmt::Debug for Shop<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shop")
            .field("catalog", &self.catalog)
            .field("stock", &self.stock.len())
            .field("cart", &self.cart)
            .field("filter", &self.filter)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<'h> Shop<'h> {
    /// Opens a session, taking a stock snapshot of the whole catalog.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the catalog file cannot be read.
    pub fn open(
        catalog: CatalogStore,
        policy: DiscountPolicy,
        low_stock_threshold: u32,
    ) -> Result<Self> {
        let stock = catalog.list_products(CategoryFilter::All)?;
        info!("Shop opened with {} products in stock", stock.len());
        Ok(Self {
            catalog,
            stock,
            cart: Cart::new(policy),
            filter: CategoryFilter::All,
            low_stock_threshold,
            handlers: Vec::new(),
        })
    }

    /// Registers a handler that receives every update.
    pub fn subscribe(&mut self, handler: impl FnMut(&ShopUpdate) + 'h) {
        self.handlers.push(Box::new(handler));
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// The session's view of a product, stock deductions included.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.stock.iter().find(|p| p.id == id)
    }

    /// Handles one event and notifies handlers of the result.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The event names a product that is not in stock ([`Error::ProductNotFound`])
    /// - The product has no items left ([`Error::OutOfStock`])
    /// - The catalog cannot be re-read on [`ShopEvent::Reload`]
    ///
    /// The session is unchanged when an error is returned.
    pub fn dispatch(&mut self, event: ShopEvent) -> Result<()> {
        debug!("Dispatching {:?}", event);
        match event {
            ShopEvent::FilterChanged(filter) => {
                self.filter = filter;
                self.emit_listing();
            }
            ShopEvent::ProductSelected(id) => {
                let product = self
                    .product(&id)
                    .cloned()
                    .ok_or(Error::ProductNotFound { id })?;
                self.emit(&ShopUpdate::Details(product));
            }
            ShopEvent::AddToCart(id) => self.add_to_cart(&id)?,
            ShopEvent::CartRequested => {
                if self.cart.is_empty() {
                    self.emit(&ShopUpdate::Notice("No products in the cart.".to_string()));
                } else {
                    self.emit_cart();
                }
            }
            ShopEvent::Reload => {
                self.stock = self.catalog.list_products(CategoryFilter::All)?;
                self.emit_listing();
            }
        }
        Ok(())
    }

    fn add_to_cart(&mut self, id: &str) -> Result<()> {
        let product = self
            .stock
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::ProductNotFound { id: id.to_string() })?;
        if product.available_items == 0 {
            return Err(Error::OutOfStock { id: id.to_string() });
        }

        self.cart.add_product(product, 1)?;
        product.available_items -= 1;
        info!(
            "Added {} to cart, {} left in stock",
            product.id, product.available_items
        );

        self.emit_cart();
        self.emit(&ShopUpdate::Notice(
            "Product added to cart successfully!".to_string(),
        ));
        self.emit_listing();
        Ok(())
    }

    fn emit_listing(&mut self) {
        let mut rows: Vec<ListingRow> = self
            .stock
            .iter()
            .filter(|p| self.filter.matches(p))
            .map(|p| ListingRow {
                product: p.clone(),
                low_stock: p.is_low_stock(self.low_stock_threshold),
            })
            .collect();
        rows.sort_by(|a, b| a.product.id.cmp(&b.product.id));
        self.emit(&ShopUpdate::Listing {
            filter: self.filter,
            rows,
        });
    }

    fn emit_cart(&mut self) {
        let update = ShopUpdate::CartChanged {
            entries: self.cart.entries().to_vec(),
            summary: self.cart.summary(),
        };
        self.emit(&update);
    }

    fn emit(&mut self, update: &ShopUpdate) {
        for handler in &mut self.handlers {
            handler(update);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::Category;
    use crate::test_utils::*;
    use std::sync::mpsc;

    fn shop_with(products: &[Product]) -> (tempfile::TempDir, Shop<'static>) {
        let (dir, mut store) = temp_store();
        for product in products {
            store.add_product(product.clone()).unwrap();
        }
        store.save().unwrap();
        let catalog = CatalogStore::new(store.path(), 50);
        let shop = Shop::open(catalog, DiscountPolicy::default(), 3).unwrap();
        (dir, shop)
    }

    fn recorder(shop: &mut Shop<'static>) -> mpsc::Receiver<ShopUpdate> {
        let (tx, rx) = mpsc::channel();
        shop.subscribe(move |update| {
            let _ = tx.send(update.clone());
        });
        rx
    }

    #[test]
    fn test_filter_changed_emits_sorted_listing() {
        let (_dir, mut shop) = shop_with(&[
            sample_clothing("C2"),
            sample_electronics("E1"),
            sample_clothing("C1"),
        ]);
        let rx = recorder(&mut shop);

        shop.dispatch(ShopEvent::FilterChanged(CategoryFilter::Only(Category::Clothing)))
            .unwrap();

        let Ok(ShopUpdate::Listing { filter, rows }) = rx.try_recv() else {
            panic!("expected a listing");
        };
        assert_eq!(filter, CategoryFilter::Only(Category::Clothing));
        let ids: Vec<_> = rows.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, ["C1", "C2"]);
    }

    #[test]
    fn test_product_selected() {
        let (_dir, mut shop) = shop_with(&[sample_electronics("E1")]);
        let rx = recorder(&mut shop);

        shop.dispatch(ShopEvent::ProductSelected("E1".to_string())).unwrap();
        assert_eq!(rx.try_recv().unwrap(), ShopUpdate::Details(sample_electronics("E1")));

        let result = shop.dispatch(ShopEvent::ProductSelected("X".to_string()));
        assert!(matches!(result, Err(Error::ProductNotFound { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_add_to_cart_takes_stock_and_notifies() {
        let (_dir, mut shop) = shop_with(&[sample_clothing("C1")]);
        let rx = recorder(&mut shop);

        shop.dispatch(ShopEvent::AddToCart("C1".to_string())).unwrap();

        let updates: Vec<_> = rx.try_iter().collect();
        assert_eq!(updates.len(), 3);
        assert!(matches!(&updates[0], ShopUpdate::CartChanged { entries, .. } if entries.len() == 1));
        assert!(matches!(&updates[1], ShopUpdate::Notice(_)));
        assert!(matches!(&updates[2], ShopUpdate::Listing { .. }));

        let before = sample_clothing("C1").available_items;
        assert_eq!(shop.product("C1").unwrap().available_items, before - 1);
        assert_eq!(shop.cart().entries()[0].quantity, 1);
    }

    #[test]
    fn test_out_of_stock() {
        let mut scarce = sample_electronics("E1");
        scarce.available_items = 1;
        let (_dir, mut shop) = shop_with(&[scarce]);

        shop.dispatch(ShopEvent::AddToCart("E1".to_string())).unwrap();
        let result = shop.dispatch(ShopEvent::AddToCart("E1".to_string()));
        assert!(matches!(result, Err(Error::OutOfStock { id }) if id == "E1"));
        assert_eq!(shop.cart().entries()[0].quantity, 1);
    }

    #[test]
    fn test_low_stock_rows_are_flagged() {
        let mut scarce = sample_electronics("E1");
        scarce.available_items = 2;
        let (_dir, mut shop) = shop_with(&[scarce, sample_clothing("C1")]);
        let rx = recorder(&mut shop);

        shop.dispatch(ShopEvent::FilterChanged(CategoryFilter::All)).unwrap();
        let Ok(ShopUpdate::Listing { rows, .. }) = rx.try_recv() else {
            panic!("expected a listing");
        };
        let flags: Vec<_> = rows.iter().map(|r| (r.product.id.as_str(), r.low_stock)).collect();
        assert_eq!(flags, [("C1", false), ("E1", true)]);
    }

    #[test]
    fn test_cart_requested() {
        let (_dir, mut shop) = shop_with(&[sample_clothing("C1")]);
        let rx = recorder(&mut shop);

        shop.dispatch(ShopEvent::CartRequested).unwrap();
        assert!(matches!(rx.try_recv().unwrap(), ShopUpdate::Notice(_)));

        for _ in 0..3 {
            shop.dispatch(ShopEvent::AddToCart("C1".to_string())).unwrap();
        }
        let _ = rx.try_iter().count();

        shop.dispatch(ShopEvent::CartRequested).unwrap();
        let Ok(ShopUpdate::CartChanged { entries, summary }) = rx.try_recv() else {
            panic!("expected cart contents");
        };
        let price = sample_clothing("C1").price;
        assert_eq!(entries[0].quantity, 3);
        assert_eq!(summary.subtotal, price * 3.0);
        assert_eq!(summary.discount, summary.subtotal * 0.20);
    }

    #[test]
    fn test_reload_restores_catalog_stock() {
        let (_dir, mut shop) = shop_with(&[sample_clothing("C1")]);
        shop.dispatch(ShopEvent::AddToCart("C1".to_string())).unwrap();

        shop.dispatch(ShopEvent::Reload).unwrap();
        assert_eq!(
            shop.product("C1").unwrap().available_items,
            sample_clothing("C1").available_items
        );
        assert_eq!(shop.cart().entries().len(), 1);
    }

    #[test]
    fn test_borrowing_handler() {
        let (_dir, store) = temp_store();
        let mut seen = Vec::new();
        {
            let catalog = CatalogStore::new(store.path(), 50);
            let mut shop = Shop::open(catalog, DiscountPolicy::default(), 3).unwrap();
            shop.subscribe(|update| seen.push(update.clone()));
            shop.dispatch(ShopEvent::CartRequested).unwrap();
        }
        assert_eq!(
            seen,
            vec![ShopUpdate::Notice("No products in the cart.".to_string())]
        );
    }
}
