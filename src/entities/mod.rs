//! Entity module - Contains the data types shared by the catalog, cart and login flows.
//! These types carry no I/O; persistence lives in `core`.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{CartEntry, CartState, CartSummary};
pub use product::{Category, CategoryFilter, ClothingSize, Product, ProductDetails};
pub use user::UserAccount;
