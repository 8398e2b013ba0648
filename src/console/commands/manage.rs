//! Manager menu - add, delete, list and save catalog products.

use super::menu_choice;
use crate::{
    console::{
        Console,
        prompt::{ask, ask_choice, ask_text},
    },
    core::{
        catalog::{CatalogStore, parse_available_items, parse_price, parse_warranty},
        report::format_product_line,
    },
    entities::{Category, CategoryFilter, ClothingSize, Product},
    errors::{Error, Result},
};
use std::io::{BufRead, Write};
use tracing::{error, info, instrument};

const MENU: &str = "\n===== Westminster Shopping Manager =====\n\
    1. Add a new product\n\
    2. Delete a product\n\
    3. Print the list of products\n\
    4. Save products to file\n\
    5. Exit";

/// Runs the manager menu until the user exits or input ends.
///
/// Failed actions are reported and the menu is shown again.
///
/// # Errors
/// Returns [`Error::Io`] if the console itself cannot be written to or read.
#[instrument(skip_all, fields(catalog = ?store.path()))]
pub fn run_manager<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &mut CatalogStore,
) -> Result<()> {
    loop {
        console.say(MENU)?;
        let Some(choice) = menu_choice(console)? else {
            break;
        };

        let outcome = match choice.as_str() {
            "1" => add_new_product(console, store),
            "2" => delete_product(console, store),
            "3" => print_products(console, store),
            "4" => save_products(console, store),
            "5" => {
                console.say("Exiting the program...")?;
                break;
            }
            _ => console.say("Invalid choice. Please enter a number between 1 and 5."),
        };

        match outcome {
            Ok(()) => {}
            Err(Error::InputClosed) => break,
            Err(e) => {
                error!("Manager action failed: {}", e);
                console.say(format!("❌ {e}"))?;
            }
        }
    }
    info!("Manager menu closed");
    Ok(())
}

fn add_new_product<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &mut CatalogStore,
) -> Result<()> {
    // Checked up front to skip the prompts; add_product enforces it again.
    if store.unsaved().len() >= store.capacity() {
        return Err(Error::CapacityExceeded {
            capacity: store.capacity(),
        });
    }

    console.say("Select the product type:\n1. Electronics\n2. Clothing")?;
    let category = match ask_choice(console, "Enter your choice: ", 2)? {
        1 => Category::Electronics,
        _ => Category::Clothing,
    };

    let id = ask_text(console, "Enter product ID: ", "product ID")?;
    let name = ask_text(console, "Enter product name: ", "product name")?;
    let available_items = ask(console, "Enter available items: ", parse_available_items)?;
    let price = ask(console, "Enter price: ", parse_price)?;

    let product = match category {
        Category::Electronics => {
            let brand = ask_text(console, "Enter brand: ", "brand")?;
            let warranty = ask(console, "Enter warranty period (years): ", parse_warranty)?;
            Product::electronics(id, name, available_items, price, brand, warranty)
        }
        Category::Clothing => {
            let sizes: Vec<String> = ClothingSize::ALL
                .iter()
                .enumerate()
                .map(|(index, size)| format!("{}. {size}", index + 1))
                .collect();
            console.say(format!("Select the size:\n{}", sizes.join("\n")))?;
            let size = ask(console, "Enter your choice: ", ClothingSize::from_choice)?;
            let color = ask_text(console, "Enter color: ", "color")?;
            Product::clothing(id, name, available_items, price, size, color)
        }
    };

    let added = store.add_product(product)?;
    let message = format!("✅ {} product '{}' added.", added.category(), added.id);
    console.say(message)
}

fn delete_product<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &mut CatalogStore,
) -> Result<()> {
    let id = ask_text(console, "Enter the product ID to delete: ", "product ID")?;
    match store.delete_product(&id) {
        Ok(removal) => {
            console.say(format!("✅ {} product removed successfully.", removal.summary()))?;
            console.say(format!(
                "Total number of products left in the system: {}",
                removal.remaining
            ))
        }
        Err(Error::ProductNotFound { id }) => {
            let remaining = store.list_products(CategoryFilter::All)?.len();
            console.say(format!("❌ Product with ID '{id}' not found."))?;
            console.say(format!(
                "Total number of products left in the system: {remaining}"
            ))
        }
        Err(e) => Err(e),
    }
}

fn print_products<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &CatalogStore,
) -> Result<()> {
    let products = store.list_products(CategoryFilter::All)?;
    if products.is_empty() {
        return console.say("The product list is empty.");
    }
    console.say("List of Products:")?;
    for product in &products {
        console.say(format_product_line(product))?;
    }
    Ok(())
}

fn save_products<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &CatalogStore,
) -> Result<()> {
    let saved = store.save()?;
    console.say(format!(
        "✅ Saved {saved} products to {}",
        store.path().display()
    ))
}
