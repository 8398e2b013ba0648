//! Shop loop - text commands forwarded to a [`Shop`] session.
//!
//! The loop subscribes a channel sender to the session and, after every
//! dispatch, drains the queued [`ShopUpdate`]s and renders them in order.

use crate::{
    console::Console,
    core::{
        report::{format_cart_entry, format_listing_row, format_product_details, format_summary},
        shop::{Shop, ShopEvent, ShopUpdate},
    },
    entities::CategoryFilter,
    errors::{Error, Result},
};
use std::io::{BufRead, Write};
use std::sync::mpsc;
use tracing::{debug, info, instrument};

const HELP: &str = "Commands:\n\
    \x20 list [all|electronics|clothing]  show products\n\
    \x20 show <id>                        show product details\n\
    \x20 add <id>                         add one item to the cart\n\
    \x20 cart                             show the cart and totals\n\
    \x20 reload                           re-read stock from the catalog\n\
    \x20 help                             show this message\n\
    \x20 quit                             leave the shop";

/// A parsed line of shop input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopCommand {
    /// Forward an event to the session
    Event(ShopEvent),
    /// Print the command list
    Help,
    /// Leave the shop
    Quit,
}

/// Parses one line of shop input.
///
/// `list` without an argument keeps the `current` filter.
///
/// # Errors
/// Returns [`Error::InvalidField`] for unknown commands or missing arguments.
pub fn parse_command(line: &str, current: CategoryFilter) -> Result<ShopCommand> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(Error::invalid_field("command", "type 'help' to see the commands"));
    };
    let argument = words.next();

    let product_id = |argument: Option<&str>| {
        argument
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_field("command", format!("'{command}' needs a product ID")))
    };

    let parsed = match command.to_ascii_lowercase().as_str() {
        "list" => ShopCommand::Event(ShopEvent::FilterChanged(
            argument.map_or(Ok(current), str::parse::<CategoryFilter>)?,
        )),
        "show" => ShopCommand::Event(ShopEvent::ProductSelected(product_id(argument)?)),
        "add" => ShopCommand::Event(ShopEvent::AddToCart(product_id(argument)?)),
        "cart" => ShopCommand::Event(ShopEvent::CartRequested),
        "reload" => ShopCommand::Event(ShopEvent::Reload),
        "help" => ShopCommand::Help,
        "quit" | "exit" => ShopCommand::Quit,
        other => {
            return Err(Error::invalid_field(
                "command",
                format!("'{other}' is not a command, type 'help' to see the commands"),
            ));
        }
    };
    Ok(parsed)
}

/// Renders one session update as console text.
#[must_use]
pub fn render_update(update: &ShopUpdate) -> String {
    match update {
        ShopUpdate::Listing { filter, rows } => {
            if rows.is_empty() {
                return match filter {
                    CategoryFilter::All => "No products to show.".to_string(),
                    CategoryFilter::Only(category) => format!("No {category} products to show."),
                };
            }
            let mut lines = vec![format!("=== {filter} products ===")];
            lines.extend(rows.iter().map(format_listing_row));
            if rows.iter().any(|row| row.low_stock) {
                lines.push("(! = only a few items left)".to_string());
            }
            lines.join("\n")
        }
        ShopUpdate::Details(product) => {
            format!("Selected Product - Details\n{}", format_product_details(product))
        }
        ShopUpdate::CartChanged { entries, summary } => {
            let mut lines = vec!["=== Shopping Cart ===".to_string()];
            lines.extend(entries.iter().map(format_cart_entry));
            lines.push(format_summary(summary));
            lines.join("\n")
        }
        ShopUpdate::Notice(message) => message.clone(),
    }
}

/// Runs the shop loop until the user quits or input ends.
///
/// # Errors
/// Returns [`Error::Io`] if the console cannot be used.
#[instrument(skip_all)]
pub fn run_shop<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    shop: &mut Shop<'_>,
) -> Result<()> {
    let (sender, updates) = mpsc::channel();
    shop.subscribe(move |update: &ShopUpdate| {
        // The receiver lives for the whole loop
        let _ = sender.send(update.clone());
    });

    console.say(HELP)?;
    shop.dispatch(ShopEvent::FilterChanged(shop.filter()))?;
    render_pending(console, &updates)?;

    loop {
        let line = match console.prompt("shop> ") {
            Ok(line) => line,
            Err(Error::InputClosed) => break,
            Err(e) => return Err(e),
        };

        let outcome = parse_command(&line, shop.filter()).and_then(|command| match command {
            ShopCommand::Event(event) => shop.dispatch(event).map(|()| true),
            ShopCommand::Help => console.say(HELP).map(|()| true),
            ShopCommand::Quit => Ok(false),
        });

        match outcome {
            Ok(true) => render_pending(console, &updates)?,
            Ok(false) => break,
            Err(e) => {
                debug!("Shop command rejected: {}", e);
                console.say(format!("❌ {e}"))?;
            }
        }
    }

    info!("Shop closed with {} cart rows", shop.cart().entries().len());
    console.say("Thank you for shopping at Westminster Shopping Centre!")
}

fn render_pending<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    updates: &mpsc::Receiver<ShopUpdate>,
) -> Result<()> {
    for update in updates.try_iter() {
        console.say(render_update(&update))?;
    }
    Ok(())
}
