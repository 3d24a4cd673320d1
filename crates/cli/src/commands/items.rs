//! List the line items of a lending order.
//!
//! # Usage
//!
//! ```bash
//! lendstock items L-100
//! ```

use lendstock_core::{LentLineItem, OrderId};

use super::connect;

/// Print every line of `order_id`, marking which ones can still be reconciled.
///
/// # Errors
///
/// Returns an error if configuration is missing or the backend call fails.
pub async fn list(order_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    let order_id = OrderId::new(order_id);

    let order = client.get_lent_order(&order_id).await?;
    let items = client.get_lent_line_items(&order_id).await?;

    tracing::info!(
        order_id = %order_id,
        items = items.len(),
        "Fetched lent order"
    );

    #[allow(clippy::print_stdout)]
    {
        println!(
            "Order {} ({}, employee {})",
            order.order_id, order.shop_name, order.employee_id
        );
        println!("{}", header());
        for item in &items {
            println!("{}", row(item));
        }
        let eligible = items.iter().filter(|item| item.is_eligible()).count();
        println!("{eligible} of {} items can be reconciled", items.len());
    }

    Ok(())
}

fn header() -> String {
    format!(
        "{:<20} {:<28} {:>6} {:<4} {:<10} {}",
        "IDENTITY", "PRODUCT", "QTY", "KIND", "STATUS", "BOX"
    )
}

fn row(item: &LentLineItem) -> String {
    let kind = if item.is_serialized() { "SN" } else { "BOX" };
    let marker = if item.is_eligible() { "" } else { " (done)" };
    format!(
        "{:<20} {:<28} {:>6} {:<4} {:<10} {}{marker}",
        item.identity(),
        item.product_name,
        item.units(),
        kind,
        item.status,
        item.box_barcode,
    )
}
