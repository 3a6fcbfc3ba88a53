//! Order intake draft: the cart being assembled before submission. All
//! arithmetic here is provisional; the backend recomputes totals on create.

use chrono::NaiveDate;
use shared::domain::{Order, OrderItem};
use shared::protocol::OrderUpsert;

use crate::error::ClientError;

#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub delivery_address: String,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<String>,
    pub note: Option<String>,
    pub card_to: Option<String>,
    pub card_message: Option<String>,
    pub card_from: Option<String>,
    items: Vec<OrderItem>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefills a draft from an existing order (edit mode). Line items keep
    /// their stored subtotals.
    pub fn from_order(order: Order) -> Self {
        Self {
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            recipient_name: order.recipient_name,
            recipient_phone: order.recipient_phone,
            delivery_address: order.delivery_address,
            delivery_date: order.delivery_date.map(|d| d.date_naive()),
            delivery_time: order.delivery_time,
            note: order.note,
            card_to: order.card_to,
            card_message: order.card_message,
            card_from: order.card_from,
            items: order.items,
        }
    }

    /// Adds a cart line. Name, a positive quantity, and a positive unit
    /// price are all required; the subtotal is quantity x unit price.
    pub fn add_item(
        &mut self,
        variant: &str,
        quantity: u32,
        unit_price: f64,
    ) -> Result<(), ClientError> {
        let variant = variant.trim();
        if variant.is_empty() {
            return Err(ClientError::validation("item name is required"));
        }
        if quantity == 0 {
            return Err(ClientError::validation("item quantity must be at least 1"));
        }
        if !unit_price.is_finite() || unit_price <= 0.0 {
            return Err(ClientError::validation("item unit price must be positive"));
        }

        self.items.push(OrderItem {
            variant: variant.to_string(),
            quantity,
            unit_price,
            subtotal: f64::from(quantity) * unit_price,
        });
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<OrderItem, ClientError> {
        if index >= self.items.len() {
            return Err(ClientError::validation(format!(
                "no cart item at position {index}"
            )));
        }
        Ok(self.items.remove(index))
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn grand_total(&self) -> f64 {
        self.items.iter().map(|item| item.subtotal).sum()
    }

    /// Presence validation, then the request body. Greeting-card fields and
    /// the note stay optional.
    pub fn into_request(self) -> Result<OrderUpsert, ClientError> {
        for (value, label) in [
            (&self.customer_name, "customer name"),
            (&self.customer_phone, "customer phone"),
            (&self.recipient_name, "recipient name"),
            (&self.recipient_phone, "recipient phone"),
            (&self.delivery_address, "delivery address"),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::validation(format!("{label} is required")));
            }
        }
        if self.items.is_empty() {
            return Err(ClientError::validation(
                "add at least one item to the order",
            ));
        }

        Ok(OrderUpsert {
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            recipient_name: self.recipient_name,
            recipient_phone: self.recipient_phone,
            delivery_address: self.delivery_address,
            items: self.items,
            delivery_date: self.delivery_date,
            delivery_time: self.delivery_time,
            note: self.note,
            card_to: self.card_to,
            card_message: self.card_message,
            card_from: self.card_from,
        })
    }
}
