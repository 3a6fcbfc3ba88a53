//! Stock tracking for raw materials and packaging. The two collections are
//! structurally identical; the view-model is parameterized by kind.

use std::sync::Arc;

use shared::domain::{StockItem, StockItemId, Unit};
use shared::protocol::{NewMaterial, NewPackaging, StockConsume};
use tracing::info;

use crate::{error::ClientError, AdminApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockKind {
    Material,
    Packaging,
}

impl StockKind {
    /// Collection segment under the API base path.
    pub fn path(&self) -> &'static str {
        match self {
            StockKind::Material => "/bahan",
            StockKind::Packaging => "/packaging",
        }
    }

    pub fn allowed_units(&self) -> &'static [Unit] {
        match self {
            StockKind::Material => Unit::MATERIAL_UNITS,
            StockKind::Packaging => Unit::PACKAGING_UNITS,
        }
    }
}

/// New stock input for either collection.
#[derive(Debug, Clone, PartialEq)]
pub enum NewStock {
    Material(NewMaterial),
    Packaging(NewPackaging),
}

/// Consume-request bounds: the delta must be positive and must not exceed
/// the remaining stock. The backend enforces the same rule; this check
/// merely refuses requests that are already known to fail.
pub fn validate_consume(amount: f64, remaining: f64) -> Result<(), ClientError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ClientError::validation(
            "consume amount must be greater than zero",
        ));
    }
    if amount > remaining {
        return Err(ClientError::validation(format!(
            "consume amount {amount} exceeds remaining stock {remaining}"
        )));
    }
    Ok(())
}

pub struct StockViewModel {
    api: Arc<dyn AdminApi>,
    kind: StockKind,
    items: Vec<StockItem>,
    active_search: String,
    loading: bool,
    error: Option<String>,
}

impl StockViewModel {
    pub fn new(api: Arc<dyn AdminApi>, kind: StockKind) -> Self {
        Self {
            api,
            kind,
            items: Vec::new(),
            active_search: String::new(),
            loading: false,
            error: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        self.error = None;
        let fetched = self.api.fetch_stock(self.kind, &self.active_search).await;
        self.loading = false;

        match fetched {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(err) => {
                // Keep the previous rows on screen.
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn search(&mut self, keyword: impl Into<String>) -> Result<(), ClientError> {
        self.active_search = keyword.into();
        self.load().await
    }

    pub async fn reset_search(&mut self) -> Result<(), ClientError> {
        self.active_search.clear();
        self.load().await
    }

    /// Creates or restocks an item, then reloads. Returns the backend's
    /// acknowledgement message when it sent one.
    pub async fn add(&mut self, draft: NewStock) -> Result<Option<String>, ClientError> {
        let ack = match (&self.kind, draft) {
            (StockKind::Material, NewStock::Material(body)) => {
                validate_new_stock(&body.name, body.stock, body.total_price)?;
                validate_unit(self.kind, body.unit)?;
                self.api.create_material(&body).await?
            }
            (StockKind::Packaging, NewStock::Packaging(body)) => {
                validate_new_stock(&body.name, body.stock, body.total_price)?;
                validate_unit(self.kind, body.unit)?;
                self.api.create_packaging(&body).await?
            }
            _ => {
                return Err(ClientError::validation(
                    "stock input does not match this collection",
                ))
            }
        };
        info!(kind = self.kind.path(), "stock: item saved");
        self.load().await?;
        Ok(ack.msg)
    }

    /// Subtracts consumed quantity. Rejected locally when the amount is
    /// non-positive or exceeds the known remaining stock; a backend
    /// rejection (insufficient stock) surfaces verbatim and changes
    /// nothing.
    pub async fn consume(&mut self, id: &StockItemId, amount: f64) -> Result<(), ClientError> {
        let remaining = self
            .items
            .iter()
            .find(|item| &item.id == id)
            .map(|item| item.remaining)
            .unwrap_or(f64::INFINITY);
        validate_consume(amount, remaining)?;

        self.api
            .consume_stock(self.kind, id, StockConsume { amount })
            .await?;
        info!(kind = self.kind.path(), item = %id, amount, "stock: consumed");
        self.load().await
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn kind(&self) -> StockKind {
        self.kind
    }

    pub fn active_search(&self) -> &str {
        &self.active_search
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

fn validate_new_stock(name: &str, stock: f64, total_price: f64) -> Result<(), ClientError> {
    if name.trim().is_empty() {
        return Err(ClientError::validation("stock name is required"));
    }
    if !stock.is_finite() || stock <= 0.0 {
        return Err(ClientError::validation(
            "incoming stock must be greater than zero",
        ));
    }
    if !total_price.is_finite() || total_price <= 0.0 {
        return Err(ClientError::validation(
            "purchase price must be greater than zero",
        ));
    }
    Ok(())
}

fn validate_unit(kind: StockKind, unit: Unit) -> Result<(), ClientError> {
    if kind.allowed_units().contains(&unit) {
        return Ok(());
    }
    Err(ClientError::validation(format!(
        "unit {unit} is not valid for {}",
        kind.path().trim_start_matches('/')
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_rejects_non_positive_amounts() {
        assert!(validate_consume(0.0, 50.0).is_err());
        assert!(validate_consume(-3.0, 50.0).is_err());
        assert!(validate_consume(f64::NAN, 50.0).is_err());
    }

    #[test]
    fn consume_rejects_amounts_beyond_remaining_stock() {
        assert!(validate_consume(50.1, 50.0).is_err());
        assert!(validate_consume(20.0, 50.0).is_ok());
        assert!(validate_consume(50.0, 50.0).is_ok());
    }

    #[test]
    fn packaging_rejects_material_only_units() {
        assert!(validate_unit(StockKind::Packaging, Unit::Kg).is_err());
        assert!(validate_unit(StockKind::Packaging, Unit::Pcs).is_ok());
        assert!(validate_unit(StockKind::Material, Unit::Kg).is_ok());
    }

    #[test]
    fn new_stock_presence_checks() {
        assert!(validate_new_stock("", 10.0, 5000.0).is_err());
        assert!(validate_new_stock("Tepung", 0.0, 5000.0).is_err());
        assert!(validate_new_stock("Tepung", 10.0, 0.0).is_err());
        assert!(validate_new_stock("Tepung", 10.0, 5000.0).is_ok());
    }
}
