//! Fixed-asset tracking. Condition changes are narrow one-way triggers in
//! the UI, but the wire type carries any condition value the backend
//! accepts.

use std::sync::Arc;

use shared::domain::{Asset, AssetCondition, AssetId};
use shared::protocol::{AssetConditionUpdate, AssetUpsert};
use tracing::info;

use crate::{error::ClientError, AdminApi};

pub struct AssetViewModel {
    api: Arc<dyn AdminApi>,
    assets: Vec<Asset>,
    active_search: String,
    loading: bool,
    error: Option<String>,
}

impl AssetViewModel {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            assets: Vec::new(),
            active_search: String::new(),
            loading: false,
            error: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        self.error = None;
        let fetched = self.api.fetch_assets(&self.active_search).await;
        self.loading = false;

        match fetched {
            Ok(assets) => {
                self.assets = assets;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn search(&mut self, keyword: impl Into<String>) -> Result<(), ClientError> {
        self.active_search = keyword.into();
        self.load().await
    }

    pub async fn add(&mut self, body: AssetUpsert) -> Result<Option<String>, ClientError> {
        validate_asset(&body)?;
        let ack = self.api.create_asset(&body).await?;
        info!(asset = %body.name, "inventory: asset added");
        self.load().await?;
        Ok(ack.msg)
    }

    /// Full replacement (edit); the request constructor recomputes the
    /// total price from quantity and unit price.
    pub async fn replace(&mut self, id: &AssetId, body: AssetUpsert) -> Result<(), ClientError> {
        validate_asset(&body)?;
        self.api.replace_asset(id, &body).await?;
        info!(asset = %id, "inventory: asset replaced");
        self.load().await
    }

    pub async fn set_condition(
        &mut self,
        id: &AssetId,
        condition: AssetCondition,
    ) -> Result<(), ClientError> {
        self.api
            .update_asset_condition(id, AssetConditionUpdate { condition })
            .await?;
        info!(asset = %id, ?condition, "inventory: condition updated");
        self.load().await
    }

    /// Permanent removal; callers confirm before reaching this point.
    pub async fn delete(&mut self, id: &AssetId) -> Result<(), ClientError> {
        self.api.delete_asset(id).await?;
        info!(asset = %id, "inventory: asset deleted");
        self.load().await
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
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

fn validate_asset(body: &AssetUpsert) -> Result<(), ClientError> {
    if body.name.trim().is_empty() {
        return Err(ClientError::validation("asset name is required"));
    }
    if body.quantity == 0 {
        return Err(ClientError::validation("asset quantity must be at least 1"));
    }
    if !body.unit_price.is_finite() || body.unit_price <= 0.0 {
        return Err(ClientError::validation("asset unit price must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_presence_checks() {
        let good = AssetUpsert::new("Oven", 2, 1_250_000.0, AssetCondition::Good, None);
        assert!(validate_asset(&good).is_ok());

        let unnamed = AssetUpsert::new("  ", 2, 1_250_000.0, AssetCondition::Good, None);
        assert!(validate_asset(&unnamed).is_err());

        let empty = AssetUpsert::new("Oven", 0, 1_250_000.0, AssetCondition::Good, None);
        assert!(validate_asset(&empty).is_err());

        let free = AssetUpsert::new("Oven", 2, 0.0, AssetCondition::Good, None);
        assert!(validate_asset(&free).is_err());
    }
}
