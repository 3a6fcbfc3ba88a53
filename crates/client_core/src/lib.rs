use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Asset, AssetId, FinancialSummary, Order, OrderId, StockItem, StockItemId},
    error::ErrorBody,
    protocol::{
        Ack, AssetConditionUpdate, AssetUpsert, LoginRequest, LoginResponse, NewMaterial,
        NewPackaging, OrderPage, OrderUpsert, StatusUpdate, StockConsume, Suggestions,
        TestimonialUpdate,
    },
};
use tracing::{info, warn};
use url::Url;

pub mod error;
pub mod format;
pub mod inventory;
pub mod order_form;
pub mod recap;
pub mod session;
pub mod stock;

pub use error::ClientError;
pub use format::format_rupiah;
pub use inventory::AssetViewModel;
pub use order_form::OrderDraft;
pub use recap::{sort_orders, validate_testimonial_url, RecapViewModel, PAGE_SIZE};
pub use session::{
    default_token_path, AuthSession, FileTokenStore, MemoryTokenStore, TokenStore,
};
pub use stock::{validate_consume, NewStock, StockKind, StockViewModel};

/// The backend surface the view-models depend on. `ApiClient` is the real
/// implementation; tests substitute counting fakes.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn fetch_orders(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<OrderPage, ClientError>;
    async fn fetch_summary(&self) -> Result<FinancialSummary, ClientError>;
    async fn update_order_status(
        &self,
        id: &OrderId,
        delta: StatusUpdate,
    ) -> Result<Ack, ClientError>;
    async fn attach_testimonial(
        &self,
        id: &OrderId,
        body: &TestimonialUpdate,
    ) -> Result<Ack, ClientError>;
    async fn download_report(&self) -> Result<Vec<u8>, ClientError>;

    async fn fetch_stock(
        &self,
        kind: StockKind,
        search: &str,
    ) -> Result<Vec<StockItem>, ClientError>;
    async fn create_material(&self, body: &NewMaterial) -> Result<Ack, ClientError>;
    async fn create_packaging(&self, body: &NewPackaging) -> Result<Ack, ClientError>;
    async fn consume_stock(
        &self,
        kind: StockKind,
        id: &StockItemId,
        body: StockConsume,
    ) -> Result<Ack, ClientError>;

    async fn fetch_assets(&self, search: &str) -> Result<Vec<Asset>, ClientError>;
    async fn create_asset(&self, body: &AssetUpsert) -> Result<Ack, ClientError>;
    async fn replace_asset(&self, id: &AssetId, body: &AssetUpsert) -> Result<Ack, ClientError>;
    async fn update_asset_condition(
        &self,
        id: &AssetId,
        body: AssetConditionUpdate,
    ) -> Result<Ack, ClientError>;
    async fn delete_asset(&self, id: &AssetId) -> Result<Ack, ClientError>;
}

/// Thin HTTP wrapper over the admin backend (base path `/api`). Holds the
/// injected session and attaches its bearer token to every request after
/// login. No retries, no caching.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<AuthSession>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<AuthSession>) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::validation(format!("invalid API base URL: {err}")))?;
        Ok(Self {
            http: Client::new(),
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    async fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Decodes a success body, or maps a non-2xx response to
    /// [`ClientError::Api`] carrying the backend's `msg` when present.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        Err(Self::error_from(status, response).await)
    }

    async fn error_from(status: StatusCode, response: Response) -> ClientError {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.msg)
            .unwrap_or_else(|| format!("request failed with status {status}"));
        warn!(%status, "api: backend reported an error: {message}");
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Exchanges credentials for a bearer token and persists it in the
    /// session. A rejected login stores nothing.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = Self::decode(response).await?;
        self.session.store_token(&body.token).await?;
        info!(username, "api: logged in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.session.logout().await?;
        Ok(())
    }

    pub async fn fetch_order(&self, id: &OrderId) -> Result<Order, ClientError> {
        let response = self
            .authed(self.http.get(self.endpoint(&format!("/orders/{id}"))))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn create_order(&self, body: &OrderUpsert) -> Result<Ack, ClientError> {
        let response = self
            .authed(self.http.post(self.endpoint("/orders")).json(body))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn replace_order(&self, id: &OrderId, body: &OrderUpsert) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .put(self.endpoint(&format!("/orders/{id}")))
                    .json(body),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Permanent removal; callers confirm first.
    pub async fn delete_order(&self, id: &OrderId) -> Result<Ack, ClientError> {
        let response = self
            .authed(self.http.delete(self.endpoint(&format!("/orders/{id}"))))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn fetch_suggestions(&self) -> Result<Suggestions, ClientError> {
        let response = self
            .authed(self.http.get(self.endpoint("/orders/suggestions")))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn replace_material(
        &self,
        id: &StockItemId,
        body: &NewMaterial,
    ) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .put(self.endpoint(&format!("/bahan/{id}")))
                    .json(body),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn replace_packaging(
        &self,
        id: &StockItemId,
        body: &NewPackaging,
    ) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .put(self.endpoint(&format!("/packaging/{id}")))
                    .json(body),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn delete_stock(
        &self,
        kind: StockKind,
        id: &StockItemId,
    ) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .delete(self.endpoint(&format!("{}/{id}", kind.path()))),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl AdminApi for ApiClient {
    async fn fetch_orders(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<OrderPage, ClientError> {
        let response = self
            .authed(self.http.get(self.endpoint("/orders")).query(&[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("search", search.to_string()),
            ]))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn fetch_summary(&self) -> Result<FinancialSummary, ClientError> {
        let response = self
            .authed(self.http.get(self.endpoint("/orders/summary")))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        delta: StatusUpdate,
    ) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .patch(self.endpoint(&format!("/orders/{id}/status")))
                    .json(&delta),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn attach_testimonial(
        &self,
        id: &OrderId,
        body: &TestimonialUpdate,
    ) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .patch(self.endpoint(&format!("/orders/{id}/testimonial")))
                    .json(body),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn download_report(&self) -> Result<Vec<u8>, ClientError> {
        let response = self
            .authed(self.http.get(self.endpoint("/reports/download")))
            .await
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status, response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_stock(
        &self,
        kind: StockKind,
        search: &str,
    ) -> Result<Vec<StockItem>, ClientError> {
        let response = self
            .authed(
                self.http
                    .get(self.endpoint(kind.path()))
                    .query(&[("search", search)]),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_material(&self, body: &NewMaterial) -> Result<Ack, ClientError> {
        let response = self
            .authed(self.http.post(self.endpoint("/bahan")).json(body))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_packaging(&self, body: &NewPackaging) -> Result<Ack, ClientError> {
        let response = self
            .authed(self.http.post(self.endpoint("/packaging")).json(body))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn consume_stock(
        &self,
        kind: StockKind,
        id: &StockItemId,
        body: StockConsume,
    ) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .patch(self.endpoint(&format!("{}/{id}/stock", kind.path())))
                    .json(&body),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn fetch_assets(&self, search: &str) -> Result<Vec<Asset>, ClientError> {
        let response = self
            .authed(
                self.http
                    .get(self.endpoint("/inventaris"))
                    .query(&[("search", search)]),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_asset(&self, body: &AssetUpsert) -> Result<Ack, ClientError> {
        let response = self
            .authed(self.http.post(self.endpoint("/inventaris")).json(body))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn replace_asset(&self, id: &AssetId, body: &AssetUpsert) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .put(self.endpoint(&format!("/inventaris/{id}")))
                    .json(body),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_asset_condition(
        &self,
        id: &AssetId,
        body: AssetConditionUpdate,
    ) -> Result<Ack, ClientError> {
        let response = self
            .authed(
                self.http
                    .patch(self.endpoint(&format!("/inventaris/{id}/kondisi")))
                    .json(&body),
            )
            .await
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_asset(&self, id: &AssetId) -> Result<Ack, ClientError> {
        let response = self
            .authed(self.http.delete(self.endpoint(&format!("/inventaris/{id}"))))
            .await
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
