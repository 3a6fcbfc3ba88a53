//! Order recap view-model: the paginated order table plus the financial
//! summary cards. Every mutation is followed by a full reload rather than a
//! local patch, so displayed state is never more than one round trip stale.
//! That reload-over-optimistic-update policy is deliberate and load-bearing.

use std::{collections::HashMap, sync::Arc};

use futures::future::try_join;
use shared::domain::{FinancialSummary, Order, OrderId, OrderStatus};
use shared::protocol::{StatusUpdate, TestimonialUpdate};
use tracing::{info, warn};

use crate::{error::ClientError, AdminApi};

pub const PAGE_SIZE: u32 = 20;

/// Display order for a fetched page: pending orders first, completed last;
/// newest first within each group. Stable and side-effect free.
///
/// Runs over the current page only: a pending order on a later backend
/// page still renders after this page's completed orders.
/// TODO: move the two-key ordering behind the orders endpoint so it spans
/// pages.
pub fn sort_orders(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        let a_done = a.status == OrderStatus::Completed;
        let b_done = b.status == OrderStatus::Completed;
        a_done
            .cmp(&b_done)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Local testimonial-link check, applied before any network call. Anything
/// not starting with `http` (which covers `https`) is refused.
pub fn validate_testimonial_url(raw: &str) -> Result<&str, ClientError> {
    let url = raw.trim();
    if url.is_empty() || !url.starts_with("http") {
        return Err(ClientError::validation(
            "testimonial link must start with http/https",
        ));
    }
    Ok(url)
}

pub struct RecapViewModel {
    api: Arc<dyn AdminApi>,
    page: u32,
    total_pages: u32,
    active_search: String,
    orders: Vec<Order>,
    summary: Option<FinancialSummary>,
    testimonial_drafts: HashMap<OrderId, String>,
    loading: bool,
    error: Option<String>,
}

impl RecapViewModel {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            page: 1,
            total_pages: 1,
            active_search: String::new(),
            orders: Vec::new(),
            summary: None,
            testimonial_drafts: HashMap::new(),
            loading: false,
            error: None,
        }
    }

    /// Fetches the summary and the current order page together. On success
    /// the table is replaced with the sorted page; on failure the previous
    /// table and summary stay visible and only the error banner changes.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        self.error = None;

        let fetched = try_join(
            self.api.fetch_summary(),
            self.api
                .fetch_orders(self.page, PAGE_SIZE, &self.active_search),
        )
        .await;
        self.loading = false;

        match fetched {
            Ok((summary, page)) => {
                let mut orders = page.orders;
                sort_orders(&mut orders);

                // Drafts follow the page: ids that left are dropped, ids
                // that stayed keep their in-flight text, new ids start
                // empty.
                let mut drafts = HashMap::with_capacity(orders.len());
                for order in &orders {
                    let existing = self
                        .testimonial_drafts
                        .remove(&order.id)
                        .unwrap_or_default();
                    drafts.insert(order.id.clone(), existing);
                }

                self.summary = Some(summary);
                self.page = page.current_page.max(1);
                self.total_pages = page.total_pages.max(1);
                self.testimonial_drafts = drafts;
                self.orders = orders;
                Ok(())
            }
            Err(err) => {
                warn!("recap: load failed: {err}");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Applies a new keyword and reloads from page 1. Search and page move
    /// together so a stale "page N of the old search" is never shown.
    pub async fn search(&mut self, keyword: impl Into<String>) -> Result<(), ClientError> {
        self.active_search = keyword.into();
        self.page = 1;
        self.load().await
    }

    pub async fn reset_search(&mut self) -> Result<(), ClientError> {
        self.active_search.clear();
        self.page = 1;
        self.load().await
    }

    /// Clamps to the known page range; a no-op (no request) when the clamp
    /// lands on the current page.
    pub async fn set_page(&mut self, page: u32) -> Result<(), ClientError> {
        let clamped = page.clamp(1, self.total_pages);
        if clamped == self.page {
            return Ok(());
        }
        self.page = clamped;
        self.load().await
    }

    pub async fn next_page(&mut self) -> Result<(), ClientError> {
        self.set_page(self.page.saturating_add(1)).await
    }

    pub async fn previous_page(&mut self) -> Result<(), ClientError> {
        self.set_page(self.page.saturating_sub(1)).await
    }

    /// Sends a status delta, then reloads. Local state is never mutated on
    /// its own: a failed request changes nothing and the table keeps
    /// showing the confirmed status.
    pub async fn update_status(
        &mut self,
        id: &OrderId,
        delta: StatusUpdate,
    ) -> Result<(), ClientError> {
        if delta.is_empty() {
            return Err(ClientError::validation("status update carries no change"));
        }
        self.api.update_order_status(id, delta).await?;
        info!(order = %id, "recap: status updated");
        self.load().await
    }

    pub fn set_testimonial_draft(&mut self, id: &OrderId, value: impl Into<String>) {
        if let Some(draft) = self.testimonial_drafts.get_mut(id) {
            *draft = value.into();
        }
    }

    pub fn testimonial_draft(&self, id: &OrderId) -> Option<&str> {
        self.testimonial_drafts.get(id).map(String::as_str)
    }

    /// Submits the drafted link for an order. Drafts that are empty or do
    /// not start with `http` are rejected locally, before any network call.
    pub async fn attach_testimonial(&mut self, id: &OrderId) -> Result<(), ClientError> {
        let draft = self
            .testimonial_drafts
            .get(id)
            .cloned()
            .unwrap_or_default();
        let url = validate_testimonial_url(&draft)?.to_string();

        self.api
            .attach_testimonial(id, &TestimonialUpdate { url })
            .await?;
        info!(order = %id, "recap: testimonial attached");
        self.load().await
    }

    /// Fetches the binary report. View-model state is untouched either way;
    /// the caller decides where the bytes land.
    pub async fn download_report(&self) -> Result<Vec<u8>, ClientError> {
        self.api.download_report().await
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn summary(&self) -> Option<&FinancialSummary> {
        self.summary.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn active_search(&self) -> &str {
        &self.active_search
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
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

#[cfg(test)]
#[path = "tests/recap_tests.rs"]
mod tests;
