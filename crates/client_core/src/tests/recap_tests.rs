use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use shared::domain::{
    Asset, AssetId, ExpenseBreakdown, FinancialSummary, Order, OrderId, OrderStatus,
    PaymentStatus, StockItem, StockItemId,
};
use shared::protocol::{
    Ack, AssetConditionUpdate, AssetUpsert, NewMaterial, NewPackaging, OrderPage, StatusUpdate,
    StockConsume, TestimonialUpdate,
};

use super::{sort_orders, RecapViewModel};
use crate::{AdminApi, ClientError, StockKind};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).single().expect("timestamp")
}

fn order(id: &str, status: OrderStatus, created_at: DateTime<Utc>) -> Order {
    Order {
        id: OrderId::from(id),
        customer_name: "Rina".into(),
        customer_phone: "0812000111".into(),
        recipient_name: "Dewi".into(),
        recipient_phone: "0812000222".into(),
        delivery_address: "Jl. Melati 4".into(),
        items: Vec::new(),
        grand_total: 55_000.0,
        ordered_on: None,
        delivery_date: None,
        delivery_time: None,
        note: None,
        card_to: None,
        card_message: None,
        card_from: None,
        status,
        payment: PaymentStatus::Unpaid,
        testimonial_url: None,
        created_at,
    }
}

fn summary() -> FinancialSummary {
    FinancialSummary {
        paid_revenue: 500_000.0,
        total_expenditure: 200_000.0,
        net_profit: 300_000.0,
        completed_orders: 4,
        expenses: ExpenseBreakdown {
            materials: 120_000.0,
            packaging: 50_000.0,
            assets: 30_000.0,
        },
    }
}

/// Counting fake standing in for the backend. Only the recap surface is
/// wired; the stock/asset methods are never reached from these tests.
struct FakeBackend {
    orders: Mutex<Vec<Order>>,
    total_pages: u32,
    fail_reads: AtomicBool,
    fetch_calls: AtomicU32,
    status_calls: AtomicU32,
    testimonial_calls: AtomicU32,
    last_query: Mutex<Option<(u32, String)>>,
}

impl FakeBackend {
    fn with_orders(orders: Vec<Order>) -> Arc<Self> {
        Self::with_pages(orders, 1)
    }

    fn with_pages(orders: Vec<Order>, total_pages: u32) -> Arc<Self> {
        Arc::new(Self {
            orders: Mutex::new(orders),
            total_pages,
            fail_reads: AtomicBool::new(false),
            fetch_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            testimonial_calls: AtomicU32::new(0),
            last_query: Mutex::new(None),
        })
    }

    fn fetches(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn unavailable() -> ClientError {
        ClientError::Api {
            status: 503,
            message: "backend unavailable".into(),
        }
    }

    fn unwired<T>() -> Result<T, ClientError> {
        Err(ClientError::validation("not wired in this fake"))
    }
}

#[async_trait]
impl AdminApi for FakeBackend {
    async fn fetch_orders(
        &self,
        page: u32,
        _limit: u32,
        search: &str,
    ) -> Result<OrderPage, ClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().expect("query lock") = Some((page, search.to_string()));
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(OrderPage {
            orders: self.orders.lock().expect("orders lock").clone(),
            current_page: page,
            total_pages: self.total_pages,
        })
    }

    async fn fetch_summary(&self) -> Result<FinancialSummary, ClientError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(summary())
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        delta: StatusUpdate,
    ) -> Result<Ack, ClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut orders = self.orders.lock().expect("orders lock");
        let order = orders
            .iter_mut()
            .find(|order| &order.id == id)
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: "Pesanan tidak ditemukan".into(),
            })?;
        if let Some(status) = delta.status {
            order.status = status;
        }
        if let Some(payment) = delta.payment {
            order.payment = payment;
        }
        Ok(Ack::default())
    }

    async fn attach_testimonial(
        &self,
        id: &OrderId,
        body: &TestimonialUpdate,
    ) -> Result<Ack, ClientError> {
        self.testimonial_calls.fetch_add(1, Ordering::SeqCst);
        let mut orders = self.orders.lock().expect("orders lock");
        if let Some(order) = orders.iter_mut().find(|order| &order.id == id) {
            order.testimonial_url = Some(body.url.clone());
        }
        Ok(Ack::default())
    }

    async fn download_report(&self) -> Result<Vec<u8>, ClientError> {
        Ok(b"spreadsheet-bytes".to_vec())
    }

    async fn fetch_stock(
        &self,
        _kind: StockKind,
        _search: &str,
    ) -> Result<Vec<StockItem>, ClientError> {
        Self::unwired()
    }

    async fn create_material(&self, _body: &NewMaterial) -> Result<Ack, ClientError> {
        Self::unwired()
    }

    async fn create_packaging(&self, _body: &NewPackaging) -> Result<Ack, ClientError> {
        Self::unwired()
    }

    async fn consume_stock(
        &self,
        _kind: StockKind,
        _id: &StockItemId,
        _body: StockConsume,
    ) -> Result<Ack, ClientError> {
        Self::unwired()
    }

    async fn fetch_assets(&self, _search: &str) -> Result<Vec<Asset>, ClientError> {
        Self::unwired()
    }

    async fn create_asset(&self, _body: &AssetUpsert) -> Result<Ack, ClientError> {
        Self::unwired()
    }

    async fn replace_asset(
        &self,
        _id: &AssetId,
        _body: &AssetUpsert,
    ) -> Result<Ack, ClientError> {
        Self::unwired()
    }

    async fn update_asset_condition(
        &self,
        _id: &AssetId,
        _body: AssetConditionUpdate,
    ) -> Result<Ack, ClientError> {
        Self::unwired()
    }

    async fn delete_asset(&self, _id: &AssetId) -> Result<Ack, ClientError> {
        Self::unwired()
    }
}

#[test]
fn sort_policy_places_every_pending_order_before_completed_ones() {
    let mut orders = vec![
        order("done-today", OrderStatus::Completed, ts(2, 9)),
        order("open-yesterday", OrderStatus::Pending, ts(1, 9)),
        order("done-older", OrderStatus::Completed, ts(1, 7)),
        order("open-today", OrderStatus::Pending, ts(2, 8)),
    ];
    sort_orders(&mut orders);

    let ids: Vec<&str> = orders.iter().map(|o| o.id.0.as_str()).collect();
    assert_eq!(
        ids,
        vec!["open-today", "open-yesterday", "done-today", "done-older"]
    );
}

#[test]
fn sort_policy_is_stable_for_equal_keys() {
    let mut orders = vec![
        order("first", OrderStatus::Pending, ts(1, 9)),
        order("second", OrderStatus::Pending, ts(1, 9)),
    ];
    sort_orders(&mut orders);
    assert_eq!(orders[0].id.0, "first");
    assert_eq!(orders[1].id.0, "second");
}

#[tokio::test]
async fn load_sorts_the_page_and_seeds_testimonial_drafts() {
    let backend = FakeBackend::with_orders(vec![
        order("done", OrderStatus::Completed, ts(2, 9)),
        order("open", OrderStatus::Pending, ts(1, 9)),
    ]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);

    vm.load().await.expect("load");

    assert_eq!(vm.orders()[0].id.0, "open");
    assert_eq!(vm.summary().expect("summary").net_profit, 300_000.0);
    assert_eq!(vm.testimonial_draft(&OrderId::from("open")), Some(""));
    assert_eq!(vm.testimonial_draft(&OrderId::from("done")), Some(""));
}

#[tokio::test]
async fn load_twice_yields_identical_state() {
    let backend = FakeBackend::with_orders(vec![
        order("a", OrderStatus::Pending, ts(1, 9)),
        order("b", OrderStatus::Completed, ts(2, 9)),
    ]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);

    vm.load().await.expect("first load");
    let first_orders = vm.orders().to_vec();
    let first_summary = *vm.summary().expect("summary");

    vm.load().await.expect("second load");
    assert_eq!(vm.orders(), first_orders.as_slice());
    assert_eq!(*vm.summary().expect("summary"), first_summary);
}

#[tokio::test]
async fn read_failure_preserves_prior_state_and_raises_the_banner() {
    let backend = FakeBackend::with_orders(vec![order("a", OrderStatus::Pending, ts(1, 9))]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");

    backend.fail_reads.store(true, Ordering::SeqCst);
    let err = vm.load().await.expect_err("failing load");
    assert!(matches!(err, ClientError::Api { status: 503, .. }));

    // The table never flashes empty.
    assert_eq!(vm.orders().len(), 1);
    assert!(vm.summary().is_some());
    assert_eq!(vm.error(), Some("backend unavailable"));

    vm.dismiss_error();
    assert_eq!(vm.error(), None);
}

#[tokio::test]
async fn search_resets_to_page_one_and_reaches_the_backend() {
    let backend = FakeBackend::with_pages(vec![order("a", OrderStatus::Pending, ts(1, 9))], 5);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");
    vm.set_page(4).await.expect("page 4");

    vm.search("Rina").await.expect("search");
    assert_eq!(vm.page(), 1);
    assert_eq!(vm.active_search(), "Rina");
    let (page, search) = backend
        .last_query
        .lock()
        .expect("query lock")
        .clone()
        .expect("query");
    assert_eq!((page, search.as_str()), (1, "Rina"));

    vm.reset_search().await.expect("reset");
    assert_eq!(vm.active_search(), "");
    assert_eq!(vm.page(), 1);
}

#[tokio::test]
async fn set_page_clamps_and_skips_the_fetch_at_the_boundary() {
    let backend = FakeBackend::with_pages(vec![order("a", OrderStatus::Pending, ts(1, 9))], 3);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");

    vm.set_page(99).await.expect("clamp high");
    assert_eq!(vm.page(), 3);
    assert!(!vm.has_next_page());

    vm.set_page(0).await.expect("clamp low");
    assert_eq!(vm.page(), 1);
    assert!(!vm.has_previous_page());

    let fetched_before = backend.fetches();
    vm.previous_page().await.expect("boundary no-op");
    assert_eq!(backend.fetches(), fetched_before);
}

#[tokio::test]
async fn status_update_shows_only_confirmed_state() {
    let backend = FakeBackend::with_orders(vec![order("a", OrderStatus::Pending, ts(1, 9))]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");

    vm.update_status(&OrderId::from("a"), StatusUpdate::completed())
        .await
        .expect("update");

    assert_eq!(backend.status_calls.load(Ordering::SeqCst), 1);
    assert_eq!(vm.orders()[0].status, OrderStatus::Completed);
}

#[tokio::test]
async fn empty_status_update_is_rejected_before_the_network() {
    let backend = FakeBackend::with_orders(vec![order("a", OrderStatus::Pending, ts(1, 9))]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");

    let err = vm
        .update_status(&OrderId::from("a"), StatusUpdate::default())
        .await
        .expect_err("empty update");
    assert!(err.is_validation());
    assert_eq!(backend.status_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_testimonial_drafts_never_reach_the_network() {
    let backend = FakeBackend::with_orders(vec![order("a", OrderStatus::Pending, ts(1, 9))]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");
    let fetched_before = backend.fetches();

    for draft in ["", "   ", "ftp://story", "instagram.com/story"] {
        vm.set_testimonial_draft(&OrderId::from("a"), draft);
        let err = vm
            .attach_testimonial(&OrderId::from("a"))
            .await
            .expect_err("invalid draft");
        assert!(err.is_validation());
    }

    assert_eq!(backend.testimonial_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.fetches(), fetched_before);
}

#[tokio::test]
async fn valid_testimonial_posts_then_reloads() {
    let backend = FakeBackend::with_orders(vec![order("a", OrderStatus::Pending, ts(1, 9))]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");
    let fetched_before = backend.fetches();

    vm.set_testimonial_draft(&OrderId::from("a"), "https://instagram.com/story/1");
    vm.attach_testimonial(&OrderId::from("a"))
        .await
        .expect("attach");

    assert_eq!(backend.testimonial_calls.load(Ordering::SeqCst), 1);
    assert!(backend.fetches() > fetched_before);
    assert_eq!(
        vm.orders()[0].testimonial_url.as_deref(),
        Some("https://instagram.com/story/1")
    );
}

#[tokio::test]
async fn drafts_follow_the_page_across_reloads() {
    let backend = FakeBackend::with_orders(vec![
        order("keep", OrderStatus::Pending, ts(1, 9)),
        order("drop", OrderStatus::Pending, ts(1, 8)),
    ]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");

    vm.set_testimonial_draft(&OrderId::from("keep"), "https://in-progress");
    backend
        .orders
        .lock()
        .expect("orders lock")
        .retain(|order| order.id.0 == "keep");

    vm.load().await.expect("reload");
    assert_eq!(
        vm.testimonial_draft(&OrderId::from("keep")),
        Some("https://in-progress")
    );
    assert_eq!(vm.testimonial_draft(&OrderId::from("drop")), None);
}

#[tokio::test]
async fn report_download_leaves_view_model_state_alone() {
    let backend = FakeBackend::with_orders(vec![order("a", OrderStatus::Pending, ts(1, 9))]);
    let mut vm = RecapViewModel::new(Arc::clone(&backend) as Arc<dyn AdminApi>);
    vm.load().await.expect("load");
    let orders_before = vm.orders().to_vec();

    let bytes = vm.download_report().await.expect("download");
    assert_eq!(bytes, b"spreadsheet-bytes");
    assert_eq!(vm.orders(), orders_before.as_slice());
}
