use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{AssetCondition, Order, OrderItem, OrderStatus, PaymentStatus, Unit};

/// One page of orders as returned by `GET /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Body for `POST /orders` and `PUT /orders/:id`. The grand total is not
/// sent; the backend recomputes it from the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpsert {
    #[serde(rename = "nama_pemesan")]
    pub customer_name: String,
    #[serde(rename = "telp_pemesan")]
    pub customer_phone: String,
    #[serde(rename = "nama_penerima")]
    pub recipient_name: String,
    #[serde(rename = "telp_penerima")]
    pub recipient_phone: String,
    #[serde(rename = "alamat_pengiriman")]
    pub delivery_address: String,
    pub items: Vec<OrderItem>,
    #[serde(rename = "tgl_kirim", default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(rename = "jam_kirim", default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(rename = "catatan", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "ucapan_untuk", default, skip_serializing_if = "Option::is_none")]
    pub card_to: Option<String>,
    #[serde(rename = "ucapan_isi", default, skip_serializing_if = "Option::is_none")]
    pub card_message: Option<String>,
    #[serde(rename = "ucapan_dari", default, skip_serializing_if = "Option::is_none")]
    pub card_from: Option<String>,
}

/// Partial body for `PATCH /orders/:id/status`; either or both fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(rename = "status_pesanan", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(
        rename = "status_pembayaran",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payment: Option<PaymentStatus>,
}

impl StatusUpdate {
    pub fn completed() -> Self {
        Self {
            status: Some(OrderStatus::Completed),
            ..Self::default()
        }
    }

    pub fn paid() -> Self {
        Self {
            payment: Some(PaymentStatus::Paid),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment.is_none()
    }
}

/// Body for `PATCH /orders/:id/testimonial`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialUpdate {
    #[serde(rename = "link_testimoni")]
    pub url: String,
}

/// Body for `PATCH /bahan/:id/stock` and `PATCH /packaging/:id/stock`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockConsume {
    #[serde(rename = "jumlah_keluar")]
    pub amount: f64,
}

/// Body for `POST /bahan`. When the name already exists the backend adds
/// stock and capital to the existing row (restock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaterial {
    #[serde(rename = "nama_bahan")]
    pub name: String,
    #[serde(rename = "stok")]
    pub stock: f64,
    #[serde(rename = "satuan")]
    pub unit: Unit,
    #[serde(rename = "total_harga")]
    pub total_price: f64,
    #[serde(rename = "tgl_beli")]
    pub purchase_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

/// Body for `POST /packaging`; same restock semantics as materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPackaging {
    #[serde(rename = "nama_packaging")]
    pub name: String,
    #[serde(rename = "stok")]
    pub stock: f64,
    #[serde(rename = "satuan")]
    pub unit: Unit,
    #[serde(rename = "total_harga")]
    pub total_price: f64,
}

/// Body for `POST /inventaris` and `PUT /inventaris/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetUpsert {
    #[serde(rename = "nama_barang")]
    pub name: String,
    #[serde(rename = "jumlah")]
    pub quantity: u32,
    #[serde(rename = "harga_satuan")]
    pub unit_price: f64,
    #[serde(rename = "total_harga")]
    pub total_price: f64,
    #[serde(rename = "kondisi")]
    pub condition: AssetCondition,
    #[serde(rename = "tgl_beli", default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
}

impl AssetUpsert {
    /// Total price is derived, never supplied independently.
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit_price: f64,
        condition: AssetCondition,
        purchase_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            total_price: f64::from(quantity) * unit_price,
            condition,
            purchase_date,
        }
    }
}

/// Body for `PATCH /inventaris/:id/kondisi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetConditionUpdate {
    #[serde(rename = "kondisi_baru")]
    pub condition: AssetCondition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSuggestion {
    #[serde(rename = "nama_pemesan")]
    pub name: String,
    #[serde(rename = "telp_pemesan")]
    pub phone: String,
}

/// Known customers and item variants for order-form autofill,
/// from `GET /orders/suggestions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default)]
    pub customers: Vec<CustomerSuggestion>,
    #[serde(default)]
    pub variants: Vec<String>,
}

/// Generic mutation acknowledgement; `msg` is shown to the operator when
/// present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}
