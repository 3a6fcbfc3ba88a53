use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Short display form: the last six characters, uppercased.
            pub fn short(&self) -> String {
                let tail = self.0.len().saturating_sub(6);
                self.0[tail..].to_uppercase()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(OrderId);
id_newtype!(StockItemId);
id_newtype!(AssetId);

/// Order completion status. Wire values are the backend's Indonesian labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Belum Selesai")]
    Pending,
    #[serde(rename = "Selesai")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Belum Lunas")]
    Unpaid,
    #[serde(rename = "Lunas")]
    Paid,
}

/// Unit of measure for stock items. The backend stores the lowercase label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Ltr,
    Kg,
    Gr,
    Cc,
    Ml,
    Pack,
    Biji,
    Pcs,
    Lembar,
}

impl Unit {
    /// Units accepted for raw materials.
    pub const MATERIAL_UNITS: &'static [Unit] = &[
        Unit::Ltr,
        Unit::Kg,
        Unit::Gr,
        Unit::Cc,
        Unit::Ml,
        Unit::Pack,
        Unit::Biji,
        Unit::Pcs,
        Unit::Lembar,
    ];

    /// Units accepted for packaging.
    pub const PACKAGING_UNITS: &'static [Unit] = &[Unit::Pcs, Unit::Lembar, Unit::Biji];

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Ltr => "ltr",
            Unit::Kg => "kg",
            Unit::Gr => "gr",
            Unit::Cc => "cc",
            Unit::Ml => "ml",
            Unit::Pack => "pack",
            Unit::Biji => "biji",
            Unit::Pcs => "pcs",
            Unit::Lembar => "lembar",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "ltr" => Ok(Unit::Ltr),
            "kg" => Ok(Unit::Kg),
            "gr" => Ok(Unit::Gr),
            "cc" => Ok(Unit::Cc),
            "ml" => Ok(Unit::Ml),
            "pack" => Ok(Unit::Pack),
            "biji" => Ok(Unit::Biji),
            "pcs" => Ok(Unit::Pcs),
            "lembar" => Ok(Unit::Lembar),
            other => Err(format!("unknown unit '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetCondition {
    #[serde(rename = "Baik")]
    Good,
    #[serde(rename = "Rusak")]
    Damaged,
    #[serde(rename = "Hilang")]
    Lost,
}

impl AssetCondition {
    pub fn label(&self) -> &'static str {
        match self {
            AssetCondition::Good => "Baik",
            AssetCondition::Damaged => "Rusak",
            AssetCondition::Lost => "Hilang",
        }
    }
}

impl std::fmt::Display for AssetCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AssetCondition {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "baik" | "good" => Ok(AssetCondition::Good),
            "rusak" | "damaged" => Ok(AssetCondition::Damaged),
            "hilang" | "lost" => Ok(AssetCondition::Lost),
            other => Err(format!("unknown condition '{other}'")),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OrderStatus::Pending => "Belum Selesai",
            OrderStatus::Completed => "Selesai",
        })
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PaymentStatus::Unpaid => "Belum Lunas",
            PaymentStatus::Paid => "Lunas",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "nama_varian")]
    pub variant: String,
    #[serde(rename = "jumlah")]
    pub quantity: u32,
    #[serde(rename = "harga_satuan")]
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
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
    /// Computed server-side; authoritative once returned.
    #[serde(rename = "harga_total")]
    pub grand_total: f64,
    #[serde(rename = "tgl_pesan", default, skip_serializing_if = "Option::is_none")]
    pub ordered_on: Option<DateTime<Utc>>,
    #[serde(rename = "tgl_kirim", default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
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
    #[serde(rename = "status_pesanan")]
    pub status: OrderStatus,
    #[serde(rename = "status_pembayaran")]
    pub payment: PaymentStatus,
    #[serde(rename = "link_testimoni", default, skip_serializing_if = "Option::is_none")]
    pub testimonial_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    #[serde(rename = "bahan")]
    pub materials: f64,
    pub packaging: f64,
    #[serde(rename = "aset")]
    pub assets: f64,
}

/// Read-only financial snapshot, recomputed server-side on every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    #[serde(rename = "total_pendapatan")]
    pub paid_revenue: f64,
    #[serde(rename = "total_pengeluaran")]
    pub total_expenditure: f64,
    #[serde(rename = "keuntungan_bersih")]
    pub net_profit: f64,
    #[serde(rename = "jumlah_pesanan_selesai")]
    pub completed_orders: u64,
    #[serde(rename = "pengeluaran")]
    pub expenses: ExpenseBreakdown,
}

/// A raw-material or packaging stock row. The two collections share the
/// shape; only the wire name of the `name` field differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(rename = "_id")]
    pub id: StockItemId,
    #[serde(rename = "nama_bahan", alias = "nama_packaging")]
    pub name: String,
    #[serde(rename = "stok")]
    pub remaining: f64,
    #[serde(rename = "satuan")]
    pub unit: Unit,
    /// Accumulated capital spent; consume operations leave it untouched.
    #[serde(rename = "total_harga")]
    pub total_capital: f64,
    #[serde(rename = "tgl_beli", default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "_id")]
    pub id: AssetId,
    #[serde(rename = "nama_barang")]
    pub name: String,
    #[serde(rename = "jumlah")]
    pub quantity: u32,
    #[serde(rename = "harga_satuan", default)]
    pub unit_price: f64,
    #[serde(rename = "total_harga")]
    pub total_price: f64,
    #[serde(rename = "kondisi")]
    pub condition: AssetCondition,
    #[serde(rename = "tgl_beli", default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_round_trips_backend_field_names() {
        let raw = serde_json::json!({
            "_id": "66f1a2b3c4d5e6f7a8b9c0d1",
            "nama_pemesan": "Rina",
            "telp_pemesan": "0812000111",
            "nama_penerima": "Dewi",
            "telp_penerima": "0812000222",
            "alamat_pengiriman": "Jl. Melati 4",
            "items": [
                { "nama_varian": "Box 6pcs", "jumlah": 2, "harga_satuan": 30000.0, "subtotal": 60000.0 }
            ],
            "harga_total": 60000.0,
            "status_pesanan": "Belum Selesai",
            "status_pembayaran": "Lunas",
            "createdAt": "2026-08-01T03:00:00Z"
        });

        let order: Order = serde_json::from_value(raw).expect("order fixture");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment, PaymentStatus::Paid);
        assert_eq!(order.items[0].subtotal, 60000.0);
        assert_eq!(order.id.short(), "B9C0D1");

        let back = serde_json::to_value(&order).expect("serialize");
        assert_eq!(back["status_pesanan"], "Belum Selesai");
        assert_eq!(back["harga_total"], 60000.0);
    }

    #[test]
    fn stock_item_accepts_both_collection_name_fields() {
        let material: StockItem = serde_json::from_value(serde_json::json!({
            "_id": "a1", "nama_bahan": "Tepung Terigu", "stok": 12.5,
            "satuan": "kg", "total_harga": 150000.0
        }))
        .expect("material");
        let packaging: StockItem = serde_json::from_value(serde_json::json!({
            "_id": "b2", "nama_packaging": "Box Mika", "stok": 40.0,
            "satuan": "pcs", "total_harga": 80000.0
        }))
        .expect("packaging");

        assert_eq!(material.name, "Tepung Terigu");
        assert_eq!(material.unit, Unit::Kg);
        assert_eq!(packaging.name, "Box Mika");
    }

    #[test]
    fn packaging_units_are_a_subset_of_material_units() {
        for unit in Unit::PACKAGING_UNITS {
            assert!(Unit::MATERIAL_UNITS.contains(unit));
        }
    }
}
