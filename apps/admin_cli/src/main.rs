use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client_core::{
    format_rupiah, validate_testimonial_url, AdminApi, ApiClient, AssetViewModel, AuthSession,
    FileTokenStore, NewStock, OrderDraft, RecapViewModel, StockKind, StockViewModel, TokenStore,
};
use shared::domain::{Asset, AssetCondition, AssetId, Order, OrderId, StockItem, StockItemId, Unit};
use shared::protocol::{
    AssetUpsert, NewMaterial, NewPackaging, OrderUpsert, StatusUpdate, TestimonialUpdate,
};

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "admin-cli", version, about = "Admin panel for the bakery shop backend")]
struct Cli {
    /// Override the configured API base URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a session token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session token.
    Logout,
    /// Financial summary plus the paginated order table.
    Recap {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
    },
    #[command(subcommand)]
    Order(OrderCommand),
    /// Raw-material stock.
    #[command(subcommand)]
    Bahan(StockCommand),
    /// Packaging stock.
    #[command(subcommand)]
    Packaging(StockCommand),
    /// Fixed assets.
    #[command(subcommand)]
    Assets(AssetCommand),
    /// Download the spreadsheet report.
    Report {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct OrderFields {
    #[arg(long)]
    customer: String,
    #[arg(long)]
    customer_phone: String,
    #[arg(long)]
    recipient: String,
    #[arg(long)]
    recipient_phone: String,
    #[arg(long)]
    address: String,
    /// Cart line as NAME:QTY:PRICE; repeat for more items.
    #[arg(long = "item", value_name = "NAME:QTY:PRICE")]
    items: Vec<String>,
    #[arg(long)]
    deliver_on: Option<NaiveDate>,
    /// Delivery time, e.g. 14:00.
    #[arg(long)]
    deliver_at: Option<String>,
    #[arg(long)]
    note: Option<String>,
    #[arg(long)]
    card_to: Option<String>,
    #[arg(long)]
    card_message: Option<String>,
    #[arg(long)]
    card_from: Option<String>,
}

#[derive(Subcommand, Debug)]
enum OrderCommand {
    /// Create an order from the given fields and cart lines.
    New {
        #[command(flatten)]
        fields: OrderFields,
    },
    Show {
        id: String,
        /// Print the raw order as JSON instead of the readable layout.
        #[arg(long)]
        json: bool,
    },
    /// Replace an order wholesale (edit mode).
    Edit {
        id: String,
        #[command(flatten)]
        fields: OrderFields,
    },
    /// Permanently remove an order. Requires --yes.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Mark the order completed.
    Done {
        id: String,
    },
    /// Mark the order paid.
    Paid {
        id: String,
    },
    /// Attach a testimonial link.
    Testimonial {
        id: String,
        url: String,
    },
    /// Known customers and variants for autofill.
    Suggest,
}

#[derive(Subcommand, Debug)]
enum StockCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Create a stock row, or restock when the name already exists.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        stock: f64,
        #[arg(long)]
        unit: Unit,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        purchased_on: Option<NaiveDate>,
        #[arg(long)]
        supplier: Option<String>,
    },
    /// Subtract consumed quantity.
    Consume {
        id: String,
        amount: f64,
    },
}

#[derive(Subcommand, Debug)]
enum AssetCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: u32,
        #[arg(long)]
        unit_price: f64,
        #[arg(long, default_value = "baik")]
        condition: AssetCondition,
        #[arg(long)]
        purchased_on: Option<NaiveDate>,
    },
    /// Set the asset condition (baik/rusak/hilang).
    Condition {
        id: String,
        condition: AssetCondition,
    },
    /// Replace an asset; the total price is recomputed.
    Edit {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: u32,
        #[arg(long)]
        unit_price: f64,
        #[arg(long, default_value = "baik")]
        condition: AssetCondition,
        #[arg(long)]
        purchased_on: Option<NaiveDate>,
    },
    /// Permanently remove an asset. Requires --yes.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();
    let settings = load_settings();
    let api_base = cli.api_url.unwrap_or(settings.api_base_url);

    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&settings.token_path));
    let session = AuthSession::load(store).context("failed to restore session")?;
    let client = ApiClient::new(&api_base, Arc::clone(&session))?;

    match cli.command {
        Command::Login { username, password } => {
            client.login(&username, &password).await?;
            println!("Logged in as {username}.");
        }
        Command::Logout => {
            client.logout().await?;
            println!("Logged out.");
        }
        Command::Recap { page, search } => {
            require_login(&session).await?;
            let mut vm = RecapViewModel::new(Arc::new(client) as Arc<dyn AdminApi>);
            if search.is_empty() {
                vm.load().await?;
            } else {
                vm.search(search).await?;
            }
            if page > 1 {
                vm.set_page(page).await?;
            }
            print_recap(&vm);
        }
        Command::Order(command) => {
            require_login(&session).await?;
            run_order(client, command).await?;
        }
        Command::Bahan(command) => {
            require_login(&session).await?;
            run_stock(Arc::new(client), StockKind::Material, command).await?;
        }
        Command::Packaging(command) => {
            require_login(&session).await?;
            run_stock(Arc::new(client), StockKind::Packaging, command).await?;
        }
        Command::Assets(command) => {
            require_login(&session).await?;
            run_assets(Arc::new(client), command).await?;
        }
        Command::Report { out } => {
            require_login(&session).await?;
            let bytes = client.download_report().await?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "Laporan_{}.xlsx",
                    chrono::Local::now().format("%Y-%m-%d")
                ))
            });
            fs::write(&path, &bytes)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report saved to {} ({} bytes).", path.display(), bytes.len());
        }
    }

    Ok(())
}

/// Protected-command gate, the route-guard counterpart: no token, no entry.
async fn require_login(session: &AuthSession) -> Result<()> {
    if session.is_authenticated().await {
        Ok(())
    } else {
        bail!("not logged in; run `admin-cli login` first");
    }
}

async fn run_order(client: ApiClient, command: OrderCommand) -> Result<()> {
    match command {
        OrderCommand::New { fields } => {
            let request = build_order_request(fields)?;
            let ack = client.create_order(&request).await?;
            println!("{}", ack.msg.unwrap_or_else(|| "Order created.".into()));
        }
        OrderCommand::Show { id, json } => {
            let order = client.fetch_order(&OrderId(id)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&order)?);
            } else {
                print_order_detail(&order);
            }
        }
        OrderCommand::Edit { id, fields } => {
            let request = build_order_request(fields)?;
            let ack = client.replace_order(&OrderId(id), &request).await?;
            println!("{}", ack.msg.unwrap_or_else(|| "Order updated.".into()));
        }
        OrderCommand::Delete { id, yes } => {
            if !yes {
                bail!("deleting an order is permanent; pass --yes to confirm");
            }
            let ack = client.delete_order(&OrderId(id)).await?;
            println!("{}", ack.msg.unwrap_or_else(|| "Order deleted.".into()));
        }
        OrderCommand::Done { id } => {
            client
                .update_order_status(&OrderId(id), StatusUpdate::completed())
                .await?;
            println!("Order marked completed.");
        }
        OrderCommand::Paid { id } => {
            client
                .update_order_status(&OrderId(id), StatusUpdate::paid())
                .await?;
            println!("Order marked paid.");
        }
        OrderCommand::Testimonial { id, url } => {
            let url = validate_testimonial_url(&url)?.to_string();
            client
                .attach_testimonial(&OrderId(id), &TestimonialUpdate { url })
                .await?;
            println!("Testimonial link saved.");
        }
        OrderCommand::Suggest => {
            let suggestions = client.fetch_suggestions().await?;
            println!("Known customers:");
            for customer in &suggestions.customers {
                println!("  {} ({})", customer.name, customer.phone);
            }
            println!("Known variants:");
            for variant in &suggestions.variants {
                println!("  {variant}");
            }
        }
    }
    Ok(())
}

async fn run_stock(
    api: Arc<ApiClient>,
    kind: StockKind,
    command: StockCommand,
) -> Result<()> {
    let mut vm = StockViewModel::new(Arc::clone(&api) as Arc<dyn AdminApi>, kind);
    match command {
        StockCommand::List { search } => {
            if search.is_empty() {
                vm.load().await?;
            } else {
                vm.search(search).await?;
            }
            for item in vm.items() {
                print_stock_row(item);
            }
        }
        StockCommand::Add {
            name,
            stock,
            unit,
            price,
            purchased_on,
            supplier,
        } => {
            let draft = match kind {
                StockKind::Material => {
                    let purchase_date =
                        purchased_on.context("--purchased-on is required for bahan")?;
                    NewStock::Material(NewMaterial {
                        name,
                        stock,
                        unit,
                        total_price: price,
                        purchase_date,
                        supplier,
                    })
                }
                StockKind::Packaging => NewStock::Packaging(NewPackaging {
                    name,
                    stock,
                    unit,
                    total_price: price,
                }),
            };
            let msg = vm.add(draft).await?;
            println!("{}", msg.unwrap_or_else(|| "Stock saved.".into()));
        }
        StockCommand::Consume { id, amount } => {
            vm.load().await?;
            let id = StockItemId(id);
            vm.consume(&id, amount).await?;
            match vm.items().iter().find(|item| item.id == id) {
                Some(item) => println!(
                    "Stock reduced; {} remaining: {} {}",
                    item.name, item.remaining, item.unit
                ),
                None => println!("Stock reduced."),
            }
        }
    }
    Ok(())
}

async fn run_assets(api: Arc<ApiClient>, command: AssetCommand) -> Result<()> {
    let mut vm = AssetViewModel::new(Arc::clone(&api) as Arc<dyn AdminApi>);
    match command {
        AssetCommand::List { search } => {
            if search.is_empty() {
                vm.load().await?;
            } else {
                vm.search(search).await?;
            }
            for asset in vm.assets() {
                print_asset_row(asset);
            }
        }
        AssetCommand::Add {
            name,
            quantity,
            unit_price,
            condition,
            purchased_on,
        } => {
            let msg = vm
                .add(AssetUpsert::new(
                    name,
                    quantity,
                    unit_price,
                    condition,
                    purchased_on,
                ))
                .await?;
            println!("{}", msg.unwrap_or_else(|| "Asset saved.".into()));
        }
        AssetCommand::Condition { id, condition } => {
            vm.set_condition(&AssetId(id), condition).await?;
            println!("Condition updated to {condition}.");
        }
        AssetCommand::Edit {
            id,
            name,
            quantity,
            unit_price,
            condition,
            purchased_on,
        } => {
            vm.replace(
                &AssetId(id),
                AssetUpsert::new(name, quantity, unit_price, condition, purchased_on),
            )
            .await?;
            println!("Asset updated.");
        }
        AssetCommand::Delete { id, yes } => {
            if !yes {
                bail!("deleting an asset is permanent; pass --yes to confirm");
            }
            vm.delete(&AssetId(id)).await?;
            println!("Asset deleted.");
        }
    }
    Ok(())
}

fn build_order_request(fields: OrderFields) -> Result<OrderUpsert> {
    let mut draft = OrderDraft::new();
    draft.customer_name = fields.customer;
    draft.customer_phone = fields.customer_phone;
    draft.recipient_name = fields.recipient;
    draft.recipient_phone = fields.recipient_phone;
    draft.delivery_address = fields.address;
    draft.delivery_date = fields.deliver_on;
    draft.delivery_time = fields.deliver_at;
    draft.note = fields.note;
    draft.card_to = fields.card_to;
    draft.card_message = fields.card_message;
    draft.card_from = fields.card_from;

    for spec in &fields.items {
        let (name, quantity, unit_price) = parse_item_spec(spec)?;
        draft.add_item(&name, quantity, unit_price)?;
    }

    println!("Cart total: {}", format_rupiah(draft.grand_total()));
    Ok(draft.into_request()?)
}

/// Parses a cart line of the form NAME:QTY:PRICE. The name may itself
/// contain colons; the two rightmost fields are numeric.
fn parse_item_spec(raw: &str) -> Result<(String, u32, f64)> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(qty), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("item must look like NAME:QTY:PRICE, got '{raw}'");
    };
    let quantity: u32 = qty
        .trim()
        .parse()
        .with_context(|| format!("invalid quantity in '{raw}'"))?;
    let unit_price: f64 = price
        .trim()
        .parse()
        .with_context(|| format!("invalid unit price in '{raw}'"))?;
    Ok((name.trim().to_string(), quantity, unit_price))
}

fn print_recap(vm: &RecapViewModel) {
    if let Some(summary) = vm.summary() {
        println!("Pendapatan lunas  : {}", format_rupiah(summary.paid_revenue));
        println!(
            "Total pengeluaran : {}",
            format_rupiah(summary.total_expenditure)
        );
        println!("Keuntungan bersih : {}", format_rupiah(summary.net_profit));
        println!("Pesanan selesai   : {}", summary.completed_orders);
        println!(
            "Rincian pengeluaran: bahan {}, packaging {}, aset {}",
            format_rupiah(summary.expenses.materials),
            format_rupiah(summary.expenses.packaging),
            format_rupiah(summary.expenses.assets),
        );
    }
    if !vm.active_search().is_empty() {
        println!("Search: \"{}\"", vm.active_search());
    }
    println!();
    for order in vm.orders() {
        print_order_row(order);
    }
    println!("Page {} of {}", vm.page(), vm.total_pages());
}

fn print_order_row(order: &Order) {
    println!(
        "#{}  {} | {}  {}",
        order.id.short(),
        order.status,
        order.payment,
        order.created_at.format("%Y-%m-%d"),
    );
    println!(
        "  {} ({}) -> {}, {}",
        order.customer_name, order.customer_phone, order.recipient_name, order.delivery_address
    );
    for item in &order.items {
        println!(
            "  {}x {} @ {} = {}",
            item.quantity,
            item.variant,
            format_rupiah(item.unit_price),
            format_rupiah(item.subtotal)
        );
    }
    println!("  Total: {}", format_rupiah(order.grand_total));
    match &order.testimonial_url {
        Some(url) => println!("  Testimoni: {url}"),
        None => println!("  Testimoni: -"),
    }
}

fn print_order_detail(order: &Order) {
    print_order_row(order);
    println!("  Full id : {}", order.id);
    if let Some(date) = &order.delivery_date {
        println!("  Kirim   : {}", date.format("%Y-%m-%d"));
    }
    if let Some(time) = &order.delivery_time {
        println!("  Jam     : {time} WIB");
    }
    if let Some(note) = &order.note {
        println!("  Catatan : {note}");
    }
    if let (Some(to), Some(message)) = (&order.card_to, &order.card_message) {
        println!(
            "  Ucapan  : untuk {to}, \"{message}\", dari {}",
            order.card_from.as_deref().unwrap_or("-")
        );
    }
}

fn print_stock_row(item: &StockItem) {
    let purchased = item
        .purchase_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "{}  {}  {} {}  modal {}  beli {}  supplier {}",
        item.id.short(),
        item.name,
        item.remaining,
        item.unit,
        format_rupiah(item.total_capital),
        purchased,
        item.supplier.as_deref().unwrap_or("-"),
    );
}

fn print_asset_row(asset: &Asset) {
    println!(
        "{}  {}  x{}  @{}  total {}  kondisi {}",
        asset.id.short(),
        asset.name,
        asset.quantity,
        format_rupiah(asset.unit_price),
        format_rupiah(asset.total_price),
        asset.condition,
    );
}
