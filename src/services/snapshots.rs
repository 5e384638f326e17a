use crate::{
    db::DbPool,
    entities::{inventory_level, price_history, product, vendor},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Grouping key used for products without an assigned vendor.
pub const NO_VENDOR: &str = "no vendor";

/// Reorder point assumed when the inventory record has none.
const DEFAULT_REORDER_POINT: i32 = 10;
/// Sales velocity assumed when the inventory record has none.
const DEFAULT_SALES_VELOCITY: f64 = 1.0;

/// Read-only view of one product's stock position, composed fresh at
/// calculation time. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub product_id: Uuid,
    pub product_name: String,
    pub vendor_id: Option<Uuid>,
    pub vendor_name: String,
    pub on_hand_qty: i32,
    pub reorder_point: i32,
    pub sales_velocity: f64,
    pub last_unit_price: Decimal,
}

impl StockSnapshot {
    fn compose(
        product: &product::Model,
        inventory: &inventory_level::Model,
        vendor_name: Option<&str>,
        last_unit_price: Option<Decimal>,
    ) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            vendor_id: product.vendor_id,
            vendor_name: vendor_name.unwrap_or(NO_VENDOR).to_string(),
            on_hand_qty: inventory.qty_on_hand,
            reorder_point: inventory.reorder_point.unwrap_or(DEFAULT_REORDER_POINT),
            sales_velocity: inventory.sales_velocity.unwrap_or(DEFAULT_SALES_VELOCITY),
            last_unit_price: last_unit_price.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Loads stock snapshots for every product that has an inventory record.
#[derive(Clone)]
pub struct SnapshotService {
    db_pool: Arc<DbPool>,
}

impl SnapshotService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Reads the current stock position of every product with an inventory
    /// record. Products without one cannot be evaluated for reorder and are
    /// silently excluded. An empty catalog yields an empty Vec; store
    /// failures surface as `StoreUnavailable` and are not retried here.
    #[instrument(skip(self))]
    pub async fn load_snapshots(&self) -> Result<Vec<StockSnapshot>, ServiceError> {
        let db = &*self.db_pool;

        let inventory_with_products = inventory_level::Entity::find()
            .find_also_related(product::Entity)
            .all(db)
            .await?;

        let vendor_names: HashMap<Uuid, String> = vendor::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|v| (v.id, v.name))
            .collect();

        // Most recent price wins; rows are ordered newest-first so the first
        // entry per product is kept.
        let mut latest_prices: HashMap<Uuid, Decimal> = HashMap::new();
        let price_rows = price_history::Entity::find()
            .order_by_desc(price_history::Column::RecordedAt)
            .all(db)
            .await?;
        for row in price_rows {
            latest_prices.entry(row.product_id).or_insert(row.price);
        }

        let mut snapshots = Vec::with_capacity(inventory_with_products.len());
        for (inventory, maybe_product) in inventory_with_products {
            let Some(product) = maybe_product else {
                warn!(
                    inventory_id = %inventory.id,
                    "Inventory record without a product row; skipping"
                );
                continue;
            };
            let vendor_name = product
                .vendor_id
                .and_then(|id| vendor_names.get(&id).map(String::as_str));
            let price = latest_prices.get(&product.id).copied();
            snapshots.push(StockSnapshot::compose(
                &product,
                &inventory,
                vendor_name,
                price,
            ));
        }

        Ok(snapshots)
    }
}
