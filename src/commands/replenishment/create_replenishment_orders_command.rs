use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        replenishment::{self, ReplenishmentStatus},
        replenishment_line, vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::replenishment::OrderLine,
    services::snapshots::NO_VENDOR,
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref REPLENISHMENT_ORDERS_CREATED: IntCounter = IntCounter::new(
        "replenishment_orders_created_total",
        "Total number of replenishment orders created"
    )
    .expect("metric can be created");
    static ref REPLENISHMENT_ORDER_FAILURES: IntCounter = IntCounter::new(
        "replenishment_order_failures_total",
        "Total number of failed replenishment order saves"
    )
    .expect("metric can be created");
}

/// Persists a set of selected order lines as replenishment orders, one per
/// vendor group.
///
/// Groups are written independently, each in its own transaction, in sorted
/// vendor-name order. This is deliberately NOT atomic across groups: when
/// group *k* fails, groups before it stay committed and groups after it are
/// never attempted. The resulting `PersistError` names the failed group so
/// the caller can retry just that one.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReplenishmentOrdersCommand {
    #[validate(length(min = 1, message = "At least one order line is required"))]
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReplenishmentOrdersResult {
    /// One order id per committed vendor group, in group iteration order
    pub order_ids: Vec<Uuid>,
}

#[async_trait::async_trait]
impl Command for CreateReplenishmentOrdersCommand {
    type Result = CreateReplenishmentOrdersResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            REPLENISHMENT_ORDER_FAILURES.inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let db = db_pool.as_ref();
        let groups = self.group_by_vendor();
        let mut order_ids = Vec::with_capacity(groups.len());

        for (vendor_name, group_lines) in groups {
            let order_id = self
                .persist_group(db, &vendor_name, group_lines)
                .await
                .map_err(|e| {
                    REPLENISHMENT_ORDER_FAILURES.inc();
                    error!(
                        vendor_group = %vendor_name,
                        committed_groups = order_ids.len(),
                        error = %e,
                        "Vendor group failed to persist; earlier groups remain committed"
                    );
                    ServiceError::PersistError {
                        vendor_group: vendor_name.clone(),
                        source: e,
                    }
                })?;

            REPLENISHMENT_ORDERS_CREATED.inc();
            info!(
                %order_id,
                vendor_group = %vendor_name,
                "Replenishment order committed"
            );
            event_sender
                .send(Event::ReplenishmentOrderCreated(order_id))
                .await
                .map_err(|e| {
                    let msg = format!("Failed to send event for created order: {}", e);
                    error!("{}", msg);
                    ServiceError::EventError(msg)
                })?;
            order_ids.push(order_id);
        }

        Ok(CreateReplenishmentOrdersResult { order_ids })
    }
}

impl CreateReplenishmentOrdersCommand {
    /// Partitions the lines by vendor name. A BTreeMap keeps group iteration
    /// deterministic, which also makes the partial-failure contract
    /// reproducible.
    fn group_by_vendor(&self) -> BTreeMap<String, Vec<OrderLine>> {
        let mut groups: BTreeMap<String, Vec<OrderLine>> = BTreeMap::new();
        for line in &self.lines {
            groups
                .entry(line.vendor_name.clone())
                .or_default()
                .push(line.clone());
        }
        groups
    }

    /// Resolves the grouping name back to a vendor id by exact name lookup.
    /// Unknown names and the "no vendor" bucket persist a NULL vendor id.
    async fn resolve_vendor_id(
        &self,
        db: &DatabaseConnection,
        vendor_name: &str,
    ) -> Result<Option<Uuid>, DbErr> {
        if vendor_name == NO_VENDOR {
            return Ok(None);
        }
        let found = vendor::Entity::find()
            .filter(vendor::Column::Name.eq(vendor_name))
            .one(db)
            .await?;
        Ok(found.map(|v| v.id))
    }

    /// Writes one vendor group's order header and lines in a single
    /// transaction.
    async fn persist_group(
        &self,
        db: &DatabaseConnection,
        vendor_name: &str,
        group_lines: Vec<OrderLine>,
    ) -> Result<Uuid, DbErr> {
        let vendor_id = self.resolve_vendor_id(db, vendor_name).await?;
        let total_estimated: Decimal = group_lines.iter().map(|l| l.line_total).sum();
        let notes = format!(
            "Auto-generated replenishment order - {} products",
            group_lines.len()
        );

        db.transaction::<_, Uuid, DbErr>(move |txn| {
            Box::pin(async move {
                let header = replenishment::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    vendor_id: Set(vendor_id),
                    status: Set(ReplenishmentStatus::Pending),
                    total_estimated: Set(total_estimated),
                    notes: Set(Some(notes)),
                    created_at: Set(Utc::now()),
                };
                let saved = header.insert(txn).await?;

                for line in &group_lines {
                    let record = replenishment_line::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        replenishment_id: Set(saved.id),
                        product_id: Set(line.product_id),
                        qty_suggested: Set(line.suggested_qty),
                        unit_price: Set(line.unit_price),
                    };
                    record.insert(txn).await?;
                }

                Ok(saved.id)
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => db_err,
            TransactionError::Transaction(db_err) => db_err,
        })
    }
}
