use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ReplenishmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "ordered")]
    Ordered,
    #[sea_orm(string_value = "received")]
    Received,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for ReplenishmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReplenishmentStatus::Pending => "pending",
            ReplenishmentStatus::Ordered => "ordered",
            ReplenishmentStatus::Received => "received",
            ReplenishmentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One vendor-scoped replenishment order. Created once by the persister;
/// status transitions after creation belong to the fulfillment workflow.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "replenishments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Resolved by vendor-name lookup at save time; NULL when the group's
    /// vendor name did not match a known vendor (including "no vendor")
    pub vendor_id: Option<Uuid>,
    pub status: ReplenishmentStatus,
    pub total_estimated: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::replenishment_line::Entity")]
    ReplenishmentLine,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::replenishment_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReplenishmentLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
