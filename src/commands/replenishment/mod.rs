pub mod create_replenishment_orders_command;

pub use create_replenishment_orders_command::{
    CreateReplenishmentOrdersCommand, CreateReplenishmentOrdersResult,
};
