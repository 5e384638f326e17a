use crate::{
    commands::replenishment::CreateReplenishmentOrdersCommand,
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    services::order_editor::{DraftStore, OrderDraft},
    services::snapshots::{SnapshotService, StockSnapshot},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// User-supplied reorder policy for one calculation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReplenishmentPolicy {
    /// Days of forward demand the order should cover
    pub coverage_days: i32,
    /// Extra buffer units on top of projected demand
    pub safety_stock: i32,
}

/// One suggested purchase line, mutable during an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub vendor_id: Option<Uuid>,
    pub vendor_name: String,
    /// Stock at snapshot time, display-only
    pub current_stock: i32,
    /// Units per day at snapshot time, display-only
    pub sales_velocity: f64,
    pub suggested_qty: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub included: bool,
}

impl OrderLine {
    /// Keeps `line_total` consistent with the current quantity. Called after
    /// every quantity change; the total is never stored independently.
    pub fn recompute_total(&mut self) {
        self.line_total = Decimal::from(self.suggested_qty) * self.unit_price;
    }
}

/// Projects demand over the coverage window and sizes the order to refill
/// up to it: `ceil(velocity * days + safety - on_hand)`, floored at one
/// unit. A product that crossed its reorder point always suggests ordering
/// something, even when the formula would say zero or less.
fn suggested_quantity(snapshot: &StockSnapshot, policy: &ReplenishmentPolicy) -> i32 {
    let raw = (snapshot.sales_velocity * f64::from(policy.coverage_days)
        + f64::from(policy.safety_stock)
        - f64::from(snapshot.on_hand_qty))
    .ceil();
    // Saturating narrow: a huge stored velocity must not wrap below 1.
    i32::try_from((raw as i64).max(1)).unwrap_or(i32::MAX)
}

/// Maps stock snapshots to candidate order lines. Pure and deterministic:
/// no I/O, no clock, no randomness. Only products at or below their reorder
/// point are emitted, each with `included = true`.
///
/// Policy values are taken as given; rejecting negative input is the calling
/// boundary's job.
pub fn suggest_order_lines(
    snapshots: &[StockSnapshot],
    policy: &ReplenishmentPolicy,
) -> Vec<OrderLine> {
    snapshots
        .iter()
        .filter(|s| s.on_hand_qty <= s.reorder_point)
        .map(|s| {
            let mut line = OrderLine {
                product_id: s.product_id,
                product_name: s.product_name.clone(),
                vendor_id: s.vendor_id,
                vendor_name: s.vendor_name.clone(),
                current_stock: s.on_hand_qty,
                sales_velocity: s.sales_velocity,
                suggested_qty: suggested_quantity(s, policy),
                unit_price: s.last_unit_price,
                line_total: Decimal::ZERO,
                included: true,
            };
            line.recompute_total();
            line
        })
        .collect()
}

/// Summary figures over a draft's selected lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSummary {
    pub products_to_order: usize,
    pub total_units: i64,
    pub total_value: Decimal,
}

/// A read-only view of an editing session returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftView {
    pub draft_id: Uuid,
    pub lines: Vec<OrderLine>,
    pub summary: DraftSummary,
}

/// Result of persisting a draft: one order id per committed vendor group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub order_ids: Vec<Uuid>,
}

/// Orchestrates the replenishment flow: snapshot load, suggestion
/// calculation, session editing, and persistence.
#[derive(Clone)]
pub struct ReplenishmentService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    snapshots: SnapshotService,
    drafts: Arc<DraftStore>,
}

impl ReplenishmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        let snapshots = SnapshotService::new(db_pool.clone());
        Self {
            db_pool,
            event_sender,
            snapshots,
            drafts: Arc::new(DraftStore::new()),
        }
    }

    /// Loads a fresh stock snapshot, calculates suggestions under the given
    /// policy, and opens an editing session over them.
    #[instrument(skip(self))]
    pub async fn generate_draft(
        &self,
        policy: ReplenishmentPolicy,
    ) -> Result<DraftView, ServiceError> {
        let snapshots = self.snapshots.load_snapshots().await?;
        let lines = suggest_order_lines(&snapshots, &policy);
        let draft = OrderDraft::new(lines);
        let draft_id = self.drafts.insert(draft);

        let view = self.draft(draft_id)?;
        info!(
            %draft_id,
            snapshot_count = snapshots.len(),
            line_count = view.lines.len(),
            "Generated replenishment draft"
        );
        self.event_sender
            .send(Event::SuggestionsGenerated {
                draft_id,
                line_count: view.lines.len(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(view)
    }

    /// Current state of an editing session.
    pub fn draft(&self, draft_id: Uuid) -> Result<DraftView, ServiceError> {
        self.drafts.with_draft(draft_id, |draft| DraftView {
            draft_id,
            lines: draft.lines().to_vec(),
            summary: DraftSummary {
                products_to_order: draft.selected_lines().len(),
                total_units: draft.total_units(),
                total_value: draft.total_value(),
            },
        })
    }

    /// Overrides the suggested quantity of one line. The override is trusted
    /// as-is; see the editor contract.
    pub fn set_quantity(
        &self,
        draft_id: Uuid,
        product_id: Uuid,
        qty: i32,
    ) -> Result<DraftView, ServiceError> {
        self.drafts
            .with_draft_mut(draft_id, |draft| draft.set_quantity(product_id, qty))?;
        self.draft(draft_id)
    }

    /// Flips one line's inclusion.
    pub fn toggle_line(&self, draft_id: Uuid, product_id: Uuid) -> Result<DraftView, ServiceError> {
        self.drafts
            .with_draft_mut(draft_id, |draft| draft.toggle_included(product_id))?;
        self.draft(draft_id)
    }

    /// Includes or excludes every line.
    pub fn select_all(&self, draft_id: Uuid, included: bool) -> Result<DraftView, ServiceError> {
        self.drafts.with_draft_mut(draft_id, |draft| {
            draft.select_all(included);
            Ok(())
        })?;
        self.draft(draft_id)
    }

    /// Persists the draft's selected lines, one order per vendor group.
    ///
    /// On full success the draft is dropped. On a partial failure the draft
    /// is kept so the caller can inspect it and retry the failed group;
    /// vendor groups committed before the failure stay committed.
    #[instrument(skip(self))]
    pub async fn save_draft(&self, draft_id: Uuid) -> Result<SaveOutcome, ServiceError> {
        let selected = self
            .drafts
            .with_draft(draft_id, |draft| draft.selected_lines())?;
        if selected.is_empty() {
            return Err(ServiceError::ValidationError(
                "no lines selected for ordering".to_string(),
            ));
        }

        let command = CreateReplenishmentOrdersCommand { lines: selected };
        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await;

        match result {
            Ok(created) => {
                self.drafts.remove(draft_id);
                info!(
                    %draft_id,
                    orders = created.order_ids.len(),
                    "Replenishment draft saved"
                );
                Ok(SaveOutcome {
                    order_ids: created.order_ids,
                })
            }
            Err(err) => {
                if let ServiceError::PersistError { vendor_group, .. } = &err {
                    // Best-effort notification; the original error wins.
                    let _ = self
                        .event_sender
                        .send(Event::ReplenishmentSaveFailed {
                            vendor_group: vendor_group.clone(),
                        })
                        .await;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn snapshot(on_hand: i32, reorder: i32, velocity: f64, price: Decimal) -> StockSnapshot {
        StockSnapshot {
            product_id: Uuid::new_v4(),
            product_name: "Olive Oil 1L".to_string(),
            vendor_id: None,
            vendor_name: "Acme Foods".to_string(),
            on_hand_qty: on_hand,
            reorder_point: reorder,
            sales_velocity: velocity,
            last_unit_price: price,
        }
    }

    #[test]
    fn emits_exactly_the_products_at_or_below_reorder_point() {
        let policy = ReplenishmentPolicy {
            coverage_days: 7,
            safety_stock: 5,
        };
        let snapshots = vec![
            snapshot(2, 10, 3.0, dec!(1.00)),  // below: emitted
            snapshot(10, 10, 3.0, dec!(1.00)), // at the threshold: emitted
            snapshot(11, 10, 3.0, dec!(1.00)), // above: skipped
        ];

        let lines = suggest_order_lines(&snapshots, &policy);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.included));
    }

    #[test]
    fn formula_matches_reference_scenario() {
        // ceil(3 * 7 + 5 - 2) = 24
        let policy = ReplenishmentPolicy {
            coverage_days: 7,
            safety_stock: 5,
        };
        let lines = suggest_order_lines(&[snapshot(2, 10, 3.0, dec!(2.00))], &policy);
        assert_eq!(lines[0].suggested_qty, 24);
        assert_eq!(lines[0].line_total, dec!(48.00));
    }

    #[test]
    fn zero_velocity_zero_safety_clamps_to_one_unit() {
        // max(ceil(0*7 + 0 - 0), 1) = 1
        let policy = ReplenishmentPolicy {
            coverage_days: 7,
            safety_stock: 0,
        };
        let lines = suggest_order_lines(&[snapshot(0, 10, 0.0, dec!(2.00))], &policy);
        assert_eq!(lines[0].suggested_qty, 1);
    }

    #[test]
    fn zero_velocity_orders_remaining_safety_stock() {
        // max(ceil(0 + 5 - 2), 1) = 3
        let policy = ReplenishmentPolicy {
            coverage_days: 7,
            safety_stock: 5,
        };
        let lines = suggest_order_lines(&[snapshot(2, 10, 0.0, dec!(2.00))], &policy);
        assert_eq!(lines[0].suggested_qty, 3);
    }

    #[test]
    fn fractional_velocity_rounds_up() {
        // ceil(0.5 * 7 + 0 - 1) = ceil(2.5) = 3
        let policy = ReplenishmentPolicy {
            coverage_days: 7,
            safety_stock: 0,
        };
        let lines = suggest_order_lines(&[snapshot(1, 10, 0.5, dec!(2.00))], &policy);
        assert_eq!(lines[0].suggested_qty, 3);
    }

    #[test]
    fn extreme_velocity_saturates_instead_of_wrapping() {
        // A double-typed velocity column can hold absurd values; the
        // narrowing cast must saturate, never go negative.
        let policy = ReplenishmentPolicy {
            coverage_days: 7,
            safety_stock: 0,
        };
        let lines = suggest_order_lines(&[snapshot(0, 10, 1e19, dec!(1.00))], &policy);
        assert_eq!(lines[0].suggested_qty, i32::MAX);
        assert!(lines[0].suggested_qty >= 1);
        assert!(lines[0].line_total > Decimal::ZERO);
    }

    #[test]
    fn line_copies_snapshot_display_fields() {
        let policy = ReplenishmentPolicy {
            coverage_days: 7,
            safety_stock: 5,
        };
        let s = snapshot(2, 10, 3.0, dec!(2.00));
        let lines = suggest_order_lines(std::slice::from_ref(&s), &policy);
        let line = &lines[0];
        assert_eq!(line.product_id, s.product_id);
        assert_eq!(line.vendor_name, "Acme Foods");
        assert_eq!(line.current_stock, 2);
        assert_eq!(line.sales_velocity, 3.0);
    }

    proptest! {
        #[test]
        fn emitted_lines_always_suggest_at_least_one_unit(
            on_hand in 0i32..=200,
            reorder in 0i32..=200,
            velocity in 0.0f64..50.0,
            coverage_days in 1i32..=30,
            safety_stock in 0i32..=100,
        ) {
            let policy = ReplenishmentPolicy { coverage_days, safety_stock };
            let lines = suggest_order_lines(
                &[snapshot(on_hand, reorder, velocity, dec!(1.00))],
                &policy,
            );

            if on_hand <= reorder {
                prop_assert_eq!(lines.len(), 1);
                prop_assert!(lines[0].suggested_qty >= 1);
                let expected = ((velocity * f64::from(coverage_days)
                    + f64::from(safety_stock)
                    - f64::from(on_hand))
                    .ceil() as i64)
                    .max(1) as i32;
                prop_assert_eq!(lines[0].suggested_qty, expected);
            } else {
                prop_assert!(lines.is_empty());
            }
        }

        #[test]
        fn line_total_is_quantity_times_price(
            qty in 1i32..=10_000,
            cents in 0i64..=100_000,
        ) {
            let price = Decimal::new(cents, 2);
            let mut line = OrderLine {
                product_id: Uuid::new_v4(),
                product_name: "p".to_string(),
                vendor_id: None,
                vendor_name: "v".to_string(),
                current_stock: 0,
                sales_velocity: 1.0,
                suggested_qty: qty,
                unit_price: price,
                line_total: Decimal::ZERO,
                included: true,
            };
            line.recompute_total();
            prop_assert_eq!(line.line_total, Decimal::from(qty) * price);
        }
    }
}
