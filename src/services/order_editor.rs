use crate::errors::ServiceError;
use crate::services::replenishment::OrderLine;
use dashmap::DashMap;
use rust_decimal::Decimal;
use uuid::Uuid;

/// One editing session over a set of suggested order lines.
///
/// Lines live only for the duration of the session: created by the
/// calculator, mutated here, consumed by the persister on save or discarded
/// on reset. Quantity overrides are trusted as-is; constraining input to
/// sensible ranges is the calling layer's contract.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    lines: Vec<OrderLine>,
}

impl OrderDraft {
    pub fn new(lines: Vec<OrderLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replaces the suggested quantity for the matching line and recomputes
    /// its total so the two can never drift apart.
    pub fn set_quantity(&mut self, product_id: Uuid, qty: i32) -> Result<(), ServiceError> {
        let line = self.line_mut(product_id)?;
        line.suggested_qty = qty;
        line.recompute_total();
        Ok(())
    }

    /// Flips inclusion for the matching line. Excluded lines stay in the
    /// session but are never persisted.
    pub fn toggle_included(&mut self, product_id: Uuid) -> Result<(), ServiceError> {
        let line = self.line_mut(product_id)?;
        line.included = !line.included;
        Ok(())
    }

    /// Sets inclusion for every line at once.
    pub fn select_all(&mut self, included: bool) {
        for line in &mut self.lines {
            line.included = included;
        }
    }

    /// The lines that would be persisted on save.
    pub fn selected_lines(&self) -> Vec<OrderLine> {
        self.lines.iter().filter(|l| l.included).cloned().collect()
    }

    /// Estimated value of the selected lines.
    pub fn total_value(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|l| l.included)
            .map(|l| l.line_total)
            .sum()
    }

    /// Total units across the selected lines.
    pub fn total_units(&self) -> i64 {
        self.lines
            .iter()
            .filter(|l| l.included)
            .map(|l| i64::from(l.suggested_qty))
            .sum()
    }

    fn line_mut(&mut self, product_id: Uuid) -> Result<&mut OrderLine, ServiceError> {
        self.lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("no order line for product {}", product_id))
            })
    }
}

/// In-memory store of editing sessions, keyed by draft id. Each draft is
/// owned by a single caller session; the map only guards concurrent access
/// to unrelated drafts.
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: DashMap<Uuid, OrderDraft>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, draft: OrderDraft) -> Uuid {
        let id = Uuid::new_v4();
        self.drafts.insert(id, draft);
        id
    }

    pub fn remove(&self, draft_id: Uuid) -> Option<OrderDraft> {
        self.drafts.remove(&draft_id).map(|(_, draft)| draft)
    }

    pub fn with_draft<T>(
        &self,
        draft_id: Uuid,
        f: impl FnOnce(&OrderDraft) -> T,
    ) -> Result<T, ServiceError> {
        let draft = self
            .drafts
            .get(&draft_id)
            .ok_or_else(|| ServiceError::NotFound(format!("no draft {}", draft_id)))?;
        Ok(f(&draft))
    }

    pub fn with_draft_mut<T>(
        &self,
        draft_id: Uuid,
        f: impl FnOnce(&mut OrderDraft) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut draft = self
            .drafts
            .get_mut(&draft_id)
            .ok_or_else(|| ServiceError::NotFound(format!("no draft {}", draft_id)))?;
        f(&mut draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(name: &str, qty: i32, unit_price: Decimal) -> OrderLine {
        let mut line = OrderLine {
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            vendor_id: None,
            vendor_name: "Acme Foods".to_string(),
            current_stock: 2,
            sales_velocity: 3.0,
            suggested_qty: qty,
            unit_price,
            line_total: Decimal::ZERO,
            included: true,
        };
        line.recompute_total();
        line
    }

    #[test]
    fn set_quantity_recomputes_line_total() {
        let l = line("Olive Oil", 4, dec!(2.50));
        let product_id = l.product_id;
        let mut draft = OrderDraft::new(vec![l]);

        draft.set_quantity(product_id, 10).expect("line exists");

        let updated = &draft.lines()[0];
        assert_eq!(updated.suggested_qty, 10);
        assert_eq!(updated.line_total, dec!(25.00));
    }

    #[test]
    fn set_quantity_for_unknown_product_is_not_found() {
        let mut draft = OrderDraft::new(vec![line("Olive Oil", 4, dec!(2.50))]);
        let err = draft.set_quantity(Uuid::new_v4(), 3).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn quantity_overrides_are_trusted_as_given() {
        // The editor does not clamp; the boundary above it decides what
        // quantities are acceptable.
        let l = line("Olive Oil", 4, dec!(2.50));
        let product_id = l.product_id;
        let mut draft = OrderDraft::new(vec![l]);

        draft.set_quantity(product_id, 0).expect("line exists");
        assert_eq!(draft.lines()[0].suggested_qty, 0);
        assert_eq!(draft.lines()[0].line_total, Decimal::ZERO);
    }

    #[test]
    fn toggle_flips_inclusion() {
        let l = line("Olive Oil", 4, dec!(2.50));
        let product_id = l.product_id;
        let mut draft = OrderDraft::new(vec![l]);

        draft.toggle_included(product_id).expect("line exists");
        assert!(!draft.lines()[0].included);
        draft.toggle_included(product_id).expect("line exists");
        assert!(draft.lines()[0].included);
    }

    #[test]
    fn select_all_round_trip_restores_everything() {
        let mut draft = OrderDraft::new(vec![
            line("Olive Oil", 4, dec!(2.50)),
            line("Flour 5kg", 2, dec!(8.00)),
        ]);

        draft.select_all(false);
        assert!(draft.selected_lines().is_empty());
        assert_eq!(draft.total_value(), Decimal::ZERO);
        assert_eq!(draft.total_units(), 0);

        draft.select_all(true);
        assert_eq!(draft.selected_lines().len(), 2);
        assert_eq!(draft.total_value(), dec!(26.00));
        assert_eq!(draft.total_units(), 6);
    }

    #[test]
    fn excluded_lines_are_retained_but_not_selected() {
        let first = line("Olive Oil", 4, dec!(2.50));
        let first_id = first.product_id;
        let mut draft = OrderDraft::new(vec![first, line("Flour 5kg", 2, dec!(8.00))]);

        draft.toggle_included(first_id).expect("line exists");

        assert_eq!(draft.lines().len(), 2);
        let selected = draft.selected_lines();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].product_name, "Flour 5kg");
        assert_eq!(draft.total_value(), dec!(16.00));
    }

    #[test]
    fn store_insert_then_remove() {
        let store = DraftStore::new();
        let id = store.insert(OrderDraft::new(vec![line("Olive Oil", 4, dec!(2.50))]));

        let count = store.with_draft(id, |d| d.lines().len()).expect("stored");
        assert_eq!(count, 1);

        assert!(store.remove(id).is_some());
        assert!(matches!(
            store.with_draft(id, |d| d.lines().len()),
            Err(ServiceError::NotFound(_))
        ));
    }
}
