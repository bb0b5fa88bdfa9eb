//! Starbase stock reconciliation.
//!
//! After a client edits its tree, every base slot with a positive amount
//! must map to exactly one stock record, with `builtamount` reflecting net
//! production this turn. Slots without a record get a fresh one under a
//! surrogate id above everything the snapshot used; allocating any makes a
//! re-download advisable, which the caller is told about.

use nubridge_snapshot::Stock;
use tracing::warn;

/// Working copy of the snapshot's stock list.
#[derive(Debug)]
pub struct StockReconciler {
    stocks: Vec<Stock>,
    next_id: i32,
    created_any: bool,
}

impl StockReconciler {
    /// Start from the snapshot's stock records.
    pub fn new(stocks: &[Stock]) -> Self {
        let next_id = stocks.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            stocks: stocks.to_vec(),
            next_id,
            created_any: false,
        }
    }

    /// Set a slot's new amount, adjusting `builtamount` by the delta
    /// against the previous amount.
    pub fn update(&mut self, base_id: i32, kind: i32, stock_id: i32, new_amount: i32) {
        if let Some(stock) = self.find(base_id, kind, stock_id) {
            let delta = new_amount - stock.amount;
            stock.amount = new_amount;
            stock.built_amount += delta;
        } else if new_amount > 0 {
            self.create(base_id, kind, stock_id, new_amount, new_amount);
        }
    }

    /// Set a slot's new amount with an externally reconciled production
    /// counter (the torpedo path, where orbiting ships already absorbed
    /// part of what the base built).
    pub fn update_with_built(
        &mut self,
        base_id: i32,
        kind: i32,
        stock_id: i32,
        new_amount: i32,
        built: i32,
    ) {
        if let Some(stock) = self.find(base_id, kind, stock_id) {
            stock.amount = new_amount;
            stock.built_amount = built;
        } else if new_amount > 0 || built != 0 {
            self.create(base_id, kind, stock_id, new_amount, built);
        }
    }

    fn find(&mut self, base_id: i32, kind: i32, stock_id: i32) -> Option<&mut Stock> {
        self.stocks
            .iter_mut()
            .find(|s| s.starbase_id == base_id && s.stock_type == kind && s.stock_id == stock_id)
    }

    fn create(&mut self, base_id: i32, kind: i32, stock_id: i32, amount: i32, built: i32) {
        warn!(
            base = base_id,
            kind,
            component = stock_id,
            "allocating a new stock record; a re-download is advisable"
        );
        self.stocks.push(Stock {
            id: self.next_id,
            starbase_id: base_id,
            stock_type: kind,
            stock_id,
            amount,
            built_amount: built,
            ..Default::default()
        });
        self.next_id += 1;
        self.created_any = true;
    }

    /// Whether any surrogate ids were allocated.
    pub fn created_any(&self) -> bool {
        self.created_any
    }

    /// Finish and return the reconciled list.
    pub fn into_stocks(self) -> Vec<Stock> {
        self.stocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubridge_snapshot::stock_type;

    fn stock(id: i32, base: i32, kind: i32, component: i32, amount: i32, built: i32) -> Stock {
        Stock {
            id,
            starbase_id: base,
            stock_type: kind,
            stock_id: component,
            amount,
            built_amount: built,
            ..Default::default()
        }
    }

    #[test]
    fn updates_adjust_built_by_the_delta() {
        let mut reconciler =
            StockReconciler::new(&[stock(5, 1, stock_type::BEAM, 3, 4, 1)]);
        reconciler.update(1, stock_type::BEAM, 3, 7);
        let stocks = reconciler.into_stocks();
        assert_eq!(stocks[0].amount, 7);
        assert_eq!(stocks[0].built_amount, 4);
    }

    #[test]
    fn shipping_out_goes_negative() {
        let mut reconciler =
            StockReconciler::new(&[stock(5, 1, stock_type::ENGINE, 2, 3, 0)]);
        reconciler.update(1, stock_type::ENGINE, 2, 1);
        assert_eq!(reconciler.into_stocks()[0].built_amount, -2);
    }

    #[test]
    fn surrogate_ids_never_collide() {
        let mut reconciler = StockReconciler::new(&[
            stock(17, 1, stock_type::HULL, 15, 1, 0),
            stock(4, 1, stock_type::BEAM, 2, 1, 0),
        ]);
        reconciler.update(1, stock_type::LAUNCHER, 6, 2);
        reconciler.update(2, stock_type::TORPEDO, 6, 10);
        assert!(reconciler.created_any());
        let stocks = reconciler.into_stocks();
        assert_eq!(stocks[2].id, 18);
        assert_eq!(stocks[3].id, 19);
    }

    #[test]
    fn zero_slots_do_not_materialize() {
        let mut reconciler = StockReconciler::new(&[]);
        reconciler.update(1, stock_type::BEAM, 1, 0);
        reconciler.update_with_built(1, stock_type::TORPEDO, 1, 0, 0);
        assert!(!reconciler.created_any());
        assert!(reconciler.into_stocks().is_empty());
    }
}
