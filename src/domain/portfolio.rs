//! Portfolio aggregation keyed by instrument symbol.

use std::collections::HashMap;

use crate::domain::instrument::InstrumentHandle;
use crate::domain::position::Position;

/// Cash balance plus a set of positions, keyed by instrument symbol.
///
/// There is at most one position per symbol: adding an instrument whose symbol
/// is already present merges quantities instead of inserting a duplicate.
#[derive(Debug, Default)]
pub struct Portfolio {
    cash: f64,
    positions: HashMap<String, Position>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            positions: HashMap::new(),
        }
    }

    /// Add `quantity` of an instrument to the portfolio.
    ///
    /// On a symbol collision the quantities are summed and the originally
    /// stored instrument handle survives; the newly passed handle is dropped.
    /// A later add with a different instrument object sharing the symbol
    /// therefore only increments quantity against the original instrument.
    pub fn add_position(&mut self, instrument: InstrumentHandle, quantity: i64) {
        let symbol = instrument.borrow().symbol().to_string();
        match self.positions.get(&symbol) {
            Some(existing) => {
                let merged = existing.with_added_quantity(quantity);
                self.positions.insert(symbol, merged);
            }
            None => {
                self.positions.insert(symbol, Position::new(instrument, quantity));
            }
        }
    }

    /// Sum of `current_price * quantity` over all positions; 0.0 when empty.
    pub fn assets_value(&self) -> f64 {
        self.positions.values().map(Position::market_value).sum()
    }

    /// Assets value plus cash.
    pub fn total_value(&self) -> f64 {
        self.assets_value() + self.cash
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Read-only view of the positions map.
    ///
    /// The map itself cannot be mutated through this borrow; the instruments
    /// reachable through the handles remain mutable, so external price updates
    /// stay visible.
    pub fn positions(&self) -> &HashMap<String, Position> {
        &self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::{AccrualPeriod, Instrument};
    use approx::assert_relative_eq;
    use std::rc::Rc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn equity(symbol: &str, name: &str, price: f64) -> InstrumentHandle {
        Instrument::equity(symbol, name, price).unwrap().into_handle()
    }

    #[test]
    fn test_empty_portfolio_value_is_cash() {
        let portfolio = Portfolio::new(2500.0);
        assert_eq!(portfolio.assets_value(), 0.0);
        assert_eq!(portfolio.total_value(), 2500.0);
        assert!(portfolio.positions().is_empty());
    }

    #[test]
    fn test_add_position_and_value() {
        let mut portfolio = Portfolio::new(10000.0);
        portfolio.add_position(equity("CDR", "CD Projekt", 300.0), 10);
        portfolio.add_position(equity("PKO", "PKO BP", 40.0), 50);

        assert_eq!(portfolio.positions().len(), 2);
        assert_relative_eq!(portfolio.assets_value(), 5000.0);
        assert_relative_eq!(portfolio.total_value(), 15000.0);
    }

    #[test]
    fn test_add_same_symbol_merges_quantities() {
        let mut portfolio = Portfolio::new(0.0);
        let stock = equity("CDR", "CD Projekt", 300.0);
        portfolio.add_position(Rc::clone(&stock), 10);
        portfolio.add_position(stock, 5);

        assert_eq!(portfolio.positions().len(), 1);
        assert_eq!(portfolio.positions()["CDR"].quantity(), 15);
    }

    #[test]
    fn test_merge_keeps_originally_stored_instrument() {
        // Regression: on a symbol collision the stored instrument survives,
        // even when the new object has a different kind, name, and price.
        let mut portfolio = Portfolio::new(0.0);
        let original = equity("DUP", "Original Co", 100.0);
        let imposter = Instrument::fixed_income("DUP", "Imposter Bond", 1.0, 0.5, AccrualPeriod::PerStep)
            .unwrap()
            .into_handle();

        portfolio.add_position(Rc::clone(&original), 3);
        portfolio.add_position(imposter, 4);

        let stored = &portfolio.positions()["DUP"];
        assert_eq!(stored.quantity(), 7);
        assert!(Rc::ptr_eq(stored.instrument(), &original));
        assert_eq!(stored.instrument().borrow().name(), "Original Co");
        assert_relative_eq!(portfolio.assets_value(), 700.0);
    }

    #[test]
    fn test_total_value_identity() {
        let mut portfolio = Portfolio::new(1234.5);
        portfolio.add_position(equity("AAA", "Triple A", 12.0), 7);
        portfolio.add_position(equity("BBB", "Double B", 0.0), 100);
        assert_relative_eq!(
            portfolio.total_value(),
            portfolio.assets_value() + portfolio.cash()
        );
    }

    #[test]
    fn test_negative_quantity_is_carried_through() {
        let mut portfolio = Portfolio::new(0.0);
        portfolio.add_position(equity("SHT", "Short Co", 50.0), -4);
        assert_relative_eq!(portfolio.assets_value(), -200.0);
    }

    #[test]
    fn test_external_price_update_is_visible() {
        let mut portfolio = Portfolio::new(0.0);
        let bond = Instrument::fixed_income("BND1", "Bond 1", 1000.0, 0.05, AccrualPeriod::PerStep)
            .unwrap()
            .into_handle();
        portfolio.add_position(Rc::clone(&bond), 2);
        assert_relative_eq!(portfolio.assets_value(), 2000.0);

        let mut rng = StdRng::seed_from_u64(0);
        bond.borrow_mut().update_price(&mut rng);
        assert_relative_eq!(portfolio.assets_value(), 2100.0, epsilon = 1e-9);
    }
}
