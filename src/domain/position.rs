//! Portfolio positions.

use std::rc::Rc;

use crate::domain::instrument::InstrumentHandle;

/// An immutable pairing of an instrument handle and a held quantity.
///
/// Quantity changes produce a new `Position` carrying the same handle rather
/// than mutating in place. Negative quantities are permitted but semantically
/// odd; no sign validation is performed.
#[derive(Debug, Clone)]
pub struct Position {
    instrument: InstrumentHandle,
    quantity: i64,
}

impl Position {
    pub fn new(instrument: InstrumentHandle, quantity: i64) -> Self {
        Self {
            instrument,
            quantity,
        }
    }

    pub fn instrument(&self) -> &InstrumentHandle {
        &self.instrument
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Return a new position with the same instrument and `quantity + delta`.
    pub fn with_added_quantity(&self, delta: i64) -> Self {
        Self {
            instrument: Rc::clone(&self.instrument),
            quantity: self.quantity + delta,
        }
    }

    /// Current market value of the position at the instrument's latest price.
    pub fn market_value(&self) -> f64 {
        self.instrument.borrow().current_price() * self.quantity as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::Instrument;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_with_added_quantity_returns_new_position() {
        let handle = Instrument::equity("CDR", "CD Projekt", 300.0)
            .unwrap()
            .into_handle();
        let position = Position::new(Rc::clone(&handle), 10);
        let grown = position.with_added_quantity(5);

        assert_eq!(position.quantity(), 10);
        assert_eq!(grown.quantity(), 15);
        assert!(Rc::ptr_eq(position.instrument(), grown.instrument()));
    }

    #[test]
    fn test_with_added_quantity_allows_negative_delta() {
        let handle = Instrument::equity("CDR", "CD Projekt", 300.0)
            .unwrap()
            .into_handle();
        let position = Position::new(handle, 10);
        let shrunk = position.with_added_quantity(-25);
        assert_eq!(shrunk.quantity(), -15);
    }

    #[test]
    fn test_market_value_tracks_live_price() {
        let handle = Instrument::equity("CDR", "CD Projekt", 300.0)
            .unwrap()
            .into_handle();
        let position = Position::new(Rc::clone(&handle), 10);
        assert_eq!(position.market_value(), 3000.0);

        // Mutate through the shared handle; the position sees the new price.
        let mut rng = StdRng::seed_from_u64(11);
        handle.borrow_mut().update_price(&mut rng);
        let updated = handle.borrow().current_price();
        assert_eq!(position.market_value(), updated * 10.0);
    }
}
