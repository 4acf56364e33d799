use crate::types::{Cut, StockBar, UnitDemand};

pub struct BarPacker {
    stock_length: u32,
}

impl BarPacker {
    pub fn new(stock_length: u32) -> Self {
        Self { stock_length }
    }

    /// Packs the demand pool into bars, first-fit over the pool order.
    /// Callers pass the pool sorted largest-first, so this is the classic
    /// largest-fits-first heuristic. Bar ids start at `start_id` so a
    /// residual pass can continue an existing sequence.
    pub fn pack(&self, mut demand: Vec<UnitDemand>, start_id: u32) -> Vec<StockBar> {
        let mut bars = Vec::new();
        let mut next_id = start_id;

        while !demand.is_empty() {
            let mut cuts: Vec<Cut> = Vec::new();
            let mut remaining = self.stock_length;

            loop {
                match demand.iter().position(|d| d.length <= remaining) {
                    Some(i) => {
                        let unit = demand.remove(i);
                        remaining -= unit.length;
                        cuts.push(Cut {
                            label: unit.label,
                            length: unit.length,
                        });
                    }
                    None => break,
                }
            }

            // A unit longer than the stock bar can never be placed; the
            // solver validates that before packing starts.
            assert!(
                !cuts.is_empty(),
                "demand unit longer than stock bar {}",
                self.stock_length
            );

            let used = self.stock_length - remaining;
            bars.push(StockBar {
                id: next_id,
                cuts,
                remaining_length: remaining,
                efficiency_percent: (used as f64 / self.stock_length as f64 * 100.0).round()
                    as u32,
            });
            next_id += 1;
        }

        bars
    }
}
