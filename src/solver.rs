use crate::error::{Error, Result};
use crate::packer::BarPacker;
use crate::types::{
    OptimizationResult, OptimizerConfig, PartRequest, StockBar, UnitDemand, WeldAssembly,
};
use crate::weld::OffcutPool;

pub struct Solver {
    config: OptimizerConfig,
    requests: Vec<PartRequest>,
}

impl Solver {
    pub fn new(config: OptimizerConfig, requests: Vec<PartRequest>) -> Self {
        Self { config, requests }
    }

    /// Computes the cutting plan: expand demand, pack bars, then try to
    /// cover one unit of each distinct length from welded offcuts before
    /// cutting fresh stock for it. Pure function of config + requests.
    pub fn solve(&self) -> Result<OptimizationResult> {
        self.config.validate()?;
        self.validate_requests()?;

        if self.requests.is_empty() {
            return Ok(OptimizationResult::empty());
        }

        let demand = self.expand_requests();

        // Hold one unit of each distinct length back from the first pass.
        // Those are the units a weld assembly may satisfy; whatever the
        // weld search cannot cover falls back to fresh stock below.
        let (bulk, mut outstanding) = split_outstanding(demand);

        let packer = BarPacker::new(self.config.stock_length);
        let mut bars = packer.pack(bulk, 1);

        let mut pool = OffcutPool::collect(&bars, self.config.min_fire_length);
        let mut weld_assemblies: Vec<WeldAssembly> = Vec::new();

        let targets: Vec<u32> = outstanding.iter().map(|unit| unit.length).collect();
        for target in targets {
            let Some(candidate) = pool.find_assembly(target, self.config.weld_loss) else {
                continue;
            };

            // The absorbed leftovers are no longer part of their bars.
            for &i in &candidate.indices {
                bars[pool.offcuts()[i].source_bar_index].remaining_length = 0;
            }
            let pieces = pool.consume(&candidate);

            weld_assemblies.push(WeldAssembly {
                label: format!("W{}-{}", weld_assemblies.len() + 1, target),
                target_length: target,
                actual_length: candidate.actual_length,
                tolerance_delta: candidate.tolerance_delta,
                pieces,
                method: candidate.method,
            });

            if let Some(pos) = outstanding.iter().position(|unit| unit.length == target) {
                outstanding.remove(pos);
            }
        }

        // Residual demand goes onto fresh stock, continuing the id sequence.
        if !outstanding.is_empty() {
            let next_id = bars.len() as u32 + 1;
            bars.extend(packer.pack(outstanding, next_id));
        }

        // Re-collect over the final bar list; consumed offcuts drop out
        // because their source bars were zeroed.
        let offcuts = OffcutPool::collect(&bars, self.config.min_fire_length).into_offcuts();

        Ok(OptimizationResult {
            total_stock_bars: bars.len(),
            material_utilization_percent: mean_efficiency(&bars),
            stock_bars: bars,
            offcuts,
            weld_assemblies,
        })
    }

    fn validate_requests(&self) -> Result<()> {
        for request in &self.requests {
            if request.length == 0 {
                return Err(Error::InvalidRequest {
                    position: request.position.clone(),
                    reason: "length must be positive".to_string(),
                });
            }
            if request.quantity == 0 {
                return Err(Error::InvalidRequest {
                    position: request.position.clone(),
                    reason: "quantity must be positive".to_string(),
                });
            }
            if request.length > self.config.stock_length {
                return Err(Error::InvalidRequest {
                    position: request.position.clone(),
                    reason: format!(
                        "length {}mm exceeds stock bar length {}mm",
                        request.length, self.config.stock_length
                    ),
                });
            }
        }
        Ok(())
    }

    fn expand_requests(&self) -> Vec<UnitDemand> {
        let mut demand = Vec::new();
        for request in &self.requests {
            for i in 0..request.quantity {
                demand.push(UnitDemand {
                    label: format!("{}-{}", request.position, i + 1),
                    length: request.length,
                    origin: request.position.clone(),
                });
            }
        }
        // Sort by length descending for better packing; the sort is stable,
        // so equal lengths keep request order.
        demand.sort_by(|a, b| b.length.cmp(&a.length));
        demand
    }
}

/// Splits the (descending-sorted) demand into the bulk that goes straight
/// to packing and one reserved unit per distinct length — the outstanding
/// demand the weld search targets. The last unit of each equal-length run
/// is reserved, so first-pass cuts keep the low-numbered labels.
fn split_outstanding(demand: Vec<UnitDemand>) -> (Vec<UnitDemand>, Vec<UnitDemand>) {
    let mut bulk = Vec::new();
    let mut outstanding = Vec::new();
    let mut iter = demand.into_iter().peekable();
    while let Some(unit) = iter.next() {
        let last_of_run = iter.peek().map_or(true, |next| next.length != unit.length);
        if last_of_run {
            outstanding.push(unit);
        } else {
            bulk.push(unit);
        }
    }
    (bulk, outstanding)
}

fn mean_efficiency(bars: &[StockBar]) -> u32 {
    if bars.is_empty() {
        return 0;
    }
    let total: u32 = bars.iter().map(|bar| bar.efficiency_percent).sum();
    (total as f64 / bars.len() as f64).round() as u32
}
