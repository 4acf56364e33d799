use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

// Lowest minimum-offcut length the engine accepts; shorter leftovers are
// never worth a weld seam.
pub const MIN_FIRE_FLOOR: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_stock_length")]
    pub stock_length: u32,
    #[serde(default = "default_weld_loss")]
    pub weld_loss: u32,
    #[serde(default = "default_min_fire_length")]
    pub min_fire_length: u32,
}

fn default_stock_length() -> u32 {
    12000
}

fn default_weld_loss() -> u32 {
    10
}

fn default_min_fire_length() -> u32 {
    100
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            stock_length: default_stock_length(),
            weld_loss: default_weld_loss(),
            min_fire_length: default_min_fire_length(),
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.stock_length == 0 {
            return Err(Error::InvalidConfiguration(
                "stock length must be positive".to_string(),
            ));
        }
        if self.min_fire_length < MIN_FIRE_FLOOR {
            return Err(Error::InvalidConfiguration(format!(
                "minimum offcut length must be at least {}mm, got {}mm",
                MIN_FIRE_FLOOR, self.min_fire_length
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRequest {
    pub position: String,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub length: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDemand {
    pub label: String,
    pub length: u32,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cut {
    pub label: String,
    pub length: u32,
}

impl std::fmt::Display for Cut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}mm)", self.label, self.length)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockBar {
    pub id: u32,
    pub cuts: Vec<Cut>,
    pub remaining_length: u32,
    pub efficiency_percent: u32,
}

impl StockBar {
    pub fn used_length(&self) -> u32 {
        self.cuts.iter().map(|c| c.length).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Offcut {
    pub name: String,
    pub length: u32,
    pub source_bar_index: usize,
    #[serde(skip)]
    pub consumed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeldMethod {
    Double,
    Triple,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeldPiece {
    pub name: String,
    pub length: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeldAssembly {
    pub label: String,
    pub target_length: u32,
    pub actual_length: u32,
    pub tolerance_delta: i32,
    pub pieces: Vec<WeldPiece>,
    pub method: WeldMethod,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub stock_bars: Vec<StockBar>,
    pub offcuts: Vec<Offcut>,
    pub weld_assemblies: Vec<WeldAssembly>,
    pub total_stock_bars: usize,
    pub material_utilization_percent: u32,
}

impl OptimizationResult {
    pub fn empty() -> Self {
        Self {
            stock_bars: vec![],
            offcuts: vec![],
            weld_assemblies: vec![],
            total_stock_bars: 0,
            material_utilization_percent: 0,
        }
    }
}

pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value < 0.0 || value > u32::MAX as f64 || value.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    Ok(value as u32)
}
