use crate::avoidance::AvoidanceOptions;
use crate::error::Result;
use petrel_force::SpringOptions;
use petrel_layered::LayeredOptions;
use petrel_net::ShapeMetrics;
use serde::{Deserialize, Serialize};

/// Tuning for every layout stage. Missing keys take their defaults, so `{}` is a complete
/// configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub shapes: ShapeMetrics,
    pub force: SpringOptions,
    pub layered: LayeredOptions,
    pub avoidance: AvoidanceOptions,
}

impl LayoutConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
