use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayeredOptions {
    pub max_order_iterations: usize,
    /// The ordering loop stops once this many iterations in a row failed to beat the best count.
    pub max_rounds_without_improvement: usize,
    pub max_transpose_passes: usize,
    pub min_column_width: f64,
    pub max_column_width: f64,
    pub min_row_height: f64,
    pub max_row_height: f64,
}

impl Default for LayeredOptions {
    fn default() -> Self {
        Self {
            max_order_iterations: 24,
            max_rounds_without_improvement: 6,
            max_transpose_passes: 20,
            min_column_width: 100.0,
            max_column_width: 300.0,
            min_row_height: 50.0,
            max_row_height: 100.0,
        }
    }
}
