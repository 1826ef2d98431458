/// Median of neighbor positions; the mean of the two middle values for an even count and `-1`
/// for a node without neighbors in the reference layer.
pub fn median_value(positions: &mut [usize]) -> f64 {
    if positions.is_empty() {
        return -1.0;
    }
    positions.sort_unstable();
    let mid = positions.len() / 2;
    if positions.len() % 2 == 1 {
        positions[mid] as f64
    } else {
        (positions[mid - 1] + positions[mid]) as f64 / 2.0
    }
}
