use super::LayerOrder;

/// Total crossings over every pair of adjacent layers.
pub(crate) fn cross_count(o: &LayerOrder) -> u64 {
    let mut cc = 0u64;
    for i in 1..o.layers.len() {
        cc += two_layer_cross_count(o, i - 1, i);
    }
    cc
}

// Accumulator tree over south positions: each entry adds the number of already inserted entries
// that sit strictly to its right.
fn two_layer_cross_count(o: &LayerOrder, north: usize, south: usize) -> u64 {
    let south_len = o.layers[south].len();
    if south_len == 0 {
        return 0;
    }

    let mut south_entries: Vec<usize> = Vec::new();
    for &v in &o.layers[north] {
        let mut entries = o.neighbor_positions(v, south);
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south_len {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<u64> = vec![0; tree_size];

    let mut cc = 0u64;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0u64;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}

/// Crossings between the edges of `a` and `b` towards `layer` when `a` is placed left of `b`.
pub(crate) fn pair_crossings(o: &LayerOrder, a: usize, b: usize, layer: usize) -> u64 {
    let pa = o.neighbor_positions(a, layer);
    let pb = o.neighbor_positions(b, layer);
    let mut count = 0u64;
    for &x in &pa {
        for &y in &pb {
            if x > y {
                count += 1;
            }
        }
    }
    count
}
