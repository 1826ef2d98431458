//! Spring embedder core: one synchronous force step at a time.

use crate::error::Result;
use crate::options::SpringOptions;
use crate::rng::XorShift64Star;
use petrel_net::{Net, Point};
use rustc_hash::{FxHashMap, FxHashSet};

/// Force on a node at `p` pushing it away from a node at `q`.
///
/// Coincident nodes have no direction to push in and exert no force on each other.
pub fn repulsion(p: Point, q: Point, options: &SpringOptions) -> Point {
    let delta = p - q;
    let Some(dir) = delta.normalized() else {
        return Point::default();
    };
    dir * (options.repulsion_constant / (delta.length_squared() + options.repulsion_softening))
}

/// Force on a node at `p` along its arc towards a neighbor at `q`: attracting beyond the ideal
/// length, repelling below it.
pub fn spring(p: Point, q: Point, options: &SpringOptions) -> Point {
    let delta = q - p;
    let Some(dir) = delta.normalized() else {
        return Point::default();
    };
    dir * (options.spring_constant * (delta.length() / options.ideal_length).log10())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JitterReport {
    pub shifted: usize,
    /// Nodes left on an occupied position after every attempt failed.
    pub exhausted: usize,
}

#[derive(Debug, Clone)]
pub struct SpringEmbedder {
    ids: Vec<String>,
    positions: Vec<Point>,
    neighbors: Vec<Vec<usize>>,
    options: SpringOptions,
    rng: XorShift64Star,
}

impl SpringEmbedder {
    /// Takes every node with at least one arc, in net order. Isolated nodes are left out and keep
    /// their position.
    pub fn new(net: &Net, options: SpringOptions) -> Self {
        let connected: FxHashSet<&str> = net
            .arcs()
            .iter()
            .flat_map(|a| [a.from.as_str(), a.to.as_str()])
            .collect();

        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        let mut ids = Vec::new();
        let mut positions = Vec::new();
        for node in net.nodes() {
            if connected.contains(node.id.as_str()) {
                index.insert(node.id.as_str(), ids.len());
                ids.push(node.id.clone());
                positions.push(node.position);
            }
        }

        let mut neighbors = vec![Vec::new(); ids.len()];
        for arc in net.arcs() {
            if let (Some(&from), Some(&to)) =
                (index.get(arc.from.as_str()), index.get(arc.to.as_str()))
            {
                neighbors[from].push(to);
                neighbors[to].push(from);
            }
        }

        Self {
            ids,
            positions,
            neighbors,
            options,
            rng: XorShift64Star::new(options.random_seed),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.ids
            .iter()
            .position(|v| v == id)
            .map(|ix| self.positions[ix])
    }

    /// Neighbor ids of `id`, one entry per connecting arc.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(ix) = self.ids.iter().position(|v| v == id) else {
            return Vec::new();
        };
        self.neighbors[ix]
            .iter()
            .map(|&n| self.ids[n].as_str())
            .collect()
    }

    /// Moves nodes that share a position with an earlier node to a random nearby free spot.
    pub fn separate_coincident(&mut self) -> JitterReport {
        let tolerance = self.options.same_position_tolerance;
        let range = self.options.shift_range;
        let mut report = JitterReport::default();
        let mut used: Vec<Point> = Vec::with_capacity(self.positions.len());

        for ix in 0..self.positions.len() {
            let origin = self.positions[ix];
            let taken = |p: Point, used: &[Point]| used.iter().any(|u| u.approx_eq(p, tolerance));

            if taken(origin, &used) {
                let mut placed = None;
                for _ in 0..self.options.max_shift_attempts {
                    let candidate = origin
                        + Point::new(
                            self.rng.next_f64_signed() * range,
                            self.rng.next_f64_signed() * range,
                        );
                    if !taken(candidate, &used) {
                        placed = Some(candidate);
                        break;
                    }
                }
                match placed {
                    Some(p) => {
                        self.positions[ix] = p;
                        report.shifted += 1;
                    }
                    None => {
                        tracing::warn!(
                            node = %self.ids[ix],
                            attempts = self.options.max_shift_attempts,
                            "could not move node off an occupied position"
                        );
                        report.exhausted += 1;
                    }
                }
            }
            used.push(self.positions[ix]);
        }
        report
    }

    /// Computes every node's force from the current positions, then applies all of them.
    /// Returns the largest displacement.
    pub fn step(&mut self) -> f64 {
        let o = &self.options;
        let displacements: Vec<Point> = (0..self.positions.len())
            .map(|v| {
                let p = self.positions[v];
                let mut force = Point::default();
                for (u, &q) in self.positions.iter().enumerate() {
                    if u != v {
                        force = force + repulsion(p, q, o);
                    }
                }
                for &n in &self.neighbors[v] {
                    force = force + spring(p, self.positions[n], o);
                }
                force
            })
            .collect();

        let mut max = 0.0f64;
        for (p, d) in self.positions.iter_mut().zip(displacements) {
            *p = *p + d;
            max = max.max(d.length());
        }
        max
    }

    pub fn write_back(&self, net: &mut Net) -> Result<()> {
        for (id, &p) in self.ids.iter().zip(&self.positions) {
            net.set_position(id, p)?;
        }
        Ok(())
    }
}
