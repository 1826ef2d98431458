use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use petrel_layered::{LayeredOptions, LayeredPipeline, layout};
use petrel_net::{Canvas, Net};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct NetBlueprint {
    node_count: usize,
    arcs: Vec<(usize, usize)>,
}

impl NetBlueprint {
    fn build(&self) -> Net {
        let mut net = Net::new();
        for i in 0..self.node_count {
            // Even indices are places, odd ones transitions.
            let _ = if i % 2 == 0 {
                net.add_place(format!("n{i}"), 0.0, 0.0)
            } else {
                net.add_transition(format!("n{i}"), 0.0, 0.0)
            };
        }
        for &(from, to) in &self.arcs {
            let _ = net.add_arc(&format!("n{from}"), &format!("n{to}"), 1);
        }
        net
    }
}

fn build_blueprint(node_count: usize, fanout: usize) -> NetBlueprint {
    let mut arcs = Vec::new();

    // A spine to guarantee connectivity.
    for i in 0..node_count.saturating_sub(1) {
        arcs.push((i, i + 1));
    }

    // Odd offsets keep arcs between a place and a transition while creating long arcs and
    // crossing pressure.
    for i in 0..node_count {
        for k in 1..=fanout {
            let to = i + 2 * k + 1;
            if to >= node_count {
                break;
            }
            arcs.push((i, to));
        }
        // An occasional back arc forces cycle removal.
        if i >= 7 && i % 5 == 0 {
            arcs.push((i, i - 7));
        }
    }

    NetBlueprint { node_count, arcs }
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered");
    group.measurement_time(Duration::from_secs(10));

    let cases = [("net_40_f2", 40usize, 2usize), ("net_120_f3", 120, 3)];

    for (name, nodes, fanout) in cases {
        let blueprint = build_blueprint(nodes, fanout);
        group.bench_with_input(
            BenchmarkId::new("order_vertices", name),
            &blueprint,
            |b, blueprint| {
                b.iter_batched(
                    || {
                        let net = blueprint.build();
                        let mut p = LayeredPipeline::new(&net, LayeredOptions::default());
                        let _ = p.remove_cycles();
                        let _ = p.assign_layers();
                        p
                    },
                    |mut p| {
                        let report = p.order_vertices().map(|r| r.best_crossings);
                        black_box(report.ok());
                    },
                    BatchSize::LargeInput,
                )
            },
        );
        group.bench_with_input(BenchmarkId::new("layout", name), &blueprint, |b, blueprint| {
            b.iter_batched(
                || blueprint.build(),
                |mut net| {
                    let summary =
                        layout(black_box(&mut net), &LayeredOptions::default(), Canvas::default());
                    black_box(summary.ok());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ordering);
criterion_main!(benches);
