//! Benchmarks for qsp circuit construction
//!
//! Run with: cargo bench -p qsp-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsp_ir::{Circuit, QubitId};
use rustc_hash::FxHashMap;

/// Full binary tree of multi-controlled rotations, one per node.
fn rotation_tree(n: u32, symbolic: bool) -> Circuit {
    let mut circuit = Circuit::with_size("tree", n, 0);
    for k in 0..n {
        let target = QubitId(n - 1 - k);
        let controls: Vec<_> = (0..k).map(|c| QubitId(n - 1 - c)).collect();
        for i in 0..(1u64 << k) {
            if symbolic {
                circuit
                    .mcry(format!("theta_{k}_{i}").as_str(), &controls, i, target)
                    .unwrap();
            } else {
                circuit.mcry(0.1, &controls, i, target).unwrap();
            }
        }
    }
    circuit
}

fn bench_rotation_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotation_tree");

    for num_qubits in &[4u32, 6, 8, 10] {
        group.bench_with_input(
            BenchmarkId::new("build", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| rotation_tree(black_box(n), false));
            },
        );
    }

    group.finish();
}

fn bench_bind_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_parameters");

    for num_qubits in &[4u32, 8] {
        let circuit = rotation_tree(*num_qubits, true);
        let bindings: FxHashMap<String, f64> = circuit
            .parameters()
            .into_iter()
            .map(|name| (name, 0.25))
            .collect();
        group.bench_with_input(
            BenchmarkId::new("bind", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| circuit.bind_parameters(black_box(&bindings)));
            },
        );
    }

    group.finish();
}

fn bench_qft(c: &mut Criterion) {
    let mut group = c.benchmark_group("qft");

    for num_qubits in &[4u32, 8, 16] {
        group.bench_with_input(
            BenchmarkId::new("build", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| {
                    let mut circuit = Circuit::with_size("qft", n, 0);
                    let qubits = circuit.qubit_ids();
                    circuit.qft(&qubits).unwrap();
                    circuit
                });
            },
        );
    }

    group.finish();
}

fn bench_expand_open_controls(c: &mut Criterion) {
    let circuit = rotation_tree(8, false);
    c.bench_function("expand_open_controls_8", |b| {
        b.iter(|| black_box(&circuit).expand_open_controls().unwrap());
    });
}

criterion_group!(
    benches,
    bench_rotation_tree,
    bench_bind_parameters,
    bench_qft,
    bench_expand_open_controls
);
criterion_main!(benches);
