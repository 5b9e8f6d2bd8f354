use criterion::{black_box, criterion_group, criterion_main, Criterion};

use satlab_core::{dp, dpll, resolution, SolverConfig};
use satlab_formula::{CnfFormula, ExtendFormula, Var};

fn pigeonhole(pigeons: usize, holes: usize) -> CnfFormula {
    let mut formula = CnfFormula::new();
    let var = |pigeon: usize, hole: usize| -> i64 {
        (pigeon * holes + hole + 1) as i64
    };

    for pigeon in 0..pigeons {
        formula.add_clause((0..holes).map(|hole| Var::from_dimacs(var(pigeon, hole)).positive()));
    }

    for hole in 0..holes {
        for p1 in 0..pigeons {
            for p2 in (p1 + 1)..pigeons {
                formula.add_clause(vec![
                    Var::from_dimacs(var(p1, hole)).negative(),
                    Var::from_dimacs(var(p2, hole)).negative(),
                ]);
            }
        }
    }

    formula
}

fn bench_pigeonhole(c: &mut Criterion) {
    let mut group = c.benchmark_group("pigeonhole");
    let config = SolverConfig::default();

    for holes in [3, 4, 5] {
        let formula = pigeonhole(holes + 1, holes);

        group.bench_with_input(format!("dp_{}_into_{}", holes + 1, holes), &holes, |b, _| {
            b.iter(|| dp::solve(black_box(&formula), black_box(&config)))
        });

        group.bench_with_input(format!("dpll_{}_into_{}", holes + 1, holes), &holes, |b, _| {
            b.iter(|| dpll::solve(black_box(&formula), black_box(&config)))
        });
    }

    group.finish();
}

fn bench_resolution_small(c: &mut Criterion) {
    let formula = pigeonhole(3, 2);
    let config = SolverConfig::default();

    c.bench_function("resolution_php_3_into_2", |b| {
        b.iter(|| resolution::solve(black_box(&formula), black_box(&config)))
    });
}

criterion_group!(benches, bench_pigeonhole, bench_resolution_small);
criterion_main!(benches);
