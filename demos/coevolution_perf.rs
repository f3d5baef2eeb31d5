//! Quick coevolution performance test

use coevo::{
    CoevolutionEngine,
    compute::{FitnessFn, evolution::build_objective},
    schema::{EngineConfig, ObjectiveSpec, SelectionMethod, StepConfig},
};
use std::time::Instant;

fn objectives(n_var: usize) -> Vec<FitnessFn> {
    vec![
        build_objective(
            &ObjectiveSpec::Proximity {
                target: vec![0.2; n_var],
            },
            n_var,
        )
        .unwrap(),
        build_objective(
            &ObjectiveSpec::Proximity {
                target: vec![0.8; n_var],
            },
            n_var,
        )
        .unwrap(),
    ]
}

fn main() {
    println!("=== Coevolution Performance Test ===\n");

    // Test different variable counts
    for n_var in [2, 8, 32] {
        println!("Variables: {}", n_var);

        let config = EngineConfig::new(100, n_var).with_seed(42);
        let step = StepConfig::new(0.8, 0.1).with_elite(2);

        let start = Instant::now();
        let mut engine = CoevolutionEngine::new(&config, objectives(n_var)).unwrap();
        let history = engine.run(&step, 200).unwrap();
        let elapsed = start.elapsed();

        let evals = engine.evaluations();
        let evals_per_sec = evals as f64 / elapsed.as_secs_f64();
        let last = history.last().unwrap();

        println!("  Generations:    {}", last.generation);
        println!("  Evaluations:    {}", evals);
        println!("  Elapsed:        {:.3}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", evals_per_sec);
        println!("  Best fitness:   {:.4?}", last.best);
        println!();
    }

    println!("=== Selection Comparison (fixed 8 variables) ===\n");

    for selection in [
        SelectionMethod::Roulette,
        SelectionMethod::Tournament { size: 2 },
        SelectionMethod::Tournament { size: 5 },
    ] {
        let config = EngineConfig::new(100, 8)
            .with_selection(selection.clone())
            .with_seed(42);
        let step = StepConfig::new(0.8, 0.1).with_elite(1);

        let start = Instant::now();
        let mut engine = CoevolutionEngine::new(&config, objectives(8)).unwrap();
        let history = engine.run(&step, 200).unwrap();
        let elapsed = start.elapsed();

        println!(
            "{:?}: best {:.4?} mean {:.4?} in {:.3}s",
            selection,
            history.last().unwrap().best,
            history.last().unwrap().mean,
            elapsed.as_secs_f64()
        );
    }
}
