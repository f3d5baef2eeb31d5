//! Coevo CLI - Run coevolutionary optimizations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use coevo::{
    compute::{CoevolutionEngine, evolution::build_objective},
    schema::RunConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <run.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Run a coevolutionary optimization from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  run.json     Path to run configuration file");
        eprintln!("  generations  Override the configured number of generations");
        eprintln!();
        eprintln!("Example configuration is printed with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let config = RunConfig::from_path(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {}", config_path.display(), e);
        std::process::exit(1);
    });
    let generations = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.generations);

    let names: Vec<String> = config.objectives.iter().map(|o| o.name()).collect();
    let objectives = config
        .objectives
        .iter()
        .map(|o| build_objective(o, config.engine.variables))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error building objectives: {}", e);
            std::process::exit(1);
        });

    println!("Coevolutionary Optimization");
    println!("===========================");
    println!(
        "Population: {} x {} variables",
        config.engine.population_size, config.engine.variables
    );
    println!("Objectives: {}", names.join(", "));
    println!("Selection: {:?}", config.engine.selection);
    println!("Generations: {}", generations);
    println!();

    let mut engine = CoevolutionEngine::new(&config.engine, objectives).unwrap_or_else(|e| {
        eprintln!("Error creating engine: {}", e);
        std::process::exit(1);
    });

    println!("Running...");
    let start = Instant::now();
    let report_every = (generations / 10).max(1);

    let result = engine.run_with_callback(&config.step, generations, |summary| {
        if summary.generation % report_every == 0 {
            println!(
                "  Generation {}/{}: best={:.6?} mean={:.6?} recomputed={}",
                summary.generation, generations, summary.best, summary.mean, summary.reevaluated
            );
        }
    });

    if let Err(e) = result {
        eprintln!("Evolution stopped: {}", e);
        std::process::exit(1);
    }

    let elapsed = start.elapsed();

    println!();
    println!("Best individual per objective:");
    for (objective, name) in names.iter().enumerate() {
        if let Some(slot) = engine.best_index(objective) {
            println!(
                "  {}: slot {} fitness={:.6?} x={:.6?}",
                name,
                slot,
                engine.fitness().row(slot),
                engine.population()[slot]
            );
        }
    }
    println!();
    println!(
        "Evaluations: {} in {:.2}s ({:.1} generations/s)",
        engine.evaluations(),
        elapsed.as_secs_f32(),
        generations as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = RunConfig::default();

    println!("Example configuration (run.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example: {}", e),
    }
}
