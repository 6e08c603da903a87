//! Shared workflow steps: inputs, engine configuration, runs and output

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lfi_bench::DummyCartography;
use lfi_ga::{
    AnyOf, CrossoverKind, FitnessThreshold, FitnessWeights, GaConfig, GaConfigBuilder, GaReport,
    InitKind, MaxIterations, MeasurementOracle, ParallelConfig, ParameterBounds, RefinementConfig,
    SelectionKind, genetic_algorithm, run_recorded_search,
};

use crate::cli::Args;
use crate::config::{ConfigError, default_bounds, load_bounds, load_weights};

/// Bounds and weights, from files when given, defaults otherwise
pub fn load_inputs(args: &Args) -> Result<(Arc<ParameterBounds>, FitnessWeights), ConfigError> {
    let bounds = match &args.bounds {
        Some(path) => load_bounds(path)?,
        None => default_bounds(),
    };
    let weights = match &args.weights {
        Some(path) => load_weights(path)?,
        None => FitnessWeights::default(),
    };
    Ok((Arc::new(bounds), weights))
}

/// Engine configuration for run number `run`
pub fn build_config(args: &Args, weights: &FitnessWeights, run: usize) -> Result<GaConfig, ConfigError> {
    let selection = args.selection.parse::<SelectionKind>().map_err(ConfigError::Strategy)?;
    let crossover = args.crossover.parse::<CrossoverKind>().map_err(ConfigError::Strategy)?;
    let init = args.init.parse::<InitKind>().map_err(ConfigError::Strategy)?;

    let mut builder = GaConfigBuilder::new()
        .pop_size(args.pop_size)
        .max_iterations(args.iterations)
        .mutation_probability(args.mutation_prob)
        .elite_size(args.elite)
        .nb_measurements(args.measurements)
        .selection_kind(selection)
        .crossover_kind(crossover)
        .init_kind(init)
        .weights(weights.clone())
        .parallel(ParallelConfig { enabled: args.parallel, num_threads: args.threads })
        .refinement(RefinementConfig {
            enabled: args.refine,
            radius_fraction: args.refine_radius,
            probes_per_point: args.probes,
            max_points: args.refine_points,
        });
    if let Some(seed) = args.seed {
        builder = builder.seed(seed.wrapping_add(run as u64));
    }
    if let Some(target) = args.target_fitness {
        builder = builder.stop_condition(Box::new(AnyOf(vec![
            Box::new(MaxIterations(args.iterations)),
            Box::new(FitnessThreshold(target)),
        ])));
    }
    let config = builder.build();
    config.validate()?;
    Ok(config)
}

/// Where `--record` writes its CSV files
pub fn records_dir(args: &Args) -> Result<PathBuf, Box<dyn Error>> {
    match &args.record_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(lfi_env::get_records_dir()?),
    }
}

/// One full search, recorded when `--record` is set
pub fn run_once<O: MeasurementOracle + ?Sized>(
    args: &Args,
    oracle: &O,
    bounds: Arc<ParameterBounds>,
    weights: &FitnessWeights,
    run: usize,
) -> Result<GaReport, Box<dyn Error>> {
    let config = build_config(args, weights, run)?;
    if args.record {
        let dir = records_dir(args)?;
        let name = format!("lfi_search_run{}", run);
        let (report, csv_path) = run_recorded_search(&name, oracle, bounds, config, &dir)?;
        log::info!("run {}: generations recorded in {}", run, csv_path.display());
        Ok(report)
    } else {
        Ok(genetic_algorithm(oracle, bounds, config)?)
    }
}

/// Log a short summary of `report`
pub fn summarize(run: usize, report: &GaReport) {
    log::info!(
        "run {}: {} after {} generations, {} bench shots",
        run,
        report.message,
        report.generations,
        report.nfev
    );
    match &report.best {
        Some(best) => log::info!(
            "run {}: best {} (fitness {:.3})",
            run,
            best,
            best.fitness().unwrap_or(f64::NAN)
        ),
        None => log::warn!("run {}: no individual was scored", run),
    }
    log::info!("run {}: {} fault points archived", run, report.fault_archive.len());
    if let Some(refinement) = &report.refinement {
        log::info!(
            "run {}: refinement probed {} points, {} reproduced a fault",
            run,
            refinement.probes.len(),
            refinement.fault_probes().count()
        );
    }
}

pub fn write_reports(path: &Path, reports: &[GaReport]) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, reports)?;
    Ok(())
}

/// Every run of `args` against the simulated bench
pub fn run(args: &Args) -> Result<Vec<GaReport>, Box<dyn Error>> {
    let (bounds, weights) = load_inputs(args)?;
    let bench = match args.bench_seed {
        Some(seed) => DummyCartography::with_seed(seed),
        None => DummyCartography::default(),
    };
    let mut reports = Vec::with_capacity(args.runs);
    for run in 0..args.runs {
        let report = run_once(args, &bench, bounds.clone(), &weights, run)?;
        summarize(run, &report);
        reports.push(report);
    }
    if let Some(path) = &args.output {
        write_reports(path, &reports)?;
        log::info!("reports written to {}", path.display());
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_build_config_from_args() {
        let args = Args::parse_from([
            "lfi-test",
            "--pop-size",
            "10",
            "--iterations",
            "7",
            "--seed",
            "100",
            "--init",
            "random",
            "--refine",
        ]);
        let config = build_config(&args, &FitnessWeights::default(), 2).unwrap();
        assert_eq!(config.pop_size, 10);
        assert_eq!(config.max_iterations, 7);
        assert_eq!(config.seed, Some(102));
        assert!(config.refinement.enabled);
        assert!(config.stop_condition.is_none());
    }

    #[test]
    fn test_build_config_rejects_unknown_strategy() {
        let mut args = Args::parse_from(["lfi-test"]);
        args.selection = "roulette".to_string();
        assert!(matches!(
            build_config(&args, &FitnessWeights::default(), 0),
            Err(ConfigError::Strategy(_))
        ));
    }

    #[test]
    fn test_target_fitness_installs_stop_condition() {
        let args = Args::parse_from(["lfi-test", "--target-fitness", "14.5"]);
        let config = build_config(&args, &FitnessWeights::default(), 0).unwrap();
        let stop = config.stop_condition.unwrap();
        assert!(stop.should_stop(1, &[], Some(15.0)));
        assert!(stop.should_stop(50, &[], None));
        assert!(!stop.should_stop(1, &[], Some(3.0)));
    }

    #[test]
    fn test_default_inputs_cover_the_stage() {
        let args = Args::parse_from(["lfi-test"]);
        let (bounds, weights) = load_inputs(&args).unwrap();
        assert_eq!(bounds.x.max, lfi_bench::STAGE_SIZE);
        assert_eq!(weights, FitnessWeights::default());
    }
}
