//! LFI search - command-line interface definitions
//!
//! Copyright (C) 2025 Pierre Aubert pierre(at)spinorama(dot)org
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use lfi_ga::{CrossoverKind, InitKind, SelectionKind};
use std::path::PathBuf;
use std::process;

/// CLI arguments for the LFI search binary.
#[derive(Parser, Debug, Clone)]
#[command(author, about, long_about = None)]
pub struct Args {
    /// JSON file with the (min, max, step) of each of the five parameters.
    /// Defaults to the whole stage for x and y.
    #[arg(short, long)]
    pub bounds: Option<PathBuf>,

    /// JSON file with the per-class fitness weights.
    #[arg(short, long)]
    pub weights: Option<PathBuf>,

    /// Number of individuals per generation.
    #[arg(short = 'p', long, default_value_t = 36, value_parser = parse_strictly_positive_usize)]
    pub pop_size: usize,

    /// Number of generations bred after the initial one.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub iterations: usize,

    /// Per-field mutation probability.
    #[arg(long, default_value_t = 0.05, value_parser = parse_probability)]
    pub mutation_prob: f64,

    /// Number of best individuals copied unchanged to the next generation.
    #[arg(long, default_value_t = 2)]
    pub elite: usize,

    /// Bench shots per candidate.
    #[arg(short, long, default_value_t = 5, value_parser = parse_strictly_positive_usize)]
    pub measurements: usize,

    /// Seed of the search; run `i` uses `seed + i`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seed of the simulated bench noise.
    #[arg(long)]
    pub bench_seed: Option<u64>,

    /// Selection strategy (e.g., tournament, tournament:5)
    #[arg(long, default_value = "tournament:3")]
    pub selection: String,

    /// Crossover strategy (average or uniform)
    #[arg(long, default_value = "average")]
    pub crossover: String,

    /// Initialization strategy (random, stratified, stratified:<levels>)
    #[arg(long, default_value = "stratified")]
    pub init: String,

    /// Stop as soon as the best fitness reaches this value.
    #[arg(long)]
    pub target_fitness: Option<f64>,

    /// Probe the neighbourhood of every fault point after the search.
    #[arg(long, default_value_t = false)]
    pub refine: bool,

    /// Refinement radius as a fraction of each parameter range.
    #[arg(long, default_value_t = 0.05, value_parser = parse_radius)]
    pub refine_radius: f64,

    /// Neighbours probed around each fault point.
    #[arg(long, default_value_t = 4)]
    pub probes: usize,

    /// Only refine the first N points of the tour.
    #[arg(long)]
    pub refine_points: Option<usize>,

    /// Number of independent searches.
    #[arg(long, default_value_t = 1, value_parser = parse_strictly_positive_usize)]
    pub runs: usize,

    /// Output JSON file for the run reports.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Record per-generation statistics to CSV under $LFI_GA_DIR/data_generated/records.
    #[arg(long, default_value_t = false)]
    pub record: bool,

    /// Override the directory used by --record.
    #[arg(long)]
    pub record_dir: Option<PathBuf>,

    /// Dispatch the repeated shots of one point in parallel.
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Number of worker threads for --parallel.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log every individual.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Validate CLI arguments
///
/// # Returns
/// * `Ok(())` if all arguments are consistent
/// * `Err(String)` describing the first problem found
pub fn validate_args(args: &Args) -> Result<(), String> {
    args.selection.parse::<SelectionKind>()?;
    args.crossover.parse::<CrossoverKind>()?;
    args.init.parse::<InitKind>()?;

    if args.elite > args.pop_size {
        return Err(format!(
            "Elite size ({}) cannot exceed the population size ({})",
            args.elite, args.pop_size
        ));
    }

    if args.refine && args.probes == 0 {
        return Err("--refine needs at least one probe per point (--probes)".to_string());
    }

    if let Some(0) = args.threads {
        return Err("--threads must be at least 1".to_string());
    }

    Ok(())
}

/// Validate CLI arguments and exit with error message if validation fails
pub fn validate_args_or_exit(args: &Args) {
    if let Err(error) = validate_args(args) {
        eprintln!("❌ Validation Error: {}", error);
        process::exit(1);
    }
}

fn parse_strictly_positive_usize(s: &str) -> Result<usize, String> {
    let v: usize = s.parse().map_err(|_| format!("invalid integer: {s}"))?;
    if v > 0 {
        Ok(v)
    } else {
        Err("value must be strictly positive (> 0)".to_string())
    }
}

fn parse_probability(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("invalid float: {s}"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err("value must be in [0, 1]".to_string())
    }
}

fn parse_radius(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("invalid float: {s}"))?;
    if v > 0.0 && v <= 1.0 {
        Ok(v)
    } else {
        Err("value must be in (0, 1]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let args = Args::parse_from(["lfi-test"]);
        assert_eq!(args.pop_size, 36);
        assert_eq!(args.iterations, 50);
        assert_eq!(args.mutation_prob, 0.05);
        assert_eq!(args.elite, 2);
        assert_eq!(args.measurements, 5);
        assert_eq!(args.runs, 1);
        assert_eq!(args.selection, "tournament:3");
        assert!(!args.refine);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn mutation_probability_must_be_in_unit_interval() {
        assert!(Args::try_parse_from(["lfi-test", "--mutation-prob", "1.5"]).is_err());
        assert!(Args::try_parse_from(["lfi-test", "--mutation-prob", "-0.1"]).is_err());
        assert!(Args::try_parse_from(["lfi-test", "--mutation-prob", "1.0"]).is_ok());
    }

    #[test]
    fn zero_measurements_rejected() {
        assert!(Args::try_parse_from(["lfi-test", "--measurements", "0"]).is_err());
        assert!(Args::try_parse_from(["lfi-test", "--runs", "0"]).is_err());
    }

    #[test]
    fn refine_radius_bounds() {
        assert!(Args::try_parse_from(["lfi-test", "--refine-radius", "0"]).is_err());
        assert!(Args::try_parse_from(["lfi-test", "--refine-radius", "0.2"]).is_ok());
    }

    #[test]
    fn validate_args_unknown_strategy() {
        let mut args = Args::parse_from(["lfi-test"]);
        args.crossover = "onepoint".to_string();
        let result = validate_args(&args);
        assert!(result.unwrap_err().contains("unknown crossover"));
    }

    #[test]
    fn validate_args_elite_too_large() {
        let args = Args::parse_from(["lfi-test", "--pop-size", "4", "--elite", "5"]);
        assert!(validate_args(&args).unwrap_err().contains("Elite size"));
    }

    #[test]
    fn validate_args_refine_without_probes() {
        let args = Args::parse_from(["lfi-test", "--refine", "--probes", "0"]);
        assert!(validate_args(&args).is_err());
    }
}
