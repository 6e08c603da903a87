//! Genetic search for laser fault-injection parameters
//!
//! The search space has five bounded dimensions: beam position (x, y),
//! trigger delay, pulse width and intensity. Each candidate is measured
//! several times on a noisy bench; the raw outcomes are aggregated into a
//! fitness and a fault class, and a generational GA with elitism pushes the
//! population towards reproducible faults.
//!
//! Supported features:
//! - Step-grid bounds with clipping, integral power width and intensity
//! - k-tournament selection, uniform or average crossover, uniform mutation
//! - Random or stratified (Taguchi-style) initialization
//! - Pluggable stop conditions and a per-generation callback
//! - Fault archive and greedy nearest-neighbour local refinement
//! - Optional parallel dispatch of the repeated measurements with rayon

#![allow(missing_docs)]
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

pub mod bounds;
pub mod error;
pub mod fault_class;
pub mod field;
pub mod parameter_set;

pub mod measurement;
pub mod oracle;
pub mod parallel_eval;

pub mod fitness;
pub mod scoring;

pub mod strategy;

pub mod crossover_average;
pub mod crossover_uniform;
pub mod init_random;
pub mod init_stratified;
pub mod mutation_uniform;
pub mod selection_tournament;
pub mod stop_condition;

pub mod genetic_algorithm;
pub mod population;
pub mod recorder;
pub mod refinement;
pub mod run_recorded;

pub use bounds::{FieldBounds, ParameterBounds};
pub use crossover_average::AverageCrossover;
pub use crossover_uniform::UniformCrossover;
pub use error::{GaError, GaResult};
pub use fault_class::FaultClass;
pub use field::{Field, PARAMETER_COUNT};
pub use fitness::{Evaluation, FitnessEvaluator, FitnessWeights, WeightedFitness};
pub use genetic_algorithm::genetic_algorithm;
pub use init_random::RandomInit;
pub use init_stratified::StratifiedInit;
pub use measurement::MeasurementAdapter;
pub use mutation_uniform::UniformMutation;
pub use oracle::{BenchCoordinates, Measurement, MeasurementOracle};
pub use parallel_eval::ParallelConfig;
pub use parameter_set::{Origin, ParameterSet};
pub use population::PopulationManager;
pub use recorder::{GenerationRecord, GenerationRecorder};
pub use refinement::{GreedyEuclidean, RefinementConfig, RefinementReport};
pub use run_recorded::run_recorded_search;
pub use scoring::Scorer;
pub use selection_tournament::TournamentSelection;
pub use stop_condition::{AnyOf, FitnessThreshold, MaxIterations};
pub use strategy::{Crossover, Initialization, Mutation, PointOrdering, Selection, StopCondition};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Uninitialized,
	Initialized,
	/// Current generation is (being) scored
	Evaluating,
	/// A new generation was bred and awaits scoring
	Evolving,
	Terminated,
}

/// Selection strategy by name: `tournament` or `tournament:<k>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
	Tournament(usize),
}

impl Default for SelectionKind {
	fn default() -> Self {
		SelectionKind::Tournament(3)
	}
}

impl SelectionKind {
	pub fn build(self) -> Box<dyn Selection> {
		match self {
			SelectionKind::Tournament(k) => Box::new(TournamentSelection::new(k)),
		}
	}
}

/// Split `name:arg` into its lowercase name and optional numeric argument
fn split_arg(s: &str) -> Result<(String, Option<usize>), String> {
	let t = s.trim().to_lowercase();
	match t.split_once(':') {
		Some((name, arg)) => {
			let n = arg.parse::<usize>().map_err(|_| format!("invalid argument in '{}'", s))?;
			Ok((name.to_string(), Some(n)))
		}
		None => Ok((t, None)),
	}
}

impl FromStr for SelectionKind {
	type Err = String;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (name, arg) = split_arg(s)?;
		match name.as_str() {
			"tournament" | "ktournament" | "k-tournament" => {
				let k = arg.unwrap_or(3);
				if k == 0 {
					return Err("tournament size must be at least 1".to_string());
				}
				Ok(SelectionKind::Tournament(k))
			}
			_ => Err(format!("unknown selection: {}", s)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossoverKind {
	#[default]
	Average,
	Uniform,
}

impl CrossoverKind {
	pub fn build(self) -> Box<dyn Crossover> {
		match self {
			CrossoverKind::Average => Box::new(AverageCrossover),
			CrossoverKind::Uniform => Box::new(UniformCrossover),
		}
	}
}

impl FromStr for CrossoverKind {
	type Err = String;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"average" | "avg" | "average_crossover" => Ok(CrossoverKind::Average),
			"uniform" | "uniform_crossover" => Ok(CrossoverKind::Uniform),
			_ => Err(format!("unknown crossover: {}", s)),
		}
	}
}

/// Initialization by name: `random`, `stratified` or `stratified:<levels>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitKind {
	Random,
	Stratified(usize),
}

impl Default for InitKind {
	fn default() -> Self {
		InitKind::Stratified(3)
	}
}

impl InitKind {
	pub fn build(self) -> Box<dyn Initialization> {
		match self {
			InitKind::Random => Box::new(RandomInit),
			InitKind::Stratified(levels) => Box::new(StratifiedInit::uniform(levels)),
		}
	}
}

impl FromStr for InitKind {
	type Err = String;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (name, arg) = split_arg(s)?;
		match name.as_str() {
			"random" => Ok(InitKind::Random),
			"stratified" | "taguchi" => {
				let levels = arg.unwrap_or(3);
				if levels == 0 {
					return Err("stratified levels must be at least 1".to_string());
				}
				Ok(InitKind::Stratified(levels))
			}
			_ => Err(format!("unknown initialization: {}", s)),
		}
	}
}

/// Configuration for the genetic search
pub struct GaConfig {
	pub pop_size: usize,
	/// Generations bred after the initial one
	pub max_iterations: usize,
	pub mutation_probability: f64,
	pub elite_size: usize,
	/// Bench shots per candidate
	pub nb_measurements: usize,
	pub seed: Option<u64>,
	pub selection: Box<dyn Selection>,
	pub crossover: Box<dyn Crossover>,
	pub mutation: Box<dyn Mutation>,
	pub init: Box<dyn Initialization>,
	/// Replaces the default `MaxIterations(max_iterations)`
	pub stop_condition: Option<Box<dyn StopCondition>>,
	pub evaluator: Box<dyn FitnessEvaluator>,
	pub ordering: Box<dyn PointOrdering>,
	pub refinement: RefinementConfig,
	pub parallel: ParallelConfig,
	/// Optional per-generation callback (may stop early)
	pub callback: Option<Box<dyn FnMut(&GaIntermediate) -> CallbackAction>>,
}

impl Default for GaConfig {
	fn default() -> Self {
		Self {
			pop_size: 36,
			max_iterations: 50,
			mutation_probability: 0.05,
			elite_size: 2,
			nb_measurements: 5,
			seed: None,
			selection: SelectionKind::default().build(),
			crossover: CrossoverKind::default().build(),
			mutation: Box::new(UniformMutation),
			init: InitKind::default().build(),
			stop_condition: None,
			evaluator: Box::new(WeightedFitness::default()),
			ordering: Box::new(GreedyEuclidean),
			refinement: RefinementConfig::default(),
			parallel: ParallelConfig::default(),
			callback: None,
		}
	}
}

impl GaConfig {
	pub fn validate(&self) -> GaResult<()> {
		if self.pop_size == 0 {
			return Err(GaError::InvalidConfig("pop_size must be at least 1".into()));
		}
		if self.elite_size > self.pop_size {
			return Err(GaError::InvalidConfig(format!(
				"elite_size ({}) cannot exceed pop_size ({})",
				self.elite_size, self.pop_size
			)));
		}
		if !(0.0..=1.0).contains(&self.mutation_probability) {
			return Err(GaError::InvalidConfig(format!(
				"mutation probability must be in [0, 1], got {}",
				self.mutation_probability
			)));
		}
		if self.nb_measurements == 0 {
			return Err(GaError::InvalidConfig("nb_measurements must be at least 1".into()));
		}
		if self.refinement.enabled {
			self.refinement.validate()?;
		}
		Ok(())
	}
}

/// Fluent builder for `GaConfig`
pub struct GaConfigBuilder {
	cfg: GaConfig,
}

impl Default for GaConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl GaConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: GaConfig::default() }
	}
	pub fn pop_size(mut self, v: usize) -> Self {
		self.cfg.pop_size = v;
		self
	}
	pub fn max_iterations(mut self, v: usize) -> Self {
		self.cfg.max_iterations = v;
		self
	}
	pub fn mutation_probability(mut self, v: f64) -> Self {
		self.cfg.mutation_probability = v;
		self
	}
	pub fn elite_size(mut self, v: usize) -> Self {
		self.cfg.elite_size = v;
		self
	}
	pub fn nb_measurements(mut self, v: usize) -> Self {
		self.cfg.nb_measurements = v;
		self
	}
	pub fn seed(mut self, v: u64) -> Self {
		self.cfg.seed = Some(v);
		self
	}
	pub fn selection(mut self, v: Box<dyn Selection>) -> Self {
		self.cfg.selection = v;
		self
	}
	pub fn selection_kind(self, v: SelectionKind) -> Self {
		self.selection(v.build())
	}
	pub fn crossover(mut self, v: Box<dyn Crossover>) -> Self {
		self.cfg.crossover = v;
		self
	}
	pub fn crossover_kind(self, v: CrossoverKind) -> Self {
		self.crossover(v.build())
	}
	pub fn mutation(mut self, v: Box<dyn Mutation>) -> Self {
		self.cfg.mutation = v;
		self
	}
	pub fn init(mut self, v: Box<dyn Initialization>) -> Self {
		self.cfg.init = v;
		self
	}
	pub fn init_kind(self, v: InitKind) -> Self {
		self.init(v.build())
	}
	pub fn stop_condition(mut self, v: Box<dyn StopCondition>) -> Self {
		self.cfg.stop_condition = Some(v);
		self
	}
	pub fn evaluator(mut self, v: Box<dyn FitnessEvaluator>) -> Self {
		self.cfg.evaluator = v;
		self
	}
	pub fn weights(self, v: FitnessWeights) -> Self {
		self.evaluator(Box::new(WeightedFitness::new(v)))
	}
	pub fn ordering(mut self, v: Box<dyn PointOrdering>) -> Self {
		self.cfg.ordering = v;
		self
	}
	pub fn refinement(mut self, v: RefinementConfig) -> Self {
		self.cfg.refinement = v;
		self
	}
	pub fn parallel(mut self, v: ParallelConfig) -> Self {
		self.cfg.parallel = v;
		self
	}
	pub fn enable_parallel(mut self, enable: bool) -> Self {
		self.cfg.parallel.enabled = enable;
		self
	}
	pub fn callback(mut self, cb: Box<dyn FnMut(&GaIntermediate) -> CallbackAction>) -> Self {
		self.cfg.callback = Some(cb);
		self
	}
	pub fn build(self) -> GaConfig {
		self.cfg
	}
}

/// Result of a genetic search
#[derive(Clone, Serialize)]
pub struct GaReport {
	pub best: Option<ParameterSet>,
	pub best_fitness: Option<f64>,
	pub success: bool,
	pub message: String,
	/// Generations bred after the initial one
	pub generations: usize,
	/// Bench shots, refinement included
	pub nfev: usize,
	pub population: Vec<ParameterSet>,
	pub fault_archive: Vec<ParameterSet>,
	pub refinement: Option<RefinementReport>,
}

impl fmt::Debug for GaReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GaReport")
			.field("best", &self.best)
			.field("best_fitness", &self.best_fitness)
			.field("success", &self.success)
			.field("message", &self.message)
			.field("generations", &self.generations)
			.field("nfev", &self.nfev)
			.field("population", &format!("len={}", self.population.len()))
			.field("fault_archive", &format!("len={}", self.fault_archive.len()))
			.field(
				"refinement",
				&self.refinement.as_ref().map(|r| format!("probes={}", r.probes.len())),
			)
			.finish()
	}
}

/// Information passed to callback after each scored generation
#[derive(Debug, Clone)]
pub struct GaIntermediate {
	pub generation: usize,
	pub best: Option<ParameterSet>,
	pub best_fitness: Option<f64>,
	pub mean_fitness: f64,
	/// Mean per-field std of the normalised population
	pub diversity: f64,
	pub fault_count: usize,
}

/// Action returned by callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
	Continue,
	Stop,
}

/// Genetic search driving a bench oracle
pub struct GeneticAlgorithm<'a, O>
where
	O: MeasurementOracle + ?Sized,
{
	oracle: &'a O,
	bounds: Arc<ParameterBounds>,
	config: GaConfig,
}

impl<'a, O> GeneticAlgorithm<'a, O>
where
	O: MeasurementOracle + ?Sized,
{
	pub fn new(oracle: &'a O, bounds: Arc<ParameterBounds>) -> Self {
		Self { oracle, bounds, config: GaConfig::default() }
	}

	/// Mutable access to configuration
	pub fn config_mut(&mut self) -> &mut GaConfig {
		&mut self.config
	}

	/// Run the search and return a report
	pub fn solve(&mut self) -> GaResult<GaReport> {
		self.config.validate()?;
		self.bounds.validate()?;

		let mut rng: StdRng = match self.config.seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => {
				let mut thread_rng = rand::rng();
				StdRng::from_rng(&mut thread_rng)
			}
		};

		log::info!(
			"GA init: population={}, max_iterations={}, elite={}, mutation={:.3}, measurements={}",
			self.config.pop_size,
			self.config.max_iterations,
			self.config.elite_size,
			self.config.mutation_probability,
			self.config.nb_measurements
		);

		if let Some(n) = self.config.parallel.num_threads {
			// the global pool can only be set once per process
			let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
		}

		let adapter = MeasurementAdapter::new(self.config.nb_measurements, self.config.parallel.clone())?;
		let scorer = Scorer::new(self.oracle, &adapter, self.config.evaluator.as_ref());
		let default_stop = MaxIterations(self.config.max_iterations);
		let stop: &dyn StopCondition = match &self.config.stop_condition {
			Some(s) => s.as_ref(),
			None => &default_stop,
		};

		let mut manager = PopulationManager::new(
			self.bounds.clone(),
			self.config.pop_size,
			self.config.elite_size,
			self.config.mutation_probability,
		)?;
		manager.initialize(self.config.init.as_ref(), &mut rng)?;
		manager.evaluate(&scorer)?;

		let message = loop {
			if let Some(cb) = self.config.callback.as_mut() {
				if cb(&manager.intermediate()) == CallbackAction::Stop {
					break format!("Stopped by callback at generation {}", manager.generation());
				}
			}
			if stop.should_stop(manager.generation(), manager.population(), manager.best_fitness()) {
				break format!("Stop condition met at generation {}", manager.generation());
			}
			manager.evolve(
				self.config.selection.as_ref(),
				self.config.crossover.as_ref(),
				self.config.mutation.as_ref(),
				&mut rng,
			)?;
			manager.evaluate(&scorer)?;
		};
		manager.terminate()?;
		log::info!("{}", message);

		let mut nfev = manager.nfev();
		let refinement = if self.config.refinement.enabled {
			if manager.archive().is_empty() {
				log::warn!("no fault point found, skipping refinement");
				None
			} else {
				let report = refinement::refine(
					manager.archive(),
					self.config.ordering.as_ref(),
					&self.config.refinement,
					&scorer,
					&mut rng,
				)?;
				nfev += report.nfev;
				Some(report)
			}
		} else {
			None
		};

		let best = manager.best().cloned();
		let best_fitness = manager.best_fitness();
		let fault_archive = manager.archive().to_vec();
		let generations = manager.generation();
		Ok(GaReport {
			success: !fault_archive.is_empty(),
			best,
			best_fitness,
			message,
			generations,
			nfev,
			population: manager.into_population(),
			fault_archive,
			refinement,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_strategy_names() {
		assert_eq!("tournament".parse::<SelectionKind>().unwrap(), SelectionKind::Tournament(3));
		assert_eq!("Tournament:5".parse::<SelectionKind>().unwrap(), SelectionKind::Tournament(5));
		assert!("tournament:0".parse::<SelectionKind>().is_err());
		assert!("tournament:x".parse::<SelectionKind>().is_err());
		assert!("roulette".parse::<SelectionKind>().is_err());

		assert_eq!("average".parse::<CrossoverKind>().unwrap(), CrossoverKind::Average);
		assert_eq!("uniform".parse::<CrossoverKind>().unwrap(), CrossoverKind::Uniform);
		assert!("onepoint".parse::<CrossoverKind>().is_err());

		assert_eq!("random".parse::<InitKind>().unwrap(), InitKind::Random);
		assert_eq!("stratified".parse::<InitKind>().unwrap(), InitKind::Stratified(3));
		assert_eq!("stratified:4".parse::<InitKind>().unwrap(), InitKind::Stratified(4));
	}

	#[test]
	fn test_config_validation() {
		assert!(GaConfig::default().validate().is_ok());
		assert!(GaConfigBuilder::new().pop_size(0).build().validate().is_err());
		assert!(GaConfigBuilder::new().pop_size(4).elite_size(5).build().validate().is_err());
		assert!(GaConfigBuilder::new().mutation_probability(1.5).build().validate().is_err());
		assert!(GaConfigBuilder::new().nb_measurements(0).build().validate().is_err());
		let bad_refine = RefinementConfig { enabled: true, radius_fraction: 2.0, ..Default::default() };
		assert!(GaConfigBuilder::new().refinement(bad_refine).build().validate().is_err());
	}
}
