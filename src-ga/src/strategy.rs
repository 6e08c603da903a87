//! Pluggable strategies of the search
//!
//! Each stage of the loop is a trait with a single method so the engine can
//! be configured with any implementation at construction time.

use std::sync::Arc;

use rand::rngs::StdRng;

use crate::{GaResult, ParameterBounds, ParameterSet};

/// Picks parents from a fully scored population
pub trait Selection: Send + Sync {
	/// Return `count` picks, with replacement
	fn select(
		&self,
		population: &[ParameterSet],
		count: usize,
		rng: &mut StdRng,
	) -> GaResult<Vec<ParameterSet>>;
}

/// Combines two parents into one or two unscored offspring
pub trait Crossover: Send + Sync {
	fn crossover(
		&self,
		a: &ParameterSet,
		b: &ParameterSet,
		rng: &mut StdRng,
	) -> GaResult<Vec<ParameterSet>>;
}

/// Perturbs an offspring before it is scored
pub trait Mutation: Send + Sync {
	fn mutate(&self, ps: &ParameterSet, probability: f64, rng: &mut StdRng) -> ParameterSet;
}

/// Builds the first generation
pub trait Initialization: Send + Sync {
	fn initialize(
		&self,
		bounds: &Arc<ParameterBounds>,
		pop_size: usize,
		rng: &mut StdRng,
	) -> GaResult<Vec<ParameterSet>>;
}

/// Termination predicate, must be pure
pub trait StopCondition: Send + Sync {
	fn should_stop(
		&self,
		generation: usize,
		population: &[ParameterSet],
		best_fitness: Option<f64>,
	) -> bool;
}

/// Visiting order of the fault points during refinement
pub trait PointOrdering: Send + Sync {
	/// Must return every input point exactly once
	fn order(&self, points: &[ParameterSet]) -> Vec<ParameterSet>;
}
