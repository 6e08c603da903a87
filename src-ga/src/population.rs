//! Generation bookkeeping and the run state machine
//!
//! `Uninitialized -> Initialized -> Evaluating -> Evolving -> Evaluating ... -> Terminated`
//!
//! The manager owns the current generation, the archive of every evaluated
//! fault point and the best individual seen so far. Strategies are passed in
//! at each step so the manager itself stays free of configuration.

use std::collections::HashSet;
use std::sync::Arc;

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;

use crate::scoring::Scorer;
use crate::{
	Crossover, GaError, GaIntermediate, GaResult, Initialization, MeasurementOracle, Mutation,
	Origin, PARAMETER_COUNT, ParameterBounds, ParameterSet, Phase, Selection,
};

/// Mean over fields of the std of the normalised population
pub fn diversity(population: &[ParameterSet]) -> f64 {
	if population.is_empty() {
		return 0.0;
	}
	let mut m = Array2::<f64>::zeros((population.len(), PARAMETER_COUNT));
	for (i, ps) in population.iter().enumerate() {
		m.row_mut(i).assign(&ps.normalized());
	}
	m.std_axis(Axis(0), 0.0).mean().unwrap_or(0.0)
}

pub struct PopulationManager {
	bounds: Arc<ParameterBounds>,
	pop_size: usize,
	elite_size: usize,
	mutation_probability: f64,
	phase: Phase,
	generation: usize,
	population: Vec<ParameterSet>,
	archive: Vec<ParameterSet>,
	archived: HashSet<ParameterSet>,
	best: Option<ParameterSet>,
	nfev: usize,
}

impl PopulationManager {
	pub fn new(
		bounds: Arc<ParameterBounds>,
		pop_size: usize,
		elite_size: usize,
		mutation_probability: f64,
	) -> GaResult<Self> {
		if pop_size == 0 {
			return Err(GaError::InvalidConfig("pop_size must be at least 1".into()));
		}
		if elite_size > pop_size {
			return Err(GaError::InvalidConfig(format!(
				"elite_size ({}) cannot exceed pop_size ({})",
				elite_size, pop_size
			)));
		}
		if !(0.0..=1.0).contains(&mutation_probability) {
			return Err(GaError::InvalidConfig(format!(
				"mutation probability must be in [0, 1], got {}",
				mutation_probability
			)));
		}
		Ok(Self {
			bounds,
			pop_size,
			elite_size,
			mutation_probability,
			phase: Phase::Uninitialized,
			generation: 0,
			population: Vec::new(),
			archive: Vec::new(),
			archived: HashSet::new(),
			best: None,
			nfev: 0,
		})
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn generation(&self) -> usize {
		self.generation
	}

	pub fn population(&self) -> &[ParameterSet] {
		&self.population
	}

	/// Every evaluated non-PASS point, in discovery order, without duplicates
	pub fn archive(&self) -> &[ParameterSet] {
		&self.archive
	}

	pub fn best(&self) -> Option<&ParameterSet> {
		self.best.as_ref()
	}

	pub fn best_fitness(&self) -> Option<f64> {
		self.best.as_ref().and_then(|b| b.fitness())
	}

	/// Bench shots spent so far
	pub fn nfev(&self) -> usize {
		self.nfev
	}

	pub fn into_population(self) -> Vec<ParameterSet> {
		self.population
	}

	fn transition(&mut self, allowed: &[Phase], to: Phase) -> GaResult<()> {
		if !allowed.contains(&self.phase) {
			return Err(GaError::InvalidTransition { from: self.phase, to });
		}
		Ok(())
	}

	fn check_size(&self, actual: usize) -> GaResult<()> {
		if actual != self.pop_size {
			return Err(GaError::PopulationDrift { expected: self.pop_size, actual });
		}
		Ok(())
	}

	pub fn initialize(&mut self, init: &dyn Initialization, rng: &mut StdRng) -> GaResult<()> {
		self.transition(&[Phase::Uninitialized], Phase::Initialized)?;
		let population = init.initialize(&self.bounds, self.pop_size, rng)?;
		self.check_size(population.len())?;
		self.population = population;
		self.phase = Phase::Initialized;
		log::debug!("initialized {} individuals", self.pop_size);
		Ok(())
	}

	/// Score every unscored individual, then refresh the archive and the best
	pub fn evaluate<O: MeasurementOracle + ?Sized>(&mut self, scorer: &Scorer<'_, O>) -> GaResult<()> {
		self.transition(&[Phase::Initialized, Phase::Evolving], Phase::Evaluating)?;
		self.check_size(self.population.len())?;

		for ps in self.population.iter_mut() {
			self.nfev += scorer.score(ps)?;
		}

		for ps in &self.population {
			if ps.fault_class().is_some_and(|c| c.is_fault()) && self.archived.insert(ps.clone()) {
				self.archive.push(ps.clone());
			}
			let improves = match (ps.fitness(), self.best_fitness()) {
				(Some(f), Some(best)) => f > best,
				(Some(_), None) => true,
				(None, _) => false,
			};
			if improves {
				self.best = Some(ps.clone());
			}
		}
		self.phase = Phase::Evaluating;

		let stats = self.intermediate();
		log::info!(
			"generation {}: best {:.3}, mean {:.3}, diversity {:.3}, {} fault points archived",
			stats.generation,
			stats.best_fitness.unwrap_or(f64::NAN),
			stats.mean_fitness,
			stats.diversity,
			stats.fault_count
		);
		Ok(())
	}

	/// Build the next generation: elites first, then mutated offspring
	pub fn evolve(
		&mut self,
		selection: &dyn Selection,
		crossover: &dyn Crossover,
		mutation: &dyn Mutation,
		rng: &mut StdRng,
	) -> GaResult<()> {
		self.transition(&[Phase::Evaluating], Phase::Evolving)?;

		let mut ranked: Vec<usize> = (0..self.population.len()).collect();
		let score = |i: usize| self.population[i].fitness().unwrap_or(f64::NEG_INFINITY);
		// sort_by is stable: equal fitness keeps insertion order
		ranked.sort_by(|&a, &b| score(b).total_cmp(&score(a)));

		let mut next: Vec<ParameterSet> = ranked
			.iter()
			.take(self.elite_size)
			.map(|&i| self.population[i].clone().with_origin(Origin::Elite))
			.collect();

		let needed = self.pop_size - next.len();
		if needed > 0 {
			let parents = selection.select(&self.population, needed, rng)?;
			if parents.is_empty() {
				return Err(GaError::PopulationDrift { expected: self.pop_size, actual: next.len() });
			}
			let mut offspring = Vec::with_capacity(needed);
			let mut i = 0;
			while offspring.len() < needed {
				let a = &parents[i % parents.len()];
				let b = &parents[(i + 1) % parents.len()];
				let children = crossover.crossover(a, b, rng)?;
				if children.is_empty() {
					return Err(GaError::PopulationDrift {
						expected: self.pop_size,
						actual: next.len() + offspring.len(),
					});
				}
				// one parent consumed per child, so no pair is bred twice
				i += children.len().min(2);
				for child in children.into_iter().take(needed - offspring.len()) {
					offspring.push(mutation.mutate(&child, self.mutation_probability, rng));
				}
			}
			next.extend(offspring);
		}

		self.check_size(next.len())?;
		self.population = next;
		self.generation += 1;
		self.phase = Phase::Evolving;
		Ok(())
	}

	pub fn terminate(&mut self) -> GaResult<()> {
		self.transition(&[Phase::Evaluating], Phase::Terminated)?;
		self.phase = Phase::Terminated;
		Ok(())
	}

	/// Snapshot handed to the per-generation callback
	pub fn intermediate(&self) -> GaIntermediate {
		let scored: Vec<f64> = self.population.iter().filter_map(|p| p.fitness()).collect();
		let mean_fitness =
			if scored.is_empty() { 0.0 } else { scored.iter().sum::<f64>() / scored.len() as f64 };
		GaIntermediate {
			generation: self.generation,
			best: self.best.clone(),
			best_fitness: self.best_fitness(),
			mean_fitness,
			diversity: diversity(&self.population),
			fault_count: self.archive.len(),
		}
	}
}
