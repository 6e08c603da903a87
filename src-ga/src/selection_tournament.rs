use rand::Rng;
use rand::rngs::StdRng;

use crate::{GaError, GaResult, ParameterSet, Selection};

/// k-tournament: best of `k` uniform draws, repeated `count` times
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelection {
	pub k: usize,
}

impl Default for TournamentSelection {
	fn default() -> Self {
		Self { k: 3 }
	}
}

impl TournamentSelection {
	pub fn new(k: usize) -> Self {
		Self { k }
	}
}

impl Selection for TournamentSelection {
	fn select(
		&self,
		population: &[ParameterSet],
		count: usize,
		rng: &mut StdRng,
	) -> GaResult<Vec<ParameterSet>> {
		if count == 0 {
			return Ok(Vec::new());
		}
		if self.k == 0 {
			return Err(GaError::InvalidConfig("tournament size must be at least 1".into()));
		}
		if population.is_empty() {
			return Err(GaError::InvalidConfig("cannot select from an empty population".into()));
		}
		// unscored individuals must never win a tournament
		let mut fitness = Vec::with_capacity(population.len());
		for (i, ps) in population.iter().enumerate() {
			fitness.push(ps.fitness().ok_or(GaError::Unevaluated(i))?);
		}

		let mut picks = Vec::with_capacity(count);
		for _ in 0..count {
			let mut winner = rng.random_range(0..population.len());
			for _ in 1..self.k {
				let challenger = rng.random_range(0..population.len());
				if fitness[challenger] > fitness[winner] {
					winner = challenger;
				}
			}
			picks.push(population[winner].clone());
		}
		Ok(picks)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{FaultClass, ParameterBounds};
	use rand::SeedableRng;
	use std::sync::Arc;

	fn scored_population(n: usize) -> Vec<ParameterSet> {
		let bounds = Arc::new(ParameterBounds::default());
		(0..n)
			.map(|i| {
				let mut ps = ParameterSet::new(&bounds, [i as f64, 0.0, 1.0, 1.0, 0.0]);
				ps.set_evaluation(i as f64, FaultClass::Pass);
				ps
			})
			.collect()
	}

	#[test]
	fn test_returns_requested_count() {
		let pop = scored_population(10);
		let mut rng = StdRng::seed_from_u64(3);
		let picks = TournamentSelection::new(3).select(&pop, 8, &mut rng).unwrap();
		assert_eq!(picks.len(), 8);
		assert!(TournamentSelection::new(3).select(&pop, 0, &mut rng).unwrap().is_empty());
	}

	#[test]
	fn test_large_tournament_prefers_best() {
		let pop = scored_population(5);
		let mut rng = StdRng::seed_from_u64(11);
		let picks = TournamentSelection::new(64).select(&pop, 20, &mut rng).unwrap();
		assert!(picks.iter().all(|p| p.fitness() == Some(4.0)));
	}

	#[test]
	fn test_unscored_population_rejected() {
		let mut pop = scored_population(4);
		pop[2].reset_evaluation();
		let mut rng = StdRng::seed_from_u64(5);
		let res = TournamentSelection::default().select(&pop, 3, &mut rng);
		assert!(matches!(res, Err(GaError::Unevaluated(2))));
	}

	#[test]
	fn test_invalid_tournament() {
		let pop = scored_population(4);
		let mut rng = StdRng::seed_from_u64(5);
		assert!(TournamentSelection::new(0).select(&pop, 3, &mut rng).is_err());
		assert!(TournamentSelection::new(2).select(&[], 3, &mut rng).is_err());
	}
}
