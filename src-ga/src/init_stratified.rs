//! Designed (Taguchi-like) initialization
//!
//! Each field gets a balanced column of level indices: level `l` appears
//! `pop_size / levels` times (plus one for the first remainders). Columns are
//! shuffled independently, so every field covers all of its strata while the
//! combinations stay spread over the space. With `levels == pop_size` this is
//! a Latin hypercube on the step grid.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{GaError, GaResult, Initialization, PARAMETER_COUNT, ParameterBounds, ParameterSet};

#[derive(Debug, Clone, Copy)]
pub struct StratifiedInit {
	/// Number of strata per field
	pub levels: [usize; PARAMETER_COUNT],
}

impl Default for StratifiedInit {
	fn default() -> Self {
		Self { levels: [3; PARAMETER_COUNT] }
	}
}

impl StratifiedInit {
	pub fn new(levels: [usize; PARAMETER_COUNT]) -> Self {
		Self { levels }
	}

	/// Same number of strata on every field
	pub fn uniform(levels: usize) -> Self {
		Self { levels: [levels; PARAMETER_COUNT] }
	}

	/// Level-index design, one row per individual
	pub fn design(&self, pop_size: usize, rng: &mut StdRng) -> GaResult<Vec<[usize; PARAMETER_COUNT]>> {
		if self.levels.iter().any(|&l| l == 0) {
			return Err(GaError::LevelMismatch("every field needs at least one level".into()));
		}
		let mut rows = vec![[0usize; PARAMETER_COUNT]; pop_size];
		for (col, &levels) in self.levels.iter().enumerate() {
			let mut column: Vec<usize> = (0..pop_size).map(|i| i % levels).collect();
			column.shuffle(rng);
			for (row, level) in rows.iter_mut().zip(column) {
				row[col] = level;
			}
		}
		Ok(rows)
	}
}

impl Initialization for StratifiedInit {
	fn initialize(
		&self,
		bounds: &Arc<ParameterBounds>,
		pop_size: usize,
		rng: &mut StdRng,
	) -> GaResult<Vec<ParameterSet>> {
		self.design(pop_size, rng)?
			.iter()
			.map(|row| ParameterSet::from_levels(bounds, row, &self.levels))
			.collect()
	}
}
