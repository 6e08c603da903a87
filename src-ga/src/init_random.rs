use std::sync::Arc;

use rand::rngs::StdRng;

use crate::{GaResult, Initialization, ParameterBounds, ParameterSet};

/// Every individual drawn uniformly on the grid
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInit;

impl Initialization for RandomInit {
	fn initialize(
		&self,
		bounds: &Arc<ParameterBounds>,
		pop_size: usize,
		rng: &mut StdRng,
	) -> GaResult<Vec<ParameterSet>> {
		Ok((0..pop_size).map(|_| ParameterSet::random(bounds, &mut *rng)).collect())
	}
}
