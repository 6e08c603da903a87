use crate::{ParameterSet, StopCondition};

/// Stop once `generation >= max_iterations`
#[derive(Debug, Clone, Copy)]
pub struct MaxIterations(pub usize);

impl StopCondition for MaxIterations {
	fn should_stop(&self, generation: usize, _population: &[ParameterSet], _best: Option<f64>) -> bool {
		generation >= self.0
	}
}

/// Stop once the best fitness seen reaches a target
#[derive(Debug, Clone, Copy)]
pub struct FitnessThreshold(pub f64);

impl StopCondition for FitnessThreshold {
	fn should_stop(&self, _generation: usize, _population: &[ParameterSet], best: Option<f64>) -> bool {
		best.is_some_and(|b| b >= self.0)
	}
}

/// Stop as soon as any inner condition does
pub struct AnyOf(pub Vec<Box<dyn StopCondition>>);

impl StopCondition for AnyOf {
	fn should_stop(&self, generation: usize, population: &[ParameterSet], best: Option<f64>) -> bool {
		self.0.iter().any(|c| c.should_stop(generation, population, best))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_max_iterations_is_idempotent() {
		let stop = MaxIterations(5);
		for generation in 0..5 {
			assert!(!stop.should_stop(generation, &[], Some(1e9)));
		}
		assert!(stop.should_stop(5, &[], None));
		assert!(stop.should_stop(5, &[], None));
		assert!(stop.should_stop(6, &[], None));
	}

	#[test]
	fn test_threshold_and_composition() {
		let stop = AnyOf(vec![Box::new(MaxIterations(10)), Box::new(FitnessThreshold(12.0))]);
		assert!(!stop.should_stop(1, &[], None));
		assert!(!stop.should_stop(1, &[], Some(11.9)));
		assert!(stop.should_stop(1, &[], Some(12.0)));
		assert!(stop.should_stop(10, &[], Some(0.0)));
	}
}
