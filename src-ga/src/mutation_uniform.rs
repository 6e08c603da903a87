use rand::Rng;
use rand::rngs::StdRng;

use crate::{Field, Mutation, Origin, ParameterSet};

/// Replace each field, with the given probability, by a fresh grid value
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformMutation;

impl Mutation for UniformMutation {
	fn mutate(&self, ps: &ParameterSet, probability: f64, rng: &mut StdRng) -> ParameterSet {
		let mut out = ps.clone();
		let mut mutated = false;
		for field in Field::ALL {
			if rng.random::<f64>() < probability {
				let value = ps.bounds().get(field).sample(rng);
				out.update(field, value, true);
				mutated = true;
			}
		}
		if mutated {
			out.set_origin(Origin::Mutation);
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{FaultClass, FieldBounds, ParameterBounds};
	use rand::SeedableRng;
	use std::sync::Arc;

	fn wide_bounds() -> Arc<ParameterBounds> {
		Arc::new(ParameterBounds {
			x: FieldBounds::new(0.0, 2000.0, 1.0),
			y: FieldBounds::new(0.0, 2000.0, 1.0),
			delay: FieldBounds::new(0.0, 100000.0, 1.0),
			power_width: FieldBounds::new(1.0, 100000.0, 1.0),
			intensity: FieldBounds::new(0.0, 100000.0, 1.0),
		})
	}

	#[test]
	fn test_probability_zero_leaves_individual_untouched() {
		let bounds = wide_bounds();
		let mut rng = StdRng::seed_from_u64(1);
		let mut ps = ParameterSet::random(&bounds, &mut rng).with_origin(Origin::Crossover);
		ps.set_evaluation(2.0, FaultClass::Mute);
		let out = UniformMutation.mutate(&ps, 0.0, &mut rng);
		assert_eq!(out, ps);
		assert_eq!(out.fitness(), Some(2.0));
		assert_eq!(out.origin(), Origin::Crossover);
	}

	#[test]
	fn test_probability_one_redraws_every_field() {
		let bounds = wide_bounds();
		let mut rng = StdRng::seed_from_u64(2);
		let ps = ParameterSet::new(&bounds, [1000.5, 1000.5, 0.5, 0.5, 0.5]);
		let out = UniformMutation.mutate(&ps, 1.0, &mut rng);
		for field in Field::ALL {
			let fb = bounds.get(field);
			let v = out.get(field);
			assert!(fb.min <= v && v <= fb.max);
			// every grid value is whole, the parent's x/y were not
			assert_eq!(v.fract(), 0.0);
		}
		assert!(!out.is_evaluated());
		assert_eq!(out.origin(), Origin::Mutation);
	}
}
