use rand::Rng;
use rand::rngs::StdRng;

use crate::{Crossover, Field, GaResult, Origin, ParameterSet};

/// Per-field coin flip; the second child takes the other parent's value
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCrossover;

impl Crossover for UniformCrossover {
	fn crossover(
		&self,
		a: &ParameterSet,
		b: &ParameterSet,
		rng: &mut StdRng,
	) -> GaResult<Vec<ParameterSet>> {
		let mut child1 = a.clone().with_origin(Origin::Crossover);
		let mut child2 = b.clone().with_origin(Origin::Crossover);
		for field in Field::ALL {
			if rng.random_bool(0.5) {
				child1.update(field, b.get(field), false);
				child2.update(field, a.get(field), false);
			}
		}
		child1.reset_evaluation();
		child2.reset_evaluation();
		Ok(vec![child1, child2])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{FaultClass, ParameterBounds};
	use rand::SeedableRng;
	use std::sync::Arc;

	#[test]
	fn test_children_mix_parent_values() {
		let bounds = Arc::new(ParameterBounds::default());
		let mut a = ParameterSet::new(&bounds, [0.0, 0.0, 1.0, 1.0, 0.0]);
		let mut b = ParameterSet::new(&bounds, [100.0, 100.0, 91.0, 96.0, 100.0]);
		a.set_evaluation(1.0, FaultClass::Fail);
		b.set_evaluation(2.0, FaultClass::Mute);
		let mut rng = StdRng::seed_from_u64(9);
		for _ in 0..20 {
			let children = UniformCrossover.crossover(&a, &b, &mut rng).unwrap();
			assert_eq!(children.len(), 2);
			for field in Field::ALL {
				let (v1, v2) = (children[0].get(field), children[1].get(field));
				assert!(v1 == a.get(field) || v1 == b.get(field));
				// complementary children
				assert_eq!(v1 + v2, a.get(field) + b.get(field));
			}
			for child in &children {
				assert!(!child.is_evaluated());
				assert_eq!(child.origin(), Origin::Crossover);
			}
		}
	}
}
