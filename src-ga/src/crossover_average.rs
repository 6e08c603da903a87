use rand::rngs::StdRng;

use crate::{Crossover, Field, GaResult, Origin, ParameterSet};

/// Arithmetic mean of the parents, clipped into bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageCrossover;

impl Crossover for AverageCrossover {
	fn crossover(
		&self,
		a: &ParameterSet,
		b: &ParameterSet,
		_rng: &mut StdRng,
	) -> GaResult<Vec<ParameterSet>> {
		let mut child = a.clone().with_origin(Origin::Crossover);
		for field in Field::ALL {
			child.update(field, (a.get(field) + b.get(field)) / 2.0, true);
		}
		Ok(vec![child])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{FaultClass, FieldBounds, ParameterBounds};
	use rand::SeedableRng;
	use std::sync::Arc;

	#[test]
	fn test_average_of_two_parents() {
		let bounds = Arc::new(ParameterBounds {
			x: FieldBounds::new(0.0, 2000.0, 5.0),
			y: FieldBounds::new(0.0, 2000.0, 5.0),
			..ParameterBounds::default()
		});
		let mut a = ParameterSet::new(&bounds, [0.0, 0.0, 1.0, 1.0, 0.0]);
		let mut b = ParameterSet::new(&bounds, [2000.0, 100.0, 91.0, 6.0, 9.0]);
		a.set_evaluation(15.0, FaultClass::Fail);
		b.set_evaluation(0.0, FaultClass::Pass);
		let mut rng = StdRng::seed_from_u64(0);
		let children = AverageCrossover.crossover(&a, &b, &mut rng).unwrap();
		assert_eq!(children.len(), 1);
		let child = &children[0];
		assert_eq!(child.x(), 1000.0);
		assert_eq!(child.y(), 50.0);
		assert_eq!(child.delay(), 46.0);
		// integral fields are truncated
		assert_eq!(child.power_width(), 3.0);
		assert_eq!(child.intensity(), 4.0);
		assert_eq!(child.fitness(), None);
		assert_eq!(child.fault_class(), None);
		assert_eq!(child.origin(), Origin::Crossover);
	}
}
