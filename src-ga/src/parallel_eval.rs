use rayon::prelude::*;

use crate::{BenchCoordinates, GaResult, Measurement, MeasurementOracle};

/// Parallel dispatch of the repeated shots at one point
#[derive(Debug, Clone)]
pub struct ParallelConfig {
	/// Dispatch repeated shots concurrently
	pub enabled: bool,
	/// Number of rayon threads (None = rayon default)
	pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
	fn default() -> Self {
		Self { enabled: false, num_threads: None }
	}
}

/// Query the oracle `repeats` times at `coords`
///
/// Every shot is collected before returning; the first error wins.
pub fn measure_repeated<O: MeasurementOracle + ?Sized>(
	oracle: &O,
	coords: &BenchCoordinates,
	repeats: usize,
	parallel: &ParallelConfig,
) -> GaResult<Vec<Measurement>> {
	if parallel.enabled && repeats > 1 {
		(0..repeats).into_par_iter().map(|_| oracle.measure(coords)).collect()
	} else {
		(0..repeats).map(|_| oracle.measure(coords)).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{FaultClass, GaError};
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn coords() -> BenchCoordinates {
		BenchCoordinates { x: 1.0, y: 2.0, delay: 3.0, power_width: 4.0, intensity: 5.0 }
	}

	#[test]
	fn test_sequential_and_parallel_collect_everything() {
		let calls = AtomicUsize::new(0);
		let oracle = |_: &BenchCoordinates| -> GaResult<Measurement> {
			calls.fetch_add(1, Ordering::SeqCst);
			Ok(Measurement::new(FaultClass::Fail))
		};
		let seq = measure_repeated(&oracle, &coords(), 5, &ParallelConfig::default()).unwrap();
		assert_eq!(seq.len(), 5);
		let par_cfg = ParallelConfig { enabled: true, num_threads: None };
		let par = measure_repeated(&oracle, &coords(), 7, &par_cfg).unwrap();
		assert_eq!(par.len(), 7);
		assert_eq!(calls.load(Ordering::SeqCst), 12);
	}

	#[test]
	fn test_error_is_propagated() {
		let oracle = |c: &BenchCoordinates| -> GaResult<Measurement> {
			Err(GaError::OutOfBounds { field: "x", value: c.x, min: 10.0, max: 20.0 })
		};
		let par_cfg = ParallelConfig { enabled: true, num_threads: None };
		let res = measure_repeated(&oracle, &coords(), 3, &par_cfg);
		assert!(matches!(res, Err(GaError::OutOfBounds { .. })));
	}
}
