//! Repeated noisy queries at one point
//!
//! The bench is not deterministic: the same settings may fault on one shot and
//! pass on the next. The adapter therefore returns every raw outcome and lets
//! the fitness evaluator decide how to aggregate them.

use crate::parallel_eval::measure_repeated;
use crate::{BenchCoordinates, GaError, GaResult, Measurement, MeasurementOracle, ParallelConfig, ParameterSet};

#[derive(Debug, Clone)]
pub struct MeasurementAdapter {
	nb_measurements: usize,
	parallel: ParallelConfig,
}

impl MeasurementAdapter {
	pub fn new(nb_measurements: usize, parallel: ParallelConfig) -> GaResult<Self> {
		if nb_measurements == 0 {
			return Err(GaError::InvalidConfig("nb_measurements must be at least 1".into()));
		}
		Ok(Self { nb_measurements, parallel })
	}

	pub fn nb_measurements(&self) -> usize {
		self.nb_measurements
	}

	/// All `nb_measurements` raw outcomes for `ps`
	pub fn collect<O: MeasurementOracle + ?Sized>(
		&self,
		oracle: &O,
		ps: &ParameterSet,
	) -> GaResult<Vec<Measurement>> {
		let coords = BenchCoordinates::from(ps);
		let samples = measure_repeated(oracle, &coords, self.nb_measurements, &self.parallel)?;
		log::trace!("{} shots at {:?}: {:?}", samples.len(), coords, samples);
		Ok(samples)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{FaultClass, ParameterBounds};
	use std::sync::Arc;

	#[test]
	fn test_zero_measurements_rejected() {
		assert!(MeasurementAdapter::new(0, ParallelConfig::default()).is_err());
	}

	#[test]
	fn test_collect_sends_the_point_coordinates() {
		let bounds = Arc::new(ParameterBounds::default());
		let ps = ParameterSet::new(&bounds, [10.0, 20.0, 31.0, 6.0, 7.0]);
		let oracle = |c: &BenchCoordinates| -> GaResult<Measurement> {
			assert_eq!((c.x, c.y, c.delay, c.power_width, c.intensity), (10.0, 20.0, 31.0, 6.0, 7.0));
			Ok(Measurement::with_status(FaultClass::Mute, "no answer"))
		};
		let adapter = MeasurementAdapter::new(4, ParallelConfig::default()).unwrap();
		let samples = adapter.collect(&oracle, &ps).unwrap();
		assert_eq!(samples.len(), 4);
		assert!(samples.iter().all(|m| m.outcome == FaultClass::Mute && m.status == "no answer"));
	}

	#[test]
	fn test_bounds_rejection_is_not_retried() {
		let bounds = Arc::new(ParameterBounds::default());
		let ps = ParameterSet::new(&bounds, [90.0, 20.0, 31.0, 6.0, 7.0]);
		let oracle = |c: &BenchCoordinates| -> GaResult<Measurement> {
			if c.x > 50.0 {
				return Err(GaError::OutOfBounds { field: "x", value: c.x, min: 0.0, max: 50.0 });
			}
			Ok(Measurement::new(FaultClass::Pass))
		};
		let adapter = MeasurementAdapter::new(3, ParallelConfig::default()).unwrap();
		assert!(matches!(adapter.collect(&oracle, &ps), Err(GaError::OutOfBounds { .. })));
	}
}
