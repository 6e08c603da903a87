use crate::{FitnessEvaluator, GaResult, MeasurementAdapter, MeasurementOracle, ParameterSet};

/// Oracle + adapter + evaluator, the full two-stage evaluation of one point
pub struct Scorer<'a, O: MeasurementOracle + ?Sized> {
	pub oracle: &'a O,
	pub adapter: &'a MeasurementAdapter,
	pub evaluator: &'a dyn FitnessEvaluator,
}

impl<'a, O: MeasurementOracle + ?Sized> Scorer<'a, O> {
	pub fn new(
		oracle: &'a O,
		adapter: &'a MeasurementAdapter,
		evaluator: &'a dyn FitnessEvaluator,
	) -> Self {
		Self { oracle, adapter, evaluator }
	}

	/// Score `ps` unless it already carries a fitness
	///
	/// Returns the number of bench shots spent (0 when skipped).
	pub fn score(&self, ps: &mut ParameterSet) -> GaResult<usize> {
		if ps.is_evaluated() {
			return Ok(0);
		}
		let samples = self.adapter.collect(self.oracle, ps)?;
		let evaluation = self.evaluator.aggregate_measurements(&samples)?;
		ps.set_evaluation(evaluation.fitness, evaluation.fault_class);
		log::debug!("scored {}", ps);
		Ok(samples.len())
	}
}
