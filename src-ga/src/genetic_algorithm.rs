use std::sync::Arc;

use crate::{GaConfig, GaReport, GaResult, GeneticAlgorithm, MeasurementOracle, ParameterBounds};

/// Convenience entry point:
/// - `oracle`: bench queried at each candidate
/// - `bounds`: shared bounds of the five fields
/// - `config`: GA configuration
pub fn genetic_algorithm<O>(oracle: &O, bounds: Arc<ParameterBounds>, config: GaConfig) -> GaResult<GaReport>
where
	O: MeasurementOracle + ?Sized,
{
	let mut ga = GeneticAlgorithm::new(oracle, bounds);
	*ga.config_mut() = config;
	ga.solve()
}
