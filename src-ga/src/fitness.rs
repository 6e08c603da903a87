//! Aggregation of repeated outcomes into a fitness value and a fault class
//!
//! The fault class is the common outcome when every shot agrees and
//! `CHANGING` otherwise. The fitness is
//!
//! `weight(fault_class) + sample_weight * mean(weight(outcome_i))`
//!
//! so reproducible FAIL/MUTE regions score highest, unstable regions are
//! penalized by the (lower) CHANGING weight but still rank above clean passes.

use serde::{Deserialize, Serialize};

use crate::{FaultClass, GaError, GaResult, Measurement};

/// Scoring policy, loaded once before the first evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
	pub pass: f64,
	pub fail: f64,
	pub mute: f64,
	pub changing: f64,
	/// Weight of the per-shot average, breaks ties between equal labels
	pub sample_weight: f64,
}

impl Default for FitnessWeights {
	fn default() -> Self {
		Self { pass: 0.0, fail: 10.0, mute: 8.0, changing: 3.0, sample_weight: 0.5 }
	}
}

impl FitnessWeights {
	pub fn weight(&self, class: FaultClass) -> f64 {
		match class {
			FaultClass::Pass => self.pass,
			FaultClass::Fail => self.fail,
			FaultClass::Mute => self.mute,
			FaultClass::Changing => self.changing,
		}
	}

	pub fn validate(&self) -> GaResult<()> {
		let all = [self.pass, self.fail, self.mute, self.changing, self.sample_weight];
		if all.iter().any(|w| !w.is_finite()) {
			return Err(GaError::InvalidConfig("fitness weights must be finite".into()));
		}
		Ok(())
	}
}

/// Result of aggregating the shots at one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
	pub fitness: f64,
	pub fault_class: FaultClass,
}

/// Second stage of the evaluation pipeline: raw outcomes -> fitness
pub trait FitnessEvaluator: Send + Sync {
	fn aggregate(&self, outcomes: &[FaultClass]) -> GaResult<Evaluation>;

	fn aggregate_measurements(&self, samples: &[Measurement]) -> GaResult<Evaluation> {
		let outcomes: Vec<FaultClass> = samples.iter().map(|m| m.outcome).collect();
		self.aggregate(&outcomes)
	}
}

/// Label of a list of outcomes: unanimous outcome, or `CHANGING`
pub fn consensus(outcomes: &[FaultClass]) -> GaResult<FaultClass> {
	let first = *outcomes.first().ok_or(GaError::EmptyMeasurements)?;
	if outcomes.iter().all(|&o| o == first) { Ok(first) } else { Ok(FaultClass::Changing) }
}

/// Fitness from configurable per-class weights
#[derive(Debug, Clone, Default)]
pub struct WeightedFitness {
	pub weights: FitnessWeights,
}

impl WeightedFitness {
	pub fn new(weights: FitnessWeights) -> Self {
		Self { weights }
	}
}

impl FitnessEvaluator for WeightedFitness {
	fn aggregate(&self, outcomes: &[FaultClass]) -> GaResult<Evaluation> {
		let fault_class = consensus(outcomes)?;
		let mean = outcomes.iter().map(|&o| self.weights.weight(o)).sum::<f64>()
			/ outcomes.len() as f64;
		let fitness = self.weights.weight(fault_class) + self.weights.sample_weight * mean;
		Ok(Evaluation { fitness, fault_class })
	}
}
