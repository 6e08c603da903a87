//! Error type shared by every stage of the search

use crate::Phase;

/// Errors raised by the genetic search core
///
/// None of these are retried inside the core: they either denote a
/// configuration problem, a broken invariant or a bench rejection.
#[derive(Debug, thiserror::Error)]
pub enum GaError {
	#[error("invalid field name: {0} (expected one of x, y, delay, power_width, intensity)")]
	InvalidField(String),

	#[error("{field} = {value} is outside the physical envelope [{min}, {max}]")]
	OutOfBounds { field: &'static str, value: f64, min: f64, max: f64 },

	#[error("bench failure: {0}")]
	Bench(String),

	#[error("cannot compute fitness from an empty list of measurements")]
	EmptyMeasurements,

	#[error("level vector mismatch: {0}")]
	LevelMismatch(String),

	#[error("invalid normalized vector: {0}")]
	InvalidNormalized(String),

	#[error("operands were built on different parameter bounds")]
	IncompatibleOperands,

	#[error("individual {0} has no fitness, selection requires a fully scored population")]
	Unevaluated(usize),

	#[error("population size drifted: expected {expected}, got {actual}")]
	PopulationDrift { expected: usize, actual: usize },

	#[error("invalid transition from {from:?} to {to:?}")]
	InvalidTransition { from: Phase, to: Phase },

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Result alias used across the crate
pub type GaResult<T> = Result<T, GaError>;
