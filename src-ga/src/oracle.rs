//! Interface to the external measurement function (the bench)

use serde::{Deserialize, Serialize};

use crate::{FaultClass, GaResult, ParameterSet};

/// Physical settings sent to the bench for one shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchCoordinates {
	pub x: f64,
	pub y: f64,
	pub delay: f64,
	pub power_width: f64,
	pub intensity: f64,
}

impl From<&ParameterSet> for BenchCoordinates {
	fn from(ps: &ParameterSet) -> Self {
		Self {
			x: ps.x(),
			y: ps.y(),
			delay: ps.delay(),
			power_width: ps.power_width(),
			intensity: ps.intensity(),
		}
	}
}

/// Outcome of one shot, with whatever status text the bench reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
	pub outcome: FaultClass,
	pub status: String,
}

impl Measurement {
	pub fn new(outcome: FaultClass) -> Self {
		Self { outcome, status: String::new() }
	}

	pub fn with_status(outcome: FaultClass, status: impl Into<String>) -> Self {
		Self { outcome, status: status.into() }
	}
}

/// Stochastic bench evaluation of one parameter set
///
/// Implementations must reject coordinates outside the physical envelope
/// with [`crate::GaError::OutOfBounds`] instead of clamping them.
pub trait MeasurementOracle: Sync {
	fn measure(&self, coords: &BenchCoordinates) -> GaResult<Measurement>;
}

impl<F> MeasurementOracle for F
where
	F: Fn(&BenchCoordinates) -> GaResult<Measurement> + Sync,
{
	fn measure(&self, coords: &BenchCoordinates) -> GaResult<Measurement> {
		self(coords)
	}
}
