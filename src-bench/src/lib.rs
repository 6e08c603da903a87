//! Simulated bench for laser fault-injection campaigns
//!
//! The dummy cartography reproduces the rough shape of a real scan of a chip
//! surface: a noisy strip near the left edge, a diagonal band where the device
//! stops answering and an anti-diagonal band where it goes mute. Delay, pulse
//! width and intensity are accepted but ignored.
//!
//! # Example
//!
//! ```rust
//! use lfi_bench::DummyCartography;
//! use lfi_ga::{BenchCoordinates, FaultClass, MeasurementOracle};
//!
//! let bench = DummyCartography::with_seed(1);
//! let coords = BenchCoordinates { x: 800.0, y: 850.0, delay: 1.0, power_width: 1.0, intensity: 0.0 };
//! assert_eq!(bench.measure(&coords).unwrap().outcome, FaultClass::Fail);
//! ```

use std::sync::{Mutex, PoisonError};

use lfi_ga::{BenchCoordinates, FaultClass, GaError, GaResult, Measurement, MeasurementOracle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Side of the square scanned by the stage, in stage units
pub const STAGE_SIZE: f64 = 2000.0;

/// Scan of a square area of side `x_max`
#[derive(Debug)]
pub struct DummyCartography {
	x_max: f64,
	noise: Mutex<StdRng>,
}

impl Default for DummyCartography {
	fn default() -> Self {
		Self::new(STAGE_SIZE, None)
	}
}

impl DummyCartography {
	/// Unseeded noise when `seed` is `None`
	pub fn new(x_max: f64, seed: Option<u64>) -> Self {
		let rng = match seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => {
				let mut thread_rng = rand::rng();
				StdRng::from_rng(&mut thread_rng)
			}
		};
		Self { x_max, noise: Mutex::new(rng) }
	}

	pub fn with_seed(seed: u64) -> Self {
		Self::new(STAGE_SIZE, Some(seed))
	}

	pub fn x_max(&self) -> f64 {
		self.x_max
	}

	fn check_envelope(&self, field: &'static str, value: f64) -> GaResult<()> {
		if !(0.0..=self.x_max).contains(&value) {
			log::warn!("bench rejected {} = {}", field, value);
			return Err(GaError::OutOfBounds { field, value, min: 0.0, max: self.x_max });
		}
		Ok(())
	}

	/// Noise-free part of the map, `None` inside the noisy strip
	pub fn region(&self, x: f64, y: f64) -> Option<FaultClass> {
		let band = 0.1 * self.x_max;
		if x < 0.2 * self.x_max {
			return None;
		}
		if x - band < y && y < x + band {
			return Some(FaultClass::Fail);
		}
		let mirror = self.x_max - x;
		if x > 0.5 * self.x_max && mirror - band < y && y < mirror + band {
			return Some(FaultClass::Mute);
		}
		Some(FaultClass::Pass)
	}
}

impl MeasurementOracle for DummyCartography {
	fn measure(&self, coords: &BenchCoordinates) -> GaResult<Measurement> {
		self.check_envelope("x", coords.x)?;
		self.check_envelope("y", coords.y)?;
		let outcome = match self.region(coords.x, coords.y) {
			Some(class) => class,
			None => {
				let mute = self.noise.lock().unwrap_or_else(PoisonError::into_inner).random_bool(0.5);
				if mute { FaultClass::Mute } else { FaultClass::Pass }
			}
		};
		Ok(Measurement::new(outcome))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at(x: f64, y: f64) -> BenchCoordinates {
		BenchCoordinates { x, y, delay: 1.0, power_width: 1.0, intensity: 0.0 }
	}

	#[test]
	fn test_regions() {
		let bench = DummyCartography::with_seed(0);
		assert_eq!(bench.region(1000.0, 1100.0), Some(FaultClass::Fail));
		assert_eq!(bench.region(1000.0, 1200.0), Some(FaultClass::Pass));
		assert_eq!(bench.region(1500.0, 500.0), Some(FaultClass::Mute));
		assert_eq!(bench.region(800.0, 1200.0), Some(FaultClass::Pass));
		assert_eq!(bench.region(100.0, 100.0), None);
	}

	#[test]
	fn test_diagonal_wins_over_mirror() {
		// the two bands cross at x = y = 1000
		let bench = DummyCartography::with_seed(0);
		assert_eq!(bench.measure(&at(1050.0, 1000.0)).unwrap().outcome, FaultClass::Fail);
	}

	#[test]
	fn test_noisy_strip_is_pass_or_mute() {
		let bench = DummyCartography::with_seed(99);
		let mut seen = Vec::new();
		for _ in 0..64 {
			let outcome = bench.measure(&at(50.0, 1500.0)).unwrap().outcome;
			assert!(matches!(outcome, FaultClass::Pass | FaultClass::Mute));
			seen.push(outcome);
		}
		assert!(seen.contains(&FaultClass::Pass));
		assert!(seen.contains(&FaultClass::Mute));
	}

	#[test]
	fn test_envelope_is_enforced() {
		let bench = DummyCartography::default();
		assert!(matches!(
			bench.measure(&at(2000.5, 10.0)),
			Err(GaError::OutOfBounds { field: "x", .. })
		));
		assert!(matches!(bench.measure(&at(10.0, -1.0)), Err(GaError::OutOfBounds { field: "y", .. })));
		assert!(bench.measure(&at(2000.0, 0.0)).is_ok());
	}
}
