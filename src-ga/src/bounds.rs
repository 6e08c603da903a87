//! Per-field bounds of the search space
//!
//! Bounds are loaded once before any individual is built and are then shared
//! read-only (`Arc<ParameterBounds>`) by the population and every operator.
//! Each field is searched on a grid `MIN + k * STEP` that never exceeds `MAX`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Field, GaError, GaResult};

/// Upper limit on the number of steps in one field's grid
pub const MAX_GRID_STEPS: f64 = 1e9;

/// Inclusive range and step granularity of one field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
	pub min: f64,
	pub max: f64,
	pub step: f64,
}

impl FieldBounds {
	pub fn new(min: f64, max: f64, step: f64) -> Self {
		Self { min, max, step }
	}

	pub fn span(&self) -> f64 {
		self.max - self.min
	}

	/// Number of grid values inside `[min, max]`
	pub fn grid_len(&self) -> usize {
		(((self.span() / self.step) + 1e-9).floor() as usize).saturating_add(1)
	}

	/// Grid value at index `k`, saturating at the last grid value
	pub fn grid_value(&self, k: usize) -> f64 {
		let k = k.min(self.grid_len() - 1);
		(self.min + k as f64 * self.step).min(self.max)
	}

	pub fn clamp(&self, value: f64) -> f64 {
		if value.is_nan() {
			return self.min;
		}
		value.clamp(self.min, self.max)
	}

	/// Nearest grid value to `value`
	pub fn snap(&self, value: f64) -> f64 {
		let clamped = self.clamp(value);
		let k = ((clamped - self.min) / self.step).round() as usize;
		self.grid_value(k)
	}

	/// Uniform draw among the grid values
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
		let k = rng.random_range(0..self.grid_len());
		self.grid_value(k)
	}

	fn validate(&self, field: Field) -> GaResult<()> {
		let finite = self.min.is_finite() && self.max.is_finite() && self.step.is_finite();
		if !finite || self.min > self.max || self.step <= 0.0 {
			return Err(GaError::InvalidConfig(format!(
				"{} bounds must satisfy min <= max and step > 0 (got min={}, max={}, step={})",
				field, self.min, self.max, self.step
			)));
		}
		if self.span() / self.step > MAX_GRID_STEPS {
			return Err(GaError::InvalidConfig(format!(
				"{} grid is too fine: more than {} steps between {} and {}",
				field, MAX_GRID_STEPS, self.min, self.max
			)));
		}
		if field.is_integral()
			&& (self.min.fract() != 0.0 || self.max.fract() != 0.0 || self.step.fract() != 0.0)
		{
			return Err(GaError::InvalidConfig(format!(
				"{} only takes whole values, bounds must be integers",
				field
			)));
		}
		Ok(())
	}
}

/// Bounds of the five searched parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
	pub x: FieldBounds,
	pub y: FieldBounds,
	pub delay: FieldBounds,
	pub power_width: FieldBounds,
	pub intensity: FieldBounds,
}

impl Default for ParameterBounds {
	fn default() -> Self {
		Self {
			x: FieldBounds::new(0.0, 100.0, 5.0),
			y: FieldBounds::new(0.0, 100.0, 5.0),
			delay: FieldBounds::new(1.0, 100.0, 10.0),
			power_width: FieldBounds::new(1.0, 100.0, 5.0),
			intensity: FieldBounds::new(0.0, 100.0, 1.0),
		}
	}
}

impl ParameterBounds {
	/// Build and validate a bounds set
	pub fn new(
		x: FieldBounds,
		y: FieldBounds,
		delay: FieldBounds,
		power_width: FieldBounds,
		intensity: FieldBounds,
	) -> GaResult<Self> {
		let bounds = Self { x, y, delay, power_width, intensity };
		bounds.validate()?;
		Ok(bounds)
	}

	pub fn validate(&self) -> GaResult<()> {
		for field in Field::ALL {
			self.get(field).validate(field)?;
		}
		Ok(())
	}

	pub fn get(&self, field: Field) -> &FieldBounds {
		match field {
			Field::X => &self.x,
			Field::Y => &self.y,
			Field::Delay => &self.delay,
			Field::PowerWidth => &self.power_width,
			Field::Intensity => &self.intensity,
		}
	}

	/// Clamp `value` into the bounds of `field`
	///
	/// Integral fields are truncated toward zero before clamping.
	pub fn clip(&self, field: Field, value: f64) -> f64 {
		let value = if field.is_integral() { value.trunc() } else { value };
		self.get(field).clamp(value)
	}
}
