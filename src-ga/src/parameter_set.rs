//! A point of the 5-dimensional attack parameter space
//!
//! Every value is kept inside its bounds by clipping. Changing a value drops
//! the fitness and fault class, unless the caller explicitly opts out.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{FaultClass, Field, GaError, GaResult, PARAMETER_COUNT, ParameterBounds};

/// How an individual came into the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
	Initialized,
	Crossover,
	Mutation,
	Elite,
	Refinement,
}

impl fmt::Display for Origin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let tag = match self {
			Origin::Initialized => "i",
			Origin::Crossover => "c",
			Origin::Mutation => "m",
			Origin::Elite => "e",
			Origin::Refinement => "r",
		};
		f.write_str(tag)
	}
}

/// Values closer than this share one key for equality and hashing
const QUANTUM: f64 = 1e-6;

fn quantized(v: f64) -> i64 {
	// `as` saturates on overflow and maps NaN to 0
	(v / QUANTUM).round() as i64
}

#[derive(Clone, Serialize)]
pub struct ParameterSet {
	#[serde(skip)]
	bounds: Arc<ParameterBounds>,
	x: f64,
	y: f64,
	delay: f64,
	power_width: f64,
	intensity: f64,
	fitness: Option<f64>,
	fault_class: Option<FaultClass>,
	origin: Origin,
}

impl ParameterSet {
	/// Build from raw values, clipping each into its bounds
	pub fn new(bounds: &Arc<ParameterBounds>, values: [f64; PARAMETER_COUNT]) -> Self {
		let mut ps = Self {
			bounds: bounds.clone(),
			x: 0.0,
			y: 0.0,
			delay: 0.0,
			power_width: 0.0,
			intensity: 0.0,
			fitness: None,
			fault_class: None,
			origin: Origin::Initialized,
		};
		for field in Field::ALL {
			ps.update(field, values[field.index()], true);
		}
		ps
	}

	/// Uniform draw of every field on its step grid
	pub fn random<R: Rng + ?Sized>(bounds: &Arc<ParameterBounds>, rng: &mut R) -> Self {
		let values = Field::ALL.map(|field| bounds.get(field).sample(&mut *rng));
		Self::new(bounds, values)
	}

	/// Build from per-field level indices
	///
	/// The grid of field `i` is cut into `levels[i]` contiguous parts and
	/// `indexes[i]` picks one of them. The grid value in the middle of that
	/// part is used, so the mapping is deterministic.
	pub fn from_levels(
		bounds: &Arc<ParameterBounds>,
		indexes: &[usize],
		levels: &[usize],
	) -> GaResult<Self> {
		if indexes.len() != levels.len() {
			return Err(GaError::LevelMismatch(format!(
				"{} indexes for {} level counts",
				indexes.len(),
				levels.len()
			)));
		}
		if indexes.len() != PARAMETER_COUNT {
			return Err(GaError::LevelMismatch(format!(
				"too many or too few indexes: got {}, a parameter set has {} parameters",
				indexes.len(),
				PARAMETER_COUNT
			)));
		}
		let mut values = [0.0; PARAMETER_COUNT];
		for field in Field::ALL {
			let i = field.index();
			let (index, parts) = (indexes[i], levels[i]);
			if parts == 0 || index >= parts {
				return Err(GaError::LevelMismatch(format!(
					"index {} is not a valid level of {} for {}",
					index, parts, field
				)));
			}
			let fb = bounds.get(field);
			let len = fb.grid_len();
			let start = (index * len / parts).min(len - 1);
			let end = ((index + 1) * len / parts).clamp(start + 1, len);
			values[i] = fb.grid_value((start + end - 1) / 2);
		}
		Ok(Self::new(bounds, values))
	}

	/// Snap a normalized vector (components in `[0, 1]`) onto the search grid
	pub fn from_normalized(bounds: &Arc<ParameterBounds>, unit: &[f64]) -> GaResult<Self> {
		if unit.len() != PARAMETER_COUNT {
			return Err(GaError::InvalidNormalized(format!(
				"expected {} components, got {}",
				PARAMETER_COUNT,
				unit.len()
			)));
		}
		let mut values = [0.0; PARAMETER_COUNT];
		for field in Field::ALL {
			let u = unit[field.index()];
			if !u.is_finite() || !(0.0..=1.0).contains(&u) {
				return Err(GaError::InvalidNormalized(format!(
					"component {} for {} is not in [0, 1]",
					u, field
				)));
			}
			let fb = bounds.get(field);
			let k = (u * (fb.grid_len() - 1) as f64).round() as usize;
			values[field.index()] = fb.grid_value(k);
		}
		Ok(Self::new(bounds, values))
	}

	pub fn bounds(&self) -> &Arc<ParameterBounds> {
		&self.bounds
	}

	pub fn get(&self, field: Field) -> f64 {
		match field {
			Field::X => self.x,
			Field::Y => self.y,
			Field::Delay => self.delay,
			Field::PowerWidth => self.power_width,
			Field::Intensity => self.intensity,
		}
	}

	pub fn x(&self) -> f64 {
		self.x
	}

	pub fn y(&self) -> f64 {
		self.y
	}

	pub fn delay(&self) -> f64 {
		self.delay
	}

	pub fn power_width(&self) -> f64 {
		self.power_width
	}

	pub fn intensity(&self) -> f64 {
		self.intensity
	}

	pub fn values(&self) -> [f64; PARAMETER_COUNT] {
		[self.x, self.y, self.delay, self.power_width, self.intensity]
	}

	pub fn fitness(&self) -> Option<f64> {
		self.fitness
	}

	pub fn fault_class(&self) -> Option<FaultClass> {
		self.fault_class
	}

	pub fn origin(&self) -> Origin {
		self.origin
	}

	pub fn is_evaluated(&self) -> bool {
		self.fitness.is_some()
	}

	pub fn set_origin(&mut self, origin: Origin) {
		self.origin = origin;
	}

	pub fn with_origin(mut self, origin: Origin) -> Self {
		self.origin = origin;
		self
	}

	/// Clamp `value` into the bounds of `field`
	pub fn clip(&self, field: Field, value: f64) -> f64 {
		self.bounds.clip(field, value)
	}

	/// Assign a clipped value to `field`
	///
	/// With `reset_fitness = false` the evaluation is kept as is and may be
	/// stale afterwards; the caller takes responsibility for that.
	pub fn update(&mut self, field: Field, value: f64, reset_fitness: bool) {
		let value = self.clip(field, value);
		match field {
			Field::X => self.x = value,
			Field::Y => self.y = value,
			Field::Delay => self.delay = value,
			Field::PowerWidth => self.power_width = value,
			Field::Intensity => self.intensity = value,
		}
		if reset_fitness {
			self.reset_evaluation();
		}
	}

	/// Same as [`ParameterSet::update`] with the field given by name
	pub fn update_by_name(&mut self, name: &str, value: f64, reset_fitness: bool) -> GaResult<()> {
		let field = name.parse::<Field>()?;
		self.update(field, value, reset_fitness);
		Ok(())
	}

	pub fn set_evaluation(&mut self, fitness: f64, fault_class: FaultClass) {
		self.fitness = Some(fitness);
		self.fault_class = Some(fault_class);
	}

	pub fn reset_evaluation(&mut self) {
		self.fitness = None;
		self.fault_class = None;
	}

	fn combine(&self, other: &Self, op: impl Fn(f64, f64) -> f64) -> GaResult<Self> {
		if !Arc::ptr_eq(&self.bounds, &other.bounds) && *self.bounds != *other.bounds {
			return Err(GaError::IncompatibleOperands);
		}
		let values = Field::ALL.map(|field| op(self.get(field), other.get(field)));
		Ok(Self::new(&self.bounds, values).with_origin(Origin::Crossover))
	}

	/// Field-wise `self - other`, clipped
	pub fn difference_of(&self, other: &Self) -> GaResult<Self> {
		self.combine(other, |a, b| a - b)
	}

	/// Field-wise `self * other`, clipped
	pub fn elementwise_product(&self, other: &Self) -> GaResult<Self> {
		self.combine(other, |a, b| a * b)
	}

	/// Every field multiplied by `factor`, clipped
	pub fn scaled_by(&self, factor: f64) -> Self {
		let values = Field::ALL.map(|field| self.get(field) * factor);
		Self::new(&self.bounds, values).with_origin(self.origin)
	}

	/// Position of every field inside its range, in `[0, 1]`
	pub fn normalized(&self) -> Array1<f64> {
		Array1::from_iter(Field::ALL.iter().map(|&field| {
			let fb = self.bounds.get(field);
			if fb.span() > 0.0 { (self.get(field) - fb.min) / fb.span() } else { 0.0 }
		}))
	}

	fn key(&self) -> [i64; PARAMETER_COUNT] {
		self.values().map(quantized)
	}

	/// Euclidean distance between beam positions
	pub fn distance_xy(&self, other: &Self) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

impl PartialEq for ParameterSet {
	fn eq(&self, other: &Self) -> bool {
		self.key() == other.key()
	}
}

impl Eq for ParameterSet {}

impl Hash for ParameterSet {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key().hash(state);
	}
}

impl fmt::Display for ParameterSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} (x={}, y={}, delay={}, power width={}, intensity={}, fitness=",
			self.origin, self.x, self.y, self.delay, self.power_width, self.intensity
		)?;
		match self.fitness {
			Some(v) => write!(f, "{:.3}", v)?,
			None => f.write_str("None")?,
		}
		match self.fault_class {
			Some(c) => write!(f, ", fault class={})", c),
			None => f.write_str(", fault class=None)"),
		}
	}
}

impl fmt::Debug for ParameterSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ParameterSet")
			.field("x", &self.x)
			.field("y", &self.y)
			.field("delay", &self.delay)
			.field("power_width", &self.power_width)
			.field("intensity", &self.intensity)
			.field("fitness", &self.fitness)
			.field("fault_class", &self.fault_class)
			.field("origin", &self.origin)
			.finish()
	}
}
