use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GaError;

/// Number of searched parameters
pub const PARAMETER_COUNT: usize = 5;

/// One dimension of the attack parameter space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
	/// Beam position on the x axis
	X,
	/// Beam position on the y axis
	Y,
	/// Trigger delay
	Delay,
	/// Laser pulse width
	PowerWidth,
	/// Laser intensity
	Intensity,
}

impl Field {
	/// All fields in storage order
	pub const ALL: [Field; PARAMETER_COUNT] =
		[Field::X, Field::Y, Field::Delay, Field::PowerWidth, Field::Intensity];

	pub fn name(self) -> &'static str {
		match self {
			Field::X => "x",
			Field::Y => "y",
			Field::Delay => "delay",
			Field::PowerWidth => "power_width",
			Field::Intensity => "intensity",
		}
	}

	pub fn index(self) -> usize {
		match self {
			Field::X => 0,
			Field::Y => 1,
			Field::Delay => 2,
			Field::PowerWidth => 3,
			Field::Intensity => 4,
		}
	}

	/// Pulse width and intensity only take whole values on the bench
	pub fn is_integral(self) -> bool {
		matches!(self, Field::PowerWidth | Field::Intensity)
	}
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Field {
	type Err = GaError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"x" => Ok(Field::X),
			"y" => Ok(Field::Y),
			"delay" | "d" => Ok(Field::Delay),
			"power_width" | "pw" => Ok(Field::PowerWidth),
			"intensity" | "i" => Ok(Field::Intensity),
			_ => Err(GaError::InvalidField(s.to_string())),
		}
	}
}
