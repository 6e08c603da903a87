use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Observed behaviour of the device after one laser shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FaultClass {
	/// Device behaved normally
	Pass,
	/// Device returned a faulty result
	Fail,
	/// Device did not answer
	Mute,
	/// Repeated shots at the same point disagreed
	Changing,
}

impl FaultClass {
	pub const ALL: [FaultClass; 4] =
		[FaultClass::Pass, FaultClass::Fail, FaultClass::Mute, FaultClass::Changing];

	/// Anything other than a clean pass is worth exploiting
	pub fn is_fault(self) -> bool {
		self != FaultClass::Pass
	}

	/// Numeric code used by bench drivers
	pub fn code(self) -> u8 {
		match self {
			FaultClass::Pass => 0,
			FaultClass::Fail => 1,
			FaultClass::Mute => 2,
			FaultClass::Changing => 3,
		}
	}

	pub fn from_code(code: u8) -> Option<Self> {
		FaultClass::ALL.into_iter().find(|c| c.code() == code)
	}
}

impl fmt::Display for FaultClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			FaultClass::Pass => "PASS",
			FaultClass::Fail => "FAIL",
			FaultClass::Mute => "MUTE",
			FaultClass::Changing => "CHANGING",
		};
		f.write_str(s)
	}
}

impl FromStr for FaultClass {
	type Err = String;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_uppercase().as_str() {
			"PASS" => Ok(FaultClass::Pass),
			"FAIL" => Ok(FaultClass::Fail),
			"MUTE" => Ok(FaultClass::Mute),
			"CHANGING" => Ok(FaultClass::Changing),
			_ => Err(format!("unknown fault class: {}", s)),
		}
	}
}
