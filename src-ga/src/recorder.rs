use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::{CallbackAction, GaIntermediate};

/// Records search progress via the per-generation callback
#[derive(Debug)]
pub struct GenerationRecorder {
	/// Run name (used for CSV filename)
	run_name: String,
	records: Arc<Mutex<Vec<GenerationRecord>>>,
}

/// One scored generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRecord {
	pub generation: usize,
	pub best_fitness: Option<f64>,
	pub mean_fitness: f64,
	pub diversity: f64,
	pub fault_count: usize,
	/// Best fitness strictly improved during this generation
	pub is_improvement: bool,
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub delay: Option<f64>,
	pub power_width: Option<f64>,
	pub intensity: Option<f64>,
}

impl GenerationRecorder {
	pub fn new(run_name: impl Into<String>) -> Self {
		Self { run_name: run_name.into(), records: Arc::new(Mutex::new(Vec::new())) }
	}

	/// Callback that appends a record and never stops the run
	pub fn create_callback(&self) -> Box<dyn FnMut(&GaIntermediate) -> CallbackAction + Send> {
		let records = self.records.clone();
		Box::new(move |intermediate: &GaIntermediate| -> CallbackAction {
			let mut guard = records.lock().unwrap_or_else(PoisonError::into_inner);
			let previous = guard.last().and_then(|r| r.best_fitness);
			let is_improvement = match (intermediate.best_fitness, previous) {
				(Some(now), Some(before)) => now > before,
				(Some(_), None) => true,
				(None, _) => false,
			};
			let best = intermediate.best.as_ref();
			guard.push(GenerationRecord {
				generation: intermediate.generation,
				best_fitness: intermediate.best_fitness,
				mean_fitness: intermediate.mean_fitness,
				diversity: intermediate.diversity,
				fault_count: intermediate.fault_count,
				is_improvement,
				x: best.map(|b| b.x()),
				y: best.map(|b| b.y()),
				delay: best.map(|b| b.delay()),
				power_width: best.map(|b| b.power_width()),
				intensity: best.map(|b| b.intensity()),
			});
			CallbackAction::Continue
		})
	}

	/// Write every record to `<output_dir>/<run_name>.csv`
	pub fn save_to_csv(&self, output_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
		create_dir_all(output_dir)?;
		let filename = output_dir.join(format!("{}.csv", self.run_name));
		let mut writer = csv::Writer::from_path(&filename)?;
		for record in self.records.lock().unwrap_or_else(PoisonError::into_inner).iter() {
			writer.serialize(record)?;
		}
		writer.flush()?;
		Ok(filename)
	}

	pub fn get_records(&self) -> Vec<GenerationRecord> {
		self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
	}

	pub fn num_generations(&self) -> usize {
		self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{ParameterBounds, ParameterSet};

	fn snapshot(generation: usize, best_fitness: Option<f64>) -> GaIntermediate {
		let bounds = Arc::new(ParameterBounds::default());
		GaIntermediate {
			generation,
			best: best_fitness.map(|_| ParameterSet::new(&bounds, [50.0, 25.0, 11.0, 6.0, 40.0])),
			best_fitness,
			mean_fitness: 1.0,
			diversity: 0.25,
			fault_count: generation,
		}
	}

	#[test]
	fn test_records_improvements() {
		let recorder = GenerationRecorder::new("unit");
		let mut cb = recorder.create_callback();
		assert_eq!(cb(&snapshot(0, None)), CallbackAction::Continue);
		cb(&snapshot(1, Some(5.0)));
		cb(&snapshot(2, Some(5.0)));
		cb(&snapshot(3, Some(15.0)));
		let improvements: Vec<bool> = recorder.get_records().iter().map(|r| r.is_improvement).collect();
		assert_eq!(improvements, vec![false, true, false, true]);
		assert_eq!(recorder.num_generations(), 4);
	}

	#[test]
	fn test_save_to_csv() {
		let dir = tempfile::tempdir().unwrap();
		let recorder = GenerationRecorder::new("csv_run");
		let mut cb = recorder.create_callback();
		cb(&snapshot(0, Some(3.0)));
		cb(&snapshot(1, Some(8.0)));
		let path = recorder.save_to_csv(dir.path()).unwrap();
		let content = std::fs::read_to_string(&path).unwrap();
		let mut lines = content.lines();
		assert!(lines.next().unwrap().starts_with("generation,best_fitness,mean_fitness"));
		assert_eq!(lines.count(), 2);
	}
}
