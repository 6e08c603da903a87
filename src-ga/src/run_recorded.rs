//! Recording wrapper for the genetic search

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::recorder::GenerationRecorder;
use crate::{CallbackAction, GaConfig, GaIntermediate, GaReport, MeasurementOracle, ParameterBounds, genetic_algorithm};

/// Run the search and save per-generation statistics to CSV
///
/// A callback already present in `config` still runs after the recorder and
/// can stop the search.
pub fn run_recorded_search<O>(
	run_name: &str,
	oracle: &O,
	bounds: Arc<ParameterBounds>,
	mut config: GaConfig,
	output_dir: &Path,
) -> Result<(GaReport, PathBuf), Box<dyn std::error::Error>>
where
	O: MeasurementOracle + ?Sized,
{
	let recorder = GenerationRecorder::new(run_name);
	let mut record = recorder.create_callback();
	let mut user = config.callback.take();
	config.callback = Some(Box::new(move |intermediate: &GaIntermediate| {
		record(intermediate);
		match user.as_mut() {
			Some(cb) => cb(intermediate),
			None => CallbackAction::Continue,
		}
	}));

	let report = genetic_algorithm(oracle, bounds, config)?;
	let csv_path = recorder.save_to_csv(output_dir)?;
	log::info!("recorded {} generations to {}", recorder.num_generations(), csv_path.display());
	Ok((report, csv_path))
}
