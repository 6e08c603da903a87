use std::sync::Arc;

use lfi_bench::{DummyCartography, STAGE_SIZE};
use lfi_ga::{
	FaultClass, FieldBounds, GaConfigBuilder, InitKind, ParameterBounds, RefinementConfig,
	genetic_algorithm,
};

fn stage_bounds() -> Arc<ParameterBounds> {
	Arc::new(ParameterBounds {
		x: FieldBounds::new(0.0, STAGE_SIZE, 5.0),
		y: FieldBounds::new(0.0, STAGE_SIZE, 5.0),
		..ParameterBounds::default()
	})
}

#[test]
fn test_search_finds_reproducible_faults() {
	let bench = DummyCartography::with_seed(7);
	let config = GaConfigBuilder::new()
		.seed(42)
		.pop_size(36)
		.max_iterations(20)
		.nb_measurements(5)
		.init_kind(InitKind::Stratified(3))
		.build();
	let report = genetic_algorithm(&bench, stage_bounds(), config).unwrap();
	assert!(report.success);
	let best = report.best.unwrap();
	assert_eq!(best.fault_class(), Some(FaultClass::Fail));
	assert_eq!(bench.region(best.x(), best.y()), Some(FaultClass::Fail));
}

#[test]
fn test_refinement_stays_inside_the_stage() {
	let bench = DummyCartography::with_seed(11);
	let config = GaConfigBuilder::new()
		.seed(3)
		.pop_size(20)
		.max_iterations(5)
		.nb_measurements(3)
		.refinement(RefinementConfig { enabled: true, radius_fraction: 0.05, probes_per_point: 2, max_points: Some(10) })
		.build();
	let report = genetic_algorithm(&bench, stage_bounds(), config).unwrap();
	let refinement = report.refinement.expect("fault points were archived");
	assert!(!refinement.probes.is_empty());
	for probe in &refinement.probes {
		assert!((0.0..=STAGE_SIZE).contains(&probe.x()));
		assert!((0.0..=STAGE_SIZE).contains(&probe.y()));
	}
}

#[test]
fn test_wider_bounds_are_rejected_by_the_bench() {
	let bench = DummyCartography::with_seed(1);
	let bounds = Arc::new(ParameterBounds {
		x: FieldBounds::new(0.0, 4000.0, 10.0),
		y: FieldBounds::new(0.0, STAGE_SIZE, 5.0),
		..ParameterBounds::default()
	});
	let config = GaConfigBuilder::new().seed(1).pop_size(30).max_iterations(2).nb_measurements(1).build();
	assert!(genetic_algorithm(&bench, bounds, config).is_err());
}
