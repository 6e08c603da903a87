//! Exploitation pass around the fault regions found by the main loop
//!
//! Fault points are first put in a greedy nearest-neighbour order over the
//! (x, y) plane so the bench stage moves little between consecutive points.
//! Each point is then probed with neighbours drawn in a tightened radius.

use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::scoring::Scorer;
use crate::{Field, GaError, GaResult, MeasurementOracle, Origin, ParameterSet, PointOrdering};

/// Greedy nearest-unvisited-neighbour tour, starting at the first point
///
/// Distance ties go to the lowest input index, so the order is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyEuclidean;

impl PointOrdering for GreedyEuclidean {
	fn order(&self, points: &[ParameterSet]) -> Vec<ParameterSet> {
		let n = points.len();
		if n == 0 {
			return Vec::new();
		}
		let mut visited = vec![false; n];
		let mut tour = Vec::with_capacity(n);
		let mut current = 0usize;
		visited[0] = true;
		tour.push(points[0].clone());
		for _ in 1..n {
			let mut next: Option<(usize, f64)> = None;
			for (j, candidate) in points.iter().enumerate() {
				if visited[j] {
					continue;
				}
				let d = points[current].distance_xy(candidate);
				if next.is_none_or(|(_, best)| d < best) {
					next = Some((j, d));
				}
			}
			if let Some((j, _)) = next {
				visited[j] = true;
				tour.push(points[j].clone());
				current = j;
			}
		}
		tour
	}
}

#[derive(Debug, Clone)]
pub struct RefinementConfig {
	pub enabled: bool,
	/// Probe radius as a fraction of each field's range
	pub radius_fraction: f64,
	pub probes_per_point: usize,
	/// Only refine the first `max_points` points of the tour
	pub max_points: Option<usize>,
}

impl Default for RefinementConfig {
	fn default() -> Self {
		Self { enabled: false, radius_fraction: 0.05, probes_per_point: 4, max_points: None }
	}
}

impl RefinementConfig {
	pub fn validate(&self) -> GaResult<()> {
		if !(self.radius_fraction > 0.0 && self.radius_fraction <= 1.0) {
			return Err(GaError::InvalidConfig(format!(
				"refinement radius fraction must be in (0, 1], got {}",
				self.radius_fraction
			)));
		}
		Ok(())
	}
}

/// Output of the exploitation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefinementReport {
	/// Fault points in visiting order
	pub ordered: Vec<ParameterSet>,
	/// Scored neighbours, grouped by visited point
	pub probes: Vec<ParameterSet>,
	/// Bench shots spent on probes
	pub nfev: usize,
}

impl RefinementReport {
	/// Probes that produced a fault themselves
	pub fn fault_probes(&self) -> impl Iterator<Item = &ParameterSet> {
		self.probes.iter().filter(|p| p.fault_class().is_some_and(|c| c.is_fault()))
	}
}

/// Random neighbour of `center`, snapped on the grid
pub fn neighbour(center: &ParameterSet, radius_fraction: f64, rng: &mut StdRng) -> ParameterSet {
	let mut probe = center.clone().with_origin(Origin::Refinement);
	for field in Field::ALL {
		let fb = *center.bounds().get(field);
		let radius = radius_fraction * fb.span();
		let offset = if radius > 0.0 { rng.random_range(-radius..=radius) } else { 0.0 };
		probe.update(field, fb.snap(center.get(field) + offset), true);
	}
	probe.reset_evaluation();
	probe
}

/// Order `fault_points` and probe the neighbourhood of each
pub fn refine<O: MeasurementOracle + ?Sized>(
	fault_points: &[ParameterSet],
	ordering: &dyn PointOrdering,
	config: &RefinementConfig,
	scorer: &Scorer<'_, O>,
	rng: &mut StdRng,
) -> GaResult<RefinementReport> {
	config.validate()?;
	let ordered = ordering.order(fault_points);
	let limit = config.max_points.unwrap_or(ordered.len()).min(ordered.len());
	log::info!(
		"refining {} of {} fault points, {} probes each, radius {:.1}%",
		limit,
		ordered.len(),
		config.probes_per_point,
		config.radius_fraction * 100.0
	);

	let mut probes = Vec::with_capacity(limit * config.probes_per_point);
	let mut nfev = 0;
	for center in ordered.iter().take(limit) {
		for _ in 0..config.probes_per_point {
			let mut probe = neighbour(center, config.radius_fraction, rng);
			nfev += scorer.score(&mut probe)?;
			probes.push(probe);
		}
	}
	Ok(RefinementReport { ordered, probes, nfev })
}
