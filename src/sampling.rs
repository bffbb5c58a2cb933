//! Seeded random comparison tours. Purely illustrative: downstream
//! charts plot these against the exact optimum. Not part of the exact
//! solver's guarantees in any way.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{Result, matrix::DistanceMatrix, point::PointSet, solver};

/// Generates `count` pseudorandom tours from a seeded generator and
/// returns them sorted by ascending total distance. The same seed always
/// produces the same tours.
pub fn random_tours(
    points: &PointSet,
    matrix: &DistanceMatrix,
    count: usize,
    base_seed: u64,
) -> Result<Vec<solver::TourResult>> {
    let n = solver::validate_instance(points, matrix)?;
    let mut rng = StdRng::seed_from_u64(base_seed);

    let mut tours = Vec::with_capacity(count);
    for _ in 0..count {
        let mut tour: Vec<usize> = (0..n).collect();
        tour.shuffle(&mut rng);
        let total_distance = solver::cycle_weight(matrix, &tour);
        tours.push(solver::TourResult {
            tour,
            total_distance,
        });
    }
    tours.sort_by(|a, b| a.total_distance.total_cmp(&b.total_distance));
    Ok(tours)
}
