use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::{Error, Result, matrix::DistanceMatrix, point::PointSet};

const DEADLINE_CHECK_INTERVAL: u64 = 4096;

/// The minimum-weight Hamiltonian cycle found by a complete scan.
/// `tour` is a permutation of all point indices; the closing edge back
/// to `tour[0]` is implicit and included in `total_distance`.
#[derive(Clone, Debug, PartialEq)]
pub struct TourResult {
    pub tour: Vec<usize>,
    pub total_distance: f64,
}

impl TourResult {
    /// Visiting order as point names, for the name-keyed output boundary.
    pub fn tour_names<'a>(&self, points: &'a PointSet) -> Vec<&'a str> {
        self.tour
            .iter()
            .map(|&idx| points.get(idx).name.as_str())
            .collect()
    }
}

/// Exhaustive search for the optimal tour.
///
/// Index 0 is anchored as the first element: every cycle has the same
/// weight under rotation, so this prunes an n-fold redundancy without
/// changing the returned minimum. The remaining indices are enumerated
/// in lexicographic order and the best tour is replaced only on strict
/// improvement, so ties keep the first-found ordering and repeated calls
/// return identical results.
pub fn solve(points: &PointSet, matrix: &DistanceMatrix) -> Result<TourResult> {
    let n = validate_instance(points, matrix)?;
    match trivial_result(matrix, n) {
        Some(result) => Ok(result),
        None => search_anchored(matrix, n, None),
    }
}

/// As [`solve`], but fails with [`Error::DeadlineExceeded`] if `budget`
/// elapses before the scan completes. Partial progress is discarded;
/// the call either returns the true optimum or nothing.
pub fn solve_with_deadline(
    points: &PointSet,
    matrix: &DistanceMatrix,
    budget: Duration,
) -> Result<TourResult> {
    let n = validate_instance(points, matrix)?;
    match trivial_result(matrix, n) {
        Some(result) => Ok(result),
        None => search_anchored(matrix, n, Some(budget)),
    }
}

/// As [`solve`], with the scan partitioned across rayon workers by the
/// tour's second element. Each worker keeps a local best and the locals
/// are reduced in fixed partition order with strict improvement, which
/// reproduces the sequential tie-break exactly.
pub fn solve_parallel(points: &PointSet, matrix: &DistanceMatrix) -> Result<TourResult> {
    let n = validate_instance(points, matrix)?;
    if let Some(result) = trivial_result(matrix, n) {
        return Ok(result);
    }

    log::debug!("solver.parallel: start n={n} partitions={}", n - 1);
    let partition_bests: Vec<(Vec<usize>, f64)> = (1..n)
        .into_par_iter()
        .map(|second| best_in_partition(matrix, n, second))
        .collect();

    let mut best_rest: &[usize] = &[];
    let mut best = f64::INFINITY;
    for (rest, weight) in &partition_bests {
        if *weight < best {
            best = *weight;
            best_rest = rest;
        }
    }
    log::debug!("solver.parallel: done n={n} best={best}");
    Ok(anchored_result(best_rest.to_vec(), best))
}

pub(crate) fn validate_instance(points: &PointSet, matrix: &DistanceMatrix) -> Result<usize> {
    points.validate()?;
    if matrix.dim() != points.len() {
        return Err(Error::invalid_input(format!(
            "distance matrix has dimension {} but the point set has {} points",
            matrix.dim(),
            points.len()
        )));
    }
    Ok(points.len())
}

/// Cyclic tour weight: consecutive edges plus the closing edge.
pub(crate) fn cycle_weight(matrix: &DistanceMatrix, tour: &[usize]) -> f64 {
    let n = tour.len();
    let mut sum = 0.0;
    for i in 0..n {
        sum += matrix.get(tour[i], tour[(i + 1) % n]);
    }
    sum
}

/// n = 1 and n = 2 have exactly one cycle each; handled as explicit
/// branches rather than degenerate runs of the enumeration loop.
fn trivial_result(matrix: &DistanceMatrix, n: usize) -> Option<TourResult> {
    match n {
        1 => Some(TourResult {
            tour: vec![0],
            total_distance: 0.0,
        }),
        2 => Some(TourResult {
            tour: vec![0, 1],
            total_distance: 2.0 * matrix.get(0, 1),
        }),
        _ => None,
    }
}

fn search_anchored(
    matrix: &DistanceMatrix,
    n: usize,
    deadline: Option<Duration>,
) -> Result<TourResult> {
    log::debug!("solver.exact: start n={n}");
    let start = Instant::now();

    let mut rest: Vec<usize> = (1..n).collect();
    let mut best_rest = rest.clone();
    let mut best = f64::INFINITY;
    let mut evaluated: u64 = 0;

    loop {
        let weight = anchored_cycle_weight(matrix, &rest);
        if weight < best {
            best = weight;
            best_rest.copy_from_slice(&rest);
        }
        evaluated += 1;
        if let Some(budget) = deadline {
            if evaluated % DEADLINE_CHECK_INTERVAL == 0 && start.elapsed() > budget {
                return Err(Error::DeadlineExceeded(budget));
            }
        }
        if !next_permutation(&mut rest) {
            break;
        }
    }

    log::debug!("solver.exact: done n={n} evaluated={evaluated} best={best}");
    Ok(anchored_result(best_rest, best))
}

fn best_in_partition(matrix: &DistanceMatrix, n: usize, second: usize) -> (Vec<usize>, f64) {
    let mut rest: Vec<usize> = Vec::with_capacity(n - 1);
    rest.push(second);
    rest.extend((1..n).filter(|&idx| idx != second));

    let mut best_rest = rest.clone();
    let mut best = f64::INFINITY;
    loop {
        let weight = anchored_cycle_weight(matrix, &rest);
        if weight < best {
            best = weight;
            best_rest.copy_from_slice(&rest);
        }
        if !next_permutation(&mut rest[1..]) {
            break;
        }
    }
    (best_rest, best)
}

/// Weight of the cycle `[0] ++ rest ++ [0]`. `rest` must be non-empty.
fn anchored_cycle_weight(matrix: &DistanceMatrix, rest: &[usize]) -> f64 {
    let mut sum = matrix.get(0, rest[0]);
    for pair in rest.windows(2) {
        sum += matrix.get(pair[0], pair[1]);
    }
    sum + matrix.get(rest[rest.len() - 1], 0)
}

fn anchored_result(rest: Vec<usize>, total: f64) -> TourResult {
    let mut tour = Vec::with_capacity(rest.len() + 1);
    tour.push(0);
    tour.extend(rest);
    TourResult {
        tour,
        total_distance: total,
    }
}

/// Advances `seq` to its lexicographic successor in place. Returns false
/// once `seq` is the last (descending) permutation.
fn next_permutation(seq: &mut [usize]) -> bool {
    if seq.len() < 2 {
        return false;
    }
    let mut i = seq.len() - 1;
    while i > 0 && seq[i - 1] >= seq[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = seq.len() - 1;
    while seq[j] <= seq[i - 1] {
        j -= 1;
    }
    seq.swap(i - 1, j);
    seq[i..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        Error, geo,
        matrix::DistanceMatrix,
        point::{Point, PointSet},
    };

    use super::{cycle_weight, next_permutation, solve, solve_parallel, solve_with_deadline};

    fn planar(a: &Point, b: &Point) -> f64 {
        let dx = a.lat - b.lat;
        let dy = a.lng - b.lng;
        (dx * dx + dy * dy).sqrt()
    }

    fn ecuador() -> PointSet {
        PointSet::from_named_coords([
            ("Quito", -0.22985, -78.52495),
            ("Guayaquil", -2.19616, -79.88621),
            ("Cuenca", -2.89908, -79.01086),
            ("Loja", -3.99313, -79.20422),
            ("Machala", -3.25861, -79.96053),
            ("Manta", -0.94937, -80.73137),
            ("Durán", -2.1688548, -79.8340647),
            ("Esmeraldas", 0.9592, -79.65397),
            ("Ambato", -1.24908, -78.61675),
            ("Santo Domingo", -0.25305, -79.17536),
        ])
    }

    #[test]
    fn next_permutation_walks_lexicographic_order() {
        let mut seq = vec![1, 2, 3];
        let mut seen = vec![seq.clone()];
        while next_permutation(&mut seq) {
            seen.push(seq.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
    }

    #[test]
    fn empty_set_is_rejected() {
        let points = PointSet::default();
        let matrix = DistanceMatrix::build(&PointSet::from_named_coords([("a", 0.0, 0.0)]))
            .expect("build matrix");
        assert!(matches!(solve(&points, &matrix), Err(Error::EmptySet)));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let points = PointSet::from_named_coords([("a", 0.0, 0.0), ("b", 1.0, 1.0)]);
        let matrix = DistanceMatrix::build(&PointSet::from_named_coords([("a", 0.0, 0.0)]))
            .expect("build matrix");
        assert!(matches!(solve(&points, &matrix), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn single_point_yields_zero_length_tour() {
        let points = PointSet::from_named_coords([("a", 1.0, 2.0)]);
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let result = solve(&points, &matrix).expect("solve");
        assert_eq!(result.tour, vec![0]);
        assert_eq!(result.total_distance, 0.0);
    }

    #[test]
    fn two_points_yield_out_and_back_tour() {
        let points = PointSet::from_named_coords([("a", 0.0, 0.0), ("b", 0.0, 1.0)]);
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let result = solve(&points, &matrix).expect("solve");
        assert_eq!(result.tour, vec![0, 1]);
        assert_eq!(result.total_distance, 2.0 * matrix.get(0, 1));
    }

    #[test]
    fn three_points_have_the_unique_cycle_weight() {
        // The only Hamiltonian cycle on three points uses all three
        // pairwise edges, so the optimum equals their sum.
        let points = PointSet::from_named_coords([
            ("a", -0.2, -78.5),
            ("b", -2.2, -79.9),
            ("c", -2.9, -79.0),
        ]);
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let expected = geo::haversine_km(points.get(0), points.get(1))
            + geo::haversine_km(points.get(1), points.get(2))
            + geo::haversine_km(points.get(2), points.get(0));
        let result = solve(&points, &matrix).expect("solve");
        assert!((result.total_distance - expected).abs() < 1e-9);
    }

    #[test]
    fn unit_square_tour_traces_the_perimeter() {
        // Planar metric; corners deliberately out of perimeter order so
        // the identity permutation is a self-crossing tour (~4.83).
        let points = PointSet::from_named_coords([
            ("sw", 0.0, 0.0),
            ("ne", 1.0, 1.0),
            ("nw", 0.0, 1.0),
            ("se", 1.0, 0.0),
        ]);
        let matrix = DistanceMatrix::build_with_metric(&points, planar).expect("build matrix");
        let result = solve(&points, &matrix).expect("solve");
        assert!((result.total_distance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn returned_tour_is_a_permutation_of_all_indices() {
        let points = ecuador();
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let result = solve(&points, &matrix).expect("solve");

        assert_eq!(result.tour.len(), points.len());
        let mut sorted = result.tour.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..points.len()).collect::<Vec<_>>());
    }

    #[test]
    fn ecuador_reference_instance_optimum() {
        let points = ecuador();
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let result = solve(&points, &matrix).expect("solve");
        assert!((result.total_distance - 1297.3463478507124).abs() < 1e-6);
        assert_eq!(result.tour[0], 0);
        assert!((cycle_weight(&matrix, &result.tour) - result.total_distance).abs() < 1e-9);
    }

    #[test]
    fn solve_is_deterministic_across_calls() {
        let points = ecuador();
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let first = solve(&points, &matrix).expect("solve");
        let second = solve(&points, &matrix).expect("solve");
        assert_eq!(first.tour, second.tour);
        assert_eq!(first.total_distance, second.total_distance);
    }

    #[test]
    fn parallel_solve_matches_sequential_solve() {
        let points = ecuador();
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let sequential = solve(&points, &matrix).expect("solve");
        let parallel = solve_parallel(&points, &matrix).expect("solve parallel");
        assert_eq!(sequential.tour, parallel.tour);
        assert_eq!(sequential.total_distance, parallel.total_distance);
    }

    #[test]
    fn exhausted_deadline_yields_no_partial_result() {
        let points = ecuador();
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let err = solve_with_deadline(&points, &matrix, Duration::ZERO)
            .expect_err("zero budget should fail");
        assert!(matches!(err, Error::DeadlineExceeded(_)));
    }

    #[test]
    fn generous_deadline_returns_the_optimum() {
        let points = ecuador();
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let bounded = solve_with_deadline(&points, &matrix, Duration::from_secs(600))
            .expect("solve within budget");
        let unbounded = solve(&points, &matrix).expect("solve");
        assert_eq!(bounded.tour, unbounded.tour);
    }

    #[test]
    fn tour_names_follow_visiting_order() {
        let points = PointSet::from_named_coords([("a", 0.0, 0.0), ("b", 0.0, 1.0)]);
        let matrix = DistanceMatrix::build(&points).expect("build matrix");
        let result = solve(&points, &matrix).expect("solve");
        assert_eq!(result.tour_names(&points), vec!["a", "b"]);
    }
}
