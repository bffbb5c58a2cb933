use crate::{Error, Result, matrix::DistanceMatrix, point::PointSet, solver::TourResult};

const EDGE_SUM_RELATIVE_TOLERANCE: f64 = 1e-9;

/// One tour edge in visiting order.
#[derive(Clone, Debug, PartialEq)]
pub struct TourEdge {
    pub from: String,
    pub to: String,
    pub km: f64,
}

/// Kilometers of tour passing through a point: the sum of its two
/// adjacent edges. Listed in point-set order.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLoad {
    pub name: String,
    pub km: f64,
}

/// Edge-level and aggregate view of an optimal tour, handed to external
/// renderers and printers. This module performs no I/O itself.
#[derive(Clone, Debug)]
pub struct TourReport {
    pub edges: Vec<TourEdge>,
    pub total_distance: f64,
    pub per_point_load: Vec<PointLoad>,
}

/// Assembles the report for a solved tour: the n consecutive edges
/// (closing edge last) and the per-point load.
pub fn report(
    points: &PointSet,
    matrix: &DistanceMatrix,
    result: &TourResult,
) -> Result<TourReport> {
    let n = crate::solver::validate_instance(points, matrix)?;
    validate_tour(&result.tour, n)?;

    let mut edges = Vec::with_capacity(n);
    let mut loads = vec![0.0; n];
    for i in 0..n {
        let from = result.tour[i];
        let to = result.tour[(i + 1) % n];
        let km = matrix.get(from, to);
        loads[from] += km;
        loads[to] += km;
        edges.push(TourEdge {
            from: points.get(from).name.clone(),
            to: points.get(to).name.clone(),
            km,
        });
    }

    let edge_sum: f64 = edges.iter().map(|edge| edge.km).sum();
    debug_assert!(
        (edge_sum - result.total_distance).abs()
            <= EDGE_SUM_RELATIVE_TOLERANCE * result.total_distance.abs().max(1.0),
        "edge sum {edge_sum} diverges from tour total {}",
        result.total_distance
    );

    Ok(TourReport {
        edges,
        total_distance: result.total_distance,
        per_point_load: points
            .names()
            .zip(loads)
            .map(|(name, km)| PointLoad {
                name: name.to_owned(),
                km,
            })
            .collect(),
    })
}

fn validate_tour(tour: &[usize], n: usize) -> Result<()> {
    if tour.len() != n {
        return Err(Error::invalid_input(format!(
            "tour visits {} points but the set has {n}",
            tour.len()
        )));
    }
    let mut seen = vec![false; n];
    for &idx in tour {
        if idx >= n || seen[idx] {
            return Err(Error::invalid_input(format!(
                "tour is not a permutation of 0..{n}: index {idx}"
            )));
        }
        seen[idx] = true;
    }
    Ok(())
}
