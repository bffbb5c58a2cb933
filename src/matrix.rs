use crate::{
    Error, Result, geo,
    point::{Point, PointSet},
};

/// Dense symmetric pairwise distance table in kilometers, with a zero
/// diagonal. Row/column order matches the point set it was built from.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    names: Vec<String>,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds the haversine distance matrix for a validated point set.
    pub fn build(points: &PointSet) -> Result<Self> {
        Self::build_with_metric(points, geo::haversine_km)
    }

    /// Builds a matrix with a caller-supplied metric. The metric must be
    /// symmetric; only the upper triangle is evaluated and then mirrored.
    pub fn build_with_metric<F>(points: &PointSet, metric: F) -> Result<Self>
    where
        F: Fn(&Point, &Point) -> f64,
    {
        points.validate()?;

        let n = points.len();
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let km = metric(points.get(i), points.get(j));
                if !km.is_finite() || km < 0.0 {
                    return Err(Error::invalid_input(format!(
                        "metric produced a non-finite or negative distance between {} and {}: {km}",
                        points.get(i).name,
                        points.get(j).name
                    )));
                }
                cells[i * n + j] = km;
                cells[j * n + i] = km;
            }
        }

        Ok(Self {
            names: points.names().map(str::to_owned).collect(),
            cells,
        })
    }

    pub fn dim(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.names.len() + j]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Name-keyed lookup for the output boundary. Linear scan; the
    /// instance sizes this crate targets make an index unnecessary.
    pub fn by_name(&self, from: &str, to: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == from)?;
        let j = self.names.iter().position(|n| n == to)?;
        Some(self.get(i, j))
    }
}
