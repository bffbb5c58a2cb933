use std::{collections::HashSet, fmt};

use crate::{Error, Result};

const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// A named geographic point with coordinates in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-NINETY..=NINETY).contains(&self.lat)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.lng)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(
            f,
            "{} ({},{})",
            self.name,
            b1.format(self.lat),
            b2.format(self.lng)
        )
    }
}

/// An ordered set of points. Order is load-bearing: it fixes which point
/// is "first" for cycle closure and how equal-length tours tie-break, so
/// the set is a plain sequence and never a hash-keyed container.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn from_named_coords<I, S>(coords: I) -> Self
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        Self {
            points: coords
                .into_iter()
                .map(|(name, lat, lng)| Point::new(name, lat, lng))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> &Point {
        &self.points[idx]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.name.as_str())
    }

    /// Rejects empty sets, duplicate names, and out-of-range coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(Error::EmptySet);
        }
        let mut seen = HashSet::with_capacity(self.points.len());
        for point in &self.points {
            if !point.is_valid() {
                return Err(Error::InvalidCoordinate {
                    name: point.name.clone(),
                    lat: point.lat,
                    lng: point.lng,
                });
            }
            if !seen.insert(point.name.as_str()) {
                return Err(Error::DuplicateName(point.name.clone()));
            }
        }
        Ok(())
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}
