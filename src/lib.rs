//! Provably optimal closed tours over small sets of named geographic
//! points: a haversine distance matrix plus an exhaustive
//! Hamiltonian-cycle search, with reporting structures for external
//! renderers and printers.

mod error;
mod geo;
mod io;
pub mod logging;
mod matrix;
mod point;
mod report;
mod sampling;
mod solver;

pub use error::{Error, Result};
pub use geo::{EARTH_RADIUS_KM, haversine_km};
pub use io::input::{parse_points, read_points};
pub use io::options::{CliOptions, LogFormat, LogLevel};
pub use matrix::DistanceMatrix;
pub use point::{Point, PointSet};
pub use report::{PointLoad, TourEdge, TourReport, report};
pub use sampling::random_tours;
pub use solver::{TourResult, solve, solve_parallel, solve_with_deadline};
