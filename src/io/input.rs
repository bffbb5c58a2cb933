use std::{fs, io::Read, path::Path};

use crate::{Error, Point, Result};

/// Reads points from a file, or from stdin when no path is given.
pub fn read_points(path: Option<&Path>) -> Result<Vec<Point>> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    parse_points(&raw)
}

/// Parses `name,lat,lng` lines. Blank lines and lines starting with `#`
/// are skipped. Names may contain spaces but not commas.
pub fn parse_points(input: &str) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split(',');
        let name = fields
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::invalid_input(format!("Line {}: missing name", idx + 1)))?;
        let lat_s = fields
            .next()
            .map(str::trim)
            .ok_or_else(|| Error::invalid_input(format!("Line {}: missing latitude", idx + 1)))?;
        let lng_s = fields
            .next()
            .map(str::trim)
            .ok_or_else(|| Error::invalid_input(format!("Line {}: missing longitude", idx + 1)))?;

        if fields.next().is_some() {
            return Err(Error::invalid_input(format!(
                "Line {}: expected 'name,lat,lng' but got extra comma fields: {line}",
                idx + 1
            )));
        }

        let lat: f64 = lat_s.parse().map_err(|_| {
            Error::invalid_input(format!("Line {}: invalid latitude: {}", idx + 1, lat_s))
        })?;
        let lng: f64 = lng_s.parse().map_err(|_| {
            Error::invalid_input(format!("Line {}: invalid longitude: {}", idx + 1, lng_s))
        })?;

        points.push(Point::new(name, lat, lng));
    }

    if points.is_empty() {
        return Err(Error::invalid_input("No points provided."));
    }

    Ok(points)
}
