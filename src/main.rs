use std::{
    fs::File,
    io::{self, Write},
    process::ExitCode,
};

use tsp_exact::{
    CliOptions, DistanceMatrix, PointSet, Result, TourReport, TourResult, logging, random_tours,
    read_points, report, solve, solve_parallel, solve_with_deadline,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let options = CliOptions::from_args()?;
    logging::init_logger(&options)?;

    let points = PointSet::from(read_points(options.input_path())?);
    let matrix = DistanceMatrix::build(&points)?;
    log::info!("distance matrix built for {} points", points.len());

    let result = if let Some(budget) = options.timeout() {
        if options.parallel {
            log::warn!("--timeout-secs runs the sequential scan; ignoring --parallel");
        }
        solve_with_deadline(&points, &matrix, budget)?
    } else if options.parallel {
        solve_parallel(&points, &matrix)?
    } else {
        solve(&points, &matrix)?
    };
    log::info!("optimal tour found: {:.2} km", result.total_distance);

    let tour_report = report(&points, &matrix, &result)?;

    let mut out: Box<dyn Write> = match options.output_path() {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    write_report(&mut out, &points, &matrix, &result, &tour_report)?;

    if options.samples > 0 {
        let samples = random_tours(&points, &matrix, options.samples, options.sample_seed)?;
        write_samples(&mut out, options.samples, options.sample_seed, &samples)?;
    }

    Ok(())
}

fn write_report(
    out: &mut dyn Write,
    points: &PointSet,
    matrix: &DistanceMatrix,
    result: &TourResult,
    report: &TourReport,
) -> Result<()> {
    writeln!(out, "Distance matrix (km):")?;
    for (i, from) in points.names().enumerate() {
        for (j, to) in points.names().enumerate().skip(i + 1) {
            writeln!(out, "  {from} <-> {to}: {:.2}", matrix.get(i, j))?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Optimal tour:")?;
    for edge in &report.edges {
        writeln!(out, "  {} -> {}: {:.2} km", edge.from, edge.to, edge.km)?;
    }
    writeln!(out, "Total distance: {:.2} km", report.total_distance)?;

    let mut route = result.tour_names(points);
    let first = route[0];
    route.push(first);
    writeln!(out, "Route: {}", route.join(" -> "))?;

    writeln!(out)?;
    writeln!(out, "Per-point load (km):")?;
    for load in &report.per_point_load {
        writeln!(out, "  {}: {:.2}", load.name, load.km)?;
    }
    Ok(())
}

fn write_samples(
    out: &mut dyn Write,
    count: usize,
    seed: u64,
    samples: &[TourResult],
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Comparison tours ({count} random, seed {seed}):")?;
    for (rank, tour) in samples.iter().enumerate() {
        writeln!(out, "  {}: {:.2} km", rank + 1, tour.total_distance)?;
    }
    Ok(())
}
