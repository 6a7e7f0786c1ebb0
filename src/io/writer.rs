//! Plain-text solution writers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::SolutionIoError;
use crate::models::{Instance, Solution};

fn write_header<I: Instance + ?Sized, W: Write>(
    solution: &Solution<'_, I>,
    out: &mut W,
    legend: &str,
) -> io::Result<()> {
    let s = solution.summary();
    writeln!(out, "# Solution for {}", solution.instance().file_name())?;
    writeln!(
        out,
        "# Cost = {} Dist = {} Tard = {} TMax = {}",
        s.cost, s.dist, s.tard, s.tmax
    )?;
    writeln!(out, "# <vehicle> <route length>")?;
    writeln!(out, "# {legend}")
}

/// Writes the reconstructible form: per vehicle a `vehicle length` line
/// followed by one `node skill` line per stop.
pub fn write_routes<I: Instance + ?Sized, W: Write>(
    solution: &Solution<'_, I>,
    out: &mut W,
) -> io::Result<()> {
    write_header(solution, out, "<origin node> <service type>")?;
    for route in solution.routes() {
        writeln!(out, "{} {}", route.vehicle_id(), route.len())?;
        for stop in route.stops() {
            writeln!(out, "{} {}", stop.node, stop.skill)?;
        }
    }
    Ok(())
}

/// Writes the geometry form: per vehicle a `vehicle edges` line followed by
/// one `originX originY destX destY destSkill` line per route edge.
pub fn write_geometry<I: Instance + ?Sized, W: Write>(
    solution: &Solution<'_, I>,
    out: &mut W,
) -> io::Result<()> {
    let instance = solution.instance();
    write_header(
        solution,
        out,
        "<originx> <originy> <destx> <desty> <service type>",
    )?;
    for route in solution.routes() {
        writeln!(
            out,
            "{} {}",
            route.vehicle_id(),
            route.len().saturating_sub(1)
        )?;
        for edge in route.stops().windows(2) {
            let (ox, oy) = instance.node_pos(edge[0].node);
            let (dx, dy) = instance.node_pos(edge[1].node);
            writeln!(out, "{ox} {oy} {dx} {dy} {}", edge[1].skill)?;
        }
    }
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<(), SolutionIoError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let to_error = |source| SolutionIoError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut out = BufWriter::new(File::create(path).map_err(to_error)?);
    write(&mut out).map_err(to_error)?;
    out.flush().map_err(to_error)?;
    debug!(path = %path.display(), "wrote solution file");
    Ok(())
}

impl<I: Instance + ?Sized> Solution<'_, I> {
    /// Writes the reconstructible text form to `path`.
    pub fn write_txt<P: AsRef<Path>>(&self, path: P) -> Result<(), SolutionIoError> {
        write_file(path.as_ref(), |out| write_routes(self, out))
    }

    /// Writes the geometry text form (for plotting) to `path`.
    pub fn write_geometry_txt<P: AsRef<Path>>(&self, path: P) -> Result<(), SolutionIoError> {
        write_file(path.as_ref(), |out| write_geometry(self, out))
    }
}
