//! Solution reconstruction from the plain-text route format.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::SolutionIoError;
use crate::evaluation::CostWeights;
use crate::models::{Instance, Solution, Stop, Task};

/// Number of comment lines preceding the route blocks.
pub const HEADER_LINES: usize = 4;

/// Parses the route blocks of a solution file into one stop list per vehicle.
///
/// The first [`HEADER_LINES`] lines are skipped whatever they contain. The
/// rest is read as whitespace-separated integers: `vehicle length` followed
/// by `length` pairs of `node skill`. A vehicle given several blocks gets
/// them appended in order; vehicles without a block get an empty list.
pub fn parse_routes(text: &str, num_vehicles: usize) -> Result<Vec<Vec<Stop>>, SolutionIoError> {
    let mut tokens = text
        .lines()
        .enumerate()
        .skip(HEADER_LINES)
        .flat_map(|(index, line)| line.split_whitespace().map(move |tok| (index + 1, tok)));
    let last_line = text.lines().count();
    let mut routes = vec![Vec::new(); num_vehicles];

    while let Some(first) = tokens.next() {
        let vehicle = parse_token(first, "vehicle id")?;
        let len = parse_token(next_token(&mut tokens, last_line, "route length")?, "route length")?;
        if vehicle >= num_vehicles {
            return Err(SolutionIoError::VehicleOutOfRange {
                vehicle,
                num_vehicles,
            });
        }
        for _ in 0..len {
            let node = parse_token(next_token(&mut tokens, last_line, "node")?, "node")?;
            let skill = parse_token(next_token(&mut tokens, last_line, "skill")?, "skill")?;
            routes[vehicle].push(Stop::new(node, skill));
        }
    }

    Ok(routes)
}

fn next_token<'t>(
    tokens: &mut impl Iterator<Item = (usize, &'t str)>,
    last_line: usize,
    what: &str,
) -> Result<(usize, &'t str), SolutionIoError> {
    tokens.next().ok_or_else(|| SolutionIoError::Parse {
        line: last_line,
        message: format!("unexpected end of file, expected {what}"),
    })
}

fn parse_token((line, token): (usize, &str), what: &str) -> Result<usize, SolutionIoError> {
    token.parse().map_err(|_| SolutionIoError::Parse {
        line,
        message: format!("expected {what}, found '{token}'"),
    })
}

impl<'a, I: Instance + ?Sized> Solution<'a, I> {
    /// Rebuilds a solution by replaying per-vehicle stop lists.
    ///
    /// All routes are walked in lock step from their second stop. A
    /// single-service stop is evaluated and committed as soon as its vehicle
    /// reaches it. A double-service stop is committed once both vehicles
    /// serving it have reached it, the slot being chosen by the stop's skill.
    /// A depot stop, or the end of the list, finishes a vehicle. When every
    /// vehicle is finished the routes are closed, so the result carries the
    /// same totals as the solution that produced the lists.
    pub fn from_routes(
        instance: &'a I,
        weights: CostWeights,
        routes: &[Vec<Stop>],
    ) -> Result<Self, SolutionIoError> {
        let num_vehicles = instance.num_vehicles();
        let mut solution = Self::with_weights(instance, weights);
        let mut tasks: Vec<Option<Task>> = (0..instance.num_nodes())
            .map(|node| Task::for_node(instance, node))
            .collect();

        let stop_at = |vehicle: usize, head: usize| {
            routes
                .get(vehicle)
                .and_then(|stops| stops.get(head))
                .copied()
                .unwrap_or(Stop::DEPOT)
        };
        let mut heads = vec![1; num_vehicles];
        let mut done = vec![false; num_vehicles];
        let mut remaining = num_vehicles;

        while remaining > 0 {
            let mut progressed = false;
            for vehicle in 0..num_vehicles {
                if done[vehicle] {
                    continue;
                }
                let stop = stop_at(vehicle, heads[vehicle]);
                if stop.is_depot() {
                    done[vehicle] = true;
                    remaining -= 1;
                    progressed = true;
                    continue;
                }

                let task = tasks
                    .get_mut(stop.node)
                    .and_then(Option::as_mut)
                    .ok_or(SolutionIoError::UnknownNode {
                        vehicle,
                        node: stop.node,
                    })?;

                match task.secondary() {
                    None => task.assign_primary(vehicle),
                    Some(second) => {
                        if stop.skill != task.primary().skill() && stop.skill != second.skill() {
                            return Err(SolutionIoError::UnknownSkill {
                                node: stop.node,
                                skill: stop.skill,
                            });
                        }
                        task.assign_by_skill(stop.skill, vehicle);
                    }
                }

                if task.is_fully_assigned() {
                    solution.insert(task)?;
                    for served_by in task.slots().filter_map(|slot| slot.vehicle()) {
                        heads[served_by] += 1;
                    }
                    progressed = true;
                }
            }

            if !progressed {
                return Err(SolutionIoError::ReplayStalled {
                    committed: solution.task_order().len(),
                });
            }
        }

        solution.finish_routes()?;
        Ok(solution)
    }

    /// Reads a solution file written by [`write_txt`](Solution::write_txt)
    /// and replays it with the default cost weights.
    pub fn read_from_file<P: AsRef<Path>>(
        instance: &'a I,
        path: P,
    ) -> Result<Self, SolutionIoError> {
        Self::read_from_file_with_weights(instance, CostWeights::default(), path)
    }

    /// Reads a solution file and replays it with the given cost weights.
    pub fn read_from_file_with_weights<P: AsRef<Path>>(
        instance: &'a I,
        weights: CostWeights,
        path: P,
    ) -> Result<Self, SolutionIoError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SolutionIoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let routes = parse_routes(&text, instance.num_vehicles())?;
        debug!(
            path = %path.display(),
            stops = routes.iter().map(Vec::len).sum::<usize>(),
            "read solution file"
        );
        Self::from_routes(instance, weights, &routes)
    }
}
