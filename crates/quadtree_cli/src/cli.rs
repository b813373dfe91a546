//! Command-line interface handling for the quadtree tool.
//!
//! This module provides command-line argument parsing using the `clap`
//! builder API. Shapes and coordinates are given as comma-separated numbers,
//! e.g. `--rect 0,0,40,40` or `--at 3.5,-2`.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use quadtree::{Circle, Rectangle};
use std::ffi::OsString;
use std::path::PathBuf;

/// Command line arguments parsed from user input.
///
/// Global options override configuration file settings; the subcommand says
/// what to do with the snapshots.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// The operation to run
    pub command: CliCommand,
}

/// One invocation of the tool.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Write an empty snapshot built from the `[tree]` config section
    New { output: PathBuf },
    /// Insert a JSON array of points into a snapshot
    Insert {
        snapshot: PathBuf,
        points: PathBuf,
        output: PathBuf,
    },
    /// Range query
    Query { snapshot: PathBuf, shape: QueryArea },
    /// Nearest-neighbor query
    Closest {
        snapshot: PathBuf,
        at: (f64, f64),
        count: usize,
        max_distance: f64,
    },
    /// Union of two snapshots
    Merge {
        first: PathBuf,
        second: PathBuf,
        capacity: Option<usize>,
        output: PathBuf,
    },
    /// Structure statistics
    Stats { snapshot: PathBuf },
}

/// Query region given on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryArea {
    Rect(Rectangle),
    Circle(Circle),
}

impl CliArgs {
    /// Parses the process arguments, exiting with a usage message on error.
    pub fn parse() -> Self {
        match Self::try_parse_from(std::env::args_os()) {
            Ok(args) => args,
            Err(err) => err.exit(),
        }
    }

    /// Parses arguments from an explicit iterator.
    ///
    /// The first item is the binary name, as with `std::env::args_os`.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let command = match matches.subcommand() {
            Some(("new", sub)) => CliCommand::New {
                output: required_path(sub, "output")?,
            },
            Some(("insert", sub)) => CliCommand::Insert {
                snapshot: required_path(sub, "snapshot")?,
                points: required_path(sub, "points")?,
                output: required_path(sub, "output")?,
            },
            Some(("query", sub)) => {
                let shape = match (sub.get_one::<Rectangle>("rect"), sub.get_one::<Circle>("circle")) {
                    (Some(rect), None) => QueryArea::Rect(*rect),
                    (None, Some(circle)) => QueryArea::Circle(*circle),
                    _ => {
                        return Err(clap::Error::raw(
                            ErrorKind::ArgumentConflict,
                            "exactly one of --rect or --circle is required\n",
                        ))
                    }
                };
                CliCommand::Query {
                    snapshot: required_path(sub, "snapshot")?,
                    shape,
                }
            }
            Some(("closest", sub)) => CliCommand::Closest {
                snapshot: required_path(sub, "snapshot")?,
                at: required(sub, "at")?,
                count: required(sub, "count")?,
                max_distance: sub.get_one::<f64>("max-distance").copied().unwrap_or(f64::INFINITY),
            },
            Some(("merge", sub)) => CliCommand::Merge {
                first: required_path(sub, "first")?,
                second: required_path(sub, "second")?,
                capacity: sub.get_one::<usize>("capacity").copied(),
                output: required_path(sub, "output")?,
            },
            Some(("stats", sub)) => CliCommand::Stats {
                snapshot: required_path(sub, "snapshot")?,
            },
            _ => {
                return Err(clap::Error::raw(
                    ErrorKind::MissingSubcommand,
                    "a subcommand is required\n",
                ))
            }
        };

        Ok(Self {
            config_path: required_path(matches, "config")?,
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            command,
        })
    }
}

/// Builds the clap command tree.
fn command() -> Command {
    let snapshot = || {
        Arg::new("snapshot")
            .value_name("SNAPSHOT")
            .help("Path to a JSON snapshot")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
    };
    let output = || {
        Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .help("Where to write the resulting snapshot")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
    };

    Command::new("quadtree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build and query point quadtree snapshots")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("quadtree.toml")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .global(true),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("new")
                .about("Create an empty snapshot from the [tree] config section")
                .arg(output()),
        )
        .subcommand(
            Command::new("insert")
                .about("Insert a JSON array of points into a snapshot")
                .arg(snapshot())
                .arg(
                    Arg::new("points")
                        .value_name("POINTS")
                        .help("JSON file holding [{\"x\": .., \"y\": .., \"payload\": ..}, ...]")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(output()),
        )
        .subcommand(
            Command::new("query")
                .about("Print every point inside a rectangle or circle")
                .arg(snapshot())
                .arg(
                    Arg::new("rect")
                        .long("rect")
                        .value_name("X,Y,W,H")
                        .help("Rectangle given by center and size")
                        .value_parser(parse_rectangle)
                        .conflicts_with("circle"),
                )
                .arg(
                    Arg::new("circle")
                        .long("circle")
                        .value_name("X,Y,R")
                        .help("Circle given by center and radius")
                        .value_parser(parse_circle),
                ),
        )
        .subcommand(
            Command::new("closest")
                .about("Print the points nearest to a location, closest first")
                .arg(snapshot())
                .arg(
                    Arg::new("at")
                        .long("at")
                        .value_name("X,Y")
                        .help("Search location")
                        .required(true)
                        .value_parser(parse_location),
                )
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_name("N")
                        .help("Maximum number of points to return")
                        .default_value("1")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("max-distance")
                        .short('d')
                        .long("max-distance")
                        .value_name("DISTANCE")
                        .help("Ignore points further away than this")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("merge")
                .about("Combine two snapshots into a new one")
                .arg(
                    Arg::new("first")
                        .value_name("FIRST")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("second")
                        .value_name("SECOND")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("capacity")
                        .long("capacity")
                        .value_name("N")
                        .help("Leaf capacity of the merged tree (defaults to the config value)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(output()),
        )
        .subcommand(
            Command::new("stats")
                .about("Print structure statistics for a snapshot")
                .arg(snapshot()),
        )
}

fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T, clap::Error> {
    matches.get_one::<T>(id).cloned().ok_or_else(|| {
        clap::Error::raw(
            ErrorKind::MissingRequiredArgument,
            format!("missing required argument '{id}'\n"),
        )
    })
}

fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf, clap::Error> {
    required::<PathBuf>(matches, id)
}

/// Parses exactly `N` comma-separated numbers.
fn parse_numbers<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got {}", parts.len()));
    }

    let mut numbers = [0.0; N];
    for (slot, part) in numbers.iter_mut().zip(parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|err| format!("invalid number '{part}': {err}"))?;
    }
    Ok(numbers)
}

fn parse_rectangle(value: &str) -> Result<Rectangle, String> {
    let [x, y, w, h] = parse_numbers::<4>(value)?;
    Ok(Rectangle::new(x, y, w, h))
}

fn parse_circle(value: &str) -> Result<Circle, String> {
    let [x, y, r] = parse_numbers::<3>(value)?;
    Ok(Circle::new(x, y, r))
}

fn parse_location(value: &str) -> Result<(f64, f64), String> {
    let [x, y] = parse_numbers::<2>(value)?;
    Ok((x, y))
}
