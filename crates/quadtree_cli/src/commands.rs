//! Command execution.
//!
//! Every command reads and writes JSON snapshots with `serde_json::Value`
//! payloads and returns its report as a JSON value for `main` to print.

use crate::cli::{CliCommand, QueryArea};
use crate::config::AppConfig;
use anyhow::Context;
use quadtree::{Point, QuadTree};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info};

type Tree = QuadTree<Value>;

/// Runs one command against the given configuration.
pub fn execute(config: &AppConfig, command: CliCommand) -> anyhow::Result<Value> {
    match command {
        CliCommand::New { output } => {
            let tree = Tree::from_config(&config.tree)
                .context("Cannot build a tree from the [tree] config section")?;
            save_tree(&tree, &output)?;
            info!("Created empty snapshot {}", output.display());
            Ok(describe(&tree))
        }
        CliCommand::Insert {
            snapshot,
            points,
            output,
        } => {
            let mut tree = load_tree(&snapshot)?;
            let text = std::fs::read_to_string(&points)
                .with_context(|| format!("Failed to read points file {}", points.display()))?;
            let points: Vec<Point<Value>> =
                serde_json::from_str(&text).context("Points file must hold a JSON array of points")?;

            let total = points.len();
            let mut inserted = 0usize;
            for point in points {
                if tree.insert(point) {
                    inserted += 1;
                }
            }
            save_tree(&tree, &output)?;

            info!(inserted, rejected = total - inserted, "Inserted points into {}", output.display());
            Ok(json!({ "inserted": inserted, "rejected": total - inserted, "len": tree.len() }))
        }
        CliCommand::Query { snapshot, shape } => {
            let tree = load_tree(&snapshot)?;
            let found = match shape {
                QueryArea::Rect(rect) => tree.query(&rect),
                QueryArea::Circle(circle) => tree.query(&circle),
            };
            debug!(matches = found.len(), "Range query finished");
            Ok(serde_json::to_value(found)?)
        }
        CliCommand::Closest {
            snapshot,
            at,
            count,
            max_distance,
        } => {
            let tree = load_tree(&snapshot)?;
            let search = Point::new(at.0, at.1, ());
            let found = tree.closest(&search, count, max_distance)?;
            let report: Vec<Value> = found
                .into_iter()
                .map(|point| {
                    json!({
                        "x": point.x(),
                        "y": point.y(),
                        "payload": point.payload(),
                        "distance": point.distance_from(&search),
                    })
                })
                .collect();
            Ok(Value::Array(report))
        }
        CliCommand::Merge {
            first,
            second,
            capacity,
            output,
        } => {
            let first = load_tree(&first)?;
            let second = load_tree(&second)?;
            let capacity = capacity.unwrap_or(config.tree.capacity);
            let merged = first.merge_owned(second, capacity)?;
            save_tree(&merged, &output)?;
            info!("Wrote merged snapshot {}", output.display());
            Ok(describe(&merged))
        }
        CliCommand::Stats { snapshot } => {
            let tree = load_tree(&snapshot)?;
            Ok(describe(&tree))
        }
    }
}

fn load_tree(path: &Path) -> anyhow::Result<Tree> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let tree = Tree::from_json_str(&text)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    debug!(points = tree.len(), "Loaded snapshot {}", path.display());
    Ok(tree)
}

fn save_tree(tree: &Tree, path: &Path) -> anyhow::Result<()> {
    let text = tree.to_json_string()?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    Ok(())
}

fn describe(tree: &Tree) -> Value {
    let boundary = tree.boundary();
    json!({
        "boundary": { "x": boundary.x(), "y": boundary.y(), "w": boundary.w(), "h": boundary.h() },
        "capacity": tree.capacity(),
        "depth": tree.depth(),
        "len": tree.len(),
        "stats": tree.stats(),
    })
}
