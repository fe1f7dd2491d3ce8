//! Table loading for a single load case
//!
//! A case is four headerless comma-separated files in one directory:
//!
//! | file                    | columns                                  |
//! |-------------------------|------------------------------------------|
//! | `con_<case>.csv`        | start node, end node, area, material     |
//! | `coord_<case>.csv`      | x, y, z                                  |
//! | `forces_<case>.csv`     | node, axis code, magnitude               |
//! | `constraints_<case>.csv`| node, axis code, magnitude               |
//!
//! Rows come back 0-indexed in file order. Node references inside rows stay
//! 1-based.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;
use crate::error::{PrepError, PrepResult};

pub const TOPOLOGY_PREFIX: &str = "con";
pub const COORDINATES_PREFIX: &str = "coord";
pub const FORCES_PREFIX: &str = "forces";
pub const CONSTRAINTS_PREFIX: &str = "constraints";

/// One member of the topology table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyRow {
    pub start: NodeId,
    pub end: NodeId,
    pub area: f64,
    pub material: String,
}

/// One row of the coordinate table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A force or constraint row: node, axis code, magnitude
///
/// The axis code is kept raw here and decoded by [`crate::dof::decode`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalRow {
    pub node: NodeId,
    pub axis_code: i64,
    pub magnitude: f64,
}

/// All input tables of one case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseTables {
    pub case: String,
    pub topology: Vec<TopologyRow>,
    pub coordinates: Vec<CoordinateRow>,
    pub forces: Vec<DirectionalRow>,
    pub constraints: Vec<DirectionalRow>,
}

impl CaseTables {
    /// Read the four tables of `case` from `dir`
    pub fn load(dir: &Path, case: &str) -> PrepResult<Self> {
        let topology = read_table(dir, TOPOLOGY_PREFIX, case, parse_topology)?;
        let coordinates = read_table(dir, COORDINATES_PREFIX, case, parse_coordinates)?;
        let forces = read_table(dir, FORCES_PREFIX, case, parse_directional)?;
        let constraints = read_table(dir, CONSTRAINTS_PREFIX, case, parse_directional)?;

        tracing::info!(
            "Loaded case {} from {:?}: {} members, {} nodes, {} forces, {} constraints",
            case,
            dir,
            topology.len(),
            coordinates.len(),
            forces.len(),
            constraints.len()
        );

        Ok(Self {
            case: case.to_string(),
            topology,
            coordinates,
            forces,
            constraints,
        })
    }
}

/// Path of the `prefix` table for `case`
pub fn table_path(dir: &Path, prefix: &str, case: &str) -> PathBuf {
    dir.join(format!("{}_{}.csv", prefix, case))
}

fn read_table<T>(
    dir: &Path,
    prefix: &str,
    case: &str,
    parse: fn(&str, &str) -> PrepResult<Vec<T>>,
) -> PrepResult<Vec<T>> {
    let path = table_path(dir, prefix, case);
    let content = fs::read_to_string(&path).map_err(|e| PrepError::io(&path, e))?;
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| prefix.to_string());
    parse(&file, &content)
}

/// Parse topology rows: start node, end node, area, material name
pub fn parse_topology(file: &str, content: &str) -> PrepResult<Vec<TopologyRow>> {
    records(file, content)
        .map(|rec| -> PrepResult<TopologyRow> {
            Ok(TopologyRow {
                start: NodeId(rec.id(0, "start node")?),
                end: NodeId(rec.id(1, "end node")?),
                area: rec.real(2, "area")?,
                material: rec.text(3, "material")?.to_string(),
            })
        })
        .collect()
}

/// Parse coordinate rows: x, y, z
pub fn parse_coordinates(file: &str, content: &str) -> PrepResult<Vec<CoordinateRow>> {
    records(file, content)
        .map(|rec| -> PrepResult<CoordinateRow> {
            Ok(CoordinateRow {
                x: rec.real(0, "x")?,
                y: rec.real(1, "y")?,
                z: rec.real(2, "z")?,
            })
        })
        .collect()
}

/// Parse force or constraint rows: node, axis code, magnitude
///
/// These tables are numeric throughout, so node and axis code may be
/// written as integral reals (`4.0`).
pub fn parse_directional(file: &str, content: &str) -> PrepResult<Vec<DirectionalRow>> {
    records(file, content)
        .map(|rec| -> PrepResult<DirectionalRow> {
            let node = rec.integral(0, "node")?;
            let node = usize::try_from(node)
                .map_err(|_| rec.error("node", format!("{} is negative", node)))?;
            Ok(DirectionalRow {
                node: NodeId(node),
                axis_code: rec.integral(1, "axis code")?,
                magnitude: rec.real(2, "magnitude")?,
            })
        })
        .collect()
}

/// A non-blank line split into trimmed fields
struct Record<'a> {
    file: &'a str,
    line: usize,
    fields: Vec<String>,
}

fn records<'a>(file: &'a str, content: &'a str) -> impl Iterator<Item = Record<'a>> + 'a {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(move |(idx, line)| Record {
            file,
            line: idx + 1,
            fields: split_fields(line),
        })
}

/// Split on commas outside double quotes
///
/// Quotes are removed and `""` inside a quoted field stands for one `"`.
/// Each field is trimmed after unquoting.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

impl<'a> Record<'a> {
    fn error(&self, field: &'static str, message: String) -> PrepError {
        PrepError::Parse {
            file: self.file.to_string(),
            line: self.line,
            field,
            message,
        }
    }

    fn text(&self, idx: usize, field: &'static str) -> PrepResult<&str> {
        match self.fields.get(idx) {
            Some(value) if !value.is_empty() => Ok(value.as_str()),
            _ => Err(self.error(field, format!("missing column {}", idx + 1))),
        }
    }

    fn real(&self, idx: usize, field: &'static str) -> PrepResult<f64> {
        let raw = self.text(idx, field)?;
        let value: f64 = raw
            .parse()
            .map_err(|_| self.error(field, format!("'{}' is not a number", raw)))?;
        if !value.is_finite() {
            return Err(self.error(field, format!("'{}' is not finite", raw)));
        }
        Ok(value)
    }

    fn id(&self, idx: usize, field: &'static str) -> PrepResult<usize> {
        let raw = self.text(idx, field)?;
        raw.parse()
            .map_err(|_| self.error(field, format!("'{}' is not a non-negative integer", raw)))
    }

    fn integral(&self, idx: usize, field: &'static str) -> PrepResult<i64> {
        let raw = self.text(idx, field)?;
        if let Ok(value) = raw.parse::<i64>() {
            return Ok(value);
        }
        let value = self.real(idx, field)?;
        if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
            return Err(self.error(field, format!("'{}' is not an integer", raw)));
        }
        Ok(value as i64)
    }
}
