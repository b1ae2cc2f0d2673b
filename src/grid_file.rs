//! Plain-text save format (`grid-data.txt`).
//!
//! One record per cell, in index order:
//!
//! ```text
//! C12:
//! class: spike, class-2, rotated
//! color: gray
//! shape: triangle
//! dir: 90
//!
//! ```
//!
//! Loading is best effort: unknown keys and malformed lines are logged and
//! skipped, records outside the grid are ignored, and only the cells named by
//! a record are touched.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::cell::{normalize_rotation, Shape};
use crate::grid::GridState;

pub const SAVE_FILE_NAME: &str = "grid-data.txt";
const NONE: &str = "none";

/// What a load did to the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub records_applied: usize,
    pub records_skipped: usize,
    pub warnings: Vec<String>,
}

pub fn save_to_string(grid: &GridState) -> String {
    let mut out = String::new();
    for (index, cell) in grid.cells() {
        let class = if cell.tags().is_empty() {
            NONE.to_string()
        } else {
            cell.tags().join(", ")
        };
        let shape = cell.shape().map_or(NONE, |s| s.name());
        let dir = cell
            .assigned_rotation()
            .map_or_else(|| NONE.to_string(), |r| r.to_string());

        // Writing to a String cannot fail
        let _ = writeln!(out, "C{}:", index + 1);
        let _ = writeln!(out, "class: {}", class);
        let _ = writeln!(out, "color: {}", cell.color().unwrap_or(NONE));
        let _ = writeln!(out, "shape: {}", shape);
        let _ = writeln!(out, "dir: {}", dir);
        out.push('\n');
    }
    out
}

pub fn save_to_file<P: AsRef<Path>>(grid: &GridState, path: P) -> io::Result<()> {
    fs::write(path.as_ref(), save_to_string(grid))?;
    log::info!("Grid saved to {}", path.as_ref().display());
    Ok(())
}

/// `C<n>:` header. The inner value is `None` when `n` does not fit a `usize`.
fn parse_header(line: &str) -> Option<Option<usize>> {
    let digits = line.strip_prefix('C')?.strip_suffix(':')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().ok())
}

/// Where the lines following the latest header go.
enum Target {
    BeforeFirstRecord,
    Cell(usize),
    Skipped,
}

pub fn load_from_str(grid: &mut GridState, content: &str) -> LoadSummary {
    let mut summary = LoadSummary::default();
    let mut target = Target::BeforeFirstRecord;

    for (line_number, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(number) = parse_header(line) {
            let index = number
                .and_then(|n| n.checked_sub(1))
                .filter(|&i| i < grid.len());
            target = match index {
                Some(index) => {
                    summary.records_applied += 1;
                    Target::Cell(index)
                }
                None => {
                    log::debug!("Skipping record {}: outside the grid", line);
                    summary.records_skipped += 1;
                    Target::Skipped
                }
            };
            continue;
        }

        let index = match target {
            Target::Cell(index) => index,
            Target::BeforeFirstRecord | Target::Skipped => continue,
        };

        let Some((key, value)) = line.split_once(':') else {
            warn(&mut summary, format!("Line {}: malformed line {:?}", line_number + 1, line));
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        let Some(cell) = grid.cell_mut(index) else {
            continue;
        };
        match key {
            "class" => {
                cell.clear_tags();
                cell.apply_shape(None);
                for token in value.split(", ").map(str::trim) {
                    if token.is_empty() || token == NONE {
                        continue;
                    }
                    // Older saves list the shape among the classes
                    match Shape::from_name(token) {
                        Some(shape) => cell.apply_shape(Some(shape)),
                        None => cell.add_tag(token),
                    }
                }
            }
            "color" => {
                let color = (value != NONE).then(|| value.to_string());
                cell.set_color(color);
            }
            "shape" => {
                cell.apply_shape(None);
                if value != NONE {
                    match Shape::from_name(value) {
                        Some(shape) => cell.apply_shape(Some(shape)),
                        None => warn(
                            &mut summary,
                            format!("Line {}: unknown shape {:?}", line_number + 1, value),
                        ),
                    }
                }
            }
            "dir" => {
                if value == NONE {
                    cell.set_rotation(None);
                } else {
                    let degrees = parse_leading_int(value).unwrap_or(0);
                    if i64::from(normalize_rotation(degrees)) != degrees {
                        warn(
                            &mut summary,
                            format!("Line {}: direction {:?} snapped to a quarter turn", line_number + 1, value),
                        );
                    }
                    cell.set_rotation(Some(degrees));
                }
            }
            _ => warn(&mut summary, format!("Unrecognized property: {}", key)),
        }
    }

    log::info!(
        "Loaded {} cell records ({} skipped, {} warnings)",
        summary.records_applied,
        summary.records_skipped,
        summary.warnings.len()
    );
    summary
}

pub fn load_from_file<P: AsRef<Path>>(grid: &mut GridState, path: P) -> io::Result<LoadSummary> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(load_from_str(grid, &content))
}

fn warn(summary: &mut LoadSummary, message: String) {
    log::warn!("{}", message);
    summary.warnings.push(message);
}

/// Integer at the start of `value` ("90deg" reads as 90).
fn parse_leading_int(value: &str) -> Option<i64> {
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse().ok()
}
