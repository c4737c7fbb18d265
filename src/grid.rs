// src/grid.rs

use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{debug, info};

use crate::error::ExtractError;

/// Placeholder text the sheet authors put in cells they left blank on purpose.
const PLACEHOLDER: &str = "empty";

/// Width of one half, in columns.
const HALF_WIDTH: u32 = 5;

/// A raw grid cell as delivered by the fetch layer.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCell {
    pub row: u32,
    pub col: u32,
    #[serde(default)]
    pub value: String,
}

/// One fetched sheet: its title becomes the Location of every record.
#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub title: String,
    #[serde(default)]
    pub cells: Vec<RawCell>,
}

/// Read the fetched grid: a JSON array of sheets.
pub fn load_sheets(path: impl AsRef<Path>) -> Result<Vec<Sheet>, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let sheets: Vec<Sheet> = serde_json::from_str(&content)?;
    info!(path = %path.display(), sheets = sheets.len(), "Loaded grid");
    Ok(sheets)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    First,
    Second,
}

/// A candidate cell: non-empty, below the header row, inside one of the halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub text: String,
    pub half: Half,
}

impl Cell {
    /// True when both cells sit in the same half of the same grid row.
    pub fn shares_slot(&self, other: &Cell) -> bool {
        self.half == other.half && self.row == other.row
    }
}

/// Column windows derived once from the header anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    pub header_row: u32,
    pub anchor_col: u32,
    pub mid_col: u32,
    pub last_col: u32,
}

impl Windows {
    /// None when the windows would run past the last addressable column.
    pub fn from_anchor(header_row: u32, anchor_col: u32) -> Option<Self> {
        let mid_col = anchor_col.checked_add(HALF_WIDTH)?;
        let last_col = mid_col.checked_add(HALF_WIDTH - 1)?;
        Some(Self {
            header_row,
            anchor_col,
            mid_col,
            last_col,
        })
    }

    /// Half a cell falls in, or None when it is outside both windows or not
    /// below the header row.
    pub fn locate(&self, row: u32, col: u32) -> Option<Half> {
        if row <= self.header_row || col < self.anchor_col || col > self.last_col {
            return None;
        }
        Some(if col < self.mid_col { Half::First } else { Half::Second })
    }
}

/// Walk the grid row-major and emit the candidate cells.
///
/// The first cell whose text equals `header_marker` fixes the windows; cells
/// seen before it are never emitted. A sheet without the marker yields
/// `AnchorNotFound`.
pub fn scan(sheet: &Sheet, header_marker: &str) -> Result<(Windows, Vec<Cell>), ExtractError> {
    let mut ordered: Vec<&RawCell> = sheet.cells.iter().collect();
    ordered.sort_by_key(|c| (c.row, c.col));

    let mut windows: Option<Windows> = None;
    let mut candidates = Vec::new();

    for raw in ordered {
        if windows.is_none() && raw.value == header_marker {
            let w = Windows::from_anchor(raw.row, raw.col).ok_or_else(|| {
                ExtractError::WindowOutOfRange {
                    sheet: sheet.title.clone(),
                    row: raw.row,
                    col: raw.col,
                }
            })?;
            debug!(sheet = %sheet.title, row = w.header_row, col = w.anchor_col, "Anchor found");
            windows = Some(w);
        }

        let Some(w) = windows else {
            continue;
        };

        if raw.value.is_empty() || raw.value == PLACEHOLDER {
            continue;
        }

        if let Some(half) = w.locate(raw.row, raw.col) {
            candidates.push(Cell {
                row: raw.row,
                col: raw.col,
                text: raw.value.clone(),
                half,
            });
        }
    }

    match windows {
        Some(w) => Ok((w, candidates)),
        None => Err(ExtractError::AnchorNotFound {
            sheet: sheet.title.clone(),
            marker: header_marker.to_string(),
        }),
    }
}
