use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::extract::{Record, build_records};
use crate::grid::{self, Sheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub title: String,
    pub anchor_found: bool,
    pub candidates: usize,
    pub records: usize,
    pub skipped: usize,
}

/// Output of one run over all sheets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub sheets: Vec<SheetSummary>,
    pub diagnostics: Vec<ExtractError>,
}

struct SheetRun {
    summary: SheetSummary,
    records: Vec<Record>,
    diagnostics: Vec<ExtractError>,
}

fn run_sheet(sheet: &Sheet, header_marker: &str) -> SheetRun {
    let (windows, cells) = match grid::scan(sheet, header_marker) {
        Ok(scanned) => scanned,
        Err(e) => {
            warn!(sheet = %sheet.title, error = %e, "Skipping sheet");
            return SheetRun {
                summary: SheetSummary {
                    title: sheet.title.clone(),
                    anchor_found: !matches!(e, ExtractError::AnchorNotFound { .. }),
                    candidates: 0,
                    records: 0,
                    skipped: 0,
                },
                records: Vec::new(),
                diagnostics: vec![e],
            };
        }
    };

    let built = build_records(&sheet.title, &cells);
    let filled: usize = built.records.iter().map(|r| r.coverage().0).sum();
    debug!(
        sheet = %sheet.title,
        header_row = windows.header_row,
        anchor_col = windows.anchor_col,
        candidates = cells.len(),
        records = built.records.len(),
        skipped = built.diagnostics.len(),
        fields_filled = filled,
        "Sheet processed"
    );

    SheetRun {
        summary: SheetSummary {
            title: sheet.title.clone(),
            anchor_found: true,
            candidates: cells.len(),
            records: built.records.len(),
            skipped: built.diagnostics.len(),
        },
        records: built.records,
        diagnostics: built.diagnostics,
    }
}

/// Process every sheet independently and concatenate the results in sheet order.
pub fn run_sheets(sheets: &[Sheet], header_marker: &str, mode: Mode) -> Extraction {
    let runs: Vec<SheetRun> = match mode {
        Mode::Sequential => sheets.iter().map(|s| run_sheet(s, header_marker)).collect(),
        Mode::Parallel => sheets.par_iter().map(|s| run_sheet(s, header_marker)).collect(),
    };

    let mut extraction = Extraction::default();
    for run in runs {
        extraction.sheets.push(run.summary);
        extraction.records.extend(run.records);
        extraction.diagnostics.extend(run.diagnostics);
    }
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RawCell;

    fn cell(row: u32, col: u32, value: &str) -> RawCell {
        RawCell {
            row,
            col,
            value: value.to_string(),
        }
    }

    fn sheets() -> Vec<Sheet> {
        vec![
            Sheet {
                title: "DC1".into(),
                cells: vec![
                    cell(1, 1, "Electricity"),
                    cell(2, 1, "Server7"),
                    cell(2, 2, "10.0.0.20"),
                    cell(2, 6, "PDU A - BLUE"),
                ],
            },
            Sheet {
                title: "Notes".into(),
                cells: vec![cell(1, 1, "nothing here")],
            },
            Sheet {
                title: "DC2".into(),
                cells: vec![
                    cell(0, 0, "Electricity"),
                    cell(1, 0, "Rack2\n10.0.0.9"),
                    cell(2, 0, "SN99887766"),
                    cell(3, 0, "SW - 00aa.bb11.cc22"),
                ],
            },
        ]
    }

    #[test]
    fn test_sheet_order_and_locations() {
        let out = run_sheets(&sheets(), "Electricity", Mode::Sequential);
        let got: Vec<(&str, &str)> = out
            .records
            .iter()
            .map(|r| (r.name.as_str(), r.location.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![("Server7", "DC1"), ("PDU A - BLUE", "DC1"), ("Rack2", "DC2")]
        );
    }

    #[test]
    fn test_faults_do_not_stop_other_sheets() {
        let out = run_sheets(&sheets(), "Electricity", Mode::Sequential);
        assert_eq!(out.diagnostics.len(), 2);
        assert!(matches!(out.diagnostics[0], ExtractError::AnchorNotFound { .. }));
        assert!(matches!(out.diagnostics[1], ExtractError::StructuralMismatch { .. }));

        let notes = &out.sheets[1];
        assert!(!notes.anchor_found);
        assert_eq!(notes.records, 0);

        let dc2 = &out.sheets[2];
        assert_eq!((dc2.candidates, dc2.records, dc2.skipped), (3, 1, 1));
    }

    #[test]
    fn test_oversized_anchor_only_drops_its_sheet() {
        let mut input = sheets();
        input.insert(
            0,
            Sheet {
                title: "Edge".into(),
                cells: vec![cell(1, u32::MAX - 2, "Electricity"), cell(2, u32::MAX, "Server9")],
            },
        );
        let out = run_sheets(&input, "Electricity", Mode::Parallel);
        assert!(matches!(out.diagnostics[0], ExtractError::WindowOutOfRange { .. }));
        assert_eq!(out.sheets[0].records, 0);
        assert_eq!(out.records.len(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let input = sheets();
        assert_eq!(
            run_sheets(&input, "Electricity", Mode::Parallel),
            run_sheets(&input, "Electricity", Mode::Sequential)
        );
    }

    #[test]
    fn test_no_sheets() {
        assert_eq!(run_sheets(&[], "Electricity", Mode::Parallel), Extraction::default());
    }
}
