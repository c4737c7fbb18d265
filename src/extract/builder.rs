use tracing::{debug, warn};

use super::Record;
use super::patterns::{PDU_RE, find_ip, find_mac, find_serial};
use super::templates::{Template, classify};
use crate::error::ExtractError;
use crate::grid::Cell;

const FIELD_DELIMITER: &str = " - ";
const SWITCH_MARKER: &str = "SW";

/// Records assembled from one sheet, plus the cells that could not be used.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Built {
    pub records: Vec<Record>,
    pub diagnostics: Vec<ExtractError>,
}

/// Outcome of handling the cell under the cursor.
struct Step {
    record: Option<Record>,
    consumed: usize,
    issue: Option<ExtractError>,
}

impl Step {
    fn emit(record: Record, consumed: usize) -> Self {
        Self {
            record: Some(record),
            consumed,
            issue: None,
        }
    }

    fn skip(issue: ExtractError) -> Self {
        Self {
            record: None,
            consumed: 1,
            issue: Some(issue),
        }
    }
}

/// Turn the ordered candidate cells of one sheet into records.
///
/// The cursor only moves forward; every cell feeds at most one record.
pub fn build_records(location: &str, cells: &[Cell]) -> Built {
    let mut built = Built::default();
    let mut i = 0;

    while i < cells.len() {
        let template = classify(&cells[i].text);
        debug!(row = cells[i].row, col = cells[i].col, template = %template, "Classified cell");

        let step = match template {
            Template::CompactSwitch => compact_switch(&cells[i], location),
            Template::MultilineIp => multiline_ip(cells, i, location),
            Template::Pdu => pdu(&cells[i], location),
            Template::TaggedSwitch => tagged_switch(&cells[i], location),
            Template::Fragment => fragment_group(cells, i, location),
        };

        if let Some(issue) = step.issue {
            warn!(sheet = %location, error = %issue, "Structural mismatch");
            built.diagnostics.push(issue);
        }
        if let Some(record) = step.record {
            built.records.push(record);
        }
        i += step.consumed.max(1);
    }

    built
}

/// `<name> - <mac> - <ip> - <serial>`
fn compact_switch(cell: &Cell, location: &str) -> Step {
    let parts: Vec<&str> = cell.text.split(FIELD_DELIMITER).collect();
    if parts.len() < 4 {
        return Step::skip(ExtractError::StructuralMismatch {
            row: cell.row,
            col: cell.col,
            template: Template::CompactSwitch.label(),
            reason: format!("expected 4 parts, found {}", parts.len()),
        });
    }

    Step::emit(
        Record {
            name: parts[0].to_string(),
            mac: parts[1].to_string(),
            ip: parts[2].to_string(),
            serial: parts[3].to_string(),
            location: location.to_string(),
        },
        1,
    )
}

// The serial sits in the next candidate cell.
fn multiline_ip(cells: &[Cell], i: usize, location: &str) -> Step {
    let cell = &cells[i];
    let name = cell.text.split('\n').next().unwrap_or_default();
    let mut record = Record::named(name, location);
    record.assign_ip_mac(&cell.text);

    match cells.get(i + 1) {
        Some(next) => {
            record.serial = next.text.clone();
            Step::emit(record, 2)
        }
        None => Step {
            record: Some(record),
            consumed: 1,
            issue: Some(ExtractError::StructuralMismatch {
                row: cell.row,
                col: cell.col,
                template: Template::MultilineIp.label(),
                reason: "no following cell for the serial".to_string(),
            }),
        },
    }
}

fn pdu(cell: &Cell, location: &str) -> Step {
    let name = PDU_RE.find(&cell.text).map(|m| m.as_str()).unwrap_or_default();
    let mut record = Record::named(name, location);
    record.assign_ip_mac(&cell.text);
    Step::emit(record, 1)
}

fn tagged_switch(cell: &Cell, location: &str) -> Step {
    let prefix = cell.text.split(SWITCH_MARKER).next().unwrap_or_default();
    let name = format!("{prefix}{SWITCH_MARKER}");
    let mut record = Record::named(name.trim(), location);
    record.assign_ip_mac(&cell.text);
    record.serial = find_serial(&cell.text).unwrap_or_default().to_string();
    Step::emit(record, 1)
}

/// Merge the run of cells sharing the head cell's half and row into one record.
///
/// The head is the name; each member after it is an IP, a MAC, or otherwise
/// the serial (last one wins).
fn fragment_group(cells: &[Cell], i: usize, location: &str) -> Step {
    let head = &cells[i];
    let mut record = Record::named(head.text.trim(), location);
    let mut consumed = 1;

    for member in cells[i + 1..].iter().take_while(|c| c.shares_slot(head)) {
        if let Some(ip) = find_ip(&member.text) {
            record.ip = ip.to_string();
        } else if let Some(mac) = find_mac(&member.text) {
            record.mac = mac.to_string();
        } else {
            record.serial = member.text.clone();
        }
        consumed += 1;
    }

    Step::emit(record, consumed)
}
