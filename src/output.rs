use std::fs;
use std::path::Path;

use tracing::info;

use crate::extract::Record;

/// JSON array with one record object per line.
pub fn render_json(records: &[Record]) -> serde_json::Result<String> {
    let lines = records
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(format!("[{}]", lines.join(",\n")))
}

pub fn write_json(path: impl AsRef<Path>, records: &[Record]) -> Result<(), Box<dyn std::error::Error>> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, render_json(records)?)?;
    info!(path = %path.display(), records = records.len(), "Wrote JSON output");
    Ok(())
}

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS t1 (
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
    name VARCHAR(32),
    ipmi VARCHAR(32),
    MAC VARCHAR(32),
    serial VARCHAR(32),
    location VARCHAR(32) NOT NULL
) ENGINE=INNODB;";

fn sql_value(v: &str) -> String {
    if v.is_empty() {
        "NULL".to_string()
    } else {
        format!("'{}'", v.replace('\'', "''"))
    }
}

/// MySQL import script: table definition plus one multi-row INSERT.
pub fn render_sql(records: &[Record]) -> String {
    if records.is_empty() {
        return format!("{CREATE_TABLE}\n");
    }

    let tuples: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "({},{},{},{},'{}')",
                sql_value(&r.name),
                sql_value(&r.ip),
                sql_value(&r.mac),
                sql_value(&r.serial),
                r.location.replace('\'', "''"),
            )
        })
        .collect();

    format!(
        "{CREATE_TABLE}\n\nINSERT INTO t1 (name,ipmi,MAC,serial,location) VALUES\n{};\n",
        tuples.join(",\n")
    )
}

pub fn write_sql(path: impl AsRef<Path>, records: &[Record]) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, render_sql(records))?;
    info!(path = %path.display(), records = records.len(), "Wrote SQL script");
    Ok(())
}
