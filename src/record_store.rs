use rusqlite::{Connection, OptionalExtension, Result as SqliteResult, params};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;

use crate::extract::Record;
use crate::pipeline::Extraction;

pub struct AssetStore {
    conn: Connection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRun {
    pub id: i64,
    pub fingerprint: String,
    pub sheets: usize,
    pub records: usize,
    pub diagnostics: usize,
    pub created_at: String,
}

impl AssetStore {
    /// Open (or create) the SQLite store
    pub fn new<P: AsRef<Path>>(db_path: P) -> SqliteResult<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fingerprint TEXT NOT NULL,
                sheets INTEGER NOT NULL,
                records INTEGER NOT NULL,
                diagnostics INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        // Records keep their emission order via seq; nothing is deduplicated
        conn.execute(
            "CREATE TABLE IF NOT EXISTS assets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_id INTEGER NOT NULL,
                seq INTEGER NOT NULL,
                name TEXT NOT NULL,
                ipmi TEXT NOT NULL,
                mac TEXT NOT NULL,
                serial TEXT NOT NULL,
                location TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (run_id) REFERENCES runs(id) ON DELETE CASCADE
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_assets_run_seq ON assets(run_id, seq)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_assets_location ON assets(location)",
            [],
        )?;

        info!("Asset store initialized");
        Ok(Self { conn })
    }

    /// Lowercase hex SHA-256 of the records' JSON array
    pub fn fingerprint(records: &[Record]) -> serde_json::Result<String> {
        let json = serde_json::to_vec(records)?;
        let mut hasher = Sha256::new();
        hasher.update(&json);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Store a run and all of its records in one transaction; returns the run id
    pub fn record_run(&mut self, extraction: &Extraction) -> SqliteResult<i64> {
        let fingerprint = Self::fingerprint(&extraction.records)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (fingerprint, sheets, records, diagnostics) VALUES (?1, ?2, ?3, ?4)",
            params![
                fingerprint,
                extraction.sheets.len() as i64,
                extraction.records.len() as i64,
                extraction.diagnostics.len() as i64,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO assets (run_id, seq, name, ipmi, mac, serial, location)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (seq, r) in extraction.records.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    seq as i64,
                    r.name,
                    r.ip,
                    r.mac,
                    r.serial,
                    r.location,
                ])?;
            }
        }

        tx.commit()?;
        info!(run_id, records = extraction.records.len(), fingerprint = %fingerprint, "Run stored");
        Ok(run_id)
    }

    /// Records of a run in emission order
    pub fn get_run_records(&self, run_id: i64) -> SqliteResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, ipmi, mac, serial, location FROM assets
             WHERE run_id = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(Record {
                name: row.get(0)?,
                ip: row.get(1)?,
                mac: row.get(2)?,
                serial: row.get(3)?,
                location: row.get(4)?,
            })
        })?;
        rows.collect()
    }

    pub fn latest_run(&self) -> SqliteResult<Option<StoredRun>> {
        self.conn
            .query_row(
                "SELECT id, fingerprint, sheets, records, diagnostics, created_at
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(StoredRun {
                        id: row.get(0)?,
                        fingerprint: row.get(1)?,
                        sheets: row.get(2)?,
                        records: row.get(3)?,
                        diagnostics: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()
    }

    /// Number of stored runs and records
    pub fn get_counts(&self) -> SqliteResult<(usize, usize)> {
        let runs: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        let assets: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM assets", [], |row| row.get(0))?;
        Ok((runs, assets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extraction() -> Extraction {
        Extraction {
            records: vec![
                Record {
                    name: "Server7".into(),
                    ip: "10.0.0.20".into(),
                    location: "DC1".into(),
                    ..Record::default()
                },
                Record {
                    name: "PDU A - BLUE".into(),
                    location: "DC1".into(),
                    ..Record::default()
                },
            ],
            sheets: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        let mut records = extraction().records;
        let a = AssetStore::fingerprint(&records).unwrap();
        assert_eq!(a, AssetStore::fingerprint(&records).unwrap());
        records.reverse();
        assert_ne!(a, AssetStore::fingerprint(&records).unwrap());
    }

    #[test]
    fn test_fingerprint_field_boundaries() {
        let split = |name: &str, ip: &str| Record {
            name: name.into(),
            ip: ip.into(),
            ..Record::default()
        };
        assert_ne!(
            AssetStore::fingerprint(&[split("ab", "c")]).unwrap(),
            AssetStore::fingerprint(&[split("a", "bc")]).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_is_sha256_of_json() {
        // sha256 of [{"Name":"Server7","ipmi":"10.0.0.20","MAC":"","serial":"","Location":"DC1"}]
        let records = &extraction().records[..1];
        assert_eq!(
            AssetStore::fingerprint(records).unwrap(),
            "9d9a3b0394e216d4805568bd99ebe015f386718a821e0c15af06ef8994eee32c"
        );
        // sha256 of []
        assert_eq!(
            AssetStore::fingerprint(&[]).unwrap(),
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }

    #[test]
    fn test_record_run_round_trip() {
        let mut store = AssetStore::new(":memory:").unwrap();
        assert_eq!(store.latest_run().unwrap(), None);

        let run = extraction();
        let id = store.record_run(&run).unwrap();
        assert_eq!(store.get_run_records(id).unwrap(), run.records);

        let latest = store.latest_run().unwrap().unwrap();
        assert_eq!(latest.id, id);
        assert_eq!(latest.records, 2);
        assert_eq!(latest.fingerprint, AssetStore::fingerprint(&run.records).unwrap());
    }

    #[test]
    fn test_repeated_runs_are_not_merged() {
        let mut store = AssetStore::new(":memory:").unwrap();
        store.record_run(&extraction()).unwrap();
        store.record_run(&extraction()).unwrap();
        assert_eq!(store.get_counts().unwrap(), (2, 4));
    }
}
