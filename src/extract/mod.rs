// src/extract/mod.rs

pub mod builder;
pub mod patterns;
pub mod templates;

use serde::Deserialize;
use serde::Serialize;

/// One asset extracted from a sheet. Field names on the wire follow the
/// inventory import format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ipmi")]
    pub ip: String,
    #[serde(rename = "MAC")]
    pub mac: String,
    #[serde(rename = "serial")]
    pub serial: String,
    #[serde(rename = "Location")]
    pub location: String,
}

impl Record {
    pub fn named(name: impl Into<String>, location: &str) -> Self {
        Self {
            name: name.into(),
            location: location.to_string(),
            ..Self::default()
        }
    }

    /// Fill IP and MAC from the first matching substrings of `text`.
    pub fn assign_ip_mac(&mut self, text: &str) {
        self.ip = patterns::find_ip(text).unwrap_or_default().to_string();
        self.mac = patterns::find_mac(text).unwrap_or_default().to_string();
    }

    /// How many of the optional fields were filled (out of IP, MAC, serial).
    pub fn coverage(&self) -> (usize, usize) {
        let filled = [&self.ip, &self.mac, &self.serial]
            .iter()
            .filter(|v| !v.is_empty())
            .count();
        (filled, 3)
    }
}

pub use builder::build_records;
