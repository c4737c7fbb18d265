use std::sync::LazyLock;

use regex::Regex;

// MAC in "xxxx.xxxx.xxxx" or "xx:xx:xx:xx:xx:xx" form; hex digits are not checked.
pub static MAC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9]{4}\.[A-Za-z0-9]{4}\.[A-Za-z0-9]{4}|(?:[A-Za-z0-9]{2}[:.]){5}[A-Za-z0-9]{2}")
        .expect("static regex must compile")
});

// The 4th octet may hold "Z" placeholders.
pub static IP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.[0-9Z]{1,3}").expect("static regex must compile")
});

pub static SERIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]{7,8}").expect("static regex must compile"));

pub static COMPACT_SWITCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SW - .{4}\..{4}\..{4}").expect("static regex must compile")
});

pub static MULTILINE_IP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\d{1,3}\.\d{1,3}\.\d{1,3}\.[0-9Z]{1,3}").expect("static regex must compile")
});

pub static PDU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PDU [AB] - (?:BLUE|RED)").expect("static regex must compile"));

pub static TAGGED_SWITCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SW.+?TAG:").expect("static regex must compile"));

pub fn find_ip(text: &str) -> Option<&str> {
    IP_RE.find(text).map(|m| m.as_str())
}

pub fn find_mac(text: &str) -> Option<&str> {
    MAC_RE.find(text).map(|m| m.as_str())
}

pub fn find_serial(text: &str) -> Option<&str> {
    SERIAL_RE.find(text).map(|m| m.as_str())
}
