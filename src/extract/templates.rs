use std::fmt;

use super::patterns::{COMPACT_SWITCH_RE, MULTILINE_IP_RE, PDU_RE, TAGGED_SWITCH_RE};

/// Structural shape of a cell's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// `<name> SW - xxxx.xxxx.xxxx - <ip> - <serial>` in one cell.
    CompactSwitch,
    /// Name on the first line, address on a later line; serial in the next cell.
    MultilineIp,
    /// `PDU A - BLUE` and friends.
    Pdu,
    /// `<name> SW ... TAG: ...`
    TaggedSwitch,
    /// Bare fragment, grouped with its neighbours.
    Fragment,
}

impl Template {
    pub fn label(self) -> &'static str {
        match self {
            Template::CompactSwitch => "compact switch",
            Template::MultilineIp => "multiline ip",
            Template::Pdu => "pdu",
            Template::TaggedSwitch => "tagged switch",
            Template::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct Rule {
    template: Template,
    matches: fn(&str) -> bool,
}

/// Checked top to bottom, first hit wins.
const RULES: [Rule; 4] = [
    Rule {
        template: Template::CompactSwitch,
        matches: is_compact_switch,
    },
    Rule {
        template: Template::MultilineIp,
        matches: is_multiline_ip,
    },
    Rule {
        template: Template::Pdu,
        matches: is_pdu,
    },
    Rule {
        template: Template::TaggedSwitch,
        matches: is_tagged_switch,
    },
];

// A tagged switch also carries the compact marker; it must not land here.
fn is_compact_switch(text: &str) -> bool {
    COMPACT_SWITCH_RE.is_match(text) && !TAGGED_SWITCH_RE.is_match(text)
}

fn is_multiline_ip(text: &str) -> bool {
    MULTILINE_IP_RE.is_match(text)
}

fn is_pdu(text: &str) -> bool {
    PDU_RE.is_match(text)
}

fn is_tagged_switch(text: &str) -> bool {
    TAGGED_SWITCH_RE.is_match(text)
}

/// Decide which template a cell's text follows.
pub fn classify(text: &str) -> Template {
    RULES
        .iter()
        .find(|rule| (rule.matches)(text))
        .map(|rule| rule.template)
        .unwrap_or(Template::Fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_switch() {
        assert_eq!(
            classify("Rack1 SW - 00aa.bb11.cc22 - 10.0.0.5 - AB12CD34"),
            Template::CompactSwitch
        );
    }

    #[test]
    fn test_tag_beats_compact() {
        assert_eq!(classify("SW - AB12.CD34.EF56 TAG: x"), Template::TaggedSwitch);
    }

    #[test]
    fn test_multiline_ip() {
        assert_eq!(classify("Rack2\n10.0.0.9"), Template::MultilineIp);
        assert_eq!(classify("Rack2\n10.0.0.Z"), Template::MultilineIp);
        // Address on the first line does not count.
        assert_eq!(classify("10.0.0.9"), Template::Fragment);
    }

    #[test]
    fn test_multiline_beats_pdu() {
        assert_eq!(classify("PDU A - RED\n10.1.1.1"), Template::MultilineIp);
    }

    #[test]
    fn test_pdu_variants() {
        for text in ["PDU A - BLUE outlet 3", "x PDU A - RED", "PDU B - BLUE", "PDU B - RED 10.0.0.1"] {
            assert_eq!(classify(text), Template::Pdu, "{text}");
        }
        assert_eq!(classify("PDU C - RED"), Template::Fragment);
        assert_eq!(classify("PDU A - GREEN"), Template::Fragment);
    }

    #[test]
    fn test_tagged_switch() {
        assert_eq!(classify("Core SW FDO1234X TAG: 4411"), Template::TaggedSwitch);
        // Nothing between the marker and the tag.
        assert_eq!(classify("SWTAG:"), Template::Fragment);
    }

    #[test]
    fn test_fragment() {
        assert_eq!(classify("Server7"), Template::Fragment);
        assert_eq!(classify(""), Template::Fragment);
    }
}
