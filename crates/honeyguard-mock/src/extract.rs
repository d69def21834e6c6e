//! Heuristic intelligence extraction from scammer messages.

use std::ops::Range;
use std::sync::LazyLock;

use honeyguard_schema::ExtractedIntelligence;
use regex::Regex;

static UPI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9.\-_]{2,256}@[a-zA-Z]{2,64}").expect("valid UPI pattern")
});

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[-\w.]|%[\da-fA-F]{2})+").expect("valid link pattern")
});

static IFSC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-z]{4}0[a-z0-9]{6}\b").expect("valid IFSC pattern"));

static ACCOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{9,18}\b").expect("valid account pattern"));

pub fn extract(message: &str) -> ExtractedIntelligence {
    let upi_spans: Vec<Range<usize>> = UPI_PATTERN.find_iter(message).map(|m| m.range()).collect();
    let inside_upi = |range: &Range<usize>| {
        upi_spans
            .iter()
            .any(|upi| upi.start <= range.start && range.end <= upi.end)
    };

    let mut phishing_links: Vec<String> = Vec::new();
    for link in LINK_PATTERN.find_iter(message) {
        if !phishing_links.iter().any(|l| l == link.as_str()) {
            phishing_links.push(link.as_str().to_string());
        }
    }

    let mut bank_parts: Vec<(usize, String)> = ACCOUNT_PATTERN
        .find_iter(message)
        .filter(|m| !inside_upi(&m.range()))
        .map(|m| (m.start(), format!("A/C {}", m.as_str())))
        .collect();
    bank_parts.extend(
        IFSC_PATTERN
            .find_iter(message)
            .filter(|m| !inside_upi(&m.range()))
            .map(|m| (m.start(), format!("IFSC {}", m.as_str().to_ascii_uppercase()))),
    );
    bank_parts.sort_by_key(|(start, _)| *start);

    ExtractedIntelligence {
        upi_id: UPI_PATTERN.find(message).map(|m| m.as_str().to_string()),
        bank_details: (!bank_parts.is_empty()).then(|| {
            bank_parts
                .into_iter()
                .map(|(_, part)| part)
                .collect::<Vec<_>>()
                .join(", ")
        }),
        phishing_links,
    }
}
