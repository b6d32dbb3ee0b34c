//! Formatting helpers for JSON bodies and header text

use std::collections::BTreeMap;

/// Pretty-print JSON with two-space indentation, keeping key order
pub fn format_json(input: &str) -> Result<String, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    serde_json::to_string_pretty(&value)
}

pub fn is_valid_json(input: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(input).is_ok()
}

/// Pretty-print `body` when it is valid JSON, otherwise return it untouched
pub fn prettify_body(body: &str) -> String {
    if is_valid_json(body) {
        format_json(body).unwrap_or_else(|_| body.to_string())
    } else {
        body.to_string()
    }
}

/// Parse `Key: Value` lines into a map. Blank lines, lines without a colon
/// and lines with an empty key are skipped; later duplicates win.
pub fn parse_headers(input: &str) -> BTreeMap<String, String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Inverse of [`parse_headers`], one header per line in key order
pub fn format_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shorten `s` to at most `max_len` characters, ending with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Human readable byte count: "512 B", "1.5 KB", "2.0 MB"
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    let prefix = ['K', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {}B", bytes as f64 / div as f64, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_json_with_two_spaces() {
        assert_eq!(format_json(r#"{"ok":true}"#).unwrap(), "{\n  \"ok\": true\n}");
    }

    #[test]
    fn keeps_key_order() {
        let pretty = format_json(r#"{"b":1,"a":2}"#).unwrap();
        assert!(pretty.find("\"b\"").unwrap() < pretty.find("\"a\"").unwrap());
    }

    #[test]
    fn prettify_leaves_plain_text_alone() {
        assert_eq!(prettify_body("hello world"), "hello world");
        assert!(!is_valid_json("{oops"));
    }

    #[test]
    fn parses_header_lines() {
        let headers = parse_headers("Content-Type: application/json\n\n  Authorization: Bearer a:b \nbogus\n: empty");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["Authorization"], "Bearer a:b");
    }

    #[test]
    fn header_text_round_trips_as_map() {
        let headers = parse_headers("X-B: 2\nX-A: 1");
        assert_eq!(format_headers(&headers), "X-A: 1\nX-B: 2");
        assert_eq!(parse_headers(&format_headers(&headers)), headers);
    }

    #[test]
    fn truncates_long_strings() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("https://api.example.com/a/very/long/path", 20), "https://api.examp...");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(11), "11 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
