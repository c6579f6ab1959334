//! Parser for the flat `key=value` properties format used by `key.properties`.
//!
//! Follows the line rules of `java.util.Properties`, which Gradle uses to
//! read the same file:
//! - lines end at `\n`, `\r\n` or a lone `\r`
//! - `#` or `!` as the first non-blank character marks a comment
//! - the first unescaped `=` or `:` separates key from value
//! - a trailing backslash continues the entry on the next line
//! - `\t`, `\n`, `\r`, `\f`, `\uXXXX` and `\<char>` escapes
//!
//! Lines without a separator are skipped rather than rejected.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroize;

/// Parsed key/value pairs from a properties file.
///
/// Values are wiped from memory when the map is dropped, since the map
/// usually carries keystore passwords.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parses properties content. Never fails: malformed lines are skipped.
    pub fn parse(content: &str) -> Self {
        let mut entries = BTreeMap::new();
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
        let mut lines = Lines { rest: content };

        while let Some(line) = lines.next() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with(['#', '!']) {
                continue;
            }

            let mut logical = line.to_string();
            while has_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            if let Some((key, value)) = split_entry(&logical) {
                entries.insert(key, value);
            }
            logical.zeroize();
        }

        Self { entries }
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Drop for Properties {
    fn drop(&mut self) {
        for value in self.entries.values_mut() {
            value.zeroize();
        }
    }
}

// Values are left out so passwords never reach logs.
impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Line iterator that also accepts a lone `\r` as a terminator.
struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.find(['\n', '\r']) {
            Some(idx) => {
                let line = &self.rest[..idx];
                let skip = if self.rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[idx + skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}

/// A line continues when it ends in an odd number of backslashes.
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped `=` or `:`.
fn split_entry(line: &str) -> Option<(String, String)> {
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => {
                let key = unescape(line[..idx].trim());
                if key.is_empty() {
                    return None;
                }
                let value = unescape(line[idx + 1..].trim());
                return Some((key, value));
            }
            _ => {}
        }
    }

    None
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match decode_unicode_escape(&hex) {
                    Some(decoded) => {
                        out.push(decoded);
                        chars.nth(3);
                    }
                    None => out.push_str("\\u"),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

fn decode_unicode_escape(hex: &str) -> Option<char> {
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_pairs() {
        let props = Properties::parse("keyAlias=upload\nkeyPassword=pw123\n");
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("keyPassword"), Some("pw123"));
        assert_eq!(props.get("storeFile"), None);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "# signing\n\n! legacy comment\n   \nkeyAlias=upload\n  # indented\n";
        let props = Properties::parse(content);
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let props = Properties::parse("  keyAlias   =   upload  \r\n\tstorePassword= pw \r\n");
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storePassword"), Some("pw"));
    }

    #[test]
    fn test_parse_value_keeps_later_delimiters() {
        let props = Properties::parse("keyPassword=a=b:c\nstoreFile:C=weird\n");
        assert_eq!(props.get("keyPassword"), Some("a=b:c"));
        assert_eq!(props.get("storeFile"), Some("C=weird"));
    }

    #[test]
    fn test_parse_colon_delimiter() {
        let props = Properties::parse("keyAlias: upload\n");
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let props = Properties::parse("just some text\nkeyAlias=upload\n=orphan value\n");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_empty_value() {
        let props = Properties::parse("storeFile=\n");
        assert!(props.contains_key("storeFile"));
        assert_eq!(props.get("storeFile"), Some(""));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let props = Properties::parse("keyAlias=first\nkeyAlias=second\n");
        assert_eq!(props.get("keyAlias"), Some("second"));
    }

    #[test]
    fn test_parse_windows_path_escapes() {
        let props = Properties::parse("storeFile=C:\\\\Users\\\\dev\\\\upload.jks\n");
        assert_eq!(props.get("storeFile"), Some("C:\\Users\\dev\\upload.jks"));
    }

    #[test]
    fn test_parse_escaped_delimiter_in_key() {
        let props = Properties::parse("odd\\=key=value\n");
        assert_eq!(props.get("odd=key"), Some("value"));
    }

    #[test]
    fn test_parse_line_continuation() {
        let props = Properties::parse("keyPassword=first\\\n    second\nkeyAlias=upload\n");
        assert_eq!(props.get("keyPassword"), Some("firstsecond"));
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_double_backslash_is_not_continuation() {
        let props = Properties::parse("storeFile=dir\\\\\nkeyAlias=upload\n");
        assert_eq!(props.get("storeFile"), Some("dir\\"));
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_continuation_at_end_of_input() {
        let props = Properties::parse("keyAlias=upload\\");
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_comment_line_does_not_continue() {
        let props = Properties::parse("# note \\\nkeyAlias=upload\n");
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_unicode_and_control_escapes() {
        let props = Properties::parse("keyAlias=caf\\u00e9\nkeyPassword=a\\tb\n");
        assert_eq!(props.get("keyAlias"), Some("café"));
        assert_eq!(props.get("keyPassword"), Some("a\tb"));
    }

    #[test]
    fn test_parse_malformed_unicode_escape_is_literal() {
        let props = Properties::parse("keyAlias=\\u12x4\n");
        assert_eq!(props.get("keyAlias"), Some("\\u12x4"));
    }

    #[test]
    fn test_parse_utf8_values() {
        let props = Properties::parse("keyPassword=пароль\n");
        assert_eq!(props.get("keyPassword"), Some("пароль"));
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let props = Properties::parse("\u{FEFF}keyAlias=upload\nkeyPassword=a\n");
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_parse_lone_carriage_return_line_endings() {
        let props = Properties::parse("keyAlias=upload\rkeyPassword=a\rstorePassword=b");
        assert_eq!(props.len(), 3);
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storePassword"), Some("b"));
    }

    #[test]
    fn test_parse_continuation_across_carriage_return() {
        let props = Properties::parse("keyPassword=first\\\r  second\r\nkeyAlias=upload\r\n");
        assert_eq!(props.get("keyPassword"), Some("firstsecond"));
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_debug_hides_values() {
        let props = Properties::parse("keyPassword=hunter2\n");
        let debug = format!("{:?}", props);
        assert!(debug.contains("keyPassword"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_iter_is_sorted_by_key() {
        let props = Properties::parse("b=2\na=1\n");
        let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
