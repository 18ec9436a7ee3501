//! Phased extractor for the restricted config grammar
//!
//! The configuration source is technically a scripting language, but only a
//! flat declarative subset is ever used: comments, scalar assignments,
//! multi-line `[[ ... ]]` string literals and `{ ... }` array literals,
//! followed by a module-export table. The extractor treats the file as
//! structured text and never evaluates it.
//!
//! Phase order is fixed; each phase operates on the previous phase's output:
//! 1. Strip block comments, then line comments
//! 2. Truncate at the module-export marker
//! 3. Extract multi-line string assignments (span removed)
//! 4. Extract array assignments (span removed)
//! 5. Classify remaining scalar assignments
//!
//! Malformed constructs (unterminated comment or bracket, unbalanced brace)
//! drop the affected key; they never fail the parse. All scans are linear.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::{ConfigError, Result};
use crate::value::{ConfigMap, ConfigValue};

/// Start of the module-export table; declarations end here
const MODULE_EXPORT_MARKER: &str = "local _M";

const BLOCK_COMMENT_OPEN: &str = "--[[";
const LINE_COMMENT: &str = "--";
const LONG_BRACKET_OPEN: &str = "[[";
const LONG_BRACKET_CLOSE: &str = "]]";

/// Parse a configuration source from a path
///
/// # Errors
///
/// Returns `FileAccess` when the source cannot be read. Malformed
/// constructs inside a readable source are skipped, not raised.
pub fn parse_file(path: &Path) -> Result<ConfigMap> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let map = parse_str(&content);
    tracing::debug!(path = %path.display(), keys = map.len(), "parsed configuration");
    Ok(map)
}

/// Parse a configuration source from a string
///
/// Infallible: anything outside the recognised subset is skipped.
pub fn parse_str(source: &str) -> ConfigMap {
    let text = strip_block_comments(source);
    let text = strip_line_comments(&text);
    let text = truncate_at_export(&text);

    let mut entries = HashMap::new();
    let text = extract_long_strings(text, &mut entries);
    let text = extract_tables(&text, &mut entries);
    extract_scalars(&text, &mut entries);

    ConfigMap::new(entries)
}

/// Remove `--[[ ... ]]` block comments, non-greedy per block
///
/// An unterminated block comment swallows the remainder of the input.
fn strip_block_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find(BLOCK_COMMENT_OPEN) {
        out.push_str(&rest[..open]);
        let body = &rest[open + BLOCK_COMMENT_OPEN.len()..];
        match body.find(LONG_BRACKET_CLOSE) {
            Some(close) => rest = &body[close + LONG_BRACKET_CLOSE.len()..],
            None => return out,
        }
    }

    out.push_str(rest);
    out
}

/// Remove `--` line comments
fn strip_line_comments(input: &str) -> String {
    let stripped: Vec<&str> = input
        .lines()
        .map(|line| match line.find(LINE_COMMENT) {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect();
    stripped.join("\n")
}

/// Discard everything from the module-export marker onward
fn truncate_at_export(input: &str) -> &str {
    match input.find(MODULE_EXPORT_MARKER) {
        Some(idx) => &input[..idx],
        None => input,
    }
}

/// Extract `ident = [[ ... ]]` assignments, removing each matched span
///
/// Content is taken verbatim, embedded newlines and quote characters
/// included, so later phases cannot misread it as array or scalar syntax.
fn extract_long_strings(text: &str, entries: &mut HashMap<String, ConfigValue>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(LONG_BRACKET_OPEN) {
        let open = cursor + rel;
        let Some((key, stmt_start)) = assignment_prefix(&text[..open]) else {
            out.push_str(&text[cursor..open + LONG_BRACKET_OPEN.len()]);
            cursor = open + LONG_BRACKET_OPEN.len();
            continue;
        };

        let body_start = open + LONG_BRACKET_OPEN.len();
        match text[body_start..].find(LONG_BRACKET_CLOSE) {
            Some(close) => {
                let content = &text[body_start..body_start + close];
                entries.insert(key, ConfigValue::Str(content.to_string()));
                out.push_str(&text[cursor..stmt_start]);
                cursor = body_start + close + LONG_BRACKET_CLOSE.len();
            }
            None => {
                // Unterminated bracket: the key stays absent
                out.push_str(&text[cursor..stmt_start]);
                return out;
            }
        }
    }

    out.push_str(&text[cursor..]);
    out
}

/// Extract `ident = { ... }` assignments, removing each matched span
///
/// Only quoted string members are collected, in source order. Unquoted
/// tokens inside the braces are dropped silently; arrays are only ever used
/// for string lists and the original behaves the same way.
fn extract_tables(text: &str, entries: &mut HashMap<String, ConfigValue>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find('{') {
        let open = cursor + rel;
        let Some((key, stmt_start)) = assignment_prefix(&text[..open]) else {
            out.push_str(&text[cursor..=open]);
            cursor = open + 1;
            continue;
        };

        match text[open + 1..].find('}') {
            Some(close) => {
                let body = &text[open + 1..open + 1 + close];
                entries.insert(key, ConfigValue::List(quoted_strings(body)));
                out.push_str(&text[cursor..stmt_start]);
                cursor = open + 1 + close + 1;
            }
            None => {
                // Unbalanced brace: the key stays absent
                out.push_str(&text[cursor..stmt_start]);
                return out;
            }
        }
    }

    out.push_str(&text[cursor..]);
    out
}

/// Classify the remaining flat `ident = value` assignments
fn extract_scalars(text: &str, entries: &mut HashMap<String, ConfigValue>) {
    for line in text.lines() {
        let line = line.trim();
        let line = line
            .strip_prefix("local ")
            .map(str::trim_start)
            .unwrap_or(line);

        let Some(eq) = line.find('=') else { continue };
        let key = line[..eq].trim();
        if !is_identifier(key) {
            continue;
        }

        let value = line[eq + 1..].trim();
        if value.contains('=') || value.contains('{') {
            continue;
        }
        let value = value.trim_end_matches(',').trim_end();
        if value.is_empty() {
            continue;
        }

        entries.insert(key.to_string(), classify_scalar(value));
    }
}

/// Walk backwards from a value opener to the `ident =` introducing it
///
/// Returns the identifier and the byte offset where the assignment starts
/// (including an optional `local` keyword). The assignment must sit at the
/// start of its line; anything else is not a top-level declaration.
fn assignment_prefix(text: &str) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let mut i = text.len();

    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    if i == 0 || bytes[i - 1] != b'=' {
        return None;
    }
    i -= 1;
    // reject comparison operators (==, ~=, <=, >=)
    if i > 0 && matches!(bytes[i - 1], b'=' | b'~' | b'<' | b'>') {
        return None;
    }

    while i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
        i -= 1;
    }
    let ident_end = i;
    while i > 0 && (bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'_') {
        i -= 1;
    }
    if i == ident_end {
        return None;
    }
    let ident = text[i..ident_end].to_string();

    let mut start = i;
    let head = text[..start].trim_end_matches([' ', '\t']);
    if let Some(prefix) = head.strip_suffix("local") {
        if prefix.is_empty() || prefix.ends_with(char::is_whitespace) {
            start = prefix.len();
        }
    }

    let before = text[..start].trim_end_matches([' ', '\t']);
    if !before.is_empty() && !before.ends_with('\n') {
        return None;
    }

    Some((ident, start))
}

/// Collect single- or double-quoted strings from an array body, in order
fn quoted_strings(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let bytes = body.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let quote = bytes[i];
        if quote == b'"' || quote == b'\'' {
            match body[i + 1..].find(quote as char) {
                Some(rel) => {
                    items.push(body[i + 1..i + 1 + rel].to_string());
                    i += rel + 2;
                }
                // unterminated quote: stop scanning this body
                None => break,
            }
        } else {
            i += 1;
        }
    }

    items
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn classify_scalar(value: &str) -> ConfigValue {
    match value {
        "true" => ConfigValue::Bool(true),
        "false" => ConfigValue::Bool(false),
        "nil" => ConfigValue::Nil,
        _ => {
            let bytes = value.as_bytes();
            if bytes.len() >= 2 {
                let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
                if (first == b'"' || first == b'\'') && first == last {
                    return ConfigValue::Str(value[1..value.len() - 1].to_string());
                }
            }
            ConfigValue::Raw(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_assignments_stop_at_export_table() {
        let source = "redis_host = \"10.0.0.5\"\nredis_port = 6380\n-- comment\nCCDeny = on\nlocal _M = {\n  foo = \"bar\"\n}";
        let map = parse_str(source);

        assert_eq!(
            map.get("redis_host"),
            Some(&ConfigValue::Str("10.0.0.5".into()))
        );
        assert_eq!(map.get("redis_port"), Some(&ConfigValue::Raw("6380".into())));
        assert_eq!(map.get("CCDeny"), Some(&ConfigValue::Raw("on".into())));
        assert!(!map.contains("foo"));
        assert!(!map.contains("_M"));
    }

    #[test]
    fn test_truncation_is_noop_without_marker() {
        let source = "a = 1\nb = \"two\"\nCCDeny = off\n";
        let with_marker = format!("{}local _M = {{}}\nreturn _M\n", source);

        assert_eq!(parse_str(source), parse_str(&with_marker));
    }

    #[test]
    fn test_comment_stripping_is_idempotent() {
        let source = "a = 1 -- trailing\n--[[ block\nspanning lines ]]b = 2\n-- whole line\nc = 3\n";
        let once = strip_line_comments(&strip_block_comments(source));
        let twice = strip_line_comments(&strip_block_comments(&once));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_tokens_inside_comments_do_not_parse() {
        let source = "--[[ x = 1\nlocal _M = { hidden = \"no\" }\n]]\na = 2\n-- b = 3\n";
        let map = parse_str(source);

        assert_eq!(map.get("a"), Some(&ConfigValue::Raw("2".into())));
        assert!(!map.contains("x"));
        assert!(!map.contains("b"));
        assert!(!map.contains("hidden"));
    }

    #[test]
    fn test_multiline_string_taken_verbatim() {
        let source = "html = [[\n<div class=\"err\">{ denied = true }</div>\n]]\n";
        let map = parse_str(source);

        assert_eq!(
            map.get("html"),
            Some(&ConfigValue::Str(
                "\n<div class=\"err\">{ denied = true }</div>\n".into()
            ))
        );
    }

    #[test]
    fn test_multiline_string_does_not_leak_into_siblings() {
        let source = "before = \"ok\"\nhtml = [[\nbody { color = \"red\" }\n]]\nafter = \"also ok\"\n";
        let map = parse_str(source);

        assert_eq!(map.get("before"), Some(&ConfigValue::Str("ok".into())));
        assert_eq!(map.get("after"), Some(&ConfigValue::Str("also ok".into())));
        assert_eq!(
            map.get("html"),
            Some(&ConfigValue::Str("\nbody { color = \"red\" }\n".into()))
        );
        assert!(!map.contains("body"));
        assert!(!map.contains("color"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_array_of_quoted_strings() {
        let map = parse_str("tags = {\"a\", \"b\", \"c\"}\n");
        assert_eq!(
            map.get("tags"),
            Some(&ConfigValue::List(vec!["a".into(), "b".into(), "c".into()]))
        );
    }

    #[test]
    fn test_array_spanning_lines_and_mixed_quotes() {
        let source = "ipWhitelist = {\n  \"127.0.0.1\",\n  '10.0.0.0/8',\n}\n";
        let map = parse_str(source);
        assert_eq!(
            map.get("ipWhitelist"),
            Some(&ConfigValue::List(vec![
                "127.0.0.1".into(),
                "10.0.0.0/8".into()
            ]))
        );
    }

    #[test]
    fn test_array_unquoted_tokens_dropped() {
        let map = parse_str("tags = {1, 2}\nmixed = {\"kept\", 3, \"also\"}\n");
        assert_eq!(map.get("tags"), Some(&ConfigValue::List(vec![])));
        assert_eq!(
            map.get("mixed"),
            Some(&ConfigValue::List(vec!["kept".into(), "also".into()]))
        );
    }

    #[test]
    fn test_scalar_classification() {
        let source = "a = true\nb = false\nc = nil\nd = \"quoted\"\ne = 'single'\nf = 600,\ng = 100/60\n";
        let map = parse_str(source);

        assert_eq!(map.get("a"), Some(&ConfigValue::Bool(true)));
        assert_eq!(map.get("b"), Some(&ConfigValue::Bool(false)));
        assert_eq!(map.get("c"), Some(&ConfigValue::Nil));
        assert_eq!(map.get("d"), Some(&ConfigValue::Str("quoted".into())));
        assert_eq!(map.get("e"), Some(&ConfigValue::Str("single".into())));
        assert_eq!(map.get("f"), Some(&ConfigValue::Raw("600".into())));
        assert_eq!(map.get("g"), Some(&ConfigValue::Raw("100/60".into())));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let map = parse_str("mode = \"first\"\nmode = \"second\"\n");
        assert_eq!(map.get("mode"), Some(&ConfigValue::Str("second".into())));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_local_prefix_accepted() {
        let map = parse_str("local RulePath = \"/etc/waf/rules/\"\nlocal limit = 10\n");
        assert_eq!(
            map.get("RulePath"),
            Some(&ConfigValue::Str("/etc/waf/rules/".into()))
        );
        assert_eq!(map.get("limit"), Some(&ConfigValue::Raw("10".into())));
    }

    #[test]
    fn test_unterminated_block_comment_swallows_rest() {
        let map = parse_str("a = 1\n--[[ never closed\nb = 2\n");
        assert_eq!(map.get("a"), Some(&ConfigValue::Raw("1".into())));
        assert!(!map.contains("b"));
    }

    #[test]
    fn test_unterminated_long_string_leaves_key_absent() {
        let map = parse_str("a = 1\nhtml = [[ never closed\nb = 2\n");
        assert_eq!(map.get("a"), Some(&ConfigValue::Raw("1".into())));
        assert!(!map.contains("html"));
    }

    #[test]
    fn test_unbalanced_brace_leaves_key_absent() {
        let map = parse_str("a = 1\ntags = {\"x\", \"y\"\n");
        assert_eq!(map.get("a"), Some(&ConfigValue::Raw("1".into())));
        assert!(!map.contains("tags"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let source = "a = 1\nhtml = [[x]]\ntags = {\"t\"}\n--[[ c ]]\nlocal _M = {}\n";
        assert_eq!(parse_str(source), parse_str(source));
    }

    #[test]
    fn test_mid_line_assignment_is_not_top_level() {
        let map = parse_str("if x then y = [[z]] end\n");
        assert!(!map.contains("y"));
    }
}
