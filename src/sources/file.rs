//! Properties-file property source.

use super::{DEFAULT_FILE_PRIORITY, PropertySource};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Property source backed by a line-oriented `KEY=VALUE` file.
///
/// The file format is the familiar `.properties` layout:
///
/// ```text
/// # comment
/// ! also a comment
/// BASE_URL=https://dev.example.com
/// LOGIN_PATH : /login
/// LONG_VALUE = first part \
///              second part
/// ```
///
/// Lines are read the way `java.util.Properties` reads them:
///
/// - Leading whitespace is skipped. A trailing unescaped backslash joins the
///   next line, minus its indentation, onto the current one.
/// - The key ends at the first unescaped `=`, `:` or whitespace. Whitespace
///   around the separator is skipped; trailing whitespace of the value is kept.
/// - Escapes are decoded in keys and values: `\t`, `\n`, `\r`, `\f`,
///   `\uXXXX` (including surrogate pairs), and `\` before any other
///   character yields that character, so `\\`, `\=`, `\:` and `\ ` are
///   literal.
///
/// # Examples
///
/// ```rust,no_run
/// use reqtemplate::sources::PropertiesFileSource;
///
/// let source = PropertiesFileSource::new("resources/api.properties");
/// ```
pub struct PropertiesFileSource {
    path: PathBuf,
    priority: i32,
}

impl PropertiesFileSource {
    /// Create a new properties file source.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: DEFAULT_FILE_PRIORITY,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PropertySource for PropertiesFileSource {
    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Err(Error::Load(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }

        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Load(format!(
                "Failed to read configuration file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        parse_properties(&text).map_err(|e| match e {
            Error::Load(msg) => Error::Load(format!("{}: {}", self.path.display(), msg)),
            other => other,
        })
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Parse `.properties` text into a key/value map.
///
/// Later duplicates of a key overwrite earlier ones.
///
/// # Errors
///
/// Returns [`Error::Load`] naming the line of a malformed `\uXXXX` escape or
/// an unpaired UTF-16 surrogate.
///
/// # Examples
///
/// ```rust
/// use reqtemplate::sources::parse_properties;
///
/// let map = parse_properties("# urls\nBASE_URL=https://example.com\nTIMEOUTMS 500\n").unwrap();
/// assert_eq!(map["BASE_URL"], "https://example.com");
/// assert_eq!(map["TIMEOUTMS"], "500");
/// ```
pub fn parse_properties(text: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for (number, line) in logical_lines(text) {
        let (key, value) = split_entry(&line);
        let decode = |raw: &str| {
            unescape(raw).map_err(|reason| Error::Load(format!("line {}: {}", number, reason)))
        };
        map.insert(decode(key)?, decode(value)?);
    }

    Ok(map)
}

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// Join continued lines, dropping comments and blank lines. Each entry
/// carries the number of the line it starts on.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_start_matches(WHITESPACE);

        // Comment markers only count at the start of a logical line.
        if pending.is_none() && (line.is_empty() || line.starts_with(['#', '!'])) {
            continue;
        }

        let (body, more) = match continued(line) {
            Some(stripped) => (stripped, true),
            None => (line, false),
        };
        pending
            .get_or_insert_with(|| (idx + 1, String::new()))
            .1
            .push_str(body);
        if !more {
            lines.extend(pending.take());
        }
    }

    // A continuation on the last line still yields its entry.
    lines.extend(pending);
    lines
}

/// Strip a single trailing continuation backslash. An escaped backslash
/// (`\\`) at the end of a line is literal and does not continue.
fn continued(line: &str) -> Option<&str> {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    if trailing % 2 == 1 {
        Some(&line[..line.len() - 1])
    } else {
        None
    }
}

/// Split a logical line into its raw key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;

    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..idx], skip_whitespace(&line[idx + 1..])),
            ' ' | '\t' | '\x0c' => {
                let rest = skip_whitespace(&line[idx..]);
                let rest = rest.strip_prefix(['=', ':']).map_or(rest, skip_whitespace);
                return (&line[..idx], rest);
            }
            _ => {}
        }
    }

    (line, "")
}

fn skip_whitespace(s: &str) -> &str {
    s.trim_start_matches(WHITESPACE)
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => out.push(unicode_escape(&mut chars)?),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Decode the digits after `\u`, pairing a high surrogate with a following
/// `\uXXXX` low surrogate.
fn unicode_escape(chars: &mut std::str::Chars<'_>) -> std::result::Result<char, String> {
    let unit = utf16_unit(chars)?;

    if (0xD800..=0xDBFF).contains(&unit) {
        let mut ahead = chars.clone();
        if ahead.next() == Some('\\') && ahead.next() == Some('u') {
            let low = utf16_unit(&mut ahead)?;
            if (0xDC00..=0xDFFF).contains(&low) {
                *chars = ahead;
                let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                return char::from_u32(code).ok_or_else(|| format!("invalid code point U+{:X}", code));
            }
        }
    }

    char::from_u32(u32::from(unit)).ok_or_else(|| format!("unpaired surrogate \\u{:04X}", unit))
}

fn utf16_unit(chars: &mut std::str::Chars<'_>) -> std::result::Result<u16, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("malformed \\uxxxx encoding: \\u{}", digits));
    }
    u16::from_str_radix(&digits, 16).map_err(|e| e.to_string())
}
