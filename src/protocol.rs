//! Control socket protocol definitions.
//!
//! A request is a single JSON object written to the socket in one piece, with
//! no length prefix or delimiter. The response is whatever the peer writes
//! before closing its end of the connection.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io;

/// A single argument value, sent as a JSON number when it parses as one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Value given as a base-10 integer literal.
    Integer(i64),
    /// Positive integer literal above `i64::MAX`.
    Unsigned(u64),
    /// Anything else, passed through unchanged.
    Text(String),
}

impl ArgValue {
    /// Interpret a command-line token, falling back to text when it is not an
    /// integer literal (or does not fit in an `i64` or `u64`).
    pub fn coerce(token: &str) -> Self {
        if let Ok(n) = token.parse::<i64>() {
            ArgValue::Integer(n)
        } else if let Ok(n) = token.parse::<u64>() {
            ArgValue::Unsigned(n)
        } else {
            ArgValue::Text(token.to_string())
        }
    }
}

/// Command arguments, kept in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(Vec<(String, ArgValue)>);

impl Arguments {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. A repeated key keeps its first position and
    /// takes the latest value.
    pub fn insert(&mut self, key: impl Into<String>, value: ArgValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    /// Whether no arguments were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Arguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Request sent to the control socket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Request {
    /// Command name, interpreted by the server only.
    pub command: String,
    /// Present only when the command line carried key/value pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
}

impl Request {
    /// Create a request without arguments.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            arguments: None,
        }
    }
}

/// Encode a request into the bytes written to the socket.
///
/// Output is one line using `", "` and `": "` as separators, with every
/// character outside printable ASCII escaped as `\uXXXX`.
pub fn encode_request(request: &Request) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, WireFormatter);
    request.serialize(&mut ser)?;
    Ok(buf)
}

/// Compact formatter with spaced separators and ASCII-only strings.
struct WireFormatter;

impl serde_json::ser::Formatter for WireFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        write_ascii_escaped(writer, fragment)
    }
}

/// Write a string fragment with every character outside printable ASCII
/// escaped as `\uXXXX` (UTF-16 surrogate pairs above the BMP).
pub(crate) fn write_ascii_escaped<W>(writer: &mut W, fragment: &str) -> io::Result<()>
where
    W: ?Sized + io::Write,
{
    let bytes = fragment.as_bytes();
    let mut start = 0;
    for (i, ch) in fragment.char_indices() {
        if ch.is_ascii() && ch != '\x7f' {
            continue;
        }
        writer.write_all(&bytes[start..i])?;
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            write!(writer, "\\u{:04x}", unit)?;
        }
        start = i + ch.len_utf8();
    }
    writer.write_all(&bytes[start..])
}
