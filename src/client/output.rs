//! Rendering of control socket responses.

use crate::error::CliError;
use crate::protocol::write_ascii_escaped;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::io;

/// Parse `text` as JSON and pretty-print it with `indent` spaces per level.
///
/// Object keys keep the order the peer sent them in. Characters outside
/// printable ASCII are escaped as `\uXXXX`.
pub fn render_response(text: &str, indent: usize) -> Result<String, CliError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(CliError::ResponseParse)?;

    let indent = " ".repeat(indent);
    let mut buf = Vec::with_capacity(text.len() * 2);
    let formatter = AsciiPretty(PrettyFormatter::with_indent(indent.as_bytes()));
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(CliError::ResponseParse)?;

    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Indented layout with ASCII-only strings.
struct AsciiPretty<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiPretty<'_> {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        write_ascii_escaped(writer, fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ok() {
        let out = render_response(r#"{"status":"ok"}"#, 4).unwrap();
        assert_eq!(out, "{\n    \"status\": \"ok\"\n}");
    }

    #[test]
    fn test_key_order_is_preserved() {
        let out = render_response(r#"{"status":"ok","code":200,"another":[1,2]}"#, 4).unwrap();
        assert_eq!(
            out,
            "{\n    \"status\": \"ok\",\n    \"code\": 200,\n    \"another\": [\n        1,\n        2\n    ]\n}"
        );
    }

    #[test]
    fn test_custom_indent() {
        let out = render_response(r#"{"a":{"b":null}}"#, 2).unwrap();
        assert_eq!(out, "{\n  \"a\": {\n    \"b\": null\n  }\n}");
    }

    #[test]
    fn test_scalars_and_empty_containers() {
        assert_eq!(render_response("  true\n", 4).unwrap(), "true");
        assert_eq!(render_response("{}", 4).unwrap(), "{}");
        assert_eq!(render_response("[]", 4).unwrap(), "[]");
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let out = render_response(r#"{"name":"caf\u00e9","emoji":["\ud83d\ude00"]}"#, 4).unwrap();
        assert_eq!(
            out,
            "{\n    \"name\": \"caf\\u00e9\",\n    \"emoji\": [\n        \"\\ud83d\\ude00\"\n    ]\n}"
        );

        let raw = render_response("{\"name\":\"caf\u{e9}\"}", 4).unwrap();
        assert_eq!(raw, "{\n    \"name\": \"caf\\u00e9\"\n}");
    }

    #[test]
    fn test_malformed_response() {
        for text in ["", "{\"status\":", "ok", "{} {}"] {
            let err = render_response(text, 4).unwrap_err();
            assert!(matches!(err, CliError::ResponseParse(_)), "accepted {text:?}");
        }
    }
}
