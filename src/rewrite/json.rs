//! JSON field rewriting and serialization.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;

use crate::rewrite::converter::TextConverter;

/// Convert the text fields of a chat or completion response in place.
///
/// Touches `choices[].message.content` and the top-level `content`, and
/// only when they hold strings. Returns how many fields were converted.
pub fn convert_fields(document: &mut Value, converter: &dyn TextConverter) -> usize {
    let mut converted = 0;

    if let Some(choices) = document.get_mut("choices").and_then(Value::as_array_mut) {
        for choice in choices {
            let content = choice
                .get_mut("message")
                .and_then(|message| message.get_mut("content"));
            if let Some(Value::String(text)) = content {
                *text = converter.convert(text);
                converted += 1;
            }
        }
    }

    if let Some(Value::String(text)) = document.get_mut("content") {
        *text = converter.convert(text);
        converted += 1;
    }

    converted
}

/// Serialize compactly, escaping non-ASCII characters when `ensure_ascii`.
pub fn to_compact_string(document: &Value, ensure_ascii: bool) -> serde_json::Result<String> {
    if !ensure_ascii {
        return serde_json::to_string(document);
    }

    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter);
    document.serialize(&mut serializer)?;
    // The formatter only ever writes ASCII.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Compact formatter that writes every non-ASCII character as `\uXXXX`.
#[derive(Debug, Clone, Copy, Default)]
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        let mut start = 0;

        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + ch.len_utf8();
        }

        writer.write_all(&fragment.as_bytes()[start..])
    }
}
