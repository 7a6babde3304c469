//! Charset resolution for upstream bodies.

use axum::http::{header, HeaderMap};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::rewrite::RewriteError;

/// Extract the `charset` parameter of the `Content-Type` header.
pub fn charset_from_headers(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// Resolve a charset label, defaulting to UTF-8 when absent.
///
/// UTF-16 labels are rejected: the encoder can only produce UTF-8 for them.
pub fn resolve(label: Option<&str>) -> Result<&'static Encoding, RewriteError> {
    let Some(label) = label else {
        return Ok(UTF_8);
    };
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| RewriteError::UnknownCharset(label.to_string()))?;
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Err(RewriteError::UnsupportedCharset(encoding.name()));
    }
    Ok(encoding)
}
