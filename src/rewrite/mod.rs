//! Response rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream body + Content-Type charset
//!     → charset.rs (resolve encoding, default UTF-8)
//!     → decode, parse JSON
//!     → json.rs (convert choices[].message.content and content)
//!     → compact re-serialization (ASCII-escaped unless UTF-8)
//!     → re-encode with the original charset
//! ```
//!
//! # Design Decisions
//! - Fields are probed on a generic JSON value; the upstream schema is open
//! - Key order and number text survive the round trip
//! - Any failure is reported to the caller, which passes the raw body through

pub mod charset;
pub mod converter;
pub mod json;

use std::sync::Arc;

use encoding_rs::UTF_8;
use thiserror::Error;

pub use converter::{ConversionProfile, Identity, ScriptConverter, TextConverter, UnknownProfile};

/// Reasons a body could not be rewritten.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("unknown charset '{0}'")]
    UnknownCharset(String),

    #[error("charset {0} is not supported for rewriting")]
    UnsupportedCharset(&'static str),

    #[error("body is not valid {0}")]
    Decode(&'static str),

    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rewrites the text fields of JSON response bodies.
#[derive(Debug, Clone)]
pub struct Rewriter {
    converter: Arc<dyn TextConverter>,
}

impl Rewriter {
    pub fn new(converter: Arc<dyn TextConverter>) -> Self {
        Self { converter }
    }

    pub fn from_profile(profile: ConversionProfile) -> Self {
        Self::new(Arc::from(profile.converter()))
    }

    /// Rewrite `body`, declared in `charset` (UTF-8 when `None`).
    pub fn rewrite(&self, body: &[u8], charset: Option<&str>) -> Result<Vec<u8>, RewriteError> {
        let encoding = charset::resolve(charset)?;

        let text = encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .ok_or(RewriteError::Decode(encoding.name()))?;
        tracing::trace!(body = %text, "Received response");

        let mut document: serde_json::Value = serde_json::from_str(&text)?;
        let converted = json::convert_fields(&mut document, self.converter.as_ref());

        let ensure_ascii = encoding != UTF_8;
        let output = json::to_compact_string(&document, ensure_ascii)?;
        tracing::trace!(body = %output, converted, "Converted response");

        let (bytes, _, _) = encoding.encode(&output);
        Ok(bytes.into_owned())
    }
}
