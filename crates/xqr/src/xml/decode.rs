//! Character decoding of raw documents ahead of parsing

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

use crate::error::{Error, ErrorKind, Result, Span};

/// Decode a raw document into UTF-8 text
///
/// A byte-order mark takes precedence over the `encoding` of the XML
/// declaration; with neither present the input must be UTF-8.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, bytes.get(bom_len..).unwrap_or_default()),
        None => (declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
    };

    debug!(encoding = encoding.name(), "decoding xml input");
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| invalid(format!("input is not valid {}", encoding.name())))
}

/// Encoding named by the XML declaration, if any
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>> {
    let Some(rest) = bytes.strip_prefix(b"<?xml") else {
        return Ok(None);
    };
    if !rest.first().is_some_and(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let end = rest
        .windows(2)
        .position(|pair| pair == b"?>")
        .unwrap_or(rest.len());
    let declaration = rest.get(..end).unwrap_or_default();

    let Some(label) = pseudo_attribute(declaration, b"encoding") else {
        return Ok(None);
    };

    // a declaration readable as ASCII rules out UTF-16
    Encoding::for_label(label)
        .map(|encoding| Some(encoding.output_encoding()))
        .ok_or_else(|| {
            invalid(format!(
                "unsupported encoding '{}'",
                String::from_utf8_lossy(label)
            ))
        })
}

/// Quoted value of `name="..."` inside an XML declaration
fn pseudo_attribute<'a>(declaration: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    let at = declaration
        .windows(name.len())
        .position(|window| window == name)?;
    let rest = declaration.get(at + name.len()..)?.trim_ascii_start();
    let rest = rest.strip_prefix(b"=")?.trim_ascii_start();

    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = rest.iter().position(|&b| b == quote)?;
    rest.get(..len)
}

fn invalid(message: String) -> Error {
    Error::with_message(ErrorKind::InvalidXml, Span::empty(), message)
}
