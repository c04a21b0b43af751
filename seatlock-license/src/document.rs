//! Canonical license document format.
//!
//! A license document is UTF-8 text, one `Name: value` field per line,
//! every line LF-terminated, in this exact order:
//!
//! ```text
//! Product: Widget Pro
//! Version: 2.1
//! LicenseType: Professional
//! ExpiryDate: 2099-01-01
//! MaxUsers: 5
//! CustomerName: Acme Corp
//! CustomerEmail: ops@acme.example
//! HardwareId: ABCD1234EF567890
//! Features: export,audit
//! Custom.region: emea
//! Signature: <base64>
//! ```
//!
//! `Custom.*` lines appear zero or more times, in issuance order. The
//! signature is computed over every byte up to the `Signature` line, so any
//! reorder or rewrite of the fields above it invalidates the document.
//!
//! Values are escaped with a fixed table (`\\`, `\n`, `\r`, `\,`, `\:`) so
//! that line breaks, commas, and colons inside user-supplied strings cannot
//! be confused with structure. The parser accepts canonical spellings only,
//! which makes parse and serialize a bijection: a document that parses
//! always re-serializes to the exact bytes it came from.

use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDate;
use seatlock_keys::SIGNATURE_LEN;
use thiserror::Error;

use crate::fingerprint::HardwareFingerprint;
use crate::terms::{LicenseTerms, LicenseTier};

/// Prefix for issuer-defined attribute lines.
const CUSTOM_PREFIX: &str = "Custom.";

/// Date spelling used by `ExpiryDate`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse failure. Carries no positional detail: a rejected document gets
/// one uniform answer no matter which line broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed license document")]
pub struct DocumentParseError;

/// A parsed or freshly issued license with its embedded signature.
///
/// Instances are immutable. There are exactly two ways to get one: issue
/// and sign new terms, or [`parse`](SignedLicenseDocument::parse) existing
/// bytes. Parsing checks structure only; signature and policy checks are
/// the validator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLicenseDocument {
    terms: LicenseTerms,
    signature: Vec<u8>,
}

impl SignedLicenseDocument {
    pub(crate) fn new(terms: LicenseTerms, signature: Vec<u8>) -> Self {
        Self { terms, signature }
    }

    /// The terms this document asserts. Untrusted until validated.
    #[must_use]
    pub fn terms(&self) -> &LicenseTerms {
        &self.terms
    }

    /// Consumes the document, returning the asserted terms.
    #[must_use]
    pub fn into_terms(self) -> LicenseTerms {
        self.terms
    }

    /// Raw signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The signature as standard base64, exactly as it appears on the wire.
    #[must_use]
    pub fn signature_base64(&self) -> String {
        BASE64.encode(&self.signature)
    }

    /// The signed region: every field line, in order, without the
    /// signature line.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_terms_bytes(&self.terms)
    }

    /// Serializes the full document, signature line included.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.canonical_bytes();
        out.extend_from_slice(b"Signature: ");
        out.extend_from_slice(self.signature_base64().as_bytes());
        out.push(b'\n');
        out
    }

    /// Parses document bytes without verifying anything about them.
    pub fn parse(bytes: &[u8]) -> Result<Self, DocumentParseError> {
        let text = std::str::from_utf8(bytes).map_err(|_| DocumentParseError)?;
        let body = text.strip_suffix('\n').ok_or(DocumentParseError)?;
        let mut lines = body.split('\n');

        let product = unescape(expect_field(&mut lines, "Product")?)?;
        let version = unescape(expect_field(&mut lines, "Version")?)?;
        let tier = LicenseTier::from_str(expect_field(&mut lines, "LicenseType")?)
            .map_err(|_| DocumentParseError)?;
        let expiry = parse_expiry(expect_field(&mut lines, "ExpiryDate")?)?;
        let max_users = parse_max_users(expect_field(&mut lines, "MaxUsers")?)?;
        let customer_name = unescape(expect_field(&mut lines, "CustomerName")?)?;
        let customer_email = unescape(expect_field(&mut lines, "CustomerEmail")?)?;
        let hardware_id =
            HardwareFingerprint::new(unescape(expect_field(&mut lines, "HardwareId")?)?);
        let features = split_features(expect_field(&mut lines, "Features")?)?;

        let mut custom = Vec::new();
        let signature = loop {
            let line = lines.next().ok_or(DocumentParseError)?;
            let (key, value) = split_line(line)?;
            if let Some(raw_key) = key.strip_prefix(CUSTOM_PREFIX) {
                custom.push((unescape(raw_key)?, unescape(value)?));
            } else if key == "Signature" {
                break decode_signature(value)?;
            } else {
                return Err(DocumentParseError);
            }
        };
        if lines.next().is_some() {
            return Err(DocumentParseError);
        }

        Ok(Self::new(
            LicenseTerms {
                product,
                version,
                tier,
                expiry,
                max_users,
                customer_name,
                customer_email,
                hardware_id,
                features,
                custom,
            },
            signature,
        ))
    }
}

/// Serializes `terms` into the canonical signed region.
pub(crate) fn canonical_terms_bytes(terms: &LicenseTerms) -> Vec<u8> {
    let mut out = String::new();
    push_field(&mut out, "Product", &terms.product);
    push_field(&mut out, "Version", &terms.version);
    push_field(&mut out, "LicenseType", terms.tier.as_str());
    push_field(
        &mut out,
        "ExpiryDate",
        &terms.expiry.format(DATE_FORMAT).to_string(),
    );
    push_field(&mut out, "MaxUsers", &terms.max_users.to_string());
    push_field(&mut out, "CustomerName", &terms.customer_name);
    push_field(&mut out, "CustomerEmail", &terms.customer_email);
    push_field(&mut out, "HardwareId", terms.hardware_id.as_str());
    let features: Vec<String> = terms.features.iter().map(|f| escape(f)).collect();
    out.push_str("Features: ");
    out.push_str(&features.join(","));
    out.push('\n');
    for (key, value) in &terms.custom {
        out.push_str(CUSTOM_PREFIX);
        out.push_str(&escape(key));
        out.push_str(": ");
        out.push_str(&escape(value));
        out.push('\n');
    }
    out.into_bytes()
}

fn push_field(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(&escape(value));
    out.push('\n');
}

/// Escapes the characters that carry structure in the document format.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ',' => out.push_str("\\,"),
            ':' => out.push_str("\\:"),
            other => out.push(other),
        }
    }
    out
}

/// Reverses [`escape`]. Rejects unknown escape codes and bare reserved
/// characters, which keeps accepted input canonical.
fn unescape(value: &str) -> Result<String, DocumentParseError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(unescape_code(chars.next())?),
            ',' | ':' | '\r' => return Err(DocumentParseError),
            other => out.push(other),
        }
    }
    Ok(out)
}

fn unescape_code(code: Option<char>) -> Result<char, DocumentParseError> {
    match code {
        Some('\\') => Ok('\\'),
        Some('n') => Ok('\n'),
        Some('r') => Ok('\r'),
        Some(',') => Ok(','),
        Some(':') => Ok(':'),
        _ => Err(DocumentParseError),
    }
}

/// Splits a `Features` body on unescaped commas, unescaping each item.
/// An empty body is an empty feature list.
fn split_features(body: &str) -> Result<Vec<String>, DocumentParseError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.push(unescape_code(chars.next())?),
            ',' => items.push(std::mem::take(&mut current)),
            ':' | '\r' => return Err(DocumentParseError),
            other => current.push(other),
        }
    }
    items.push(current);
    Ok(items)
}

/// Splits a line at the single unescaped `": "` separator.
fn split_line(line: &str) -> Result<(&str, &str), DocumentParseError> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b':' => {
                return match bytes.get(i + 1) {
                    Some(b' ') => Ok((&line[..i], &line[i + 2..])),
                    _ => Err(DocumentParseError),
                };
            }
            _ => i += 1,
        }
    }
    Err(DocumentParseError)
}

fn expect_field<'a>(
    lines: &mut std::str::Split<'a, char>,
    name: &str,
) -> Result<&'a str, DocumentParseError> {
    let line = lines.next().ok_or(DocumentParseError)?;
    let (key, value) = split_line(line)?;
    if key != name {
        return Err(DocumentParseError);
    }
    Ok(value)
}

fn parse_expiry(value: &str) -> Result<NaiveDate, DocumentParseError> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DocumentParseError)?;
    // Only the zero-padded spelling is canonical.
    if date.format(DATE_FORMAT).to_string() != value {
        return Err(DocumentParseError);
    }
    Ok(date)
}

fn parse_max_users(value: &str) -> Result<u32, DocumentParseError> {
    let n: u32 = value.parse().map_err(|_| DocumentParseError)?;
    // Rejects leading zeroes and a leading `+`.
    if n.to_string() != value {
        return Err(DocumentParseError);
    }
    Ok(n)
}

fn decode_signature(value: &str) -> Result<Vec<u8>, DocumentParseError> {
    let raw = BASE64.decode(value).map_err(|_| DocumentParseError)?;
    if raw.len() != SIGNATURE_LEN {
        return Err(DocumentParseError);
    }
    Ok(raw)
}
