//! Document format tests: strict parsing and byte-exact re-serialization.
//!
//! Everything here works on handwritten document text with a placeholder
//! signature; nothing in this file touches key material.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use seatlock_license::{LicenseTier, SignedLicenseDocument};

/// 256 bytes of 0x2A, base64-encoded. Parses fine; would never verify.
fn placeholder_signature() -> String {
    BASE64.encode([0x2A; 256])
}

fn canonical_text() -> String {
    format!(
        "Product: Widget Pro\n\
         Version: 2.1\n\
         LicenseType: Professional\n\
         ExpiryDate: 2099-01-01\n\
         MaxUsers: 5\n\
         CustomerName: Acme Corp\n\
         CustomerEmail: ops@acme.example\n\
         HardwareId: ABCD1234EF567890\n\
         Features: export,audit\n\
         Custom.region: emea\n\
         Signature: {}\n",
        placeholder_signature()
    )
}

fn parse(text: &str) -> Result<SignedLicenseDocument, seatlock_license::DocumentParseError> {
    SignedLicenseDocument::parse(text.as_bytes())
}

// ── Accepting canonical documents ────────────────────────────────

#[test]
fn parses_canonical_document() {
    let document = parse(&canonical_text()).expect("canonical document should parse");
    let terms = document.terms();
    assert_eq!(terms.product, "Widget Pro");
    assert_eq!(terms.version, "2.1");
    assert_eq!(terms.tier, LicenseTier::Professional);
    assert_eq!(terms.expiry, NaiveDate::from_ymd_opt(2099, 1, 1).unwrap());
    assert_eq!(terms.max_users, 5);
    assert_eq!(terms.customer_name, "Acme Corp");
    assert_eq!(terms.customer_email, "ops@acme.example");
    assert_eq!(terms.hardware_id.as_str(), "ABCD1234EF567890");
    assert_eq!(terms.features, vec!["export", "audit"]);
    assert_eq!(
        terms.custom,
        vec![("region".to_string(), "emea".to_string())]
    );
    assert_eq!(document.signature(), [0x2A; 256]);
}

#[test]
fn reserialization_is_byte_exact() {
    let text = canonical_text();
    let document = parse(&text).expect("parse");
    assert_eq!(String::from_utf8(document.to_bytes()).unwrap(), text);
}

#[test]
fn canonical_bytes_stop_before_signature_line() {
    let text = canonical_text();
    let document = parse(&text).expect("parse");
    let canonical = String::from_utf8(document.canonical_bytes()).unwrap();
    assert_eq!(format!("{canonical}Signature: {}\n", placeholder_signature()), text);
    assert!(!canonical.contains("Signature"));
}

#[test]
fn signature_base64_matches_wire_form() {
    let document = parse(&canonical_text()).expect("parse");
    assert_eq!(document.signature_base64(), placeholder_signature());
}

#[test]
fn into_terms_returns_parsed_terms() {
    let document = parse(&canonical_text()).expect("parse");
    let expected = document.terms().clone();
    assert_eq!(document.into_terms(), expected);
}

#[test]
fn empty_feature_list_is_empty_body() {
    let text = canonical_text().replace("Features: export,audit\n", "Features: \n");
    let document = parse(&text).expect("parse");
    assert!(document.terms().features.is_empty());
    assert_eq!(String::from_utf8(document.to_bytes()).unwrap(), text);
}

#[test]
fn document_without_custom_lines_parses() {
    let text = canonical_text().replace("Custom.region: emea\n", "");
    let document = parse(&text).expect("parse");
    assert!(document.terms().custom.is_empty());
    assert_eq!(String::from_utf8(document.to_bytes()).unwrap(), text);
}

#[test]
fn duplicate_custom_keys_are_preserved_in_order() {
    let text = canonical_text().replace(
        "Custom.region: emea\n",
        "Custom.note: first\nCustom.note: second\n",
    );
    let document = parse(&text).expect("parse");
    assert_eq!(
        document.terms().custom,
        vec![
            ("note".to_string(), "first".to_string()),
            ("note".to_string(), "second".to_string()),
        ]
    );
    assert_eq!(String::from_utf8(document.to_bytes()).unwrap(), text);
}

// ── Escaping ─────────────────────────────────────────────────────

#[test]
fn escaped_values_decode_to_raw_strings() {
    let text = canonical_text()
        .replace(
            "CustomerName: Acme Corp\n",
            "CustomerName: Acme\\, Inc.\\: EU\n",
        )
        .replace(
            "Custom.region: emea\n",
            "Custom.note: line1\\nline2\\r\\\\end\n",
        );
    let document = parse(&text).expect("parse");
    assert_eq!(document.terms().customer_name, "Acme, Inc.: EU");
    assert_eq!(
        document.terms().custom,
        vec![("note".to_string(), "line1\nline2\r\\end".to_string())]
    );
    assert_eq!(String::from_utf8(document.to_bytes()).unwrap(), text);
}

#[test]
fn escaped_comma_stays_inside_one_feature() {
    let text = canonical_text().replace(
        "Features: export,audit\n",
        "Features: a\\,b,c\n",
    );
    let document = parse(&text).expect("parse");
    assert_eq!(document.terms().features, vec!["a,b", "c"]);
    assert_eq!(String::from_utf8(document.to_bytes()).unwrap(), text);
}

#[test]
fn escaped_custom_key_roundtrips() {
    let text = canonical_text().replace(
        "Custom.region: emea\n",
        "Custom.a\\:b\\,c: value\n",
    );
    let document = parse(&text).expect("parse");
    assert_eq!(
        document.terms().custom,
        vec![("a:b,c".to_string(), "value".to_string())]
    );
    assert_eq!(String::from_utf8(document.to_bytes()).unwrap(), text);
}

// ── Rejecting everything else ────────────────────────────────────

fn assert_malformed(text: &str) {
    assert!(
        SignedLicenseDocument::parse(text.as_bytes()).is_err(),
        "should have been rejected: {text:?}"
    );
}

#[test]
fn rejects_empty_and_non_utf8_input() {
    assert!(SignedLicenseDocument::parse(b"").is_err());
    assert!(SignedLicenseDocument::parse(&[0xFF, 0xFE, 0x00]).is_err());
}

#[test]
fn rejects_missing_final_newline() {
    let text = canonical_text();
    assert_malformed(text.trim_end_matches('\n'));
}

#[test]
fn rejects_trailing_blank_line() {
    let text = canonical_text();
    assert_malformed(&format!("{text}\n"));
}

#[test]
fn rejects_missing_field() {
    assert_malformed(&canonical_text().replace("Version: 2.1\n", ""));
}

#[test]
fn rejects_reordered_fields() {
    let text = canonical_text().replace(
        "Product: Widget Pro\nVersion: 2.1\n",
        "Version: 2.1\nProduct: Widget Pro\n",
    );
    assert_malformed(&text);
}

#[test]
fn rejects_unknown_field() {
    let text = canonical_text().replace(
        "Custom.region: emea\n",
        "Edition: gold\n",
    );
    assert_malformed(&text);
}

#[test]
fn rejects_unknown_tier() {
    assert_malformed(&canonical_text().replace("Professional", "Platinum"));
    assert_malformed(&canonical_text().replace("Professional", "professional"));
}

#[test]
fn rejects_bad_dates() {
    for bad in ["2099-13-01", "2099-02-30", "2099-1-1", "01-01-2099", "2099/01/01", "never"] {
        assert_malformed(&canonical_text().replace("2099-01-01", bad));
    }
}

#[test]
fn rejects_non_canonical_max_users() {
    for bad in ["05", "+5", "-5", "5 ", "4294967296", "five", ""] {
        assert_malformed(&canonical_text().replace("MaxUsers: 5\n", &format!("MaxUsers: {bad}\n")));
    }
}

#[test]
fn rejects_bare_reserved_characters() {
    assert_malformed(&canonical_text().replace("Acme Corp", "Acme: Corp"));
    assert_malformed(&canonical_text().replace("Acme Corp", "Acme, Corp"));
    assert_malformed(&canonical_text().replace("Acme Corp\n", "Acme Corp\r\n"));
}

#[test]
fn rejects_unknown_escape_codes() {
    assert_malformed(&canonical_text().replace("Acme Corp", "Acme\\x Corp"));
    assert_malformed(&canonical_text().replace("Acme Corp", "dangling\\"));
}

#[test]
fn rejects_line_without_separator() {
    assert_malformed(&canonical_text().replace("MaxUsers: 5\n", "MaxUsers:5\n"));
    assert_malformed(&canonical_text().replace("MaxUsers: 5\n", "MaxUsers 5\n"));
}

#[test]
fn rejects_custom_line_after_signature() {
    let text = canonical_text();
    let with_late_custom = format!("{text}Custom.late: entry\n");
    assert_malformed(&with_late_custom);
}

#[test]
fn rejects_duplicate_signature_line() {
    let text = canonical_text();
    let signature_line = format!("Signature: {}\n", placeholder_signature());
    assert_malformed(&format!("{text}{signature_line}"));
}

#[test]
fn rejects_missing_signature_line() {
    let text = canonical_text().replace(
        &format!("Signature: {}\n", placeholder_signature()),
        "",
    );
    assert_malformed(&text);
}

#[test]
fn rejects_invalid_signature_encoding() {
    let text = canonical_text();
    assert_malformed(&text.replace(&placeholder_signature(), "not base64!!!"));
    // Valid base64, wrong decoded length.
    let short = BASE64.encode([0x2A; 255]);
    assert_malformed(&text.replace(&placeholder_signature(), &short));
}
