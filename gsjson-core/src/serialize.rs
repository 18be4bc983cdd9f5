//! Serialization of a value tree back to text.
//!
//! Strings at or below the giant-string threshold render in escaped
//! form; longer ones render as `'<byte-len> <raw payload>'` with no
//! escaping at all, the encoding half of the extractor's giant-string
//! grammar. The round trip is value-identical, not byte-identical: the
//! serializer emits no whitespace and always picks the encoding by
//! length.
//!
//! Serialization is total - there are no error conditions, so the
//! functions return `String` directly.

use crate::value::{Number, Scalar, Value};

/// Strings longer than this many bytes serialize in giant form.
pub const DEFAULT_GIANT_THRESHOLD: usize = 1024;

/// Serialize a value tree with the default giant-string threshold.
pub fn to_text(value: &Value) -> String {
    to_text_with_limit(value, DEFAULT_GIANT_THRESHOLD)
}

/// Serialize a value tree, using giant-string form for strings longer
/// than `threshold` bytes.
pub fn to_text_with_limit(value: &Value, threshold: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, threshold);
    out
}

fn write_value(out: &mut String, value: &Value, threshold: usize) {
    match value {
        Value::Scalar(s) => write_scalar(out, s, threshold),
        Value::Object(obj) => {
            out.push('{');
            for (i, (key, val)) in obj.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_scalar(out, key, threshold);
                out.push(':');
                write_value(out, val, threshold);
            }
            out.push('}');
        }
        Value::Array(arr) => {
            out.push('[');
            for (i, val) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, val, threshold);
            }
            out.push(']');
        }
    }
}

fn write_scalar(out: &mut String, scalar: &Scalar, threshold: usize) {
    match scalar {
        Scalar::Null => out.push_str("null"),
        Scalar::Bool(true) => out.push_str("true"),
        Scalar::Bool(false) => out.push_str("false"),
        Scalar::Number(n) => write_number(out, *n),
        Scalar::String(s) => {
            if s.len() > threshold {
                write_giant(out, s);
            } else {
                write_escaped(out, s);
            }
        }
    }
}

fn write_number(out: &mut String, n: Number) {
    match n {
        Number::Int(i) => out.push_str(&i.to_string()),
        Number::Float(x) => {
            let text = x.to_string();
            // An integral float would re-parse as an integer; keep it
            // a float on the way back in.
            let integral = text.bytes().all(|b| b.is_ascii_digit() || b == b'-');
            out.push_str(&text);
            if integral {
                out.push_str(".0");
            }
        }
    }
}

/// Giant form: `'<decimal byte length><space><raw bytes>'`.
fn write_giant(out: &mut String, s: &str) {
    out.push('\'');
    out.push_str(&s.len().to_string());
    out.push(' ');
    out.push_str(s);
    out.push('\'');
}

/// Escaped form: the six two-character escapes, printable ASCII
/// verbatim, everything else as lowercase `\uxxxx` UTF-16 code units.
fn write_escaped(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    push_unit(out, *unit);
                }
            }
        }
    }
    out.push('"');
}

fn push_unit(out: &mut String, unit: u16) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push_str("\\u");
    for shift in [12, 8, 4, 0] {
        out.push(HEX[((unit >> shift) & 0xF) as usize] as char);
    }
}
