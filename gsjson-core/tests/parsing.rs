//! Integration tests for GS-JSON parsing.
//!
//! Organized by grammar construct, then by failure mode. Error cases
//! assert both the code and the detection index where the index is
//! part of the contract.

use pretty_assertions::assert_eq;

use gsjson_core::{parse, parse_object, ErrorCode, Scalar, Value};

fn err(input: &str) -> (ErrorCode, usize) {
    let e = parse(input).unwrap_err();
    (e.code, e.index)
}

// =============================================================================
// Documents
// =============================================================================

#[test]
fn mixed_document() {
    let text = r#"{"name":"widget","tags":["a","b"],"meta":{"depth":2,"ratio":0.5,"ok":true,"note":null}}"#;
    let obj = parse_object(text).unwrap();
    assert_eq!(obj.get_str("name").and_then(Value::as_str), Some("widget"));

    let tags = obj.get_str("tags").and_then(Value::as_array).unwrap();
    let tags: Vec<_> = tags.iter().filter_map(Value::as_str).collect();
    assert_eq!(tags, vec!["a", "b"]);

    let meta = obj.get_str("meta").and_then(Value::as_object).unwrap();
    assert_eq!(meta.get_str("depth").and_then(Value::as_i64), Some(2));
    assert_eq!(meta.get_str("ratio").and_then(Value::as_f64), Some(0.5));
    assert_eq!(meta.get_str("ok").and_then(Value::as_bool), Some(true));
    assert!(meta.get_str("note").unwrap().is_null());
}

#[test]
fn giant_strings_inside_documents() {
    let payload = "x".repeat(5000);
    let text = format!("{{\"data\":'{} {}',\"n\":1}}", payload.len(), payload);
    let obj = parse_object(&text).unwrap();
    assert_eq!(obj.get_str("data").and_then(Value::as_str), Some(payload.as_str()));
    assert_eq!(obj.get_str("n").and_then(Value::as_i64), Some(1));
}

#[test]
fn giant_payload_may_contain_structural_text() {
    // The payload looks like JSON but is never interpreted.
    let v = parse("['9 {\"a\":[1]}']").unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.get(0).and_then(Value::as_str), Some("{\"a\":[1]}"));
}

#[test]
fn arbitrary_key_kinds_coexist() {
    let obj = parse_object("{true:1,null:2,3:\"x\",\"s\":4}").unwrap();
    let keys: Vec<_> = obj.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(
        keys,
        vec![
            Scalar::Bool(true),
            Scalar::Null,
            Scalar::from(3i64),
            Scalar::from("s"),
        ]
    );
}

#[test]
fn deeply_nested_mixed_containers() {
    let depth = 5_000;
    let mut text = String::new();
    for _ in 0..depth {
        text.push_str("{\"k\":[");
    }
    text.push_str("null");
    for _ in 0..depth {
        text.push_str("]}");
    }
    let v = parse(&text).unwrap();
    let mut cur = &v;
    for _ in 0..depth {
        let obj = cur.as_object().unwrap();
        let arr = obj.get_str("k").and_then(Value::as_array).unwrap();
        cur = arr.get(0).unwrap();
    }
    assert!(cur.is_null());
}

// =============================================================================
// Spans
// =============================================================================

#[test]
fn nested_container_spans_reproduce_literals() {
    let text = r#"{ "outer" : [ {"x":1} , [2] ] }"#;
    let obj = parse_object(text).unwrap();
    assert_eq!(obj.source_text(text), Some(text));

    let outer = obj.get_str("outer").and_then(Value::as_array).unwrap();
    assert_eq!(outer.source_text(text), Some(r#"[ {"x":1} , [2] ]"#));

    let inner_obj = outer.get(0).and_then(Value::as_object).unwrap();
    assert_eq!(inner_obj.source_text(text), Some(r#"{"x":1}"#));

    let inner_arr = outer.get(1).and_then(Value::as_array).unwrap();
    assert_eq!(inner_arr.source_text(text), Some("[2]"));
}

#[test]
fn span_covers_container_including_delimiters() {
    let text = "{\"a\":1,\"b\":[2,3]}";
    let obj = parse_object(text).unwrap();
    assert_eq!(obj.source_span().as_range(), 0..17);
    let arr = obj.get_str("b").and_then(Value::as_array).unwrap();
    assert_eq!(arr.source_span().as_range(), 11..16);
}

#[test]
fn spans_survive_giant_strings() {
    // Offsets must account for the unescaped payload bytes.
    let text = "[1,'4 ]]]]',{}]";
    let arr = parse(text).unwrap();
    let arr = arr.as_array().unwrap();
    let obj = arr.get(2).and_then(Value::as_object).unwrap();
    assert_eq!(obj.source_span().as_range(), 12..14);
    assert_eq!(obj.source_text(text), Some("{}"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn empty_input() {
    assert_eq!(err(""), (ErrorCode::EmptyInput, 0));
    assert_eq!(err(" \t\n"), (ErrorCode::EmptyInput, 3));
}

#[test]
fn unterminated_containers() {
    assert_eq!(err("{"), (ErrorCode::UnterminatedContainer, 1));
    assert_eq!(err("[1,2"), (ErrorCode::UnterminatedContainer, 4));
    assert_eq!(err("{\"a\":{\"b\":1}"), (ErrorCode::UnterminatedContainer, 12));
}

#[test]
fn malformed_giant_strings() {
    assert_eq!(err("'5 ab'").0, ErrorCode::MalformedGiantString);
    assert_eq!(err("' x'").0, ErrorCode::MalformedGiantString);
    assert_eq!(err("[1,'2 abc']").0, ErrorCode::MalformedGiantString);
}

#[test]
fn string_errors_bubble_up_from_nested_context() {
    let e = parse("{\"k\":\"ab").unwrap_err();
    assert_eq!(e.code, ErrorCode::UnterminatedString);
    let e = parse("[\"a\", \"b\\q\"]").unwrap_err();
    assert_eq!(e.code, ErrorCode::InvalidEscape);
    assert_eq!(e.index, 9);
}

#[test]
fn separator_errors() {
    assert_eq!(err("{\"a\":1,,\"b\":2}"), (ErrorCode::MalformedComma, 7));
    assert_eq!(err("{\"a\"::1}"), (ErrorCode::MalformedColon, 5));
    assert_eq!(err("[1,2,]"), (ErrorCode::MalformedComma, 5));
    assert_eq!(err("[1 2]"), (ErrorCode::MalformedComma, 3));
}

#[test]
fn invalid_constants_and_numbers() {
    assert_eq!(err("[frue]"), (ErrorCode::InvalidConstant, 1));
    assert_eq!(err("{\"a\":tru}"), (ErrorCode::InvalidConstant, 5));
    assert_eq!(err("[1e]"), (ErrorCode::InvalidNumber, 1));
    assert_eq!(err("{\"a\":--1}"), (ErrorCode::InvalidNumber, 5));
}

#[test]
fn uppercase_keywords_rejected() {
    assert_eq!(err("True").0, ErrorCode::UnexpectedCharacter('T'));
    assert_eq!(err("[NULL]").0, ErrorCode::UnexpectedCharacter('N'));
}

#[test]
fn error_display_is_positioned() {
    let e = parse("[1,2,]").unwrap_err();
    assert_eq!(e.to_string(), "malformed comma between members at index 5");
}
