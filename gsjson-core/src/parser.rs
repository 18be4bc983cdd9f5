//! The parser state machine.
//!
//! A single pass over the input drives a cursor through a small set of
//! states. Nesting is handled with an explicit heap-allocated stack of
//! [`Frame`]s rather than native recursion, so depth is bounded only by
//! memory: a thousand-level-deep document parses without touching the
//! call stack.
//!
//! Opening `{`/`[` pushes a frame capturing the current container and
//! the pending key, then makes the new container current. The matching
//! `}`/`]` finalizes the child's source span, pops a frame, inserts the
//! child into the popped parent, and resumes the parent's state. A
//! close with an empty stack is the end of the parse; everything after
//! the root value is ignored.
//!
//! All malformed input is fatal: errors from the string extractor and
//! number grammar bubble up unchanged, annotated with the byte index
//! where they were detected.

use std::mem;

use crate::classify;
use crate::error::{ErrorCode, ParseError};
use crate::extract::extract_string;
use crate::value::{Array, Number, Object, Scalar, Value};

/// Parse GS-JSON text into a value tree.
///
/// The root may be any value; a bare scalar root is returned without
/// any stack activity.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    Parser::new(input).run()
}

/// Parse text whose root must be an object.
pub fn parse_object(input: &str) -> Result<Object, ParseError> {
    match parse(input)? {
        Value::Object(o) => Ok(o),
        _ => Err(ParseError::new(ErrorCode::UnexpectedRoot("an object"), 0)),
    }
}

/// Parse text whose root must be an array.
pub fn parse_array(input: &str) -> Result<Array, ParseError> {
    match parse(input)? {
        Value::Array(a) => Ok(a),
        _ => Err(ParseError::new(ErrorCode::UnexpectedRoot("an array"), 0)),
    }
}

/// Parse text whose root must be a string.
pub fn parse_string(input: &str) -> Result<String, ParseError> {
    match parse(input)? {
        Value::Scalar(Scalar::String(s)) => Ok(s),
        _ => Err(ParseError::new(ErrorCode::UnexpectedRoot("a string"), 0)),
    }
}

/// Parse text whose root must be a number.
pub fn parse_number(input: &str) -> Result<Number, ParseError> {
    match parse(input)? {
        Value::Scalar(Scalar::Number(n)) => Ok(n),
        _ => Err(ParseError::new(ErrorCode::UnexpectedRoot("a number"), 0)),
    }
}

/// Parse text whose root must be a boolean.
pub fn parse_bool(input: &str) -> Result<bool, ParseError> {
    match parse(input)? {
        Value::Scalar(Scalar::Bool(b)) => Ok(b),
        _ => Err(ParseError::new(ErrorCode::UnexpectedRoot("a boolean"), 0)),
    }
}

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting an object key.
    PropertyName,
    /// Expecting the colon and then a value after a key.
    Heuristic,
    /// Cursor sits on an opening quote.
    InString,
    /// Cursor sits on a number-start byte.
    InNumber,
    /// Cursor sits on a lowercase letter.
    InConstant,
    /// Inside an object, between members.
    InObject,
    /// Inside an array, between elements.
    InArray,
}

/// The container currently being filled.
#[derive(Debug)]
enum Container {
    Object(Object),
    Array(Array),
}

impl Container {
    fn is_empty(&self) -> bool {
        match self {
            Container::Object(o) => o.is_empty(),
            Container::Array(a) => a.is_empty(),
        }
    }

    fn close_at(&mut self, end: usize) {
        match self {
            Container::Object(o) => o.close_at(end),
            Container::Array(a) => a.close_at(end),
        }
    }

    fn insert_child(&mut self, key: Option<Scalar>, child: Value) {
        match self {
            // A child in object context always has its key recorded.
            Container::Object(o) => {
                if let Some(k) = key {
                    o.insert(k, child);
                }
            }
            Container::Array(a) => a.push(child),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Container::Object(o) => Value::Object(o),
            Container::Array(a) => Value::Array(a),
        }
    }
}

/// A pending parent, shelved while its child container is parsed.
#[derive(Debug)]
struct Frame {
    /// Key the finished child will be inserted under (object parents).
    key: Option<Scalar>,
    /// The shelved parent container.
    parent: Container,
    /// State to resume once the child completes.
    resume: State,
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    state: State,
    stack: Vec<Frame>,
    container: Container,
    property_name: Option<Scalar>,
    expecting_comma: bool,
    expecting_colon: bool,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            state: State::InObject,
            stack: Vec::new(),
            // Placeholder until the root dispatch decides; a bare
            // scalar root returns before the loop ever reads this.
            container: Container::Object(Object::new()),
            property_name: None,
            expecting_comma: false,
            expecting_colon: false,
        }
    }

    fn run(mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or(ParseError::new(ErrorCode::EmptyInput, self.pos))?;

        // Root dispatch: containers enter the state loop, bare scalars
        // return immediately.
        match b {
            b'{' => {
                self.container = Container::Object(Object::open_at(self.pos));
                self.state = State::InObject;
                self.pos += 1;
            }
            b'[' => {
                self.container = Container::Array(Array::open_at(self.pos));
                self.state = State::InArray;
                self.pos += 1;
            }
            b'"' | b'\'' => {
                let extracted = extract_string(self.input, self.pos)?;
                return Ok(Value::Scalar(Scalar::String(extracted.value)));
            }
            _ if classify::is_letter(b) => {
                return self.scan_constant().map(Value::Scalar);
            }
            _ if classify::is_number_start(b) => {
                return self.scan_number().map(|n| Value::Scalar(Scalar::Number(n)));
            }
            _ => {
                return Err(ParseError::new(
                    ErrorCode::UnexpectedCharacter(self.current_char()),
                    self.pos,
                ));
            }
        }

        loop {
            if self.pos >= self.bytes.len() {
                return Err(ParseError::new(
                    ErrorCode::UnterminatedContainer,
                    self.bytes.len(),
                ));
            }
            match self.state {
                State::PropertyName => self.step_property_name()?,
                State::Heuristic => self.step_heuristic()?,
                State::InString => {
                    let extracted = extract_string(self.input, self.pos)?;
                    self.pos = extracted.close + 1;
                    self.complete_value(Value::Scalar(Scalar::String(extracted.value)));
                }
                State::InNumber => {
                    let n = self.scan_number()?;
                    self.complete_value(Value::Scalar(Scalar::Number(n)));
                }
                State::InConstant => {
                    let s = self.scan_constant()?;
                    self.complete_value(Value::Scalar(s));
                }
                State::InObject => {
                    if let Some(root) = self.step_object()? {
                        return Ok(root);
                    }
                }
                State::InArray => {
                    if let Some(root) = self.step_array()? {
                        return Ok(root);
                    }
                }
            }
        }
    }

    /// Parse an object key: a quoted string, a constant token, or a
    /// number. Keys are scalars, not necessarily strings.
    fn step_property_name(&mut self) -> Result<(), ParseError> {
        let b = self.bytes[self.pos];
        if b == b'"' || b == b'\'' {
            let extracted = extract_string(self.input, self.pos)?;
            self.pos = extracted.close + 1;
            self.property_name = Some(Scalar::String(extracted.value));
        } else if classify::is_letter(b) {
            let end = self.scan_while(self.pos, classify::is_letter);
            let token = &self.input[self.pos..end];
            // Lenient key coercion: `null` is the null key, everything
            // else collapses to a boolean.
            self.property_name = Some(if token == "null" {
                Scalar::Null
            } else {
                Scalar::Bool(token == "true")
            });
            self.pos = end;
        } else if classify::is_number_start(b) {
            let n = self.scan_number()?;
            self.property_name = Some(Scalar::Number(n));
        } else {
            return Err(ParseError::new(
                ErrorCode::UnexpectedCharacter(self.current_char()),
                self.pos,
            ));
        }
        self.state = State::Heuristic;
        self.expecting_colon = true;
        Ok(())
    }

    /// After a key: require exactly one colon, then dispatch on the
    /// first significant character of the value.
    fn step_heuristic(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        let Some(&b) = self.bytes.get(self.pos) else {
            // Loop top reports the unterminated container.
            return Ok(());
        };

        if self.expecting_colon {
            if b != b':' {
                return Err(ParseError::new(ErrorCode::MalformedColon, self.pos));
            }
            self.expecting_colon = false;
            self.pos += 1;
            return Ok(());
        }
        if b == b':' {
            return Err(ParseError::new(ErrorCode::MalformedColon, self.pos));
        }

        match b {
            b'"' | b'\'' => self.state = State::InString,
            b'{' => self.push_container(true),
            b'[' => self.push_container(false),
            _ if classify::is_letter(b) => self.state = State::InConstant,
            _ if classify::is_number_start(b) => self.state = State::InNumber,
            _ => {
                return Err(ParseError::new(
                    ErrorCode::UnexpectedCharacter(self.current_char()),
                    self.pos,
                ));
            }
        }
        Ok(())
    }

    /// Object body: comma discipline, close, or the next key.
    fn step_object(&mut self) -> Result<Option<Value>, ParseError> {
        self.skip_whitespace();
        let Some(&b) = self.bytes.get(self.pos) else {
            return Ok(None);
        };

        match b {
            b',' => {
                if !self.expecting_comma {
                    return Err(ParseError::new(ErrorCode::MalformedComma, self.pos));
                }
                self.expecting_comma = false;
                self.pos += 1;
                Ok(None)
            }
            b'}' => self.close_container(),
            _ if self.expecting_comma => {
                Err(ParseError::new(ErrorCode::MalformedComma, self.pos))
            }
            _ => {
                self.state = State::PropertyName;
                Ok(None)
            }
        }
    }

    /// Array body: comma discipline, close, or the next element.
    fn step_array(&mut self) -> Result<Option<Value>, ParseError> {
        self.skip_whitespace();
        let Some(&b) = self.bytes.get(self.pos) else {
            return Ok(None);
        };

        // A stray `}` reports as the character itself below, not as a
        // missing comma.
        if b != b',' && b != b']' && b != b'}' && self.expecting_comma {
            return Err(ParseError::new(ErrorCode::MalformedComma, self.pos));
        }

        match b {
            b',' => {
                if !self.expecting_comma {
                    return Err(ParseError::new(ErrorCode::MalformedComma, self.pos));
                }
                self.expecting_comma = false;
                self.pos += 1;
                Ok(None)
            }
            b']' => self.close_container(),
            b'"' | b'\'' => {
                self.state = State::InString;
                Ok(None)
            }
            b'{' => {
                self.push_container(true);
                Ok(None)
            }
            b'[' => {
                self.push_container(false);
                Ok(None)
            }
            _ if classify::is_letter(b) => {
                self.state = State::InConstant;
                Ok(None)
            }
            _ if classify::is_number_start(b) => {
                self.state = State::InNumber;
                Ok(None)
            }
            _ => Err(ParseError::new(
                ErrorCode::UnexpectedCharacter(self.current_char()),
                self.pos,
            )),
        }
    }

    /// Shelve the current container on the stack and open a child at
    /// the cursor.
    fn push_container(&mut self, object: bool) {
        let child = if object {
            Container::Object(Object::open_at(self.pos))
        } else {
            Container::Array(Array::open_at(self.pos))
        };
        let resume = match self.container {
            Container::Object(_) => State::InObject,
            Container::Array(_) => State::InArray,
        };
        self.stack.push(Frame {
            key: self.property_name.take(),
            parent: mem::replace(&mut self.container, child),
            resume,
        });
        self.state = if object { State::InObject } else { State::InArray };
        self.pos += 1;
    }

    /// Finalize the current container at the closing delimiter under
    /// the cursor: seal its span, then either reinsert it into the
    /// popped parent or return it as the parse result.
    fn close_container(&mut self) -> Result<Option<Value>, ParseError> {
        // A comma directly before the closing delimiter is malformed.
        if !self.expecting_comma && !self.container.is_empty() {
            return Err(ParseError::new(ErrorCode::MalformedComma, self.pos));
        }
        self.container.close_at(self.pos + 1);
        self.pos += 1;

        match self.stack.pop() {
            Some(frame) => {
                let child = mem::replace(&mut self.container, frame.parent).into_value();
                self.container.insert_child(frame.key, child);
                self.state = frame.resume;
                self.expecting_comma = true;
                Ok(None)
            }
            None => {
                let root = mem::replace(&mut self.container, Container::Object(Object::new()));
                Ok(Some(root.into_value()))
            }
        }
    }

    /// Insert a completed scalar into the current container and resume
    /// its body state.
    fn complete_value(&mut self, value: Value) {
        self.expecting_comma = true;
        match &mut self.container {
            Container::Object(o) => {
                if let Some(key) = self.property_name.take() {
                    o.insert(key, value);
                }
                self.state = State::InObject;
            }
            Container::Array(a) => {
                a.push(value);
                self.state = State::InArray;
            }
        }
    }

    /// Scan a maximal number-body run at the cursor and parse it
    /// against the number grammar.
    fn scan_number(&mut self) -> Result<Number, ParseError> {
        let start = self.pos;
        let end = self.scan_while(start, classify::is_number_body);
        let token = &self.input[start..end];
        let n = Number::parse(token)
            .ok_or(ParseError::new(ErrorCode::InvalidNumber, start))?;
        self.pos = end;
        Ok(n)
    }

    /// Scan a maximal letter run at the cursor; only the exact tokens
    /// `true`, `false`, `null` are valid in value position.
    fn scan_constant(&mut self) -> Result<Scalar, ParseError> {
        let start = self.pos;
        let end = self.scan_while(start, classify::is_letter);
        let scalar = match &self.input[start..end] {
            "true" => Scalar::Bool(true),
            "false" => Scalar::Bool(false),
            "null" => Scalar::Null,
            _ => return Err(ParseError::new(ErrorCode::InvalidConstant, start)),
        };
        self.pos = end;
        Ok(scalar)
    }

    fn scan_while(&self, from: usize, pred: fn(u8) -> bool) -> usize {
        let mut i = from;
        while i < self.bytes.len() && pred(self.bytes[i]) {
            i += 1;
        }
        i
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && classify::is_whitespace(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    /// The char at the cursor, for error reporting. The cursor always
    /// sits on a char boundary when this is called.
    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\u{FFFD}')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(input: &str) -> ErrorCode {
        parse(input).unwrap_err().code
    }

    #[test]
    fn root_scalars() {
        assert_eq!(parse("null").unwrap(), Value::NULL);
        assert_eq!(parse("true").unwrap(), Value::from(true));
        assert_eq!(parse("false").unwrap(), Value::from(false));
        assert_eq!(parse("42").unwrap(), Value::from(42i64));
        assert_eq!(parse("-2.5").unwrap(), Value::from(-2.5));
        assert_eq!(parse("\"hi\"").unwrap(), Value::from("hi"));
        assert_eq!(parse("'2 hi'").unwrap(), Value::from("hi"));
    }

    #[test]
    fn leading_whitespace_skipped() {
        assert_eq!(parse(" \n\t null").unwrap(), Value::NULL);
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(code(""), ErrorCode::EmptyInput);
        assert_eq!(code("  \n\t "), ErrorCode::EmptyInput);
    }

    #[test]
    fn simple_object() {
        let v = parse("{\"a\":1,\"b\":\"x\"}").unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get_str("a").and_then(Value::as_i64), Some(1));
        assert_eq!(obj.get_str("b").and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn simple_array() {
        let v = parse("[1,2.5,\"x\",true,null]").unwrap();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 5);
        assert_eq!(arr.get(0).and_then(Value::as_i64), Some(1));
        assert_eq!(arr.get(1).and_then(Value::as_f64), Some(2.5));
        assert_eq!(arr.get(2).and_then(Value::as_str), Some("x"));
        assert_eq!(arr.get(3).and_then(Value::as_bool), Some(true));
        assert!(arr.get(4).map(Value::is_null).unwrap_or(false));
    }

    #[test]
    fn empty_containers() {
        assert_eq!(parse("{}").unwrap(), Value::Object(Object::new()));
        assert_eq!(parse("[]").unwrap(), Value::Array(Array::new()));
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        // Far deeper than recursive descent survives with typical
        // frame sizes.
        let depth = 10_000;
        let mut text = String::new();
        text.push_str(&"[".repeat(depth));
        text.push('1');
        text.push_str(&"]".repeat(depth));

        let v = parse(&text).unwrap();
        let mut cur = &v;
        for _ in 0..depth {
            let arr = cur.as_array().unwrap();
            assert_eq!(arr.len(), 1);
            cur = arr.get(0).unwrap();
        }
        assert_eq!(cur.as_i64(), Some(1));
    }

    #[test]
    fn non_string_keys_in_order() {
        let v = parse("{true:1,null:2,3:\"x\"}").unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        let keys: Vec<_> = obj.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![Scalar::Bool(true), Scalar::Null, Scalar::from(3i64)]
        );
        assert_eq!(obj.get(&Scalar::from(3i64)).and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn lenient_key_coercion() {
        // Any unquoted letter run that is not `true`/`null` is the
        // false key.
        let v = parse("{maybe:1}").unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.get(&Scalar::Bool(false)).and_then(Value::as_i64), Some(1));
    }

    #[test]
    fn giant_string_value_and_key() {
        let v = parse("{'3 key':'5 value'}").unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.get_str("key").and_then(Value::as_str), Some("value"));
    }

    #[test]
    fn comma_discipline() {
        assert_eq!(code("{\"a\":1,,\"b\":2}"), ErrorCode::MalformedComma);
        assert_eq!(code("[1,,2]"), ErrorCode::MalformedComma);
        assert_eq!(code("[1 2]"), ErrorCode::MalformedComma);
        assert_eq!(code("{\"a\":1 \"b\":2}"), ErrorCode::MalformedComma);
        assert_eq!(code("[1,2,]"), ErrorCode::MalformedComma);
        assert_eq!(code("{\"a\":1,}"), ErrorCode::MalformedComma);
        assert_eq!(code("[,1]"), ErrorCode::MalformedComma);
    }

    #[test]
    fn wrong_close_in_array_is_not_a_comma_problem() {
        // A `}` where `]` belongs is reported as the stray character
        // itself, even in comma position.
        assert_eq!(code("[1}"), ErrorCode::UnexpectedCharacter('}'));
        assert_eq!(code("[1,2}"), ErrorCode::UnexpectedCharacter('}'));
    }

    #[test]
    fn colon_discipline() {
        assert_eq!(code("{\"a\"::1}"), ErrorCode::MalformedColon);
        assert_eq!(code("{\"a\" 1}"), ErrorCode::MalformedColon);
    }

    #[test]
    fn unterminated_containers() {
        assert_eq!(code("{"), ErrorCode::UnterminatedContainer);
        assert_eq!(code("["), ErrorCode::UnterminatedContainer);
        assert_eq!(code("{\"a\":1"), ErrorCode::UnterminatedContainer);
        assert_eq!(code("[[1],"), ErrorCode::UnterminatedContainer);
        assert_eq!(code("{\"a\":"), ErrorCode::UnterminatedContainer);
    }

    #[test]
    fn constant_strictness() {
        assert_eq!(code("[tru]"), ErrorCode::InvalidConstant);
        assert_eq!(code("nul"), ErrorCode::InvalidConstant);
        assert_eq!(code("truefalse"), ErrorCode::InvalidConstant);
        // Uppercase never even starts a constant.
        assert_eq!(code("True"), ErrorCode::UnexpectedCharacter('T'));
        assert_eq!(code("NULL"), ErrorCode::UnexpectedCharacter('N'));
    }

    #[test]
    fn number_errors_are_positioned() {
        let err = parse("[1, 2..5]").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidNumber);
        assert_eq!(err.index, 4);
    }

    #[test]
    fn unexpected_character_reports_char_and_index() {
        let err = parse("[1, #]").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedCharacter('#'));
        assert_eq!(err.index, 4);
    }

    #[test]
    fn container_spans() {
        let text = "{\"a\":1,\"b\":[2,3]}";
        let v = parse(text).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.source_span().as_range(), 0..17);
        assert_eq!(obj.source_text(text), Some(text));

        let arr = obj.get_str("b").unwrap().as_array().unwrap();
        assert_eq!(arr.source_span().as_range(), 11..16);
        assert_eq!(arr.source_text(text), Some("[2,3]"));
    }

    #[test]
    fn trailing_text_after_root_is_ignored() {
        let v = parse("{\"a\":1} trailing garbage").unwrap();
        assert_eq!(v.as_object().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let v = parse("{\"a\":1,\"a\":2}").unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get_str("a").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn typed_entry_points() {
        assert_eq!(parse_object("{\"a\":1}").unwrap().len(), 1);
        assert_eq!(parse_array("[1]").unwrap().len(), 1);
        assert_eq!(parse_string("\"s\"").unwrap(), "s");
        assert_eq!(parse_number("7").unwrap(), Number::Int(7));
        assert!(parse_bool("true").unwrap());

        let err = parse_object("[1]").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedRoot("an object"));
        let err = parse_bool("null").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedRoot("a boolean"));
    }

    #[test]
    fn whitespace_tolerance_inside_containers() {
        let v = parse("{ \"a\" : 1 ,\n\t\"b\" : [ 1 , 2 ] }").unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(
            obj.get_str("b").unwrap().as_array().unwrap().len(),
            2
        );
    }

    #[test]
    fn carriage_return_is_not_whitespace() {
        assert_eq!(code("\r{}"), ErrorCode::UnexpectedCharacter('\r'));
    }
}
