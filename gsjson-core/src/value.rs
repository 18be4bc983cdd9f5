//! Value tree: scalars and ordered containers.
//!
//! A parse produces exactly one [`Value`]: a scalar, an ordered map, or
//! an ordered sequence. Object keys are [`Scalar`]s, not strings - the
//! grammar deliberately permits `{true:1,null:2,3:"x"}`.
//!
//! Containers carry the [`Span`] of the source literal they were parsed
//! from. Spans do not participate in equality: two trees compare equal
//! when their values do, wherever the text came from.

use std::mem;

use crate::span::Span;

/// A numeric value, syntactically typed.
///
/// A token containing `.`, `e`, or `E` is a float; otherwise it is an
/// integer, falling back to float when it overflows `i64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parse a numeric token against the number grammar.
    ///
    /// Grammar: optional `-`, one or more integer digits, optional
    /// fraction (`.` + digits), optional exponent (`e`/`E`, optional
    /// sign, digits). Returns `None` for anything else - including the
    /// locale-style forms the grammar does not cover.
    pub fn parse(token: &str) -> Option<Number> {
        let bytes = token.as_bytes();
        let mut i = 0;

        if bytes.first() == Some(&b'-') {
            i += 1;
        }

        let int_digits = count_digits(&bytes[i..]);
        if int_digits == 0 {
            return None;
        }
        i += int_digits;

        let mut is_float = false;
        if bytes.get(i) == Some(&b'.') {
            is_float = true;
            i += 1;
            let frac_digits = count_digits(&bytes[i..]);
            if frac_digits == 0 {
                return None;
            }
            i += frac_digits;
        }

        if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
            is_float = true;
            i += 1;
            if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
                i += 1;
            }
            let exp_digits = count_digits(&bytes[i..]);
            if exp_digits == 0 {
                return None;
            }
            i += exp_digits;
        }

        if i != bytes.len() {
            return None;
        }

        if is_float {
            return token.parse::<f64>().ok().map(Number::Float);
        }
        match token.parse::<i64>() {
            Ok(n) => Some(Number::Int(n)),
            // Magnitude beyond i64: keep the value as a float.
            Err(_) => token.parse::<f64>().ok().map(Number::Float),
        }
    }

    /// Get as `i64` if this is an integer.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(*n),
            Number::Float(_) => None,
        }
    }

    /// Get as `f64`, converting integers.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::Float(x) => *x,
        }
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// A scalar value: the leaf type of the tree, and the key type of
/// objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Check if this is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Try to get as boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a number.
    #[inline]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(Number::Int(n))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Number(Number::Float(x))
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

/// Insertion-ordered map from scalar keys to values.
///
/// Duplicate keys overwrite the value in place: the entry keeps its
/// original position, last write wins.
#[derive(Debug, Clone, Default)]
pub struct Object {
    entries: Vec<(Scalar, Value)>,
    span: Span,
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open_at(start: usize) -> Self {
        Object {
            entries: Vec::new(),
            span: Span::new(start, start),
        }
    }

    pub(crate) fn close_at(&mut self, end: usize) {
        self.span.end = end;
    }

    /// Insert a key/value pair, preserving insertion order.
    ///
    /// An existing key keeps its position and has its value replaced.
    pub fn insert(&mut self, key: impl Into<Scalar>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &Scalar) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a value by string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &Scalar) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the object has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The byte span of the object literal in the source text,
    /// including its braces.
    #[inline]
    pub fn source_span(&self) -> Span {
        self.span
    }

    /// Slice the object's literal text out of the source it was parsed
    /// from.
    pub fn source_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        self.span.slice(source)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        // Spans are provenance, not value.
        self.entries == other.entries
    }
}

impl FromIterator<(Scalar, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (Scalar, Value)>>(iter: I) -> Self {
        let mut obj = Object::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

/// Insertion-ordered sequence of values.
#[derive(Debug, Clone, Default)]
pub struct Array {
    items: Vec<Value>,
    span: Span,
}

impl Array {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open_at(start: usize) -> Self {
        Array {
            items: Vec::new(),
            span: Span::new(start, start),
        }
    }

    pub(crate) fn close_at(&mut self, end: usize) {
        self.span.end = end;
    }

    /// Append a value.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Get an element by position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Iterate over elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The byte span of the array literal in the source text,
    /// including its brackets.
    #[inline]
    pub fn source_span(&self) -> Span {
        self.span
    }

    /// Slice the array's literal text out of the source it was parsed
    /// from.
    pub fn source_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        self.span.slice(source)
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array {
            items: iter.into_iter().collect(),
            span: Span::default(),
        }
    }
}

// The derived destructor would recurse once per nesting level and blow
// the native stack on trees the heap-stack parser happily builds.
// Containers hand their children to a shared worklist instead, so
// teardown is iterative at any depth.
fn drop_children(mut worklist: Vec<Value>) {
    while let Some(mut value) = worklist.pop() {
        match &mut value {
            Value::Object(o) => {
                worklist.extend(o.entries.drain(..).map(|(_, child)| child));
            }
            Value::Array(a) => worklist.append(&mut a.items),
            Value::Scalar(_) => {}
        }
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        // Scalar-only entries cannot recurse; skip the worklist.
        if self.entries.iter().any(|(_, v)| !matches!(v, Value::Scalar(_))) {
            drop_children(self.entries.drain(..).map(|(_, child)| child).collect());
        }
    }
}

impl Drop for Array {
    fn drop(&mut self) {
        if self.items.iter().any(|v| !matches!(v, Value::Scalar(_))) {
            drop_children(mem::take(&mut self.items));
        }
    }
}

/// A node of the value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Object(Object),
    Array(Array),
}

impl Value {
    /// The null value.
    pub const NULL: Value = Value::Scalar(Scalar::Null);

    /// Check if this is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    /// Get the scalar if this is a leaf.
    #[inline]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Scalar::as_bool)
    }

    /// Try to get as a number.
    #[inline]
    pub fn as_number(&self) -> Option<Number> {
        self.as_scalar().and_then(Scalar::as_number)
    }

    /// Try to get as an integer.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_i64())
    }

    /// Try to get as a float, converting integers.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64())
    }

    /// Try to get as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Try to get as an object.
    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Try to get as an array.
    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s.into())
    }
}
