//! GS-JSON Core Codec
//!
//! Parser and serializer for GS-JSON: JSON with a length-prefixed
//! "giant string" extension (`'123 <raw bytes>'`) that embeds very
//! large string values without per-character escaping, plus non-string
//! object keys. Parsing is a single-pass state machine over an
//! explicit frame stack, so nesting depth is unbounded.
//!
//! # Architecture
//!
//! - **classify.rs** - character class predicates
//! - **span.rs** - byte spans into the source text
//! - **value.rs** - scalar values and ordered containers
//! - **error.rs** - error codes and the positioned ParseError
//! - **extract.rs** - escaped and giant string decoding
//! - **parser.rs** - the state machine and typed entry points
//! - **serialize.rs** - tree-to-text rendering
//!
//! # Example
//!
//! ```
//! use gsjson_core::{parse, to_text};
//!
//! let v = parse("{\"a\":1,\"b\":[2,3]}").unwrap();
//! assert_eq!(v.as_object().unwrap().get_str("a").unwrap().as_i64(), Some(1));
//! assert_eq!(to_text(&v), "{\"a\":1,\"b\":[2,3]}");
//! ```

mod classify;
mod extract;

pub mod error;
pub mod parser;
pub mod serialize;
pub mod span;
pub mod value;

pub use error::{ErrorCode, ParseError};
pub use parser::{parse, parse_array, parse_bool, parse_number, parse_object, parse_string};
pub use serialize::{to_text, to_text_with_limit, DEFAULT_GIANT_THRESHOLD};
pub use span::Span;
pub use value::{Array, Number, Object, Scalar, Value};
