//! Streaming JSONPath value extraction.
//!
//! `jetpath` reads a byte stream of concatenated JSON documents in a single
//! forward pass and hands out the raw encoded bytes of every sub-value whose
//! path matches a caller-provided selector. Nothing is materialized beyond
//! the largest single matched value: arrays of millions of records stream
//! through a fixed-size window.
//!
//! # Selectors
//!
//! A JSONPath subset: `$` is the root, `.field` descends into an object key
//! (raw key bytes, escapes kept verbatim), `[2]` is a literal array index,
//! and `*` is a glob wildcard matching any run of path bytes. The selector
//! `$.` matches every top-level value of the stream, so NDJSON-like
//! concatenations need no outer wrapper.
//!
//! `$.store.book[*]` streams one callback per book; `$.store.book` delivers
//! the whole book array as one raw slice.
//!
//! # Example
//!
//! ```
//! use jetpath::StreamDecoder;
//!
//! let input = br#"{"data":[{"id":1},{"id":2}]} {"data":[{"id":3}]}"#;
//! let mut ids = Vec::new();
//! StreamDecoder::new(&input[..]).decode_path("$.data[*].id", |_path, raw| {
//!     ids.push(String::from_utf8_lossy(raw).into_owned());
//!     Ok(())
//! })?;
//! assert_eq!(ids, ["1", "2", "3"]);
//! # Ok::<(), jetpath::StreamError>(())
//! ```
//!
//! Matched slices borrow the session's buffer and are valid only inside the
//! callback. Errors are terminal and sticky per session; a finished session
//! can be [`reset`](StreamDecoder::reset) onto new input without losing its
//! allocations.

mod bind;
mod buffer;
mod cancel;
mod decoder;
mod error;
mod handler;
mod path;
mod scanner;
mod selector;
mod state;

pub use bind::TypedHandler;
pub use cancel::CancelToken;
pub use decoder::StreamDecoder;
pub use error::{HandlerError, StreamError, StreamResult, SyntaxError};
pub use handler::{RawHandler, StreamHandler};
