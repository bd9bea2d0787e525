//! The decode session: structural dispatch over the scanner, path tracking,
//! selector matching, and handler invocation.
//!
//! [`StreamDecoder`] reads a concatenation of JSON values from any
//! [`Read`](std::io::Read) source, strictly forward and in constant memory
//! aside from the largest single matched value. Matched values are handed to
//! handlers as raw byte slices borrowed from the internal buffer; nothing is
//! decoded on the caller's behalf unless a typed handler asks for it.

use std::io::Read;
use std::ops::Range;

use crate::buffer::StreamBuffer;
use crate::cancel::CancelToken;
use crate::error::{quote_char, HandlerError, StreamError, StreamResult, SyntaxError};
use crate::handler::{RawHandler, StreamHandler};
use crate::path::PathBuilder;
use crate::scanner::{Scanner, Signal};
use crate::selector::{match_first, Selector};
use crate::state::TokenState;

/// Streaming JSONPath decode session over a byte source.
///
/// A session processes one input stream at a time. After a decode finishes
/// (cleanly or with an error) the session can be [`reset`](Self::reset) onto
/// a fresh input, reusing all allocations.
///
/// ```no_run
/// use jetpath::StreamDecoder;
///
/// let file = std::fs::File::open("feed.json")?;
/// let mut dec = StreamDecoder::new(file);
/// dec.decode_path("$.store.book[*].price", |path, raw| {
///     println!("{} = {}", String::from_utf8_lossy(path), String::from_utf8_lossy(raw));
///     Ok(())
/// })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct StreamDecoder<R> {
    buf: StreamBuffer<R>,
    scan: Scanner,
    token_state: TokenState,
    token_stack: Vec<TokenState>,
    path: PathBuilder,
    /// Copy of the current path handed to callbacks, so the tracker itself
    /// stays borrowable while the value slice is read.
    cur_path: Vec<u8>,
    cancel: Option<CancelToken>,
    err: Option<StreamError>,
}

impl<R: Read> StreamDecoder<R> {
    /// Create a session reading from `reader`.
    ///
    /// The session buffers internally and may read past the values it
    /// reports; do not interleave reads on `reader` elsewhere.
    pub fn new(reader: R) -> Self {
        Self {
            buf: StreamBuffer::new(reader),
            scan: Scanner::new(),
            token_state: TokenState::TopValue,
            token_stack: Vec::new(),
            path: PathBuilder::new(),
            cur_path: Vec::new(),
            cancel: None,
            err: None,
        }
    }

    /// Install a cancellation handle checked once per dispatch iteration.
    pub fn set_cancel_token(&mut self, token: CancelToken) {
        self.cancel = Some(token);
    }

    /// The sticky terminal error, if the last decode failed.
    ///
    /// `None` after clean end-of-stream or before the first decode.
    pub fn err(&self) -> Option<&StreamError> {
        self.err.as_ref()
    }

    /// Restore a completed session to a fresh input, preserving capacity.
    pub fn reset(&mut self, reader: R) {
        self.buf.reset(reader);
        self.scan.reset();
        self.scan.bytes = 0;
        self.token_state = TokenState::TopValue;
        self.token_stack.clear();
        self.path.reset();
        self.cur_path.clear();
        self.cancel = None;
        self.err = None;
    }

    /// Decode the stream against a single selector, invoking `on_match` with
    /// `(path, raw_value)` for every matching sub-value in document order.
    ///
    /// Both slices are borrows into session buffers and are valid only for
    /// the duration of the call; copy them to retain them.
    pub fn decode_path<F>(&mut self, selector: &str, on_match: F) -> StreamResult<()>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), HandlerError>,
    {
        let mut handler = RawHandler::new(selector, on_match);
        let mut handlers: [&mut dyn StreamHandler; 1] = [&mut handler];
        self.decode(&mut handlers)
    }

    /// Decode the stream against every handler's selector at once.
    ///
    /// Selectors are compiled up front; a compile failure aborts before any
    /// input is consumed. When several selectors match one value, the
    /// earliest handler in `handlers` wins and is the only one invoked.
    /// Callbacks are serialized in document order. The returned result is
    /// the session's completion signal; it is also retained for
    /// [`err`](Self::err).
    pub fn decode(&mut self, handlers: &mut [&mut dyn StreamHandler]) -> StreamResult<()> {
        if let Some(e) = &self.err {
            return Err(e.clone());
        }
        let result = self.try_decode(handlers);
        if let Err(e) = &result {
            self.err = Some(e.clone());
        }
        result
    }

    fn try_decode(&mut self, handlers: &mut [&mut dyn StreamHandler]) -> StreamResult<()> {
        let mut selectors = Vec::with_capacity(handlers.len());
        for handler in handlers.iter() {
            selectors.push(Selector::compile(handler.at_path())?);
        }
        self.dispatch(&selectors, handlers)
    }

    /// The main event loop: peek a structural byte, apply the token-state
    /// transition table, keep the path current, and emit matched values.
    fn dispatch(
        &mut self,
        selectors: &[Selector],
        handlers: &mut [&mut dyn StreamHandler],
    ) -> StreamResult<()> {
        loop {
            if let Some(token) = &self.cancel {
                if token.is_canceled() {
                    return Err(StreamError::Canceled);
                }
            }
            let c = match self.buf.peek()? {
                Some(c) => c,
                None => return Ok(()),
            };
            match c {
                b'[' => {
                    if !self.token_state.value_allowed() {
                        return Err(self.token_error(c));
                    }
                    // A literal selector naming this array takes the whole
                    // array as one value; `[*]` selectors do not match here
                    // and stream per element through the descent below.
                    if let Some(i) = match_first(selectors, self.path.path_bytes()) {
                        self.emit_value(handlers, i)?;
                        continue;
                    }
                    self.buf.scanp += 1;
                    self.token_stack.push(self.token_state);
                    self.token_state = TokenState::ArrayStart;
                    self.path.start_array();
                }
                b']' => {
                    if self.token_state != TokenState::ArrayStart
                        && self.token_state != TokenState::ArrayComma
                    {
                        return Err(self.token_error(c));
                    }
                    self.buf.scanp += 1;
                    self.token_state = self.token_stack.pop().unwrap_or(TokenState::TopValue);
                    self.path.end_array();
                    self.token_state = self.token_state.after_value();
                }
                b'{' => {
                    if !self.token_state.value_allowed() {
                        return Err(self.token_error(c));
                    }
                    if let Some(i) = match_first(selectors, self.path.path_bytes()) {
                        self.emit_value(handlers, i)?;
                        continue;
                    }
                    self.buf.scanp += 1;
                    self.token_stack.push(self.token_state);
                    self.token_state = TokenState::ObjectStart;
                    self.path.start_object();
                }
                b'}' => {
                    if self.token_state != TokenState::ObjectStart
                        && self.token_state != TokenState::ObjectComma
                    {
                        return Err(self.token_error(c));
                    }
                    self.buf.scanp += 1;
                    self.token_state = self.token_stack.pop().unwrap_or(TokenState::TopValue);
                    self.path.end_object();
                    self.token_state = self.token_state.after_value();
                }
                b':' => {
                    if self.token_state != TokenState::ObjectColon {
                        return Err(self.token_error(c));
                    }
                    self.buf.scanp += 1;
                    self.token_state = TokenState::ObjectValue;
                }
                b',' => match self.token_state {
                    TokenState::ArrayComma => {
                        self.buf.scanp += 1;
                        self.path.increment_array_index();
                        self.token_state = TokenState::ArrayValue;
                    }
                    TokenState::ObjectComma => {
                        self.buf.scanp += 1;
                        self.token_state = TokenState::ObjectKey;
                    }
                    _ => return Err(self.token_error(c)),
                },
                b'"' if matches!(
                    self.token_state,
                    TokenState::ObjectStart | TokenState::ObjectKey
                ) =>
                {
                    // Read the key through the scanner like any string value,
                    // then record its raw bytes (quotes stripped) as the
                    // current path segment.
                    let saved = self.token_state;
                    self.token_state = TokenState::TopValue;
                    let range = self.decode_bytes();
                    self.token_state = saved;
                    let range = range?;
                    self.token_state = TokenState::ObjectColon;
                    let key = range.start + 1..range.end - 1;
                    self.path.set_object_key(self.buf.window(key));
                }
                _ => {
                    if !self.token_state.value_allowed() {
                        return Err(self.token_error(c));
                    }
                    let range = self.decode_bytes()?;
                    if let Some(i) = match_first(selectors, self.path.path_bytes()) {
                        self.cur_path.clear();
                        self.cur_path.extend_from_slice(self.path.path_bytes());
                        handlers[i]
                            .on_value(&self.cur_path, self.buf.window(range))
                            .map_err(StreamError::callback)?;
                    }
                }
            }
        }
    }

    /// Read the composite value at the cursor in full and hand it to the
    /// matched handler. The path is captured first; it does not change while
    /// the value is consumed.
    fn emit_value(
        &mut self,
        handlers: &mut [&mut dyn StreamHandler],
        idx: usize,
    ) -> StreamResult<()> {
        self.cur_path.clear();
        self.cur_path.extend_from_slice(self.path.path_bytes());
        let range = self.decode_bytes()?;
        handlers[idx]
            .on_value(&self.cur_path, self.buf.window(range))
            .map_err(StreamError::callback)
    }

    /// Consume exactly one value starting at the cursor and return its byte
    /// range in the buffer. The range stays valid until the next buffer
    /// operation, i.e. for the duration of the following callback.
    fn decode_bytes(&mut self) -> StreamResult<Range<usize>> {
        self.token_prepare_for_decode()?;
        if !self.token_state.value_allowed() {
            return Err(StreamError::syntax(
                "not at beginning of value",
                self.buf.offset(),
            ));
        }
        let n = self.read_value()?;
        let start = self.buf.scanp;
        self.buf.scanp += n;
        self.token_state = self.token_state.after_value();
        Ok(start..start + n)
    }

    /// Feed bytes to the scanner until it reports the end of the value,
    /// refilling from the reader between passes. Returns the length of the
    /// value encoding; on `End` the terminator byte is excluded, on
    /// `EndObject`/`EndArray` the closing bracket is included.
    fn read_value(&mut self) -> StreamResult<usize> {
        self.scan.reset();

        let mut scanp = self.buf.scanp;
        let mut exhausted = false;
        'input: loop {
            let mut i = scanp;
            while i < self.buf.len() {
                let c = self.buf.byte_at(i);
                self.scan.bytes += 1;
                match self.scan.step(c) {
                    Signal::End => {
                        scanp = i;
                        break 'input;
                    }
                    Signal::EndObject | Signal::EndArray => {
                        // The close might also end the whole value; the next
                        // real byte may be slow to arrive, so probe with a
                        // synthesized space instead of blocking.
                        if self.scan.step(b' ') == Signal::End {
                            scanp = i + 1;
                            break 'input;
                        }
                    }
                    Signal::Error => return Err(self.take_scan_error()),
                    Signal::Continue => {}
                }
                i += 1;
            }
            scanp = self.buf.len();

            if exhausted {
                // A trailing number or literal can complete exactly at EOF.
                if self.scan.step(b' ') == Signal::End {
                    break 'input;
                }
                return Err(StreamError::unexpected_eof());
            }

            let n = scanp - self.buf.scanp;
            if self.buf.refill()? == 0 {
                exhausted = true;
            }
            scanp = self.buf.scanp + n;
        }
        Ok(scanp - self.buf.scanp)
    }

    /// Advance a separator state to the matching value state before an
    /// out-of-loop value read.
    fn token_prepare_for_decode(&mut self) -> StreamResult<()> {
        match self.token_state {
            TokenState::ArrayComma => match self.buf.peek()? {
                Some(b',') => {
                    self.buf.scanp += 1;
                    self.token_state = TokenState::ArrayValue;
                    Ok(())
                }
                _ => Err(StreamError::syntax(
                    "expected comma after array element",
                    self.buf.offset(),
                )),
            },
            TokenState::ObjectColon => match self.buf.peek()? {
                Some(b':') => {
                    self.buf.scanp += 1;
                    self.token_state = TokenState::ObjectValue;
                    Ok(())
                }
                _ => Err(StreamError::syntax(
                    "expected colon after object key",
                    self.buf.offset(),
                )),
            },
            _ => Ok(()),
        }
    }

    fn take_scan_error(&mut self) -> StreamError {
        let err = self.scan.err.clone().unwrap_or_else(|| SyntaxError {
            msg: "invalid JSON value".into(),
            offset: self.scan.bytes,
        });
        StreamError::Syntax(err)
    }

    fn token_error(&self, c: u8) -> StreamError {
        StreamError::syntax(
            format!(
                "invalid character {} {}",
                quote_char(c),
                self.token_state.error_context()
            ),
            self.buf.offset(),
        )
    }
}
