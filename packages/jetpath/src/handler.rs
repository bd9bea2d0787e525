//! Match handlers: the callback surface of a decode session.

use crate::error::HandlerError;

/// Receiver for values matched by one selector.
///
/// A handler pairs the selector it wants ([`at_path`](Self::at_path),
/// compiled once per decode) with the callback invoked for every value whose
/// path matches. Both slices passed to [`on_value`](Self::on_value) borrow
/// session buffers and are invalidated when the call returns; copy what you
/// keep. Returning an error halts the decode and surfaces it unchanged.
pub trait StreamHandler {
    /// The selector this handler subscribes to, e.g. `$.store.book[*]`.
    fn at_path(&self) -> &str;

    /// Called with the current path and the raw value encoding, in document
    /// order.
    fn on_value(&mut self, path: &[u8], value: &[u8]) -> Result<(), HandlerError>;
}

/// Handler delivering raw value slices to a closure.
pub struct RawHandler<F> {
    path: String,
    on_match: F,
}

impl<F> RawHandler<F>
where
    F: FnMut(&[u8], &[u8]) -> Result<(), HandlerError>,
{
    pub fn new(path: impl Into<String>, on_match: F) -> Self {
        Self {
            path: path.into(),
            on_match,
        }
    }
}

impl<F> StreamHandler for RawHandler<F>
where
    F: FnMut(&[u8], &[u8]) -> Result<(), HandlerError>,
{
    fn at_path(&self) -> &str {
        &self.path
    }

    fn on_value(&mut self, path: &[u8], value: &[u8]) -> Result<(), HandlerError> {
        (self.on_match)(path, value)
    }
}
