//! Typed binding on top of raw match slices.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::HandlerError;
use crate::handler::StreamHandler;

/// Handler that deserializes each matched value before delivering it.
///
/// The raw slice is decoded with `serde_json` into `T`; a deserialization
/// failure halts the decode like any other handler error. The path slice is
/// passed through untouched.
///
/// ```no_run
/// use jetpath::{StreamDecoder, StreamHandler, TypedHandler};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Book {
///     title: String,
///     price: f64,
/// }
///
/// let file = std::fs::File::open("store.json")?;
/// let mut handler = TypedHandler::new("$.store.book[*]", |_path, book: Book| {
///     println!("{} ({})", book.title, book.price);
///     Ok(())
/// });
/// let mut handlers: [&mut dyn StreamHandler; 1] = [&mut handler];
/// StreamDecoder::new(file).decode(&mut handlers)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TypedHandler<T, F> {
    path: String,
    on_item: F,
    _marker: PhantomData<fn(T)>,
}

impl<T, F> TypedHandler<T, F>
where
    T: DeserializeOwned,
    F: FnMut(&[u8], T) -> Result<(), HandlerError>,
{
    pub fn new(path: impl Into<String>, on_item: F) -> Self {
        Self {
            path: path.into(),
            on_item,
            _marker: PhantomData,
        }
    }
}

impl<T, F> StreamHandler for TypedHandler<T, F>
where
    T: DeserializeOwned,
    F: FnMut(&[u8], T) -> Result<(), HandlerError>,
{
    fn at_path(&self) -> &str {
        &self.path
    }

    fn on_value(&mut self, path: &[u8], value: &[u8]) -> Result<(), HandlerError> {
        let item: T = serde_json::from_slice(value)?;
        (self.on_item)(path, item)
    }
}
