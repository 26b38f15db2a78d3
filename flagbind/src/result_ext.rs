//! Extensions for mapping errors to `BindResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(BindError::…))`
//! patterns when converting external error types into the crate's
//! [`BindResult`] alias (`Result<T, Arc<BindError>>`).
//!
//! # Examples
//!
//! ```
//! use flagbind::{BindResult, BindResultExt};
//!
//! fn decode() -> BindResult<u16> {
//!     serde_json::from_str("8080").into_bind()
//! }
//! # assert_eq!(decode().ok(), Some(8080));
//! ```

use crate::{BindError, BindResult};
use std::sync::Arc;

/// Generic extension for mapping any `Result<T, E>` with `E: Into<BindError>`
/// into a [`BindResult`].
pub trait BindResultExt<T> {
    /// Convert `Result<T, E>` into `BindResult<T>` using `Into<BindError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<BindError>`.
    fn into_bind(self) -> BindResult<T>;
}

impl<T, E> BindResultExt<T> for Result<T, E>
where
    E: Into<BindError>,
{
    fn into_bind(self) -> BindResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
