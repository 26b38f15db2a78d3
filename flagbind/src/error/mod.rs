//! Error types produced while binding and decoding configuration.

mod conversions;
mod helpers;
mod types;

pub use helpers::is_display_request;
pub use types::BindError;
