//! Structured JSON logging for binaries built on flagbind.
//!
//! [`build_dispatch`] returns an explicit [`Dispatch`] handle that callers
//! can thread to whatever needs it; [`init_logging`] installs one as the
//! process default.
//!
//! ```rust,no_run
//! use flagbind::logging::{LogOptions, init_logging};
//!
//! init_logging(&LogOptions::default())?;
//! tracing::info!(port = 8080, "listening");
//! # Ok::<(), std::sync::Arc<flagbind::BindError>>(())
//! ```

use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::{BindError, BindResult};

/// Logging options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Log at debug level and include the source location of each event.
    pub debug: bool,
    /// Optional filter directives (e.g. `"info,my_crate=trace"`) replacing
    /// the level implied by `debug`.
    pub filter: Option<String>,
}

impl LogOptions {
    /// Options for debug output.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            debug: true,
            filter: None,
        }
    }

    fn directives(&self) -> &str {
        match (&self.filter, self.debug) {
            (Some(filter), _) => filter.as_str(),
            (None, true) => "debug",
            (None, false) => "info",
        }
    }
}

fn logging_error(message: impl Into<String>) -> Arc<BindError> {
    Arc::new(BindError::Logging {
        message: message.into(),
    })
}

/// Build a JSON-formatting subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`BindError::Logging`] if the filter directives are invalid.
pub fn build_dispatch(options: &LogOptions) -> BindResult<Dispatch> {
    let filter = EnvFilter::try_new(options.directives())
        .map_err(|e| logging_error(format!("invalid log filter: {e}")))?;
    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_file(options.debug)
        .with_line_number(options.debug)
        .with_target(options.debug)
        .with_filter(filter);
    Ok(Dispatch::new(tracing_subscriber::registry().with(layer)))
}

/// Build a subscriber and install it as the global default.
///
/// # Errors
///
/// Returns [`BindError::Logging`] if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_logging(options: &LogOptions) -> BindResult<()> {
    let dispatch = build_dispatch(options)?;
    tracing::dispatcher::set_global_default(dispatch).map_err(|e| logging_error(e.to_string()))
}
