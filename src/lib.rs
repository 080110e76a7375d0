//! A convenience layer over third-party feature-flag clients: a single-connection wrapper with a
//! ready queue, plus URL query-string overrides for testing and demos.
//!
//! # Overview
//!
//! The crate revolves around a [`ClientWrapper`] that owns at most one connection to a flag
//! service and lets any number of callers schedule work against it before the connection has
//! finished initializing. The underlying client is not implemented here: embedders provide it
//! through the [`FlagClient`] and [`InitializeClient`] seams, and the wrapper passes keys, user
//! contexts, and options through to it unmodified.
//!
//! Work scheduled via [`ReadyClient::on_ready`] before the client signals readiness is queued and
//! runs in registration order once the signal fires; work scheduled afterwards runs immediately.
//! The flag operations ([`ClientWrapper::all_flags`], [`ClientWrapper::identify`],
//! [`ClientWrapper::track`], [`ClientWrapper::variation`]) are thin async compositions of that
//! primitive.
//!
//! # Overrides
//!
//! [`parse_override`] computes a forced value for a single flag from a page URL's query string,
//! letting flags be toggled from the address bar during testing and demos:
//!
//! ```
//! use flagwrap::{parse_override, FlagValue, ValueKind};
//!
//! let url = "https://app.example.com/?features.dark-mode=&features=beta,new-nav";
//! assert_eq!(
//!     parse_override(url, "dark-mode", ValueKind::Boolean),
//!     Some(FlagValue::Boolean(true)),
//! );
//! assert_eq!(
//!     parse_override(url, "new-nav", ValueKind::Boolean),
//!     Some(FlagValue::Boolean(true)),
//! );
//! ```
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. The wrapper neither retries nor wraps failures
//! of the underlying client; initializer errors propagate unmodified to the caller of
//! [`ClientWrapper::acquire`].
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages.
//! Consider integrating a `log`-compatible logger implementation for better visibility into
//! wrapper operations.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod client;
mod context;
mod error;
mod overrides;
mod value;
mod wrapper;

pub use client::{FlagClient, InitializeClient, ReadyCallback};
pub use context::{Attributes, ClientOptions, UserContext};
pub use error::{Error, Result};
pub use overrides::{override_from, parse_override, LocationSource};
pub use value::{FlagValue, ValueKind};
pub use wrapper::{ClientWrapper, ReadyClient};
