use std::collections::HashMap;

use crate::{ClientOptions, FlagValue, Result, UserContext};

/// A callback scheduled to run once the underlying client is ready.
pub type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

/// A connection to a feature-flag service.
///
/// This is the seam between the wrapper and the third-party client library: implementations adapt
/// the actual client. The wrapper never interprets user contexts, options, or returned values;
/// they pass through unmodified.
pub trait FlagClient: Send + Sync + 'static {
    /// Register a callback fired when the client's initial flag data is available.
    ///
    /// Implementations must invoke the callback exactly once: when the data becomes available, or
    /// immediately if it already is. The wrapper subscribes once per connection and tracks
    /// readiness itself, so clients whose event emitters drop late subscribers only need to honor
    /// the first registration.
    fn on_ready(&self, callback: ReadyCallback);

    /// Returns all flag values for the current user.
    ///
    /// Called by the wrapper only after the client has signaled readiness.
    fn all_flags(&self) -> HashMap<String, FlagValue>;

    /// Switch the client to a new user context.
    ///
    /// `hash` is the secure-mode hash for the new user; it is only required when the flag
    /// environment has secure mode enabled, and `None` is passed otherwise. The returned value is
    /// whatever the underlying client reports and is not interpreted by the wrapper.
    fn identify(&self, user: &UserContext, hash: Option<&str>) -> serde_json::Value;

    /// Record a conversion event for the given goal key.
    fn track(&self, goal_key: &str) -> serde_json::Value;

    /// Returns the value of a single flag, or `None` if the flag is unknown.
    fn variation(&self, flag_key: &str) -> Option<FlagValue>;
}

/// Factory for [`FlagClient`] connections.
///
/// Implemented for closures:
///
/// ```no_run
/// # use flagwrap::{ClientOptions, ClientWrapper, FlagClient, Result, UserContext};
/// # fn connect<C: FlagClient>(
/// #     open: impl Fn(&str, &UserContext) -> Result<C>,
/// # ) -> ClientWrapper<impl flagwrap::InitializeClient<Client = C>> {
/// ClientWrapper::new(move |key: &str, user: &UserContext, _options: &ClientOptions| {
///     open(key, user)
/// })
/// # }
/// ```
pub trait InitializeClient {
    /// The client type produced by this initializer.
    type Client: FlagClient;

    /// Open a connection to the flag environment identified by `key`, for the given user.
    ///
    /// Called at most once per wrapper lifetime (until a reset). Errors propagate unmodified to
    /// the caller of [`ClientWrapper::acquire`][crate::ClientWrapper::acquire].
    fn initialize(
        &self,
        key: &str,
        user: &UserContext,
        options: &ClientOptions,
    ) -> Result<Self::Client>;
}

impl<C, F> InitializeClient for F
where
    C: FlagClient,
    F: Fn(&str, &UserContext, &ClientOptions) -> Result<C>,
{
    type Client = C;

    fn initialize(&self, key: &str, user: &UserContext, options: &ClientOptions) -> Result<C> {
        self(key, user, options)
    }
}
