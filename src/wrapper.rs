//! A wrapper guaranteeing a single client connection and queueing work until the connection
//! signals readiness.
use std::collections::{HashMap, VecDeque};
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

use crate::client::{FlagClient, InitializeClient, ReadyCallback};
use crate::{ClientOptions, Error, FlagValue, Result, UserContext};

/// Wrapper state shared between the wrapper, the clients it hands out, and the ready
/// subscription. The client handle, the ready flag, and the pending queue are guarded by one
/// mutex; callbacks are always invoked with the lock released so they may re-enter the wrapper.
struct Shared<C> {
    state: Mutex<State<C>>,
}

struct State<C> {
    client: Option<Arc<C>>,
    /// Monotonic within a connection: set to true exactly once, by the ready signal.
    ready: bool,
    /// Set once the ready subscription has been registered on the client.
    subscribed: bool,
    /// Bumped by reset. A ready signal from a discarded connection must not mark the
    /// replacement ready, so the subscription remembers the generation it was made in.
    generation: u64,
    queue: VecDeque<ReadyCallback>,
}

impl<C> Shared<C> {
    fn lock(&self) -> MutexGuard<'_, State<C>> {
        self.state
            .lock()
            .expect("thread holding flag client state lock should not panic")
    }

    /// Mark the connection ready and drain the queue in FIFO order.
    ///
    /// Readiness is set before the drain starts, so a callback registered while draining runs
    /// immediately, within the same pass. One callback is popped per iteration with the lock
    /// released during its invocation.
    fn mark_ready(&self, generation: u64) {
        let queued = {
            let mut state = self.lock();
            if state.generation != generation || state.ready {
                return;
            }
            state.ready = true;
            state.queue.len()
        };
        log::debug!(target: "flagwrap", queued; "flag client ready, draining queued callbacks");

        loop {
            let callback = {
                let mut state = self.lock();
                if state.generation != generation {
                    // Reset while draining; the remaining queue belongs to the next connection.
                    return;
                }
                state.queue.pop_front()
            };
            match callback {
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}

/// A wrapper around a feature-flag client guaranteeing a single underlying connection and letting
/// any number of callers schedule work against it regardless of whether initialization has
/// completed.
///
/// The wrapper owns the connection, its readiness state, and the queue of callbacks waiting for
/// readiness. One wrapper per process is the intended default; embedders that need independent
/// connections (tests, multi-environment tools) can simply create more wrappers.
///
/// # Examples
/// ```
/// # use flagwrap::{ClientWrapper, InitializeClient, UserContext};
/// # fn test<I: InitializeClient>(wrapper: &ClientWrapper<I>) -> flagwrap::Result<()> {
/// let client = wrapper.acquire("env-key", &UserContext::new("user-1"), &Default::default())?;
/// client.on_ready(Box::new(|| println!("flags are available")));
/// # Ok(())
/// # }
/// ```
pub struct ClientWrapper<I: InitializeClient> {
    initializer: I,
    shared: Arc<Shared<I::Client>>,
}

impl<I: InitializeClient> ClientWrapper<I> {
    /// Create a wrapper that connects lazily using `initializer`.
    pub fn new(initializer: I) -> ClientWrapper<I> {
        ClientWrapper {
            initializer,
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    client: None,
                    ready: false,
                    subscribed: false,
                    generation: 0,
                    queue: VecDeque::new(),
                }),
            }),
        }
    }

    /// Acquire the shared client, connecting on first use.
    ///
    /// The first call creates the underlying client via the initializer and subscribes exactly
    /// once to its ready signal. Subsequent calls return the same client; their `key`, `user`,
    /// and `options` are silently ignored — the first caller's parameters win. This is a
    /// documented limitation, not configurable per call.
    ///
    /// # Errors
    ///
    /// Any error from the initializer propagates unmodified. A failed initialization leaves the
    /// wrapper unconnected, so a later call will try again.
    pub fn acquire(
        &self,
        key: &str,
        user: &UserContext,
        options: &ClientOptions,
    ) -> Result<ReadyClient<I::Client>> {
        let (client, subscription) = {
            let mut state = self.shared.lock();
            let client = match &state.client {
                Some(client) => Arc::clone(client),
                None => {
                    // The initializer runs under the state lock so a concurrent caller cannot
                    // open a second connection.
                    let client = Arc::new(self.initializer.initialize(key, user, options)?);
                    log::debug!(target: "flagwrap", key; "initialized flag client");
                    state.client = Some(Arc::clone(&client));
                    client
                }
            };
            let subscription = if state.subscribed {
                None
            } else {
                state.subscribed = true;
                Some(state.generation)
            };
            (client, subscription)
        };

        if let Some(generation) = subscription {
            // Subscribe outside the lock: a client that is already ready may invoke the callback
            // synchronously, and mark_ready takes the lock.
            let shared = Arc::clone(&self.shared);
            client.on_ready(Box::new(move || shared.mark_ready(generation)));
        }

        Ok(ReadyClient {
            client,
            shared: Arc::clone(&self.shared),
        })
    }

    /// True once the underlying client has signaled readiness.
    pub fn is_ready(&self) -> bool {
        self.shared.lock().ready
    }

    /// Drop the underlying client and return the wrapper to its initial state.
    ///
    /// Clears the client handle, the ready flag, and the pending queue; the next
    /// [`acquire`][ClientWrapper::acquire] opens a fresh connection. Queued callbacks are dropped
    /// without running, which settles operations waiting on them with [`Error::Closed`].
    /// Intended for tests and demos.
    pub fn reset(&self) {
        let dropped = {
            let mut state = self.shared.lock();
            state.client = None;
            state.ready = false;
            state.subscribed = false;
            state.generation = state.generation.wrapping_add(1);
            std::mem::take(&mut state.queue)
        };
        if !dropped.is_empty() {
            log::debug!(target: "flagwrap", dropped = dropped.len(); "reset dropped queued callbacks");
        }
        // The queue is dropped here, after the lock is released: dropping a callback can run
        // arbitrary drop code that re-enters the wrapper.
        drop(dropped);
    }
}

/// Flag operations: thin async compositions of [`ClientWrapper::acquire`] and
/// [`ReadyClient::on_ready`]. Each schedules the underlying call via the ready queue and resolves
/// once it has run.
impl<I: InitializeClient> ClientWrapper<I> {
    /// Returns all flag values for the current user, once the client is ready.
    pub async fn all_flags(
        &self,
        key: &str,
        user: &UserContext,
    ) -> Result<HashMap<String, FlagValue>> {
        let client = self.acquire(key, user, &ClientOptions::default())?;
        let handle = client.client();
        self.settle(client, move || handle.all_flags()).await
    }

    /// Switch the client to a new user context, once the client is ready.
    ///
    /// `hash` is the secure-mode hash for the new user; it is only required when the flag
    /// environment has secure mode enabled, and `None` otherwise.
    pub async fn identify(
        &self,
        key: &str,
        user: &UserContext,
        hash: Option<&str>,
    ) -> Result<serde_json::Value> {
        let client = self.acquire(key, user, &ClientOptions::default())?;
        let handle = client.client();
        let user = user.clone();
        let hash = hash.map(str::to_owned);
        self.settle(client, move || handle.identify(&user, hash.as_deref()))
            .await
    }

    /// Record a conversion event for the given goal key, once the client is ready.
    pub async fn track(
        &self,
        key: &str,
        user: &UserContext,
        goal_key: &str,
    ) -> Result<serde_json::Value> {
        let client = self.acquire(key, user, &ClientOptions::default())?;
        let handle = client.client();
        let goal_key = goal_key.to_owned();
        self.settle(client, move || handle.track(&goal_key)).await
    }

    /// Returns the value of a single flag, once the client is ready.
    ///
    /// Returns `Ok(None)` if the flag is unknown to the underlying client.
    pub async fn variation(
        &self,
        key: &str,
        user: &UserContext,
        flag_key: &str,
    ) -> Result<Option<FlagValue>> {
        let client = self.acquire(key, user, &ClientOptions::default())?;
        let handle = client.client();
        let flag_key = flag_key.to_owned();
        self.settle(client, move || handle.variation(&flag_key)).await
    }

    /// Schedule `call` via the ready queue and await its result.
    async fn settle<T: Send + 'static>(
        &self,
        client: ReadyClient<I::Client>,
        call: impl FnOnce() -> T + Send + 'static,
    ) -> Result<T> {
        let (sender, receiver) = oneshot::channel();
        client.on_ready(Box::new(move || {
            // The receiver may be gone if the caller stopped waiting; the underlying call still
            // happens, matching the fire-and-forget behavior of the wrapped client.
            let _ = sender.send(call());
        }));
        receiver.await.map_err(|_| Error::Closed)
    }
}

/// The shared client together with the wrapper's ready queue.
///
/// Composes the opaque client handle with the readiness state, so callers can schedule work via
/// [`ReadyClient::on_ready`] and call the client directly through `Deref` once ready.
pub struct ReadyClient<C> {
    client: Arc<C>,
    shared: Arc<Shared<C>>,
}

impl<C: FlagClient> ReadyClient<C> {
    /// Run `callback` once the client is ready.
    ///
    /// If the ready signal has already fired, the callback runs synchronously before this method
    /// returns. Otherwise it is appended to the pending queue and runs in registration order when
    /// the signal fires.
    pub fn on_ready(&self, callback: ReadyCallback) {
        {
            let mut state = self.shared.lock();
            if !state.ready {
                state.queue.push_back(callback);
                return;
            }
        }
        callback();
    }

    /// True once the underlying client has signaled readiness.
    pub fn is_ready(&self) -> bool {
        self.shared.lock().ready
    }

    /// Clone of the underlying client handle.
    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }
}

impl<C> Clone for ReadyClient<C> {
    fn clone(&self) -> ReadyClient<C> {
        ReadyClient {
            client: Arc::clone(&self.client),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C> Deref for ReadyClient<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.client
    }
}
