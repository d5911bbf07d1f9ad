//! # NicheFlow Runtime
//!
//! Store runtime for the NicheFlow client architecture.
//!
//! This crate provides the [`Store`] that coordinates reducer execution and
//! effect handling: actions go in, the reducer mutates state behind a lock,
//! and the returned effects run on tokio tasks whose resulting actions feed
//! back into the store.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Action Broadcast**: Observers receive every action produced by effects
//!
//! ## Example
//!
//! ```ignore
//! use nicheflow_runtime::Store;
//!
//! let store = Store::new(
//!     AppState::default(),
//!     AppReducer::new(),
//!     environment,
//! );
//!
//! // Send an action
//! let handle = store.send(AppAction::Bootstrap { correlation_id }).await?;
//! handle.wait().await;
//!
//! // Read state
//! let signed_in = store.state(|s| s.auth.session.is_some()).await;
//! ```

use nicheflow_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects spawned by
/// one send. Each action gets a handle that can be awaited to know when its
/// effects are done.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(AppAction::FetchPreferences { correlation_id }).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All effects from FetchPreferences are now complete
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle together with its tracking side
    ///
    /// # Returns
    ///
    /// A tuple of `(EffectHandle, EffectTracking)` where:
    /// - `EffectHandle` is returned to the caller for waiting
    /// - `EffectTracking` is used internally for effect execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut last_handle = EffectHandle::completed();
    /// for action in actions {
    ///     last_handle = store.send(action).await?;
    /// }
    /// last_handle.wait().await;
    /// ```
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects to complete
    ///
    /// Blocks until the effect counter reaches zero.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Arguments
    ///
    /// - `timeout`: Maximum duration to wait
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
///
/// This type is internal to the runtime and not exposed to users.
/// It carries the completion counter through effect execution.
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreError, watch,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(
    ///     AppState::default(),
    ///     AppReducer::new(),
    ///     production_environment(),
    /// );
    ///
    /// store.send(AppAction::LoadProviders {
    ///     correlation_id: Uuid::new_v4(),
    /// }).await?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Action broadcast channel for observing actions produced by effects.
        ///
        /// All actions produced by effects (e.g., from `Effect::Future`) are
        /// broadcast to observers. This enables request-response patterns
        /// (`send_and_wait_for`) and real-time observation of the feedback loop.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Creates a Store with the default action broadcast capacity of 16
        /// (increase with `with_broadcast_capacity`).
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        ///
        /// # Returns
        ///
        /// A new Store instance ready to process actions
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (action_broadcast, _) = broadcast::channel(16);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Create a new Store with custom action broadcast capacity
        ///
        /// Use this constructor when observers frequently lag behind the
        /// feedback loop (e.g., a host bridge replaying every event).
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        /// - `capacity`: Action broadcast channel capacity (number of actions buffered)
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// This is the primary way to interact with the store:
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects asynchronously
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// # Concurrency and Effect Execution
        ///
        /// - The reducer executes synchronously while holding a write lock
        /// - Effects execute asynchronously in spawned tasks
        /// - `send()` returns after starting effect execution, not completion
        /// - Multiple concurrent `send()` calls serialize at the reducer level
        /// - Effects may complete in non-deterministic order
        ///
        /// # Returns
        ///
        /// An [`EffectHandle`] that can be used to wait for effect completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic will propagate and halt the store.
        /// Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
            A: Clone,
        {
            // Check if store is shutting down
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            // Create tracking for this action
            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                // Metrics: Time reducer execution
                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                let duration = start.elapsed();
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(duration.as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                // Note: Precision loss acceptable for metrics (effect counts < 2^52)
                #[allow(clippy::cast_precision_loss)]
                metrics::histogram!("store.effects.count").record(effects.len() as f64);

                effects
            };

            // Execute effects with tracking
            tracing::trace!("Executing {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }
            tracing::debug!("Action processing completed, returning handle");

            Ok(handle)
        }

        /// Send an action and wait for a matching result action
        ///
        /// This method is designed for request-response flows: send a command,
        /// then wait for the success or failure event it eventually produces.
        ///
        /// # How It Works
        ///
        /// 1. Subscribe to the action broadcast BEFORE sending (avoids race conditions)
        /// 2. Send the initial action through the store
        /// 3. Wait for actions produced by effects
        /// 4. Return the first action matching the predicate
        ///
        /// # Arguments
        ///
        /// - `action`: The initial action to send
        /// - `predicate`: Function to test if an action is the terminal result
        /// - `timeout`: Maximum time to wait for a matching action
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        ///
        /// # Example
        ///
        /// ```ignore
        /// let result = store.send_and_wait_for(
        ///     AppAction::CompleteSignIn { correlation_id, provider, code },
        ///     |a| matches!(a,
        ///         AppAction::SignedIn { .. } |
        ///         AppAction::SignInFailed { .. }
        ///     ),
        ///     Duration::from_secs(10),
        /// ).await?;
        /// ```
        ///
        /// # Notes
        ///
        /// - Only actions produced by effects are broadcast (not the initial action)
        /// - If the channel lags and drops actions, continues waiting (timeout catches it)
        /// - Use correlation IDs to distinguish concurrent requests
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            A: Clone,
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            // Send the initial action
            self.send(action).await?;

            // Wait for matching action with timeout
            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {} // Not the action we want, keep waiting
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Slow consumer, some actions were dropped.
                            // Keep waiting - if the terminal action was dropped,
                            // the timeout catches it.
                            tracing::warn!(
                                skipped,
                                "Action observer lagged, {} actions skipped",
                                skipped
                            );
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        }
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Returns a receiver that gets a clone of every action the feedback
        /// loop produces. Useful for observing a flow from the outside
        /// (logging, host-side bridges, tests).
        ///
        /// # Notes
        ///
        /// - Only actions produced by effects are broadcast (not initial actions sent via `send`)
        /// - If the receiver lags, it will skip old actions and receive `RecvError::Lagged`
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let language = store.state(|s| s.preferences.preferences.language).await;
        /// ```
        ///
        /// # Arguments
        ///
        /// - `f`: Closure that receives a reference to state and returns a value
        ///
        /// # Returns
        ///
        /// The value returned by the closure
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Waits for pending effects to complete (with timeout)
        /// 3. Returns when all effects finish or the timeout expires
        ///
        /// # Arguments
        ///
        /// - `timeout`: Maximum time to wait for effects to complete
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        ///
        /// # Example
        ///
        /// ```ignore
        /// store.shutdown(Duration::from_secs(30)).await?;
        /// ```
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            // Set shutdown flag to reject new actions
            self.shutdown.store(true, Ordering::Release);

            // Wait for pending effects with timeout
            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(100);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running",
                        pending
                    );
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(
                    pending_effects = pending,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Waiting for effects to complete"
                );

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Execute an effect with tracking
        ///
        /// Internal method that executes effects with completion tracking.
        /// Uses [`DecrementGuard`] to ensure the effect counter is always
        /// decremented, even if the effect panics.
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Delay`: Waits for duration, then sends action
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        ///
        /// # Error Handling Strategy
        ///
        /// **Reducer panics**: Propagate (fail fast). Reducers should be pure
        /// functions that do not panic.
        ///
        /// **Effect execution failures**: Log and continue. Effects are
        /// fire-and-forget operations. If an effect task panics, it's isolated
        /// in its spawned task and the [`DecrementGuard`] keeps the counter
        /// consistent.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned, so pass by value is intentional
        #[tracing::instrument(skip(self, effect, tracking), name = "execute_effect")]
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
            A: Clone + Send + 'static,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                }
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    // Track global pending effects for shutdown
                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");

                            // Broadcast to observers before feeding back
                            let _ = store.action_broadcast.send(action.clone());

                            // Send action back to store (auto-feedback)
                            let _ = store.send(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                }
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    tracking.increment();

                    // Track global pending effects for shutdown
                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        tokio::time::sleep(duration).await;
                        tracing::trace!("Effect::Delay completed, sending action");

                        // Broadcast to observers before feeding back
                        let _ = store.action_broadcast.send((*action).clone());

                        let _ = store.send(*action).await;
                    });
                }
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                    // Execute all effects concurrently, each with the same tracking
                    let store = self.clone();
                    for effect in effects {
                        store.execute_effect(effect, tracking.clone());
                    }
                }
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);

                    tracking.increment();

                    // Track global pending effects for shutdown
                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard; // Decrement on drop

                        // Execute effects one by one, waiting for each to complete
                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!(
                                "Executing sequential effect {} of {}",
                                idx + 1,
                                effect_count
                            );

                            // Create sub-tracking for this effect
                            let (sub_tx, mut sub_rx) = watch::channel(());
                            let sub_tracking = EffectTracking {
                                counter: Arc::new(AtomicUsize::new(0)),
                                notifier: sub_tx,
                            };

                            // Execute the effect
                            store.execute_effect(effect, sub_tracking.clone());

                            // Wait for this effect to complete before continuing
                            if sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                                let _ = sub_rx.changed().await;
                            }
                        }
                        tracing::trace!("Effect::Sequential completed");
                    });
                }
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use store::Store;
