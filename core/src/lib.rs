//! # NicheFlow Client Core
//!
//! Core traits and types for the NicheFlow client architecture.
//!
//! This crate provides the fundamental abstractions for building the client
//! shell (session, preferences, layout) as a unidirectional state machine.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature (auth, preferences)
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → Effects`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use nicheflow_core::{SmallVec, smallvec, effect::Effect, reducer::Reducer};
//!
//! #[derive(Clone, Debug)]
//! struct SettingsState {
//!     syncing: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum SettingsAction {
//!     Refresh,
//!     Refreshed,
//! }
//!
//! impl Reducer for SettingsReducer {
//!     type State = SettingsState;
//!     type Action = SettingsAction;
//!     type Environment = SettingsEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SettingsState,
//!         action: SettingsAction,
//!         env: &SettingsEnvironment,
//!     ) -> SmallVec<[Effect<SettingsAction>; 4]> {
//!         match action {
//!             SettingsAction::Refresh => {
//!                 state.syncing = true;
//!                 let gateway = env.gateway.clone();
//!                 smallvec![Effect::Future(Box::pin(async move {
//!                     gateway.fetch().await.ok().map(|_| SettingsAction::Refreshed)
//!                 }))]
//!             }
//!             SettingsAction::Refreshed => {
//!                 state.syncing = false;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → Effects`.
/// They contain all business logic and are deterministic and testable:
/// every network call, storage access, or document mutation is returned as
/// an [`Effect`](crate::effect::Effect) value rather than performed inline.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for SessionReducer {
    ///     type State = AppState;
    ///     type Action = AppAction;
    ///     type Environment = ClientEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut AppState,
    ///         action: AppAction,
    ///         env: &ClientEnvironment,
    ///     ) -> SmallVec<[Effect<AppAction>; 4]> {
    ///         match action {
    ///             AppAction::Logout { .. } => {
    ///                 state.auth.session = None;
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action against current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. Most transitions return
        /// one effect, so the vector is inlined up to four entries.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, debounce)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer by the runtime.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. The only trait defined here is [`Clock`];
/// domain-specific capabilities (identity, preferences, storage, platform)
/// live in the crate that owns them.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// struct SystemClock;
    /// impl Clock for SystemClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         Utc::now()
    ///     }
    /// }
    ///
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }
}

#[cfg(test)]
#[allow(clippy::panic)] // Test code can panic on unexpected variants
mod tests {
    use super::effect::Effect;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Ping,
    }

    #[test]
    fn merge_produces_parallel() {
        let effect: Effect<TestAction> = Effect::merge(vec![Effect::None, Effect::None]);
        assert!(matches!(effect, Effect::Parallel(inner) if inner.len() == 2));
    }

    #[test]
    fn chain_produces_sequential() {
        let effect: Effect<TestAction> = Effect::chain(vec![Effect::None]);
        assert!(matches!(effect, Effect::Sequential(inner) if inner.len() == 1));
    }

    #[test]
    fn debug_formats_future_opaquely() {
        let effect: Effect<TestAction> = Effect::Future(Box::pin(async { None }));
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn debug_formats_delay_with_fields() {
        let effect = Effect::Delay {
            duration: Duration::from_millis(250),
            action: Box::new(TestAction::Ping),
        };
        let rendered = format!("{effect:?}");
        assert!(rendered.contains("250ms"));
        assert!(rendered.contains("Ping"));
    }

    #[tokio::test]
    async fn future_effect_resolves_to_action() {
        let effect: Effect<TestAction> = Effect::Future(Box::pin(async { Some(TestAction::Ping) }));
        match effect {
            Effect::Future(fut) => assert_eq!(fut.await, Some(TestAction::Ping)),
            other => panic!("expected future effect, got {other:?}"),
        }
    }
}
