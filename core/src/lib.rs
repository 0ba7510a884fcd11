//! # Todo-me Core
//!
//! The small functional core the rest of the workspace is built on.
//!
//! - **State**: plain owned data describing what a feature knows
//! - **Action**: every input a reducer reacts to (user intents and results)
//! - **Reducer**: `(State, Action, Environment) -> Effects`, mutating state in place
//! - **Effect**: a description of work for the runtime, never executed here
//! - **Environment**: injected dependencies (clock, repositories)
//!
//! ## Example
//!
//! ```
//! use todome_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!             CounterAction::Decrement => state.count -= 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the core trait for business logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// Reducers are deterministic: given the same state, action and
    /// environment they produce the same state change and the same effect
    /// descriptions. All I/O happens in the effects the runtime executes.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns the effects to be executed
        /// by the runtime. Most actions produce zero or one effect, hence the
        /// inline capacity of four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are values returned from reducers. The runtime executes them
    /// and feeds any resulting action back into the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Dispatch `action` after `duration` has elapsed
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, that action is fed back
        /// into the reducer.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block as an [`Effect::Future`].
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(fut))
        }

        /// Dispatch `action` after `duration`.
        #[must_use]
        pub fn delay(duration: Duration, action: Action) -> Self {
            Self::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// Returns `true` for [`Effect::None`].
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::None => write!(f, "Effect::None"),
                Self::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Self::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time so reducers stay deterministic in tests
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
