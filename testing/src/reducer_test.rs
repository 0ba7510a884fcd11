//! Given-When-Then harness for reducers
//!
//! Runs a reducer synchronously against a starting state and one or more
//! actions, then hands the final state and the effects of the last action to
//! the registered assertions. Effects are inspected, never executed.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use todome_core::{effect::Effect, reducer::Reducer};

type StateAssertion<S> = Box<dyn FnOnce(&S)>;
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent reducer test
///
/// ```ignore
/// ReducerTest::new(ClientReducer::new())
///     .with_env(test_env())
///     .given_state(ClientState::default())
///     .when_action(ClientAction::Load)
///     .then_state(|state| assert!(state.loading))
///     .then_effects(assertions::assert_has_future_effect)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Append an action to reduce (When)
    ///
    /// May be called repeatedly; actions are reduced in order.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Append several actions to reduce, in order
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the final state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the initial state, an action, or the environment is missing,
    /// or if any assertion fails.
    #[allow(clippy::panic, clippy::expect_used)]
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let env = self
            .environment
            .expect("Environment must be set with with_env()");
        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use todome_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect other than `Effect::None` is present.
    #[allow(clippy::panic)]
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)]
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)]
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }

    /// Assert that effects contain a Delay effect dispatching a matching action
    ///
    /// # Panics
    ///
    /// Panics if no such Delay effect is found.
    #[allow(clippy::panic)]
    pub fn assert_has_delay_effect<A>(effects: &[Effect<A>], matches: impl Fn(&A) -> bool) {
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Delay { action, .. } if matches(action))),
            "Expected a matching Delay effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todome_core::{smallvec, SmallVec};

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Reset,
        Tick,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TestState,
            action: TestAction,
            _env: &(),
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
                TestAction::Reset => {
                    smallvec![Effect::delay(
                        std::time::Duration::from_millis(5),
                        TestAction::Tick
                    )]
                },
                TestAction::Tick => {
                    state.count = 0;
                    SmallVec::new()
                },
            }
        }
    }

    #[test]
    fn single_action() {
        ReducerTest::new(TestReducer)
            .with_env(())
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| assert_eq!(state.count, 1))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn actions_reduce_in_order() {
        ReducerTest::new(TestReducer)
            .with_env(())
            .given_state(TestState { count: 3 })
            .when_actions([TestAction::Tick, TestAction::Increment, TestAction::Increment])
            .then_state(|state| assert_eq!(state.count, 2))
            .run();
    }

    #[test]
    fn effects_come_from_last_action() {
        ReducerTest::new(TestReducer)
            .with_env(())
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .when_action(TestAction::Reset)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_delay_effect(effects, |a| {
                    matches!(a, TestAction::Tick)
                });
            })
            .run();
    }
}
