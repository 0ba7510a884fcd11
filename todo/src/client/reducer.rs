//! Reducer for the client state controller.
//!
//! Mutations are optimistic: toggle, edit and delete change local state
//! first and roll back if the API call fails. Create waits for the server,
//! since ids are server-assigned, then inserts the confirmed item at its list
//! position. Only `Load` and `Refresh` replace the collection wholesale.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use todome_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

use super::state::{ClientAction, ClientState};
use crate::repository::TodoRepository;
use crate::types::{TodoId, TodoPatch};

/// How long an error stays in the banner by default
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_secs(5);

type Effects = SmallVec<[Effect<ClientAction>; 4]>;

/// Environment dependencies for the client reducer
pub struct ClientEnvironment<R> {
    /// Where todos are loaded from and saved to
    pub repository: Arc<R>,
    /// How long an error stays in the banner; `None` keeps it until dismissed
    pub error_timeout: Option<Duration>,
}

impl<R> ClientEnvironment<R> {
    /// Creates an environment with the default error timeout
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            error_timeout: Some(DEFAULT_ERROR_TIMEOUT),
        }
    }

    /// Overrides the error timeout
    #[must_use]
    pub const fn with_error_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.error_timeout = timeout;
        self
    }
}

impl<R> Clone for ClientEnvironment<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            error_timeout: self.error_timeout,
        }
    }
}

/// Reducer for the client state controller
pub struct ClientReducer<R> {
    _repository: PhantomData<fn() -> R>,
}

impl<R> ClientReducer<R> {
    /// Creates a new `ClientReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _repository: PhantomData,
        }
    }
}

impl<R> Default for ClientReducer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for ClientReducer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ClientReducer")
    }
}

impl<R: TodoRepository + 'static> ClientReducer<R> {
    /// Shows `message` and schedules its expiry
    fn fail(state: &mut ClientState, env: &ClientEnvironment<R>, message: String) -> Effects {
        let generation = state.set_error(message);
        match env.error_timeout {
            Some(timeout) => smallvec![Effect::delay(
                timeout,
                ClientAction::ErrorExpired { generation }
            )],
            None => SmallVec::new(),
        }
    }

    fn load(state: &mut ClientState, env: &ClientEnvironment<R>) -> Effects {
        state.loading = true;
        let repository = Arc::clone(&env.repository);

        smallvec![Effect::future(async move {
            Some(match repository.list().await {
                Ok(todos) => ClientAction::TodosLoaded { todos },
                Err(error) => {
                    tracing::warn!(%error, "Failed to load todos");
                    ClientAction::LoadFailed {
                        error: error.to_string(),
                    }
                },
            })
        })]
    }

    /// Patches locally, then asks the server to do the same
    fn update(
        state: &mut ClientState,
        env: &ClientEnvironment<R>,
        id: TodoId,
        patch: TodoPatch,
    ) -> Effects {
        let Some(rollback) = state.patch(id, &patch) else {
            return Self::fail(state, env, format!("Todo {id} not found"));
        };
        let repository = Arc::clone(&env.repository);

        smallvec![Effect::future(async move {
            Some(match repository.update(id, patch).await {
                Ok(todo) => ClientAction::TodoUpdated { todo },
                Err(error) => {
                    tracing::warn!(%id, %error, "Failed to update todo");
                    ClientAction::UpdateFailed {
                        id,
                        rollback,
                        error: error.to_string(),
                    }
                },
            })
        })]
    }
}

impl<R: TodoRepository + 'static> Reducer for ClientReducer<R> {
    type State = ClientState;
    type Action = ClientAction;
    type Environment = ClientEnvironment<R>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Intents ==========
            ClientAction::Load | ClientAction::Refresh => Self::load(state, env),

            ClientAction::Create { request } => {
                let todo = match request.validate() {
                    Ok(todo) => todo,
                    Err(error) => return Self::fail(state, env, error.to_string()),
                };
                let repository = Arc::clone(&env.repository);

                smallvec![Effect::future(async move {
                    Some(match repository.create(todo).await {
                        Ok(todo) => ClientAction::TodoCreated { todo },
                        Err(error) => {
                            tracing::warn!(%error, "Failed to create todo");
                            ClientAction::CreateFailed {
                                error: error.to_string(),
                            }
                        },
                    })
                })]
            },

            ClientAction::ToggleCompletion { id } => match state.get(id) {
                Some(todo) => {
                    let patch = TodoPatch::completed(!todo.completed);
                    Self::update(state, env, id, patch)
                },
                None => Self::fail(state, env, format!("Todo {id} not found")),
            },

            ClientAction::SetCompleted { id, completed } => {
                if state.get(id).is_some_and(|t| t.completed == completed) {
                    return SmallVec::new();
                }
                Self::update(state, env, id, TodoPatch::completed(completed))
            },

            ClientAction::EditContent { id, content } => match TodoPatch::content(&content) {
                Ok(patch) => Self::update(state, env, id, patch),
                Err(error) => Self::fail(state, env, error.to_string()),
            },

            ClientAction::Delete { id } => {
                let todo = state.remove(id);
                let repository = Arc::clone(&env.repository);

                smallvec![Effect::future(async move {
                    Some(match repository.delete(id).await {
                        Ok(_) => ClientAction::TodoDeleted { id },
                        Err(error) => {
                            tracing::warn!(%id, %error, "Failed to delete todo");
                            ClientAction::DeleteFailed {
                                id,
                                todo,
                                error: error.to_string(),
                            }
                        },
                    })
                })]
            },

            ClientAction::SetPriorityFilter(filter) => {
                state.priority_filter = filter;
                SmallVec::new()
            },

            ClientAction::SetDateFilter(filter) => {
                state.date_filter = filter;
                SmallVec::new()
            },

            ClientAction::DismissError => {
                state.error = None;
                SmallVec::new()
            },

            // ========== Results ==========
            ClientAction::TodosLoaded { todos } => {
                state.loading = false;
                state.replace_all(todos);
                SmallVec::new()
            },

            ClientAction::LoadFailed { error } => {
                state.loading = false;
                Self::fail(state, env, format!("Failed to load todos: {error}"))
            },

            ClientAction::TodoCreated { todo } => {
                state.upsert(todo);
                SmallVec::new()
            },

            ClientAction::CreateFailed { error } => {
                Self::fail(state, env, format!("Failed to add todo: {error}"))
            },

            ClientAction::TodoUpdated { todo } => {
                state.replace(todo);
                SmallVec::new()
            },

            ClientAction::UpdateFailed {
                id,
                rollback,
                error,
            } => {
                state.patch(id, &rollback);
                Self::fail(state, env, format!("Failed to update todo {id}: {error}"))
            },

            ClientAction::TodoDeleted { id } => {
                state.remove(id);
                SmallVec::new()
            },

            ClientAction::DeleteFailed { id, todo, error } => {
                if let Some(todo) = todo {
                    state.upsert(todo);
                }
                Self::fail(state, env, format!("Failed to delete todo {id}: {error}"))
            },

            ClientAction::ErrorExpired { generation } => {
                state.expire_error(generation);
                SmallVec::new()
            },
        }
    }
}
