//! Client state controller.
//!
//! [`ClientState`] is the explicit state container, [`ClientReducer`] the only
//! code that mutates it. Run the reducer in a `todome_runtime::Store` to have
//! API calls executed and their results fed back as actions.
//!
//! ```ignore
//! let env = ClientEnvironment::new(Arc::new(repository));
//! let store = Store::new(ClientState::new(), ClientReducer::new(), env);
//!
//! store.send(ClientAction::Load).await?.wait().await;
//! let done = store.state(ClientState::completed_count).await;
//! ```

mod filter;
mod reducer;
mod state;

pub use filter::{DateFilter, PriorityFilter};
pub use reducer::{ClientEnvironment, ClientReducer, DEFAULT_ERROR_TIMEOUT};
pub use state::{ClientAction, ClientState};
