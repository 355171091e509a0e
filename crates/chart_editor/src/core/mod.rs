//! Core editor types and state management.
//!
//! [`ChartEditor`] is the usual entry point. [`ActionManager`] and
//! [`EditContext`] can be used directly when the collaborators live
//! elsewhere.

mod context;
mod history;
mod manager;
mod preferences;
mod session;

pub use context::{EditContext, SelectedHitsounds};
pub use history::{HistoryEntry, UndoHistory};
pub use manager::{ActionManager, EventDelivery};
pub use preferences::{EditorPreferences, PreferencesError};
pub use session::ChartEditor;
