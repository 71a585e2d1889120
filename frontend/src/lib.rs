//! Headless view state for the task screens.
//!
//! Each view model takes the repository in its constructor and hands back a
//! receiver of one-shot [`UiEvent`]s (navigation, messages). Rendering is left
//! to whatever toolkit consumes these types.

pub mod add_edit;
pub mod detail;
pub mod event;
pub mod tasks;

pub use add_edit::AddEditTaskViewModel;
pub use detail::{DetailViewState, TaskDetailViewModel};
pub use event::{EditResult, EventReceiver, Message, UiEvent};
pub use tasks::{NoTasksIcon, TasksViewModel, TasksViewState};
