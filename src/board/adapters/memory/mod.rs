//! In-memory adapter implementations.
//!
//! These adapters keep all state in process memory, which is all the board
//! needs: task state does not survive a restart.

mod notifier;
mod task;

pub use notifier::RecordingNotificationSink;
pub use task::InMemoryTaskRepository;
