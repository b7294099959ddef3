mod catalog;
mod state;
mod store;
mod tracker;

#[cfg(test)]
mod tests;

pub use self::catalog::{StepCatalog, StepId};
pub use self::state::QuizAnswer;
pub use self::store::SnapshotStore;
pub use self::tracker::{PROGRESS_SLOT, ProgressTracker};

#[cfg(test)]
pub(crate) use self::store::MemoryStore;
