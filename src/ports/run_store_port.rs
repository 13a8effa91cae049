//! Run persistence port trait.

use crate::domain::error::TradesimError;
use crate::domain::run::Run;
use std::path::PathBuf;

pub trait RunStorePort {
    /// Persists a finished run (completed, failed, or cancelled) and
    /// returns where it was written.
    fn save_run(&self, run: &Run) -> Result<PathBuf, TradesimError>;
}
