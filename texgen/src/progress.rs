//! Progress reporting hooks.
//!
//! Long operations report what they are doing through a [`Progress`]
//! observer. Callbacks are invoked inline on the calling thread and
//! have no influence on the operation itself.

/// Observer for long-running operations.
///
/// All methods have empty default implementations.
pub trait Progress {
    /// Set the range of the current progress bar.
    fn set_range(&mut self, _min: u32, _max: u32) {}

    /// Set the position within the current range.
    fn set_value(&mut self, _value: u32) {}

    /// Describe the current step.
    fn set_status(&mut self, _status: &str) {}

    /// Save the current range/value/status before a nested operation.
    fn push_state(&mut self) {}

    /// Restore the state saved by the matching [`Progress::push_state`].
    fn pop_state(&mut self) {}
}

/// Progress observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}
