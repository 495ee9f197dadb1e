use super::EngineArray;
use thiserror::Error;

/// Nonzero status code reported by an engine call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("engine call failed with status {0}")]
pub struct EngineStatus(pub i32);

/// The synchronous command/variable-exchange protocol of an external
/// computational engine.
///
/// Every call blocks until the engine answers and there is no timeout.
/// Implementations are not expected to be reentrant; callers serialize all
/// access through a single [`Session`](crate::session::Session).
pub trait Engine {
    /// Start the remote computation session.
    fn open(&mut self) -> Result<(), EngineStatus>;

    /// Stop the remote computation session.  Closing a closed engine is a
    /// no-op.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Bind `value` to the engine variable `name`, replacing any previous
    /// value.  The engine keeps its own copy.
    fn put_variable(&mut self, name: &str, value: &EngineArray) -> Result<(), EngineStatus>;

    /// Copy of the engine variable `name`, or `None` if it is undefined.
    fn get_variable(&mut self, name: &str) -> Option<EngineArray>;

    /// Evaluate a command string.
    fn eval_string(&mut self, command: &str) -> Result<(), EngineStatus>;

    /// Start capturing console output into a buffer of `capacity` bytes.
    ///
    /// While attached, the output of each evaluation replaces the buffer
    /// contents, truncated to `capacity`.
    fn attach_output_buffer(&mut self, capacity: usize) -> Result<(), EngineStatus>;

    /// Contents of the attached output buffer.  Empty when detached.
    fn captured_output(&self) -> String;

    /// Stop capturing console output and release the buffer.
    fn detach_output_buffer(&mut self);
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn open(&mut self) -> Result<(), EngineStatus> {
        (**self).open()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn put_variable(&mut self, name: &str, value: &EngineArray) -> Result<(), EngineStatus> {
        (**self).put_variable(name, value)
    }

    fn get_variable(&mut self, name: &str) -> Option<EngineArray> {
        (**self).get_variable(name)
    }

    fn eval_string(&mut self, command: &str) -> Result<(), EngineStatus> {
        (**self).eval_string(command)
    }

    fn attach_output_buffer(&mut self, capacity: usize) -> Result<(), EngineStatus> {
        (**self).attach_output_buffer(capacity)
    }

    fn captured_output(&self) -> String {
        (**self).captured_output()
    }

    fn detach_output_buffer(&mut self) {
        (**self).detach_output_buffer()
    }
}
