use super::{Engine, EngineStatus};

/// Scoped console capture on an [`Engine`].
///
/// The output buffer is attached when the guard is created and detached
/// when it is dropped, whichever way the scope is left.  The engine can
/// therefore never hold a buffer that has outlived its owner.
///
/// ```
/// # #[cfg(feature = "reference-engine")] {
/// use engine_bridge::engine::{Engine, OutputCapture, ReferenceEngine};
///
/// let mut engine = ReferenceEngine::new();
/// engine.open().unwrap();
/// let text = {
///     let mut capture = OutputCapture::attach(&mut engine, 1024).unwrap();
///     capture.eval("x = 2").unwrap();
///     capture.output()
/// };
/// assert!(text.contains("x ="));
/// assert!(engine.captured_output().is_empty());
/// # }
/// ```
pub struct OutputCapture<'a, E>
where
    E: Engine + ?Sized,
{
    engine: &'a mut E,
}

impl<'a, E> OutputCapture<'a, E>
where
    E: Engine + ?Sized,
{
    /// Attach a capture buffer of `capacity` bytes.
    pub fn attach(engine: &'a mut E, capacity: usize) -> Result<Self, EngineStatus> {
        match engine.attach_output_buffer(capacity) {
            Ok(()) => Ok(OutputCapture { engine }),
            Err(status) => {
                engine.detach_output_buffer();
                Err(status)
            }
        }
    }

    /// Evaluate a command with its console output captured.
    pub fn eval(&mut self, command: &str) -> Result<(), EngineStatus> {
        self.engine.eval_string(command)
    }

    /// Output captured so far.
    pub fn output(&self) -> String {
        self.engine.captured_output()
    }
}

impl<E> Drop for OutputCapture<'_, E>
where
    E: Engine + ?Sized,
{
    fn drop(&mut self) {
        self.engine.detach_output_buffer();
    }
}
