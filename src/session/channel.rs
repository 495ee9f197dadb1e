use super::{SessionError, SessionSettings};
use crate::algebra::{Complex64, FloatT, IndexT, Layout};
use crate::codec::{self, HostBuffer, HostMatrix};
use crate::engine::{Engine, EngineArray, EngineStatus, OutputCapture};
use crate::io::{ConfigurablePrintTarget, PrintTarget, Severity};
use num_complex::Complex;
use std::io::Write;

/// Host copies of the operands of the most recent linear solve.
///
/// Each is filled in as the corresponding solve step completes, so after a
/// failed solve the operands assembled before the failure remain
/// available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveHandles {
    pub lhs: Option<EngineArray>,
    pub rhs: Option<EngineArray>,
    pub solution: Option<EngineArray>,
}

/// The single connection to an external engine.
///
/// A `Session` owns its engine and exposes the four primitives every
/// other operation is built on: [`put`](Session::put),
/// [`get`](Session::get), [`eval`](Session::eval) and
/// [`eval_captured`](Session::eval_captured).  No locking is done; a
/// session is used from one place at a time.
///
/// The engine is closed when the session is dropped.  A session over
/// `&mut E` closes the borrowed engine the same way.
///
/// ```
/// # #[cfg(feature = "reference-engine")] {
/// use engine_bridge::algebra::Layout;
/// use engine_bridge::engine::ReferenceEngine;
/// use engine_bridge::session::{Session, SessionSettings};
///
/// let mut session = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
/// session
///     .put_real_matrix("A", 2, 2, Some(&[1.0, 2.0, 3.0, 4.0][..]), Layout::RowMajor)
///     .unwrap();
/// session.eval("B = A * 2;").unwrap();
///
/// let mut B = [0.0; 4];
/// session.get_real_matrix("B", 2, 2, &mut B, Layout::RowMajor).unwrap();
/// assert_eq!(B, [2.0, 4.0, 6.0, 8.0]);
/// # }
/// ```
#[derive(Debug)]
pub struct Session<E: Engine> {
    engine: E,
    pub settings: SessionSettings,
    pub(crate) stream: PrintTarget,
    pub(crate) retained: SolveHandles,
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        self.engine.close();
    }
}

impl<E: Engine> Session<E> {
    /// Open `engine` and wrap it in a session.
    pub fn new(mut engine: E, settings: SessionSettings) -> Result<Self, SessionError> {
        engine.open().map_err(SessionError::Connection)?;
        Ok(Session {
            engine,
            settings,
            stream: PrintTarget::default(),
            retained: SolveHandles::default(),
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn is_open(&self) -> bool {
        self.engine.is_open()
    }

    pub fn close(&mut self) {
        self.engine.close();
        self.retained = SolveHandles::default();
    }

    /// Close and reopen the engine.
    ///
    /// Operands retained from earlier solves are released.  Restarting a
    /// session that is already closed simply opens it.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.close();
        self.engine.open().map_err(|status| {
            self.error(format_args!("engine could not be restarted ({})", status));
            SessionError::Connection(status)
        })
    }

    /// Operands of the most recent linear solve.
    pub fn last_solve(&self) -> &SolveHandles {
        &self.retained
    }

    // ---------------------------------------------------------
    // the four primitives
    // ---------------------------------------------------------

    /// Bind `value` to the engine variable `name`.
    pub fn put(&mut self, name: &str, value: &EngineArray) -> Result<(), SessionError> {
        self.engine
            .put_variable(name, value)
            .map_err(|status| SessionError::Transfer {
                name: name.to_string(),
                reason: status.to_string(),
            })
    }

    /// Copy of the engine variable `name`, or `None` if it is undefined.
    pub fn get(&mut self, name: &str) -> Option<EngineArray> {
        self.engine.get_variable(name)
    }

    /// Evaluate a command string.
    pub fn eval(&mut self, command: &str) -> Result<(), EngineStatus> {
        self.engine.eval_string(command)
    }

    /// Evaluate a command string and return its console output, captured
    /// into a buffer of `capacity` bytes.
    ///
    /// The buffer is detached again before returning, on success and on
    /// failure.  A failed evaluation is reported as
    /// [`SessionError::Script`] and its output is discarded.
    pub fn eval_captured(&mut self, command: &str, capacity: usize) -> Result<String, SessionError> {
        let mut capture = OutputCapture::attach(&mut self.engine, capacity)
            .map_err(SessionError::OutputBuffer)?;
        capture.eval(command).map_err(SessionError::Script)?;
        Ok(capture.output())
    }

    /// Evaluate a command whose failure is a [`SessionError::SolveEngine`].
    pub(crate) fn command(&mut self, command: &str) -> Result<(), SessionError> {
        self.eval(command).map_err(|status| SessionError::SolveEngine {
            command: command.to_string(),
            reason: status.to_string(),
        })
    }

    // ---------------------------------------------------------
    // typed dense transfers
    // ---------------------------------------------------------

    /// Put an `m x n` real matrix.  `None` puts a matrix of zeros.
    pub fn put_real_matrix<T: FloatT>(
        &mut self,
        name: &str,
        m: usize,
        n: usize,
        values: Option<&[T]>,
        layout: Layout,
    ) -> Result<(), SessionError> {
        self.put(name, &codec::encode_real(m, n, values, layout))
    }

    /// Put an `m x n` matrix of 0-based indices as 1-based engine values.
    pub fn put_index_matrix<I: IndexT>(
        &mut self,
        name: &str,
        m: usize,
        n: usize,
        values: Option<&[I]>,
        layout: Layout,
    ) -> Result<(), SessionError> {
        self.put(name, &codec::encode_index(m, n, values, layout))
    }

    pub fn put_complex_matrix<T: FloatT>(
        &mut self,
        name: &str,
        m: usize,
        n: usize,
        values: Option<&[Complex<T>]>,
        layout: Layout,
    ) -> Result<(), SessionError> {
        self.put(name, &codec::encode_complex(m, n, values, layout))
    }

    fn fetch(&mut self, name: &str) -> Result<EngineArray, SessionError> {
        self.get(name).ok_or_else(|| SessionError::absent(name))
    }

    /// Read the `m x n` engine matrix `name` into `dest`.
    ///
    /// Fails with [`SessionError::DimensionMismatch`] if the engine value
    /// has another shape, leaving `dest` untouched.
    pub fn get_real_matrix<T: FloatT>(
        &mut self,
        name: &str,
        m: usize,
        n: usize,
        dest: &mut [T],
        layout: Layout,
    ) -> Result<(), SessionError> {
        let handle = self.fetch(name)?;
        codec::decode_real(&handle, m, n, dest, layout).map_err(|e| SessionError::from_codec(name, e))
    }

    /// Read 1-based engine indices into 0-based host indices.
    pub fn get_index_matrix<I: IndexT>(
        &mut self,
        name: &str,
        m: usize,
        n: usize,
        dest: &mut [I],
        layout: Layout,
    ) -> Result<(), SessionError> {
        let handle = self.fetch(name)?;
        codec::decode_index(&handle, m, n, dest, layout)
            .map_err(|e| SessionError::from_codec(name, e))
    }

    pub fn get_complex_matrix<T: FloatT>(
        &mut self,
        name: &str,
        m: usize,
        n: usize,
        dest: &mut [Complex<T>],
        layout: Layout,
    ) -> Result<(), SessionError> {
        let handle = self.fetch(name)?;
        codec::decode_complex(&handle, m, n, dest, layout)
            .map_err(|e| SessionError::from_codec(name, e))
    }

    /// Read a real matrix of whatever shape the engine holds, as
    /// `(m, n, values)`.
    pub fn get_real_matrix_sized<T: FloatT>(
        &mut self,
        name: &str,
        layout: Layout,
    ) -> Result<(usize, usize, Vec<T>), SessionError> {
        let handle = self.fetch(name)?;
        codec::decode_real_sized(&handle, layout).map_err(|e| SessionError::from_codec(name, e))
    }

    pub fn get_index_matrix_sized<I: IndexT>(
        &mut self,
        name: &str,
        layout: Layout,
    ) -> Result<(usize, usize, Vec<I>), SessionError> {
        let handle = self.fetch(name)?;
        codec::decode_index_sized(&handle, layout).map_err(|e| SessionError::from_codec(name, e))
    }

    pub fn get_complex_matrix_sized<T: FloatT>(
        &mut self,
        name: &str,
        layout: Layout,
    ) -> Result<(usize, usize, Vec<Complex<T>>), SessionError> {
        let handle = self.fetch(name)?;
        codec::decode_complex_sized(&handle, layout)
            .map_err(|e| SessionError::from_codec(name, e))
    }

    /// Put a host buffer, encoded according to its element kind.
    pub fn put_buffer(&mut self, name: &str, buffer: &HostBuffer) -> Result<(), SessionError> {
        self.put(name, &buffer.encode())
    }

    /// Overwrite `buffer` from the engine variable `name`, decoded
    /// according to the buffer's element kind.
    pub fn get_buffer(&mut self, name: &str, buffer: &mut HostBuffer) -> Result<(), SessionError> {
        let handle = self.fetch(name)?;
        buffer
            .decode_from(&handle)
            .map_err(|e| SessionError::from_codec(name, e))
    }

    /// Put a character matrix with one row per string.
    pub fn set_string_array<S: AsRef<str>>(
        &mut self,
        name: &str,
        rows: &[S],
    ) -> Result<(), SessionError> {
        self.put(name, &EngineArray::from_strings(rows))
    }

    /// Put a single complex value.
    pub fn put_complex_scalar(&mut self, name: &str, z: Complex64) -> Result<(), SessionError> {
        self.put(name, &EngineArray::from_complex(1, 1, vec![z]))
    }

    // ---------------------------------------------------------
    // diagnostics
    // ---------------------------------------------------------

    pub(crate) fn warn(&mut self, msg: std::fmt::Arguments) {
        if self.settings.verbose {
            self.stream.diagnostic(Severity::Warning, msg);
        }
    }

    pub(crate) fn error(&mut self, msg: std::fmt::Arguments) {
        if self.settings.verbose {
            self.stream.diagnostic(Severity::Error, msg);
        }
    }
}

impl<E: Engine> ConfigurablePrintTarget for Session<E> {
    fn print_to_stderr(&mut self) {
        self.stream.print_to_stderr()
    }
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}
