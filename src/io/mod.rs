//! Where a session's diagnostics go.
//!
//! A session reports recoverable problems (an inferred sparse shape, a
//! failed solve, a script that could not be run) as single lines prefixed
//! with their [`Severity`].  The lines are written to a [`PrintTarget`],
//! standard error unless redirected through [`ConfigurablePrintTarget`].

use std::fmt;
use std::fs::File;
use std::io::{sink, stderr, stdout, Error, ErrorKind, Result, Sink, Stderr, Stdout, Write};

/// Severity of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("WARNING"),
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

/// Destination of session diagnostics.
pub enum PrintTarget {
    Stderr(Stderr),
    Stdout(Stdout),
    File(File),
    /// kept in memory until read with [`get_print_buffer`](ConfigurablePrintTarget::get_print_buffer)
    Buffer(Vec<u8>),
    Stream(Box<dyn Write + Send + Sync>),
    Sink(Sink),
}

impl PrintTarget {
    fn kind(&self) -> &'static str {
        match self {
            PrintTarget::Stderr(_) => "Stderr",
            PrintTarget::Stdout(_) => "Stdout",
            PrintTarget::File(_) => "File",
            PrintTarget::Buffer(_) => "Buffer",
            PrintTarget::Stream(_) => "Stream",
            PrintTarget::Sink(_) => "Sink",
        }
    }

    /// Write one `"WARNING: ..."` or `"ERROR: ..."` line.
    ///
    /// A diagnostic that cannot be written is dropped.
    pub fn diagnostic(&mut self, severity: Severity, msg: fmt::Arguments) {
        let _ = writeln!(self, "{}: {}", severity, msg);
    }
}

impl fmt::Debug for PrintTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrintTarget::{}", self.kind())
    }
}

impl Default for PrintTarget {
    fn default() -> Self {
        PrintTarget::Stderr(stderr())
    }
}

impl Write for PrintTarget {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        match self {
            PrintTarget::Stderr(out) => out.write(buf),
            PrintTarget::Stdout(out) => out.write(buf),
            PrintTarget::File(file) => file.write(buf),
            PrintTarget::Buffer(buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            PrintTarget::Stream(stream) => stream.write(buf),
            PrintTarget::Sink(sink) => sink.write(buf),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            PrintTarget::Stderr(out) => out.flush(),
            PrintTarget::Stdout(out) => out.flush(),
            PrintTarget::File(file) => file.flush(),
            PrintTarget::Stream(stream) => stream.flush(),
            PrintTarget::Buffer(_) | PrintTarget::Sink(_) => Ok(()),
        }
    }
}

/// Redirection of diagnostics, implemented by
/// [`Session`](crate::session::Session) and by [`PrintTarget`] itself.
pub trait ConfigurablePrintTarget {
    /// diagnostics to stderr (the default)
    fn print_to_stderr(&mut self);
    /// diagnostics to stdout
    fn print_to_stdout(&mut self);
    /// diagnostics appended to `file`
    fn print_to_file(&mut self, file: File);
    /// diagnostics to any writer
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>);
    /// drop all diagnostics
    fn print_to_sink(&mut self);
    /// collect diagnostics in memory, discarding anything collected before
    fn print_to_buffer(&mut self);
    /// Diagnostics collected since the last
    /// [`print_to_buffer`](ConfigurablePrintTarget::print_to_buffer).
    /// Fails if diagnostics are not being collected.
    fn get_print_buffer(&mut self) -> Result<String>;
}

impl ConfigurablePrintTarget for PrintTarget {
    fn print_to_stderr(&mut self) {
        *self = PrintTarget::Stderr(stderr());
    }

    fn print_to_stdout(&mut self) {
        *self = PrintTarget::Stdout(stdout());
    }

    fn print_to_file(&mut self, file: File) {
        *self = PrintTarget::File(file);
    }

    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        *self = PrintTarget::Stream(stream);
    }

    fn print_to_sink(&mut self) {
        *self = PrintTarget::Sink(sink());
    }

    fn print_to_buffer(&mut self) {
        *self = PrintTarget::Buffer(Vec::new());
    }

    fn get_print_buffer(&mut self) -> Result<String> {
        match self {
            PrintTarget::Buffer(buffer) => Ok(String::from_utf8_lossy(buffer).into_owned()),
            other => Err(Error::new(
                ErrorKind::Other,
                format!("diagnostics are not being collected ({:?})", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom};

    #[test]
    fn test_buffer_target() {
        let mut target = PrintTarget::default();
        assert!(target.get_print_buffer().is_err());

        target.print_to_buffer();
        target.diagnostic(Severity::Warning, format_args!("shape of {} inferred", "A"));
        target.diagnostic(Severity::Error, format_args!("code {}", -2));
        assert_eq!(
            target.get_print_buffer().unwrap(),
            "WARNING: shape of A inferred\nERROR: code -2\n"
        );

        // redirecting discards what was collected
        target.print_to_buffer();
        assert_eq!(target.get_print_buffer().unwrap(), "");

        target.print_to_sink();
        target.diagnostic(Severity::Error, format_args!("lost"));
        let err = target.get_print_buffer().unwrap_err();
        assert!(err.to_string().contains("PrintTarget::Sink"));
    }

    #[test]
    fn test_file_target() {
        let mut file = tempfile::tempfile().unwrap();
        let mut target = PrintTarget::default();
        target.print_to_file(file.try_clone().unwrap());
        target.diagnostic(Severity::Warning, format_args!("to file"));
        target.flush().unwrap();

        let mut contents = String::new();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "WARNING: to file\n");
    }
}
