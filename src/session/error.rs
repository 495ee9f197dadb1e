use crate::codec::CodecError;
use crate::engine::EngineStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by [`Session`](super::Session) operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The engine could not be started.
    #[error("engine connection failed: {0}")]
    Connection(EngineStatus),

    /// An engine value does not have the shape of the host buffer.
    #[error("`{name}` is {actual:?} on the engine, expected {expected:?}")]
    DimensionMismatch {
        name: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A put or get did not go through.
    #[error("transfer of `{name}` failed: {reason}")]
    Transfer { name: String, reason: String },

    /// An engine command failed or did not produce its result.
    #[error("engine command `{command}` failed: {reason}")]
    SolveEngine { command: String, reason: String },

    /// A queried variable is absent or has an unexpected shape.
    #[error("`{name}` not found: {reason}")]
    NotFound { name: String, reason: String },

    /// The console capture buffer could not be attached.
    #[error("output buffer could not be attached: {0}")]
    OutputBuffer(EngineStatus),

    #[error("script file {path:?} could not be read: {source}")]
    ScriptUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("script file {0:?} is empty")]
    EmptyScript(PathBuf),

    #[error("script name `{0}` has an unsupported extension")]
    ScriptExtension(String),

    /// Evaluation of script code failed.
    #[error("script evaluation failed: {0}")]
    Script(EngineStatus),
}

impl SessionError {
    /// Numeric status code of the failure.
    ///
    /// Engine statuses are reported as is.  An empty script is -1, an
    /// unreadable script -2 and a rejected extension -99.  Failures with
    /// no status of their own report 1.
    pub fn code(&self) -> i32 {
        match self {
            SessionError::Connection(status)
            | SessionError::OutputBuffer(status)
            | SessionError::Script(status) => status.0,
            SessionError::EmptyScript(_) => -1,
            SessionError::ScriptUnreadable { .. } => -2,
            SessionError::ScriptExtension(_) => -99,
            _ => 1,
        }
    }

    pub(crate) fn from_codec(name: &str, e: CodecError) -> Self {
        match e {
            CodecError::DimensionMismatch { expected, actual } => {
                SessionError::DimensionMismatch {
                    name: name.to_string(),
                    expected,
                    actual,
                }
            }
            e => SessionError::Transfer {
                name: name.to_string(),
                reason: e.to_string(),
            },
        }
    }

    pub(crate) fn absent(name: &str) -> Self {
        SessionError::Transfer {
            name: name.to_string(),
            reason: "variable is not defined on the engine".to_string(),
        }
    }
}

#[test]
fn test_error_codes() {
    assert_eq!(SessionError::EmptyScript(PathBuf::from("a.m")).code(), -1);
    assert_eq!(
        SessionError::ScriptUnreadable {
            path: PathBuf::from("a.m"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .code(),
        -2
    );
    assert_eq!(SessionError::ScriptExtension("a.py".into()).code(), -99);
    assert_eq!(SessionError::Script(EngineStatus(3)).code(), 3);
    assert_eq!(SessionError::absent("x").code(), 1);

    let e = SessionError::from_codec(
        "x",
        CodecError::DimensionMismatch {
            expected: (3, 3),
            actual: (2, 3),
        },
    );
    assert!(matches!(e, SessionError::DimensionMismatch { .. }));
}
