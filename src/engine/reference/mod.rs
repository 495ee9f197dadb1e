//! An in-process engine.
//!
//! [`ReferenceEngine`] keeps a workspace of named [`EngineArray`]s and
//! interprets the small command language this crate issues to a computational
//! engine: scratch variable clearing, sparse assembly from triplets,
//! nonzero enumeration, size queries, left division and script execution.
//! It stands in for a real engine installation in tests and demos.

mod builtins;
mod display;
mod interp;
mod lexer;
mod lu;
mod ops;
mod parser;

use super::{is_valid_name, Engine, EngineArray, EngineStatus};
use interp::Interpreter;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// status of a failed evaluation
const EVAL_FAILED: i32 = 1;
/// status of any call on a closed engine
const NOT_OPEN: i32 = 2;
/// status of a failed start
const START_FAILED: i32 = -1;

#[derive(Error, Debug, Clone, PartialEq)]
enum EvalError {
    #[error("{0}")]
    Syntax(String),
    #[error("Undefined function or variable '{0}'.")]
    Undefined(String),
    #[error("Matrix dimensions must agree.")]
    Dimensions,
    #[error("Inner matrix dimensions must agree.")]
    InnerDimensions,
    #[error("Dimensions of matrices being concatenated are not consistent.")]
    Concatenation,
    #[error("Index exceeds matrix dimensions.")]
    Index,
    #[error("Subscript indices must either be real positive integers or logicals.")]
    BadSubscript,
    #[error("Too many output arguments.")]
    TooManyOutputs,
    #[error("Matrix is singular to working precision.")]
    Singular,
    #[error("{0}")]
    Message(String),
    /// raised by the `error` builtin
    #[error("{0}")]
    User(String),
}

#[derive(Debug, Clone)]
struct Capture {
    capacity: usize,
    text: String,
}

/// In-process implementation of [`Engine`].
///
/// Evaluation failures print an `Error: ...` line to the console.  A
/// strict engine (the default) also reports them as a nonzero status,
/// while a [lenient](ReferenceEngine::lenient) one always reports success
/// the way some engines do as long as the session is alive.
///
/// ```
/// use engine_bridge::engine::{Engine, ReferenceEngine};
///
/// let mut engine = ReferenceEngine::new();
/// engine.open().unwrap();
/// engine.eval_string("A = sparse([1; 2], [1; 2], [2; 3]); x = A \\ [4; 9];").unwrap();
/// let x = engine.get_variable("x").unwrap();
/// assert_eq!(x.real_cells().unwrap(), &[2.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ReferenceEngine {
    available: bool,
    strict: bool,
    open: bool,
    workspace: BTreeMap<String, EngineArray>,
    search_path: Vec<PathBuf>,
    capture: Option<Capture>,
    history: Vec<String>,
}

impl Default for ReferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceEngine {
    /// A strict engine, not yet opened.
    pub fn new() -> Self {
        ReferenceEngine {
            available: true,
            strict: true,
            open: false,
            workspace: BTreeMap::new(),
            search_path: Vec::new(),
            capture: None,
            history: Vec::new(),
        }
    }

    /// An engine whose evaluations always report success.
    pub fn lenient() -> Self {
        ReferenceEngine {
            strict: false,
            ..Self::new()
        }
    }

    /// An engine that can never be started.
    pub fn unavailable() -> Self {
        ReferenceEngine {
            available: false,
            ..Self::new()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Every command passed to [`eval_string`](Engine::eval_string), oldest
    /// first.  Survives closing and reopening.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Borrow a workspace variable without copying it.
    pub fn variable(&self, name: &str) -> Option<&EngineArray> {
        self.workspace.get(name)
    }

    /// Names of all workspace variables, sorted.
    pub fn variable_names(&self) -> Vec<&str> {
        self.workspace.keys().map(String::as_str).collect()
    }

    /// Script search path, most recently added first.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }
}

impl Engine for ReferenceEngine {
    fn open(&mut self) -> Result<(), EngineStatus> {
        if !self.available {
            return Err(EngineStatus(START_FAILED));
        }
        if !self.open {
            self.open = true;
            self.workspace.clear();
            self.search_path.clear();
        }
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
        self.workspace.clear();
        self.search_path.clear();
        self.capture = None;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn put_variable(&mut self, name: &str, value: &EngineArray) -> Result<(), EngineStatus> {
        if !self.open {
            return Err(EngineStatus(NOT_OPEN));
        }
        if !is_valid_name(name) {
            return Err(EngineStatus(EVAL_FAILED));
        }
        self.workspace.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn get_variable(&mut self, name: &str) -> Option<EngineArray> {
        if !self.open {
            return None;
        }
        self.workspace.get(name).cloned()
    }

    fn eval_string(&mut self, command: &str) -> Result<(), EngineStatus> {
        if !self.open {
            return Err(EngineStatus(NOT_OPEN));
        }
        self.history.push(command.to_string());

        let mut out = String::new();
        let result = Interpreter {
            workspace: &mut self.workspace,
            search_path: &mut self.search_path,
            out: &mut out,
            depth: 0,
        }
        .run(command);
        if let Err(e) = &result {
            out.push_str(&format!("Error: {}\n", e));
        }

        if let Some(capture) = &mut self.capture {
            let mut text = format!(">> {}", out);
            truncate_at_boundary(&mut text, capture.capacity);
            capture.text = text;
        }

        match result {
            Err(_) if self.strict => Err(EngineStatus(EVAL_FAILED)),
            _ => Ok(()),
        }
    }

    fn attach_output_buffer(&mut self, capacity: usize) -> Result<(), EngineStatus> {
        if !self.open {
            return Err(EngineStatus(NOT_OPEN));
        }
        if capacity == 0 {
            return Err(EngineStatus(EVAL_FAILED));
        }
        self.capture = Some(Capture {
            capacity,
            text: String::new(),
        });
        Ok(())
    }

    fn captured_output(&self) -> String {
        self.capture
            .as_ref()
            .map(|c| c.text.clone())
            .unwrap_or_default()
    }

    fn detach_output_buffer(&mut self) {
        self.capture = None;
    }
}

fn truncate_at_boundary(text: &mut String, capacity: usize) {
    if text.len() <= capacity {
        return;
    }
    let mut end = capacity;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
