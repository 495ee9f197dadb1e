//! Script Runner.
//!
//! Code is run in one of three ways: as raw code text, as the contents of a
//! script file, or as a named script already on the engine's search path.
//! Each comes in three flavours: without capture, captured into a buffer of
//! a given capacity, and `*_to_string`, which captures into a buffer of
//! `settings.output_capacity` bytes, normalizes the output and reports
//! failures in the returned text instead of as an error.

use super::{Session, SessionError};
use crate::engine::{Engine, OutputCapture};
use std::io::Write;
use std::path::Path;

/// Strip a leading echo `prompt` and then a single leading line break
/// from captured console output.
pub fn normalize_output(text: &str, prompt: &str) -> String {
    let text = text.strip_prefix(prompt).unwrap_or(text);
    let text = text.strip_prefix('\n').unwrap_or(text);
    text.to_string()
}

// quote `s` as an engine string literal
fn quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl<E: Engine> Session<E> {
    // Evaluate `command`, preceded by `prelude` whose status is ignored,
    // optionally capturing console output.  The capture buffer is released
    // before returning.
    fn run_captured(
        &mut self,
        prelude: Option<&str>,
        command: &str,
        capacity: Option<usize>,
    ) -> Result<Option<String>, SessionError> {
        let capacity = match capacity {
            Some(capacity) => capacity,
            None => {
                if let Some(prelude) = prelude {
                    let _ = self.eval(prelude);
                }
                self.eval(command).map_err(SessionError::Script)?;
                return Ok(None);
            }
        };

        let mut capture = OutputCapture::attach(self.engine_mut(), capacity)
            .map_err(SessionError::OutputBuffer)?;
        if let Some(prelude) = prelude {
            let _ = capture.eval(prelude);
        }
        capture.eval(command).map_err(SessionError::Script)?;
        Ok(Some(capture.output()))
    }

    fn report<T>(&mut self, what: &str, res: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(ref e) = res {
            match e {
                SessionError::OutputBuffer(_) => {
                    self.error(format_args!("Unable to set engine output buffer"))
                }
                _ => self.error(format_args!("Error running {}: {}", what, e)),
            }
        }
        res
    }

    fn to_string_or_error(&self, what: &str, res: Result<String, SessionError>) -> String {
        match res {
            Ok(text) => normalize_output(&text, &self.settings.prompt),
            Err(e) => format!("ERROR: {} failed with error code {}.\n", what, e.code()),
        }
    }

    // ---------------------------------------------------------
    // raw code
    // ---------------------------------------------------------

    /// Evaluate code text.
    pub fn eval_code(&mut self, code: &str) -> Result<(), SessionError> {
        let res = self.run_captured(None, code, None).map(|_| ());
        self.report(&format!("engine command \"{}\"", code), res)
    }

    /// Evaluate code text and return its raw console output.
    pub fn eval_code_captured(&mut self, code: &str, capacity: usize) -> Result<String, SessionError> {
        let res = self
            .run_captured(None, code, Some(capacity))
            .map(Option::unwrap_or_default);
        self.report(&format!("engine command \"{}\"", code), res)
    }

    /// Evaluate code text and return its normalized console output, or an
    /// `ERROR: ...` line on failure.
    pub fn eval_to_string(&mut self, code: &str) -> String {
        let res = self.eval_code_captured(code, self.settings.output_capacity);
        self.to_string_or_error("Engine command", res)
    }

    // ---------------------------------------------------------
    // script files
    // ---------------------------------------------------------

    fn load_and_run(&mut self, path: &Path, capacity: Option<usize>) -> Result<Option<String>, SessionError> {
        let bytes = std::fs::read(path).map_err(|source| SessionError::ScriptUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(SessionError::EmptyScript(path.to_path_buf()));
        }
        let code = String::from_utf8_lossy(&bytes);
        self.run_captured(None, &code, capacity)
    }

    /// Read a script file and evaluate its contents.
    ///
    /// Fails with [`SessionError::ScriptUnreadable`] if the file cannot be
    /// read and with [`SessionError::EmptyScript`] if it is empty.
    pub fn load_and_run_script<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let path = path.as_ref();
        let res = self.load_and_run(path, None).map(|_| ());
        self.report(&format!("engine script {:?}", path), res)
    }

    pub fn load_and_run_script_captured<P: AsRef<Path>>(
        &mut self,
        path: P,
        capacity: usize,
    ) -> Result<String, SessionError> {
        let path = path.as_ref();
        let res = self
            .load_and_run(path, Some(capacity))
            .map(Option::unwrap_or_default);
        self.report(&format!("engine script {:?}", path), res)
    }

    pub fn load_and_run_script_to_string<P: AsRef<Path>>(&mut self, path: P) -> String {
        let path = path.as_ref();
        let res = self.load_and_run_script_captured(path, self.settings.output_capacity);
        self.to_string_or_error(&format!("Engine script '{}'", path.display()), res)
    }

    // ---------------------------------------------------------
    // named scripts on the search path
    // ---------------------------------------------------------

    // the command running `name`: the name without its extension
    fn script_command<'a>(&self, name: &'a str) -> Result<&'a str, SessionError> {
        let expected = self.settings.script_extension.trim_start_matches('.');
        match name.rfind('.') {
            None => Ok(name),
            Some(dot) if name[dot + 1..].eq_ignore_ascii_case(expected) => Ok(&name[..dot]),
            Some(_) => Err(SessionError::ScriptExtension(name.to_string())),
        }
    }

    fn run_named(&mut self, name: &str, capacity: Option<usize>) -> Result<Option<String>, SessionError> {
        let command = self.script_command(name)?;
        let prelude = self.settings.clear_function_cache.then_some("clear functions;");
        self.run_captured(prelude, command, capacity)
    }

    /// Run the script `name` from the engine's search path.
    ///
    /// The name may carry the script extension, matched case-insensitively;
    /// any other extension fails with [`SessionError::ScriptExtension`].
    /// Unless disabled in the settings, the engine's function cache is
    /// cleared first so that an edited script is reloaded.
    pub fn run_script(&mut self, name: &str) -> Result<(), SessionError> {
        let res = self.run_named(name, None).map(|_| ());
        self.report(&format!("engine script \"{}\"", name), res)
    }

    pub fn run_script_captured(&mut self, name: &str, capacity: usize) -> Result<String, SessionError> {
        let res = self
            .run_named(name, Some(capacity))
            .map(Option::unwrap_or_default);
        self.report(&format!("engine script \"{}\"", name), res)
    }

    pub fn run_script_to_string(&mut self, name: &str) -> String {
        let res = self.run_script_captured(name, self.settings.output_capacity);
        self.to_string_or_error(&format!("Engine script '{}'", name), res)
    }

    /// Add `dir` to the engine's script search path.
    pub fn add_script_path<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), SessionError> {
        let dir = dir.as_ref().to_string_lossy().into_owned();
        self.eval_code(&format!("addpath({})", quoted(&dir)))
    }

    /// Add `dir` to the search path, run the script `name` from it and
    /// print the output, framed by a banner, to the session's print
    /// target.  The normalized output is returned as well.
    pub fn run_script_in_path<P: AsRef<Path>>(
        &mut self,
        dir: P,
        name: &str,
    ) -> Result<String, SessionError> {
        if let Err(e) = self.add_script_path(dir) {
            self.error(format_args!("Unable to add engine script directory to path."));
            return Err(e);
        }
        let output = self.run_script_to_string(name);
        if self.settings.verbose {
            let _ = write!(
                self.stream,
                "ENGINE OUTPUT\n--------------------\n{}--------------------\n",
                output
            );
        }
        Ok(output)
    }
}

#[cfg(all(test, feature = "reference-engine"))]
mod tests {
    use super::*;
    use crate::engine::ReferenceEngine;
    use crate::io::ConfigurablePrintTarget;
    use crate::session::SessionSettings;

    fn session() -> Session<ReferenceEngine> {
        let mut s = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
        s.print_to_buffer();
        s
    }

    #[test]
    fn test_normalize_output() {
        assert_eq!(normalize_output(">> \nx = 1\n", ">> "), "x = 1\n");
        assert_eq!(normalize_output("\n\nx", ">> "), "\nx");
        assert_eq!(normalize_output(">> x", ">> "), "x");
        assert_eq!(normalize_output("plain", ">> "), "plain");
        assert_eq!(normalize_output("", ">> "), "");
    }

    #[test]
    fn test_quoted() {
        assert_eq!(quoted("/tmp/a"), "'/tmp/a'");
        assert_eq!(quoted("it's"), "'it''s'");
    }

    #[test]
    fn test_eval_to_string() {
        let mut s = session();
        assert_eq!(s.eval_to_string("x = 3"), "x =\n\n    3\n\n");
        assert_eq!(s.eval_to_string("y = 1;"), "");
        assert_eq!(
            s.eval_to_string("z = nope"),
            "ERROR: Engine command failed with error code 1.\n"
        );
        let log = s.get_print_buffer().unwrap();
        assert!(log.starts_with("ERROR: Error running engine command \"z = nope\""));
    }

    #[test]
    fn test_script_extension() {
        let s = session();
        assert_eq!(s.script_command("setup").unwrap(), "setup");
        assert_eq!(s.script_command("setup.m").unwrap(), "setup");
        assert_eq!(s.script_command("setup.M").unwrap(), "setup");
        let e = s.script_command("setup.py").unwrap_err();
        assert_eq!(e.code(), -99);
    }

    #[test]
    fn test_run_script_rejects_extension() {
        let mut s = session();
        assert_eq!(
            s.run_script_to_string("setup.txt"),
            "ERROR: Engine script 'setup.txt' failed with error code -99.\n"
        );
        // nothing reached the engine
        assert!(s.engine().history().is_empty());
    }

    #[test]
    fn test_clear_function_cache() {
        let mut s = session();
        s.eval_code("x = 1;").unwrap();
        let _ = s.run_script("x");
        assert_eq!(s.engine().history().last().map(String::as_str), Some("x"));
        assert!(s.engine().history().iter().any(|c| c == "clear functions;"));

        s.engine_mut().clear_history();
        s.settings.clear_function_cache = false;
        s.run_script("x.m").unwrap();
        assert_eq!(s.engine().history(), ["x"]);
    }

    #[test]
    fn test_missing_and_empty_files() {
        let mut s = session();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.m");
        assert_eq!(s.load_and_run_script(&missing).unwrap_err().code(), -2);

        let empty = dir.path().join("empty.m");
        std::fs::write(&empty, "").unwrap();
        assert_eq!(s.load_and_run_script(&empty).unwrap_err().code(), -1);
        let text = s.load_and_run_script_to_string(&empty);
        assert!(text.starts_with("ERROR: Engine script '"));
        assert!(text.ends_with("' failed with error code -1.\n"));
    }
}
