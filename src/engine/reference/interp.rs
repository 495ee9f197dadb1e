use super::builtins::{self, is_builtin};
use super::display;
use super::lexer::tokenize;
use super::ops::{Dense, Numeric};
use super::parser::{parse_program, BinOp, Expr, Stmt, StmtKind, Target};
use super::EvalError;
use crate::engine::EngineArray;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_SCRIPT_DEPTH: usize = 64;

/// Executes programs against a workspace, appending console text to `out`.
pub(super) struct Interpreter<'a> {
    pub workspace: &'a mut BTreeMap<String, EngineArray>,
    pub search_path: &'a mut Vec<PathBuf>,
    pub out: &'a mut String,
    pub depth: usize,
}

impl Interpreter<'_> {
    pub fn run(&mut self, program: &str) -> Result<(), EvalError> {
        let tokens = tokenize(program)?;
        for stmt in parse_program(&tokens)? {
            self.exec(&stmt)?;
        }
        Ok(())
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        match &stmt.kind {
            StmtKind::Clear(words) => {
                self.clear(words);
                Ok(())
            }
            StmtKind::Assign(targets, rhs) => {
                let values = self.eval_multi(rhs, targets.len())?;
                if values.len() < targets.len() {
                    return Err(EvalError::TooManyOutputs);
                }
                for (target, value) in targets.iter().zip(values) {
                    self.assign(target, value)?;
                    if stmt.display {
                        self.show(&target.name);
                    }
                }
                Ok(())
            }
            StmtKind::Expr(Expr::Var(name)) if self.workspace.contains_key(name) => {
                if stmt.display {
                    self.show(name);
                }
                Ok(())
            }
            StmtKind::Expr(Expr::Var(name)) if !is_builtin(name) => self.run_script(name),
            StmtKind::Expr(expr) => {
                let values = self.eval_multi(expr, 0)?;
                if let Some(value) = values.into_iter().next() {
                    self.workspace.insert("ans".to_string(), value);
                    if stmt.display {
                        self.show("ans");
                    }
                }
                Ok(())
            }
        }
    }

    fn show(&mut self, name: &str) {
        if let Some(value) = self.workspace.get(name) {
            self.out.push_str(&display::named(name, value));
        }
    }

    fn clear(&mut self, words: &[String]) {
        if words.is_empty() {
            self.workspace.clear();
            return;
        }
        for word in words {
            match word.as_str() {
                // no compiled function cache to flush
                "functions" => {}
                "all" => self.workspace.clear(),
                pattern if pattern.contains('*') => {
                    self.workspace
                        .retain(|name, _| !wildcard_match(pattern, name));
                }
                name => {
                    self.workspace.remove(name);
                }
            }
        }
    }

    fn run_script(&mut self, name: &str) -> Result<(), EvalError> {
        let file = format!("{}.m", name);
        let path = self
            .search_path
            .iter()
            .map(|dir| dir.join(&file))
            .find(|p| p.is_file())
            .ok_or_else(|| EvalError::Undefined(name.to_string()))?;
        if self.depth >= MAX_SCRIPT_DEPTH {
            return Err(EvalError::Message(
                "Maximum recursion limit reached.".into(),
            ));
        }
        let code = fs::read_to_string(&path).map_err(|e| {
            EvalError::Message(format!("Unable to read '{}': {}", path.display(), e))
        })?;

        self.depth += 1;
        let result = self.run(&code);
        self.depth -= 1;
        result
    }

    fn assign(&mut self, target: &Target, value: EngineArray) -> Result<(), EvalError> {
        let args = match &target.index {
            None => {
                self.workspace.insert(target.name.clone(), value);
                return Ok(());
            }
            Some(args) => args,
        };
        if args.len() != 2 {
            return Err(EvalError::Message(
                "Only two-subscript assignment is supported.".into(),
            ));
        }

        let base = match self.workspace.get(&target.name) {
            Some(current) => Numeric::from_array(current)?,
            None => Numeric::Real(Dense::zeros(0, 0)),
        };
        let value = Numeric::from_array(&value)?;
        let (bm, bn) = base.size();
        let (vm, vn) = value.size();
        let count = vm * vn;
        // a `:` into an empty matrix takes its extent from the value
        let empty = bm * bn == 0;

        let (rows, cols) = match (&args[0], &args[1]) {
            (Expr::Colon, Expr::Colon) if empty => ((0..vm).collect(), (0..vn).collect()),
            (Expr::Colon, Expr::Colon) => ((0..bm).collect(), (0..bn).collect()),
            (Expr::Colon, c) => {
                let cols = self.subscripts(c, None)?;
                let rows = if empty {
                    0..count / cols.len().max(1)
                } else {
                    0..bm
                };
                (rows.collect(), cols)
            }
            (r, Expr::Colon) => {
                let rows = self.subscripts(r, None)?;
                let cols = if empty {
                    0..count / rows.len().max(1)
                } else {
                    0..bn
                };
                (rows, cols.collect())
            }
            (r, c) => (self.subscripts(r, None)?, self.subscripts(c, None)?),
        };

        let updated = base.scatter(&rows, &cols, value)?;
        self.workspace
            .insert(target.name.clone(), updated.into_array(false));
        Ok(())
    }

    fn eval_multi(&mut self, expr: &Expr, nargout: usize) -> Result<Vec<EngineArray>, EvalError> {
        match expr {
            Expr::Call(name, args) if !self.workspace.contains_key(name) => {
                self.call(name, args, nargout)
            }
            Expr::Var(name) if !self.workspace.contains_key(name) && is_builtin(name) => {
                self.call(name, &[], nargout)
            }
            _ => Ok(vec![self.eval(expr)?]),
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<EngineArray, EvalError> {
        match expr {
            Expr::Num(v) => Ok(EngineArray::scalar(*v)),
            Expr::Str(s) => Ok(EngineArray::from_strings(&[s])),
            Expr::Colon => Err(EvalError::Syntax(
                "A bare ':' is only valid as a subscript.".into(),
            )),
            Expr::Var(name) => match self.workspace.get(name).cloned() {
                Some(value) => Ok(value),
                None => self.first_output(name, &[]),
            },
            Expr::Call(name, args) => match self.workspace.get(name).cloned() {
                Some(value) => self.index(&value, args),
                None => self.first_output(name, args),
            },
            Expr::Matrix(rows) => self.matrix(rows),
            Expr::Neg(inner) => {
                let value = self.eval(inner)?;
                Ok(Numeric::from_array(&value)?.negate().into_array(false))
            }
            Expr::Binary(op, lhs, rhs) => {
                let a = self.eval(lhs)?;
                let b = self.eval(rhs)?;
                let sparse = a.is_sparse() && b.is_sparse() && *op != BinOp::LeftDiv;
                let result = Numeric::from_array(&a)?.binary(*op, Numeric::from_array(&b)?)?;
                Ok(result.into_array(sparse))
            }
        }
    }

    fn first_output(&mut self, name: &str, args: &[Expr]) -> Result<EngineArray, EvalError> {
        if !is_builtin(name) {
            return Err(EvalError::Undefined(name.to_string()));
        }
        self.call(name, args, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| EvalError::Message(format!("'{}' does not return a value.", name)))
    }

    fn call(
        &mut self,
        name: &str,
        args: &[Expr],
        nargout: usize,
    ) -> Result<Vec<EngineArray>, EvalError> {
        let values = args
            .iter()
            .map(|a| self.eval(a))
            .collect::<Result<Vec<_>, _>>()?;

        let single = |result: Result<EngineArray, EvalError>| result.map(|v| vec![v]);
        match name {
            "sparse" => single(builtins::sparse(&values)),
            "find" => builtins::find(one_arg(name, &values)?, nargout),
            "size" => builtins::size(&values, nargout),
            "zeros" => single(builtins::filled(&values, 0.0)),
            "ones" => single(builtins::filled(&values, 1.0)),
            "eye" => single(builtins::eye(&values)),
            "full" => single(builtins::full(one_arg(name, &values)?)),
            "nnz" => single(builtins::nnz(one_arg(name, &values)?)),
            "numel" => Ok(vec![EngineArray::scalar(
                one_arg(name, &values)?.numel() as f64,
            )]),
            "disp" => {
                let text = display::body(one_arg(name, &values)?);
                self.out.push_str(&text);
                Ok(vec![])
            }
            "error" => {
                let message = one_arg(name, &values)?
                    .as_text()
                    .unwrap_or_else(|| "Unspecified error.".to_string());
                Err(EvalError::User(message))
            }
            "addpath" => {
                for dir in &values {
                    let dir = dir.as_text().ok_or_else(|| {
                        EvalError::Message("Arguments to addpath must be text.".into())
                    })?;
                    self.add_path(&dir);
                }
                Ok(vec![])
            }
            _ => Err(EvalError::Undefined(name.to_string())),
        }
    }

    fn add_path(&mut self, dir: &str) {
        let path = Path::new(dir);
        if !path.is_dir() {
            self.out.push_str(&format!(
                "Warning: Name is nonexistent or not a directory: {}\n",
                dir
            ));
            return;
        }
        self.search_path.retain(|p| p != path);
        self.search_path.insert(0, path.to_path_buf());
    }

    fn index(&mut self, value: &EngineArray, args: &[Expr]) -> Result<EngineArray, EvalError> {
        let data = Numeric::from_array(value)?;
        let (m, n) = data.size();
        let picked = match args {
            [Expr::Colon] => data.reshape(m * n, 1),
            [k] => {
                let pos = self.subscripts(k, Some(m * n))?;
                let count = pos.len();
                let picked = data.reshape(m * n, 1).gather(&pos, &[0]);
                if m == 1 {
                    picked.reshape(1, count)
                } else {
                    picked
                }
            }
            [r, c] => {
                let rows = self.extent(r, m)?;
                let cols = self.extent(c, n)?;
                data.gather(&rows, &cols)
            }
            _ => {
                return Err(EvalError::Message(
                    "Only one or two subscripts are supported.".into(),
                ))
            }
        };
        Ok(picked.into_array(false))
    }

    fn extent(&mut self, e: &Expr, limit: usize) -> Result<Vec<usize>, EvalError> {
        match e {
            Expr::Colon => Ok((0..limit).collect()),
            _ => self.subscripts(e, Some(limit)),
        }
    }

    fn subscripts(&mut self, e: &Expr, limit: Option<usize>) -> Result<Vec<usize>, EvalError> {
        let value = self.eval(e)?;
        let positions = builtins::index_values(&value)?;
        if let Some(limit) = limit {
            if positions.iter().any(|&p| p >= limit) {
                return Err(EvalError::Index);
            }
        }
        Ok(positions)
    }

    fn matrix(&mut self, rows: &[Vec<Expr>]) -> Result<EngineArray, EvalError> {
        let mut evaluated = Vec::with_capacity(rows.len());
        for row in rows {
            let values = row
                .iter()
                .map(|e| self.eval(e))
                .collect::<Result<Vec<_>, _>>()?;
            evaluated.push(values);
        }

        if evaluated.iter().flatten().any(EngineArray::is_char) {
            return text_matrix(&evaluated);
        }
        let blocks = evaluated
            .iter()
            .map(|row| {
                let row = row
                    .iter()
                    .map(Numeric::from_array)
                    .collect::<Result<Vec<_>, _>>()?;
                Numeric::hcat(row)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Numeric::vcat(blocks)?.into_array(false))
    }
}

fn one_arg<'v>(name: &str, values: &'v [EngineArray]) -> Result<&'v EngineArray, EvalError> {
    match values {
        [value] => Ok(value),
        _ => Err(EvalError::Message(format!(
            "Wrong number of arguments to {}.",
            name
        ))),
    }
}

fn text_matrix(rows: &[Vec<EngineArray>]) -> Result<EngineArray, EvalError> {
    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let mut line = String::new();
        for value in row {
            let text = value.as_text().ok_or_else(|| {
                EvalError::Message("Text and numbers cannot be concatenated.".into())
            })?;
            line.push_str(&text);
        }
        lines.push(line);
    }
    let width = lines.first().map(|l| l.chars().count());
    if lines.iter().any(|l| Some(l.chars().count()) != width) {
        return Err(EvalError::Concatenation);
    }
    Ok(EngineArray::from_strings(&lines))
}

/// Match `text` against a pattern in which `*` stands for any run of
/// characters.
pub(super) fn wildcard_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == text;
    }
    let first = parts[0];
    let last = parts[parts.len() - 1];
    if text.len() < first.len() + last.len() || !text.starts_with(first) || !text.ends_with(last)
    {
        return false;
    }
    let mut rest = &text[first.len()..text.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(k) => rest = &rest[k + part.len()..],
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("LS_*", "LS_A"));
        assert!(wildcard_match("LS_*", "LS_"));
        assert!(!wildcard_match("LS_*", "xLS_A"));
        assert!(wildcard_match("a*c*e", "abcde"));
        assert!(!wildcard_match("a*c*e", "abde"));
        assert!(wildcard_match("name", "name"));
        assert!(!wildcard_match("name", "names"));
    }
}
