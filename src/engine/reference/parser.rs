use super::lexer::{Tok, Token};
use super::EvalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BinOp {
    Add,
    Sub,
    Mul,
    LeftDiv,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expr {
    Num(f64),
    Str(String),
    /// a bare `:` subscript
    Colon,
    Var(String),
    /// `name(args)`: indexing if `name` is a variable, a call otherwise
    Call(String, Vec<Expr>),
    Matrix(Vec<Vec<Expr>>),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

/// left-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Target {
    pub name: String,
    pub index: Option<Vec<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum StmtKind {
    /// command-syntax `clear` with its word arguments
    Clear(Vec<String>),
    Assign(Vec<Target>, Expr),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Stmt {
    pub kind: StmtKind,
    /// false when the statement was terminated by `;`
    pub display: bool,
}

pub(super) fn parse_program(tokens: &[Token]) -> Result<Vec<Stmt>, EvalError> {
    let mut stmts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (k, token) in tokens.iter().enumerate() {
        match token.tok {
            Tok::LParen | Tok::LBracket => depth += 1,
            Tok::RParen | Tok::RBracket => {
                depth -= 1;
                if depth < 0 {
                    return Err(unbalanced());
                }
            }
            Tok::Semi | Tok::Comma | Tok::Newline if depth == 0 => {
                if k > start {
                    let display = token.tok != Tok::Semi;
                    stmts.push(parse_statement(&tokens[start..k], display)?);
                }
                start = k + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(unbalanced());
    }
    if start < tokens.len() {
        stmts.push(parse_statement(&tokens[start..], true)?);
    }
    Ok(stmts)
}

fn unbalanced() -> EvalError {
    EvalError::Syntax("Unbalanced or unexpected parenthesis or bracket.".into())
}

fn parse_statement(tokens: &[Token], display: bool) -> Result<Stmt, EvalError> {
    if let Tok::Ident(word) = &tokens[0].tok {
        if word == "clear" && is_command_syntax(&tokens[1..]) {
            return Ok(Stmt {
                kind: StmtKind::Clear(command_words(&tokens[1..])),
                display,
            });
        }
    }

    let kind = match top_level_assign(tokens) {
        Some(eq) => {
            let targets = parse_targets(&tokens[..eq])?;
            let mut parser = Parser::new(&tokens[eq + 1..]);
            let rhs = parser.parse_expr()?;
            parser.expect_end()?;
            StmtKind::Assign(targets, rhs)
        }
        None => {
            let mut parser = Parser::new(tokens);
            let expr = parser.parse_expr()?;
            parser.expect_end()?;
            StmtKind::Expr(expr)
        }
    };
    Ok(Stmt { kind, display })
}

fn is_command_syntax(rest: &[Token]) -> bool {
    rest.iter()
        .all(|t| matches!(t.tok, Tok::Ident(_) | Tok::Star))
}

// adjacent tokens form one word, so `LS_*` is a single pattern
fn command_words(rest: &[Token]) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for (k, token) in rest.iter().enumerate() {
        let text = match &token.tok {
            Tok::Ident(s) => s.as_str(),
            _ => "*",
        };
        if k > 0 && !token.spaced {
            if let Some(word) = words.last_mut() {
                word.push_str(text);
                continue;
            }
        }
        words.push(text.to_string());
    }
    words
}

fn top_level_assign(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0;
    for (k, token) in tokens.iter().enumerate() {
        match token.tok {
            Tok::LParen | Tok::LBracket => depth += 1,
            Tok::RParen | Tok::RBracket => depth -= 1,
            Tok::Assign if depth == 0 => return Some(k),
            _ => {}
        }
    }
    None
}

fn parse_targets(tokens: &[Token]) -> Result<Vec<Target>, EvalError> {
    let bracketed = matches!(tokens.first().map(|t| &t.tok), Some(Tok::LBracket))
        && matches!(tokens.last().map(|t| &t.tok), Some(Tok::RBracket));
    if !bracketed {
        return Ok(vec![parse_target(tokens)?]);
    }

    let inner = &tokens[1..tokens.len() - 1];
    let mut targets = Vec::new();
    let mut depth = 0;
    let mut start = 0;
    for (k, token) in inner.iter().enumerate() {
        match token.tok {
            Tok::LParen => depth += 1,
            Tok::RParen => depth -= 1,
            Tok::Comma if depth == 0 => {
                targets.push(parse_target(&inner[start..k])?);
                start = k + 1;
            }
            _ => {}
        }
    }
    targets.push(parse_target(&inner[start..])?);
    Ok(targets)
}

fn parse_target(tokens: &[Token]) -> Result<Target, EvalError> {
    let mut parser = Parser::new(tokens);
    let name = match parser.next() {
        Some(Tok::Ident(name)) => name,
        _ => {
            return Err(EvalError::Syntax(
                "The expression to the left of the equals sign is not a valid target for an assignment."
                    .into(),
            ))
        }
    };
    let index = match parser.peek() {
        Some(Tok::LParen) => {
            parser.pos += 1;
            Some(parser.parse_args()?)
        }
        _ => None,
    };
    parser.expect_end()?;
    Ok(Target { name, index })
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    in_matrix: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            in_matrix: false,
        }
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).map(|t| t.tok.clone());
        self.pos += 1;
        tok
    }

    fn expect(&mut self, want: Tok) -> Result<(), EvalError> {
        match self.next() {
            Some(ref tok) if *tok == want => Ok(()),
            _ => Err(unbalanced()),
        }
    }

    fn expect_end(&self) -> Result<(), EvalError> {
        match self.peek() {
            None => Ok(()),
            Some(tok) => Err(EvalError::Syntax(format!(
                "Unexpected {:?} in expression",
                tok
            ))),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Plus) => BinOp::Add,
                Some(Tok::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            if self.in_matrix && self.starts_new_element() {
                return Ok(lhs);
            }
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    // in `[a -b]` the sign binds to `b` and starts a new element
    fn starts_new_element(&self) -> bool {
        match (self.peek_token(0), self.peek_token(1)) {
            (Some(op), Some(next)) => op.spaced && !next.spaced,
            _ => false,
        }
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Star) => BinOp::Mul,
                Some(Tok::Backslash) => BinOp::LeftDiv,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Tok::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Tok::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.next() {
            Some(Tok::Num(v)) => Ok(Expr::Num(v)),
            Some(Tok::Str(s)) => Ok(Expr::Str(s)),
            Some(Tok::Colon) => Ok(Expr::Colon),
            Some(Tok::Ident(name)) => {
                let call = match self.peek_token(0) {
                    Some(t) => t.tok == Tok::LParen && !(self.in_matrix && t.spaced),
                    None => false,
                };
                if call {
                    self.pos += 1;
                    let args = self.parse_args()?;
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Tok::LParen) => {
                let saved = std::mem::replace(&mut self.in_matrix, false);
                let expr = self.parse_expr()?;
                self.in_matrix = saved;
                self.expect(Tok::RParen)?;
                Ok(expr)
            }
            Some(Tok::LBracket) => self.parse_matrix(),
            Some(tok) => Err(EvalError::Syntax(format!(
                "Unexpected {:?} in expression",
                tok
            ))),
            None => Err(EvalError::Syntax("Expression is incomplete.".into())),
        }
    }

    // argument list after an opening parenthesis, through the closing one
    fn parse_args(&mut self) -> Result<Vec<Expr>, EvalError> {
        let saved = std::mem::replace(&mut self.in_matrix, false);
        let mut args = Vec::new();
        if self.peek() == Some(&Tok::RParen) {
            self.pos += 1;
            self.in_matrix = saved;
            return Ok(args);
        }
        loop {
            let bare_colon = self.peek() == Some(&Tok::Colon)
                && matches!(
                    self.peek_token(1).map(|t| &t.tok),
                    Some(Tok::Comma) | Some(Tok::RParen)
                );
            if bare_colon {
                self.pos += 1;
                args.push(Expr::Colon);
            } else {
                args.push(self.parse_expr()?);
            }
            match self.next() {
                Some(Tok::Comma) => continue,
                Some(Tok::RParen) => break,
                _ => return Err(unbalanced()),
            }
        }
        self.in_matrix = saved;
        Ok(args)
    }

    fn parse_matrix(&mut self) -> Result<Expr, EvalError> {
        let saved = std::mem::replace(&mut self.in_matrix, true);
        let mut rows = Vec::new();
        let mut row = Vec::new();
        loop {
            match self.peek() {
                Some(Tok::RBracket) => {
                    self.pos += 1;
                    break;
                }
                Some(Tok::Semi) | Some(Tok::Newline) => {
                    self.pos += 1;
                    if !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                    }
                }
                Some(Tok::Comma) => self.pos += 1,
                Some(_) => row.push(self.parse_expr()?),
                None => return Err(unbalanced()),
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
        self.in_matrix = saved;
        Ok(Expr::Matrix(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parse(src: &str) -> Vec<Stmt> {
        parse_program(&tokenize(src).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_clear_pattern() {
        let stmts = parse("clear LS_*; clear functions;");
        assert_eq!(stmts[0].kind, StmtKind::Clear(vec!["LS_*".into()]));
        assert_eq!(stmts[1].kind, StmtKind::Clear(vec!["functions".into()]));
        assert!(!stmts[0].display);
    }

    #[test]
    fn test_parse_multi_assign() {
        let stmts = parse("[t(:, 1), t(:, 2), t(:, 3)] = find(A);");
        match &stmts[0].kind {
            StmtKind::Assign(targets, Expr::Call(f, args)) => {
                assert_eq!(targets.len(), 3);
                assert_eq!(targets[2].index, Some(vec![Expr::Colon, Expr::Num(3.0)]));
                assert_eq!(f, "find");
                assert_eq!(args, &vec![Expr::Var("A".into())]);
            }
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_parse_matrix_elements() {
        let stmts = parse("x = [1 -2; 3 - 4, 5]");
        match &stmts[0].kind {
            StmtKind::Assign(_, Expr::Matrix(rows)) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].len(), 2);
                assert_eq!(rows[1].len(), 2);
            }
            other => panic!("unexpected statement {:?}", other),
        }
        assert!(stmts[0].display);
    }

    #[test]
    fn test_parse_precedence() {
        let stmts = parse("y = 1 + 2 * 3");
        match &stmts[0].kind {
            StmtKind::Assign(_, Expr::Binary(BinOp::Add, _, rhs)) => {
                assert!(matches!(**rhs, Expr::Binary(BinOp::Mul, _, _)));
            }
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        for src in ["x = (1", "x = 1)", "3 = x", "x = 1 2"] {
            assert!(parse_program(&tokenize(src).unwrap()).is_err(), "{}", src);
        }
    }
}
