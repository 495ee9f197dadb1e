use super::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Tok {
    Ident(String),
    Num(f64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Newline,
    Assign,
    Colon,
    Plus,
    Minus,
    Star,
    Backslash,
}

/// A token plus whether whitespace preceded it.  Spacing matters inside
/// matrix literals, where `[1 -2]` has two elements and `[1 - 2]` one.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub tok: Tok,
    pub spaced: bool,
}

pub(super) fn tokenize(src: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut spaced = false;

    while pos < chars.len() {
        let c = chars[pos];
        let tok = match c {
            ' ' | '\t' | '\r' => {
                spaced = true;
                pos += 1;
                continue;
            }
            '%' => {
                while pos < chars.len() && chars[pos] != '\n' {
                    pos += 1;
                }
                continue;
            }
            '.' if chars.get(pos + 1) == Some(&'.') && chars.get(pos + 2) == Some(&'.') => {
                // continuation: skip to the start of the next line
                while pos < chars.len() && chars[pos] != '\n' {
                    pos += 1;
                }
                pos += 1;
                spaced = true;
                continue;
            }
            '\n' => {
                pos += 1;
                Tok::Newline
            }
            '(' => {
                pos += 1;
                Tok::LParen
            }
            ')' => {
                pos += 1;
                Tok::RParen
            }
            '[' => {
                pos += 1;
                Tok::LBracket
            }
            ']' => {
                pos += 1;
                Tok::RBracket
            }
            ',' => {
                pos += 1;
                Tok::Comma
            }
            ';' => {
                pos += 1;
                Tok::Semi
            }
            ':' => {
                pos += 1;
                Tok::Colon
            }
            '+' => {
                pos += 1;
                Tok::Plus
            }
            '-' => {
                pos += 1;
                Tok::Minus
            }
            '*' => {
                pos += 1;
                Tok::Star
            }
            '\\' => {
                pos += 1;
                Tok::Backslash
            }
            '=' => {
                if chars.get(pos + 1) == Some(&'=') {
                    return Err(EvalError::Syntax("'==' is not supported".into()));
                }
                pos += 1;
                Tok::Assign
            }
            '\'' => {
                let (text, next) = lex_string(&chars, pos + 1)?;
                pos = next;
                Tok::Str(text)
            }
            c if c.is_ascii_digit() || c == '.' => {
                let (value, next) = lex_number(&chars, pos)?;
                pos = next;
                Tok::Num(value)
            }
            c if c.is_ascii_alphabetic() => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_')
                {
                    pos += 1;
                }
                Tok::Ident(chars[start..pos].iter().collect())
            }
            other => {
                return Err(EvalError::Syntax(format!(
                    "Invalid character '{}' in expression",
                    other
                )));
            }
        };
        tokens.push(Token { tok, spaced });
        spaced = false;
    }
    Ok(tokens)
}

// string literal body starting after the opening quote; '' is an escaped quote
fn lex_string(chars: &[char], mut pos: usize) -> Result<(String, usize), EvalError> {
    let mut text = String::new();
    loop {
        match chars.get(pos) {
            None | Some('\n') => {
                return Err(EvalError::Syntax("String is not terminated properly".into()));
            }
            Some('\'') if chars.get(pos + 1) == Some(&'\'') => {
                text.push('\'');
                pos += 2;
            }
            Some('\'') => return Ok((text, pos + 1)),
            Some(&c) => {
                text.push(c);
                pos += 1;
            }
        }
    }
}

fn lex_number(chars: &[char], mut pos: usize) -> Result<(f64, usize), EvalError> {
    let start = pos;
    while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
        pos += 1;
    }
    if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
        let mut exp = pos + 1;
        if exp < chars.len() && (chars[exp] == '+' || chars[exp] == '-') {
            exp += 1;
        }
        if exp < chars.len() && chars[exp].is_ascii_digit() {
            pos = exp;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }
    let text: String = chars[start..pos].iter().collect();
    text.parse::<f64>()
        .map(|v| (v, pos))
        .map_err(|_| EvalError::Syntax(format!("Invalid number '{}'", text)))
}
