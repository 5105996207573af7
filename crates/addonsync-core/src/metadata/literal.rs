//! Parser for the subset of Python literals that appear in `bl_info`
//!
//! Only literal syntax is accepted. Names other than `True`, `False` and
//! `None`, calls, and operators (apart from a leading sign on numbers) are
//! rejected, so nothing is ever evaluated.

use std::fmt;

/// A Python literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `'text'` or `"text"`, any quoting style
    Str(String),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// `True` / `False`
    Bool(bool),
    /// `None`
    None,
    /// `(a, b, ...)`
    Tuple(Vec<Value>),
    /// `[a, b, ...]`
    List(Vec<Value>),
    /// `{k: v, ...}` in source order
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// String contents, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer components, if this is a tuple or list of integers
    #[must_use]
    pub fn as_int_sequence(&self) -> Option<Vec<i64>> {
        match self {
            Self::Tuple(items) | Self::List(items) => items
                .iter()
                .map(|v| match v {
                    Self::Int(i) => Some(*i),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::None => write!(f, "None"),
            Self::Tuple(items) => {
                write!(f, "(")?;
                join(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Self::List(items) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
            Self::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Parse failure with the byte offset where it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the parsed text
    pub offset: usize,
    /// Description
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

/// Parse one literal starting at the beginning of `text`
///
/// Returns the value and the number of bytes consumed. Anything after the
/// literal is left alone, which lets callers parse a `{...}` block out of a
/// larger source file.
pub fn parse_prefix(text: &str) -> Result<(Value, usize), ParseError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    Ok((value, parser.pos))
}

/// Deepest allowed nesting of dicts, lists and tuples
const MAX_DEPTH: usize = 64;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn error<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError {
            offset: self.pos,
            message: message.into(),
        })
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace, newlines, line continuations and `#` comments
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('\\') if self.rest()[1..].starts_with(['\n', '\r']) => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => return,
            }
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => self.error(format!("expected '{want}', found '{c}'")),
            None => self.error(format!("expected '{want}', found end of input")),
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(open @ ('{' | '[' | '(')) => {
                if self.depth >= MAX_DEPTH {
                    return self.error("literal nested too deeply");
                }
                self.depth += 1;
                let value = match open {
                    '{' => self.dict(),
                    '[' => {
                        self.bump();
                        self.sequence(']').map(|(items, _)| Value::List(items))
                    }
                    _ => self.paren(),
                };
                self.depth -= 1;
                value
            }
            Some('"' | '\'') => self.strings(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.word(),
            Some(c) => self.error(format!("unexpected character '{c}'")),
            None => self.error("unexpected end of input"),
        }
    }

    fn dict(&mut self) -> Result<Value, ParseError> {
        self.expect('{')?;
        let mut pairs = Vec::new();

        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Dict(pairs));
            }

            let key = self.value()?;
            self.expect(':')?;
            let value = self.value()?;
            pairs.push((key, value));

            self.skip_trivia();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Value::Dict(pairs)),
                Some(c) => {
                    self.pos -= c.len_utf8();
                    return self.error(format!("expected ',' or '}}', found '{c}'"));
                }
                None => return self.error("unterminated dict"),
            }
        }
    }

    /// Items up to `close`; the flag reports whether any separating comma was seen
    fn sequence(&mut self, close: char) -> Result<(Vec<Value>, bool), ParseError> {
        let mut items = Vec::new();
        let mut saw_comma = false;

        loop {
            self.skip_trivia();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, saw_comma));
            }

            items.push(self.value()?);

            self.skip_trivia();
            match self.bump() {
                Some(',') => saw_comma = true,
                Some(c) if c == close => return Ok((items, saw_comma)),
                Some(c) => {
                    self.pos -= c.len_utf8();
                    return self.error(format!("expected ',' or '{close}', found '{c}'"));
                }
                None => return self.error(format!("missing '{close}'")),
            }
        }
    }

    fn paren(&mut self) -> Result<Value, ParseError> {
        self.expect('(')?;
        let (mut items, saw_comma) = self.sequence(')')?;

        // `(x)` is just x; `(x,)` and `()` are tuples
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Tuple(items))
    }

    fn word(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let word = &self.src[start..self.pos];

        match word {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::None),
            _ if matches!(self.peek(), Some('"' | '\''))
                && word.len() <= 2
                && word.chars().all(|c| "rRuUbB".contains(c)) =>
            {
                self.pos = start;
                self.strings()
            }
            _ => {
                self.pos = start;
                self.error(format!("'{word}' is not a literal"))
            }
        }
    }

    /// One or more adjacent string literals, concatenated
    fn strings(&mut self) -> Result<Value, ParseError> {
        let mut out = self.string()?;

        loop {
            let save = self.pos;
            self.skip_trivia();
            let next_is_string = match self.peek() {
                Some('"' | '\'') => true,
                Some(c) if "rRuUbB".contains(c) => {
                    let rest = self.rest();
                    let prefix_len = rest
                        .chars()
                        .take_while(|c| "rRuUbB".contains(*c))
                        .count();
                    prefix_len <= 2 && rest[prefix_len..].starts_with(['"', '\''])
                }
                _ => false,
            };

            if next_is_string {
                out.push_str(&self.string()?);
            } else {
                self.pos = save;
                return Ok(Value::Str(out));
            }
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let mut raw = false;
        while let Some(c) = self.peek() {
            if "rRuUbB".contains(c) {
                raw |= c == 'r' || c == 'R';
                self.bump();
            } else {
                break;
            }
        }

        let Some(quote) = self.bump() else {
            return self.error("unterminated string");
        };
        let triple = self.rest().starts_with(&format!("{quote}{quote}"));
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return self.error("unterminated string");
            };

            if c == quote {
                if !triple {
                    return Ok(out);
                }
                if self.rest().starts_with(&format!("{quote}{quote}")) {
                    self.pos += 2;
                    return Ok(out);
                }
                out.push(c);
                continue;
            }

            match c {
                '\n' if !triple => return self.error("newline in string"),
                '\\' if raw => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.escape(&mut out)?,
                _ => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let Some(c) = self.bump() else {
            return self.error("unterminated escape");
        };
        match c {
            '\n' => {}
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' | '\'' | '"' => out.push(c),
            'x' => self.hex_escape(2, out)?,
            'u' => self.hex_escape(4, out)?,
            'U' => self.hex_escape(8, out)?,
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, out: &mut String) -> Result<(), ParseError> {
        let rest = self.rest();
        let Some(hex) = rest.get(..digits) else {
            return self.error("truncated escape");
        };
        let decoded = u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => {
                out.push(ch);
                self.pos += digits;
                Ok(())
            }
            None => self.error(format!("invalid escape '{hex}'")),
        }
    }

    fn number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };
        self.skip_trivia();

        let digits_start = self.pos;
        while let Some(c) = self.peek() {
            let so_far = &self.src[digits_start..self.pos];
            let exponent_sign = matches!(c, '+' | '-')
                && so_far.ends_with(['e', 'E'])
                && !so_far.starts_with("0x")
                && !so_far.starts_with("0X");
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                self.bump();
            } else {
                break;
            }
        }
        let text: String = self.src[digits_start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();

        if text.is_empty() {
            self.pos = start;
            return self.error("expected a number");
        }

        let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            i64::from_str_radix(hex, 16).ok().map(Value::Int)
        } else if let Some(oct) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
            i64::from_str_radix(oct, 8).ok().map(Value::Int)
        } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
            i64::from_str_radix(bin, 2).ok().map(Value::Int)
        } else if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>().ok().map(Value::Float)
        } else {
            text.parse::<i64>().ok().map(Value::Int)
        };

        match parsed {
            Some(Value::Int(i)) if negative => Ok(Value::Int(-i)),
            Some(Value::Float(x)) if negative => Ok(Value::Float(-x)),
            Some(v) => Ok(v),
            None => {
                self.pos = start;
                self.error(format!("invalid number '{text}'"))
            }
        }
    }
}
