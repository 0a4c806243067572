//! Selection expressions.
//!
//! A selection string picks slices of an array by name or index and says
//! which of them are added together:
//!
//! ```text
//! tree      := selection ((',')? selection)*
//! selection := atom ('+' atom)*
//! atom      := word (':' word)?
//! word      := [A-Za-z0-9_.]+
//! ```
//!
//! `"1 2"` and `"1, 2"` are two selections, `"1 + 2"` is one selection
//! summing two atoms and `"1:3"` is an inclusive range.
//!
//! ```
//! use vaspout::select::Tree;
//!
//! let tree = Tree::parse("Sr + Ti, 1:3").unwrap();
//! let labels: Vec<String> = tree.selections().iter().map(|s| s.to_string()).collect();
//! assert_eq!(labels, ["Sr+Ti", "1:3"]);
//! ```

use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter;

use crate::error::Error;

/// One name or index, or an inclusive range of two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    Single(String),
    Range(String, String),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Single(name) => f.write_str(name),
            Atom::Range(start, end) => write!(f, "{start}:{end}"),
        }
    }
}

/// Atoms that are summed into one result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    atoms: Vec<Atom>,
}

impl Selection {
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}

/// A parsed selection expression: independent selections in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    selections: Vec<Selection>,
}

impl Tree {
    /// Parse `expression`. A blank expression gives an empty tree.
    pub fn parse(expression: &str) -> Result<Self, Error> {
        let mut tokens = tokenize(expression)?.into_iter().peekable();
        let mut selections = Vec::new();
        while tokens.peek().is_some() {
            selections.push(parse_selection(&mut tokens)?);
            if tokens.peek() == Some(&Token::Comma) {
                tokens.next();
                if tokens.peek().is_none() {
                    return Err(syntax(",", "expression ends after `,`"));
                }
            }
        }
        Ok(Self { selections })
    }

    /// Parse `expression`, falling back to `default` when it is blank.
    pub fn parse_or(expression: &str, default: &str) -> Result<Self, Error> {
        let tree = Self::parse(expression)?;
        if tree.is_empty() {
            Self::parse(default)
        } else {
            Ok(tree)
        }
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selection) in self.selections.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selection}")?;
        }
        Ok(())
    }
}

// ---- Lexer ----

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Plus,
    Colon,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Plus => f.write_str("+"),
            Token::Colon => f.write_str(":"),
            Token::Comma => f.write_str(","),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '+' | ':' | ',')
}

fn tokenize(expression: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut chars = expression.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            ':' => {
                chars.next();
                tokens.push(Token::Colon);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            c if is_word_char(c) => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if !is_word_char(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Word(expression[start..end].to_string()));
            }
            other => {
                // Name the whole word the character sits in.
                let begin = expression[..start]
                    .char_indices()
                    .rev()
                    .find(|&(_, c)| is_separator(c))
                    .map_or(0, |(i, c)| i + c.len_utf8());
                let end = expression[start..]
                    .find(is_separator)
                    .map_or(expression.len(), |offset| start + offset);
                return Err(syntax(
                    &expression[begin..end],
                    &format!("unexpected character `{other}` in `{expression}`"),
                ));
            }
        }
    }
    Ok(tokens)
}

// ---- Parser ----

type Tokens = Peekable<IntoIter<Token>>;

fn parse_selection(tokens: &mut Tokens) -> Result<Selection, Error> {
    let mut atoms = vec![parse_atom(tokens)?];
    while tokens.peek() == Some(&Token::Plus) {
        tokens.next();
        atoms.push(parse_atom(tokens)?);
    }
    Ok(Selection { atoms })
}

fn parse_atom(tokens: &mut Tokens) -> Result<Atom, Error> {
    let start = expect_word(tokens)?;
    if tokens.peek() != Some(&Token::Colon) {
        return Ok(Atom::Single(start));
    }
    tokens.next();
    let end = expect_word(tokens).map_err(|_| syntax(&format!("{start}:"), "range needs an end"))?;
    Ok(Atom::Range(start, end))
}

fn expect_word(tokens: &mut Tokens) -> Result<String, Error> {
    match tokens.next() {
        Some(Token::Word(word)) => Ok(word),
        Some(other) => Err(syntax(&other.to_string(), "expected a name or an index")),
        None => Err(syntax("", "expression ends where a name or an index is expected")),
    }
}

fn syntax(atom: &str, reason: &str) -> Error {
    Error::Selection {
        atom: atom.to_string(),
        reason: reason.to_string(),
    }
}
