//! Lexer/tokenizer for the filter language.

use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_while};

use super::ast::OperatorTag;
use crate::error::GrammarSyntaxError;

/// Token types for the grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Str(String),                // "..." (property name or string literal)
    Number(serde_json::Number), // JSON number
    Bool(bool),                 // true | false

    // Operators
    Op(OperatorTag),

    // Join words
    And,
    Or,

    // Punctuation
    LParen,
    RParen,

    /// Any other bare word; only valid as an error report.
    Word(String),

    // End of input
    Eof,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Str(s) => format!("string {}", serde_json::Value::String(s.clone())),
            Token::Number(n) => format!("number {}", n),
            Token::Bool(b) => format!("boolean {}", b),
            Token::Op(op) => format!("operator `{}`", op),
            Token::And => "`and`".to_string(),
            Token::Or => "`or`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::Word(w) => format!("`{}`", w),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

// Manually define PResult for resilience against winnow version changes
type PResult<T> = Result<T, ErrMode<ContextError>>;

fn skip_whitespace(input: &mut &str) -> PResult<()> {
    multispace0.void().parse_next(input)
}

/// Lex a double-quoted JSON string, escapes included.
fn lex_string(input: &mut &str) -> PResult<Token> {
    (
        '"',
        repeat::<_, _, (), _, _>(
            0..,
            alt((preceded('\\', any).void(), none_of(['"', '\\']).void())),
        ),
        '"',
    )
        .take()
        .try_map(|raw: &str| serde_json::from_str::<String>(raw))
        .map(Token::Str)
        .parse_next(input)
}

/// Lex a JSON number.
fn lex_number(input: &mut &str) -> PResult<Token> {
    (
        opt('-'),
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .try_map(|raw: &str| raw.parse::<serde_json::Number>())
        .map(Token::Number)
        .parse_next(input)
}

/// Lex a bare word: keyword, boolean literal or unknown word.
fn lex_word(input: &mut &str) -> PResult<Token> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .map(|word: &str| match word {
            "and" => Token::And,
            "or" => Token::Or,
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            "is" => Token::Op(OperatorTag::Is),
            "exists" => Token::Op(OperatorTag::Exists),
            "missing" => Token::Op(OperatorTag::Missing),
            "contain" | "contains" => Token::Op(OperatorTag::Contains),
            "notcontain" | "notcontains" => Token::Op(OperatorTag::NotContains),
            other => Token::Word(other.to_string()),
        })
        .parse_next(input)
}

/// Lex a single token.
fn lex_token(input: &mut &str) -> PResult<Token> {
    alt((
        // Multi-char operators first
        "==".value(Token::Op(OperatorTag::Eq)),
        "!=".value(Token::Op(OperatorTag::Ne)),
        "<=".value(Token::Op(OperatorTag::Lte)),
        ">=".value(Token::Op(OperatorTag::Gte)),
        "<".value(Token::Op(OperatorTag::Lt)),
        ">".value(Token::Op(OperatorTag::Gt)),
        "(".value(Token::LParen),
        ")".value(Token::RParen),
        lex_string,
        lex_number,
        lex_word,
    ))
    .parse_next(input)
}

/// Tokenize the entire input.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, GrammarSyntaxError> {
    let mut remaining = source;
    let mut tokens = Vec::new();

    loop {
        let _ = skip_whitespace(&mut remaining);
        let offset = source.len() - remaining.len();

        if remaining.is_empty() {
            tokens.push(Spanned {
                token: Token::Eof,
                offset,
            });
            return Ok(tokens);
        }

        match lex_token(&mut remaining) {
            Ok(token) => tokens.push(Spanned { token, offset }),
            Err(_) => {
                let rest = &source[offset..];
                let message = match rest.chars().next() {
                    Some('"') => "Unterminated or invalid string literal".to_string(),
                    Some(c) if c == '-' || c.is_ascii_digit() => {
                        "Invalid number literal".to_string()
                    }
                    Some(c) => format!("Unexpected character '{}'", c),
                    None => "Unexpected end of input".to_string(),
                };
                return Err(GrammarSyntaxError::at(source, offset, message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_simple_condition() {
        assert_eq!(
            kinds(r#""passenger_count" > 81"#),
            vec![
                Token::Str("passenger_count".into()),
                Token::Op(OperatorTag::Gt),
                Token::Number(81.into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize(r#"("a" exists)"#).unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 1, 5, 11, 12]);
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        assert_eq!(
            kinds(r#""a" is true andy"#),
            vec![
                Token::Str("a".into()),
                Token::Op(OperatorTag::Is),
                Token::Bool(true),
                Token::Word("andy".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""say \"hi\"\n""#),
            vec![Token::Str("say \"hi\"\n".into()), Token::Eof]
        );
    }

    #[test]
    fn test_contain_spellings() {
        assert_eq!(
            kinds("contain contains notcontain notcontains"),
            vec![
                Token::Op(OperatorTag::Contains),
                Token::Op(OperatorTag::Contains),
                Token::Op(OperatorTag::NotContains),
                Token::Op(OperatorTag::NotContains),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("-1.5e3 0"),
            vec![
                Token::Number("-1.5e3".parse().unwrap()),
                Token::Number(0.into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_leading_zero_is_rejected() {
        let err = tokenize(r#""a" == 01"#).unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.message, "Invalid number literal");
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(r#""a" == "oops"#).unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.column, 8);
    }

    #[test]
    fn test_bad_character() {
        let err = tokenize(r#""a" = 1"#).unwrap_err();
        assert_eq!(err.offset, 4);
        assert!(err.message.contains('='));
    }
}
