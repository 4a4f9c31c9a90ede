//! Parser for the filter language.
//!
//! Grammar (in rough EBNF):
//!
//! expression = group EOF
//! group      = term (join term)*        ; one join word per group
//! term       = "(" group ")" | condition
//! condition  = STRING operator literal?
//! operator   = "==" | "!=" | "<" | "<=" | ">" | ">=" | "is"
//!            | "exists" | "missing" | "contain" | "notcontain"
//! literal    = STRING | NUMBER | "true" | "false"
//! join       = "and" | "or"
//!
//! Mixing `and` with `or` requires parentheses. `exists` and `missing` take
//! no literal; every other operator requires one.

use super::ast::{Condition, Expr, Group, Join, Literal};
use super::lexer::{Spanned, Token, tokenize};
use crate::error::GrammarSyntaxError;

type ParseResult<T> = Result<T, GrammarSyntaxError>;

/// Deepest parenthesis nesting accepted.
pub const MAX_NESTING: usize = 256;

/// Parser state.
struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Spanned>) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.offset)
            .unwrap_or(self.source.len())
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        self.pos += 1;
        tok
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> GrammarSyntaxError {
        GrammarSyntaxError::at(self.source, offset, message)
    }

    fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let offset = self.offset();
        let tok = self.advance();
        if tok == expected {
            Ok(())
        } else {
            Err(self.error(
                offset,
                format!("Expected {}, got {}", expected.describe(), tok.describe()),
            ))
        }
    }

    /// Parse the whole input.
    fn parse_expression(&mut self) -> ParseResult<Expr> {
        let (join, mut children) = self.parse_group()?;
        self.expect(Token::Eof)?;

        // A lone term stays a lone term; only real joins build a group here
        match join {
            None if children.len() == 1 => Ok(children.remove(0)),
            join => Ok(Expr::Group(Group {
                join: join.unwrap_or(Join::And),
                children,
            })),
        }
    }

    /// Parse a group: term (join term)*
    fn parse_group(&mut self) -> ParseResult<(Option<Join>, Vec<Expr>)> {
        let mut children = vec![self.parse_term()?];
        let mut join: Option<Join> = None;

        loop {
            let next = match self.peek() {
                Token::And => Join::And,
                Token::Or => Join::Or,
                _ => break,
            };

            if let Some(current) = join {
                if current != next {
                    return Err(self.error(
                        self.offset(),
                        format!(
                            "Cannot mix `{}` with `{}` in one group; wrap the sub-expression in parentheses",
                            next, current
                        ),
                    ));
                }
            }
            join = Some(next);

            self.advance(); // consume join word
            children.push(self.parse_term()?);
        }

        Ok((join, children))
    }

    /// Parse a term: "(" group ")" | condition
    fn parse_term(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Token::LParen => {
                if self.depth >= MAX_NESTING {
                    return Err(self.error(
                        self.offset(),
                        format!("Expression nested too deeply (limit {})", MAX_NESTING),
                    ));
                }
                self.advance(); // consume (
                self.depth += 1;
                let (join, children) = self.parse_group()?;
                self.depth -= 1;
                self.expect(Token::RParen)?;
                Ok(Expr::Group(Group {
                    join: join.unwrap_or(Join::And),
                    children,
                }))
            }
            Token::Str(_) => self.parse_condition().map(Expr::Condition),
            other => Err(self.error(
                self.offset(),
                format!(
                    "Expected a quoted property or `(`, got {}",
                    other.describe()
                ),
            )),
        }
    }

    /// Parse a condition: STRING operator literal?
    fn parse_condition(&mut self) -> ParseResult<Condition> {
        let prop_offset = self.offset();
        let property = match self.advance() {
            Token::Str(p) => p,
            other => {
                return Err(self.error(
                    prop_offset,
                    format!("Expected a quoted property, got {}", other.describe()),
                ));
            }
        };
        if property.is_empty() {
            return Err(self.error(prop_offset, "Property name cannot be empty"));
        }

        let op_offset = self.offset();
        let operator = match self.advance() {
            Token::Op(op) => op,
            other => {
                return Err(self.error(
                    op_offset,
                    format!(
                        "Expected an operator after \"{}\", got {}",
                        property,
                        other.describe()
                    ),
                ));
            }
        };

        let value_offset = self.offset();
        let literal_follows = matches!(
            self.peek(),
            Token::Str(_) | Token::Number(_) | Token::Bool(_)
        );
        let value = match (operator.takes_value(), literal_follows) {
            (true, true) => Some(self.parse_literal()?),
            (true, false) => {
                return Err(self.error(
                    value_offset,
                    format!(
                        "Operator `{}` requires a value, got {}",
                        operator,
                        self.peek().describe()
                    ),
                ));
            }
            (false, true) => {
                return Err(self.error(
                    value_offset,
                    format!("Operator `{}` does not take a value", operator),
                ));
            }
            (false, false) => None,
        };

        Ok(Condition {
            property,
            operator,
            value,
        })
    }

    /// Parse a literal: STRING | NUMBER | BOOLEAN
    fn parse_literal(&mut self) -> ParseResult<Literal> {
        let offset = self.offset();
        match self.advance() {
            Token::Str(s) => Ok(Literal::from_text(s)),
            Token::Number(n) => Ok(Literal::Number(n)),
            Token::Bool(b) => Ok(Literal::Bool(b)),
            other => Err(self.error(
                offset,
                format!("Expected a literal, got {}", other.describe()),
            )),
        }
    }
}

/// Parse expression text into an AST.
pub fn parse_expression(input: &str) -> Result<Expr, GrammarSyntaxError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(input, tokens);
    parser.parse_expression()
}
