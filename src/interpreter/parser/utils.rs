use std::iter::Peekable;

use crate::{
    ast::Argument,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, parse_expression},
    },
};

/// Drops line breaks that appear inside `(...)` and `[...]`.
///
/// Within parentheses and brackets an expression may span several lines;
/// inside braces (even when nested in parentheses) line breaks separate
/// expressions again.
#[must_use]
pub fn strip_grouped_newlines(tokens: Vec<(Token, usize)>) -> Vec<(Token, usize)> {
    let mut in_braces = Vec::new();
    let mut out = Vec::with_capacity(tokens.len());
    for (token, line) in tokens {
        match token {
            Token::LParen | Token::LBracket => in_braces.push(false),
            Token::DoubleLBracket => {
                in_braces.push(false);
                in_braces.push(false);
            },
            Token::LBrace => in_braces.push(true),
            Token::RParen | Token::RBracket | Token::RBrace => {
                in_braces.pop();
            },
            Token::NewLine if in_braces.last() == Some(&false) => continue,
            _ => {},
        }
        out.push((token, line));
    }
    out
}

/// Skips any number of line breaks.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    while tokens.next_if(|(t, _)| *t == Token::NewLine).is_some() {}
}

/// Consumes the next token, which must equal `expected`, and returns its
/// line.
///
/// # Errors
/// [`ParseError::ExpectedDelimiter`] naming `display` when another token
/// follows, [`ParseError::UnexpectedEndOfInput`] at the end of input.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                     expected: &Token,
                                                     display: &'static str)
                                                     -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((tok, line)) if tok == expected => Ok(*line),
        Some((_, line)) => Err(ParseError::ExpectedDelimiter { expected: display,
                                                               line:     *line, }),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses the arguments of a call or index expression up to and including
/// `closing`.
///
/// Arguments are separated by commas and may be empty (`x[1, ]`) or named
/// (`f(n = 2)`, `list("a b" = 1)`). An immediately closing list has no
/// arguments; a trailing comma adds one empty argument.
///
/// Grammar:
/// ```text
///     arguments := ε | argument ("," argument)*
///     argument  := ε | (name "=")? expression?
/// ```
///
/// # Errors
/// A `ParseError` when an argument fails to parse or the list is not
/// terminated by `closing`.
pub(in crate::interpreter::parser) fn parse_arguments<'a, I>(tokens: &mut Peekable<I>,
                                                              closing: &Token,
                                                              display: &'static str)
                                                              -> ParseResult<Vec<Argument>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut arguments = Vec::new();
    if tokens.next_if(|(t, _)| t == closing).is_some() {
        return Ok(arguments);
    }
    loop {
        let at_separator = matches!(tokens.peek(), Some((t, _)) if *t == Token::Comma || t == closing);
        arguments.push(if at_separator {
                           Argument { name: None, value: None }
                       } else {
                           parse_argument(tokens, closing)?
                       });
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((_, line)) => {
                return Err(ParseError::ExpectedDelimiter { expected: display,
                                                           line:     *line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
        }
    }
    Ok(arguments)
}

fn parse_argument<'a, I>(tokens: &mut Peekable<I>, closing: &Token) -> ParseResult<Argument>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    let name = match lookahead.next() {
        Some((Token::Identifier(name) | Token::Str(name), _)) => Some(name.clone()),
        Some((Token::Null, _)) => Some("NULL".to_string()),
        _ => None,
    };
    if let Some(name) = name
       && let Some((Token::Equals, _)) = lookahead.peek()
    {
        tokens.next();
        tokens.next();
        let value = match tokens.peek() {
            Some((t, _)) if *t == Token::Comma || t == closing => None,
            _ => Some(parse_expression(tokens)?),
        };
        return Ok(Argument { name: Some(name), value });
    }
    Ok(Argument { name:  None,
                  value: Some(parse_expression(tokens)?), })
}

/// Parses a name after `$` or `@`: an identifier, a backquoted name or a
/// string.
///
/// # Errors
/// [`ParseError::UnexpectedToken`] for anything else.
pub(in crate::interpreter::parser) fn parse_field_name<'a, I>(tokens: &mut Peekable<I>)
                                                               -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Identifier(name) | Token::Str(name), _)) => Ok(name.clone()),
        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}
