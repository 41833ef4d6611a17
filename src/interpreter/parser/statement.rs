use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, parse_expression},
    },
};

/// Parses a sequence of expressions separated by line breaks or `;`.
///
/// Stops, without consuming it, at `terminator`, or at the end of input when
/// `terminator` is `None`. Empty statements are skipped.
///
/// Grammar: `statements := (separator* expression (separator+ expression)*)? separator*`
///
/// # Errors
/// [`ParseError::UnexpectedToken`] when an expression is followed by
/// anything but a separator or the terminator.
pub fn parse_statements<'a, I>(tokens: &mut Peekable<I>,
                               terminator: Option<&Token>)
                               -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut expressions = Vec::new();
    loop {
        while tokens.next_if(|(t, _)| matches!(t, Token::NewLine | Token::Semicolon))
                    .is_some()
        {}
        match tokens.peek() {
            None => break,
            Some((tok, _)) if Some(tok) == terminator => break,
            _ => {},
        }
        expressions.push(parse_expression(tokens)?);
        match tokens.peek() {
            None | Some((Token::NewLine | Token::Semicolon, _)) => {},
            Some((tok, _)) if Some(tok) == terminator => {},
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                         line:  *line, });
            },
        }
    }
    Ok(expressions)
}

/// Parses a whole program: every top-level expression in order.
///
/// # Errors
/// Any `ParseError` raised by the expressions.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let program = parse_statements(tokens, None)?;
    if let Some((tok, line)) = tokens.next() {
        return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                 line:  *line, });
    }
    Ok(program)
}
