use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, statement::parse_statements},
    },
};

/// `{ statements }`. Called with the opening brace already consumed;
/// statements are split by newlines or `;`.
///
/// # Errors
/// [`ParseError::ExpectedDelimiter`] when the input ends before `}`.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let expressions = parse_statements(tokens, Some(&Token::RBrace))?;
    if tokens.next_if(|(t, _)| *t == Token::RBrace).is_none() {
        return Err(ParseError::ExpectedDelimiter { expected: "}",
                                                   line });
    }
    Ok(Expr::Block { expressions, line })
}
