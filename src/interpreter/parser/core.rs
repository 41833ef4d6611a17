use std::iter::Peekable;

use crate::{
    ast::{Expr, Parameter},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_or,
            utils::{expect, skip_newlines},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Entry point for one expression. Starts at `=`, the loosest binding
/// level, and descends through the precedence table.
///
/// Grammar:
/// ```text
///     expression   := left_assign ("=" expression)?
///     left_assign  := right_assign (("<-" | "<<-") left_assign)?
///     right_assign := or (("->" | "->>") or)*
/// ```
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let target = parse_left_assign(tokens)?;
    if let Some((Token::Equals, line)) = tokens.peek() {
        tokens.next();
        skip_newlines(tokens);
        let value = parse_expression(tokens)?;
        return Ok(Expr::Assign { target:      Box::new(target),
                                 value:       Box::new(value),
                                 superassign: false,
                                 line:        *line, });
    }
    Ok(target)
}

fn parse_left_assign<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let target = parse_right_assign(tokens)?;
    match tokens.peek() {
        Some((token @ (Token::LeftAssign | Token::SuperAssign), line)) => {
            tokens.next();
            skip_newlines(tokens);
            let value = parse_left_assign(tokens)?;
            Ok(Expr::Assign { target:      Box::new(target),
                              value:       Box::new(value),
                              superassign: *token == Token::SuperAssign,
                              line:        *line, })
        },
        _ => Ok(target),
    }
}

fn parse_right_assign<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut value = parse_or(tokens)?;
    while let Some((token @ (Token::RightAssign | Token::RightSuperAssign), line)) = tokens.peek() {
        tokens.next();
        skip_newlines(tokens);
        let target = parse_or(tokens)?;
        value = Expr::Assign { target:      Box::new(target),
                               value:       Box::new(value),
                               superassign: *token == Token::RightSuperAssign,
                               line:        *line, };
    }
    Ok(value)
}

/// Parses an `if` expression with an optional `else` branch.
///
/// Syntax:
/// ```text
///     if (<condition>) <expr>
///     if (<condition>) <expr> else <expr>
/// ```
/// The `else` keyword may start a new line.
///
/// # Errors
/// `ExpectedDelimiter` when the condition lacks its parentheses.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen, "(")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, ")")?;
    skip_newlines(tokens);
    let then_branch = parse_expression(tokens)?;

    let mut lookahead = tokens.clone();
    skip_newlines(&mut lookahead);
    let else_branch = if let Some((Token::Else, _)) = lookahead.peek() {
        skip_newlines(tokens);
        tokens.next();
        skip_newlines(tokens);
        Some(Box::new(parse_expression(tokens)?))
    } else {
        None
    };

    Ok(Expr::If { condition: Box::new(condition),
                  then_branch: Box::new(then_branch),
                  else_branch,
                  line })
}

/// Parses `for (var in sequence) body`.
///
/// # Errors
/// A `ParseError` when the header is malformed or a sub-expression fails.
pub fn parse_for<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen, "(")?;
    let variable = match tokens.next() {
        Some((Token::Identifier(name), _)) => name.clone(),
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    };
    expect(tokens, &Token::In, "in")?;
    let sequence = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, ")")?;
    skip_newlines(tokens);
    let body = parse_expression(tokens)?;
    Ok(Expr::For { variable,
                   sequence: Box::new(sequence),
                   body: Box::new(body),
                   line })
}

/// Parses `while (condition) body`.
///
/// # Errors
/// A `ParseError` when the header is malformed or a sub-expression fails.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen, "(")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, ")")?;
    skip_newlines(tokens);
    let body = parse_expression(tokens)?;
    Ok(Expr::While { condition: Box::new(condition),
                     body: Box::new(body),
                     line })
}

/// Parses `function(parameters) body`.
///
/// Each parameter is a name with an optional `= default`; `...` is an
/// ordinary name here.
///
/// Grammar:
/// ```text
///     function   := "function" "(" (parameter ("," parameter)*)? ")" expression
///     parameter  := identifier ("=" expression)?
/// ```
///
/// # Errors
/// - [`ParseError::RepeatedFormal`] when a name appears twice.
/// - Any error from parsing defaults or the body.
pub fn parse_function<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen, "(")?;
    let mut parameters: Vec<Parameter> = Vec::new();
    if tokens.next_if(|(t, _)| *t == Token::RParen).is_none() {
        loop {
            let name = match tokens.next() {
                Some((Token::Identifier(name), _)) => name.clone(),
                Some((tok, line)) => {
                    return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                             line:  *line, });
                },
                None => return Err(ParseError::UnexpectedEndOfInput { line }),
            };
            if parameters.iter().any(|p| p.name == name) {
                return Err(ParseError::RepeatedFormal { name, line });
            }
            let default = if tokens.next_if(|(t, _)| *t == Token::Equals).is_some() {
                Some(parse_expression(tokens)?)
            } else {
                None
            };
            parameters.push(Parameter { name, default });
            match tokens.next() {
                Some((Token::Comma, _)) => {},
                Some((Token::RParen, _)) => break,
                Some((_, line)) => {
                    return Err(ParseError::ExpectedDelimiter { expected: ")",
                                                               line:     *line, });
                },
                None => return Err(ParseError::UnexpectedEndOfInput { line }),
            }
        }
    }
    skip_newlines(tokens);
    let body = parse_expression(tokens)?;
    Ok(Expr::Function { parameters,
                        body: Box::new(body),
                        line })
}
