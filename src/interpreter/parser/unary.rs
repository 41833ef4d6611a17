use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Constant, Expr, FieldKind, IndexKind, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_not,
            block::parse_block,
            core::{ParseResult, parse_expression, parse_for, parse_function, parse_if, parse_while},
            utils::{expect, parse_arguments, parse_field_name, skip_newlines},
        },
    },
};

/// Parses a unary expression.
///
/// Supports the prefix operators `-` and `+`. They are right-associative and
/// bind looser than `^`, so `-2^2` is `-(2^2)`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "+") unary
///            | power
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, _)) => UnaryOperator::Minus,
        Some((Token::Plus, _)) => UnaryOperator::Plus,
        _ => return parse_power(tokens),
    };
    let line = tokens.next().map_or(0, |(_, line)| *line);
    let operand = parse_unary(tokens)?;
    Ok(Expr::Unary { op,
                     operand: Box::new(operand),
                     line })
}

/// Parses exponentiation, which is right-associative and accepts a signed
/// exponent: `2^-1` and `a^b^c` is `a^(b^c)`.
///
/// Grammar: `power := postfix ("^" unary)?`
fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let base = parse_primary(tokens)?;
    let base = parse_postfix(tokens, base)?;
    if let Some((Token::Caret, line)) = tokens.peek() {
        tokens.next();
        skip_newlines(tokens);
        let exponent = parse_unary(tokens)?;
        return Ok(Expr::Binary { left:  Box::new(base),
                                 op:    BinaryOperator::Pow,
                                 right: Box::new(exponent),
                                 line:  *line, });
    }
    Ok(base)
}

/// Applies postfix operators to an already parsed expression.
///
/// Handles calls `f(...)`, subsets `x[...]`, element access `x[[...]]` and
/// the field operators `x$name` and `x@name`, in any combination, left to
/// right.
///
/// Grammar:
/// ```text
///     postfix := primary ( "(" arguments ")"
///                        | "[" arguments "]"
///                        | "[[" arguments "]" "]"
///                        | "$" name
///                        | "@" name )*
/// ```
///
/// # Errors
/// A `ParseError` when an argument list or field name is malformed.
pub(crate) fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut expr: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    loop {
        let Some((token, line)) = tokens.peek() else {
            break;
        };
        let line = *line;
        expr = match token {
            Token::LParen => {
                tokens.next();
                let arguments = parse_arguments(tokens, &Token::RParen, ")")?;
                Expr::Call { function: Box::new(expr),
                             arguments,
                             line }
            },
            Token::LBracket => {
                tokens.next();
                let arguments = parse_arguments(tokens, &Token::RBracket, "]")?;
                Expr::Index { object: Box::new(expr),
                              arguments,
                              kind: IndexKind::Subset,
                              line }
            },
            Token::DoubleLBracket => {
                tokens.next();
                let arguments = parse_arguments(tokens, &Token::RBracket, "]]")?;
                expect(tokens, &Token::RBracket, "]]")?;
                Expr::Index { object: Box::new(expr),
                              arguments,
                              kind: IndexKind::Element,
                              line }
            },
            Token::Dollar | Token::At => {
                let kind = if *token == Token::Dollar {
                    FieldKind::Dollar
                } else {
                    FieldKind::Slot
                };
                tokens.next();
                let name = parse_field_name(tokens)?;
                Expr::Field { object: Box::new(expr),
                              name,
                              kind,
                              line }
            },
            _ => break,
        };
    }
    Ok(expr)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include
/// literals, identifiers, parenthesized expressions, blocks, function
/// definitions and the control-flow forms.
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | identifier
///              | "(" expression ")"
///              | "{" statements "}"
///              | "!" not
///              | function | if | for | while | repeat | break | next
/// ```
///
/// # Errors
/// [`ParseError::UnexpectedToken`] for a token that cannot start an
/// expression, [`ParseError::InvalidLiteral`] for an `L` literal that is not
/// a representable integer.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { line: 0 });
    };
    let line = *line;
    let constant = |value| Ok(Expr::Constant { value, line });

    match token {
        Token::Number(n) => constant(Constant::Double(Some(*n))),
        Token::Integer(n) => {
            let n = *n;
            if n.fract() == 0.0 && n > f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
                #[allow(clippy::cast_possible_truncation)]
                let i = n as i32;
                constant(Constant::Integer(Some(i)))
            } else {
                Err(ParseError::InvalidLiteral { literal: format!("{n}L"),
                                                 line })
            }
        },
        Token::Imaginary(n) => constant(Constant::Imaginary(*n)),
        Token::Str(s) => constant(Constant::Character(Some(s.clone()))),
        Token::True => constant(Constant::Logical(Some(true))),
        Token::False => constant(Constant::Logical(Some(false))),
        Token::Null => constant(Constant::Null),
        Token::Na => constant(Constant::Logical(None)),
        Token::NaInteger => constant(Constant::Integer(None)),
        Token::NaReal => constant(Constant::Double(None)),
        Token::NaCharacter => constant(Constant::Character(None)),
        Token::Inf => constant(Constant::Double(Some(f64::INFINITY))),
        Token::NaN => constant(Constant::Double(Some(f64::NAN))),
        Token::Identifier(name) => Ok(Expr::Symbol { name: name.clone(),
                                                     line }),
        Token::LParen => {
            let inner = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, ")")?;
            Ok(inner)
        },
        Token::LBrace => parse_block(tokens, line),
        Token::Bang => {
            let operand = parse_not(tokens)?;
            Ok(Expr::Unary { op: UnaryOperator::Not,
                             operand: Box::new(operand),
                             line })
        },
        Token::Function => parse_function(tokens, line),
        Token::If => parse_if(tokens, line),
        Token::For => parse_for(tokens, line),
        Token::While => parse_while(tokens, line),
        Token::Repeat => {
            skip_newlines(tokens);
            let body = parse_expression(tokens)?;
            Ok(Expr::Repeat { body: Box::new(body),
                              line })
        },
        Token::Break => Ok(Expr::Break { line }),
        Token::Next => Ok(Expr::Next { line }),
        tok => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                 line }),
    }
}
