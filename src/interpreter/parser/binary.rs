use std::iter::Peekable;

use crate::{
    ast::{Argument, BinaryOperator, Expr, UnaryOperator},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary, utils::skip_newlines},
    },
};

/// Maps a token to its binary operator, if it is one.
///
/// `%op%` tokens other than `%%` and `%/%` are not operators here; they are
/// calls to the function of that name.
const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    Some(match token {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Sub,
        Token::Star => BinaryOperator::Mul,
        Token::Slash => BinaryOperator::Div,
        Token::Caret => BinaryOperator::Pow,
        Token::Colon => BinaryOperator::Range,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        Token::Less => BinaryOperator::Less,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::Greater => BinaryOperator::Greater,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::Ampersand => BinaryOperator::And,
        Token::Pipe => BinaryOperator::Or,
        Token::DoubleAmpersand => BinaryOperator::AndAnd,
        Token::DoublePipe => BinaryOperator::OrOr,
        _ => return None,
    })
}

/// Parses one left-associative precedence level.
///
/// `accepts` selects the operators of the level and `operand` parses the
/// next tighter level. A line break after an operator continues the
/// expression.
fn parse_left_assoc<'a, I>(tokens: &mut Peekable<I>,
                           accepts: fn(BinaryOperator) -> bool,
                           operand: fn(&mut Peekable<I>) -> ParseResult<Expr>)
                           -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = operand(tokens)?;
    while let Some((token, line)) = tokens.peek()
          && let Some(op) = token_to_binary_operator(token)
          && accepts(op)
    {
        tokens.next();
        skip_newlines(tokens);
        let right = operand(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              line: *line };
    }
    Ok(left)
}

/// Parses `|` and `||`.
///
/// The rule is: `or := and (("|" | "||") and)*`
pub fn parse_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens,
                     |op| matches!(op, BinaryOperator::Or | BinaryOperator::OrOr),
                     parse_and)
}

/// Parses `&` and `&&`.
///
/// The rule is: `and := not (("&" | "&&") not)*`
pub fn parse_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens,
                     |op| matches!(op, BinaryOperator::And | BinaryOperator::AndAnd),
                     parse_not)
}

/// Parses logical negation, which binds looser than comparison:
/// `!x == y` is `!(x == y)`.
///
/// The rule is: `not := "!" not | comparison`
pub fn parse_not<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Bang, line)) = tokens.peek() {
        tokens.next();
        let operand = parse_not(tokens)?;
        return Ok(Expr::Unary { op:      UnaryOperator::Not,
                                operand: Box::new(operand),
                                line:    *line, });
    }
    parse_comparison(tokens)
}

/// Parses the comparison operators `== != < <= > >=`.
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens,
                     |op| {
                         matches!(op,
                                  BinaryOperator::Equal
                                  | BinaryOperator::NotEqual
                                  | BinaryOperator::Less
                                  | BinaryOperator::LessEqual
                                  | BinaryOperator::Greater
                                  | BinaryOperator::GreaterEqual)
                     },
                     parse_additive)
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens,
                     |op| matches!(op, BinaryOperator::Add | BinaryOperator::Sub),
                     parse_multiplicative)
}

/// Parses multiplication and division expressions.
///
/// The rule is: `multiplicative := special (("*" | "/") special)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens,
                     |op| matches!(op, BinaryOperator::Mul | BinaryOperator::Div),
                     parse_special)
}

/// Parses `%op%` operators.
///
/// `%%` and `%/%` become [`BinaryOperator::Mod`] and
/// [`BinaryOperator::IntDiv`]; any other `%op%` becomes a call of the
/// function named `%op%` with both operands.
///
/// The rule is: `special := range (SPECIAL range)*`
pub fn parse_special<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_range(tokens)?;
    while let Some((Token::Special(name), line)) = tokens.peek() {
        tokens.next();
        skip_newlines(tokens);
        let right = parse_range(tokens)?;
        let line = *line;
        left = match name.as_str() {
            "%%" => Expr::Binary { left: Box::new(left),
                                   op: BinaryOperator::Mod,
                                   right: Box::new(right),
                                   line },
            "%/%" => Expr::Binary { left: Box::new(left),
                                    op: BinaryOperator::IntDiv,
                                    right: Box::new(right),
                                    line },
            _ => Expr::Call { function: Box::new(Expr::Symbol { name: name.clone(),
                                                                line }),
                              arguments: vec![Argument { name:  None,
                                                         value: Some(left), },
                                              Argument { name:  None,
                                                         value: Some(right), }],
                              line },
        };
    }
    Ok(left)
}

/// Parses the sequence operator `:`, which binds tighter than `%op%` and
/// looser than unary minus: `-1:2` is `(-1):2`.
///
/// The rule is: `range := unary (":" unary)*`
pub fn parse_range<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, |op| matches!(op, BinaryOperator::Range), parse_unary)
}
