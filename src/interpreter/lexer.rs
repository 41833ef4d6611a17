use logos::{Lexer, Logos};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literals such as `3.14`, `.5`, `2`, `1e-10` or `0xFF`.
    #[regex(r"[0-9]+\.?[0-9]*([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"0[xX][0-9a-fA-F]+", parse_hex)]
    Number(f64),
    /// Integer literals written with an `L` suffix, such as `42L`. The value
    /// is checked for integrality by the parser.
    #[regex(r"[0-9]+\.?[0-9]*([eE][+-]?[0-9]+)?L", parse_suffixed)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?L", parse_suffixed)]
    #[regex(r"0[xX][0-9a-fA-F]+L", |lex| parse_hex_str(&lex.slice()[..lex.slice().len() - 1]))]
    Integer(f64),
    /// Imaginary literals such as `2i`.
    #[regex(r"[0-9]+\.?[0-9]*([eE][+-]?[0-9]+)?i", parse_suffixed)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?i", parse_suffixed)]
    Imaginary(f64),
    /// String literals in double or single quotes, with escapes resolved.
    #[regex(r#""([^"\\]|\\[^\n]|\\\n)*""#, parse_string, allow_greedy = true)]
    #[regex(r"'([^'\\]|\\[^\n]|\\\n)*'", parse_string, allow_greedy = true)]
    Str(String),
    /// Identifiers such as `x`, `.hidden`, `is.na` or `...`, and names in
    /// backquotes such as `` `names<-` ``.
    #[regex(r"[a-zA-Z][a-zA-Z0-9._]*", |lex| lex.slice().to_string())]
    #[regex(r"\.([a-zA-Z._][a-zA-Z0-9._]*)?", |lex| lex.slice().to_string())]
    #[regex(r"`[^`]*`", |lex| {
        let slice = lex.slice();
        lex.extras.line += slice.matches('\n').count();
        slice[1..slice.len() - 1].to_string()
    }, allow_greedy = true)]
    Identifier(String),
    /// `function`
    #[token("function")]
    Function,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `while`
    #[token("while")]
    While,
    /// `repeat`
    #[token("repeat")]
    Repeat,
    /// `break`
    #[token("break")]
    Break,
    /// `next`
    #[token("next")]
    Next,
    /// `TRUE`
    #[token("TRUE")]
    True,
    /// `FALSE`
    #[token("FALSE")]
    False,
    /// `NULL`
    #[token("NULL")]
    Null,
    /// `NA`
    #[token("NA")]
    Na,
    /// `NA_integer_`
    #[token("NA_integer_")]
    NaInteger,
    /// `NA_real_`
    #[token("NA_real_")]
    NaReal,
    /// `NA_character_`
    #[token("NA_character_")]
    NaCharacter,
    /// `Inf`
    #[token("Inf")]
    Inf,
    /// `NaN`
    #[token("NaN")]
    NaN,
    /// `<-`
    #[token("<-")]
    LeftAssign,
    /// `<<-`
    #[token("<<-")]
    SuperAssign,
    /// `->`
    #[token("->")]
    RightAssign,
    /// `->>`
    #[token("->>")]
    RightSuperAssign,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `!`
    #[token("!")]
    Bang,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `&&`
    #[token("&&")]
    DoubleAmpersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `||`
    #[token("||")]
    DoublePipe,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^` and its spelling `**`.
    #[token("^")]
    #[token("**")]
    Caret,
    /// `%op%` operators, including `%%` and `%/%`.
    #[regex(r"%[^%\n]*%", |lex| lex.slice().to_string(), allow_greedy = true)]
    Special(String),
    /// `:`
    #[token(":")]
    Colon,
    /// `$`
    #[token("$")]
    Dollar,
    /// `@`
    #[token("@")]
    At,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `[[`
    #[token("[[")]
    DoubleLBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `# Comments.`
    #[regex(r"#[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// Line breaks, which terminate expressions outside parentheses.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        Token::NewLine
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\f\r]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

fn parse_number(lex: &Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses a decimal literal without its one-character suffix (`L` or `i`).
fn parse_suffixed(lex: &Lexer<Token>) -> Option<f64> {
    let slice = lex.slice();
    slice[..slice.len() - 1].parse().ok()
}

fn parse_hex(lex: &Lexer<Token>) -> Option<f64> {
    parse_hex_str(lex.slice())
}

#[allow(clippy::cast_precision_loss)]
fn parse_hex_str(slice: &str) -> Option<f64> {
    u64::from_str_radix(&slice[2..], 16).ok().map(|n| n as f64)
}

/// Strips the quotes of a string literal and resolves its escapes.
///
/// Supports `\n`, `\t`, `\r`, `\0`, `\\`, both quotes, `\xhh` and
/// `\u{hhhh}` / `\uhhhh`. Any other escaped character stands for itself.
fn parse_string(lex: &mut Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    lex.extras.line += slice.matches('\n').count();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'x' => {
                let mut code = String::new();
                while code.len() < 2
                      && let Some(d) = chars.next_if(char::is_ascii_hexdigit)
                {
                    code.push(d);
                }
                out.push(char::from_u32(u32::from_str_radix(&code, 16).ok()?)?);
            },
            'u' | 'U' => {
                let braced = chars.next_if_eq(&'{').is_some();
                let mut code = String::new();
                while code.len() < 8
                      && let Some(d) = chars.next_if(char::is_ascii_hexdigit)
                {
                    code.push(d);
                }
                if braced && chars.next() != Some('}') {
                    return None;
                }
                out.push(char::from_u32(u32::from_str_radix(&code, 16).ok()?)?);
            },
            other => out.push(other),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Token::lexer_with_extras(source, LexerExtras { line: 1 }).map(|t| t.expect("valid token"))
                                                                 .collect()
    }

    #[test]
    fn numbers_and_suffixes() {
        assert_eq!(lex("1 2.5 .5 1e3 0x10 3L 2i"),
                   vec![Token::Number(1.0),
                        Token::Number(2.5),
                        Token::Number(0.5),
                        Token::Number(1000.0),
                        Token::Number(16.0),
                        Token::Integer(3.0),
                        Token::Imaginary(2.0)]);
    }

    #[test]
    fn identifiers_with_dots_and_backquotes() {
        assert_eq!(lex("is.na ... .x `names<-`"),
                   vec![Token::Identifier("is.na".into()),
                        Token::Identifier("...".into()),
                        Token::Identifier(".x".into()),
                        Token::Identifier("names<-".into())]);
    }

    #[test]
    fn assignment_arrows_win_over_comparison() {
        assert_eq!(lex("x<-1"),
                   vec![Token::Identifier("x".into()), Token::LeftAssign, Token::Number(1.0)]);
        assert_eq!(lex("x < -1"),
                   vec![Token::Identifier("x".into()), Token::Less, Token::Minus, Token::Number(1.0)]);
    }

    #[test]
    fn string_escapes() {
        assert_eq!(lex(r#""a\tb\"c" 'd\x41\u{e9}'"#),
                   vec![Token::Str("a\tb\"c".into()), Token::Str("dAé".into())]);
    }

    #[test]
    fn comments_are_skipped_and_lines_counted() {
        let mut lexer = Token::lexer_with_extras("a # note\nb", LexerExtras { line: 1 });
        assert_eq!(lexer.next(), Some(Ok(Token::Identifier("a".into()))));
        assert_eq!(lexer.next(), Some(Ok(Token::NewLine)));
        assert_eq!(lexer.extras.line, 2);
    }
}
