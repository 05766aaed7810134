//! Split a step pattern into literal text, placeholders and stray braces.

use crate::errors::PatternError;

use super::placeholder::{Placeholder, parse_placeholder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Placeholder(Placeholder),
    OpenBrace { index: usize },
    CloseBrace { index: usize },
}

fn starts_placeholder(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub(crate) fn lex_pattern(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    let flush = |literal: &mut String, tokens: &mut Vec<Token>| {
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(literal)));
        }
    };

    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => literal.push(chars.next().map_or('\\', |(_, escaped)| escaped)),
            '{' => match chars.peek().map(|&(_, next)| next) {
                Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                Some(next) if starts_placeholder(next) => {
                    flush(&mut literal, &mut tokens);
                    let placeholder = parse_placeholder(pattern, index)?;
                    let end = placeholder.end;
                    while chars.peek().is_some_and(|&(i, _)| i < end) {
                        chars.next();
                    }
                    tokens.push(Token::Placeholder(placeholder));
                }
                _ => {
                    flush(&mut literal, &mut tokens);
                    tokens.push(Token::OpenBrace { index });
                }
            },
            '}' => {
                if chars.peek().is_some_and(|&(_, next)| next == '}') {
                    chars.next();
                    literal.push('}');
                } else {
                    flush(&mut literal, &mut tokens);
                    tokens.push(Token::CloseBrace { index });
                }
            }
            other => literal.push(other),
        }
    }

    flush(&mut literal, &mut tokens);
    Ok(tokens)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise lexing fallibility")]
mod tests {
    use super::*;

    fn placeholder(start: usize, end: usize, name: &str, hint: Option<&str>) -> Token {
        Token::Placeholder(Placeholder {
            name: name.into(),
            hint: hint.map(Into::into),
            start,
            end,
        })
    }

    #[test]
    fn splits_literals_and_placeholders() {
        assert_eq!(
            lex_pattern("Given {value:u32} cukes").unwrap(),
            vec![
                Token::Literal("Given ".into()),
                placeholder(6, 17, "value", Some("u32")),
                Token::Literal(" cukes".into()),
            ]
        );
    }

    #[test]
    fn doubled_braces_are_literal() {
        assert_eq!(
            lex_pattern("{{outer}} {inner}").unwrap(),
            vec![
                Token::Literal("{outer} ".into()),
                placeholder(10, 17, "inner", None),
            ]
        );
    }

    #[test]
    fn backslash_escapes_next_character() {
        assert_eq!(
            lex_pattern(r"cost \{x\}").unwrap(),
            vec![Token::Literal("cost {x}".into())]
        );
    }

    #[test]
    fn braces_not_followed_by_a_name_are_stray() {
        assert_eq!(
            lex_pattern("{ literal }").unwrap(),
            vec![
                Token::OpenBrace { index: 0 },
                Token::Literal(" literal ".into()),
                Token::CloseBrace { index: 10 },
            ]
        );
    }

    #[test]
    fn keeps_multibyte_literals_intact() {
        assert_eq!(
            lex_pattern("café {drink}").unwrap(),
            vec![
                Token::Literal("café ".into()),
                placeholder(6, 13, "drink", None),
            ]
        );
    }
}
