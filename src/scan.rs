//! Byte-level lexing of JavaScript-like source.
//!
//! This is only enough to tell code apart from string, template and regex
//! literals and comments, and to match brackets across them.
//! Positions are byte offsets; every offset returned falls on an ASCII byte or
//! the end of the input, so it is always a valid `str` boundary.

use std::collections::HashMap;

/// Stand-in for the last byte of a string, template or regex literal when
/// tracking the previous significant byte.
pub const LITERAL_VALUE: u8 = b'"';

/// Bytes that may appear in an identifier.
///
/// Non-ASCII bytes count so that identifiers with unicode letters form one run.
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || !b.is_ascii()
}

/// Index one past the identifier run starting at `start`.
pub fn ident_end(src: &[u8], start: usize) -> usize {
    src[start..]
        .iter()
        .position(|&b| !is_ident_byte(b))
        .map_or(src.len(), |n| start + n)
}

/// Index of the first non-whitespace byte at or after `start`.
pub fn skip_whitespace(src: &[u8], start: usize) -> usize {
    src[start..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(src.len(), |n| start + n)
}

/// Index of the first byte at or after `start` that is not a space or tab.
pub fn skip_blanks(src: &[u8], start: usize) -> usize {
    src[start..]
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t'))
        .map_or(src.len(), |n| start + n)
}

/// Whether a `//` or `/*` comment starts at `i`.
pub fn starts_comment(src: &[u8], i: usize) -> bool {
    src[i..].starts_with(b"//") || src[i..].starts_with(b"/*")
}

/// Whether an expression is still open after `b`, i.e. it is an operator,
/// an opening bracket, a separator or a member access.
pub fn continues_expression(b: u8) -> bool {
    matches!(
        b,
        b'(' | b'['
            | b','
            | b'='
            | b':'
            | b'?'
            | b'&'
            | b'|'
            | b'+'
            | b'-'
            | b'*'
            | b'/'
            | b'%'
            | b'!'
            | b'~'
            | b'^'
            | b'<'
            | b'>'
            | b'.'
    )
}

/// A `/` starts a regex literal instead of a division when no value precedes it.
fn regex_allowed(prev: Option<u8>) -> bool {
    match prev {
        None => true,
        Some(b) => continues_expression(b) || matches!(b, b'{' | b'}' | b';'),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Template,
    Regex,
    LineComment,
    BlockComment,
}

impl LiteralKind {
    pub fn is_comment(self) -> bool {
        matches!(self, LiteralKind::LineComment | LiteralKind::BlockComment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Index one past the literal.
    ///
    /// Line comments and unterminated strings stop before the newline.
    pub end: usize,
}

/// Recognize a literal or comment starting at `i`.
///
/// `prev` is the previous significant code byte, used to tell regex literals
/// from division.
pub fn literal_at(src: &[u8], i: usize, prev: Option<u8>) -> Option<Literal> {
    let kind = match *src.get(i)? {
        b'\'' | b'"' => LiteralKind::String,
        b'`' => LiteralKind::Template,
        b'/' => match src.get(i + 1) {
            Some(b'/') => LiteralKind::LineComment,
            Some(b'*') => LiteralKind::BlockComment,
            _ if regex_allowed(prev) => LiteralKind::Regex,
            _ => return None,
        },
        _ => return None,
    };

    let end = match kind {
        LiteralKind::String => string_end(src, i),
        LiteralKind::Template => template_end(src, i),
        LiteralKind::Regex => regex_end(src, i)?,
        LiteralKind::LineComment => src[i..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(src.len(), |n| i + n),
        LiteralKind::BlockComment => src[i + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .map_or(src.len(), |n| i + 2 + n + 2),
    };

    Some(Literal { kind, end })
}

fn string_end(src: &[u8], start: usize) -> usize {
    let quote = src[start];
    let mut i = start + 1;
    while i < src.len() {
        match src[i] {
            b'\\' => i += 2,
            // Unterminated, leave the newline to the caller.
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    src.len()
}

/// Open parts of a template literal.
#[derive(Clone, Copy)]
enum Frame {
    Text,
    /// Inside `${…}`, with the number of braces opened since.
    Substitution(usize),
}

fn template_end(src: &[u8], start: usize) -> usize {
    // Nested templates are tracked on the heap so deep nesting cannot overflow the stack.
    let mut frames = vec![Frame::Text];
    let mut prev = None;
    let mut i = start + 1;
    while let Some(&frame) = frames.last() {
        let Some(&b) = src.get(i) else {
            break;
        };
        match frame {
            Frame::Text => match b {
                b'\\' => i += 2,
                b'`' => {
                    frames.pop();
                    prev = Some(LITERAL_VALUE);
                    i += 1;
                }
                b'$' if src.get(i + 1) == Some(&b'{') => {
                    frames.push(Frame::Substitution(0));
                    prev = Some(b'{');
                    i += 2;
                }
                _ => i += 1,
            },
            Frame::Substitution(depth) => {
                if b == b'`' {
                    frames.push(Frame::Text);
                    i += 1;
                    continue;
                }
                if let Some(literal) = literal_at(src, i, prev) {
                    if !literal.kind.is_comment() {
                        prev = Some(LITERAL_VALUE);
                    }
                    i = literal.end;
                    continue;
                }

                match b {
                    b'{' => {
                        frames.pop();
                        frames.push(Frame::Substitution(depth + 1));
                    }
                    b'}' => {
                        frames.pop();
                        if depth > 0 {
                            frames.push(Frame::Substitution(depth - 1));
                        }
                    }
                    _ => {}
                }
                if !b.is_ascii_whitespace() {
                    prev = Some(b);
                }
                i += 1;
            }
        }
    }
    i.min(src.len())
}

/// `None` if the regex is not closed on the same line, in which case the `/`
/// is treated as an operator.
fn regex_end(src: &[u8], start: usize) -> Option<usize> {
    let mut in_class = false;
    let mut i = start + 1;
    while i < src.len() {
        match src[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'\n' | b'\r' => return None,
            b'[' => in_class = true,
            b']' => in_class = false,
            // Include flags.
            b'/' if !in_class => return Some(ident_end(src, i + 1)),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the bracket closing the one at `open`, skipping over literals and
/// comments.
///
/// Only `open_b`/`close_b` are counted; other bracket kinds are ignored.
/// Returns `None` if the input ends first.
pub fn find_closing(src: &[u8], open: usize, open_b: u8, close_b: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut prev = None;
    let mut i = open;
    while i < src.len() {
        if let Some(literal) = literal_at(src, i, prev) {
            if !literal.kind.is_comment() {
                prev = Some(LITERAL_VALUE);
            }
            i = literal.end;
            continue;
        }

        let b = src[i];
        if b == open_b {
            depth += 1;
        } else if b == close_b {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        if !b.is_ascii_whitespace() {
            prev = Some(b);
        }
        i += 1;
    }
    None
}

/// Pair every `(` in code with its closing `)`, in a single pass.
///
/// Each key is the index of a `(`; its value is `None` if it is never closed.
/// A value equals what [find_closing] returns for that index.
pub fn paren_pairs(src: &[u8]) -> HashMap<usize, Option<usize>> {
    let mut pairs = HashMap::new();
    let mut open = Vec::new();
    let mut prev = None;
    let mut i = 0;
    while i < src.len() {
        if let Some(literal) = literal_at(src, i, prev) {
            if !literal.kind.is_comment() {
                prev = Some(LITERAL_VALUE);
            }
            i = literal.end;
            continue;
        }

        let b = src[i];
        match b {
            b'(' => {
                open.push(i);
                pairs.insert(i, None);
            }
            b')' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, Some(i));
                }
            }
            _ => {}
        }
        if !b.is_ascii_whitespace() {
            prev = Some(b);
        }
        i += 1;
    }
    pairs
}

#[cfg(test)]
mod test {
    use super::*;

    fn closing(s: &str) -> Option<usize> {
        find_closing(s.as_bytes(), 0, b'(', b')')
    }

    #[test]
    fn ident_runs() {
        assert_eq!(7, ident_end(b"console.log", 0));
        assert_eq!(3, ident_end(b"$a_(", 0));
        assert_eq!("café".len(), ident_end("café(".as_bytes(), 0));
        assert_eq!(2, ident_end(b"ab", 0));
    }

    #[test]
    fn nested_parens() {
        assert_eq!(Some(9), closing("(a(b(c))d)"));
        assert_eq!(Some(1), closing("()"));
    }

    #[test]
    fn unbalanced_parens() {
        assert_eq!(None, closing("((a)"));
        assert_eq!(None, closing("(\"unterminated"));
    }

    #[test]
    fn parens_inside_literals() {
        assert_eq!(Some(6), closing(r#"("(()")"#));
        assert_eq!(Some(6), closing("(')\\'')"));
        assert_eq!(Some(8), closing("(/* ) */)"));
        assert_eq!(Some(9), closing("(a // )\n )"));
    }

    #[test]
    fn templates() {
        assert_eq!(Some(8), closing("(`)${1}`)"));
        // Nested template inside a substitution.
        assert_eq!(Some(15), closing("(`${ `)` + x }`)"));
        assert_eq!(Some(12), closing("(`${ f(1) }`)"));
    }

    #[test]
    fn deeply_nested_templates() {
        let depth = 50_000;
        let template = "`${".repeat(depth) + &"}`".repeat(depth);
        let text = format!("({template})");
        assert_eq!(Some(text.len() - 1), closing(&text));

        // Unterminated at every level.
        assert_eq!(None, closing(&format!("({}", "`${".repeat(depth))));
    }

    #[test]
    fn pairs_match_find_closing() {
        let text = "f(a(b), `${g(1)}`, \")\")\nh((x)\nk(/(/)";
        let src = text.as_bytes();
        let pairs = paren_pairs(src);

        for (i, _) in text.match_indices('(') {
            if let Some(&close) = pairs.get(&i) {
                assert_eq!(find_closing(src, i, b'(', b')'), close, "paren at {i}");
            }
        }
        assert_eq!(Some(&Some(22)), pairs.get(&1));
        assert_eq!(Some(&None), pairs.get(&25));
        assert_eq!(Some(&Some(28)), pairs.get(&26));
        assert_eq!(Some(&Some(35)), pairs.get(&31));
    }

    #[test]
    fn regex_or_division() {
        assert_eq!(Some(7), closing("(/[)]/g)"));
        assert_eq!(Some(7), closing("(x, /)/)"));
        // Division, the `)` is real.
        assert_eq!(Some(4), closing("(a/b) / c)"));
    }

    #[test]
    fn literal_kinds() {
        let lit = |s: &str| literal_at(s.as_bytes(), 0, None);

        assert_eq!(
            Some(Literal {
                kind: LiteralKind::LineComment,
                end: 4
            }),
            lit("// a\nb")
        );
        assert_eq!(
            Some(Literal {
                kind: LiteralKind::BlockComment,
                end: 7
            }),
            lit("/* a */b")
        );
        assert_eq!(
            Some(Literal {
                kind: LiteralKind::String,
                end: 2
            }),
            lit("'a\nb'")
        );
        assert_eq!(
            Some(Literal {
                kind: LiteralKind::Regex,
                end: 5
            }),
            lit("/a/gi.test(x)")
        );
        assert_eq!(None, literal_at(b"/ 2", 0, Some(b'x')));
        assert_eq!(None, lit("/ unclosed\n/"));
        assert_eq!(None, lit("x"));
    }
}
