//! Removal of `console` logging statements.
use std::{collections::HashMap, fmt::Display};

use crate::{lines::collapse_blank_lines, scan};

/// Receiver of every removed call.
pub const RECEIVER: &str = "console";

/// Logging method called on [RECEIVER].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Log,
    Warn,
    Error,
    Info,
    Debug,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Log,
        Method::Warn,
        Method::Error,
        Method::Info,
        Method::Debug,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "log" => Some(Method::Log),
            "warn" => Some(Method::Warn),
            "error" => Some(Method::Error),
            "info" => Some(Method::Info),
            "debug" => Some(Method::Debug),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::Log => "log",
            Method::Warn => "warn",
            Method::Error => "error",
            Method::Info => "info",
            Method::Debug => "debug",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", RECEIVER, self.name())
    }
}

/// A recognized call in the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub method: Method,
    /// Line of the receiver in the input, starting at 1.
    pub line: usize,
}

/// Why a recognized call was left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// The argument list is never closed.
    Unbalanced,
    /// The call does not start a statement, e.g. `x = console.log(y)`.
    InExpression,
    /// The call's value is used by what follows it, e.g. `console.log(y) || z`.
    ResultUsed,
    /// The call is the whole body of a braceless `if`, `else`, `for`,
    /// `while`, `with` or `do`.
    ControlBody,
}

impl Display for KeepReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            KeepReason::Unbalanced => "unbalanced parentheses",
            KeepReason::InExpression => "not at the start of a statement",
            KeepReason::ResultUsed => "result is used by the following expression",
            KeepReason::ControlBody => "only statement of a control-flow body",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub text: String,
    pub removed: Vec<Call>,
    pub kept: Vec<(Call, KeepReason)>,
}

/// Remove console logging statements and collapse the blank lines left behind.
///
/// ```
/// use console_strip::strip::strip;
///
/// let js = "let a = 1;\nconsole.log(a);\n\n\n\nlet b = 2;\n";
/// assert_eq!(strip(js), "let a = 1;\n\nlet b = 2;\n");
/// ```
pub fn strip(text: &str) -> String {
    process(text).text
}

/// Like [strip], but also report which calls were removed or kept.
pub fn process(text: &str) -> Stripped {
    let mut stripped = remove_calls(text);
    stripped.text = collapse_blank_lines(&stripped.text);
    stripped
}

/// Delete every console call statement, leaving blank lines as they are.
///
/// Calls are only removed where they form a whole statement; calls whose value
/// is consumed are kept so the surrounding code stays valid.
pub fn remove_calls(text: &str) -> Stripped {
    Remover::new(text).run()
}

/// Extent of a statement to delete, starting at the receiver.
struct Statement {
    end: usize,
    /// Only whitespace follows on the same line.
    ends_line: bool,
}

struct Remover<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
    output: String,
    /// Last byte of code written to `output`, ignoring whitespace and comments.
    last_significant: Option<u8>,
    /// A newline was written since `last_significant`.
    newline_since: bool,
    /// `last_significant` ends a `++` or `--`.
    after_increment: bool,
    /// `last_significant` ends `if`, `for`, `while` or `with`.
    after_header_keyword: bool,
    /// `last_significant` ends a control-flow header, e.g. `if (x)` or `else`,
    /// so a body must follow.
    control_body: bool,
    /// For each open `(` in output order, whether it starts a control-flow header.
    headers: Vec<bool>,
    parens: HashMap<usize, Option<usize>>,
    /// Length of `output` where the current run of whitespace begins.
    ws_start: usize,
    /// `newline_since` as it was at `ws_start`.
    ws_newline: bool,
    lines: LineCounter,
    removed: Vec<Call>,
    kept: Vec<(Call, KeepReason)>,
}

impl<'a> Remover<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            src: text.as_bytes(),
            pos: 0,
            output: String::with_capacity(text.len()),
            last_significant: None,
            newline_since: false,
            after_increment: false,
            after_header_keyword: false,
            control_body: false,
            headers: Vec::new(),
            parens: scan::paren_pairs(text.as_bytes()),
            ws_start: 0,
            ws_newline: false,
            lines: LineCounter::default(),
            removed: Vec::new(),
            kept: Vec::new(),
        }
    }

    fn run(mut self) -> Stripped {
        while self.pos < self.src.len() {
            let start = self.pos;

            if let Some(literal) = scan::literal_at(self.src, start, self.last_significant) {
                if literal.kind.is_comment() {
                    if self.src[start..literal.end].contains(&b'\n') {
                        self.newline_since = true;
                    }
                    self.copy(literal.end);
                } else {
                    self.copy_significant(literal.end, scan::LITERAL_VALUE);
                }
                continue;
            }

            let b = self.src[start];
            if b.is_ascii_whitespace() {
                if b == b'\n' {
                    self.newline_since = true;
                }
                self.output.push(char::from(b));
                self.pos += 1;
                continue;
            }

            if !scan::is_ident_byte(b) {
                let closes_header = match b {
                    b'(' => {
                        self.headers.push(self.after_header_keyword);
                        false
                    }
                    b')' => self.headers.pop().unwrap_or(false),
                    _ => false,
                };
                self.copy_significant(start + 1, b);
                self.control_body = closes_header;
                continue;
            }

            let end = scan::ident_end(self.src, start);
            if &self.src[start..end] == RECEIVER.as_bytes()
                && self.last_significant != Some(b'.')
                && self.try_remove(start, end)
            {
                continue;
            }
            self.copy_significant(end, self.src[end - 1]);

            let word = &self.src[start..end];
            self.after_header_keyword = matches!(word, b"if" | b"for" | b"while" | b"with");
            self.control_body = matches!(word, b"else" | b"do");
        }

        Stripped {
            text: self.output,
            removed: self.removed,
            kept: self.kept,
        }
    }

    /// Remove the call whose receiver spans `start..receiver_end`, if it is a
    /// whole statement.
    fn try_remove(&mut self, start: usize, receiver_end: usize) -> bool {
        let Some((method, close)) = self.parse_call(receiver_end) else {
            return false;
        };
        let call = Call {
            method,
            line: self.lines.line_of(self.src, start),
        };

        match close
            .ok_or(KeepReason::Unbalanced)
            .and_then(|close| self.statement(close))
        {
            Ok(statement) => {
                debug!("Removing {} on line {}", method, call.line);
                self.remove(statement);
                self.removed.push(call);
                true
            }
            Err(reason) => {
                warn!("Keeping {} on line {}: {}", method, call.line, reason);
                self.kept.push((call, reason));
                false
            }
        }
    }

    /// Match `.method (` after the receiver, returning the method and the
    /// index of the closing parenthesis if there is one.
    fn parse_call(&self, receiver_end: usize) -> Option<(Method, Option<usize>)> {
        if self.src.get(receiver_end) != Some(&b'.') {
            return None;
        }
        let name_start = receiver_end + 1;
        let name_end = scan::ident_end(self.src, name_start);
        let method = Method::from_name(&self.text[name_start..name_end])?;

        let open = scan::skip_whitespace(self.src, name_end);
        if self.src.get(open) != Some(&b'(') {
            return None;
        }

        let close = match self.parens.get(&open) {
            Some(&close) => close,
            // Only reached when a removed statement changed how a later `/` lexes.
            None => scan::find_closing(self.src, open, b'(', b')'),
        };
        Some((method, close))
    }

    /// Check that the call closed at `close` is a statement of its own.
    fn statement(&self, close: usize) -> Result<Statement, KeepReason> {
        if self.control_body {
            return Err(KeepReason::ControlBody);
        }
        let starts_statement = match self.last_significant {
            None | Some(b';' | b'{' | b'}') => true,
            Some(b) => {
                self.newline_since && (self.after_increment || !scan::continues_expression(b))
            }
        };
        if !starts_statement {
            return Err(KeepReason::InExpression);
        }

        let src = self.src;
        let after = scan::skip_blanks(src, close + 1);
        let terminated = src.get(after) == Some(&b';');
        let end = if terminated {
            scan::skip_blanks(src, after + 1)
        } else {
            after
        };
        let ends_line = matches!(src.get(end), None | Some(b'\n' | b'\r'));

        if !terminated {
            let ends_statement = if ends_line {
                // Without a `;`, the next line may still continue the call expression.
                let next = scan::skip_whitespace(src, end);
                match src.get(next) {
                    // A template on the next line would be tagged by the call.
                    Some(&b) => {
                        !(scan::continues_expression(b) || b == b'`')
                            || scan::starts_comment(src, next)
                    }
                    None => true,
                }
            } else {
                src[end] == b'}' || scan::starts_comment(src, end)
            };
            if !ends_statement {
                return Err(KeepReason::ResultUsed);
            }
        }

        Ok(Statement { end, ends_line })
    }

    fn remove(&mut self, statement: Statement) {
        let mut end = statement.end;
        if statement.ends_line {
            // Drop the indentation and any preceding blank lines too.
            self.output.truncate(self.ws_start);
            self.newline_since = self.ws_newline;

            // Nothing precedes the statement, so drop its line terminator as well.
            if self.output.is_empty() {
                if self.src[end..].starts_with(b"\r\n") {
                    end += 2;
                } else if self.src[end..].starts_with(b"\n") {
                    end += 1;
                }
            }
        }
        self.pos = end;
    }

    /// Copy up to `end` to the output.
    fn copy(&mut self, end: usize) {
        self.output.push_str(&self.text[self.pos..end]);
        self.pos = end;
        self.ws_start = self.output.len();
        self.ws_newline = self.newline_since;
    }

    /// Copy code up to `end`, whose last significant byte is `last`.
    fn copy_significant(&mut self, end: usize, last: u8) {
        self.after_increment = matches!(last, b'+' | b'-')
            && self.last_significant == Some(last)
            && self.output.as_bytes().last() == Some(&last);
        self.after_header_keyword = false;
        self.control_body = false;
        self.last_significant = Some(last);
        self.newline_since = false;
        self.copy(end);
    }
}

/// Incremental line numbers for increasing byte offsets.
#[derive(Default)]
struct LineCounter {
    pos: usize,
    newlines: usize,
}

impl LineCounter {
    fn line_of(&mut self, src: &[u8], pos: usize) -> usize {
        self.newlines += src[self.pos..pos].iter().filter(|&&b| b == b'\n').count();
        self.pos = pos;
        self.newlines + 1
    }
}
