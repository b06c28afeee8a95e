//! Lexical analysis of a command line into [`Token`]s.
//!
//! The scanner works on an append-only buffer of characters: when a line ends in a
//! dangling `\`, `&&` or `||`, more input is requested from a [`LineReader`] and appended
//! to the buffer, and scanning carries on from the same position.

use crate::ast::LogicalOperator;
use crate::reader::{AND_PROMPT, CONTINUATION_PROMPT, LineReader, OR_PROMPT, ReadError};
use crate::token::{Token, TokenKind};
use thiserror::Error;

/// `&`, `|` and `;` are interpreted structurally unless escaped or inside a comment.
const SPECIAL_CHARS: [char; 3] = ['&', '|', ';'];

/// Errors that abort the scan of a line. No tokens are produced once one is raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexingError {
    /// A malformed run of operators or separators, e.g. `&&&` or `;;`.
    #[error("Parse error near {0}")]
    UnexpectedSequence(String),
    /// A construct that is recognized but not supported: background execution or piping.
    #[error("{0} Not implemented")]
    NotImplemented(&'static str),
    /// The continuation reader was interrupted or ran out of input.
    #[error(transparent)]
    Read(#[from] ReadError),
}

#[derive(Debug, Clone, Copy)]
struct Flags {
    /// Plain whitespace was seen since the last word.
    space_found: bool,
    /// The next word is a program name.
    new_command: bool,
}

struct Scanner<'r, R: LineReader + ?Sized> {
    input: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    flags: Flags,
    reader: &'r mut R,
}

fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(&c)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

fn ends_word(c: char) -> bool {
    is_blank(c) || c == '\n' || is_special(c)
}

impl<'r, R: LineReader + ?Sized> Scanner<'r, R> {
    fn new(source: &str, reader: &'r mut R) -> Self {
        Scanner {
            input: source.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            flags: Flags {
                space_found: false,
                new_command: true,
            },
            reader,
        }
    }

    /// Scans the whole buffer, including any continuation lines pulled in on the way.
    ///
    /// # Returns
    /// The tokens in source order terminated by a single [`TokenKind::EndOfInput`], or the
    /// first [`LexingError`] encountered.
    fn scan_tokens(mut self) -> Result<Vec<Token>, LexingError> {
        while let Some(c) = self.advance() {
            self.scan_token(c)?;
        }
        self.tokens.push(Token::end_of_input());
        Ok(self.tokens)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn scan_token(&mut self, c: char) -> Result<(), LexingError> {
        match c {
            ';' => {
                if let Some(next) = self.peek().filter(|&n| is_special(n)) {
                    return Err(LexingError::UnexpectedSequence(format!(";{next}")));
                }
                self.add_token(TokenKind::Semicolon, ";");
                self.flags.new_command = true;
            }
            '&' => {
                if self.peek() != Some('&') {
                    return Err(LexingError::NotImplemented("Background execution (&)"));
                }
                self.advance();
                self.logical_operator(LogicalOperator::And)?;
            }
            '|' => {
                if self.peek() != Some('|') {
                    return Err(LexingError::NotImplemented("Piping (|)"));
                }
                self.advance();
                self.logical_operator(LogicalOperator::Or)?;
            }
            ' ' | '\t' | '\r' => self.flags.space_found = true,
            '\n' => {}
            '#' => {
                while self.peek().is_some_and(|n| n != '\n') {
                    self.pos += 1;
                }
            }
            _ => self.word(c)?,
        }
        Ok(())
    }

    /// Handles `&&` / `||` once both characters are consumed.
    ///
    /// The operator is accepted when the first character after any blanks is not special,
    /// or is a `;` (whose own rule rejects `;;`). When nothing at all follows the operator,
    /// the command continues on the next line read from the reader, and that line is held
    /// to the same rule.
    fn logical_operator(&mut self, operator: LogicalOperator) -> Result<(), LexingError> {
        let prompt = match operator {
            LogicalOperator::And => AND_PROMPT,
            LogicalOperator::Or => OR_PROMPT,
        };

        self.reject_operator_run()?;
        self.add_token(operator.token_kind(), operator.as_str());
        self.flags.new_command = true;
        if self.peek().is_none() {
            self.continue_command(prompt)?;
            self.reject_operator_run()?;
        }
        Ok(())
    }

    /// Fails when the first non-blank character from the cursor is `&` or `|`.
    fn reject_operator_run(&self) -> Result<(), LexingError> {
        let following = self.input[self.pos..]
            .iter()
            .position(|&c| !is_blank(c))
            .map(|offset| self.pos + offset);

        match following {
            Some(i) if is_special(self.input[i]) && self.input[i] != ';' => {
                let mut near = String::from(self.input[i]);
                if let Some(&second) = self.input.get(i + 1).filter(|&&n| is_special(n)) {
                    near.push(second);
                }
                Err(LexingError::UnexpectedSequence(near))
            }
            _ => Ok(()),
        }
    }

    /// Reads until a non-blank line arrives and appends it to the input.
    fn continue_command(&mut self, prompt: &str) -> Result<(), LexingError> {
        loop {
            let line = self.reader.read_line(prompt)?;
            tracing::trace!(prompt, %line, "continuation line");
            let line = line.trim_matches(|c: char| is_blank(c) || c == '\n');
            if !line.is_empty() {
                self.input.extend(line.chars());
                return Ok(());
            }
        }
    }

    /// Reads one line after a trailing backslash. An empty reply adds nothing.
    fn continue_line(&mut self) -> Result<(), LexingError> {
        let line = self.reader.read_line(CONTINUATION_PROMPT)?;
        tracing::trace!(%line, "continuation line");
        self.input.extend(line.chars());
        Ok(())
    }

    /// Scans a word starting with `first` (already consumed).
    ///
    /// A backslash makes the next character literal; a backslash at the very end of the
    /// input pulls in a continuation line and the word goes on without a break.
    fn word(&mut self, first: char) -> Result<(), LexingError> {
        let starts_escaped = first == '\\';
        let mut text = String::new();
        let mut consumed = false;
        let mut current = first;

        loop {
            if current == '\\' {
                match self.advance() {
                    Some(escaped) => {
                        text.push(escaped);
                        consumed = true;
                    }
                    None => self.continue_line()?,
                }
            } else {
                text.push(current);
                consumed = true;
            }

            match self.peek() {
                Some(next) if !ends_word(next) => {
                    self.pos += 1;
                    current = next;
                }
                _ => break,
            }
        }

        if !consumed {
            return Ok(());
        }

        let lexeme = text.trim_matches(' ');
        if self.flags.new_command {
            self.add_token(TokenKind::ProgramName, lexeme);
            self.flags.new_command = false;
        } else if starts_escaped && !self.flags.space_found {
            self.update_previous_token(lexeme);
        } else {
            self.add_token(TokenKind::Argument, lexeme);
        }
        self.flags.space_found = false;
        Ok(())
    }

    fn add_token(&mut self, kind: TokenKind, lexeme: &str) {
        self.tokens.push(Token::new(kind, lexeme));
    }

    /// Joins an escaped word to the word right before it when no whitespace separates them.
    fn update_previous_token(&mut self, lexeme: &str) {
        match self.tokens.last_mut() {
            Some(previous) => previous.lexeme.push_str(lexeme),
            None => self.add_token(TokenKind::Argument, lexeme),
        }
    }
}

/// The main entry point function to perform lexical analysis.
///
/// Tokenizes `line`, asking `reader` for more input whenever the line is incomplete
/// (a trailing `\`, `&&` or `||`).
///
/// # Returns
/// `Result<Vec<Token>, LexingError>`: the tokens ending with [`TokenKind::EndOfInput`], or
/// the error that stopped the scan.
pub fn split_into_tokens<R: LineReader + ?Sized>(
    line: &str,
    reader: &mut R,
) -> Result<Vec<Token>, LexingError> {
    let tokens = Scanner::new(line, reader).scan_tokens()?;
    tracing::debug!(?tokens, "scanned");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{NoContinuation, ScriptedReader};
    use TokenKind::*;

    fn scan(line: &str) -> Result<Vec<Token>, LexingError> {
        split_into_tokens(line, &mut NoContinuation)
    }

    fn tokens(expected: &[(TokenKind, &str)]) -> Vec<Token> {
        expected
            .iter()
            .map(|(kind, lexeme)| Token::new(*kind, *lexeme))
            .collect()
    }

    fn assert_error(line: &str, expected: &str) {
        match scan(line) {
            Ok(tokens) => panic!("scan({line:?}) got {tokens:?}, expected an error"),
            Err(e) => assert_eq!(e.to_string(), expected, "scan({line:?})"),
        }
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(
            scan("ls -a -l").unwrap(),
            tokens(&[
                (ProgramName, "ls"),
                (Argument, "-a"),
                (Argument, "-l"),
                (EndOfInput, "")
            ])
        );
    }

    #[test]
    fn test_logical_commands() {
        assert_eq!(
            scan("cd && ls -a || clear").unwrap(),
            tokens(&[
                (ProgramName, "cd"),
                (And, "&&"),
                (ProgramName, "ls"),
                (Argument, "-a"),
                (Or, "||"),
                (ProgramName, "clear"),
                (EndOfInput, "")
            ])
        );
    }

    #[test]
    fn test_operators_without_spaces() {
        assert_eq!(
            scan("a&&b;c||d").unwrap(),
            tokens(&[
                (ProgramName, "a"),
                (And, "&&"),
                (ProgramName, "b"),
                (Semicolon, ";"),
                (ProgramName, "c"),
                (Or, "||"),
                (ProgramName, "d"),
                (EndOfInput, "")
            ])
        );
    }

    #[test]
    fn test_semicolon_and_logical() {
        assert_eq!(
            scan("cd ; ls -a && clear").unwrap(),
            tokens(&[
                (ProgramName, "cd"),
                (Semicolon, ";"),
                (ProgramName, "ls"),
                (Argument, "-a"),
                (And, "&&"),
                (ProgramName, "clear"),
                (EndOfInput, "")
            ])
        );
    }

    #[test]
    fn test_empty_and_blank_input() {
        for line in ["", "   ", "\t", "\r", "\n"] {
            assert_eq!(scan(line).unwrap(), tokens(&[(EndOfInput, "")]), "{line:?}");
        }
    }

    #[test]
    fn test_logical_and_errors() {
        assert_error("cd &&& ls -a", "Parse error near &");
        assert_error("cd &&&& ls -a", "Parse error near &&");
        assert_error("cd &&&&& ls -a", "Parse error near &&");
        assert_error("cd && &&& ls -a", "Parse error near &&");
        assert_error("cd &&| ls -a", "Parse error near |");
        assert_error("cd &&|| ls -a", "Parse error near ||");
        assert_error("cd && ls -a &&&", "Parse error near &");
    }

    #[test]
    fn test_logical_or_errors() {
        assert_error("cd ||| ls -a", "Parse error near |");
        assert_error("cd |||| ls -a", "Parse error near ||");
        assert_error("cd || ||| ls -a", "Parse error near ||");
        assert_error("cd ||& ls -a", "Parse error near &");
        assert_error("cd ||&& ls -a", "Parse error near &&");
        assert_error("cd || ls -a |||", "Parse error near |");
    }

    #[test]
    fn test_semicolon_errors() {
        assert_error("cd ;; ls -a", "Parse error near ;;");
        assert_error("cd ;;; ls -a", "Parse error near ;;");
        assert_error("cd &&;; ls -a", "Parse error near ;;");
        assert_error("cd ||;; ls -a", "Parse error near ;;");
        assert_error("cd ;&&;", "Parse error near ;&");
        assert_error(";&", "Parse error near ;&");
        assert_error("cd ;|&;", "Parse error near ;|");
        assert_error("a ;; b", "Parse error near ;;");
    }

    #[test]
    fn test_semicolon_right_after_logical_is_accepted() {
        assert_eq!(
            scan("cd &&; ls -a").unwrap(),
            tokens(&[
                (ProgramName, "cd"),
                (And, "&&"),
                (Semicolon, ";"),
                (ProgramName, "ls"),
                (Argument, "-a"),
                (EndOfInput, "")
            ])
        );
        assert!(scan("cd ||; ls -a").is_ok());
        assert!(scan("cd || ; ls").is_ok());
    }

    #[test]
    fn test_not_implemented_constructs() {
        assert_error("cd &", "Background execution (&) Not implemented");
        assert_error("cd && ls &", "Background execution (&) Not implemented");
        assert_error("; &", "Background execution (&) Not implemented");
        assert_error("cd |", "Piping (|) Not implemented");
        assert_error("ls | cat", "Piping (|) Not implemented");
    }

    #[test]
    fn test_trailing_blanks_after_operator_do_not_continue() {
        assert_eq!(
            scan("cd &&   ").unwrap(),
            tokens(&[(ProgramName, "cd"), (And, "&&"), (EndOfInput, "")])
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(scan("#this is a comment").unwrap(), tokens(&[(EndOfInput, "")]));
        assert_eq!(
            scan("cd #&&&;||").unwrap(),
            tokens(&[(ProgramName, "cd"), (EndOfInput, "")])
        );
        assert_eq!(
            scan("cd #this is a comment\n ls").unwrap(),
            tokens(&[(ProgramName, "cd"), (Argument, "ls"), (EndOfInput, "")])
        );
    }

    #[test]
    fn test_hash_inside_word_is_not_a_comment() {
        assert_eq!(
            scan("echo a#b").unwrap(),
            tokens(&[(ProgramName, "echo"), (Argument, "a#b"), (EndOfInput, "")])
        );
    }

    #[test]
    fn test_backslash_escapes() {
        let cases: &[(&str, &[(TokenKind, &str)])] = &[
            ("cd \\\\", &[(ProgramName, "cd"), (Argument, "\\")]),
            ("cd \\&\\;", &[(ProgramName, "cd"), (Argument, "&;")]),
            ("cd \\\\\\one", &[(ProgramName, "cd"), (Argument, "\\one")]),
            ("cd \\ \\\\one", &[(ProgramName, "cd"), (Argument, "\\one")]),
            (
                "cd \\   \\ls",
                &[(ProgramName, "cd"), (Argument, ""), (Argument, "ls")],
            ),
            ("cd\\ls", &[(ProgramName, "cdls")]),
            ("ls -a\\|b", &[(ProgramName, "ls"), (Argument, "-a|b")]),
        ];

        for (line, expected) in cases {
            let mut expected = tokens(expected);
            expected.push(Token::end_of_input());
            assert_eq!(scan(line).unwrap(), expected, "scan({line:?})");
        }
    }

    #[test]
    fn test_escaped_space_stays_inside_word() {
        assert_eq!(
            scan("echo a\\ b").unwrap(),
            tokens(&[(ProgramName, "echo"), (Argument, "a b"), (EndOfInput, "")])
        );
    }

    #[test]
    fn test_escaped_word_stops_at_operator() {
        assert_eq!(
            scan("cd \\\\\\one&&ls").unwrap(),
            tokens(&[
                (ProgramName, "cd"),
                (Argument, "\\one"),
                (And, "&&"),
                (ProgramName, "ls"),
                (EndOfInput, "")
            ])
        );
    }

    #[test]
    fn test_escaped_word_after_newline_joins_previous() {
        assert_eq!(
            scan("cd\n\\ls").unwrap(),
            tokens(&[(ProgramName, "cdls"), (EndOfInput, "")])
        );
    }

    #[test]
    fn test_logical_continuation() {
        let cases: &[(&[&str], &[(TokenKind, &str)])] = &[
            (&["ls"], &[(ProgramName, "ls"), (And, "&&"), (ProgramName, "ls")]),
            (
                &["ls&&", "cd"],
                &[
                    (ProgramName, "ls"),
                    (And, "&&"),
                    (ProgramName, "ls"),
                    (And, "&&"),
                    (ProgramName, "cd"),
                ],
            ),
            (
                &["ls&&", "cd||", "cd -"],
                &[
                    (ProgramName, "ls"),
                    (And, "&&"),
                    (ProgramName, "ls"),
                    (And, "&&"),
                    (ProgramName, "cd"),
                    (Or, "||"),
                    (ProgramName, "cd"),
                    (Argument, "-"),
                ],
            ),
            (
                &["  ", "   \t\r\n", "cd -"],
                &[
                    (ProgramName, "ls"),
                    (And, "&&"),
                    (ProgramName, "cd"),
                    (Argument, "-"),
                ],
            ),
        ];

        for (replies, expected) in cases {
            let mut reader = ScriptedReader::new(replies);
            let mut expected = tokens(expected);
            expected.push(Token::end_of_input());
            assert_eq!(
                split_into_tokens("ls&&", &mut reader).unwrap(),
                expected,
                "replies {replies:?}"
            );
        }
    }

    #[test]
    fn test_logical_continuation_prompts() {
        let mut reader = ScriptedReader::new(&["cd||", "", "pwd"]);
        split_into_tokens("ls &&", &mut reader).unwrap();
        assert_eq!(reader.prompts, vec!["cmdand>", "cmdor>", "cmdor>"]);
    }

    #[test]
    fn test_logical_continuation_starting_with_operator() {
        let cases: &[(&str, &[&str], &str)] = &[
            ("ls &&", &["&& cd"], "Parse error near &&"),
            ("ls &&", &["  || cd"], "Parse error near ||"),
            ("ls ||", &["", "&cd"], "Parse error near &"),
            ("ls ||", &["|"], "Parse error near |"),
        ];

        for (line, replies, expected) in cases {
            let mut reader = ScriptedReader::new(replies);
            match split_into_tokens(line, &mut reader) {
                Ok(tokens) => panic!("{line:?} + {replies:?} got {tokens:?}, expected an error"),
                Err(e) => assert_eq!(e.to_string(), *expected, "{line:?} + {replies:?}"),
            }
        }
    }

    #[test]
    fn test_logical_continuation_starting_with_semicolon() {
        let mut reader = ScriptedReader::new(&["; cd"]);
        assert_eq!(
            split_into_tokens("ls &&", &mut reader).unwrap(),
            tokens(&[
                (ProgramName, "ls"),
                (And, "&&"),
                (Semicolon, ";"),
                (ProgramName, "cd"),
                (EndOfInput, "")
            ])
        );
    }

    #[test]
    fn test_continuation_interrupt_aborts_scan() {
        let mut reader = ScriptedReader::new(&["ls&&", "^C"]);
        let err = split_into_tokens("ls&&", &mut reader).unwrap_err();
        assert_eq!(err, LexingError::Read(ReadError::Interrupted));
        assert_eq!(err.to_string(), "reader: ^C pressed");

        let err = split_into_tokens("ls ||", &mut NoContinuation).unwrap_err();
        assert_eq!(err, LexingError::Read(ReadError::Eof));
    }

    #[test]
    fn test_backslash_continuation_joins_words() {
        let mut reader = ScriptedReader::new(&["bar -x"]);
        assert_eq!(
            split_into_tokens("foo\\", &mut reader).unwrap(),
            tokens(&[(ProgramName, "foobar"), (Argument, "-x"), (EndOfInput, "")])
        );
        assert_eq!(reader.prompts, vec![">"]);
    }

    #[test]
    fn test_backslash_continuation_with_leading_space_starts_new_word() {
        let mut reader = ScriptedReader::new(&[" -a"]);
        assert_eq!(
            split_into_tokens("ls\\", &mut reader).unwrap(),
            tokens(&[(ProgramName, "ls"), (Argument, "-a"), (EndOfInput, "")])
        );

        let mut reader = ScriptedReader::new(&["-l"]);
        assert_eq!(
            split_into_tokens("ls \\", &mut reader).unwrap(),
            tokens(&[(ProgramName, "ls"), (Argument, "-l"), (EndOfInput, "")])
        );
    }

    #[test]
    fn test_backslash_continuation_empty_reply() {
        let mut reader = ScriptedReader::new(&[""]);
        assert_eq!(
            split_into_tokens("ls \\", &mut reader).unwrap(),
            tokens(&[(ProgramName, "ls"), (EndOfInput, "")])
        );
    }

    #[test]
    fn test_backslash_continuation_read_error() {
        let mut reader = ScriptedReader::new(&["^C"]);
        assert!(matches!(
            split_into_tokens("ls \\", &mut reader),
            Err(LexingError::Read(ReadError::Interrupted))
        ));
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(
            scan("echo héllo wörld").unwrap(),
            tokens(&[
                (ProgramName, "echo"),
                (Argument, "héllo"),
                (Argument, "wörld"),
                (EndOfInput, "")
            ])
        );
    }
}
