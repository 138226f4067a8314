//! SQL script loading.
//!
//! A script is split on `;` into statements. Semicolons inside string
//! literals, quoted identifiers, `--` line comments and `/* */` block
//! comments do not end a statement. Statements with nothing but whitespace
//! and comments are dropped. An unterminated literal or block comment is an
//! error rather than a silently merged final statement.

use std::path::Path;

use crate::error::CliError;

/// Read a script file and split it into statements.
pub fn load_statements(path: &Path) -> Result<Vec<String>, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| CliError::Script { path: path.to_path_buf(), source })?;
    let statements = split_statements(&text)
        .map_err(|message| CliError::ScriptSyntax { path: path.to_path_buf(), message })?;
    tracing::debug!(path = %path.display(), statements = statements.len(), "Script loaded");
    Ok(statements)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

/// Split SQL text into trimmed statements, without the terminating `;`.
pub fn split_statements(sql: &str) -> Result<Vec<String>, &'static str> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_code = false;
    let mut state = State::Code;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                ';' => {
                    push_statement(&mut statements, &mut current, has_code);
                    has_code = false;
                    continue;
                }
                '\'' => state = State::SingleQuote,
                '"' => state = State::DoubleQuote,
                '-' if chars.peek() == Some(&'-') => state = State::LineComment,
                '/' if chars.peek() == Some(&'*') => {
                    current.push(c);
                    if let Some(star) = chars.next() {
                        current.push(star);
                    }
                    state = State::BlockComment;
                    continue;
                }
                _ => {}
            },
            // Doubled quotes ('' or "") leave and re-enter the literal
            State::SingleQuote if c == '\'' => state = State::Code,
            State::DoubleQuote if c == '"' => state = State::Code,
            State::LineComment if c == '\n' => state = State::Code,
            State::BlockComment if c == '*' && chars.peek() == Some(&'/') => {
                current.push(c);
                if let Some(slash) = chars.next() {
                    current.push(slash);
                }
                state = State::Code;
                continue;
            }
            _ => {}
        }

        if matches!(state, State::Code | State::SingleQuote | State::DoubleQuote)
            && !c.is_whitespace()
        {
            has_code = true;
        }
        current.push(c);
    }

    match state {
        State::SingleQuote | State::DoubleQuote => return Err("unterminated quoted string"),
        State::BlockComment => return Err("unterminated block comment"),
        State::Code | State::LineComment => {}
    }

    push_statement(&mut statements, &mut current, has_code);
    Ok(statements)
}

fn push_statement(statements: &mut Vec<String>, current: &mut String, has_code: bool) {
    let statement = std::mem::take(current);
    if has_code {
        statements.push(statement.trim().to_string());
    }
}
