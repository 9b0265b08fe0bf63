//! The `run`, `eval` and `check` commands.
//!
//! Each returns `true` on success; `main` turns `false` into exit status 1.

use lull_eval::{ScriptEngine, ScriptError, ScriptErrorKind};
use lull_parse::ParseError;

use crate::options::Options;

/// Run a script file for its effects.
pub fn run_file(path: &str, options: &Options) -> bool {
    let Some(source) = read_file(path) else {
        return false;
    };
    tracing::debug!(path, bytes = source.len(), "running script");
    let engine = ScriptEngine::new(options.engine_config());
    match engine.run_now(&source) {
        Ok(_) => true,
        Err(err) => {
            report(path, &source, &err);
            false
        }
    }
}

/// Evaluate `source` and print its value.
pub fn eval_text(source: &str, options: &Options) -> bool {
    let engine = ScriptEngine::new(options.engine_config());
    match engine.run_now(source) {
        Ok(value) => {
            if !value.is_empty() {
                println!("{value}");
            }
            true
        }
        Err(err) => {
            report("<eval>", source, &err);
            false
        }
    }
}

/// Parse a script file without evaluating it.
pub fn check_file(path: &str) -> bool {
    let Some(source) = read_file(path) else {
        return false;
    };
    match lull_parse::parse(&source) {
        Ok(forms) => {
            println!("{path}: ok ({} top-level forms)", forms.len());
            true
        }
        Err(err) => {
            eprintln!("{}", describe_parse_error(path, &source, &err));
            false
        }
    }
}

fn report(path: &str, source: &str, err: &ScriptError) {
    if let ScriptErrorKind::Parse(parse) = &err.kind {
        eprintln!("{}", describe_parse_error(path, source, parse));
    } else {
        eprintln!("error in '{path}': {err}");
    }
}

fn describe_parse_error(path: &str, source: &str, err: &ParseError) -> String {
    let (line, column) = line_column(source, err.offset);
    format!("{path}:{line}:{column}: syntax error: {}", err.kind)
}

/// One-based line and column of a byte offset. Offsets past the end clamp to
/// the end of the source.
pub(crate) fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

fn read_file(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            None
        }
    }
}
