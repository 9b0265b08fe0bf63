//! Command-line parsing.

use lull_eval::{silent_handler, EngineConfig};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(String),
    Eval(String),
    Check(String),
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub command: Command,
    /// `Some(None)` removes the limit; `None` keeps the engine default.
    pub recursion_limit: Option<Option<usize>>,
    pub quiet: bool,
    pub trace_tree: bool,
}

impl Options {
    /// Parse the arguments after the program name. Flags may appear before
    /// or after the command operand.
    pub fn parse(args: &[String]) -> Result<Options, String> {
        let mut recursion_limit = None;
        let mut quiet = false;
        let mut trace_tree = false;
        let mut positional = Vec::new();

        for arg in args {
            if let Some(value) = arg.strip_prefix("--recursion-limit=") {
                let limit: usize = value
                    .parse()
                    .map_err(|_| format!("invalid recursion limit '{value}'"))?;
                recursion_limit = Some((limit > 0).then_some(limit));
            } else if arg == "--quiet" || arg == "-q" {
                quiet = true;
            } else if arg == "--trace-tree" {
                trace_tree = true;
            } else if arg.starts_with("--") {
                return Err(format!("unknown option '{arg}'"));
            } else {
                positional.push(arg.as_str());
            }
        }

        let command = match positional.as_slice() {
            ["run", path] => Command::Run((*path).to_owned()),
            ["eval", source] => Command::Eval((*source).to_owned()),
            ["check", path] => Command::Check((*path).to_owned()),
            ["help"] | [] => Command::Help,
            ["run" | "eval" | "check", ..] => {
                return Err(format!("'{}' takes exactly one operand", positional[0]));
            }
            [other, ..] => return Err(format!("unknown command '{other}'")),
        };

        Ok(Options {
            command,
            recursion_limit,
            quiet,
            trace_tree,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(limit) = self.recursion_limit {
            config = config.with_recursion_limit(limit);
        }
        if self.quiet {
            config = config.with_print_handler(silent_handler());
        }
        config
    }
}

#[cfg(test)]
mod tests;
