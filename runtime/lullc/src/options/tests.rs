use super::*;
use pretty_assertions::assert_eq;

fn parse(args: &[&str]) -> Result<Options, String> {
    let args: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
    Options::parse(&args)
}

fn parse_ok(args: &[&str]) -> Options {
    parse(args).unwrap_or_else(|err| panic!("{args:?} rejected: {err}"))
}

#[test]
fn test_commands() {
    assert_eq!(parse_ok(&["run", "a.lull"]).command, Command::Run("a.lull".to_owned()));
    assert_eq!(parse_ok(&["eval", "(+ 1 2)"]).command, Command::Eval("(+ 1 2)".to_owned()));
    assert_eq!(parse_ok(&["check", "a.lull"]).command, Command::Check("a.lull".to_owned()));
    assert_eq!(parse_ok(&["help"]).command, Command::Help);
}

#[test]
fn test_flags_anywhere() {
    let options = parse_ok(&["--quiet", "run", "a.lull", "--recursion-limit=20", "--trace-tree"]);
    assert_eq!(
        options,
        Options {
            command: Command::Run("a.lull".to_owned()),
            recursion_limit: Some(Some(20)),
            quiet: true,
            trace_tree: true,
        }
    );
}

#[test]
fn test_zero_recursion_limit_disables() {
    let options = parse_ok(&["run", "a.lull", "--recursion-limit=0"]);
    assert_eq!(options.recursion_limit, Some(None));
    assert_eq!(options.engine_config().recursion_limit, None);
}

#[test]
fn test_default_config() {
    let options = parse_ok(&["eval", "1"]);
    assert_eq!(options.recursion_limit, None);
    assert_eq!(
        options.engine_config().recursion_limit,
        Some(lull_eval::DEFAULT_RECURSION_LIMIT)
    );
}

#[test]
fn test_rejects_bad_input() {
    assert_eq!(parse(&["compile", "a.lull"]), Err("unknown command 'compile'".to_owned()));
    assert_eq!(parse(&["run"]), Err("'run' takes exactly one operand".to_owned()));
    assert_eq!(parse(&["run", "a", "b"]), Err("'run' takes exactly one operand".to_owned()));
    assert_eq!(parse(&["run", "a", "--fast"]), Err("unknown option '--fast'".to_owned()));
    assert_eq!(
        parse(&["run", "a", "--recursion-limit=many"]),
        Err("invalid recursion limit 'many'".to_owned())
    );
}
