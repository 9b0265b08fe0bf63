//! Lull CLI
//!
//! Runs, evaluates and syntax-checks Lull scripts.
//!
//! Set `RUST_LOG` (for example `RUST_LOG=lull_eval=debug`) to see engine
//! tracing; add `--trace-tree` for an indented span view.

mod commands;
mod options;

use std::sync::Once;

use options::{Command, Options};

static TRACING_INIT: Once = Once::new();

fn init_tracing(trace_tree: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let flat = (!trace_tree).then(|| fmt::layer().with_target(true).with_level(true));
            let tree = trace_tree.then(|| HierarchicalLayer::new(2).with_targets(true));
            tracing_subscriber::registry()
                .with(flat)
                .with(tree)
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        print_usage();
        return;
    }

    let options = match Options::parse(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    init_tracing(options.trace_tree);

    let ok = match &options.command {
        Command::Run(path) => commands::run_file(path, &options),
        Command::Eval(source) => commands::eval_text(source, &options),
        Command::Check(path) => commands::check_file(path),
        Command::Help => {
            print_usage();
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("Lull script runner");
    println!();
    println!("Usage: lull <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>       Run a script file");
    println!("  eval <text>      Evaluate text and print the result");
    println!("  check <file>     Parse a script file without running it");
    println!("  help             Show this message");
    println!();
    println!("Options:");
    println!("  --recursion-limit=<n>   Nested call limit (0 disables)");
    println!("  --quiet                 Discard output from the ? form");
    println!("  --trace-tree            Show tracing as an indented tree (needs RUST_LOG)");
}
