use argh::FromArgs;
use simp_shell::reader::NoContinuation;
use simp_shell::{Report, Shell, repl};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(FromArgs)]
/// A small interactive shell with `;`, `&&` and `||`.
struct Args {
    #[argh(option, short = 'c')]
    /// run this command line and exit instead of starting the prompt.
    command: Option<String>,

    #[argh(switch)]
    /// print diagnostics without color.
    no_color: bool,

    #[argh(option, default = "repl::DEFAULT_PROMPT.to_string()")]
    /// prompt shown before each line.
    prompt: String,

    #[argh(switch)]
    /// print each parsed line before running it.
    dump_ast: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Args = argh::from_env();
    let report = if args.no_color {
        Report::Plain
    } else {
        Report::Colored
    };
    let mut shell = Shell::new(report).dump_ast(args.dump_ast);

    let status = match args.command {
        Some(line) => {
            shell.run_line(&line, &mut NoContinuation);
            shell.exit_code()
        }
        None => match repl::run(&mut shell, &args.prompt) {
            Ok(status) => status,
            Err(e) => {
                eprintln!("Error: {e:?}");
                return ExitCode::FAILURE;
            }
        },
    };
    ExitCode::from(status as u8)
}
