use std::{
    env, fs,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use lakec::{
    analyze,
    errors::{diagnostics::Diagnostics, errors::Error},
    lexer::lexer::tokenize,
    parser::parser::parse,
    render_error,
    unparse::unparse::unparse_program,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: lakec <input> [-t <file>] [-p <file>] [-n <file>] [-c]

  -t <file>  write the token stream to <file>
  -p <file>  unparse the syntax tree to <file>
  -n <file>  run name analysis and unparse with resolved types to <file>
  -c         run name analysis followed by type checking

`--` as <file> writes to stdout.";

#[derive(Debug, Default)]
struct Cli {
    input: PathBuf,
    tokens: Option<String>,
    unparse: Option<String>,
    names: Option<String>,
    check: bool,
}

fn output_target(args: &[String], i: usize, flag: &str) -> Result<String, String> {
    args.get(i)
        .cloned()
        .ok_or_else(|| format!("`{}` needs an output file", flag))
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut cli = Cli::default();
    let mut input = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-t" => {
                i += 1;
                cli.tokens = Some(output_target(args, i, "-t")?);
            }
            "-p" => {
                i += 1;
                cli.unparse = Some(output_target(args, i, "-p")?);
            }
            "-n" => {
                i += 1;
                cli.names = Some(output_target(args, i, "-n")?);
            }
            "-c" => cli.check = true,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("unknown flag `{}`", flag))
            }
            path => {
                if input.replace(PathBuf::from(path)).is_some() {
                    return Err(String::from("only one input file may be given"));
                }
            }
        }
        i += 1;
    }

    cli.input = input.ok_or_else(|| String::from("missing input file"))?;
    Ok(cli)
}

fn write_output(target: &str, contents: &str) -> io::Result<()> {
    if target == "--" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(contents.as_bytes())?;
        stdout.flush()
    } else {
        fs::write(target, contents)
    }
}

fn report_syntax_error(error: &Error, source: &str, file_name: &str) {
    eprintln!("{}", error);
    eprint!("{}", render_error(error, source, file_name));
}

fn report_diagnostics(diagnostics: &Diagnostics) {
    for error in diagnostics {
        eprintln!("{}", error);
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let file_name = cli.input.to_string_lossy().to_string();
    let source = fs::read_to_string(&cli.input)?;

    let start = Instant::now();
    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(error) => {
            report_syntax_error(&error, &source, &file_name);
            eprintln!("Parsing Error");
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(elapsed = ?start.elapsed(), tokens = tokens.len(), "tokenized");

    if let Some(target) = &cli.tokens {
        let dump: String = tokens.iter().map(|token| format!("{}\n", token)).collect();
        write_output(target, &dump)?;
    }

    let parse_start = Instant::now();
    let program = match parse(tokens) {
        Ok(program) => program,
        Err(error) => {
            report_syntax_error(&error, &source, &file_name);
            eprintln!("Parsing Error");
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(elapsed = ?parse_start.elapsed(), "parsed");

    if let Some(target) = &cli.unparse {
        write_output(target, &unparse_program(&program))?;
    }

    if cli.names.is_none() && !cli.check {
        return Ok(ExitCode::SUCCESS);
    }

    let analysis_start = Instant::now();
    let analysis = analyze(&program)?;
    info!(
        elapsed = ?analysis_start.elapsed(),
        resolved = analysis.resolved,
        well_typed = analysis.well_typed,
        "analyzed"
    );

    if !analysis.resolved {
        report_diagnostics(&analysis.diagnostics);
        eprintln!("Name Analysis Error");
        return Ok(ExitCode::FAILURE);
    }

    if let Some(target) = &cli.names {
        write_output(target, &unparse_program(&program))?;
    }

    if cli.check && !analysis.well_typed {
        report_diagnostics(&analysis.diagnostics);
        eprintln!("Type Analysis Error");
        return Ok(ExitCode::FAILURE);
    }

    info!(elapsed = ?start.elapsed(), "finished");
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("lakec: {}\n\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!(%err, "lakec failed");
            eprintln!("lakec: {}", err);
            ExitCode::FAILURE
        }
    }
}
