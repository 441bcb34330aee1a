//! `coc` — the CO compiler driver.
//!
//! Usage: `coc <input.co> <output.c> [--json] [--locale en|be|ru]`
//!
//! Exit codes: 0 on success, 1 when any error-severity diagnostic was
//! produced, 2 on internal compiler errors.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use co::{CompileOutput, Locale};

struct Options {
    input: PathBuf,
    output: PathBuf,
    json: bool,
    locale: Locale,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("coc: {error}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("coc: internal error: {error:#}");
            ExitCode::from(2)
        }
    }
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut positional = Vec::new();
    let mut json = false;
    let mut locale = Locale::from_env();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--locale" => {
                let tag = iter.next().context("`--locale` expects a value")?;
                locale = Locale::parse(tag)
                    .with_context(|| format!("unsupported locale '{tag}'"))?;
            }
            flag if flag.starts_with("--") => bail!("unknown flag '{flag}'"),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    match positional.as_slice() {
        [input, output] => Ok(Options {
            input: input.clone(),
            output: output.clone(),
            json,
            locale,
        }),
        _ => bail!("expected exactly an input and an output path"),
    }
}

fn print_usage() {
    eprintln!("usage: coc <input.co> <output.c> [--json] [--locale en|be|ru]");
}

fn run(options: &Options) -> Result<ExitCode> {
    let source = std::fs::read_to_string(&options.input)
        .with_context(|| format!("cannot read '{}'", options.input.display()))?;

    let output = co::compile_to_c(&source);
    report_issues(&output, options)?;

    if let Some(error) = &output.internal_error {
        eprintln!("coc: internal error: {error}");
        return Ok(ExitCode::from(2));
    }

    if let Some(c_source) = &output.c_source {
        std::fs::write(&options.output, c_source)
            .with_context(|| format!("cannot write '{}'", options.output.display()))?;
    }

    Ok(ExitCode::from(output.exit_code() as u8))
}

fn report_issues(output: &CompileOutput, options: &Options) -> Result<()> {
    if output.issues.is_empty() {
        return Ok(());
    }

    if options.json {
        let rendered: Vec<_> = output
            .issues
            .iter()
            .map(|issue| issue.render(options.locale))
            .collect();
        eprintln!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for issue in &output.issues {
            eprintln!("{}", issue.render(options.locale));
        }
    }
    Ok(())
}
