use std::{
    io::{stderr, stdin, stdout, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use errors::ExitStatus;

#[derive(clap::Parser)]
#[command(about = "Scan, parse and evaluate Lox expressions")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print the tokens of a file, one per line
    Tokenize { file: PathBuf },
    /// Print each expression of a file in parenthesized prefix notation
    Parse { file: PathBuf },
    /// Print the value of each expression of a file, or start a prompt if no file is given
    Evaluate { file: Option<PathBuf> },
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading `{}` failed", path.display()))
}

fn run_prompt() -> anyhow::Result<ExitStatus> {
    loop {
        print!("> ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            return Ok(ExitStatus::Success);
        }
        // Errors are already reported, keep going
        runner::evaluate(line.as_bytes(), &mut stdout(), &mut stderr())?;
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("Running {:?}", args.command);

    let status = match args.command {
        Command::Tokenize { file } => {
            runner::tokenize(&read_file(&file)?, &mut stdout(), &mut stderr())?
        }
        Command::Parse { file } => runner::parse(&read_file(&file)?, &mut stdout(), &mut stderr())?,
        Command::Evaluate { file: Some(file) } => {
            runner::evaluate(&read_file(&file)?, &mut stdout(), &mut stderr())?
        }
        Command::Evaluate { file: None } => run_prompt()?,
    };

    Ok(status.into())
}
