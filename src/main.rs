use std::env;
use std::fs;
use std::io::{stdin, stdout};
use std::process::ExitCode;

use log::error;

use monkey_interpreter::repl::{self, ReplConfig};
use monkey_interpreter::{Error, Result};

fn run_file(path: &str) -> Result<()> {
    let source = fs::read_to_string(path)?;
    if let Some(obj) = monkey_interpreter::run(&source)? {
        println!("{}", obj.inspect());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let result = match env::args().nth(1) {
        Some(path) => run_file(&path),
        None => repl::start(stdin().lock(), stdout().lock(), &ReplConfig::from_env()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ Error::Parse(_)) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
