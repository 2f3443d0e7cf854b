use std::env;
use std::io::{BufRead, Write};

use log::debug;

use crate::ast::Node;
use crate::environment::Environment;
use crate::error::Result;
use crate::evaluator::Evaluator;

const PROMPT: &str = ">> ";

const MONKEY_FACE: &str = r#"
            __,__
   .--.  .-"     "-.  .--.
  / .. \/  .-. .-.  \/ .. \
 | |  '|  /   Y   \  |'  | |
 | \   \  \ 0 | 0 /  /   / |
  \ '- ,\.-"""""""-./, -' /
   ''-' /_   ^ ^   _\ '-''
       |  \._   _./  |
       \   \ '~' /   /
        '._ '-=-' _.'
           '-----'
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    pub prompt: String,
    /// Print the monkey face above parser errors.
    pub banner: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: PROMPT.to_string(),
            banner: true,
        }
    }
}

impl ReplConfig {
    /// Defaults, with the prompt overridable through `MONKEY_PROMPT`.
    pub fn from_env() -> Self {
        let mut config = ReplConfig::default();
        if let Ok(prompt) = env::var("MONKEY_PROMPT") {
            config.prompt = prompt;
        }
        config
    }
}

/// Reads lines until end of input, evaluating each one against a single
/// session environment.
pub fn start<R: BufRead, W: Write>(mut reader: R, mut writer: W, config: &ReplConfig) -> Result<()> {
    let env = Environment::root();
    debug!("repl session started");

    loop {
        write!(writer, "{}", config.prompt)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            return Ok(());
        }

        let (program, errors) = crate::parse(&line);
        if !errors.is_empty() {
            print_parser_errors(&mut writer, &errors, config)?;
            continue;
        }

        let evaluated = Evaluator::with_output(&mut writer).eval(Node::Program(&program), &env);
        if let Some(obj) = evaluated {
            writeln!(writer, "{}", obj.inspect())?;
        }
    }
}

fn print_parser_errors<W: Write>(mut writer: W, errors: &[String], config: &ReplConfig) -> Result<()> {
    if config.banner {
        write!(writer, "{}", MONKEY_FACE)?;
    }
    writeln!(writer, "Woops! We ran into some monkey business here!")?;
    writeln!(writer, " parser errors:")?;
    for msg in errors {
        writeln!(writer, "\t{}", msg)?;
    }
    writer.flush()?;
    Ok(())
}
