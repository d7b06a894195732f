use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minikt::{Session, commands, config::SessionConfig, parser, statement::Command};
use reedline::{
    DefaultPrompt, DefaultPromptSegment, Reedline, Signal, ValidationResult, Validator,
};

#[derive(Parser)]
#[command(about = "Line-oriented MiniKotlin interpreter")]
pub struct CLIArgs {
    /// Script to run line by line instead of starting the interactive reader.
    pub script_path: Option<PathBuf>,
    /// JSON session configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Stop any `while` loop after this many iterations.
    #[arg(long)]
    pub max_iterations: Option<u64>,
    /// Tracing filter for the log file, e.g. `debug`.
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Keeps reading while braces are open so loops can span several lines.
struct BalancedBraceValidator;

impl Validator for BalancedBraceValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        if parser::has_open_block(line) {
            ValidationResult::Incomplete
        } else {
            ValidationResult::Complete
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

fn run_line(session: &mut Session, config: &SessionConfig, line: &str) -> Flow {
    let result = session.execute_line_with(line, &mut |text| println!("{}", text));

    let lines = match result {
        Ok(None) => return Flow::Continue,
        Ok(Some(Command::Exit)) => {
            println!("{}", commands::GOODBYE);
            return Flow::Exit;
        }
        Ok(Some(Command::List)) => commands::list(session.environment()),
        Ok(Some(Command::Methods)) => commands::methods(session.builtins()),
        Ok(Some(Command::Help)) => vec![commands::HELP.to_string()],
        Err(error) if config.echo_errors => vec![format!("Error: {}", error)],
        Err(error) => {
            eprintln!("Error: {}", error);
            return Flow::Continue;
        }
    };

    for line in lines {
        println!("{}", line);
    }
    Flow::Continue
}

fn main() -> anyhow::Result<()> {
    let cli_args = CLIArgs::parse();

    let mut config = match &cli_args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(max_iterations) = cli_args.max_iterations {
        config.max_loop_iterations = Some(max_iterations);
    }
    if let Some(log_filter) = cli_args.log_filter {
        config.log_filter = log_filter;
    }

    minikt::logging::initialize_tracing(&config.log_filter)?;
    let mut session = Session::new(&config);

    if let Some(path) = cli_args.script_path {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("reading script at {}", path.display()))?;
        // Lines are joined while a block is open, as the interactive reader does.
        let mut pending = String::new();
        for line in source.lines() {
            if !pending.is_empty() {
                pending.push('\n');
            }
            pending.push_str(line);
            if parser::has_open_block(&pending) {
                continue;
            }
            if let Flow::Exit = run_line(&mut session, &config, &pending) {
                return Ok(());
            }
            pending.clear();
        }
        if !pending.is_empty() {
            run_line(&mut session, &config, &pending);
        }
        return Ok(());
    }

    println!("{}", commands::WELCOME);
    let mut line_editor = Reedline::create().with_validator(Box::new(BalancedBraceValidator));
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(config.prompt.clone()),
        DefaultPromptSegment::Empty,
    );

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(source)) => {
                if let Flow::Exit = run_line(&mut session, &config, &source) {
                    break;
                }
            }
            Ok(Signal::CtrlC) => {
                eprintln!("Aborted!");
                break;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", commands::GOODBYE);
                break;
            }
            Err(error) => {
                eprintln!("Error: {:?}", error);
            }
        }
    }

    Ok(())
}
