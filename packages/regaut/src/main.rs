use std::{fmt::Display, fs::File, str::FromStr, sync::Mutex};

use chrono::Local;
use clap::Parser;
use colored::Colorize;
use regaut_lib::{
    automaton::render::to_graphviz_display,
    config::{GeneralConfig, LoggerConfig, RegautConfig},
    pipeline::Pipeline,
};

/// What to do with the regex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Print the postfix form and the regex rendered back from it.
    Postfix,
    /// Check the given words against every automaton.
    Accept,
    /// Build the NFA, DFA and minimized DFA and report their sizes.
    Convert,
    /// Synthesize a regex by state elimination.
    Eliminate,
    /// Compute the edit distance of the given words to the language.
    Correct,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postfix" | "p" => Ok(Mode::Postfix),
            "accept" | "a" => Ok(Mode::Accept),
            "convert" | "c" => Ok(Mode::Convert),
            "eliminate" | "e" => Ok(Mode::Eliminate),
            "correct" | "x" => Ok(Mode::Correct),
            _ => Err(format!("Invalid mode: {}", s)),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Postfix => write!(f, "postfix"),
            Mode::Accept => write!(f, "accept"),
            Mode::Convert => write!(f, "convert"),
            Mode::Eliminate => write!(f, "eliminate"),
            Mode::Correct => write!(f, "correct"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "Regex Automata Tool")]
#[command(version = "0.1")]
#[command(about = "Convert between regexes and finite automata", long_about = None)]
struct Args {
    regex: String,

    /// Input words for the `accept` and `correct` modes.
    words: Vec<String>,

    #[arg(short, long, default_value_t = Mode::Convert)]
    mode: Mode,

    #[arg(short, long)]
    config: Option<String>,

    /// Print the relevant automaton in the graphviz DOT format.
    #[arg(long)]
    dot: bool,
}

fn init_logging(config: &LoggerConfig) -> anyhow::Result<()> {
    if !*config.get_enabled() {
        return Ok(());
    }

    let level = config.get_log_level().to_tracing_level();

    if *config.get_log_file() {
        std::fs::create_dir_all("./logs")?;
        let path = format!(
            "./logs/regaut_run_{}.txt",
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let file = File::create(path)?;

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = RegautConfig::from_optional_file(args.config)?;
    init_logging(config.logger())?;
    tracing::info!(mode = %args.mode, regex = args.regex, "Starting");

    let pipeline = Pipeline::new(config);

    match args.mode {
        Mode::Postfix => {
            let compiled = pipeline.compile(&args.regex)?;
            println!("{}", compiled.postfix);
            println!(
                "{}",
                regaut_lib::regex::compiler::construct_string(&compiled.postfix)?
            );
        }
        Mode::Accept => {
            let compiled = pipeline.compile(&args.regex)?;

            for word in &args.words {
                let report = Pipeline::accepts_compiled(&compiled, word);
                let verdict = if !report.consistent() {
                    "inconsistent".bright_red()
                } else if report.nfa {
                    "accepted".bright_green()
                } else {
                    "rejected".yellow()
                };
                eprintln!("{:?}: {}", word, verdict);
                print_json(&report)?;
            }

            if args.dot {
                println!("{}", to_graphviz_display(compiled.final_dfa()));
            }
        }
        Mode::Convert => {
            print_json(&pipeline.report(&args.regex)?)?;

            if args.dot {
                let compiled = pipeline.compile(&args.regex)?;
                println!("{}", to_graphviz_display(&compiled.nfa));
                println!("{}", to_graphviz_display(compiled.final_dfa()));
            }
        }
        Mode::Eliminate => {
            let report = pipeline.report(&args.regex)?;
            match (&report.synthesized, report.equivalent) {
                (None, _) => eprintln!("{}", "The language is empty".yellow()),
                (Some(regex), Some(false)) => {
                    eprintln!("{} {}", regex, "(not equivalent)".bright_red())
                }
                (Some(regex), _) => eprintln!("{}", regex.bright_green()),
            }
            print_json(&report)?;
        }
        Mode::Correct => {
            for word in &args.words {
                let report = pipeline.correct(&args.regex, word)?;
                match report.distance {
                    Some(0) => eprintln!("{:?}: {}", word, "accepted".bright_green()),
                    Some(distance) => eprintln!(
                        "{:?}: {}",
                        word,
                        format!("distance {}", distance).yellow()
                    ),
                    None => eprintln!("{:?}: {}", word, "no match possible".bright_red()),
                }
                print_json(&report)?;
            }
        }
    }

    Ok(())
}
