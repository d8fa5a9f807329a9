use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use log::{debug, info};

use kestrel::{lexer::lexer::tokenize, parse_with_config, render_error, ParserConfig};

#[derive(ClapParser, Debug)]
#[command(version, about = "Kestrel front end: tokenizes and parses source files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log parser progress to stderr (RUST_LOG overrides the level)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints every token in the file, comments included
    Tokens { file: PathBuf },

    /// Parses the file and prints the canonical program text
    Parse {
        file: PathBuf,

        /// Maximum nesting depth before a statement is abandoned
        #[arg(long, default_value_t = ParserConfig::default().max_depth)]
        max_depth: usize,

        /// Print timing information after parsing
        #[arg(long)]
        time: bool,
    },
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn read_source(file: &Path) -> Result<String> {
    info!("Reading file: {:?}", file);
    read_to_string(file).with_context(|| format!("Failed to read file {:?}", file))
}

fn file_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string_lossy().into_owned())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    debug!("CLI arguments: {:?}", cli);

    match cli.command {
        Command::Tokens { file } => {
            let source = read_source(&file)?;

            match tokenize(&source) {
                Ok(tokens) => {
                    for token in tokens {
                        println!("{}", token);
                    }
                }
                Err(error) => {
                    eprint!("{}", render_error(&error, &source, &file_name(&file)));
                    std::process::exit(65);
                }
            }
        }

        Command::Parse {
            file,
            max_depth,
            time,
        } => {
            let source = read_source(&file)?;
            let name = file_name(&file);

            let start = Instant::now();
            let tokens = match tokenize(&source) {
                Ok(tokens) => tokens,
                Err(error) => {
                    eprint!("{}", render_error(&error, &source, &name));
                    std::process::exit(65);
                }
            };
            let tokenized_in = start.elapsed();

            let parse_start = Instant::now();
            let config = ParserConfig {
                max_depth,
                ..ParserConfig::default()
            };
            let (parser, program) = parse_with_config(tokens, config);
            let parsed_in = parse_start.elapsed();

            if parser.has_errors() {
                eprintln!("{}", parser.format_errors());
                eprintln!();
                if let Some(first) = parser.errors().first() {
                    eprint!("{}", render_error(first, &source, &name));
                }
                std::process::exit(65);
            }

            println!("{}", program);

            if time {
                eprintln!("Tokenized in {:?}", tokenized_in);
                eprintln!("Parsed in {:?}", parsed_in);
            }
        }
    }

    Ok(())
}
