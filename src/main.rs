use clap::{Parser as ClapParser, Subcommand};
use log::{debug, info, LevelFilter};
use sen::config::Config;
use sen::source::read_source;
use sen::{parse_source, CompilerError, Lexer, Program};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(author, version, about = "Sen language front end")]
struct Cli {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a source file
    Check {
        file: PathBuf,
    },
    /// Print the token stream of a source file
    Tokens {
        file: PathBuf,
    },
    /// Print the syntax tree of a source file
    Ast {
        file: PathBuf,
    },
    /// Print the symbol table of a source file as JSON
    Symbols {
        file: PathBuf,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the active configuration
    Show,
    /// Write a configuration file with defaults
    Init,
}

fn init_logging(verbose: u8, config: &Config) {
    let level = match verbose {
        0 => config.level_filter(),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

/// Parses `path`, printing the diagnostic against the source on failure.
fn parse_file(path: &Path, config: &Config) -> Result<Program, CompilerError> {
    let source = read_source(path)?;
    info!("Parsing {}", path.display());

    parse_source(&source).map_err(|err| {
        if config.show_snippet {
            eprint!("{}", err.render(path, &source));
        } else {
            eprintln!("{}", err);
        }
        CompilerError::Parse(err)
    })
}

fn run(command: Commands, config: &Config) -> Result<(), CompilerError> {
    match command {
        Commands::Check { file } => {
            let program = parse_file(&file, config)?;
            debug!("{} functions declared", program.symbols.functions().count());
            println!("sen::Parsing complete!");
        }
        Commands::Tokens { file } => {
            let source = read_source(&file)?;
            for token in Lexer::new(&source).tokenize() {
                println!("{}", token);
            }
        }
        Commands::Ast { file } => {
            let program = parse_file(&file, config)?;
            for statement in &program.body {
                print!("{}", statement);
            }
        }
        Commands::Symbols { file } => {
            let program = parse_file(&file, config)?;
            println!("{}", program.symbols.to_json()?);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("# {}", Config::get_config_path().display());
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            ConfigCommands::Init => {
                let path = Config::get_config_path();
                if path.exists() {
                    println!("Config file already exists at: {}", path.display());
                } else {
                    Config::default().save_to(&path)?;
                    println!("Initialized new config file at: {}", path.display());
                }
            }
        },
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose, &config);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        // Already rendered against the source.
        Err(CompilerError::Parse(_)) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
