use std::{path::PathBuf, process::exit, time::Instant};

use clap::{Parser as ClapParser, Subcommand};

use nfatool::{compile_regex, determinize_file, to_dot, Automaton, AutomatonFile, Options, PublicError};

/// The command line interface of the automata toolkit
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
struct Args {
    /// The name of the sink state added during determinization
    #[arg(long)]
    sink_name: Option<String>,

    /// The prefix of the state names generated from regular expressions
    #[arg(long)]
    state_prefix: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Checks the test vectors of an automaton file and prints the classification of the automaton
    Check {
        file: PathBuf,
    },
    /// Prints for each word whether the automaton accepts it
    Accept {
        file: PathBuf,
        words: Vec<String>,
    },
    /// Compiles a regular expression in prefix notation, e.g. `.(a,*(|(b,c)))`
    Regex {
        expr: String,
        /// Remove epsilon transitions and convert the result into a DFA
        #[arg(long)]
        determinize: bool,
        /// Print in Graphviz format instead of the text encoding
        #[arg(long)]
        dot: bool,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Removes the epsilon transitions of an automaton and converts it into a DFA
    Determinize {
        file: PathBuf,
        /// Print in Graphviz format instead of the text encoding
        #[arg(long)]
        dot: bool,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Prints an automaton in Graphviz format
    Dot {
        file: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let ts = Instant::now();
    let cli = Args::parse();
    let opts = convert_options(&cli);

    match run(cli.command, &opts) {
        Ok(true) => (),
        Ok(false) => {
            log::info!("Done ({}ms).", ts.elapsed().as_millis());
            exit(1);
        }
        Err(err) => {
            log::error!("Error: {}", err);
            eprintln!("error: {}", err);
            exit(2);
        }
    }
    log::info!("Done ({}ms).", ts.elapsed().as_millis());
}

fn convert_options(args: &Args) -> Options {
    let mut opts = Options::default();
    if let Some(sink) = &args.sink_name {
        opts = opts.with_sink_name(sink.as_str());
    }
    if let Some(prefix) = &args.state_prefix {
        opts = opts.with_state_prefix(prefix.as_str());
    }
    opts
}

/// Runs the command. Returns `false` if some test vector disagrees with the automaton.
fn run(command: Command, opts: &Options) -> Result<bool, PublicError> {
    match command {
        Command::Check { file } => {
            let file = AutomatonFile::from_path(file)?;
            Ok(check(&file))
        }
        Command::Accept { file, words } => {
            let file = AutomatonFile::from_path(file)?;
            for word in words {
                let accepted = if file.automaton.accepts(&word) { "Y" } else { "N" };
                println!("{}: {}", display_word(&word), accepted);
            }
            Ok(true)
        }
        Command::Regex {
            expr,
            determinize,
            dot,
            output,
        } => {
            let automaton = compile_regex(&expr, determinize, opts)?;
            emit(&automaton, dot, output)?;
            Ok(true)
        }
        Command::Determinize { file, dot, output } => {
            let automaton = determinize_file(file, opts)?;
            emit(&automaton, dot, output)?;
            Ok(true)
        }
        Command::Dot { file, output } => {
            let file = AutomatonFile::from_path(file)?;
            emit(&file.automaton, true, output)?;
            Ok(true)
        }
    }
}

fn check(file: &AutomatonFile) -> bool {
    let automaton = &file.automaton;
    if automaton.only_epsilon_transitions() {
        log::warn!("All transitions of the automaton are epsilon transitions");
    }
    let report = file.check();

    println!("dfa: {}", expectation(report.dfa.actual, report.dfa.expected));
    println!("finite: {}", expectation(report.finite.actual, report.finite.expected));
    if let Some(words) = &report.finite_words {
        println!("accepted words ({}):", words.len());
        for w in words {
            println!("  {}", display_word(w));
        }
    }
    for (word, check) in &report.words {
        println!("{}: {}", display_word(word), expectation(check.actual, Some(check.expected)));
    }

    let mismatches = report.mismatches();
    if mismatches > 0 {
        log::warn!("{} test vector(s) disagree with the automaton", mismatches);
    }
    report.is_ok()
}

fn expectation(actual: bool, expected: Option<bool>) -> String {
    let yn = |b: bool| if b { "Y" } else { "N" };
    match expected {
        Some(e) if e == actual => format!("{} (expected {})", yn(actual), yn(e)),
        Some(e) => format!("{} (expected {}) MISMATCH", yn(actual), yn(e)),
        None => yn(actual).to_string(),
    }
}

fn display_word(word: &str) -> &str {
    if word.is_empty() {
        "_"
    } else {
        word
    }
}

fn emit(automaton: &Automaton, dot: bool, output: Option<PathBuf>) -> Result<(), PublicError> {
    let rendered = if dot {
        to_dot(automaton)
    } else {
        AutomatonFile::new(automaton.clone()).to_text()
    };
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            log::info!("Wrote automaton to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
