//! REPL – Read-Eval-Print Loop for the factkb interactive shell.
//!
//! Supported commands:
//!   <fact> | ?<fact> | /query <fact>  – query a ground fact
//!   +<fact> | /add <fact>             – add a static fact
//!   -<fact> | /remove <fact>          – remove a static fact
//!   /kind <predicate>                 – show how a predicate is answered
//!   /facts                            – list static facts
//!   /stats                            – knowledge base summary
//!   /help                             – show this list
//!   /quit | /exit                     – exit the shell

use colored::Colorize;
use std::io::{self, BufRead, Write};

use factkb_perception::ClassifierBank;
use factkb_runtime::KnowledgeBase;
use factkb_types::{Confidence, Fact, KbError, PredicateKind};

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Empty,
    Help,
    Quit,
    Facts,
    Stats,
    Kind(String),
    Query(String),
    Add(String),
    Remove(String),
    Unknown(String),
}

/// Result of running a [`Command`] against the knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nothing,
    Help,
    Quit,
    Answer { fact: Fact, confidence: Confidence },
    Added(Fact),
    Removed(Fact),
    Kind { predicate: String, kind: PredicateKind },
    Facts(Vec<Fact>),
    Stats {
        static_facts: usize,
        static_predicates: usize,
        perceptual_predicates: Vec<String>,
        max_objects: usize,
    },
    UnknownCommand(String),
}

/// Classify a raw input line.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };
    match head {
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        "/facts" => Command::Facts,
        "/stats" => Command::Stats,
        "/kind" => Command::Kind(rest.to_string()),
        "/query" => Command::Query(rest.to_string()),
        "/add" => Command::Add(rest.to_string()),
        "/remove" => Command::Remove(rest.to_string()),
        _ if head.starts_with('/') => Command::Unknown(line.to_string()),
        _ => {
            if let Some(fact) = line.strip_prefix('?') {
                Command::Query(fact.trim().to_string())
            } else if let Some(fact) = line.strip_prefix('+') {
                Command::Add(fact.trim().to_string())
            } else if let Some(fact) = line.strip_prefix('-') {
                Command::Remove(fact.trim().to_string())
            } else {
                Command::Query(line.to_string())
            }
        }
    }
}

/// Run `command` against `kb`.
pub fn execute<B: ClassifierBank>(
    kb: &mut KnowledgeBase<B>,
    command: Command,
) -> Result<Reply, KbError> {
    Ok(match command {
        Command::Empty => Reply::Nothing,
        Command::Help => Reply::Help,
        Command::Quit => Reply::Quit,
        Command::Facts => {
            let mut facts: Vec<Fact> = kb.static_facts().cloned().collect();
            facts.sort();
            Reply::Facts(facts)
        }
        Command::Stats => Reply::Stats {
            static_facts: kb.static_fact_count(),
            static_predicates: kb.static_predicates().count(),
            perceptual_predicates: kb.perceptual_predicates().to_vec(),
            max_objects: kb.bank().max_objects(),
        },
        Command::Kind(predicate) => {
            let kind = kb.predicate_kind(&predicate);
            Reply::Kind { predicate, kind }
        }
        Command::Query(text) => {
            let fact: Fact = text.parse()?;
            let confidence = kb.query(&fact)?;
            Reply::Answer { fact, confidence }
        }
        Command::Add(text) => {
            let fact: Fact = text.parse()?;
            kb.add_static_fact(fact.clone());
            Reply::Added(fact)
        }
        Command::Remove(text) => {
            let fact: Fact = text.parse()?;
            kb.remove_static_fact(&fact)?;
            Reply::Removed(fact)
        }
        Command::Unknown(line) => Reply::UnknownCommand(line),
    })
}

/// Entry point for the interactive REPL.  Returns on `/quit`, `/exit` or EOF.
pub fn run<B: ClassifierBank>(kb: &mut KnowledgeBase<B>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", "factkb>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        match execute(kb, parse_command(&line)) {
            Ok(Reply::Quit) => {
                println!("{}", "Goodbye.".green());
                break;
            }
            Ok(reply) => render(&reply),
            Err(e) => println!("{} {}", "Error:".red().bold(), e),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn render(reply: &Reply) {
    match reply {
        Reply::Nothing | Reply::Quit => {}
        Reply::Help => print_help(),
        Reply::Answer { fact, confidence } => {
            let verdict = if confidence.is_no_information() {
                "no information".yellow()
            } else if confidence.positive > confidence.negative {
                "true".green()
            } else {
                "false".red()
            };
            println!(
                "  {}  {}  {}",
                fact.to_string().bold(),
                confidence.to_string().dimmed(),
                verdict
            );
        }
        Reply::Added(fact) => println!("{} {}", "✓ Added".green(), fact.to_string().bold()),
        Reply::Removed(fact) => println!("{} {}", "✓ Removed".green(), fact.to_string().bold()),
        Reply::Kind { predicate, kind } => {
            let label = match kind {
                PredicateKind::Static => "static (closed-world membership)".to_string(),
                PredicateKind::Perceptual { index } => format!("perceptual (classifier #{index})"),
                PredicateKind::Unknown => "unknown (always false)".to_string(),
            };
            println!("  {} – {}", predicate.bold(), label.yellow());
        }
        Reply::Facts(facts) => {
            println!("{}", "Static Facts".bold().underline());
            for f in facts {
                println!("    • {}", f);
            }
            println!("  {} fact(s)", facts.len());
        }
        Reply::Stats {
            static_facts,
            static_predicates,
            perceptual_predicates,
            max_objects,
        } => {
            println!("{}", "Knowledge Base".bold().underline());
            println!("  Static facts          : {}", static_facts.to_string().yellow());
            println!("  Static predicates     : {}", static_predicates.to_string().yellow());
            println!(
                "  Perceptual predicates : {}",
                if perceptual_predicates.is_empty() {
                    "none".dimmed().to_string()
                } else {
                    perceptual_predicates.join(", ")
                }
            );
            println!("  Object references     : oidx_0 … oidx_{}", max_objects.saturating_sub(1));
        }
        Reply::UnknownCommand(line) => println!(
            "{} '{}'. Type {} for available commands.",
            "Unknown command:".red(),
            line.yellow(),
            "/help".bold()
        ),
    }
}

fn print_help() {
    println!();
    println!("{}", "factkb Commands".bold().underline());
    println!("  {}  – query a ground fact", "<fact>  ?<fact>  /query <fact>".bold().cyan());
    println!("  {}           – add a static fact", "+<fact>  /add <fact>".bold().cyan());
    println!("  {}        – remove a static fact", "-<fact>  /remove <fact>".bold().cyan());
    println!("  {}               – show how a predicate is answered", "/kind <pred>".bold().cyan());
    println!("  {}                     – list static facts", "/facts".bold().cyan());
    println!("  {}                     – knowledge base summary", "/stats".bold().cyan());
    println!("  {}               – exit the shell", "/quit  /exit".bold().cyan());
    println!();
}
