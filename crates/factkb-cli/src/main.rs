//! `factkb-cli` – factkb Command Line Interface
//!
//! This binary is the entry point for querying a knowledge base by hand.
//! It:
//!
//! 1. Checks for `~/.factkb/config.toml`; runs a **First-Run Wizard** when
//!    the file is absent.
//! 2. Loads the ontology, the static fact file and the optional classifier
//!    table, reporting any fact lines that were skipped.
//! 3. Answers each command-line argument as a query and exits, or drops the
//!    user into an **interactive REPL** when no arguments are given.
//! 4. Intercepts **Ctrl-C**, flushing pending spans before exiting.

mod config;
mod repl;

use colored::Colorize;
use std::process::ExitCode;
use tracing::warn;

use factkb_runtime::KnowledgeBase;

fn main() -> ExitCode {
    // Held for the whole process so pending spans are flushed on exit.
    let telemetry = factkb_runtime::init_tracing("factkb");

    let queries: Vec<String> = std::env::args().skip(1).collect();
    if queries.is_empty() {
        print_banner();
    }

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    // The REPL blocks on stdin, so the handler exits directly. `exit` skips
    // the telemetry guard's destructor; flush first.
    let flusher = telemetry.flush_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        flusher.flush();
        println!();
        println!("{}", "⚠  Ctrl-C received – exiting factkb.".yellow().bold());
        std::process::exit(130);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    // ── First-Run Wizard ──────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            if queries.is_empty() {
                println!(
                    "  Config loaded from {}",
                    config::config_path().display().to_string().bold()
                );
            }
            cfg
        }
        Ok(None) if queries.is_empty() => {
            let mut cfg = run_first_run_wizard();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        Ok(None) => config::default_with_env_overrides(),
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::default_with_env_overrides()
        }
    };

    // ── Knowledge base ────────────────────────────────────────────────────
    let mut kb = match KnowledgeBase::from_config(&cfg.knowledge_base_config()) {
        Ok(kb) => kb,
        Err(e) => {
            eprintln!("{} {}", "Failed to load knowledge base:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    print_load_summary(&kb, &cfg, queries.is_empty());

    // ── One-shot queries ──────────────────────────────────────────────────
    if !queries.is_empty() {
        let mut failed = false;
        for q in &queries {
            match kb.query_text(q) {
                Ok(c) => println!("{}\t{}\t{}", q.trim(), c.positive, c.negative),
                Err(e) => {
                    eprintln!("{}\t{} {}", q.trim(), "error:".red(), e);
                    failed = true;
                }
            }
        }
        return if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    println!(
        "  Type {} for a list of commands.\n",
        "/help".bold().cyan()
    );

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(&mut kb);
    ExitCode::SUCCESS
}

// ─────────────────────────────────────────────────────────────────────────────
// First-Run Wizard
// ─────────────────────────────────────────────────────────────────────────────

fn run_first_run_wizard() -> config::Config {
    println!();
    println!("{}", "  ╔══════════════════════════════════════╗".bold().cyan());
    println!("{}", "  ║       factkb First-Run Wizard        ║".bold().cyan());
    println!("{}", "  ╚══════════════════════════════════════╝".bold().cyan());
    println!();
    println!("  No configuration found.  Let's set up factkb.\n");

    let mut cfg = config::Config::default();

    let facts = prompt_line(
        &format!("  Static fact file [{}]: ", cfg.facts_path.display()),
        &cfg.facts_path.display().to_string(),
    );
    cfg.facts_path = facts.into();

    let ontology = prompt_line(
        &format!("  Ontology file [{}]: ", cfg.ontology_path.display()),
        &cfg.ontology_path.display().to_string(),
    );
    cfg.ontology_path = ontology.into();

    let table = prompt_line("  Classifier table (JSON, empty for none) []: ", "");
    if !table.is_empty() {
        cfg.classifier_table_path = Some(table.into());
    }

    let objects = prompt_line(
        &format!("  Number of objects [{}]: ", cfg.max_objects),
        &cfg.max_objects.to_string(),
    );
    match objects.parse::<usize>() {
        Ok(n) if n > 0 => cfg.max_objects = n,
        _ => println!(
            "  {} '{}' is not a positive integer, keeping {}",
            "Warning:".yellow(),
            objects,
            cfg.max_objects
        ),
    }

    match config::save(&cfg) {
        Ok(()) => println!(
            "\n  {} Config saved to {}\n",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
    cfg
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("  {} {}",
        "factkb".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Hybrid symbolic / perceptual fact-query engine");
    println!();
}

fn print_load_summary<B: factkb_perception::ClassifierBank>(
    kb: &KnowledgeBase<B>,
    cfg: &config::Config,
    verbose: bool,
) {
    let report = kb.load_report();
    for skipped in &report.skipped {
        eprintln!(
            "  {} {}:{} '{}' ({})",
            "Skipped".yellow(),
            cfg.facts_path.display(),
            skipped.line_number,
            skipped.text,
            skipped.reason
        );
    }
    if verbose {
        println!(
            "  Loaded {} fact(s) ({} stored after expansion) from {}",
            report.facts_declared.to_string().bold(),
            report.facts_stored,
            cfg.facts_path.display().to_string().bold()
        );
        println!(
            "  Perceptual predicates: {}",
            if kb.perceptual_predicates().is_empty() {
                "none".dimmed().to_string()
            } else {
                kb.perceptual_predicates().join(", ")
            }
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn prompt_line(msg: &str, default: &str) -> String {
    use std::io::{BufRead, Write};
    print!("{}", msg);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let t = line.trim().to_string();
            if t.is_empty() { default.to_string() } else { t }
        }
        Err(_) => default.to_string(),
    }
}
