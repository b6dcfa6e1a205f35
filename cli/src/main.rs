//! tableqa CLI - extract PDF tables and ask questions about them.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tableqa::{
    render, ExtractOptions, Grid, OpenAiClient, OpenAiConfig, Session, TableExtractor,
};

#[derive(Parser)]
#[command(name = "tableqa")]
#[command(version)]
#[command(about = "Extract tables from PDFs and answer questions about them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tables and print them
    Tables {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output tables as JSON instead of aligned text
        #[arg(long)]
        json: bool,

        /// Abort on the first failing page instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Index the document's tables and answer questions
    Ask {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Question to answer; omit for an interactive session
        #[arg(value_name = "QUESTION")]
        question: Option<String>,

        /// Number of tables retrieved per question
        #[arg(long, default_value_t = 4)]
        top_k: usize,

        /// Completion model
        #[arg(long)]
        model: Option<String>,

        /// Embedding model
        #[arg(long)]
        embedding_model: Option<String>,

        /// API base URL (for OpenAI-compatible providers)
        #[arg(long)]
        base_url: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tables {
            input,
            json,
            strict,
        } => cmd_tables(&input, json, strict),
        Commands::Info { input } => cmd_info(&input),
        Commands::Ask {
            input,
            question,
            top_k,
            model,
            embedding_model,
            base_url,
            timeout_secs,
        } => cmd_ask(
            &input,
            question.as_deref(),
            top_k,
            model,
            embedding_model,
            base_url,
            timeout_secs,
        ),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_tables(input: &PathBuf, json: bool, strict: bool) -> tableqa::Result<()> {
    let options = if strict {
        ExtractOptions::new().strict()
    } else {
        ExtractOptions::default()
    };

    let spinner = make_spinner(format!("Extracting tables from {}...", input.display()));
    let tables = tableqa::extract_tables_with_options(input, options)?;
    spinner.finish_and_clear();

    if json {
        println!("{}", render::to_json(&tables, true)?);
        return Ok(());
    }

    if tables.is_empty() {
        println!("{}", "No tables found.".yellow());
        return Ok(());
    }

    print_tables(&tables);
    Ok(())
}

fn cmd_info(input: &PathBuf) -> tableqa::Result<()> {
    let extractor = TableExtractor::open(input)?;
    let page_count = extractor.page_count();

    let spinner = make_spinner("Scanning pages...".to_string());
    let tables = extractor.extract()?;
    spinner.finish_and_clear();

    println!("{}: {}", "File".cyan().bold(), input.display());
    println!("{}: {}", "Pages".cyan().bold(), page_count);
    println!("{}: {}", "Tables".cyan().bold(), tables.len());

    for raw in &tables {
        println!(
            "  page {:>3}  {} row(s), up to {} column(s)",
            raw.page,
            raw.row_count(),
            raw.max_row_len()
        );
    }

    Ok(())
}

fn cmd_ask(
    input: &PathBuf,
    question: Option<&str>,
    top_k: usize,
    model: Option<String>,
    embedding_model: Option<String>,
    base_url: Option<String>,
    timeout_secs: u64,
) -> tableqa::Result<()> {
    let mut config = OpenAiConfig::from_env()?.with_timeout(Duration::from_secs(timeout_secs));
    if let Some(model) = model {
        config = config.with_chat_model(model);
    }
    if let Some(model) = embedding_model {
        config = config.with_embedding_model(model);
    }
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }

    let client = Arc::new(OpenAiClient::new(config)?);

    let spinner = make_spinner(format!("Indexing {}...", input.display()));
    let session = Session::open(input, client.clone(), client)?.with_top_k(top_k);
    spinner.finish_and_clear();
    log::info!("indexed {} table(s)", session.tables().len());

    if session.tables().is_empty() {
        println!("{}", "No tables found in the document.".yellow());
    } else {
        print_tables(session.tables());
    }

    match question {
        Some(q) => {
            let answer = session.ask(q)?;
            println!("{}", answer);
        }
        None => interactive_loop(&session)?,
    }

    Ok(())
}

/// Read questions from stdin until EOF or an exit command. A failed
/// question is reported and the loop continues; the index stays usable.
fn interactive_loop(session: &Session) -> tableqa::Result<()> {
    println!(
        "{}",
        "Ask a question about the tables (\"exit\" to quit):".bold()
    );

    let stdin = io::stdin();
    loop {
        print!("{} ", "?".green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match session.ask(question) {
            Ok(answer) => println!("{}\n", answer),
            Err(e) => eprintln!("{} {}\n", "Error:".red().bold(), e),
        }
    }

    Ok(())
}

fn print_tables(tables: &[Grid]) {
    for (i, table) in tables.iter().enumerate() {
        println!(
            "{}",
            format!(
                "Table {} (page {}, {}x{})",
                i + 1,
                table.page,
                table.row_count(),
                table.column_count()
            )
            .cyan()
            .bold()
        );
        println!("{}\n", render::to_aligned_text(table));
    }
}

fn make_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
