//! Wren CLI - HTML tokenizer and tree builder inspector
//!
//! Usage:
//!   wren <file>                  Parse and print the DOM outline
//!   wren <file> --format json    Print the DOM as JSON
//!   wren <file> --tokens         Also print the token stream
//!   wren <file> --issues         Also print recovered parse issues
//!   wren --html '<h1>Hello</h1>'
//!
//! If the input fails to tokenize, a generated error page is parsed and
//! printed in its place.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use owo_colors::OwoColorize;
use tracing::debug;
use wren_common::logging::init_logging;
use wren_common::warning::clear_warnings;
use wren_dom::DomTree;
use wren_html::{ParseIssue, TokenizeError, parse_with_issues, tokenize};

/// Wren - inspect how HTML is tokenized and built into a tree
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the DOM outline of a file
    wren ./index.html

    # Serialize the tree back to markup
    wren --format markup ./index.html

    # Parse inline HTML and show tokens and parse issues
    wren -t -i --html '<p>One<h2>Two</h2>'

    # Trace insertion-mode transitions
    wren -vv --html '<dl><dt>A<dd>B</dl>'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Parse an HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// How to print the tree
    #[arg(short, long, value_enum, default_value_t = Format::Outline)]
    format: Format,

    /// Print the token stream before the tree
    #[arg(short, long)]
    tokens: bool,

    /// Print the parse issues the tree builder recovered from
    #[arg(short, long)]
    issues: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Output format for the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented outline, one node per line
    Outline,
    /// Markup serialization
    Markup,
    /// Pretty-printed JSON
    Json,
}

/// Where the input came from, for messages.
fn source_label(cli: &Cli) -> String {
    cli.path
        .as_ref()
        .map_or_else(|| "<inline html>".to_owned(), |path| path.display().to_string())
}

/// Load the input from the CLI arguments.
fn load_source(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
    } else {
        bail!("no input: pass a file path or --html")
    }
}

/// Markup shown instead of a page that failed to tokenize.
fn error_page(error: &TokenizeError, label: &str) -> String {
    let label = label.replace('<', "&lt;").replace('>', "&gt;");
    format!(
        "<html><head></head><body><h2>{error}</h2><p>Failed to load '{label}'</p></body></html>"
    )
}

fn print_tokens(source: &str) {
    println!("{}", "=== Tokens ===".bold());
    match tokenize(source.as_bytes()) {
        Ok(stream) => print!("{stream}"),
        Err(error) => println!("  {} {error}", "tokenization failed:".red()),
    }
    println!();
}

fn print_tree(tree: &DomTree<'_>, format: Format) -> Result<()> {
    match format {
        Format::Outline => {
            println!("{}", "=== DOM Tree ===".bold());
            if let Some(title) = tree.title() {
                println!("{} {title}", "title:".dimmed());
            }
            print!("{}", tree.outline());
        }
        Format::Markup => println!("{tree}"),
        Format::Json => {
            let json = serde_json::to_string_pretty(&tree.dump())
                .context("failed to serialize tree")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_issues(issues: &[ParseIssue]) {
    println!("\n{}", "=== Parse Issues ===".bold());
    if issues.is_empty() {
        println!("  (none)");
    }
    for issue in issues {
        if issue.is_error {
            println!("  - {}", issue.red());
        } else {
            println!("  - {}", issue.yellow());
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    clear_warnings();

    let source = load_source(&cli)?;
    let label = source_label(&cli);
    debug!(source = %label, bytes = source.len(), "loaded input");

    if cli.tokens {
        print_tokens(&source);
    }

    let fallback;
    let (tree, issues) = match parse_with_issues(source.as_bytes()) {
        Ok(parsed) => parsed,
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            fallback = error_page(&error, &label);
            parse_with_issues(fallback.as_bytes()).context("error page failed to tokenize")?
        }
    };

    print_tree(&tree, cli.format)?;

    if cli.issues {
        print_issues(&issues);
    }

    Ok(())
}
