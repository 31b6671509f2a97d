//! Wiki Extract CLI
//!
//! Fetches page extracts from the MediaWiki Action API and prints
//! summaries, section trees, section text, and coordinates.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wiki_extractor::{PageSource, WikiClient, WikiConfig, WikiPage, excise};

/// Wiki Extract - structured access to Wikipedia page extracts
#[derive(Parser)]
#[command(name = "wiki-extract")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for pages matching a query
    Search {
        /// The search query
        query: String,

        /// Maximum number of titles to return
        #[arg(short = 'n', long, default_value_t = 1)]
        limit: usize,
    },

    /// Print a page's summary
    Summary {
        /// Page title
        title: String,

        /// Maximum number of sentences to print
        #[arg(short, long)]
        sentences: Option<usize>,
    },

    /// Print a page's section tree
    Sections {
        /// Page title
        title: String,

        /// Output as JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },

    /// Print one section's text
    Section {
        /// Page title
        title: String,

        /// Section title (any level)
        section: String,

        /// Maximum number of sentences per body
        #[arg(short, long)]
        sentences: Option<usize>,

        /// Remove parenthesised asides from the text
        #[arg(long)]
        strip_brackets: bool,
    },

    /// Print a page's geographic coordinates
    Coords {
        /// Page title
        title: String,
    },

    /// Print the whole page as plain text
    Text {
        /// Page title
        title: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = build_client()?;

    match cli.command {
        Commands::Search { query, limit } => cmd_search(&client, &query, limit),
        Commands::Summary { title, sentences } => cmd_summary(&client, &title, sentences),
        Commands::Sections { title, json } => cmd_sections(&client, &title, json),
        Commands::Section {
            title,
            section,
            sentences,
            strip_brackets,
        } => cmd_section(&client, &title, &section, sentences, strip_brackets),
        Commands::Coords { title } => cmd_coords(&client, &title),
        Commands::Text { title } => cmd_text(&client, &title),
    }
}

fn build_client() -> Result<WikiClient> {
    let config = WikiConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    WikiClient::new(config).context("Failed to build HTTP client")
}

fn cmd_search(client: &WikiClient, query: &str, limit: usize) -> Result<()> {
    let titles = client.search(query, limit).context("Search failed")?;

    if titles.is_empty() {
        println!("No pages found.");
    } else {
        for title in titles {
            println!("{}", title);
        }
    }

    Ok(())
}

fn cmd_summary(client: &WikiClient, title: &str, sentences: Option<usize>) -> Result<()> {
    let mut page = WikiPage::open(client, title).context("Failed to open page")?;
    println!("{}", page.summary(sentences)?);
    Ok(())
}

fn cmd_sections(client: &WikiClient, title: &str, json: bool) -> Result<()> {
    let mut page = WikiPage::open(client, title).context("Failed to open page")?;

    if json {
        let sections = page.sections()?;
        let rendered =
            serde_json::to_string_pretty(sections).context("Failed to serialize sections")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{}", page);
    let sections = page.sections()?;
    if sections.is_empty() {
        println!("(no sections)");
    }
    for section in sections {
        print!("{}", section.format_tree(0));
    }

    Ok(())
}

fn cmd_section(
    client: &WikiClient,
    title: &str,
    section: &str,
    sentences: Option<usize>,
    strip_brackets: bool,
) -> Result<()> {
    let mut page = WikiPage::open(client, title).context("Failed to open page")?;
    let content = page.section(section, sentences)?;

    let body = if strip_brackets {
        excise(&content.text)
    } else {
        content.text.clone()
    };
    println!("== {} ==", content.title);
    println!("{}", body);

    for sub in &content.subsections {
        let sub_body = if strip_brackets {
            excise(&sub.text)
        } else {
            sub.text.clone()
        };
        println!("\n=== {} ===", sub.title);
        println!("{}", sub_body);
    }

    Ok(())
}

fn cmd_coords(client: &WikiClient, title: &str) -> Result<()> {
    match client
        .fetch_coordinates(title)
        .context("Coordinate lookup failed")?
    {
        Some((lat, lon)) => println!("{} {}", lat, lon),
        None => println!("No coordinates."),
    }
    Ok(())
}

fn cmd_text(client: &WikiClient, title: &str) -> Result<()> {
    let mut page = WikiPage::open(client, title).context("Failed to open page")?;
    println!("{}", page.text()?);
    Ok(())
}
