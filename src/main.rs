use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use regex::Regex;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::LazyLock;

use maildown_lib::config::ArchiveConfig;
use maildown_lib::pipeline::{MessageMeta, Normalizer};
use maildown_lib::{linkref, page};

/// Pattern: message coordinates in an archive-shaped path,
/// `<list>/<year-month>/<id>.html`.
static PATH_COORDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^/\\]+)[/\\](\d{4}-[A-Za-z]+)[/\\](\d+)\.html$").unwrap());

#[derive(Parser)]
#[command(name = "maildown", version, about = "Beautify mailing-list archive pages into Markdown")]
struct Cli {
    /// Archive pages or raw preformatted bodies; `-` reads stdin
    #[arg(default_value = "-")]
    paths: Vec<String>,

    /// Render HTML (with the numbered-reference extension) instead of Markdown
    #[arg(long)]
    html: bool,

    /// Rewrite archive links to the local rendered form
    #[arg(long)]
    rewrite_links: bool,

    /// Mailing-list name, when it cannot be derived from the input path
    #[arg(long, default_value = "")]
    list: String,

    /// Archive month (`YYYY-Month`), when it cannot be derived from the path
    #[arg(long, default_value = "")]
    year_month: String,

    /// Message id, when it cannot be derived from the path
    #[arg(long, default_value = "")]
    id: String,

    /// Configuration file (defaults to ./maildown.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

/// An input is either a full archive page or an already-extracted body; pages
/// are recognizable by their markup.
fn body_of(input: &str) -> Result<&str> {
    match page::extract_preformatted(input) {
        Ok(body) => Ok(body),
        Err(err) => {
            let lowered = input.to_ascii_lowercase();
            if lowered.contains("<html") || lowered.contains("<!doctype") {
                Err(err).context("input looks like an archive page")
            } else {
                Ok(input)
            }
        }
    }
}

fn process(cli: &Cli, normalizer: &Normalizer, path: &str) -> Result<String> {
    let input = read_input(path)?;
    let body = body_of(&input)?;

    let coords = PATH_COORDS_RE.captures(path);
    let meta = match &coords {
        Some(caps) => MessageMeta {
            list: caps.get(1).map_or("", |m| m.as_str()),
            year_month: caps.get(2).map_or("", |m| m.as_str()),
            id: caps.get(3).map_or("", |m| m.as_str()),
        },
        None => MessageMeta {
            list: &cli.list,
            year_month: &cli.year_month,
            id: &cli.id,
        },
    };

    let markdown = normalizer.normalize_body(body, &meta, cli.rewrite_links);
    if cli.html {
        Ok(linkref::render_html(&markdown))
    } else {
        Ok(markdown)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ArchiveConfig::load(path)?,
        None => ArchiveConfig::discover()?,
    };
    let normalizer = Normalizer::new(config);

    let outputs: Vec<Result<String>> = cli
        .paths
        .par_iter()
        .map(|path| process(&cli, &normalizer, path))
        .collect();

    let mut stdout = std::io::stdout().lock();
    for output in outputs {
        stdout.write_all(output?.as_bytes()).context("failed to write output")?;
    }
    Ok(())
}
