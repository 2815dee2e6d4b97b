//! fontspider CLI
//!
//! Finds the characters a static site renders with each of its web fonts
//! and subsets the fonts down to them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use fontspider_compact::{PyftsubsetCommand, ReserveText, SpiderOptions, SpiderReport, plan, spider};
use fontspider_html::parse_document;
use fontspider_resolve::DeclaredFamilyMap;
use owo_colors::OwoColorize;

/// fontspider: shrink web fonts to the glyphs a site uses
#[derive(Parser, Debug)]
#[command(name = "fontspider")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Subset every font used by the pages under ./public
    fontspider ./public

    # See what would be kept, without touching any font
    fontspider --dry-run ./public

    # Only the blog, keeping digits for a script-driven counter
    fontspider -s 'blog/**/*.html' --reserve 0123456789 ./public

    # Machine-readable family map
    fontspider --dry-run --json ./public

    # Settings from a file (keys: root, sources, ignore, backup, reserveText)
    fontspider --config fontspider.json
"#)]
struct Cli {
    /// Site root; root-absolute references such as `/css/site.css` resolve here
    #[arg(value_name = "ROOT", required_unless_present_any = ["config", "dump_dom"])]
    root: Option<PathBuf>,

    /// Document pattern relative to the root (repeatable, default `**/*.html`)
    #[arg(short = 's', long = "source", value_name = "GLOB")]
    sources: Vec<String>,

    /// Pattern of documents to skip (repeatable)
    #[arg(short = 'i', long, value_name = "GLOB")]
    ignore: Vec<String>,

    /// Rewrite fonts without keeping a `.backup` copy
    #[arg(long)]
    no_backup: bool,

    /// Characters to keep in every font
    #[arg(long, value_name = "TEXT", conflicts_with = "reserve_map")]
    reserve: Option<String>,

    /// JSON object of family name to characters to keep in that font
    #[arg(long, value_name = "JSON FILE")]
    reserve_map: Option<PathBuf>,

    /// JSON file with default settings; flags override it
    #[arg(long, value_name = "JSON FILE")]
    config: Option<PathBuf>,

    /// Resolve and print the family map without rewriting any font
    #[arg(long)]
    dry_run: bool,

    /// Print the family map as JSON
    #[arg(long)]
    json: bool,

    /// Print the parsed DOM tree of an HTML file and exit
    #[arg(long, value_name = "HTML FILE")]
    dump_dom: Option<PathBuf>,

    /// The fontTools subsetter to run
    #[arg(long, value_name = "PROGRAM", default_value = "pyftsubset")]
    pyftsubset: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run finished without errors.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    if let Some(path) = &cli.dump_dom {
        let html = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        print!("{}", parse_document(&html).print_tree());
        return Ok(true);
    }

    let options = options_from(cli)?;

    if cli.dry_run {
        let resolution = plan(&options)?;
        print_map(&resolution.map, cli.json)?;
        return Ok(resolution.is_complete());
    }

    let report = spider(&options, &PyftsubsetCommand::new(&cli.pyftsubset));
    if cli.json {
        print_map(&report.map, true)?;
    } else {
        print_report(&report);
    }
    Ok(report.is_success())
}

/// Settings from `--config`, overridden by the flags.
fn options_from(cli: &Cli) -> anyhow::Result<SpiderOptions> {
    let mut options = match &cli.config {
        Some(path) => load_config(path)?,
        None => SpiderOptions::new(cli.root.clone().unwrap_or_default()),
    };

    if let Some(root) = &cli.root {
        options.root.clone_from(root);
    }
    if !cli.sources.is_empty() {
        options.sources.clone_from(&cli.sources);
    }
    options.ignore.extend(cli.ignore.iter().cloned());
    if cli.no_backup {
        options.backup = false;
    }
    if let Some(text) = &cli.reserve {
        options.reserve_text = ReserveText::All(text.clone());
    }
    if let Some(path) = &cli.reserve_map {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let map: HashMap<String, String> = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a JSON object of strings", path.display()))?;
        options.reserve_text = ReserveText::PerFamily(map);
    }

    Ok(options)
}

/// A relative `root` in a config file is relative to the file.
fn load_config(path: &Path) -> anyhow::Result<SpiderOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut options: SpiderOptions = serde_json::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    if options.root.is_relative() {
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        options.root = dir.join(&options.root);
    }
    Ok(options)
}

fn print_map(map: &DeclaredFamilyMap, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(map)?);
        return Ok(());
    }

    if map.is_empty() {
        println!("{}", "No @font-face font with an existing file was found.".dimmed());
    }
    for (name, entry) in map.iter() {
        println!("{}  {}", name.bold().cyan(), entry.path.display().dimmed());
        if !entry.selectors.is_empty() {
            println!("  selectors: {}", entry.selectors.join(", "));
        }
        println!("  chars ({}): {}", entry.chars.chars().count(), entry.chars);
    }
    Ok(())
}

fn print_report(report: &SpiderReport) {
    for path in &report.written {
        println!("{} {}", "✔ compacted".green(), path.display());
    }
    for name in &report.skipped {
        println!("{} {name}", "– skipped".yellow());
    }
    if !report.errors.is_empty() {
        println!("{}", format!("✖ {} error(s), see above", report.errors.len()).red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fontspider").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_build_options() {
        let options = options_from(&cli(&[
            "-s",
            "a/*.html",
            "--source",
            "b/*.html",
            "-i",
            "drafts/**",
            "--no-backup",
            "--reserve",
            "01",
            "site",
        ]))
        .unwrap();

        assert_eq!(options.root, PathBuf::from("site"));
        assert_eq!(options.sources, vec!["a/*.html", "b/*.html"]);
        assert_eq!(options.ignore, vec!["drafts/**"]);
        assert!(!options.backup);
        assert_eq!(options.reserve_text, ReserveText::All("01".to_string()));
    }

    #[test]
    fn test_root_is_required_without_config() {
        assert!(Cli::try_parse_from(["fontspider"]).is_err());
        assert!(Cli::try_parse_from(["fontspider", "--reserve", "a", "--reserve-map", "m.json", "site"]).is_err());
    }
}
