use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::HistoryConfig;
use crate::indexer::HistoryIndex;
use crate::logging::init_logging;
use crate::models::PromptRecord;
use crate::utils::{format_path_with_tilde, sanitize_for_display};

const DISPLAY_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "ai-prompt-history")]
#[command(version = "0.1.0")]
#[command(about = "Search through Claude Code prompt history", long_about = None)]
pub struct Cli {
    /// Claude directory to read (defaults to $CLAUDE_CONFIG_DIR or ~/.claude)
    #[arg(long, global = true, value_name = "DIR")]
    pub claude_dir: Option<PathBuf>,

    /// Directory for the prompt cache (defaults to the platform cache directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Parse every session file and leave the cache untouched
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Number of parallel parse workers
    #[arg(long, global = true, value_name = "N")]
    pub workers: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search prompts (all prompts when no query is given)
    Search {
        /// Case-insensitive text to look for
        #[arg(default_value = "")]
        query: String,

        /// Only projects whose path contains this (repeatable)
        #[arg(short = 'p', long = "project", value_name = "NAME")]
        projects: Vec<String>,

        /// Skip projects whose path contains this (repeatable)
        #[arg(short = 'e', long = "exclude-project", value_name = "NAME")]
        exclude_projects: Vec<String>,

        /// Maximum number of results to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print every match as JSON
        #[arg(long)]
        json: bool,
    },
    /// List project directories
    Projects,
    /// Show statistics about the history and the cache
    Stats,
    /// Delete the prompt cache
    ClearCache,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let mut index = HistoryIndex::new(build_config(&cli)?)?;

    match command {
        Commands::Search { query, projects, exclude_projects, limit, json } => {
            let limit = limit.unwrap_or(index.config().max_results);
            search(&mut index, query, projects, exclude_projects, limit, *json)?;
        }
        Commands::Projects => show_projects(&index),
        Commands::Stats => show_stats(&mut index),
        Commands::ClearCache => {
            index.clear_cache();
            println!("Prompt cache cleared");
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<HistoryConfig> {
    let mut config = match &cli.claude_dir {
        Some(dir) => HistoryConfig::new(dir),
        None => HistoryConfig::from_env()?,
    };
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }
    if cli.no_cache {
        config = config.with_cache(false);
    }
    Ok(config)
}

fn search(
    index: &mut HistoryIndex,
    query: &str,
    projects: &[String],
    exclude_projects: &[String],
    limit: usize,
    json: bool,
) -> Result<()> {
    let projects: Vec<&str> = projects.iter().map(String::as_str).collect();
    let exclude_projects: Vec<&str> = exclude_projects.iter().map(String::as_str).collect();
    let prompts = index.search(query, &projects, &exclude_projects);

    if json {
        let out = serde_json::to_string_pretty(&prompts).context("Failed to serialize prompts")?;
        println!("{}", out);
        return Ok(());
    }

    if prompts.is_empty() {
        eprintln!("No prompts found.");
        return Ok(());
    }

    for (i, prompt) in prompts.iter().take(limit).enumerate() {
        print_prompt(i + 1, prompt);
    }
    if prompts.len() > limit {
        println!("... {} more (use --limit to show more)", prompts.len() - limit);
    }
    Ok(())
}

fn print_prompt(position: usize, prompt: &PromptRecord) {
    println!("{}. {}", position, sanitize_for_display(&prompt.text, DISPLAY_WIDTH));
    println!("   project: {}", sanitize_for_display(&prompt.project_name(), DISPLAY_WIDTH));
    println!("   date:    {}", prompt.timestamp.format("%Y-%m-%d %H:%M"));
    println!();
}

fn show_projects(index: &HistoryIndex) {
    let projects = index.list_project_names();
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }

    println!("Found {} project(s):", projects.len());
    for name in projects {
        println!("  {}", sanitize_for_display(&name, DISPLAY_WIDTH));
    }
}

fn show_stats(index: &mut HistoryIndex) {
    let prompts = index.load_all(false);

    println!("Claude Code Prompt History Statistics");
    println!("=====================================");
    println!("Total prompts: {}", prompts.len());
    println!("Projects: {}", index.list_project_names().len());
    println!("Claude directory: {}", format_path_with_tilde(&index.config().claude_dir));

    if let Some(newest) = prompts.first() {
        println!("Newest prompt: {}", newest.timestamp.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(oldest) = prompts.last() {
        println!("Oldest prompt: {}", oldest.timestamp.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(report) = index.last_report() {
        println!(
            "Session files: {} ({} from cache, {} parsed, {} failed)",
            report.files_discovered, report.cache_hits, report.files_parsed, report.files_failed
        );
        if let Some(warning) = &report.cache_warning {
            println!("Cache warning: {}", warning);
        }
    }

    println!();
    let stats = index.stats();
    match (stats.cache_enabled, stats.cache) {
        (true, Some(cache)) if cache.exists => {
            if let Some(dir) = index.cache_dir() {
                println!("Cache directory: {}", format_path_with_tilde(dir));
            }
            println!("Cache entries: {} ({} valid)", cache.total_entries, cache.valid_entries);
            println!("Cache size: {:.2} MB", cache.size_on_disk as f64 / 1024.0 / 1024.0);
        }
        (true, _) => println!("Cache: empty"),
        (false, _) => println!("Cache: disabled"),
    }
}
