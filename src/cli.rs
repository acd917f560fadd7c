//! Command-line interface definitions for Category News.
//!
//! Options can be given as flags; the settings path can also come from the
//! environment.

use clap::Parser;

/// Command-line arguments for one scraping run.
///
/// # Examples
///
/// ```sh
/// # Ten newest BBC politics articles, printed as Markdown
/// category_news "BBC Politics"
///
/// # Al Jazeera Asia articles from the first half of April, also written as JSON
/// category_news "AlJazeera Asia" --start-date 2025-04-01 --end-date 2025-04-15 -j ./json
///
/// # Show the available categories
/// category_news --list-categories
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Category name, e.g. "Hindu Science"
    #[arg(required_unless_present = "list_categories")]
    pub category: Option<String>,

    /// Maximum number of articles to return (defaults to the settings value)
    #[arg(short = 'n', long)]
    pub max_articles: Option<usize>,

    /// Earliest publication date (YYYY-MM-DD); unparsable values are ignored
    #[arg(long)]
    pub start_date: Option<String>,

    /// Latest publication date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end_date: Option<String>,

    /// Optional path to a settings YAML file
    #[arg(short, long, env = "CATEGORY_NEWS_CONFIG")]
    pub config: Option<String>,

    /// Output directory for the JSON file
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Output directory for the Markdown file
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Print the registered category names and exit
    #[arg(long)]
    pub list_categories: bool,
}
