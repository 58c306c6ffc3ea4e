//! Command-line interface for the loader.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::loader::{prepare, run as run_load, LoadObserver, LoadOptions, LoadSummary};
use crate::store::InsertOutcome;

/// Load an XML file into MongoDB, one document per top-level element.
#[derive(Debug, Parser)]
#[command(name = "xmldb-loader")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the XML file
    pub xml_file: PathBuf,

    /// MongoDB connection string (default: $MONGODB_URI or mongodb://localhost:27017)
    #[arg(short = 's', long)]
    pub connection_string: Option<String>,

    /// Database name (default: $MONGODB_DATABASE or xmldb)
    #[arg(short, long)]
    pub database: Option<String>,

    /// Collection name (default: derived from the XML file name)
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Path for the JSON output file (default: XML path with .json extension)
    #[arg(short, long)]
    pub json_output: Option<PathBuf>,

    /// Skip saving the JSON file
    #[arg(long)]
    pub no_json: bool,

    /// Store the whole XML tree as a single document
    #[arg(long)]
    pub whole: bool,

    /// Convert and write JSON, but do not touch the database
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Build load options from the parsed arguments.
    pub fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::new(&self.xml_file);
        if let Some(collection) = &self.collection {
            options = options.with_collection(collection.clone());
        }
        if let Some(path) = &self.json_output {
            options = options.with_json_output(path.clone());
        }
        if self.no_json {
            options = options.without_json();
        }
        if self.whole {
            options = options.whole_document();
        }
        options
    }

    /// Environment config with command-line overrides applied.
    pub fn loader_config(&self) -> LoaderConfig {
        let mut config = LoaderConfig::from_env();
        if let Some(uri) = &self.connection_string {
            config = config.with_connection_string(uri.clone());
        }
        if let Some(database) = &self.database {
            config = config.with_database(database.clone());
        }
        config
    }
}

/// Prints progress to the terminal.
struct ConsoleObserver {
    spinner: ProgressBar,
}

impl ConsoleObserver {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("valid template"),
        );
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl LoadObserver for ConsoleObserver {
    fn xml_loaded(&self, path: &Path, root_tag: &str) {
        println!(
            "{} {}",
            style("Loaded").bold(),
            style(path.display()).cyan()
        );
        println!("  Root element: <{root_tag}>");
    }

    fn documents_assembled(&self, count: usize) {
        println!("  Documents: {}", style(count).green());
    }

    fn json_written(&self, path: &Path) {
        println!("  JSON saved to: {}", path.display());
    }

    fn inserting(&self, collection: &str, count: usize) {
        self.spinner
            .set_message(format!("Inserting {count} document(s) into {collection}..."));
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }

    fn inserted(&self, outcome: &InsertOutcome) {
        self.spinner.finish_and_clear();
        match outcome {
            InsertOutcome::One { id } => {
                println!("  Inserted document with ID: {}", style(id).green());
            }
            InsertOutcome::Many { ids } => {
                println!("  Inserted {} documents", style(ids.len()).green());
            }
        }
    }

    fn nothing_to_insert(&self) {
        println!("  {}", style("No documents to insert").yellow().bold());
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    execute(&cli)
}

/// Execute a parsed command line.
pub fn execute(cli: &Cli) -> Result<()> {
    let options = cli.load_options();
    let config = cli.loader_config();

    println!(
        "{} {} into {}.{}",
        style("Loading").bold(),
        style(cli.xml_file.display()).cyan(),
        style(&config.database).green(),
        style(options.collection_name()).green()
    );
    println!();

    let observer = ConsoleObserver::new();
    let result = if cli.dry_run {
        prepare(&options, &observer)
    } else {
        run_load(&options, &config, &observer)
    };
    observer.finish();

    let summary = result?;
    print_summary(&summary, cli.dry_run);
    Ok(())
}

fn print_summary(summary: &LoadSummary, dry_run: bool) {
    println!();
    if dry_run {
        println!(
            "{} {} document(s) converted, database untouched",
            style("Dry run:").yellow().bold(),
            summary.documents.len()
        );
    } else {
        println!(
            "{} {} document(s) in collection {}",
            style("Done:").green().bold(),
            summary.inserted.as_ref().map_or(0, InsertOutcome::count),
            summary.collection
        );
    }
}
