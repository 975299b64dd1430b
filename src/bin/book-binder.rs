//! Book Binder CLI tool
//!
//! Binds scanned `{bookid}_page{N}.webp` images into `{bookid}.pdf`.

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use book_binder::{bind_book, BindOptions, Error, OutlineStatus};
use book_binder::pdf::{extract_metadata, DEFAULT_DPI};

/// Book Binder - Merge scanned page images into one PDF with bookmarks
#[derive(Parser)]
#[command(name = "book-binder")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "EXAMPLES:
    # Pick the first page in a file dialog
    book-binder

    # Bind every novel_page*.webp next to the given page
    book-binder scans/novel_page1.webp

    # Use a table of contents from elsewhere and open the result
    book-binder scans/novel_page1.webp --toc novel_toc.json --open

    # Show pages and bookmarks of a bound book
    book-binder info scans/novel.pdf")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    bind: BindArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind the pages of one book into a PDF (the default)
    Bind(BindArgs),

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

#[derive(Args)]
struct BindArgs {
    /// Any page of the book, e.g. novel_page1.webp (opens a file picker if omitted)
    seed: Option<PathBuf>,

    /// Table of contents JSON (default: {bookid}_toc.json beside the pages)
    #[arg(long)]
    toc: Option<PathBuf>,

    /// Output PDF file path (default: {bookid}.pdf beside the pages)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference resolution used to size pages
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: f32,

    /// Do not add bookmarks even if a table of contents exists
    #[arg(long)]
    no_outline: bool,

    /// Open the output file after creation
    #[arg(long)]
    open: bool,

    /// Log debug details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Some(Commands::Bind(args)) => args.verbose,
        Some(Commands::Info { .. }) => false,
        None => cli.bind.verbose,
    };
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Some(Commands::Bind(args)) => cmd_bind(args),
        Some(Commands::Info { input }) => cmd_info(input),
        None => cmd_bind(cli.bind),
    };

    if let Err(e) = result {
        if matches!(e.downcast_ref::<Error>(), Some(Error::Cancelled)) {
            info!("No file selected, exiting");
            return;
        }
        error!("{:#}", e);
        process::exit(1);
    }
}

/// Resolve the seed page from the command line or the file picker
fn seed_path(seed: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match seed {
        Some(seed) => Ok(seed),
        None => pick_seed(),
    }
}

#[cfg(feature = "dialog")]
fn pick_seed() -> anyhow::Result<PathBuf> {
    Ok(book_binder::select::pick_seed_file()?)
}

#[cfg(not(feature = "dialog"))]
fn pick_seed() -> anyhow::Result<PathBuf> {
    bail!("No seed page given (built without the file picker)")
}

/// Open a file with the system default application
fn open_file(path: &PathBuf) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Bind one book into a PDF
fn cmd_bind(args: BindArgs) -> anyhow::Result<()> {
    let seed = seed_path(args.seed)?;
    if !seed.exists() {
        bail!("Input file not found: {}", seed.display());
    }

    let options = BindOptions {
        seed_path: seed,
        toc_path: args.toc,
        output_path: args.output,
        dpi: args.dpi,
        outline: !args.no_outline,
    };

    let report = bind_book(&options)?;

    for path in &report.skipped {
        warn!("Skipped unreadable page: {}", path.display());
    }
    match &report.outline {
        OutlineStatus::Attached(n) => info!(
            "Bound {} pages with {} bookmarks: {}",
            report.page_count,
            n,
            report.output_path.display()
        ),
        _ => info!(
            "Bound {} pages (no bookmarks): {}",
            report.page_count,
            report.output_path.display()
        ),
    }

    if args.open {
        open_file(&report.output_path)
            .with_context(|| format!("Failed to open {}", report.output_path.display()))?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    let metadata = extract_metadata(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }

    if !metadata.outline.is_empty() {
        println!("Bookmarks:");
        for entry in &metadata.outline {
            let page = entry
                .page_index
                .map(|i| (i + 1).to_string())
                .unwrap_or_else(|| "?".to_string());
            println!("{}{} (page {})", "  ".repeat(entry.level + 1), entry.title, page);
        }
    }

    Ok(())
}
