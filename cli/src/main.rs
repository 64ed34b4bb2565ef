//! ocrtab CLI - rebuild tab-spaced page text from recorded OCR detections

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use ocrtab::source::select_pages;
use ocrtab::{
    detect_kind_from_path, AnchorPoint, CleanupOptions, Document, ExtractOptions, Extractor,
    JsonFormat, LayoutOptions, PageOutcome, PageSelection, PageSeparator, PrecomputedRecognizer,
    RenderOptions,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "ocrtab")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild tab-aligned page text from OCR detections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the document text
    Text {
        /// Recorded detections (JSON)
        #[arg(value_name = "DETECTIONS")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Fail if any page failed or no text was recognized
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        extract: ExtractArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Write a JSON report with lines, grid cells and failures
    Json {
        /// Recorded detections (JSON)
        #[arg(value_name = "DETECTIONS")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show page, line and fragment statistics
    Info {
        /// Recorded detections (JSON)
        #[arg(value_name = "DETECTIONS")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Detect the kind of an input document or image
    Detect {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct ExtractArgs {
    /// Layout options file (JSON); flags override its values
    #[arg(long, value_name = "FILE", env = "OCRTAB_CONFIG")]
    config: Option<PathBuf>,

    /// Number of grid rows
    #[arg(long, env = "OCRTAB_ROWS")]
    rows: Option<usize>,

    /// Number of grid columns
    #[arg(long, env = "OCRTAB_COLUMNS")]
    columns: Option<usize>,

    /// Higher values insert fewer tabs
    #[arg(long, env = "OCRTAB_SPACE_REDUTOR")]
    space_redutor: Option<usize>,

    /// Higher values spread large-font text further apart
    #[arg(long, env = "OCRTAB_FONT_SIZE_REGULATOR")]
    font_size_regulator: Option<usize>,

    /// Do not indent the first fragment of each line
    #[arg(long)]
    no_indent: bool,

    /// Worker threads
    #[arg(short, long, env = "OCRTAB_WORKERS", default_value_t = ocrtab::pipeline::DEFAULT_MAX_WORKERS)]
    workers: usize,

    /// Pages to process, in order (e.g., "1-10", "3,1,5")
    #[arg(long, env = "OCRTAB_PAGES")]
    pages: Option<String>,

    /// Process a page list in ascending order instead of as given
    #[arg(long)]
    sort_pages: bool,

    /// Point of each box used for binning
    #[arg(long, value_enum, env = "OCRTAB_ANCHOR", default_value = "left-center")]
    anchor: Anchor,

    /// Drop detections scoring below this confidence
    #[arg(long, env = "OCRTAB_MIN_CONFIDENCE", default_value_t = 0.0)]
    min_confidence: f32,
}

#[derive(Args)]
struct RenderArgs {
    /// Lowercase the output
    #[arg(long, env = "OCRTAB_LOWERCASE")]
    lowercase: bool,

    /// Apply Unicode NFC normalization
    #[arg(long)]
    normalize: bool,

    /// How pages are separated
    #[arg(long, value_enum, env = "OCRTAB_SEPARATOR", default_value = "blank")]
    separator: Separator,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Anchor {
    /// Top-left corner
    TopLeft,
    /// Left edge, vertical center
    LeftCenter,
    /// Mean of the four corners
    Centroid,
}

impl From<Anchor> for AnchorPoint {
    fn from(anchor: Anchor) -> Self {
        match anchor {
            Anchor::TopLeft => AnchorPoint::TopLeft,
            Anchor::LeftCenter => AnchorPoint::LeftCenter,
            Anchor::Centroid => AnchorPoint::Centroid,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Separator {
    /// Blank line between pages
    Blank,
    /// "End of page N" after every page
    Marker,
}

impl From<Separator> for PageSeparator {
    fn from(separator: Separator) -> Self {
        match separator {
            Separator::Blank => PageSeparator::BlankLine,
            Separator::Marker => PageSeparator::Marker,
        }
    }
}

impl ExtractArgs {
    fn layout_options(&self) -> CliResult<LayoutOptions> {
        let mut layout = match &self.config {
            Some(path) => LayoutOptions::from_json(&fs::read_to_string(path)?)?,
            None => LayoutOptions::default(),
        };

        if let Some(rows) = self.rows {
            layout = layout.with_rows(rows);
        }
        if let Some(columns) = self.columns {
            layout = layout.with_columns(columns);
        }
        if let Some(redutor) = self.space_redutor {
            layout = layout.with_space_redutor(redutor);
        }
        if let Some(regulator) = self.font_size_regulator {
            layout = layout.with_font_size_regulator(regulator);
        }
        if self.no_indent {
            layout = layout.with_indent(false);
        }
        Ok(layout)
    }

    fn page_selection(&self) -> CliResult<PageSelection> {
        let selection = match &self.pages {
            Some(p) => PageSelection::parse(p)?,
            None => PageSelection::All,
        };
        Ok(if self.sort_pages {
            selection.sorted()
        } else {
            selection
        })
    }
}

impl RenderArgs {
    fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::new().with_separator(self.separator.into());
        let cleanup = CleanupOptions::new()
            .with_lowercase(self.lowercase)
            .with_unicode_normalization(self.normalize);
        if !cleanup.is_noop() {
            options = options.with_cleanup(cleanup);
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Text {
            input,
            output,
            strict,
            extract,
            render,
        } => cmd_text(&input, output.as_deref(), strict, &extract, &render),
        Commands::Json {
            input,
            output,
            compact,
            extract,
        } => cmd_json(&input, output.as_deref(), compact, &extract),
        Commands::Info {
            input,
            json,
            extract,
        } => cmd_info(&input, json, &extract),
        Commands::Detect { input } => cmd_detect(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Load the detections, run every selected page and report failures.
fn extract(input: &Path, args: &ExtractArgs) -> CliResult<Document> {
    let options = ExtractOptions::new()
        .with_layout(args.layout_options()?)
        .with_workers(args.workers)
        .with_min_confidence(args.min_confidence);
    options.validate()?;

    let recognizer = PrecomputedRecognizer::from_path(input)?.with_anchor(args.anchor.into());
    let pages = select_pages(recognizer.page_images(), &args.page_selection()?)?;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Rebuilding pages...");

    let progress = pb.clone();
    let extractor = Extractor::new(Arc::new(recognizer))
        .with_options(options)
        .with_progress(Arc::new(move |outcome: &PageOutcome| {
            progress.set_message(format!("page {}", outcome.page_id));
            progress.inc(1);
        }));

    let mut doc = extractor.extract_pages(pages)?;
    pb.finish_and_clear();

    doc.metadata.source = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    for (page_id, error) in doc.failures() {
        eprintln!("{} page {}: {}", "Warning".yellow().bold(), page_id, error);
    }

    Ok(doc)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    strict: bool,
    extract_args: &ExtractArgs,
    render_args: &RenderArgs,
) -> CliResult<()> {
    let doc = extract(input, extract_args)?;
    let render_options = render_args.render_options();

    let text = if strict {
        doc.into_text_strict(&render_options)?
    } else {
        doc.to_text(&render_options)
    };

    write_output(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    extract_args: &ExtractArgs,
) -> CliResult<()> {
    let doc = extract(input, extract_args)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = ocrtab::render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_info(input: &Path, json: bool, extract_args: &ExtractArgs) -> CliResult<()> {
    let doc = extract(input, extract_args)?;
    let stats = doc.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Workers".bold(), doc.metadata.workers);
    println!("{}: {} ms", "Elapsed".bold(), doc.metadata.elapsed_ms());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Fragments".bold(), stats.fragment_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    println!("{}: {}", "Empty pages".bold(), stats.empty_page_count);
    println!("{}: {}", "Degenerate pages".bold(), stats.degenerate_page_count);

    let failures = doc.failures();
    if !failures.is_empty() {
        println!();
        println!("{}", "Failed Pages".red().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (page_id, error) in failures {
            println!("{}: {}", format!("Page {}", page_id).bold(), error);
        }
    }

    Ok(())
}

fn cmd_detect(input: &Path) -> CliResult<()> {
    let kind = detect_kind_from_path(input)?;
    println!("{}: {} ({})", "Kind".bold(), kind, kind.mime_type());
    if !kind.is_image() {
        println!(
            "{}",
            "Multi-page input: page images must be rendered before recognition".yellow()
        );
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "ocrtab".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Tab-aligned text from OCR detections");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/ocrtab".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn extract_args(args: &[&str]) -> ExtractArgs {
        let mut argv = vec!["ocrtab", "info", "detections.json"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Info { extract, .. } => extract,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_defaults() {
        let args = extract_args(&[]);
        assert_eq!(args.layout_options().unwrap(), LayoutOptions::default());
        assert_eq!(args.workers, 2);
        assert!(args.anchor == Anchor::LeftCenter);
        assert_eq!(args.page_selection().unwrap(), PageSelection::All);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        config
            .write_all(br#"{"num_rows": 60, "num_columns": 12}"#)
            .unwrap();
        let path = config.path().to_str().unwrap();

        let args = extract_args(&["--config", path, "--columns", "30", "--no-indent"]);
        let layout = args.layout_options().unwrap();
        assert_eq!(layout.num_rows, 60);
        assert_eq!(layout.num_columns, 30);
        assert!(!layout.indent_first);
    }

    #[test]
    fn test_page_list_order() {
        let args = extract_args(&["--pages", "3,1,2"]);
        assert_eq!(
            args.page_selection().unwrap(),
            PageSelection::Pages(vec![3, 1, 2])
        );

        let sorted = extract_args(&["--pages", "3,1,2", "--sort-pages"]);
        assert_eq!(
            sorted.page_selection().unwrap(),
            PageSelection::Pages(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_render_args() {
        let cli = Cli::try_parse_from([
            "ocrtab",
            "text",
            "d.json",
            "--lowercase",
            "--separator",
            "marker",
        ])
        .unwrap();
        let Commands::Text { render, .. } = cli.command else {
            unreachable!()
        };
        let options = render.render_options();
        assert_eq!(options.separator, PageSeparator::Marker);
        assert!(options.cleanup.unwrap().lowercase);
    }
}
