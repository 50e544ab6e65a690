mod logger;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use logger::ConsoleLogger;
use pdf_booklet::{BookletOptions, BookletStatistics, ExternalTools, PaddingPosition};
use std::path::PathBuf;

const ABOUT: &str = "Cut and reassemble a scanned book so it prints as a center-stapled booklet";

const LONG_ABOUT: &str = "\
Cut and reassemble a scanned book so it prints as a center-stapled booklet.

Such scans usually have a single cover page, then a run of PDF pages each
holding two facing book pages, and a single back page. The pages in the
middle are cut in half vertically, everything is brought to one size, padded
to a multiple of four pages and imposed for booklet printing.

The actual PDF work is done by pdftk, pdfcrop and pdfjam, which must be
installed.";

const SINGLE_PAGES_HELP: &str = "\
Pages (ranges) not to cut in half because they are not facing pages.
A comma-separated list of single pages or ranges, e.g. 1,2,12-15,24.
Negative numbers count from the end, so the default is 1,-1 (first and last
page), and 1--1 (the second '-' is a unary minus) cuts nothing.";

#[derive(Parser)]
#[command(name = "pdfbooklet", about = ABOUT, long_about = LONG_ABOUT, version)]
struct Cli {
    /// Input PDF file (the scan)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output PDF file [default: input with -printable before .pdf]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pages not to split [default: 1,-1]
    #[arg(
        short = 's',
        long,
        value_name = "PAGERANGE",
        allow_hyphen_values = true,
        long_help = SINGLE_PAGES_HELP
    )]
    single_pages: Option<String>,

    /// Where padding pages go [default: split]
    #[arg(long, value_enum)]
    padding_position: Option<PaddingArg>,

    /// Book page duplicated for padding, negative counts from the end [default: -1]
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    padding_page: Option<i64>,

    /// JSON file with base options; flags given here override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show page accounting only, don't generate PDF
    #[arg(long)]
    stats_only: bool,

    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaddingArg {
    Front,
    Back,
    Split,
}

impl From<PaddingArg> for PaddingPosition {
    fn from(arg: PaddingArg) -> Self {
        match arg {
            PaddingArg::Front => Self::Front,
            PaddingArg::Back => Self::Back,
            PaddingArg::Split => Self::Split,
        }
    }
}

impl Cli {
    /// Config file (or defaults) overlaid with the flags that were given
    async fn options(&self) -> Result<BookletOptions> {
        let mut options = match &self.config {
            Some(path) => BookletOptions::load(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BookletOptions::default(),
        };

        if let Some(input) = &self.input {
            options.input = input.clone();
        }
        if let Some(output) = &self.output {
            options.output = Some(output.clone());
        }
        if let Some(spec) = &self.single_pages {
            options.single_pages = spec.clone();
        }
        if let Some(position) = self.padding_position {
            options.padding_position = position.into();
        }
        if let Some(page) = self.padding_page {
            options.padding_page = page;
        }

        Ok(options)
    }
}

fn print_statistics(stats: &BookletStatistics) {
    println!("Booklet Statistics:");
    println!("  Scanned pages: {}", stats.physical_pages);
    println!("  Kept whole: {}", stats.single_pages);
    println!("  Split in half: {}", stats.split_pages);
    println!("  Book pages: {}", stats.book_pages);
    println!("  Padding pages added: {}", stats.padding_pages);
    println!("  Output pages: {}", stats.output_pages);
    println!("  Sheets: {}", stats.sheets);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit with 1 like every other failure
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    ConsoleLogger::new(ConsoleLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("Failed to install logger")?;

    let options = cli.options().await?;
    if options.input.as_os_str().is_empty() {
        eprintln!("No input given. Try --help");
        std::process::exit(1);
    }

    let tools = ExternalTools::new(options.tools.clone());

    if cli.stats_only {
        let stats = pdf_booklet::read_statistics(&tools, &options)
            .await
            .with_context(|| format!("Failed to read {}", options.input.display()))?;
        print_statistics(&stats);
        return Ok(());
    }

    let report = pdf_booklet::make_booklet(&tools, &options)
        .await
        .with_context(|| format!("Failed to make a booklet of {}", options.input.display()))?;

    print_statistics(&report.statistics);
    println!("Booklet → {}", report.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "pdfbooklet",
            "-i",
            "scan.pdf",
            "--single-pages",
            "-2--1",
            "--padding-page",
            "-3",
            "--padding-position",
            "front",
        ])
        .unwrap();

        let options = cli.options().await.unwrap();
        assert_eq!(options.input, PathBuf::from("scan.pdf"));
        assert_eq!(options.output, None);
        assert_eq!(options.single_pages, "-2--1");
        assert_eq!(options.padding_page, -3);
        assert_eq!(options.padding_position, PaddingPosition::Front);
    }

    #[tokio::test]
    async fn test_defaults_without_flags() {
        let cli = Cli::try_parse_from(["pdfbooklet", "--input", "scan.pdf"]).unwrap();
        let options = cli.options().await.unwrap();
        assert_eq!(options.single_pages, "1,-1");
        assert_eq!(options.padding_page, -1);
        assert_eq!(options.padding_position, PaddingPosition::Split);
        assert_eq!(options.output_path(), PathBuf::from("scan-printable.pdf"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pdfbooklet", "-i", "a.pdf", "-v", "-q"]).is_err());
    }
}
