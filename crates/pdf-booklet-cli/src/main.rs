mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use logger::StderrLogger;
use pdf_booklet::constants::pt_to_mm;
use pdf_booklet::{
    BookOptions, ImageDocumentOptions, Operation, Orientation, PadOptions, SplitOptions,
    Statistics,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfb", about = "Pad, impose and paginate PDFs", version)]
struct Cli {
    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pad a PDF to a multiple of N pages
    Pad {
        #[command(flatten)]
        common: PaddingArgs,

        /// Target page multiple
        #[arg(short, long)]
        times: Option<usize>,
    },

    /// Impose a PDF as a two-up booklet
    Book {
        #[command(flatten)]
        common: PaddingArgs,

        /// Output sheet size (used in landscape)
        #[arg(long, value_enum)]
        sheet: Option<PaperArg>,
    },

    /// Split tall images into page-shaped PNG bands
    SplitImage {
        /// Input image file(s)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Directory for the band files
        #[arg(short, long)]
        output: PathBuf,

        /// Aspect ratio width
        #[arg(long, default_value = "595")]
        split_width: u32,

        /// Aspect ratio height
        #[arg(long, default_value = "841")]
        split_height: u32,
    },

    /// Turn tall images into a paginated PDF
    ImageToPdf {
        /// Input image file(s)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Page size
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,
    },
}

/// Arguments shared by `pad` and `book`
#[derive(Args)]
struct PaddingArgs {
    /// Input PDF file
    #[arg(short, long)]
    input: PathBuf,

    /// Output PDF file
    #[arg(short, long, required_unless_present_any = ["stats_only", "config"])]
    output: Option<PathBuf>,

    /// PDF whose first page fills every added page
    #[arg(long)]
    fill_page: Option<PathBuf>,

    /// Insert position of added pages; negative counts from the end
    #[arg(long, allow_hyphen_values = true)]
    insert_index: Option<i64>,

    /// Size of added pages
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Load options from a JSON file; flags given here override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show statistics only, don't generate PDF
    #[arg(long)]
    stats_only: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PaperArg> for pdf_booklet::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::new(StderrLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("failed to install logger")?;

    match cli.command {
        Commands::Pad { common, times } => {
            let mut options = match &common.config {
                Some(path) => PadOptions::load(path)
                    .await
                    .with_context(|| format!("failed to load {}", path.display()))?,
                None => PadOptions::default(),
            };
            if let Some(times) = times {
                options.times = times;
            }
            apply_padding_args(
                &common,
                &mut options.output_path,
                &mut options.fill_page_path,
                &mut options.insert_index,
            );
            if let Some(paper) = common.paper {
                options.page_size = paper.into();
            }

            let stats = source_statistics(&common.input, Operation::Pad {
                times: options.times,
            })
            .await?;
            print_statistics("Padding", &stats);
            if common.stats_only {
                return Ok(());
            }

            let output = pdf_booklet::pad(&common.input, &options).await;
            let bytes = output.into_result().map_err(anyhow::Error::msg)?;
            println!("Padded {} bytes → {}", bytes.len(), display(&options.output_path));
        }

        Commands::Book { common, sheet } => {
            let mut options = match &common.config {
                Some(path) => BookOptions::load(path)
                    .await
                    .with_context(|| format!("failed to load {}", path.display()))?,
                None => BookOptions::default(),
            };
            if let Some(sheet) = sheet {
                options.sheet_size = sheet.into();
            }
            apply_padding_args(
                &common,
                &mut options.output_path,
                &mut options.fill_page_path,
                &mut options.insert_index,
            );
            if let Some(paper) = common.paper {
                options.page_size = paper.into();
            }

            let stats = source_statistics(&common.input, Operation::Booklet).await?;
            print_statistics("Booklet", &stats);
            let sheet = options.sheet_size.page_size(Orientation::Landscape);
            println!(
                "  Sheet size: {:.0} x {:.0} mm",
                pt_to_mm(sheet.width),
                pt_to_mm(sheet.height)
            );
            if common.stats_only {
                return Ok(());
            }

            let output = pdf_booklet::impose(&common.input, &options).await;
            let bytes = output.into_result().map_err(anyhow::Error::msg)?;
            println!("Imposed {} bytes → {}", bytes.len(), display(&options.output_path));
        }

        Commands::SplitImage {
            input,
            output,
            split_width,
            split_height,
        } => {
            let options = SplitOptions {
                output_path: Some(output.clone()),
                split_width,
                split_height,
            };
            let regions = pdf_booklet::split_image(&input, &options).await?;
            let failed = regions.iter().filter(|r| r.is_err()).count();
            println!(
                "Wrote {} bands → {}",
                regions.len() - failed,
                output.display()
            );
            if failed > 0 {
                bail!("{} of {} regions failed", failed, regions.len());
            }
        }

        Commands::ImageToPdf {
            input,
            output,
            paper,
        } => {
            let options = ImageDocumentOptions {
                page_size: paper.into(),
            };
            let bytes =
                pdf_booklet::image_to_paginated_document(&input, &output, &options).await?;
            println!("Paginated {} bytes → {}", bytes.len(), output.display());
        }
    }

    Ok(())
}

fn apply_padding_args(
    args: &PaddingArgs,
    output_path: &mut Option<PathBuf>,
    fill_page_path: &mut Option<PathBuf>,
    insert_index: &mut Option<i64>,
) {
    if args.output.is_some() {
        output_path.clone_from(&args.output);
    }
    if args.fill_page.is_some() {
        fill_page_path.clone_from(&args.fill_page);
    }
    if args.insert_index.is_some() {
        *insert_index = args.insert_index;
    }
}

async fn source_statistics(input: &Path, operation: Operation) -> Result<Statistics> {
    let doc = pdf_booklet::load_pdf(input)
        .await
        .with_context(|| format!("failed to load {}", input.display()))?;
    Ok(pdf_booklet::calculate_statistics(
        doc.get_pages().len(),
        operation,
    )?)
}

fn print_statistics(title: &str, stats: &Statistics) {
    println!("{} Statistics:", title);
    println!("  Source pages: {}", stats.source_pages);
    println!("  Blank pages added: {}", stats.blank_pages_added);
    println!("  Output pages: {}", stats.padded_pages);
    if let Some(sheets) = stats.output_sheets {
        println!("  Output sheets: {}", sheets);
    }
}

fn display(path: &Option<PathBuf>) -> String {
    path.as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not written)".to_string())
}
