//! pdfchain CLI - chainable PDF page manipulation tool

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfchain::chain::first_non_document_index;
use pdfchain::{
    batch, naming, run_chain, DocumentHandle, Error, PdfTransformService, TransformService,
};

#[derive(Parser)]
#[command(name = "pdfchain")]
#[command(version)]
#[command(about = "Extract, merge, compress, and convert PDF documents", long_about = None)]
#[command(
    after_help = "Trailing arguments form a chain of further operations applied to the result \
without intermediate files, e.g.:\n\
    pdfchain extract report.pdf 1 5 merge appendix.pdf compress\n\
Chain commands: extract START [END], merge FILE.pdf..., compress, convert-to-docx [FILE]"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DOCX file to PDF
    Parsedoc {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Chained operations applied to the converted document
        #[arg(value_name = "CHAIN")]
        chain: Vec<String>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert a PDF file to DOCX
    Parsepdf {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Extract a page range from a PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Starting page number (1-based)
        #[arg(value_name = "START")]
        start: u32,

        /// Ending page (defaults to START), then chained operations
        #[arg(value_name = "ARGS")]
        rest: Vec<String>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Merge PDF files into one
    Merge {
        /// PDF files to merge, then chained operations
        #[arg(value_name = "ARGS", required = true)]
        args: Vec<String>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compress a PDF to reduce its size
    Compress {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Chained operations applied to the compressed document
        #[arg(value_name = "CHAIN")]
        chain: Vec<String>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert all DOCX files in a directory to PDF
    #[command(alias = "parsedocxs")]
    Parseall {
        /// Directory containing DOCX files
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Print the per-file report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge all PDF files in a directory into one
    Mergeall {
        /// Directory containing PDF files
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Chained operations applied to the merged document
        #[arg(value_name = "CHAIN")]
        chain: Vec<String>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parsedoc {
            file,
            chain,
            output,
        } => cmd_parsedoc(&file, chain, output),
        Commands::Parsepdf { file, output } => cmd_parsepdf(&file, output),
        Commands::Extract {
            file,
            start,
            rest,
            output,
        } => cmd_extract(&file, start, rest, output),
        Commands::Merge { args, output } => cmd_merge(args, output),
        Commands::Compress {
            file,
            chain,
            output,
        } => cmd_compress(&file, chain, output),
        Commands::Parseall { directory, json } => cmd_parseall(&directory, json),
        Commands::Mergeall {
            directory,
            chain,
            output,
        } => cmd_mergeall(&directory, chain, output),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn cmd_parsedoc(
    file: &Path,
    chain: Vec<String>,
    output: Option<PathBuf>,
) -> pdfchain::Result<()> {
    let service = PdfTransformService::new();

    let pb = spinner("Converting DOCX to PDF...");
    let result = service.convert_from_docx(file);
    pb.finish_and_clear();
    let data = result?;
    println!("{}", "DOCX converted successfully".green());

    run_chain_and_save(
        DocumentHandle::from_bytes(data),
        &chain,
        output,
        naming::with_extension(file, "pdf"),
        &service,
    )
}

fn cmd_parsepdf(file: &Path, output: Option<PathBuf>) -> pdfchain::Result<()> {
    let service = PdfTransformService::new();
    let doc = DocumentHandle::from_path(file)?;
    let output = output.unwrap_or_else(|| naming::with_extension(file, "docx"));

    let pb = spinner("Converting PDF to DOCX...");
    let result = service.convert_to_docx(&doc, &output);
    pb.finish_and_clear();
    result?;

    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_extract(
    file: &Path,
    start: u32,
    rest: Vec<String>,
    output: Option<PathBuf>,
) -> pdfchain::Result<()> {
    let (end, chain) = split_leading_page(rest)?;
    let end = end.unwrap_or(start);

    let service = PdfTransformService::new();
    let doc = DocumentHandle::from_path(file)?;

    let pb = spinner("Extracting pages...");
    let result = service.extract_subrange(&doc, start, end);
    pb.finish_and_clear();
    let data = result?;
    println!("{}", "Pages extracted successfully".green());

    run_chain_and_save(
        DocumentHandle::from_bytes(data),
        &chain,
        output,
        naming::extract_output(file, start, end),
        &service,
    )
}

fn cmd_merge(args: Vec<String>, output: Option<PathBuf>) -> pdfchain::Result<()> {
    // leading run of .pdf references is the merge list, the rest is a chain
    let sep = first_non_document_index(&args);
    let (inputs, chain) = args.split_at(sep);
    if inputs.is_empty() {
        return Err(Error::Arity {
            command: "merge",
            expected: "1 or more",
            found: 0,
        });
    }

    let service = PdfTransformService::new();
    let handles = inputs
        .iter()
        .map(DocumentHandle::from_path)
        .collect::<pdfchain::Result<Vec<_>>>()?;

    let pb = spinner("Merging PDFs...");
    let result = service.concatenate(&handles);
    pb.finish_and_clear();
    let data = result?;
    println!("{}", "PDFs merged successfully".green());

    run_chain_and_save(
        DocumentHandle::from_bytes(data),
        chain,
        output,
        PathBuf::from(naming::MERGED_NAME),
        &service,
    )
}

fn cmd_compress(
    file: &Path,
    chain: Vec<String>,
    output: Option<PathBuf>,
) -> pdfchain::Result<()> {
    let service = PdfTransformService::new();
    let doc = DocumentHandle::from_path(file)?;

    let pb = spinner("Compressing PDF...");
    let result = service.recompress(&doc);
    pb.finish_and_clear();
    let data = result?;
    println!("{}", "PDF compressed successfully".green());

    run_chain_and_save(
        DocumentHandle::from_bytes(data),
        &chain,
        output,
        naming::compress_output(file),
        &service,
    )
}

fn cmd_parseall(directory: &Path, json: bool) -> pdfchain::Result<()> {
    let service = PdfTransformService::new();

    let pb = spinner("Converting files...");
    let result = batch::convert_dir(directory, &service);
    pb.finish_and_clear();
    let report = result?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("report serializes")
        );
        return Ok(());
    }

    for file in &report.files {
        match (&file.output, &file.error) {
            (Some(output), _) => println!(
                "  {} {} {} {}",
                "✓".green(),
                file.input.display(),
                "→".dimmed(),
                output.display()
            ),
            (None, Some(error)) => {
                println!("  {} {}: {}", "✗".red(), file.input.display(), error)
            }
            (None, None) => unreachable!(),
        }
    }
    println!(
        "\n{} {} converted, {} failed",
        "Done!".green().bold(),
        report.succeeded,
        report.failed
    );
    Ok(())
}

fn cmd_mergeall(
    directory: &Path,
    chain: Vec<String>,
    output: Option<PathBuf>,
) -> pdfchain::Result<()> {
    let service = PdfTransformService::new();

    let pb = spinner("Merging PDFs...");
    let result = batch::merge_dir(directory, &service);
    pb.finish_and_clear();
    let merged = result?;
    println!("{}", "PDFs merged successfully".green());

    run_chain_and_save(
        merged,
        &chain,
        output,
        PathBuf::from(naming::MERGED_NAME),
        &service,
    )
}

/// Execute a chain against `doc`, then persist the outcome.
///
/// Parse errors abort before anything is written. A contained stage failure
/// still persists the best-effort result and warns; a terminal stage
/// (convert-to-docx) writes its own output, so nothing is saved here.
fn run_chain_and_save(
    doc: DocumentHandle,
    chain: &[String],
    output: Option<PathBuf>,
    default_name: PathBuf,
    service: &PdfTransformService,
) -> pdfchain::Result<()> {
    log::debug!("chain tokens: {:?}", chain);

    let default_docx = output
        .as_deref()
        .map(|p| p.with_extension("docx"))
        .unwrap_or_else(|| PathBuf::from(naming::CONVERTED_DOCX_NAME));

    let outcome = run_chain(doc, chain, service, &default_docx)?;

    if let Some(ref failure) = outcome.failure {
        eprintln!(
            "{}: chain stage {} ({}) failed: {} — keeping the last good result",
            "Warning".yellow().bold(),
            failure.stage + 1,
            failure.operation,
            failure.error
        );
    }

    if let Some(result) = outcome.document {
        let path = output.unwrap_or(default_name);
        result.save(&path)?;
        println!("{} {}", "Saved to".green(), path.display());
    }
    Ok(())
}

/// `extract FILE START [END] ...`: clap cannot tell an optional END from the
/// first chain token, so a leading all-digits token is taken as END.
fn split_leading_page(mut rest: Vec<String>) -> pdfchain::Result<(Option<u32>, Vec<String>)> {
    let leading_number = rest
        .first()
        .is_some_and(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()));
    if leading_number {
        let token = rest.remove(0);
        let end = token
            .parse()
            .map_err(|_| Error::InvalidPageRange(format!("'{}' is not a page number", token)))?;
        Ok((Some(end), rest))
    } else {
        Ok((None, rest))
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
