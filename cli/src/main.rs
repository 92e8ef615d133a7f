//! imdoc CLI - IMF document inspection tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use imdoc::stream::text_stream_heads;
use imdoc::{load_file, save_file, ImageFormat, ImfOptions, JsonFormat, TextOptions};

#[derive(Parser)]
#[command(name = "imdoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Inspect, convert and repack IMF documents", long_about = None)]
struct Cli {
    /// Spill archive entries into this directory instead of memory
    #[arg(long, global = true, value_name = "DIR", env = "IMDOC_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document information
    Info {
        /// Input IMF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert text streams to plain text
    Text {
        /// Input IMF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render paragraph ends as spaces
        #[arg(long)]
        ignore_line_breaks: bool,

        /// Only text streams of this type (e.g. "main text")
        #[arg(long, value_name = "TYPE")]
        stream_type: Option<String>,
    },

    /// Convert the document to JSON
    Json {
        /// Input IMF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Extract page images
    Extract {
        /// Input IMF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Load an archive and save it again
    Repack {
        /// Input IMF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output IMF file
        #[arg(value_name = "OUT")]
        output: PathBuf,

        /// Expected page image format
        #[arg(long, value_enum, default_value = "png")]
        image_format: ImageKind,

        /// Store tables without compression
        #[arg(long)]
        stored: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ImageKind {
    /// PNG images
    Png,
    /// JPEG images
    #[value(alias = "jpeg")]
    Jpg,
    /// TIFF images
    #[value(alias = "tiff")]
    Tif,
}

impl From<ImageKind> for ImageFormat {
    fn from(kind: ImageKind) -> Self {
        match kind {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpg => ImageFormat::Jpeg,
            ImageKind::Tif => ImageFormat::Tiff,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = load_options(cli.cache_dir.as_deref());

    let result = match cli.command {
        Commands::Info { input, json } => cmd_info(&input, &options, json),
        Commands::Text {
            input,
            output,
            ignore_line_breaks,
            stream_type,
        } => cmd_text(
            &input,
            output.as_deref(),
            &options,
            ignore_line_breaks,
            stream_type,
        ),
        Commands::Json {
            input,
            output,
            compact,
        } => cmd_json(&input, output.as_deref(), &options, compact),
        Commands::Extract { input, output } => cmd_extract(&input, output.as_deref(), &options),
        Commands::Repack {
            input,
            output,
            image_format,
            stored,
        } => {
            let options = options
                .with_image_format(image_format.into())
                .with_compression(!stored);
            cmd_repack(&input, &output, &options)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_options(cache_dir: Option<&Path>) -> ImfOptions {
    match cache_dir {
        Some(dir) => ImfOptions::new().with_cache_dir(dir),
        None => ImfOptions::new(),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_info(
    input: &Path,
    options: &ImfOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(input, options)?;

    let streams = text_stream_heads(&doc);
    let images = doc
        .pages()
        .filter(|page| matches!(doc.page_image(page.id), Ok(Some(_))))
        .count();

    if json {
        let stats = serde_json::json!({
            "docId": doc.doc_id,
            "pages": doc.page_count(),
            "words": doc.word_count(),
            "textStreams": streams.len(),
            "regions": doc.regions().len(),
            "annotations": doc.annotations().len(),
            "pageImages": images,
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Document ID".bold(), doc.doc_id);
    for (name, value) in doc.attributes.iter() {
        println!("{}: {}", name.bold(), value);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Words".bold(), doc.word_count());
    println!("{}: {}", "Text streams".bold(), streams.len());
    println!("{}: {}", "Regions".bold(), doc.regions().len());
    println!("{}: {}", "Annotations".bold(), doc.annotations().len());
    println!("{}: {}", "Page images".bold(), images);

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    options: &ImfOptions,
    ignore_line_breaks: bool,
    stream_type: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(input, options)?;

    let mut text_options = TextOptions::new().with_ignore_line_breaks(ignore_line_breaks);
    if let Some(stream_type) = stream_type {
        text_options = text_options.with_stream_type(stream_type);
    }

    let text = imdoc::render::to_text(&doc, &text_options);
    write_output(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    options: &ImfOptions,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = imdoc::render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    options: &ImfOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(input, options)?;

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let mut count = 0;
    for page in doc.pages() {
        let Some(image) = doc.page_image(page.id)? else {
            log::debug!("Page {} has no image", page.id);
            continue;
        };
        let filename = format!(
            "{}_page{:04}.{}",
            doc.doc_id,
            page.id,
            image.format.extension()
        );
        fs::write(output_dir.join(&filename), &image.data)?;
        println!("{} {}", "Extracted".green(), filename);
        count += 1;
    }

    println!("\n{} {} images extracted", "Done!".green().bold(), count);

    Ok(())
}

fn cmd_repack(
    input: &Path,
    output: &Path,
    options: &ImfOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading archive...");
    let doc = load_file(input, options)?;
    pb.inc(1);

    pb.set_message("Saving archive...");
    save_file(&doc, output, options)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "{} {} ({} pages, {} words)",
        "Saved to".green(),
        output.display(),
        doc.page_count(),
        doc.word_count()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imdoc::{BoundingBox, Document, PageImage};

    fn sample_file(dir: &Path) -> PathBuf {
        let mut doc = Document::new("cli");
        doc.add_page(0, BoundingBox::new(0, 100, 0, 100)).unwrap();
        let a = doc.add_word(0, BoundingBox::new(0, 10, 0, 10), "one").unwrap();
        let b = doc.add_word(0, BoundingBox::new(20, 30, 0, 10), "two").unwrap();
        doc.set_next_word(a, Some(b)).unwrap();
        doc.set_page_image(0, PageImage::new(vec![0x89, 0x50, 0x4E, 0x47], ImageFormat::Png))
            .unwrap();

        let path = dir.join("sample.imf");
        save_file(&doc, &path, &ImfOptions::default()).unwrap();
        path
    }

    #[test]
    fn test_repack_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_file(dir.path());
        let output = dir.path().join("repacked.imf");

        let options = ImfOptions::new().with_cache_dir(dir.path().join("cache")).stored();
        cmd_repack(&input, &output, &options).unwrap();

        let doc = load_file(&output, &ImfOptions::default()).unwrap();
        assert_eq!(doc.word_count(), 2);
        assert!(doc.page_image(0).unwrap().is_some());
    }

    #[test]
    fn test_text_and_extract_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_file(dir.path());
        let options = ImfOptions::default();

        let text_path = dir.path().join("out.txt");
        cmd_text(&input, Some(&text_path), &options, false, None).unwrap();
        assert_eq!(fs::read_to_string(&text_path).unwrap(), "one two");

        let images = dir.path().join("images");
        cmd_extract(&input, Some(&images), &options).unwrap();
        assert!(images.join("cli_page0000.png").exists());
    }

    #[test]
    fn test_image_kind_conversion() {
        assert_eq!(ImageFormat::from(ImageKind::Jpg), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from(ImageKind::Tif), ImageFormat::Tiff);
    }
}
