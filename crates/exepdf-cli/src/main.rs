// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// exepdf command-line front end.
//
// Reads the input files from disk, builds a tool request, runs it through the
// engine and writes the result under its suggested name.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use exepdf_core::human_errors::humanize_error;
use exepdf_core::{
    EncryptionConfig, EngineConfig, ExePdfError, InputFile, InsertionConfig, MediaType, NumberPosition, Result,
    SplitRange, ToolConfig, ToolId, ToolRequest, parse_page_list,
};
use exepdf_document::Engine;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "exepdf", version, about = "Transform PDF files locally", long_about = None)]
struct Cli {
    /// Tool identifier, e.g. merge-pdf, split-pdf, rotate-pdf, page-numbers.
    tool: String,

    /// Input files. For add-pages the first file is the base document.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Directory the result is written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// First page of the split range (1-based).
    #[arg(long, allow_hyphen_values = true)]
    start: Option<i64>,

    /// Last page of the split range (1-based, inclusive).
    #[arg(long, allow_hyphen_values = true)]
    end: Option<i64>,

    /// Pages to remove, e.g. "1, 3, 5-7".
    #[arg(long)]
    pages: Option<String>,

    /// Page number position: b-c, b-l, b-r, t-c, t-l or t-r.
    #[arg(long)]
    position: Option<String>,

    /// Where added pages go: start, end, or a 1-based page number.
    #[arg(long)]
    at: Option<String>,

    /// Rotation in degrees; negative values turn counter-clockwise.
    #[arg(long, allow_hyphen_values = true)]
    degrees: Option<i64>,

    /// Watermark text.
    #[arg(long)]
    text: Option<String>,

    /// Password for protect-pdf.
    #[arg(long)]
    password: Option<String>,

    /// Engine configuration as a JSON file.
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match execute(&cli).await {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            debug!(error = %err, "Tool failed");
            ExitCode::FAILURE
        }
    }
}

/// Run the tool described by `cli` and return the path of the written result.
async fn execute(cli: &Cli) -> Result<PathBuf> {
    let engine_config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(engine_config);

    let tool = ToolId::parse(&cli.tool);
    let config = build_config(&tool, cli)?;
    let files = read_inputs(&cli.files)?;

    info!(tool = %tool, files = files.len(), "exepdf starting");
    let output = engine.process(ToolRequest::new(tool, files, config)).await?;

    std::fs::create_dir_all(&cli.output)?;
    let path = cli.output.join(&output.file_name);
    std::fs::write(&path, &output.bytes)?;

    info!(path = %path.display(), sha256 = %output.sha256_hex(), "Result written");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Argument mapping
// ---------------------------------------------------------------------------

fn build_config(tool: &ToolId, cli: &Cli) -> Result<ToolConfig> {
    let config = match tool {
        ToolId::MergePdf => ToolConfig::Merge,
        ToolId::SplitPdf => ToolConfig::Split(SplitRange {
            start: required(cli.start, "--start")?,
            end: required(cli.end, "--end")?,
        }),
        ToolId::RemovePages => ToolConfig::RemovePages {
            pages: parse_page_list(&required(cli.pages.clone(), "--pages")?)?,
        },
        ToolId::RotatePdf => ToolConfig::Rotate {
            degrees: required(cli.degrees, "--degrees")?,
        },
        ToolId::AddPages => ToolConfig::AddPages(parse_insertion(cli.at.as_deref().unwrap_or("end"))?),
        ToolId::WatermarkPdf => ToolConfig::Watermark {
            text: required(cli.text.clone(), "--text")?,
        },
        ToolId::PageNumbers => ToolConfig::PageNumbers {
            position: match cli.position.as_deref() {
                Some(code) => NumberPosition::from_code(code)
                    .ok_or_else(|| ExePdfError::InvalidInput(format!("unknown position '{}'", code)))?,
                None => NumberPosition::default(),
            },
        },
        ToolId::ProtectPdf => ToolConfig::Protect(EncryptionConfig {
            password: required(cli.password.clone(), "--password")?,
        }),
        ToolId::JpgToPdf => ToolConfig::ImagesToPdf,
        ToolId::Unsupported(_) => ToolConfig::Passthrough,
    };
    Ok(config)
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.ok_or_else(|| ExePdfError::InvalidInput(format!("{} is required for this tool", flag)))
}

fn parse_insertion(at: &str) -> Result<InsertionConfig> {
    match at.trim().to_ascii_lowercase().as_str() {
        "start" => Ok(InsertionConfig::start()),
        "end" => Ok(InsertionConfig::end()),
        number => number
            .parse()
            .map(InsertionConfig::specific)
            .map_err(|_| ExePdfError::InvalidInput(format!("--at expects start, end or a page number, got '{}'", at))),
    }
}

fn read_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)?;
            Ok(InputFile::new(display_name(path), media_type_of(path), bytes))
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn media_type_of(path: &Path) -> MediaType {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(MediaType::from_extension)
        .unwrap_or_else(|| MediaType::Other("application/octet-stream".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Document, Object, Stream, dictionary};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("exepdf").chain(args.iter().copied())).unwrap()
    }

    fn pdf_with_pages(count: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..count)
            .map(|i| {
                let content_id = doc.add_object(Stream::new(dictionary! {}, b"0 0 m".to_vec()));
                let page_id = doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), Object::Integer(600 + i as i64), 800.into()],
                    "Contents" => content_id,
                });
                page_id.into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn split_needs_both_bounds() {
        let args = cli(&["split-pdf", "--start", "3", "--end", "5", "a.pdf"]);
        assert_eq!(
            build_config(&ToolId::SplitPdf, &args).unwrap(),
            ToolConfig::Split(SplitRange { start: 3, end: 5 })
        );

        let args = cli(&["split-pdf", "--start", "3", "a.pdf"]);
        assert!(matches!(
            build_config(&ToolId::SplitPdf, &args),
            Err(ExePdfError::InvalidInput(_))
        ));
    }

    #[test]
    fn page_list_is_expanded() {
        let args = cli(&["remove-pages", "--pages", "1, 3-4", "a.pdf"]);
        assert_eq!(
            build_config(&ToolId::RemovePages, &args).unwrap(),
            ToolConfig::RemovePages { pages: vec![1, 3, 4] }
        );
    }

    #[test]
    fn negative_degrees_are_accepted() {
        let args = cli(&["rotate-pdf", "--degrees", "-90", "a.pdf"]);
        assert_eq!(
            build_config(&ToolId::RotatePdf, &args).unwrap(),
            ToolConfig::Rotate { degrees: -90 }
        );
    }

    #[test]
    fn insertion_point_parsing() {
        assert_eq!(parse_insertion("start").unwrap(), InsertionConfig::start());
        assert_eq!(parse_insertion("END").unwrap(), InsertionConfig::end());
        assert_eq!(parse_insertion("2").unwrap(), InsertionConfig::specific(2));
        assert!(parse_insertion("middle").is_err());
    }

    #[test]
    fn unknown_position_is_rejected() {
        let args = cli(&["page-numbers", "--position", "centre", "a.pdf"]);
        assert!(build_config(&ToolId::PageNumbers, &args).is_err());

        let args = cli(&["page-numbers", "a.pdf"]);
        assert_eq!(
            build_config(&ToolId::PageNumbers, &args).unwrap(),
            ToolConfig::PageNumbers {
                position: NumberPosition::BottomCenter
            }
        );
    }

    #[test]
    fn media_type_follows_extension() {
        assert_eq!(media_type_of(Path::new("scan.JPG")), MediaType::Jpeg);
        assert_eq!(media_type_of(Path::new("report.pdf")), MediaType::Pdf);
        assert_eq!(
            media_type_of(Path::new("notes")),
            MediaType::Other("application/octet-stream".into())
        );
    }

    #[tokio::test]
    async fn merge_writes_result_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.pdf");
        let second = dir.path().join("b.pdf");
        std::fs::write(&first, pdf_with_pages(2)).unwrap();
        std::fs::write(&second, pdf_with_pages(3)).unwrap();
        let out_dir = dir.path().join("out");

        let args = cli(&[
            "merge-pdf",
            "-o",
            out_dir.to_str().unwrap(),
            first.to_str().unwrap(),
            second.to_str().unwrap(),
        ]);
        let path = execute(&args).await.unwrap();

        assert_eq!(path, out_dir.join("merged_document.pdf"));
        let merged = Document::load_mem(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(merged.get_pages().len(), 5);
    }

    #[tokio::test]
    async fn missing_input_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = cli(&[
            "rotate-pdf",
            "--degrees",
            "90",
            "-o",
            dir.path().to_str().unwrap(),
            "does-not-exist.pdf",
        ]);
        assert!(matches!(execute(&args).await, Err(ExePdfError::Io(_))));
    }
}
