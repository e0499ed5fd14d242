/*!
Turning rendered materials into PDFs.

Conversion is done by an external HTML-to-PDF program (`wkhtmltopdf` by
default). If the program isn't installed, or chokes, the caller is expected
to show the troubleshooting page rather than fail the request.
*/
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use time::Date;
use tokio::process::Command;

use crate::ISO_DATE_FMT;

/// Longest chunk of converter stderr worth carrying in an error message.
const MAX_STDERR: usize = 512;

/// Settings handed to the converter on every conversion.
#[derive(Clone, Debug)]
pub struct PdfCfg {
    /// Path to (or name on `$PATH` of) the converter program.
    pub converter: PathBuf,
    pub page_size: String,
    pub margin_top_mm: u32,
    pub margin_right_mm: u32,
    pub margin_bottom_mm: u32,
    pub margin_left_mm: u32,
    /// Font family the print rendering of a material asks for.
    pub font: String,
    /// Where scratch HTML and PDF files are written.
    pub temp_dir: PathBuf,
}

impl std::default::Default for PdfCfg {
    fn default() -> Self {
        Self {
            converter: PathBuf::from("wkhtmltopdf"),
            page_size: "A4".to_owned(),
            margin_top_mm: 15,
            margin_right_mm: 15,
            margin_bottom_mm: 15,
            margin_left_mm: 15,
            font: "DejaVu Sans".to_owned(),
            temp_dir: std::env::temp_dir(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PdfError {
    /// The converter couldn't be found or started at all.
    #[error("PDF converter unavailable: {0}")]
    Unavailable(String),

    #[error("PDF conversion failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait PdfConverter: Send + Sync {
    async fn convert(&self, html: &str) -> Result<Vec<u8>, PdfError>;
}

pub struct Wkhtmltopdf {
    cfg: PdfCfg,
}

impl Wkhtmltopdf {
    pub fn new(cfg: PdfCfg) -> Self {
        log::trace!("Wkhtmltopdf::new( {:?} ) called.", &cfg);
        Self { cfg }
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let c = &self.cfg;
        let mut args: Vec<OsString> = [
            "--quiet",
            "--encoding", "utf-8",
            "--print-media-type",
            "--page-size", c.page_size.as_str(),
        ].iter().map(OsString::from).collect();

        for (flag, mm) in [
            ("--margin-top", c.margin_top_mm),
            ("--margin-right", c.margin_right_mm),
            ("--margin-bottom", c.margin_bottom_mm),
            ("--margin-left", c.margin_left_mm),
        ] {
            args.push(OsString::from(flag));
            args.push(OsString::from(format!("{}mm", mm)));
        }

        args.push(input.as_os_str().to_owned());
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl PdfConverter for Wkhtmltopdf {
    async fn convert(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        log::trace!(
            "Wkhtmltopdf::convert( [ {} bytes of HTML ] ) called.",
            html.len()
        );

        let scratch = tempfile::Builder::new()
            .prefix("mo100-pdf-")
            .tempdir_in(&self.cfg.temp_dir)
            .map_err(|e| PdfError::Failed(format!(
                "Unable to create scratch directory in {}: {}",
                self.cfg.temp_dir.display(), &e
            )))?;
        let input = scratch.path().join("material.html");
        let output = scratch.path().join("material.pdf");

        tokio::fs::write(&input, html).await
            .map_err(|e| PdfError::Failed(format!(
                "Unable to write {}: {}", input.display(), &e
            )))?;

        let result = Command::new(&self.cfg.converter)
            .args(self.args(&input, &output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        let out = match result {
            Ok(out) => out,
            Err(e) => {
                return Err(PdfError::Unavailable(format!(
                    "unable to run {}: {}", self.cfg.converter.display(), &e
                )));
            },
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let stderr: String = stderr.trim().chars().take(MAX_STDERR).collect();
            return Err(PdfError::Failed(format!(
                "{} exited with {}: {}",
                self.cfg.converter.display(), &out.status, &stderr
            )));
        }

        let bytes = tokio::fs::read(&output).await
            .map_err(|e| PdfError::Failed(format!(
                "Unable to read converter output {}: {}", output.display(), &e
            )))?;

        if bytes.is_empty() {
            return Err(PdfError::Failed("converter produced an empty file".to_owned()));
        }

        log::trace!("    ...converted to {} PDF bytes.", bytes.len());
        Ok(bytes)
    }
}

/// `<Topic>_<YYYY-MM-DD>.pdf`, with anything but ASCII letters, digits,
/// `-` and `_` in the topic replaced by `_`.
pub fn pdf_filename(topic: &str, date: &Date) -> String {
    let topic: String = topic.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let date = date.format(&ISO_DATE_FMT)
        .unwrap_or_else(|_| date.to_string());

    format!("{}_{}.pdf", &topic, &date)
}
