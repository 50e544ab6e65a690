use crate::constants::{DEFAULT_PADDING_PAGE, DEFAULT_SINGLE_PAGES, OUTPUT_SUFFIX};
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// External programs the production toolchain runs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ToolPaths {
    /// Burst, metadata dump and concatenation
    pub pdftk: String,
    /// Half-page cuts and the final trim
    pub pdfcrop: String,
    /// Fixed-size resize and booklet imposition
    pub pdfjam: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pdftk: "pdftk".to_string(),
            pdfcrop: "pdfcrop".to_string(),
            pdfjam: "pdfjam".to_string(),
        }
    }
}

/// Booklet configuration, built once and passed to every stage
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookletOptions {
    // Files
    pub input: PathBuf,
    pub output: Option<PathBuf>,

    // Page accounting
    /// Physical pages that are already single book pages
    pub single_pages: String,
    pub padding_position: PaddingPosition,
    /// Book page duplicated for padding, negative counts from the end
    pub padding_page: i64,

    // Programs
    pub tools: ToolPaths,
}

impl Default for BookletOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            single_pages: DEFAULT_SINGLE_PAGES.to_string(),
            padding_position: PaddingPosition::default(),
            padding_page: DEFAULT_PADDING_PAGE,
            tools: ToolPaths::default(),
        }
    }
}

impl BookletOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| BookletError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BookletError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Where the booklet is written: the explicit output, or the input with
    /// `-printable` inserted before the extension.
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }

        let name = self.input.to_string_lossy();
        let stem = if has_pdf_extension(&name) {
            &name[..name.len() - ".pdf".len()]
        } else {
            &name[..]
        };
        PathBuf::from(format!("{}{}.pdf", stem, OUTPUT_SUFFIX))
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(BookletError::Config("No input file specified".to_string()));
        }

        if !has_pdf_extension(&self.input.to_string_lossy()) {
            return Err(BookletError::Config(format!(
                "Input {} doesn't end with .pdf",
                self.input.display()
            )));
        }

        if self.padding_page == 0 {
            return Err(BookletError::Config(
                "Padding page must be non-zero (1 is the first page, -1 the last)".to_string(),
            ));
        }

        if self.output_path() == self.input {
            return Err(BookletError::Config(
                "Output would overwrite the input".to_string(),
            ));
        }

        Ok(())
    }
}

fn has_pdf_extension(name: &str) -> bool {
    name.len() > ".pdf".len() && name.to_ascii_lowercase().ends_with(".pdf")
}
