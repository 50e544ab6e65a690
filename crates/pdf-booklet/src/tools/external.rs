//! `pdftk`, `pdfcrop` and `pdfjam` driven through tokio processes

use super::*;
use crate::constants::{BURST_METADATA_FILE, BURST_PATTERN, BURST_PREFIX};
use crate::options::ToolPaths;
use std::ffi::{OsStr, OsString};
use std::process::Output;
use tokio::process::Command;

/// Production toolchain
#[derive(Debug, Clone, Default)]
pub struct ExternalTools {
    paths: ToolPaths,
}

impl ExternalTools {
    pub fn new(paths: ToolPaths) -> Self {
        Self { paths }
    }

    async fn run(&self, program: &str, args: &[OsString], dir: Option<&Path>) -> Result<Output> {
        log::debug!(
            "Running {} {}",
            program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|source| BookletError::ToolNotFound {
                tool: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(BookletError::ToolFailed {
                tool: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    items.into_iter().map(Into::into).collect()
}

impl Burst for ExternalTools {
    async fn burst(&self, input: &Path, dir: &Path) -> Result<BurstOutput> {
        // pdftk runs inside `dir`, so the input has to survive the cwd change
        let input = tokio::fs::canonicalize(input).await?;
        self.run(
            &self.paths.pdftk,
            &args([
                input.into_os_string(),
                "burst".into(),
                "output".into(),
                BURST_PATTERN.into(),
            ]),
            Some(dir),
        )
        .await?;

        let metadata = tokio::fs::read_to_string(dir.join(BURST_METADATA_FILE)).await?;

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(BURST_PREFIX) && name.ends_with(".pdf") {
                files.push(entry.path());
            }
        }
        // Zero-padded page numbers sort in page order
        files.sort();

        Ok(BurstOutput { files, metadata })
    }

    async fn dump_data(&self, input: &Path) -> Result<String> {
        let output = self
            .run(
                &self.paths.pdftk,
                &args([input.as_os_str(), OsStr::new("dump_data")]),
                None,
            )
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Crop for ExternalTools {
    async fn crop(&self, input: &Path, output: &Path, margins: Option<CropMargins>) -> Result<()> {
        let mut argv = Vec::new();
        if let Some(margins) = margins {
            argv.push(OsString::from("--margins"));
            argv.push(margins.to_string().into());
        }
        argv.push(input.into());
        argv.push(output.into());
        self.run(&self.paths.pdfcrop, &argv, None).await?;
        Ok(())
    }
}

impl Resize for ExternalTools {
    async fn resize(&self, input: &Path, output: &Path, width: f64, height: f64) -> Result<()> {
        self.run(
            &self.paths.pdfjam,
            &args([
                OsString::from("--noautoscale"),
                "true".into(),
                "--papersize".into(),
                format!("{{{}pt,{}pt}}", width, height).into(),
                "--outfile".into(),
                output.into(),
                input.into(),
            ]),
            None,
        )
        .await?;
        Ok(())
    }
}

impl Concatenate for ExternalTools {
    async fn concatenate(&self, inputs: &[&Path], output: &Path) -> Result<()> {
        let mut argv: Vec<OsString> = inputs.iter().map(|p| p.into()).collect();
        argv.extend(args(["cat", "output"]));
        argv.push(output.into());
        self.run(&self.paths.pdftk, &argv, None).await?;
        Ok(())
    }
}

impl Impose for ExternalTools {
    async fn impose(&self, input: &Path, output: &Path) -> Result<()> {
        self.run(
            &self.paths.pdfjam,
            &args([
                OsString::from("--booklet"),
                "true".into(),
                "--landscape".into(),
                "--outfile".into(),
                output.into(),
                input.into(),
            ]),
            None,
        )
        .await?;
        Ok(())
    }
}

impl Inspect for ExternalTools {
    async fn page_dimensions(&self, path: &Path) -> Result<Dimensions> {
        super::inspect::measure_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let tools = ExternalTools::new(ToolPaths {
            pdftk: "pdf-booklet-no-such-program".to_string(),
            ..Default::default()
        });
        let result = tools.dump_data(Path::new("in.pdf")).await;
        match result {
            Err(BookletError::ToolNotFound { tool, .. }) => {
                assert_eq!(tool, "pdf-booklet-no-such-program");
            }
            other => panic!("Expected ToolNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program_is_reported() {
        let tools = ExternalTools::new(ToolPaths {
            pdfcrop: "false".to_string(),
            ..Default::default()
        });
        let result = tools
            .crop(Path::new("in.pdf"), Path::new("out.pdf"), None)
            .await;
        assert!(matches!(result, Err(BookletError::ToolFailed { .. })));
    }
}
