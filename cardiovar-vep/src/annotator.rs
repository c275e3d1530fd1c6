use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotationFailure {
    #[error("Failed to launch annotation tool {program:?}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Annotation tool exited with {status} for {input:?}: {stderr}")]
    ToolFailed {
        input: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("Annotation tool reported success but produced no output at {0:?}")]
    MissingOutput(PathBuf),

    #[error("Input file for annotation does not exist: {0:?}")]
    MissingInput(PathBuf),
}

///
/// The external annotation step: takes a variant file, returns the path of the
/// annotated variant file.
///
/// The rest of the pipeline only depends on this trait, never on how the tool is
/// packaged or launched.
///
pub trait Annotator {
    fn annotate(&self, input: &Path) -> Result<PathBuf, AnnotationFailure>;
}

pub const INPUT_PLACEHOLDER: &str = "{input}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

///
/// Runs an external program as the annotator.
///
/// Arguments may contain `{input}` and `{output}`, which are substituted with the
/// input path and the computed output path (`<output_dir>/<stem>.vep.vcf`).
///
#[derive(Debug, Clone)]
pub struct CommandAnnotator {
    pub program: String,
    pub args: Vec<String>,
    pub output_dir: PathBuf,
}

impl CommandAnnotator {
    pub fn new(program: &str, args: Vec<String>, output_dir: &Path) -> Self {
        CommandAnnotator {
            program: program.to_string(),
            args,
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "variants".to_string());
        let stem = name
            .trim_end_matches(".gz")
            .trim_end_matches(".vcf")
            .to_string();
        self.output_dir.join(format!("{stem}.vep.vcf"))
    }

    fn render_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

impl Annotator for CommandAnnotator {
    fn annotate(&self, input: &Path) -> Result<PathBuf, AnnotationFailure> {
        if !input.exists() {
            return Err(AnnotationFailure::MissingInput(input.to_path_buf()));
        }

        let output = self.output_path_for(input);
        let args = self.render_args(input, &output);
        debug!("Running {} {:?}", self.program, args);

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| AnnotationFailure::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(AnnotationFailure::ToolFailed {
                input: input.to_path_buf(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        if !output.exists() {
            return Err(AnnotationFailure::MissingOutput(output));
        }

        info!("Annotated {:?} -> {:?}", input, output);
        Ok(output)
    }
}
