use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("{0} command is empty")]
    EmptyCommand(&'static str),

    #[error("cannot run '{command}': {source}")]
    Spawn { command: String, source: io::Error },

    #[error("'{command}' failed ({status}){}", stderr_suffix(.stderr))]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("cannot read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{}", stderr)
    }
}

/// The compile, minify and splice steps that turn the demo app into a page.
///
/// Commands are argument vectors run without a shell. The template and output
/// paths are relative to `working_dir`, as are the commands.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    #[serde(default = "default_compile")]
    pub compile: Vec<String>,

    #[serde(default = "default_minify")]
    pub minify: Vec<String>,

    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Text in the template that gets replaced by `script`.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default = "default_script")]
    pub script: String,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_compile() -> Vec<String> {
    ["elm", "make", "Main.elm", "--output=../main.js"]
        .map(String::from)
        .to_vec()
}

fn default_minify() -> Vec<String> {
    ["uglifyjs", "../main.js", "--output", "../main.js"]
        .map(String::from)
        .to_vec()
}

fn default_template() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_placeholder() -> String {
    "/_compile/Main.elm".to_string()
}

fn default_script() -> String {
    "main.js".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("../index.html")
}

impl Default for BundleConfig {
    fn default() -> Self {
        BundleConfig {
            working_dir: default_working_dir(),
            compile: default_compile(),
            minify: default_minify(),
            template: default_template(),
            placeholder: default_placeholder(),
            script: default_script(),
            output: default_output(),
        }
    }
}

/// Run the chain. Each step starts only after the previous one succeeded;
/// artifacts left by a failed step are not cleaned up.
pub fn run(config: &BundleConfig) -> Result<(), BundleError> {
    run_step("compile", &config.compile, &config.working_dir)?;
    run_step("minify", &config.minify, &config.working_dir)?;
    write_page(config)
}

fn run_step(step: &'static str, argv: &[String], dir: &Path) -> Result<(), BundleError> {
    let (program, args) = argv.split_first().ok_or(BundleError::EmptyCommand(step))?;
    let command = argv.join(" ");
    tracing::info!(step, %command, "running");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| BundleError::Spawn {
            command: command.clone(),
            source,
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(BundleError::Failed {
            command,
            status: output.status,
            stderr,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        tracing::info!(step, "{}", stdout.trim_end());
    }
    if !stderr.is_empty() {
        tracing::warn!(step, "{}", stderr);
    }
    Ok(())
}

fn write_page(config: &BundleConfig) -> Result<(), BundleError> {
    let template_path = config.working_dir.join(&config.template);
    let template = std::fs::read_to_string(&template_path).map_err(|source| BundleError::Read {
        path: template_path.clone(),
        source,
    })?;

    if !template.contains(&config.placeholder) {
        tracing::warn!(
            template = %template_path.display(),
            placeholder = %config.placeholder,
            "placeholder not found, page written unchanged"
        );
    }
    let page = splice_script(&template, &config.placeholder, &config.script);

    let output_path = config.working_dir.join(&config.output);
    std::fs::write(&output_path, page).map_err(|source| BundleError::Write {
        path: output_path.clone(),
        source,
    })?;
    tracing::info!(path = %output_path.display(), "wrote page");
    Ok(())
}

/// Replace the first occurrence of `placeholder` with `script`.
pub fn splice_script(template: &str, placeholder: &str, script: &str) -> String {
    template.replacen(placeholder, script, 1)
}
