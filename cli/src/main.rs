mod bundle;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use codegen::test_module::DEFAULT_MODULE_NAME;
use codegen::{ExclusionPolicy, GenerateError, GenerateOptions, files};
use spectest::Example;
use spectest::parser::{ParseDiagnostic, Parsed, ReferenceExtractor, SpecParser};

use crate::bundle::BundleError;
use crate::config::{Config, ConfigError};

const DEFAULT_SPEC: &str = "spec.txt";
const DEFAULT_REFERENCE: &str = "TestsOk.elm";
const DEFAULT_OUTPUT: &str = "SpecTests.elm";
const DEFAULT_SAMPLE: &str = "sample.html";

#[derive(Parser)]
#[command(
    name = "spectest",
    version,
    about = "Generate Elm spec tests from a Markdown specification"
)]
struct Cli {
    /// Disable colored diagnostic output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log progress (-v) or everything (-vv). SPECTEST_LOG overrides this.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Config file (defaults to spectest.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    /// Arguments for `generate` when no subcommand is given
    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Write the test module and sample article (the default)
    Generate(GenerateArgs),

    /// List the examples found in a specification document
    List(ListArgs),

    /// Compile, minify and splice the demo page
    Bundle,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Specification document
    #[arg(short, long)]
    spec: Option<PathBuf>,

    /// Previously generated module holding expected output per example
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Generated test module
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generated sample article
    #[arg(long)]
    sample: Option<PathBuf>,

    /// TOML exclusion policy replacing the built-in one
    #[arg(long)]
    exclusions: Option<PathBuf>,

    /// Name of the generated Elm module
    #[arg(long)]
    module_name: Option<String>,

    /// Succeed even if the specification has no examples
    #[arg(long)]
    allow_empty: bool,

    /// Parse and generate, but write nothing
    #[arg(long)]
    check: bool,
}

#[derive(clap::Args)]
struct ListArgs {
    /// Specification document
    spec: Option<PathBuf>,

    /// Only list examples in this section (case-insensitive)
    #[arg(short, long)]
    section: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bundle(#[from] BundleError),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let result = Config::discover(cli.config.as_deref())
        .map_err(CliError::from)
        .and_then(|config| match cli.command {
            Some(Command::Generate(args)) => do_generate(args, &config, color_choice),
            Some(Command::List(args)) => do_list(args, &config, color_choice),
            Some(Command::Bundle) => do_bundle(&config),
            None => do_generate(cli.generate, &config, color_choice),
        });

    if let Err(error) = result {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("SPECTEST_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn do_generate(args: GenerateArgs, config: &Config, color_choice: ColorChoice) -> Result<(), CliError> {
    let spec_path = pick(args.spec, &config.spec, DEFAULT_SPEC);
    let reference_path = pick(args.reference, &config.reference, DEFAULT_REFERENCE);
    let output_path = pick(args.output, &config.output, DEFAULT_OUTPUT);
    let sample_path = pick(args.sample, &config.sample, DEFAULT_SAMPLE);

    let policy = match (&args.exclusions, &config.exclude) {
        (Some(path), _) => ExclusionPolicy::load(path)?,
        (None, Some(policy)) => policy.clone(),
        (None, None) => ExclusionPolicy::builtin(),
    };
    let options = GenerateOptions {
        module_name: args
            .module_name
            .or_else(|| config.module_name.clone())
            .unwrap_or_else(|| DEFAULT_MODULE_NAME.to_string()),
        allow_empty: args.allow_empty || config.allow_empty,
    };

    let spec_source = files::read_input(&spec_path)?;
    let reference_source = files::read_input(&reference_path)?;

    // File ids follow insertion order into `sources`.
    let spec_parser = SpecParser::new(&spec_source, 0);
    let reference_parser = ReferenceExtractor::new(&reference_source, 1);
    let mut sources = SimpleFiles::new();
    sources.add(spec_path.display().to_string(), spec_parser.source().to_string());
    sources.add(
        reference_path.display().to_string(),
        reference_parser.source().to_string(),
    );

    let examples = spec_parser.parse();
    let references = reference_parser.parse();
    emit_warnings(&sources, color_choice, &examples.warnings);
    emit_warnings(&sources, color_choice, &references.warnings);
    tracing::info!(
        examples = examples.value.len(),
        references = references.value.len(),
        "parsed inputs"
    );

    let artifacts = codegen::generate(&examples.value, &references.value, &policy, &options)?;

    if args.check {
        eprintln!(
            "ok: {} examples in {}, {} reference entries in {}",
            examples.value.len(),
            spec_path.display(),
            references.value.len(),
            reference_path.display()
        );
        return Ok(());
    }

    files::write(&output_path, &artifacts.test_module)?;
    files::write(&sample_path, &artifacts.sample_document)?;

    eprintln!(
        "wrote {} tests to {} and the sample article to {}",
        examples.value.len(),
        output_path.display(),
        sample_path.display()
    );
    Ok(())
}

fn do_list(args: ListArgs, config: &Config, color_choice: ColorChoice) -> Result<(), CliError> {
    let spec_path = pick(args.spec, &config.spec, DEFAULT_SPEC);
    let source = files::read_input(&spec_path)?;

    let parser = SpecParser::new(&source, 0);
    let mut sources = SimpleFiles::new();
    sources.add(spec_path.display().to_string(), parser.source().to_string());

    let Parsed { value, warnings } = parser.parse();
    emit_warnings(&sources, color_choice, &warnings);

    let wanted = args.section.map(|s| s.to_lowercase());
    for example in value.iter().filter(|e| in_section(e, wanted.as_deref())) {
        let section = if example.section.is_empty() {
            "(none)"
        } else {
            example.section.as_str()
        };
        println!("{:>5}  {}", example.number, section);
    }
    Ok(())
}

fn in_section(example: &Example, wanted: Option<&str>) -> bool {
    wanted.is_none_or(|section| example.section.to_lowercase() == section)
}

fn do_bundle(config: &Config) -> Result<(), CliError> {
    let bundle_config = config.bundle.clone().unwrap_or_default();
    bundle::run(&bundle_config)?;
    eprintln!(
        "ok: bundled {}",
        bundle_config.working_dir.join(&bundle_config.output).display()
    );
    Ok(())
}

/// Command-line value, then config value, then the built-in default.
fn pick(flag: Option<PathBuf>, configured: &Option<PathBuf>, default: &str) -> PathBuf {
    flag.or_else(|| configured.clone())
        .unwrap_or_else(|| Path::new(default).to_path_buf())
}

fn emit_warnings(
    sources: &SimpleFiles<String, String>,
    color_choice: ColorChoice,
    warnings: &[ParseDiagnostic],
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for warning in warnings {
        let diagnostic = warning.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, sources, &diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn global_flags_before_subcommand() {
        let cli = parse(&["spectest", "--config", "c.toml", "bundle"]);
        assert!(matches!(cli.command, Some(Command::Bundle)));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));

        let cli = parse(&["spectest", "-v", "list", "s.txt"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Command::List(args)) => assert_eq!(args.spec, Some(PathBuf::from("s.txt"))),
            _ => panic!("expected list subcommand"),
        }

        let cli = parse(&["spectest", "--no-color", "generate"]);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Some(Command::Generate(_))));
    }

    #[test]
    fn generate_is_the_default() {
        let cli = parse(&["spectest", "-vv", "--spec", "spec.txt", "-r", "ref.elm"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.generate.spec, Some(PathBuf::from("spec.txt")));
        assert_eq!(cli.generate.reference, Some(PathBuf::from("ref.elm")));
    }

    #[test]
    fn positional_spec_is_rejected_for_generate() {
        assert!(Cli::try_parse_from(["spectest", "spec.txt"]).is_err());
    }

    fn generate_args(dir: &Path, check: bool) -> GenerateArgs {
        GenerateArgs {
            spec: Some(dir.join("spec.txt")),
            reference: Some(dir.join("ref.elm")),
            output: Some(dir.join("SpecTests.elm")),
            sample: Some(dir.join("sample.html")),
            exclusions: None,
            module_name: None,
            allow_empty: false,
            check,
        }
    }

    #[test]
    fn check_still_rejects_a_spec_without_examples() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::write(dir.path().join("spec.txt"), "no examples here\n").unwrap();
        std::fs::write(dir.path().join("ref.elm"), "").unwrap();

        let result = do_generate(
            generate_args(dir.path(), true),
            &Config::default(),
            ColorChoice::Never,
        );
        assert!(matches!(result, Err(CliError::Generate(GenerateError::NoExamples))));
        assert!(!dir.path().join("SpecTests.elm").exists());
    }

    #[test]
    fn check_writes_nothing() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let fence = "`".repeat(32);
        let spec = format!("# Tabs\n{f} example\n\tfoo\n.\n<p>foo</p>\n{f}\n", f = fence);
        std::fs::write(dir.path().join("spec.txt"), spec).unwrap();
        std::fs::write(dir.path().join("ref.elm"), "").unwrap();

        do_generate(generate_args(dir.path(), true), &Config::default(), ColorChoice::Never)
            .expect("check should pass");
        assert!(!dir.path().join("SpecTests.elm").exists());
        assert!(!dir.path().join("sample.html").exists());

        do_generate(generate_args(dir.path(), false), &Config::default(), ColorChoice::Never)
            .expect("generate should pass");
        assert!(dir.path().join("SpecTests.elm").exists());
        assert!(dir.path().join("sample.html").exists());
    }
}
