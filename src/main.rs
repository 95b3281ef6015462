use anyhow::{Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use log::{LevelFilter, info};
use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use stepform::cli::{Cli, Command};
use stepform::runtime::{Console, DryRunSubmitter, FormSubmitter, HttpSubmitter, RunOutcome};
use stepform::{FieldRegistry, FormConfig, StepValidator};

fn setup_logging(level: Option<&str>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn).parse_default_env();
    if let Some(level) = level {
        let filter: LevelFilter = level
            .parse()
            .with_context(|| format!("invalid log level `{level}`"))?;
        builder.filter_level(filter);
    }
    builder.init();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = setup_logging(cli.log_level.as_deref()) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Check { form } => {
            let config = load_form(&form)?;
            print_overview(&config);
            config
                .into_parts()
                .with_context(|| format!("form definition {} is inconsistent", form.display()))?;
            println!("ok");
            Ok(ExitCode::SUCCESS)
        }
        Command::Run {
            form,
            answers,
            dry_run,
            base_url,
        } => {
            let config = load_form(&form)?;
            let registry = FieldRegistry::with_memory_inputs(config.field_ids());
            let parts = config
                .into_parts()
                .with_context(|| format!("form definition {} is inconsistent", form.display()))?;
            let submitter: Box<dyn FormSubmitter> = if dry_run {
                Box::new(DryRunSubmitter::new(io::stdout()))
            } else {
                Box::new(HttpSubmitter::new(base_url))
            };
            let mut wizard = StepValidator::new(parts, registry, submitter)?;

            let stdin = io::stdin();
            let mut console = Console::new(stdin.lock(), io::stdout(), io::stderr());
            let outcome = match answers {
                Some(path) => {
                    let answers = load_answers(&path)?;
                    console.run_scripted(&mut wizard, &answers)?
                }
                None => console.run_interactive(&mut wizard)?,
            };
            info!("run finished: {outcome:?}");

            Ok(match outcome {
                RunOutcome::Submitted(_) => ExitCode::SUCCESS,
                RunOutcome::Blocked { .. } => ExitCode::from(2),
                RunOutcome::Cancelled => ExitCode::from(130),
            })
        }
    }
}

fn load_form(path: &Path) -> Result<FormConfig> {
    FormConfig::load(path).with_context(|| format!("failed to load form {}", path.display()))
}

fn load_answers(path: &Path) -> Result<IndexMap<String, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read answers {}", path.display()))?;
    let raw: IndexMap<String, serde_yaml::Value> = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse answers {}", path.display()))?;

    raw.into_iter()
        .map(|(id, value)| {
            let text = match value {
                serde_yaml::Value::Null => String::new(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::String(s) => s,
                other => anyhow::bail!("answer for `{id}` must be a scalar, got {other:?}"),
            };
            Ok((id, text))
        })
        .collect()
}

fn print_overview(config: &FormConfig) {
    println!("action: {} ({:?})", config.form.action, config.form.method);
    for (index, step) in config.steps.iter().enumerate() {
        println!("step {}: {} [{}]", index + 1, step.title, step.id);
        for field in &step.fields {
            let label = field.label.as_deref().unwrap_or(field.id.as_str());
            let required = if field.required { " required" } else { "" };
            println!("  - {} ({:?}{required}): {label}", field.id, field.kind);
        }
    }
    println!("summary slots: {}", config.summary.len());
}
