use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use diffpresent::{DiffPresenter, EncodedText, PresenterConfig, Value};
use tracing::debug;

use crate::cli::{Cli, ColorChoice};

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = resolve_config(&cli, io::stdout().is_terminal())?;
    match cli.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {}
    }

    let expected = read(&cli.expected)?;
    let actual = read(&cli.actual)?;
    debug!(
        expected = %cli.expected.display(),
        actual = %cli.actual.display(),
        json = cli.json,
        "comparing files"
    );

    let presenter = DiffPresenter::new(config);
    let diff = produce_diff(&presenter, &cli, expected, actual)?;

    if diff.is_empty() {
        println!("{} No differences.", "✓".green().bold());
        return Ok(ExitCode::SUCCESS);
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(&diff).context("failed to write diff")?;
    stdout.flush()?;
    Ok(ExitCode::from(1))
}

/// Build the presenter configuration from the config file and flags.
///
/// Flags win over the file. With `--color auto`, color is on when the file
/// asks for it or stdout is a terminal.
fn resolve_config(cli: &Cli, stdout_is_terminal: bool) -> anyhow::Result<PresenterConfig> {
    let mut config = match &cli.config {
        Some(path) => PresenterConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => PresenterConfig::default(),
    };
    if let Some(context) = cli.context {
        config.context_lines = context;
    }
    config.color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => config.color || stdout_is_terminal,
    };
    Ok(config)
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// The rendered diff as raw bytes, in the encoding the presenter chose.
fn produce_diff(
    presenter: &DiffPresenter,
    cli: &Cli,
    expected: Vec<u8>,
    actual: Vec<u8>,
) -> anyhow::Result<Vec<u8>> {
    if cli.json {
        let expected = parse_json(&expected, &cli.expected)?;
        let actual = parse_json(&actual, &cli.actual)?;
        return Ok(presenter.diff_as_object(&actual, &expected).into_bytes());
    }
    let expected = EncodedText::new(expected, cli.expected_encoding);
    let actual = EncodedText::new(actual, cli.actual_encoding);
    Ok(presenter.diff_encoded(&actual, &expected).into_bytes())
}

fn parse_json(bytes: &[u8], path: &Path) -> anyhow::Result<Value> {
    let json: serde_json::Value = serde_json::from_slice(bytes)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(Value::from(json))
}
