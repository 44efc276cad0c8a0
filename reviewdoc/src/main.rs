//! reviewdoc - Word-to-HTML converter for casino review pages

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, InputArgs, OutputArgs};
use reviewdoc::assembler::{EscapePolicy, Layout, ProsConsMode};
use reviewdoc::classifier::assisted::{
    self, AnalyzeRequest, AnthropicClient, TextGenerator,
};
use reviewdoc::config::ToolConfig;
use reviewdoc::editor::EditOp;
use reviewdoc::pipeline::{self, Destination};
use reviewdoc::styles;
use std::io::Read;
use std::path::{Path, PathBuf};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }

    let config = ToolConfig::discover(cli.config.as_deref(), Path::new("."))
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Convert {
            input,
            layout,
            output,
            raw_text,
            pros_cons,
            stylesheet,
        } => handle_convert_command(
            &config,
            input,
            layout,
            output,
            ConvertOverrides {
                raw_text,
                pros_cons,
                stylesheet,
            },
        ),
        Commands::Extract { input, output } => handle_extract_command(input, output),
        Commands::Sections {
            input,
            analyze,
            json,
        } => handle_sections_command(&config, input, analyze, json),
        Commands::Edit {
            input,
            ops,
            analyze,
            output,
        } => handle_edit_command(&config, input, &ops, analyze, output),
        Commands::Analyze { request } => handle_analyze_command(&config, request),
        Commands::ListStyles => {
            handle_list_styles_command();
            Ok(())
        }
        Commands::InitConfig { path, force } => handle_init_config_command(&path, force),
    }
}

/// Command-line settings that take precedence over reviewdoc.toml
struct ConvertOverrides {
    raw_text: bool,
    pros_cons: Option<ProsConsMode>,
    stylesheet: Option<String>,
}

/// Progress messages go to stderr while the HTML itself is written to stdout
fn progress(quiet_stdout: bool, message: &str) {
    if quiet_stdout {
        eprintln!("{}", message);
    } else {
        println!("{}", message);
    }
}

/// Handle the convert command
fn handle_convert_command(
    config: &ToolConfig,
    input: InputArgs,
    layout: Layout,
    output: OutputArgs,
    overrides: ConvertOverrides,
) -> Result<()> {
    let destination = Destination::resolve(&input.input, output.output, output.stdout)?;
    let to_stdout = destination == Destination::Stdout;

    let mut options = config.assembly_options();
    if overrides.raw_text {
        options.escape = EscapePolicy::Raw;
    }
    if let Some(mode) = overrides.pros_cons {
        options.pros_cons = mode;
    }
    if let Some(stylesheet) = overrides.stylesheet {
        options.stylesheet = stylesheet;
    }

    progress(to_stdout, &format!("Converting {}", input.input.display()));

    // Stage 1: Extract
    progress(to_stdout, "\n[Stage 1/3] Extracting document...");
    let extracted = pipeline::extract(&input.input, input.source_kind)
        .with_context(|| format!("Failed to extract {}", input.input.display()))?;
    progress(
        to_stdout,
        &format!(
            "✓ Extracted {} characters of HTML ({:?})",
            extracted.html.len(),
            extracted.kind
        ),
    );

    // Stage 2: Assemble
    progress(
        to_stdout,
        &format!("\n[Stage 2/3] Assembling {:?} layout...", layout),
    );
    let html = pipeline::assemble(&extracted, layout, &options)
        .context("Failed to assemble the page")?;
    progress(to_stdout, "✓ Page assembled");

    // Stage 3: Export
    progress(to_stdout, "\n[Stage 3/3] Exporting...");
    pipeline::export(&html, &destination)?;
    if let Destination::File(path) = &destination {
        println!("✓ Wrote {}", path.display());
    }

    Ok(())
}

/// Handle the extract command
fn handle_extract_command(input: InputArgs, output: Option<PathBuf>) -> Result<()> {
    let extracted = pipeline::extract(&input.input, input.source_kind)
        .with_context(|| format!("Failed to extract {}", input.input.display()))?;

    let destination = match output {
        Some(path) => Destination::resolve(&input.input, Some(path), false)?,
        None => Destination::Stdout,
    };
    pipeline::export(&extracted.html, &destination)?;
    if let Destination::File(path) = &destination {
        println!("✓ Wrote {}", path.display());
    }

    Ok(())
}

/// Handle the sections command
fn handle_sections_command(
    config: &ToolConfig,
    input: InputArgs,
    analyze: bool,
    json: bool,
) -> Result<()> {
    let extracted = pipeline::extract(&input.input, input.source_kind)
        .with_context(|| format!("Failed to extract {}", input.input.display()))?;

    let client = if analyze {
        Some(AnthropicClient::from_env(&config.classifier)?)
    } else {
        None
    };
    let editor = pipeline::prepare_editor(
        &extracted.html,
        client.as_ref().map(|c| c as &dyn TextGenerator),
        &config.editor_stylesheet,
    )
    .context("Failed to build sections")?;

    if json {
        let listing = serde_json::to_string_pretty(editor.sections())
            .context("Failed to serialize sections")?;
        println!("{}", listing);
        return Ok(());
    }

    println!("Found {} sections:\n", editor.sections().len());
    for summary in editor.summaries() {
        println!("{}", summary);
    }

    Ok(())
}

/// Handle the edit command
fn handle_edit_command(
    config: &ToolConfig,
    input: InputArgs,
    ops: &[EditOp],
    analyze: bool,
    output: OutputArgs,
) -> Result<()> {
    let destination = Destination::resolve(&input.input, output.output, output.stdout)?;
    let to_stdout = destination == Destination::Stdout;

    // Stage 1: Extract
    progress(to_stdout, "\n[Stage 1/3] Extracting document...");
    let extracted = pipeline::extract(&input.input, input.source_kind)
        .with_context(|| format!("Failed to extract {}", input.input.display()))?;
    progress(
        to_stdout,
        &format!("✓ Extracted {} characters of HTML", extracted.html.len()),
    );

    // Stage 2: Sections and edits
    progress(to_stdout, "\n[Stage 2/3] Building sections...");
    let client = if analyze {
        Some(AnthropicClient::from_env(&config.classifier)?)
    } else {
        None
    };
    let mut editor = pipeline::prepare_editor(
        &extracted.html,
        client.as_ref().map(|c| c as &dyn TextGenerator),
        &config.editor_stylesheet,
    )
    .context("Failed to build sections")?;
    progress(
        to_stdout,
        &format!("✓ {} sections", editor.sections().len()),
    );

    pipeline::apply_edits(&mut editor, ops).context("Failed to apply edits")?;
    if !ops.is_empty() {
        progress(to_stdout, &format!("✓ Applied {} edits", ops.len()));
    }

    // Stage 3: Export
    progress(to_stdout, "\n[Stage 3/3] Exporting...");
    pipeline::export(&editor.render(), &destination)?;
    if let Destination::File(path) = &destination {
        println!("✓ Wrote {}", path.display());
    }

    Ok(())
}

/// Handle the analyze command
fn handle_analyze_command(config: &ToolConfig, request: Option<PathBuf>) -> Result<()> {
    let body = match &request {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request from stdin")?;
            body
        }
    };

    let request: AnalyzeRequest =
        serde_json::from_str(&body).context("Invalid analysis request")?;
    let request = if request.style_nodes.is_empty() {
        AnalyzeRequest::with_registry(request.html)
    } else {
        request
    };

    let client = AnthropicClient::from_env(&config.classifier);
    let response = assisted::handle_analyze(
        &request,
        client.as_ref().map(|c| c as &dyn TextGenerator),
    );

    let rendered =
        serde_json::to_string_pretty(&response).context("Failed to serialize response")?;
    println!("{}", rendered);

    if response.status() != 200 {
        anyhow::bail!("Analysis failed (status {})", response.status());
    }

    Ok(())
}

/// Handle the list-styles command
fn handle_list_styles_command() {
    println!("Available styles:\n");

    for style in styles::all() {
        println!("  {} {} - {} ({})", style.icon, style.id, style.name, style.category);
        println!("    {}", style.description);
        println!();
    }

    println!("Usage: reviewdoc edit <document> --op style:<section-id>=<style>");
}

/// Handle the init-config command
fn handle_init_config_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it",
            path.display()
        );
    }

    ToolConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✓ Wrote default configuration to {}", path.display());

    Ok(())
}
