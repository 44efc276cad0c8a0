//! Command-line interface definitions for reviewdoc

use clap::{Args, Parser, Subcommand};
use reviewdoc::assembler::{Layout, ProsConsMode};
use reviewdoc::editor::EditOp;
use reviewdoc::extractor::SourceKind;
use std::path::PathBuf;

/// CLI structure for the reviewdoc application
#[derive(Parser)]
#[command(name = "reviewdoc")]
#[command(version)]
#[command(about = "Convert Word documents into template-styled review HTML", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./reviewdoc.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Input document options shared by several subcommands
#[derive(Args)]
pub struct InputArgs {
    /// Document to read (.docx, .txt, .md, .html)
    #[arg(value_name = "DOCUMENT")]
    pub input: PathBuf,

    /// Read the document as this kind instead of going by its extension
    #[arg(long = "as", value_enum, value_name = "KIND")]
    pub source_kind: Option<SourceKind>,
}

/// Output options shared by the subcommands that write HTML
#[derive(Args)]
pub struct OutputArgs {
    /// Output file (defaults to the document name with an .html extension)
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the HTML to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Available subcommands for reviewdoc
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a document into a complete page using one of the layouts
    Convert {
        #[command(flatten)]
        input: InputArgs,

        /// Page layout
        #[arg(short, long, value_enum, default_value = "comparison")]
        layout: Layout,

        #[command(flatten)]
        output: OutputArgs,

        /// Insert extracted text without HTML-escaping it
        #[arg(long)]
        raw_text: bool,

        /// Pros/cons pane content in the single-subject layout
        #[arg(long, value_enum)]
        pros_cons: Option<ProsConsMode>,

        /// Stylesheet linked from the page
        #[arg(long)]
        stylesheet: Option<String>,
    },

    /// Print the HTML extracted from a document
    Extract {
        #[command(flatten)]
        input: InputArgs,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the sections detected in a document
    Sections {
        #[command(flatten)]
        input: InputArgs,

        /// Use the assisted classification service instead of the structural parser
        #[arg(long)]
        analyze: bool,

        /// Print sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply section edits and write the styled page
    Edit {
        #[command(flatten)]
        input: InputArgs,

        /// Edit to apply, in order: style:ID=STYLE, up:ID, down:ID, move:ID=INDEX, delete:ID, select:ID
        #[arg(long = "op", value_name = "OP")]
        ops: Vec<EditOp>,

        /// Start from the assisted classification service's sections
        #[arg(long)]
        analyze: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Answer an analysis request ({"html", "styleNodes"} JSON) with suggested sections
    Analyze {
        /// Request file (reads stdin when omitted)
        #[arg(long, value_name = "FILE")]
        request: Option<PathBuf>,
    },

    /// List available style templates
    ListStyles,

    /// Write a configuration file with the default settings
    InitConfig {
        /// Where to write the file
        #[arg(default_value = "reviewdoc.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
