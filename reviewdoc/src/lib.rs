//! reviewdoc - convert Word documents into template-styled casino review HTML
//!
//! The library exposes each stage of the conversion so it can be driven
//! from the command line or embedded:
//! - [`extractor`] reads `.docx`, plain-text and HTML uploads into HTML
//! - [`parser`] splits HTML into editable [`section::Section`]s
//! - [`classifier`] tags headings by keyword and offers assisted analysis
//! - [`assembler`] builds the comparison and single-subject page skeletons
//! - [`editor`] restyles, reorders and deletes sections, then renders them
//! - [`export`] writes the result

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), warn(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod dom;
pub mod editor;
pub mod export;
pub mod extractor;
pub mod parser;
pub mod pipeline;
pub mod section;
pub mod styles;
