//! Markdown to styled HTML and PDF conversion.
//!
//! The binary drives [`assemble::run`], which walks an input directory,
//! renders each Markdown document (or one merged corpus), injects heading
//! anchors, builds a table of contents, resolves image references, and
//! writes the finished output.

pub mod assemble;
pub mod cli;
pub mod config;
pub mod images;
pub mod pdf;
pub mod remap;
pub mod template;
pub mod toc;
