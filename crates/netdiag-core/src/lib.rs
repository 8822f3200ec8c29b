#![forbid(unsafe_code)]

//! Network diagram input model (headless).
//!
//! Two front ends produce the same validated [`Diagram`]:
//! - a JSON command document ([`json`])
//! - a line-oriented script ([`script`])
//!
//! Layout and SVG rendering live in `netdiag-render`.

pub mod config;
pub mod error;
pub mod geom;
pub mod json;
pub mod model;
pub mod palette;
pub mod script;
pub mod validate;

pub use config::{DiagramConfig, DocumentStyle, FontStyle};
pub use error::{Error, Result};
pub use json::{DiagramCommand, interpret_command, parse_json};
pub use model::{Diagram, Link, Node, NodeSide, SuperNode};
pub use palette::{LinkPalette, Rgb};
pub use script::{ScriptParser, parse_script};
pub use validate::validate_diagram;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// A validated diagram together with the style it should be rendered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDiagram {
    pub diagram: Diagram,
    pub style: DocumentStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputFormat {
    #[default]
    Json,
    Script,
}

impl InputFormat {
    /// `.json` files are JSON commands; everything else is treated as a script.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Script,
        }
    }

    /// Sniffs stdin-style input: a leading `{` means JSON.
    pub fn detect(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Script
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "script" | "ndg" => Ok(Self::Script),
            other => Err(format!("unknown input format: {other}")),
        }
    }
}

pub fn parse(text: &str, format: InputFormat) -> Result<ParsedDiagram> {
    match format {
        InputFormat::Json => parse_json(text),
        InputFormat::Script => parse_script(text),
    }
}
