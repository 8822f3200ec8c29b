#![forbid(unsafe_code)]

//! Headless layout + SVG renderer for network diagrams.
//!
//! Rendering is a pure function of a validated [`netdiag_core::Diagram`] and a
//! [`netdiag_core::DocumentStyle`]: the input is borrowed immutably and all layout state lives in
//! a per-call [`layout::DocumentLayout`], so rendering the same diagram twice yields identical
//! output.

pub mod arrow;
pub mod connection;
pub mod document;
pub mod layout;
pub mod link;
pub mod node;
pub mod super_node;
pub mod svg;
pub mod text;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use std::sync::Arc;

pub use arrow::{ArrowPolygon, build_arrow_polygon};
pub use connection::resolve_connection_point;
pub use document::{layout_document, render_document};
pub use layout::{DocumentDimensions, DocumentLayout, LayoutTable};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error(transparent)]
    Core(#[from] netdiag_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct RenderOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions").finish_non_exhaustive()
    }
}
