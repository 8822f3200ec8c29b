#![forbid(unsafe_code)]

//! `netdiag` renders network diagrams headlessly.
//!
//! Input is either a JSON command document or a line-oriented script; both resolve to the same
//! validated [`Diagram`] plus a [`DocumentStyle`]. Rendering produces a standalone SVG document.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`netdiag::render`)
//! - `raster`: enable PNG output via pure-Rust SVG rasterization

pub use netdiag_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use netdiag_render::text::{
        DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle,
    };
    pub use netdiag_render::Error as RenderError;
    pub use netdiag_render::{DocumentLayout, RenderOptions, layout_document, render_document};

    use netdiag_core::{InputFormat, ParsedDiagram};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] netdiag_core::Error),
        #[error(transparent)]
        Render(#[from] netdiag_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Renders an already parsed diagram with its own style.
    pub fn render_parsed_svg(parsed: &ParsedDiagram, options: &RenderOptions) -> Result<String> {
        Ok(netdiag_render::render_document(
            &parsed.diagram,
            &parsed.style,
            options,
        )?)
    }

    /// Synchronous parse + render helper (executor-free).
    pub fn render_svg_sync(
        text: &str,
        format: InputFormat,
        options: &RenderOptions,
    ) -> Result<String> {
        let parsed = netdiag_core::parse(text, format)?;
        render_parsed_svg(&parsed, options)
    }

    /// Bundles the input format and render options for repeated headless rendering.
    ///
    /// With no explicit format the input is sniffed per call (see [`InputFormat::detect`]).
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub format: Option<InputFormat>,
        pub options: RenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_format(mut self, format: InputFormat) -> Self {
            self.format = Some(format);
            self
        }

        pub fn with_text_measurer(
            mut self,
            measurer: std::sync::Arc<dyn TextMeasurer + Send + Sync>,
        ) -> Self {
            self.options.text_measurer = measurer;
            self
        }

        fn format_for(&self, text: &str) -> InputFormat {
            self.format.unwrap_or_else(|| InputFormat::detect(text))
        }

        pub fn parse_sync(&self, text: &str) -> Result<ParsedDiagram> {
            Ok(netdiag_core::parse(text, self.format_for(text))?)
        }

        pub fn layout_sync(&self, text: &str) -> Result<DocumentLayout> {
            let parsed = self.parse_sync(text)?;
            Ok(netdiag_render::layout_document(&parsed.diagram)?)
        }

        pub fn render_svg_sync(&self, text: &str) -> Result<String> {
            render_svg_sync(text, self.format_for(text), &self.options)
        }

        #[cfg(feature = "raster")]
        pub fn render_png_sync(
            &self,
            text: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg_sync(text)?;
            raster::svg_to_png(&svg, raster)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const SCRIPT: &str = r#"Node N1: Position(10, 10), Size(60, 30), Label("Gateway")
Node N2: Position(200, 10), Size(60, 30), Label("Switch")
N1 ---[20,70]--> N2
"#;

        #[test]
        fn renderer_sniffs_script_and_json() {
            let renderer = HeadlessRenderer::new();
            let svg = renderer.render_svg_sync(SCRIPT).unwrap();
            assert!(svg.starts_with("<svg "));
            assert!(svg.contains(">Gateway</text>"));

            let json = r#"{"nodes":[{"id":"1","label":"Solo","position":{"x":0,"y":0},"size":{"width":40,"height":20}}]}"#;
            let svg = renderer.render_svg_sync(json).unwrap();
            assert!(svg.contains(">Solo</text>"));
        }

        #[test]
        fn parse_errors_surface_as_headless_errors() {
            let renderer = HeadlessRenderer::new().with_format(InputFormat::Script);
            let err = renderer.render_svg_sync("N1 ---[1,2]--> N9").unwrap_err();
            assert!(matches!(err, HeadlessError::Parse(_)));
        }

        #[test]
        fn layout_is_exposed_without_rendering() {
            let layout = HeadlessRenderer::new().layout_sync(SCRIPT).unwrap();
            assert_eq!(layout.node_frames.len(), 2);
            assert_eq!(layout.link_frames.len(), 1);
        }
    }
}
