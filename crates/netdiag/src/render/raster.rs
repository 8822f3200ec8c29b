#![forbid(unsafe_code)]

use crate::render::HeadlessError;
use netdiag_core::Rgb;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("invalid raster scale: {0}")]
    InvalidScale(f32),
    #[error("invalid background color: {0}")]
    InvalidBackground(String),
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// `transparent`, `white`, `black` or a `#rgb` / `#rrggbb` hex color. `None` keeps the
    /// document's own background rect as the only fill.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, options: &RasterOptions) -> Result<tiny_skia::Pixmap> {
    let scale = options.scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RasterError::InvalidScale(scale));
    }
    let background = match options.background.as_deref() {
        Some(bg) => Some(
            parse_tiny_skia_color(bg).ok_or_else(|| RasterError::InvalidBackground(bg.into()))?,
        ),
        None => None,
    };

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    // Documents default to Arial; system selection may vary.
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // Documents carry explicit width/height and no viewBox, so the tree size is the canvas.
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;
    tracing::debug!(width_px, height_px, scale, "rasterizing network diagram");

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    if let Some(color) = background {
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => Some(tiny_skia::Color::WHITE),
        "black" => Some(tiny_skia::Color::BLACK),
        _ => {
            let Rgb { r, g, b } = Rgb::from_hex(&s)?;
            Some(tiny_skia::Color::from_rgba8(r, g, b, 255))
        }
    }
}
