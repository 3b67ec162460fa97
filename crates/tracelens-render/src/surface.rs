#![forbid(unsafe_code)]

//! The abstract 2D drawing surface.
//!
//! The renderer only needs canvas-style primitives: filled rectangles,
//! filled text with measurement, and a small amount of scoped style
//! state. Concrete backends (an HTML canvas binding, a raster target,
//! the in-memory [`RecordingSurface`](crate::recording::RecordingSurface))
//! implement [`Surface`]; the renderer never knows which one it has.

/// A packed RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black, the surface's default fill style.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha channel.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Horizontal anchoring of drawn text relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// The x coordinate is the left edge of the text.
    #[default]
    Left,
    /// The x coordinate is the horizontal center of the text.
    Center,
    /// The x coordinate is the right edge of the text.
    Right,
}

/// Vertical anchoring of drawn text relative to its y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// The y coordinate is the top of the text.
    Top,
    /// The y coordinate is the vertical center of the text.
    Middle,
    /// The y coordinate is the alphabetic baseline.
    #[default]
    Alphabetic,
}

/// Canvas-style drawing primitives.
///
/// Style setters affect subsequent draw calls; `save`/`restore` scope
/// style changes the way a 2D canvas context does. Implementations are
/// expected to start with [`Rgba::BLACK`] fill, [`TextAlign::Left`],
/// and [`TextBaseline::Alphabetic`].
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> f64;

    /// Surface height in pixels.
    fn height(&self) -> f64;

    /// Clear the whole surface.
    fn clear(&mut self);

    /// Fill a rectangle with the current fill style.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Draw text with the current fill style, font, alignment, and
    /// baseline.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Measure the width the given text would occupy in the current
    /// font.
    fn measure_text(&mut self, text: &str) -> f64;

    /// Set the fill style for subsequent draws.
    fn set_fill_style(&mut self, color: Rgba);

    /// Set the font for subsequent text draws.
    fn set_font(&mut self, font: &str);

    /// Set the horizontal text alignment.
    fn set_text_align(&mut self, align: TextAlign);

    /// Set the vertical text baseline.
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    /// Push the current style state.
    fn save(&mut self);

    /// Pop to the most recently saved style state.
    fn restore(&mut self);
}
