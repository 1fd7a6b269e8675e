//! Status rendering for the main window
//!
//! Layout is computed from a `StatusSnapshot` first (pure, testable), then
//! rasterized off-screen into a tiny-skia pixmap. The window blits the
//! finished frame in one call, which is what keeps repaints flicker-free.

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, PremultipliedColorU8, Transform};
use tracing::{debug, warn};

use crate::app::{StatusSnapshot, VisualState};
use crate::config::Variant;
use crate::domain::core::Size;

/// TrueType fonts tried in order for glyph rendering
const SYSTEM_FONT_PATHS: &[&str] = &[
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\tahoma.ttf",
];

const BASE_FONT_SIZE: f32 = 15.0;
const BASE_PADDING: f32 = 14.0;
const LINE_SPACING: f32 = 1.45;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create {width}x{height} pixmap for rendering")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Font data could not be parsed")]
    InvalidFont,
}

/// Rounded background panel
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub fill: Color,
}

/// One line of text, positioned by its baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub font_size: f32,
    pub color: Color,
}

impl TextLine {
    /// Top of the line box, for APIs that position text by its top edge
    pub fn top(&self) -> f32 {
        self.baseline - self.font_size
    }
}

/// Pre-calculated layout for one status frame
#[derive(Debug, Clone)]
pub struct StatusLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background: Color,
    pub panels: Vec<Panel>,
    pub lines: Vec<TextLine>,
}

impl StatusLayout {
    /// Lays out the status and instruction panels for one frame
    ///
    /// # Arguments
    /// * `snapshot` - Controller status at paint time
    /// * `canvas` - Client area size in pixels
    /// * `dpi_scale` - Monitor scale factor (1.0 = 96 DPI)
    ///
    /// # Returns
    /// Layout ready for `StatusRenderer::render_layout`
    pub fn from_snapshot(snapshot: &StatusSnapshot, canvas: Size, dpi_scale: f32) -> Self {
        let scale = dpi_scale.max(1.0);
        let font_size = BASE_FONT_SIZE * scale;
        let padding = BASE_PADDING * scale;
        let line_height = font_size * LINE_SPACING;
        let width = canvas.width.max(1) as f32;

        let mut layout = Self {
            canvas_width: canvas.width.max(1) as u32,
            canvas_height: canvas.height.max(1) as u32,
            background: Color::from_rgba8(245, 246, 248, 255),
            panels: Vec::new(),
            lines: Vec::new(),
        };

        let status_lines = status_text(snapshot);
        let status_height = padding * 2.0 + line_height * status_lines.len() as f32;
        layout.panels.push(Panel {
            x: padding,
            y: padding,
            width: width - padding * 2.0,
            height: status_height,
            radius: 8.0 * scale,
            fill: tint_for(snapshot.visual),
        });
        layout.push_lines(status_lines, padding * 2.0, padding * 2.0, font_size, line_height, text_color(snapshot.visual));

        let instructions = instruction_text(snapshot);
        let top = padding * 2.0 + status_height;
        layout.panels.push(Panel {
            x: padding,
            y: top,
            width: width - padding * 2.0,
            height: padding * 2.0 + line_height * instructions.len() as f32,
            radius: 8.0 * scale,
            fill: Color::from_rgba8(255, 255, 255, 255),
        });
        layout.push_lines(
            instructions,
            padding * 2.0,
            top + padding,
            font_size * 0.9,
            line_height * 0.9,
            Color::from_rgba8(60, 64, 72, 255),
        );

        layout
    }

    fn push_lines(
        &mut self,
        texts: Vec<String>,
        x: f32,
        top: f32,
        font_size: f32,
        line_height: f32,
        color: Color,
    ) {
        for (i, text) in texts.into_iter().enumerate() {
            self.lines.push(TextLine {
                text,
                x,
                baseline: top + font_size + line_height * i as f32,
                font_size,
                color,
            });
        }
    }
}

fn status_text(snapshot: &StatusSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("Position: ({}, {})", snapshot.position.x, snapshot.position.y),
        format!("State: {}", snapshot.visual.label()),
    ];

    match (snapshot.variant, snapshot.countdown_text()) {
        (Variant::Simple, Some(left)) => lines.push(format!("Recentering in {left}")),
        (Variant::Enhanced, Some(left)) => {
            lines.push(format!("Off screen: recentering in {left} (release Esc to cancel)"))
        }
        (Variant::Enhanced, None) if snapshot.visual == VisualState::Warning => {
            lines.push("Idle: push the window off screen to arm a recenter".to_string())
        }
        _ => {}
    }

    lines
}

fn instruction_text(snapshot: &StatusSnapshot) -> Vec<String> {
    let secs = snapshot.reset_after.as_secs();
    let mut lines = vec![
        "Controls:".to_string(),
        "W / Up: move up".to_string(),
        "S / Down: move down".to_string(),
        "A / Left: move left".to_string(),
        "D / Right: move right".to_string(),
        "Space: recenter now".to_string(),
    ];

    match snapshot.variant {
        Variant::Simple => {
            lines.push("Esc: exit".to_string());
            lines.push(format!("{secs}s without input recenters the window"));
        }
        Variant::Enhanced => {
            lines.push("Esc (release): cancel a pending recenter".to_string());
            lines.push(format!("Leaving the screen recenters after {secs}s"));
        }
    }

    lines
}

fn tint_for(visual: VisualState) -> Color {
    match visual {
        VisualState::Idle => Color::from_rgba8(226, 232, 240, 255),
        VisualState::Pressed => Color::from_rgba8(207, 226, 255, 255),
        VisualState::Armed => Color::from_rgba8(255, 236, 179, 255),
        VisualState::Warning => Color::from_rgba8(255, 205, 210, 255),
    }
}

fn text_color(visual: VisualState) -> Color {
    match visual {
        VisualState::Warning => Color::from_rgba8(150, 20, 30, 255),
        _ => Color::from_rgba8(20, 24, 32, 255),
    }
}

/// Off-screen renderer for status frames
pub struct StatusRenderer {
    font: Option<FontVec>,
}

impl StatusRenderer {
    /// Renderer without glyphs; text is left to the caller
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Renderer using the given TrueType/OpenType font bytes
    pub fn with_font_data(data: Vec<u8>) -> Result<Self, RendererError> {
        let font = FontVec::try_from_vec(data).map_err(|_| RendererError::InvalidFont)?;
        Ok(Self { font: Some(font) })
    }

    /// Loads the first usable system font, falling back to no glyphs
    pub fn with_system_font() -> Self {
        for path in SYSTEM_FONT_PATHS {
            let Ok(data) = std::fs::read(path) else {
                continue;
            };
            match Self::with_font_data(data) {
                Ok(renderer) => {
                    debug!(path, "loaded status font");
                    return renderer;
                }
                Err(err) => warn!(path, %err, "skipping unusable font"),
            }
        }

        warn!("no system font available, falling back to GDI text");
        Self::new()
    }

    /// True when text is rasterized into the pixmap
    pub fn draws_text(&self) -> bool {
        self.font.is_some()
    }

    /// Draws a layout into a fresh pixmap
    ///
    /// # Arguments
    /// * `layout` - Pre-calculated frame layout
    ///
    /// # Returns
    /// Opaque pixmap the size of the canvas, with glyphs when a font is loaded
    pub fn render_layout(&self, layout: &StatusLayout) -> Result<Pixmap, RendererError> {
        let mut pixmap = Pixmap::new(layout.canvas_width, layout.canvas_height).ok_or(
            RendererError::PixmapCreationFailed {
                width: layout.canvas_width,
                height: layout.canvas_height,
            },
        )?;

        pixmap.fill(layout.background);

        for panel in &layout.panels {
            if let Some(path) = rounded_rect(panel) {
                let mut paint = Paint::default();
                paint.set_color(panel.fill);
                paint.anti_alias = true;
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }

        if let Some(font) = &self.font {
            for line in &layout.lines {
                draw_line(&mut pixmap, font, line);
            }
        }

        Ok(pixmap)
    }
}

impl Default for StatusRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn rounded_rect(panel: &Panel) -> Option<Path> {
    let Panel { x, y, width, height, .. } = *panel;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let r = panel.radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let (right, bottom) = (x + width, y + height);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.quad_to(right, y, right, y + r);
    pb.line_to(right, bottom - r);
    pb.quad_to(right, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.quad_to(x, bottom, x, bottom - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

fn draw_line(pixmap: &mut Pixmap, font: &FontVec, line: &TextLine) {
    let scale = PxScale::from(line.font_size);
    let scaled = font.as_scaled(scale);
    let mut caret = line.x;
    let mut previous: Option<GlyphId> = None;

    for ch in line.text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, line.baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
            outlined.draw(|gx, gy, coverage| {
                blend_pixel(pixmap, left + gx as i32, top + gy as i32, line.color, coverage);
            });
        }
    }
}

fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Color, coverage: f32) {
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }

    let index = (y * width + x) as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];

    let alpha = (color.alpha() * coverage).clamp(0.0, 1.0);
    let inv = 1.0 - alpha;
    let channel = |src: f32, dst: u8| (src * alpha * 255.0 + dst as f32 * inv) as u8;

    let blended = PremultipliedColorU8::from_rgba(
        channel(color.red(), dst.red()),
        channel(color.green(), dst.green()),
        channel(color.blue(), dst.blue()),
        channel(1.0, dst.alpha()),
    );

    if let Some(blended) = blended {
        pixels[index] = blended;
    }
}

/// Converts an opaque pixmap to the BGRA byte order of a 32-bit DIB
pub fn pixmap_to_bgra(pixmap: &Pixmap) -> Vec<u8> {
    let mut data = pixmap.data().to_vec();
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::core::Point;
    use std::time::Duration;

    fn snapshot(variant: Variant, visual: VisualState, countdown: Option<Duration>) -> StatusSnapshot {
        StatusSnapshot {
            variant,
            position: Point::new(665, 315),
            visual,
            countdown,
            idle: Duration::from_secs(1),
            reset_after: Duration::from_secs(5),
        }
    }

    const CANVAS: Size = Size { width: 600, height: 450 };

    #[test]
    fn layout_shows_position_and_state() {
        let layout = StatusLayout::from_snapshot(
            &snapshot(Variant::Enhanced, VisualState::Idle, None),
            CANVAS,
            1.0,
        );

        assert_eq!(layout.lines[0].text, "Position: (665, 315)");
        assert_eq!(layout.lines[1].text, "State: Idle");
        assert_eq!(layout.panels.len(), 2);
        assert_eq!(layout.canvas_width, 600);
        assert_eq!(layout.canvas_height, 450);
    }

    #[test]
    fn instructions_depend_on_variant() {
        let simple = StatusLayout::from_snapshot(
            &snapshot(Variant::Simple, VisualState::Idle, None),
            CANVAS,
            1.0,
        );
        assert!(simple.lines.iter().any(|l| l.text == "Esc: exit"));
        assert!(simple.lines.iter().any(|l| l.text == "5s without input recenters the window"));

        let enhanced = StatusLayout::from_snapshot(
            &snapshot(Variant::Enhanced, VisualState::Idle, None),
            CANVAS,
            1.0,
        );
        assert!(enhanced.lines.iter().any(|l| l.text.starts_with("Esc (release)")));
        assert!(!enhanced.lines.iter().any(|l| l.text == "Esc: exit"));
    }

    #[test]
    fn countdown_line_when_pending() {
        let layout = StatusLayout::from_snapshot(
            &snapshot(Variant::Enhanced, VisualState::Armed, Some(Duration::from_millis(2500))),
            CANVAS,
            1.0,
        );
        assert!(layout.lines[2].text.contains("recentering in 2.5s"));
    }

    #[test]
    fn panel_tint_follows_visual_state() {
        let states = [
            VisualState::Idle,
            VisualState::Pressed,
            VisualState::Armed,
            VisualState::Warning,
        ];
        let fills: Vec<Color> = states
            .iter()
            .map(|visual| {
                StatusLayout::from_snapshot(&snapshot(Variant::Enhanced, *visual, None), CANVAS, 1.0)
                    .panels[0]
                    .fill
            })
            .collect();

        for (i, a) in fills.iter().enumerate() {
            for b in fills.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn lines_advance_downwards() {
        let layout = StatusLayout::from_snapshot(
            &snapshot(Variant::Simple, VisualState::Idle, None),
            CANVAS,
            1.0,
        );
        for pair in layout.lines.windows(2) {
            assert!(pair[1].baseline > pair[0].baseline);
        }
    }

    #[test]
    fn dpi_scaling() {
        let s = snapshot(Variant::Enhanced, VisualState::Idle, None);
        let normal = StatusLayout::from_snapshot(&s, CANVAS, 1.0);
        let scaled = StatusLayout::from_snapshot(&s, CANVAS, 2.0);
        assert!(scaled.lines[0].font_size > normal.lines[0].font_size);
        assert!(scaled.panels[0].radius > normal.panels[0].radius);
    }

    #[test]
    fn render_without_font() {
        let renderer = StatusRenderer::new();
        assert!(!renderer.draws_text());

        let layout = StatusLayout::from_snapshot(
            &snapshot(Variant::Enhanced, VisualState::Warning, None),
            CANVAS,
            1.0,
        );
        let pixmap = renderer.render_layout(&layout).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (600, 450));

        // Corner shows background, inside the first panel shows its tint
        let bg = pixmap.pixel(0, 0).unwrap();
        assert_eq!((bg.red(), bg.green(), bg.blue()), (245, 246, 248));
        let panel = pixmap.pixel(100, 30).unwrap();
        assert_eq!((panel.red(), panel.green(), panel.blue()), (255, 205, 210));
    }

    #[test]
    fn invalid_font_is_rejected() {
        let result = StatusRenderer::with_font_data(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(RendererError::InvalidFont)));
    }

    #[test]
    fn bgra_conversion_swaps_channels() {
        let mut pixmap = Pixmap::new(2, 1).unwrap();
        pixmap.fill(Color::from_rgba8(10, 20, 30, 255));
        let bgra = pixmap_to_bgra(&pixmap);
        assert_eq!(bgra.len(), 8);
        assert_eq!(&bgra[..4], &[30, 20, 10, 255]);
    }
}
