//! The overlay compositing engine.
//!
//! [`Compositor`] renders an [`EditorState`] plus the caller-held selection
//! into a fixed 1280x720 premultiplied-RGBA8 pixmap, in strict paint order:
//! clear, adjusted base image stretched to fill, then each overlay in
//! sequence order (outline under fill), then the selection highlight. Render
//! is a pure function of its inputs; identical (state, selection) pairs
//! produce pixel-identical frames, so a full redraw per change is both
//! acceptable and what correctness requires.
//!
//! Export re-renders without a selection before encoding, so the highlight
//! box can never leak into an exported file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::adjust::{self, ColorAdjust};
use crate::assets::{self, BaseImage};
use crate::color::{self, Rgba8};
use crate::error::{ThumbforgeError, ThumbforgeResult};
use crate::fonts::FontLibrary;
use crate::model::{EditorState, TextOverlay, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};
use crate::text::TextLayoutEngine;

/// Selection highlight stroke color (indigo).
const HIGHLIGHT_COLOR: Rgba8 = Rgba8::rgb(0x4f, 0x46, 0xe5);
/// Selection highlight stroke width in pixels.
const HIGHLIGHT_STROKE: f64 = 2.0;
/// Horizontal padding of the highlight box around the measured text.
const HIGHLIGHT_PAD: f64 = 10.0;

/// Offsets drawn per ring when emulating a text outline with repeated fills.
const OUTLINE_STEPS: usize = 16;

/// One rendered frame: premultiplied RGBA8 at the fixed canvas size.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

struct AdjustedBase {
    key: [u32; 3],
    paint: vello_cpu::Image,
    /// Source pixel dimensions, for the stretch-to-fill transform.
    width: u32,
    height: u32,
}

/// The compositing engine. Owns the drawing surface, the font library and
/// per-session caches (decoded base image, adjusted base paint, font data).
pub struct Compositor {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    fonts: FontLibrary,
    text: TextLayoutEngine,
    base: Option<(String, BaseImage)>,
    adjusted: Option<AdjustedBase>,
    font_data: HashMap<String, vello_cpu::peniko::FontData>,
}

impl Compositor {
    pub fn new(fonts: FontLibrary) -> ThumbforgeResult<Self> {
        let width: u16 = THUMBNAIL_WIDTH
            .try_into()
            .map_err(|_| ThumbforgeError::render("canvas width exceeds u16"))?;
        let height: u16 = THUMBNAIL_HEIGHT
            .try_into()
            .map_err(|_| ThumbforgeError::render("canvas height exceeds u16"))?;

        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            fonts,
            text: TextLayoutEngine::new(),
            base: None,
            adjusted: None,
            font_data: HashMap::new(),
        })
    }

    /// Render the composite for `state` with the given selected overlay id
    /// (a UI affordance only; see [`Compositor::export_png`]).
    ///
    /// The base image must resolve and decode before any drawing happens; on
    /// failure the surface keeps its previous contents.
    pub fn render(&mut self, state: &EditorState, selection: Option<&str>) -> ThumbforgeResult<()> {
        let base = self.base_paint(state)?;
        let (base_paint, base_w, base_h) = (base.paint.clone(), base.width, base.height);

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        // Base image, stretched to fill the canvas exactly.
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::scale_non_uniform(
            f64::from(THUMBNAIL_WIDTH) / f64::from(base_w),
            f64::from(THUMBNAIL_HEIGHT) / f64::from(base_h),
        ));
        ctx.set_paint(base_paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(base_w),
            f64::from(base_h),
        ));

        for overlay in &state.overlays {
            let selected = selection.is_some_and(|id| id == overlay.id);
            if let Err(err) = self.draw_overlay(&mut ctx, overlay, selected) {
                // A single malformed overlay must not abort the composite.
                tracing::warn!(overlay = %overlay.id, error = %err, "skipping overlay");
            }
        }

        clear_pixmap(&mut self.pixmap);
        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }

    /// Read back the current surface.
    pub fn frame(&self) -> FrameRgba {
        FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Render `state` with selection cleared and encode the result as a
    /// lossless PNG at the native canvas resolution.
    pub fn export_png(&mut self, state: &EditorState) -> ThumbforgeResult<Vec<u8>> {
        self.render(state, None)?;
        let mut data = self.pixmap.data_as_u8_slice().to_vec();
        assets::unpremultiply_rgba8_in_place(&mut data);
        assets::encode_png(u32::from(self.width), u32::from(self.height), &data)
    }

    /// Export straight to a file.
    pub fn write_png(&mut self, state: &EditorState, path: &Path) -> ThumbforgeResult<()> {
        let bytes = self.export_png(state)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn base_paint(&mut self, state: &EditorState) -> ThumbforgeResult<&AdjustedBase> {
        let source_changed = self
            .base
            .as_ref()
            .is_none_or(|(source, _)| source != &state.image_url);
        if source_changed {
            let image = assets::load_base_image(&state.image_url)?;
            tracing::debug!(width = image.width, height = image.height, "decoded base image");
            self.base = Some((state.image_url.clone(), image));
            self.adjusted = None;
        }

        let key = [
            state.brightness.to_bits(),
            state.contrast.to_bits(),
            state.saturation.to_bits(),
        ];
        let stale = self.adjusted.as_ref().is_none_or(|a| a.key != key);
        if stale {
            let (_, image) = self
                .base
                .as_ref()
                .ok_or_else(|| ThumbforgeError::render("base image missing after load"))?;

            let mut rgba = image.rgba8.as_ref().clone();
            adjust::apply_in_place(
                &mut rgba,
                ColorAdjust {
                    brightness: state.brightness,
                    contrast: state.contrast,
                    saturation: state.saturation,
                },
            );
            assets::premultiply_rgba8_in_place(&mut rgba);

            let pixmap = premul_bytes_to_pixmap(&rgba, image.width, image.height)?;
            self.adjusted = Some(AdjustedBase {
                key,
                paint: vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                },
                width: image.width,
                height: image.height,
            });
        }

        self.adjusted
            .as_ref()
            .ok_or_else(|| ThumbforgeError::render("adjusted base missing after build"))
    }

    fn draw_overlay(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        overlay: &TextOverlay,
        selected: bool,
    ) -> ThumbforgeResult<()> {
        if !overlay.x.is_finite() || !overlay.y.is_finite() {
            return Err(ThumbforgeError::validation("overlay position is not finite"));
        }

        let fill = color::parse_hex(&overlay.color)?;
        let Some(font) = self.fonts.resolve(&overlay.font_family) else {
            return Err(ThumbforgeError::render(format!(
                "no font available for family '{}'",
                overlay.font_family
            )));
        };

        // Rejects non-positive / non-finite sizes; caller skips the overlay.
        let layout = self
            .text
            .layout(&overlay.text, &font, overlay.font_size, fill)?;
        let text_w = f64::from(layout.full_width());
        let text_h = f64::from(layout.height());
        let origin_x = overlay.x - text_w / 2.0;
        let origin_y = overlay.y - text_h / 2.0;

        let font_data = match self.font_data.get(&font.family) {
            Some(data) => data.clone(),
            None => {
                let data = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.data.as_ref().clone()),
                    font.index,
                );
                self.font_data.insert(font.family.clone(), data.clone());
                data
            }
        };

        // Outline first so the fill paints over its inner half, matching
        // stroke-then-fill text. The outline is emulated with a ring of
        // offset fills at half the stroke width.
        if overlay.stroke_width > 0.0 && overlay.stroke_width.is_finite() {
            let stroke = color::parse_hex(&overlay.stroke_color)?;
            let radius = f64::from(overlay.stroke_width) / 2.0;
            for step in 0..OUTLINE_STEPS {
                let angle = std::f64::consts::TAU * (step as f64) / (OUTLINE_STEPS as f64);
                draw_layout_glyphs(
                    ctx,
                    &layout,
                    &font_data,
                    stroke,
                    origin_x + radius * angle.cos(),
                    origin_y + radius * angle.sin(),
                );
            }
        }

        draw_layout_glyphs(ctx, &layout, &font_data, fill, origin_x, origin_y);

        if selected {
            self.draw_highlight(ctx, overlay, text_w);
        }
        Ok(())
    }

    /// 2px indigo rectangle outline around the measured text box, padded
    /// 10px horizontally; box height tracks the font size. Drawn as four
    /// edge rects.
    fn draw_highlight(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        overlay: &TextOverlay,
        text_w: f64,
    ) {
        let w = text_w + HIGHLIGHT_PAD * 2.0;
        let h = f64::from(overlay.font_size) + HIGHLIGHT_PAD;
        let left = overlay.x - w / 2.0;
        let top = overlay.y - h / 2.0;
        let t = HIGHLIGHT_STROKE;

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(to_peniko_color(HIGHLIGHT_COLOR));
        for rect in [
            vello_cpu::kurbo::Rect::new(left, top, left + w, top + t),
            vello_cpu::kurbo::Rect::new(left, top + h - t, left + w, top + h),
            vello_cpu::kurbo::Rect::new(left, top, left + t, top + h),
            vello_cpu::kurbo::Rect::new(left + w - t, top, left + w, top + h),
        ] {
            ctx.fill_rect(&rect);
        }
    }
}

fn draw_layout_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<Rgba8>,
    font_data: &vello_cpu::peniko::FontData,
    paint: Rgba8,
    x: f64,
    y: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    ctx.set_paint(to_peniko_color(paint));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font_data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn to_peniko_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ThumbforgeResult<vello_cpu::Pixmap> {
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ThumbforgeError::render(format!(
            "base image {width}x{height} is too large for the paint surface"
        )));
    };
    let expected = width as usize * height as usize * 4;
    if rgba8_premul.len() != expected {
        return Err(ThumbforgeError::render(format!(
            "pixel buffer is {} bytes, expected {expected}",
            rgba8_premul.len()
        )));
    }

    let mut translucent = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            translucent |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        translucent,
    ))
}
