//! Parley text layout for overlay rendering.
//!
//! Shapes one overlay's text with an explicitly resolved font face and
//! exposes the measured extent used for center-anchoring and the selection
//! box. The brush carried through the layout is the overlay's fill color.

use std::collections::HashMap;

use crate::color::Rgba8;
use crate::error::{ThumbforgeError, ThumbforgeResult};
use crate::fonts::ResolvedFont;

/// Stateful helper building Parley layouts from resolved font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    /// Resolved family -> family name as registered in the Parley collection.
    registered: HashMap<String, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    /// Shape and lay out a single run of text at `size_px`. No line width
    /// constraint is applied; overlays are single-line by construction.
    pub fn layout(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        brush: Rgba8,
    ) -> ThumbforgeResult<parley::Layout<Rgba8>> {
        if !(size_px.is_finite() && size_px > 0.0) {
            return Err(ThumbforgeError::validation(format!(
                "font size {size_px}px is not a positive, finite pixel value"
            )));
        }

        let family_name = match self.registered.get(&font.family) {
            Some(name) => name.clone(),
            None => {
                let families = self.font_ctx.collection.register_fonts(
                    parley::fontique::Blob::from(font.data.as_ref().clone()),
                    None,
                );
                let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                    ThumbforgeError::render("no font families registered from font bytes")
                })?;
                let name = self
                    .font_ctx
                    .collection
                    .family_name(family_id)
                    .ok_or_else(|| {
                        ThumbforgeError::render("registered font family has no name")
                    })?
                    .to_string();
                self.registered.insert(font.family.clone(), name.clone());
                name
            }
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontLibrary;

    #[test]
    fn rejects_non_positive_sizes() {
        let mut lib = FontLibrary::new();
        let Some(font) = lib.resolve("sans-serif") else {
            return; // no fonts available in this environment
        };
        let mut engine = TextLayoutEngine::new();
        assert!(engine.layout("x", &font, 0.0, Rgba8::rgb(255, 255, 255)).is_err());
        assert!(engine.layout("x", &font, -4.0, Rgba8::rgb(255, 255, 255)).is_err());
        assert!(
            engine
                .layout("x", &font, f32::NAN, Rgba8::rgb(255, 255, 255))
                .is_err()
        );
    }

    #[test]
    fn layout_has_positive_extent_for_nonempty_text() {
        let mut lib = FontLibrary::new();
        let Some(font) = lib.resolve("sans-serif") else {
            return;
        };
        let mut engine = TextLayoutEngine::new();
        let layout = engine
            .layout("HELLO", &font, 80.0, Rgba8::rgb(255, 255, 255))
            .unwrap();
        assert!(layout.full_width() > 0.0);
        assert!(layout.height() > 0.0);

        // wider text measures wider
        let layout2 = engine
            .layout("HELLO HELLO", &font, 80.0, Rgba8::rgb(255, 255, 255))
            .unwrap();
        assert!(layout2.full_width() > layout.full_width());
    }
}
