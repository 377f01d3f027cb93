//! Pure state transitions on [`EditorState`].
//!
//! Every operation takes the current state by reference and returns a new
//! state; nothing mutates in place. Selection is held by the caller (it is UI
//! session state, not document state) and passed into the operations that
//! need it. Unknown ids are no-ops, never errors.

use crate::model::{EditorState, TextOverlay};

/// Field-level partial update for one overlay. `None` fields are left
/// untouched.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayPatch {
    pub text: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub font_size: Option<f32>,
    pub color: Option<String>,
    pub font_family: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f32>,
}

/// Which global image adjustment to set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    Brightness,
    Contrast,
    Saturation,
}

/// Append a new overlay with the fixed defaults. The returned id becomes the
/// caller's new selection.
pub fn add_overlay(state: &EditorState) -> (EditorState, String) {
    let id = uuid::Uuid::new_v4().to_string();
    let mut next = state.clone();
    next.overlays.push(TextOverlay::with_defaults(id.clone()));
    (next, id)
}

/// Remove the overlay with the given id. No-op when nothing is selected or
/// the id matches no overlay. The caller clears its selection afterward
/// either way.
pub fn remove_overlay(state: &EditorState, selected: Option<&str>) -> EditorState {
    let Some(id) = selected else {
        return state.clone();
    };
    let mut next = state.clone();
    next.overlays.retain(|o| o.id != id);
    next
}

/// Apply a partial update to the overlay with the given id, leaving every
/// other field and every sibling overlay untouched.
pub fn update_overlay(
    state: &EditorState,
    selected: Option<&str>,
    patch: &OverlayPatch,
) -> EditorState {
    let Some(id) = selected else {
        return state.clone();
    };
    let mut next = state.clone();
    if let Some(overlay) = next.overlays.iter_mut().find(|o| o.id == id) {
        apply_patch(overlay, patch);
    }
    next
}

/// Set one brightness/contrast/saturation percentage, independent of the
/// other two.
pub fn set_adjustment(state: &EditorState, adjustment: Adjustment, value: f32) -> EditorState {
    let mut next = state.clone();
    match adjustment {
        Adjustment::Brightness => next.brightness = value,
        Adjustment::Contrast => next.contrast = value,
        Adjustment::Saturation => next.saturation = value,
    }
    next
}

fn apply_patch(overlay: &mut TextOverlay, patch: &OverlayPatch) {
    if let Some(v) = &patch.text {
        overlay.text = v.clone();
    }
    if let Some(v) = patch.x {
        overlay.x = v;
    }
    if let Some(v) = patch.y {
        overlay.y = v;
    }
    if let Some(v) = patch.font_size {
        overlay.font_size = v;
    }
    if let Some(v) = &patch.color {
        overlay.color = v.clone();
    }
    if let Some(v) = &patch.font_family {
        overlay.font_family = v.clone();
    }
    if let Some(v) = &patch.stroke_color {
        overlay.stroke_color = v.clone();
    }
    if let Some(v) = patch.stroke_width {
        overlay.stroke_width = v;
    }
}

/// A serializable edit document: the overlays and adjustments of one session,
/// applied on top of a loaded record at export time. Stands in for the
/// interactive editing session in non-interactive use.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditSession {
    pub overlays: Vec<TextOverlay>,
    pub filter: Option<String>,
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
}

/// Build the editor state for a session document over a base image.
pub fn apply_session(mut state: EditorState, session: &EditSession) -> EditorState {
    state.overlays = session.overlays.clone();
    if let Some(f) = &session.filter {
        state.filter = f.clone();
    }
    if let Some(v) = session.brightness {
        state.brightness = v;
    }
    if let Some(v) = session.contrast {
        state.contrast = v;
    }
    if let Some(v) = session.saturation {
        state.saturation = v;
    }
    state
}
