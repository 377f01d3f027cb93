//! End-to-end compositor scenarios: base painting, adjustments, overlays,
//! selection highlight and PNG export.
//!
//! Text assertions are gated on a resolvable font; on a machine with no
//! usable fonts those tests degrade to the text-free checks.

use thumbforge::assets;
use thumbforge::editor;
use thumbforge::model::{EditorState, TextOverlay, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};
use thumbforge::{Compositor, FontLibrary, FrameRgba};

/// Indigo of the selection highlight box.
const HIGHLIGHT: [u8; 3] = [0x4f, 0x46, 0xe5];

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn solid_base(r: u8, g: u8, b: u8) -> String {
    let px = [r, g, b, 255].repeat(16);
    let png = assets::encode_png(4, 4, &px).unwrap();
    assets::to_data_uri("image/png", &png)
}

fn state_over(r: u8, g: u8, b: u8) -> EditorState {
    EditorState::for_image(solid_base(r, g, b))
}

fn count_pixels(frame: &FrameRgba, rgb: [u8; 3]) -> usize {
    frame
        .data
        .chunks_exact(4)
        .filter(|px| px[0] == rgb[0] && px[1] == rgb[1] && px[2] == rgb[2])
        .count()
}

fn have_font() -> bool {
    FontLibrary::new().resolve("Oswald").is_some()
}

fn overlay(id: &str) -> TextOverlay {
    TextOverlay::with_defaults(id)
}

#[test]
fn neutral_render_fills_canvas_with_base_color() {
    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state_over(40, 120, 200), None).unwrap();

    let frame = comp.frame();
    let total = (THUMBNAIL_WIDTH * THUMBNAIL_HEIGHT) as usize;
    assert_eq!(count_pixels(&frame, [40, 120, 200]), total);
}

#[test]
fn render_is_deterministic_for_identical_inputs() {
    let mut state = state_over(10, 200, 30);
    state.overlays.push(overlay("o1"));
    state.brightness = 130.0;

    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state, Some("o1")).unwrap();
    let first = comp.frame();
    comp.render(&state, Some("o1")).unwrap();
    let second = comp.frame();
    assert_eq!(first.data, second.data);
}

#[test]
fn brightness_scales_base_channels() {
    let mut state = state_over(100, 100, 100);
    state.brightness = 50.0;

    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state, None).unwrap();

    let frame = comp.frame();
    let px = &frame.data[..4];
    assert_eq!(&px[..3], &[50, 50, 50]);
    assert_eq!(px[3], 255);
}

#[test]
fn malformed_overlay_is_skipped_not_fatal() {
    init_tracing();
    let mut state = state_over(200, 0, 0);
    let mut bad = overlay("bad");
    bad.x = f64::NAN;
    state.overlays.push(bad);

    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state, None).unwrap();

    let frame = comp.frame();
    let total = (THUMBNAIL_WIDTH * THUMBNAIL_HEIGHT) as usize;
    assert_eq!(count_pixels(&frame, [200, 0, 0]), total);
}

#[test]
fn overlay_text_paints_fill_color_onto_the_base() {
    if !have_font() {
        return;
    }
    let mut state = state_over(0, 0, 180);
    let mut text = overlay("o1");
    text.stroke_width = 0.0;
    state.overlays.push(text);

    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state, None).unwrap();

    let frame = comp.frame();
    assert!(count_pixels(&frame, [255, 255, 255]) > 0, "no fill pixels drawn");
}

#[test]
fn zero_stroke_width_draws_no_stroke_color() {
    if !have_font() {
        return;
    }
    let mut state = state_over(0, 0, 180);
    let mut text = overlay("o1");
    text.stroke_width = 0.0;
    text.stroke_color = "#ff0000".to_string();
    state.overlays.push(text);

    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state, None).unwrap();

    assert_eq!(count_pixels(&comp.frame(), [255, 0, 0]), 0);
}

#[test]
fn stroke_paints_outline_color_around_glyphs() {
    if !have_font() {
        return;
    }
    let mut state = state_over(0, 0, 180);
    state.overlays.push(overlay("o1")); // white fill, 4px black stroke

    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state, None).unwrap();

    let frame = comp.frame();
    assert!(count_pixels(&frame, [0, 0, 0]) > 0, "no outline pixels drawn");
    assert!(count_pixels(&frame, [255, 255, 255]) > 0, "no fill pixels drawn");
}

#[test]
fn selection_highlight_shows_in_render_but_never_in_export() {
    if !have_font() {
        return;
    }
    let mut state = state_over(20, 20, 20);
    state.overlays.push(overlay("o1"));

    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state, Some("o1")).unwrap();
    assert!(
        count_pixels(&comp.frame(), HIGHLIGHT) > 0,
        "selected overlay drew no highlight"
    );

    // export re-renders selection-free
    let png = comp.export_png(&state).unwrap();
    let exported = assets::decode_image(&png).unwrap();
    let exported = FrameRgba {
        width: exported.width,
        height: exported.height,
        data: exported.rgba8.as_ref().clone(),
        premultiplied: false,
    };
    assert_eq!(count_pixels(&exported, HIGHLIGHT), 0, "highlight leaked into export");
}

#[test]
fn export_png_is_native_resolution() {
    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    let png = comp.export_png(&state_over(1, 2, 3)).unwrap();

    let decoded = assets::decode_image(&png).unwrap();
    assert_eq!((decoded.width, decoded.height), (THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT));
    assert_eq!(&decoded.rgba8[..4], &[1, 2, 3, 255]);
}

#[test]
fn edit_session_flows_through_to_pixels() {
    let session = editor::EditSession {
        brightness: Some(200.0),
        ..editor::EditSession::default()
    };
    let state = editor::apply_session(state_over(60, 60, 60), &session);

    let mut comp = Compositor::new(FontLibrary::new()).unwrap();
    comp.render(&state, None).unwrap();
    assert_eq!(&comp.frame().data[..3], &[120, 120, 120]);
}
