#![forbid(unsafe_code)]

pub mod adjust;
pub mod assets;
pub mod catalog;
pub mod color;
pub mod editor;
pub mod error;
pub mod fonts;
pub mod generate;
pub mod model;
pub mod render;
pub mod store;
pub mod text;

pub use catalog::{STYLES, StylePreset, compose_prompt, style_by_id};
pub use editor::{Adjustment, EditSession, OverlayPatch};
pub use error::{ThumbforgeError, ThumbforgeResult};
pub use fonts::FontLibrary;
pub use generate::{GeminiClient, GeneratedImage, GenerationRequest, ImageGenerator};
pub use model::{
    Category, EditorState, EXPORT_FILENAME, GeneratedThumbnail, TextOverlay, THUMBNAIL_HEIGHT,
    THUMBNAIL_WIDTH,
};
pub use render::{Compositor, FrameRgba};
pub use store::{JsonFileStore, ThumbnailStore, default_store_path};
