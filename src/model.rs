//! Core data model: overlays, editor state, persisted thumbnail records.
//!
//! All external formats (the persisted record list, edit session documents)
//! use camelCase field names, matching the JSON this tool has historically
//! produced.

/// Fixed logical canvas width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 1280;
/// Fixed logical canvas height in pixels.
pub const THUMBNAIL_HEIGHT: u32 = 720;

/// Default filename for exported composites.
pub const EXPORT_FILENAME: &str = "youtube-thumbnail.png";

/// Content category of a thumbnail. Closed set; serializes as its display
/// string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    Gaming,
    Tech,
    Vlog,
    Finance,
    Cooking,
    Podcast,
    Education,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Gaming,
        Category::Tech,
        Category::Vlog,
        Category::Finance,
        Category::Cooking,
        Category::Podcast,
        Category::Education,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Gaming => "Gaming",
            Category::Tech => "Tech",
            Category::Vlog => "Vlog",
            Category::Finance => "Finance",
            Category::Cooking => "Cooking",
            Category::Podcast => "Podcast",
            Category::Education => "Education",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One styled text element positioned on the canvas.
///
/// (x, y) is the center anchor in canvas pixel coordinates. Paint order is
/// sequence order within [`EditorState::overlays`]; later overlays draw on
/// top. `stroke_width == 0` means no outline is drawn.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f32,
    pub color: String,
    pub font_family: String,
    pub stroke_color: String,
    pub stroke_width: f32,
}

impl TextOverlay {
    /// A freshly added overlay: centered, 80 px bold white with a 4 px black
    /// outline and placeholder text.
    pub fn with_defaults(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: "NEW TEXT".to_string(),
            x: f64::from(THUMBNAIL_WIDTH) / 2.0,
            y: f64::from(THUMBNAIL_HEIGHT) / 2.0,
            font_size: 80.0,
            color: "#ffffff".to_string(),
            font_family: "Oswald".to_string(),
            stroke_color: "#000000".to_string(),
            stroke_width: 4.0,
        }
    }
}

/// The full serializable state of one editing session.
///
/// Brightness/contrast/saturation are percentage multipliers applied to the
/// base image only, 100 meaning no change. `filter` is a reserved preset name
/// carried for forward compatibility; nothing acts on it today but it must
/// round-trip losslessly. Selection is deliberately *not* part of this state;
/// it is session-local and passed alongside (see `render`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub image_url: String,
    pub overlays: Vec<TextOverlay>,
    pub filter: String,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl EditorState {
    /// Fresh session over a base image: no overlays, neutral adjustments.
    pub fn for_image(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            overlays: Vec::new(),
            filter: "none".to_string(),
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
        }
    }
}

/// One persisted generated-thumbnail record. Immutable after creation except
/// for deletion; editor state is derived from it at edit time and never
/// written back.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedThumbnail {
    pub id: String,
    pub url: String,
    pub prompt: String,
    pub title: String,
    pub category: Category,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}

impl GeneratedThumbnail {
    pub fn new(
        url: impl Into<String>,
        prompt: impl Into<String>,
        title: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.into(),
            prompt: prompt.into(),
            title: title.into(),
            category,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_as_display_string() {
        let s = serde_json::to_string(&Category::Gaming).unwrap();
        assert_eq!(s, "\"Gaming\"");
        let de: Category = serde_json::from_str("\"Podcast\"").unwrap();
        assert_eq!(de, Category::Podcast);
    }

    #[test]
    fn editor_state_json_roundtrip_uses_camel_case() {
        let mut state = EditorState::for_image("data:image/png;base64,AAAA");
        state.overlays.push(TextOverlay::with_defaults("o1"));
        state.filter = "sepia".to_string();

        let s = serde_json::to_string(&state).unwrap();
        assert!(s.contains("\"imageUrl\""));
        assert!(s.contains("\"fontSize\""));
        assert!(s.contains("\"strokeWidth\""));

        let de: EditorState = serde_json::from_str(&s).unwrap();
        assert_eq!(de, state);
        assert_eq!(de.filter, "sepia");
    }

    #[test]
    fn overlay_defaults_match_add_action() {
        let o = TextOverlay::with_defaults("x");
        assert_eq!(o.text, "NEW TEXT");
        assert_eq!(o.x, 640.0);
        assert_eq!(o.y, 360.0);
        assert_eq!(o.font_size, 80.0);
        assert_eq!(o.color, "#ffffff");
        assert_eq!(o.stroke_color, "#000000");
        assert_eq!(o.stroke_width, 4.0);
    }

    #[test]
    fn record_json_matches_persisted_shape() {
        let rec = GeneratedThumbnail {
            id: "abc".to_string(),
            url: "data:image/png;base64,AA==".to_string(),
            prompt: "p".to_string(),
            title: "t".to_string(),
            category: Category::Tech,
            created_at: 1_700_000_000_000,
        };
        let s = serde_json::to_string(&rec).unwrap();
        assert!(s.contains("\"createdAt\":1700000000000"));
        assert!(s.contains("\"category\":\"Tech\""));
    }

    #[test]
    fn new_records_get_distinct_ids() {
        let a = GeneratedThumbnail::new("u", "p", "t", Category::Vlog);
        let b = GeneratedThumbnail::new("u", "p", "t", Category::Vlog);
        assert_ne!(a.id, b.id);
    }
}
