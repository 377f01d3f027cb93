//! Static style/category catalog and prompt composition.
//!
//! These tables are the only inputs to the generation prompt besides the
//! user's own title and free-form text.

use crate::error::{ThumbforgeError, ThumbforgeResult};
use crate::model::Category;

/// One named visual style preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StylePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt_modifier: &'static str,
    /// Hex swatch shown next to the style name in pickers.
    pub preview_color: &'static str,
}

pub const STYLES: [StylePreset; 5] = [
    StylePreset {
        id: "cinematic",
        name: "Cinematic",
        prompt_modifier: "cinematic lighting, shallow depth of field, professional photography, high contrast, dramatic shadows",
        preview_color: "#2563eb",
    },
    StylePreset {
        id: "vibrant",
        name: "Vibrant",
        prompt_modifier: "hyper-saturated colors, bright, energetic, popping colors, sharp details, high energy",
        preview_color: "#ec4899",
    },
    StylePreset {
        id: "minimalist",
        name: "Minimalist",
        prompt_modifier: "clean background, simple composition, flat colors, elegant, modern aesthetic",
        preview_color: "#94a3b8",
    },
    StylePreset {
        id: "neon",
        name: "Neon Future",
        prompt_modifier: "cyberpunk aesthetic, neon glows, purple and blue accents, high tech, glowing elements",
        preview_color: "#9333ea",
    },
    StylePreset {
        id: "comic",
        name: "Comic Book",
        prompt_modifier: "bold lines, halftone patterns, comic style, stylized illustration, dramatic action",
        preview_color: "#eab308",
    },
];

pub const BASE_SYSTEM_PROMPT: &str = "\
Generate a high-quality YouTube-style thumbnail with bright colors, bold elements, sharp contrast, and attention-grabbing design.
Style: modern, cinematic, click-worthy, creator-optimized.
Aspect Ratio: 16:9.
Requirements: Focus on visual clarity, avoid cluttered text (text will be added separately), professional lighting.";

/// Fallback for the free-form detail line when the user supplies none.
const DEFAULT_USER_DETAIL: &str = "Focus on the core theme of the video.";

pub fn category_prompt(category: Category) -> &'static str {
    match category {
        Category::Gaming => {
            "Exciting action, particle effects, gaming elements, intense competition vibe, 4k gaming assets."
        }
        Category::Tech => {
            "Sleek hardware, circuit patterns, clean glass surfaces, blue/white highlights, sophisticated gadgets."
        }
        Category::Vlog => {
            "Warm lifestyle lighting, natural settings, expressive mood, relatable atmosphere, sun-drenched lens flares."
        }
        Category::Finance => {
            "Professional graphs, currency symbols, solid gold/green accents, clean high-end office look."
        }
        Category::Cooking => {
            "Extreme food close-ups, steam, fresh ingredients, warm kitchen lighting, vibrant organic colors."
        }
        Category::Podcast => {
            "Professional studio mic, soundproofing textures, moody lighting, podcast setup, intimate conversation vibe."
        }
        Category::Education => {
            "Clean whiteboard, organized books, lightbulb moments, clear symbols, focused scholarly atmosphere."
        }
    }
}

pub fn style_by_id(id: &str) -> ThumbforgeResult<&'static StylePreset> {
    STYLES
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| ThumbforgeError::validation(format!("unknown style id '{id}'")))
}

/// Compose the single natural-language prompt sent to the generation client.
pub fn compose_prompt(
    title: &str,
    category: Category,
    style: &StylePreset,
    user_prompt: Option<&str>,
) -> String {
    let detail = match user_prompt {
        Some(s) if !s.trim().is_empty() => s,
        _ => DEFAULT_USER_DETAIL,
    };
    format!(
        "{BASE_SYSTEM_PROMPT}\n\
         Video Topic: {title}\n\
         Category Context: {}\n\
         Visual Style: {}\n\
         Additional Details: {detail}",
        category_prompt(category),
        style.prompt_modifier,
    )
}
