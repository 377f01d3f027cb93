//! Font resolution for overlay text.
//!
//! Overlays name a font family; rendering always uses the bold face of that
//! family. Resolution goes through a `fontdb` database seeded from system
//! fonts plus an optional fonts directory, falling back to any sans-serif
//! face when the named family is unknown. An empty database is not an error
//! here; the compositor skips text it cannot shape.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A resolved bold face: raw font bytes plus the face index within them.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    pub family: String,
    pub data: Arc<Vec<u8>>,
    pub index: u32,
}

pub struct FontLibrary {
    db: fontdb::Database,
    cache: HashMap<String, Option<Arc<ResolvedFont>>>,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    /// Library over the system font collection.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            db,
            cache: HashMap::new(),
        }
    }

    /// Additionally load every font file found under `dir` (recursive).
    pub fn with_fonts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.db.load_fonts_dir(dir.as_ref());
        tracing::debug!(faces = self.db.len(), dir = %dir.as_ref().display(), "loaded fonts dir");
        self
    }

    /// True when no face at all is available (text rendering will be
    /// skipped).
    pub fn is_empty(&self) -> bool {
        self.db.len() == 0
    }

    /// Resolve a family name to its bold face, falling back to sans-serif.
    /// Results (including misses) are memoized per family string.
    pub fn resolve(&mut self, family: &str) -> Option<Arc<ResolvedFont>> {
        if let Some(hit) = self.cache.get(family) {
            return hit.clone();
        }

        let resolved = self.lookup(family);
        if resolved.is_none() {
            tracing::warn!(family, "no font face resolvable; overlay text will be skipped");
        }
        self.cache.insert(family.to_string(), resolved.clone());
        resolved
    }

    fn lookup(&self, family: &str) -> Option<Arc<ResolvedFont>> {
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family), fontdb::Family::SansSerif],
            weight: fontdb::Weight::BOLD,
            ..fontdb::Query::default()
        };
        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;
        let family_name = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| family.to_string());

        let (data, index) = self
            .db
            .with_face_data(id, |bytes, face_index| (bytes.to_vec(), face_index))?;

        Some(Arc::new(ResolvedFont {
            family: family_name,
            data: Arc::new(data),
            index,
        }))
    }
}
