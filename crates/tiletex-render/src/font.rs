//! Default font resolution, performed once at renderer construction.
//!
//! Fonts are discovered through `fontdb`: system fonts first, plus an
//! embedded fallback set so minimal systems and CI containers still
//! render. Candidate faces are tried against a family preference list
//! and the first face `fontdue` can actually parse wins; parse failures
//! are skipped, not fatal. The render call itself never touches the
//! filesystem - everything is loaded here, up front.

use fontdb::{Database, Family, Query};
use fontdue::{Font, FontSettings};
use log::{debug, info, warn};

use crate::error::TileError;

/// Family preference for the single default face. The embedded fallback
/// set is guaranteed to satisfy at least one named entry.
const FAMILIES: [Family<'static>; 4] = [
    Family::Name("DejaVu Sans"),
    Family::Name("DejaVu Sans Mono"),
    Family::SansSerif,
    Family::Serif,
];

/// The resolved default font face.
pub struct FontStore {
    pub font: Font,
    pub family: String,
}

impl FontStore {
    /// Resolves the default face from system fonts plus the embedded
    /// fallback set.
    pub fn load_default() -> Result<Self, TileError> {
        let mut db = Database::new();
        db.load_system_fonts();
        for data in typst_assets::fonts() {
            db.load_font_data(data.to_vec());
        }
        debug!("font database holds {} faces", db.len());

        for family in FAMILIES {
            let query = Query {
                families: &[family],
                ..Query::default()
            };
            let Some(id) = db.query(&query) else {
                continue;
            };
            let Some(face) = db.face(id) else {
                continue;
            };
            let family_name = face
                .families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_default();

            let parsed = db.with_face_data(id, |data, index| {
                let settings = FontSettings {
                    collection_index: index,
                    ..FontSettings::default()
                };
                Font::from_bytes(data.to_vec(), settings)
            });
            match parsed {
                Some(Ok(font)) => {
                    info!("default font face: {family_name}");
                    return Ok(Self {
                        font,
                        family: family_name,
                    });
                }
                Some(Err(err)) => {
                    warn!("skipping unparsable face {family_name}: {err}");
                }
                None => {}
            }
        }
        Err(TileError::FontUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_face_resolves() {
        // The embedded fallback set must make this succeed even on a
        // machine with no system fonts at all.
        let store = FontStore::load_default().expect("embedded fallback should resolve");
        assert!(store.font.lookup_glyph_index('a') != 0);
    }

    #[test]
    fn test_math_symbol_coverage() {
        let store = FontStore::load_default().unwrap();
        // The glyphs the lightweight math mode leans on hardest.
        for c in ['±', '≤', '≥', '≠', '²', '√'] {
            assert!(
                store.font.lookup_glyph_index(c) != 0,
                "no glyph for {c:?} in {}",
                store.family
            );
        }
    }
}
