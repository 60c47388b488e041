use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

const FALLBACK_CHAR_WIDTH: f32 = 0.56;
const MIN_LABEL_FONT_SIZE: f32 = 6.0;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width of `text` in the first installed face matching `font_family`.
/// Returns `None` when no face can be loaded.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

pub fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * FALLBACK_CHAR_WIDTH
}

pub fn text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

/// Largest font size up to `preferred` at which `text` fits in `max_width`.
pub fn fit_font_size(text: &str, max_width: f32, preferred: f32, font_family: &str) -> f32 {
    let width = text_width(text, preferred, font_family);
    if width <= max_width || width <= 0.0 {
        return preferred;
    }
    // Advance widths scale linearly with the font size.
    (preferred * max_width / width).max(MIN_LABEL_FONT_SIZE.min(preferred))
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let family_key = normalize_family_key(font_family);
        if !self.cache.contains_key(&family_key) {
            let face = self.load_face(&family_key);
            self.cache.insert(family_key.clone(), face);
        }
        let face = self.cache.get(&family_key)?.as_ref()?;
        face.measure_width(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let mut names: Vec<&str> = Vec::new();
        let mut generics: Vec<Option<Family<'static>>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            let generic = match raw.to_ascii_lowercase().as_str() {
                "serif" => Some(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    Some(Family::SansSerif)
                }
                "monospace" | "ui-monospace" => Some(Family::Monospace),
                _ => None,
            };
            if generic.is_none() {
                names.push(raw);
            }
            generics.push(generic);
        }

        let mut named = names.iter();
        let mut families: Vec<Family<'_>> = generics
            .into_iter()
            .filter_map(|generic| generic.or_else(|| named.next().map(|name| Family::Name(*name))))
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::parse(data, index))
            .flatten()
    }
}

/// Advance widths extracted once from a parsed face.
struct FontFace {
    units_per_em: f32,
    ascii_advances: [u16; 128],
    advances: HashMap<char, u16>,
}

impl FontFace {
    fn parse(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let advance_of = |ch: char| {
            face.glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .unwrap_or(0)
        };
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            ascii_advances[byte as usize] = advance_of(byte as char);
        }
        // Latin-1 supplement and general punctuation cover most labels.
        let advances = ('\u{a0}'..='\u{17f}')
            .chain('\u{2010}'..='\u{2044}')
            .map(|ch| (ch, advance_of(ch)))
            .collect();
        Some(Self {
            units_per_em: face.units_per_em().max(1) as f32,
            ascii_advances,
            advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em;
        let fallback = font_size * FALLBACK_CHAR_WIDTH;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                self.ascii_advances[ch as usize]
            } else {
                self.advances.get(&ch).copied().unwrap_or(0)
            };
            width += if advance == 0 {
                fallback
            } else {
                advance as f32 * scale
            };
        }
        Some(width.max(0.0))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_width_scales_with_font_size() {
        let w12 = fallback_text_width("node", 12.0);
        let w24 = fallback_text_width("node", 24.0);
        assert!((w24 - w12 * 2.0).abs() < 0.01);
    }

    #[test]
    fn empty_text_has_zero_width() {
        assert_eq!(measure_text_width("", 12.0, "sans-serif"), Some(0.0));
    }

    #[test]
    fn fit_font_size_never_exceeds_preferred() {
        let size = fit_font_size("a rather long node label", 20.0, 12.0, "sans-serif");
        assert!(size <= 12.0);
        assert!(size >= MIN_LABEL_FONT_SIZE);
        assert_eq!(fit_font_size("a", 1000.0, 12.0, "sans-serif"), 12.0);
    }
}
