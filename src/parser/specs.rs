use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::patterns::{
    brand_of, capture, name_from_slug, DYNAMIC_PANEL_RE, INCHES_RE, LOOSE_RATIO_RE, PANEL_RE,
    RATIO_RE, RESOLUTION_PIXELS_RE, RESOLUTION_RE, TILDE_RATIO_RE,
};

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<h1[^>]*class="specs-phone-name-title"[^>]*>([^<]+)</h1>"#).unwrap()
});
static DISPLAY_TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Display[\s\S]*?<table[^>]*>([\s\S]*?)</table>").unwrap());

/// A spec field that is either extracted text or the `N/A` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpecValue {
    Value(String),
    #[default]
    NotAvailable,
}

impl SpecValue {
    pub const SENTINEL: &'static str = "N/A";

    pub fn as_str(&self) -> &str {
        match self {
            SpecValue::Value(v) => v,
            SpecValue::NotAvailable => Self::SENTINEL,
        }
    }
}

impl From<Option<String>> for SpecValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => SpecValue::Value(v),
            _ => SpecValue::NotAvailable,
        }
    }
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SpecValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySpec {
    pub name: String,
    pub brand: String,
    pub display_size: SpecValue,
    pub screen_to_body: SpecValue,
    pub resolution: SpecValue,
    pub display_type: SpecValue,
}

type Extractor = fn(&str) -> Option<String>;

/// Patterns tried inside the display table, then against the whole page.
struct FieldRule {
    field: &'static str,
    scoped: &'static [Extractor],
    global: &'static [Extractor],
}

const DISPLAY_SIZE: FieldRule = FieldRule {
    field: "display_size",
    scoped: &[size_inches],
    global: &[size_inches],
};
const SCREEN_TO_BODY: FieldRule = FieldRule {
    field: "screen_to_body",
    scoped: &[ratio_labelled, ratio_tilde],
    global: &[ratio_loose],
};
const RESOLUTION: FieldRule = FieldRule {
    field: "resolution",
    scoped: &[resolution_any],
    global: &[resolution_pixels],
};
const DISPLAY_TYPE: FieldRule = FieldRule {
    field: "display_type",
    scoped: &[panel_type],
    global: &[panel_type_dynamic],
};

impl FieldRule {
    fn resolve(&self, section: Option<&str>, html: &str) -> SpecValue {
        let scoped = section.and_then(|s| first_hit(self.scoped, s));
        let value = scoped.or_else(|| {
            let hit = first_hit(self.global, html);
            if hit.is_some() {
                debug!(field = self.field, "resolved from full page");
            }
            hit
        });
        SpecValue::from(value)
    }
}

fn first_hit(extractors: &[Extractor], text: &str) -> Option<String> {
    extractors.iter().find_map(|extract| extract(text))
}

/// Parse a device page into a [`DisplaySpec`]. Fields that cannot be found
/// degrade to `N/A`; this never fails.
pub fn extract_spec(html: &str, fallback_slug: &str) -> DisplaySpec {
    let name = capture(&TITLE_RE, html)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| {
            debug!(slug = fallback_slug, "no title heading, naming from slug");
            name_from_slug(fallback_slug).trim().to_string()
        });
    let name = non_blank(name);
    let brand = non_blank(brand_of(&name));

    let section = capture(&DISPLAY_TABLE_RE, html);
    if section.is_none() {
        debug!(name = %name, "no display table found");
    }
    let section = section.as_deref();

    DisplaySpec {
        display_size: DISPLAY_SIZE.resolve(section, html),
        screen_to_body: SCREEN_TO_BODY.resolve(section, html),
        resolution: RESOLUTION.resolve(section, html),
        display_type: DISPLAY_TYPE.resolve(section, html),
        name,
        brand,
    }
}

fn non_blank(s: String) -> String {
    if s.is_empty() {
        SpecValue::SENTINEL.to_string()
    } else {
        s
    }
}

// ── Field extractors ──

fn size_inches(text: &str) -> Option<String> {
    capture(&INCHES_RE, text).map(|n| format!("{}\"", n))
}

fn ratio_labelled(text: &str) -> Option<String> {
    capture(&RATIO_RE, text).map(|n| format!("{}%", n))
}

fn ratio_tilde(text: &str) -> Option<String> {
    capture(&TILDE_RATIO_RE, text).map(|n| format!("{}%", n))
}

fn ratio_loose(text: &str) -> Option<String> {
    capture(&LOOSE_RATIO_RE, text).map(|n| format!("{}%", n))
}

fn resolution_with(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| format!("{} x {}", &c[1], &c[2]))
}

fn resolution_any(text: &str) -> Option<String> {
    resolution_with(&RESOLUTION_RE, text)
}

fn resolution_pixels(text: &str) -> Option<String> {
    resolution_with(&RESOLUTION_PIXELS_RE, text)
}

fn panel_type(text: &str) -> Option<String> {
    PANEL_RE.find(text).map(|m| m.as_str().trim().to_uppercase())
}

fn panel_type_dynamic(text: &str) -> Option<String> {
    DYNAMIC_PANEL_RE.find(text).map(|m| m.as_str().trim().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn value(s: &str) -> SpecValue {
        SpecValue::Value(s.to_string())
    }

    #[test]
    fn iphone_15_pro_page() {
        let spec = extract_spec(&fixture("apple_iphone_15_pro"), "apple_iphone_15_pro-12557");
        assert_eq!(spec.name, "Apple iPhone 15 Pro");
        assert_eq!(spec.brand, "Apple");
        assert_eq!(spec.display_size, value("6.1\""));
        assert_eq!(spec.screen_to_body, value("88.0%"));
        assert_eq!(spec.resolution, value("1179 x 2556"));
        assert_eq!(spec.display_type, value("LTPO"));
    }

    #[test]
    fn display_table_beats_rest_of_page() {
        let html = r#"
            <p>Bigger sibling: 6.7 inches, 2796 x 1290 pixels, ~89.8% screen-to-body, OLED</p>
            <h2>Display</h2>
            <table><tr><td>Size</td><td>6.1 inches (~86.4% screen-to-body ratio)</td></tr>
            <tr><td>Resolution</td><td>1080 x 2340</td></tr>
            <tr><td>Type</td><td>Super AMOLED</td></tr></table>"#;
        let spec = extract_spec(html, "some_phone-1");
        assert_eq!(spec.display_size, value("6.1\""));
        assert_eq!(spec.screen_to_body, value("86.4%"));
        assert_eq!(spec.resolution, value("1080 x 2340"));
        assert_eq!(spec.display_type, value("SUPER AMOLED"));
    }

    #[test]
    fn tilde_ratio_inside_table() {
        let html = r#"<h2>Display</h2><table><tr><td>6.7 inches (~87.4%)</td></tr></table>"#;
        let spec = extract_spec(html, "x-1");
        assert_eq!(spec.screen_to_body, value("87.4%"));
    }

    #[test]
    fn falls_back_to_full_page() {
        let html = r#"
            <div class="brief">Size 6.36 inches</div>
            <div>2670 x 1200 pixels (~90.1% screen-to-body ratio)</div>
            <div>Dynamic AMOLED 2X, 120Hz</div>"#;
        let spec = extract_spec(html, "samsung_galaxy_s24-12773");
        assert_eq!(spec.display_size, value("6.36\""));
        assert_eq!(spec.screen_to_body, value("90.1%"));
        assert_eq!(spec.resolution, value("2670 x 1200"));
        assert_eq!(spec.display_type, value("DYNAMIC AMOLED"));
    }

    #[test]
    fn page_resolution_needs_pixels_keyword() {
        let spec = extract_spec("<div>1080 x 2400</div>", "x-1");
        assert_eq!(spec.resolution, SpecValue::NotAvailable);
        let spec = extract_spec("<h2>Display</h2><table><td>1080 x 2400</td></table>", "x-1");
        assert_eq!(spec.resolution, value("1080 x 2400"));
    }

    #[test]
    fn name_from_slug_when_heading_missing() {
        let spec = extract_spec("<html></html>", "samsung_galaxy_s24_ultra-12771");
        assert_eq!(spec.name, "samsung galaxy s24 ultra");
        assert_eq!(spec.brand, "samsung");
    }

    #[test]
    fn malformed_markup_is_all_sentinels() {
        let spec = extract_spec("<<<table>>> </h1 <h1 class=", "-42");
        assert_eq!(spec.name, "N/A");
        assert_eq!(spec.brand, "N/A");
        for field in [
            &spec.display_size,
            &spec.screen_to_body,
            &spec.resolution,
            &spec.display_type,
        ] {
            assert_eq!(field, &SpecValue::NotAvailable);
            assert_eq!(field.to_string(), "N/A");
        }
    }

    #[test]
    fn serializes_with_page_field_names() {
        let spec = extract_spec("<div>6.5 inches</div>", "nokia_x30-11905");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["name"], "nokia x30");
        assert_eq!(json["displaySize"], "6.5\"");
        assert_eq!(json["screenToBody"], "N/A");
        assert_eq!(json["displayType"], "N/A");
    }
}
