use std::sync::LazyLock;

use regex::Regex;

// ── Display fields ──

pub static INCHES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+\.?\d*)\s*inches").unwrap());
pub static RATIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+\.?\d*)\s*%\s*(?:screen-to-body|ratio)").unwrap());
pub static TILDE_RATIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)~(\d+\.?\d*)\s*%").unwrap());
pub static LOOSE_RATIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)~?(\d{2,3}\.?\d*)\s*%\s*(?:screen|ratio|body)").unwrap());
pub static RESOLUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{3,4})\s*x\s*(\d{3,4})").unwrap());
pub static RESOLUTION_PIXELS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{3,4})\s*x\s*(\d{3,4})\s*pixels").unwrap());
pub static PANEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(Super\s+)?([A-Z]+\s*)?(AMOLED|OLED|LCD|IPS|TFT|LTPO)").unwrap()
});
pub static DYNAMIC_PANEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(Dynamic\s+)?(Super\s+)?([A-Z]+\s*)?(AMOLED|OLED|LCD|IPS|TFT|LTPO)").unwrap()
});

// ── Markup helpers ──

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static SLUG_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\d+$").unwrap());

/// First capture group of the first match, if any.
pub fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Leading whitespace-delimited token; phone names start with the maker.
pub fn brand_of(name: &str) -> String {
    name.split_whitespace().next().unwrap_or_default().to_string()
}

pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").to_string()
}

/// `samsung_galaxy_s24-12771.php` → `samsung_galaxy_s24-12771`
pub fn slug_from_href(href: &str) -> String {
    href.replacen(".php", "", 1)
}

/// `samsung_galaxy_s24-12771` → `samsung galaxy s24`
pub fn name_from_slug(slug: &str) -> String {
    SLUG_ID_RE.replace(slug, "").replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_is_first_token() {
        assert_eq!(brand_of("Samsung Galaxy S24"), "Samsung");
        assert_eq!(brand_of("  Pixel\t8"), "Pixel");
        assert_eq!(brand_of(""), "");
    }

    #[test]
    fn slug_helpers() {
        assert_eq!(slug_from_href("apple_iphone_15_pro-12557.php"), "apple_iphone_15_pro-12557");
        assert_eq!(name_from_slug("apple_iphone_15_pro-12557"), "apple iphone 15 pro");
        assert_eq!(name_from_slug("nothing_phone_(2)"), "nothing phone (2)");
    }

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(strip_tags("<span>Galaxy <b>S24</b></span>"), "Galaxy S24");
    }

    #[test]
    fn panel_keyword_with_qualifier() {
        let m = PANEL_RE.find("Super AMOLED, 120Hz").unwrap();
        assert_eq!(m.as_str(), "Super AMOLED");
        let m = PANEL_RE.find("IPS LCD, 90Hz").unwrap();
        assert_eq!(m.as_str(), "IPS LCD");
    }
}
