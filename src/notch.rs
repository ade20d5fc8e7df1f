use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Front-camera cutout style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotchCategory {
    DynamicIsland,
    Wide,
    Teardrop,
    PunchHole,
    Pill,
    None,
}

impl NotchCategory {
    pub const ALL: [NotchCategory; 6] = [
        NotchCategory::DynamicIsland,
        NotchCategory::Wide,
        NotchCategory::Teardrop,
        NotchCategory::PunchHole,
        NotchCategory::Pill,
        NotchCategory::None,
    ];

    pub fn id(self) -> &'static str {
        match self {
            NotchCategory::DynamicIsland => "dynamic-island",
            NotchCategory::Wide => "wide",
            NotchCategory::Teardrop => "teardrop",
            NotchCategory::PunchHole => "punch-hole",
            NotchCategory::Pill => "pill",
            NotchCategory::None => "none",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NotchCategory::DynamicIsland => "Dynamic Island",
            NotchCategory::Wide => "Wide Notch",
            NotchCategory::Teardrop => "Teardrop",
            NotchCategory::PunchHole => "Punch Hole",
            NotchCategory::Pill => "Pill Cutout",
            NotchCategory::None => "Full Screen",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            NotchCategory::DynamicIsland => {
                "Pill-shaped cutout with interactive features (iPhone 14 Pro+)"
            }
            NotchCategory::Wide => "Wide notch housing Face ID sensors (iPhone X-13)",
            NotchCategory::Teardrop => "Small centered teardrop cutout for front camera",
            NotchCategory::PunchHole => "Small circular hole-punch cutout for camera",
            NotchCategory::Pill => "Elongated pill-shaped cutout for camera and sensors",
            NotchCategory::None => "Full screen display with no visible cutout",
        }
    }
}

impl fmt::Display for NotchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Error)]
#[error("unknown notch type '{0}' (expected one of: dynamic-island, wide, teardrop, punch-hole, pill, none)")]
pub struct UnknownNotch(pub String);

impl FromStr for NotchCategory {
    type Err = UnknownNotch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        NotchCategory::ALL
            .into_iter()
            .find(|n| n.id() == wanted)
            .ok_or_else(|| UnknownNotch(s.to_string()))
    }
}

use NotchCategory::{DynamicIsland, PunchHole, Teardrop, Wide};
use NotchCategory::{None as NoNotch, Pill};

static GALAXY_S_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"galaxy s(\d+)").unwrap());
static GALAXY_S_RECENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"s2[0-4]|s10").unwrap());
static GALAXY_A_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"galaxy a(\d+)").unwrap());
static GALAXY_A_S_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"a[0-9]+s").unwrap());
static GALAXY_A_PUNCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"a5[1-5]|a7[1-5]|a3[3-5]").unwrap());
static GALAXY_M_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"galaxy m(\d+)").unwrap());
static PIXEL_RECENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"pixel [5-9]").unwrap());
static ONEPLUS_RECENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"oneplus [8-9]|oneplus 1[0-2]|nord").unwrap());
static MI_RECENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"mi 1[0-3]").unwrap());
static REDMI_NOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"note (\d+)").unwrap());
static REDMI_NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"redmi [9]|redmi 1[0-4]").unwrap());
static XIAOMI_NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"xiaomi 1[1-4]").unwrap());
static REALME_NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"realme (\d+)").unwrap());
static MOTO_G_NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"g[0-9]{2}").unwrap());
static ZENFONE_RECENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"zenfone [8-9]|zenfone 10").unwrap());

type BrandRules = fn(&str) -> NotchCategory;

/// Brand blocks in precedence order. A name enters the first block whose
/// keywords it contains and never falls through to a later one.
const BRANDS: &[(&[&str], BrandRules)] = &[
    (&["iphone"], apple),
    (&["samsung", "galaxy"], samsung),
    (&["pixel"], pixel),
    (&["oneplus"], oneplus),
    (&["xiaomi", "redmi", "poco"], xiaomi),
    (&["oppo"], oppo),
    (&["vivo"], vivo),
    (&["realme"], realme),
    (&["huawei", "honor"], huawei),
    (&["motorola", "moto"], motorola),
    (&["nothing"], nothing),
    (&["sony", "xperia"], sony),
    (&["asus", "rog", "zenfone"], asus),
    (&["nokia"], nokia),
    (&["tecno", "infinix", "itel"], transsion),
    (&["lg "], lg),
];

/// Guess the cutout style from a device name. Total: anything unrecognised
/// is a punch-hole, the most common design today.
pub fn classify(name: &str) -> NotchCategory {
    let name = name.to_lowercase();
    BRANDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, rules)| rules(&name))
        .unwrap_or(PunchHole)
}

/// Model number from the first capture; digit runs too long for `u32`
/// saturate so they still compare as "large".
fn model_number(re: &Regex, name: &str) -> Option<u32> {
    re.captures(name)
        .map(|c| c[1].parse::<u32>().unwrap_or(u32::MAX))
}

fn has_any(name: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| name.contains(n))
}

fn apple(name: &str) -> NotchCategory {
    if has_any(
        name,
        &["iphone 14 pro", "iphone 15", "iphone 16", "iphone 17"],
    ) {
        return DynamicIsland;
    }
    if has_any(
        name,
        &["iphone x", "iphone 11", "iphone 12", "iphone 13", "iphone 14"],
    ) {
        return Wide;
    }
    NoNotch
}

fn samsung(name: &str) -> NotchCategory {
    if name.contains("flip") {
        return PunchHole;
    }
    if name.contains("fold") {
        return PunchHole;
    }

    if name.contains("galaxy s") {
        if model_number(&GALAXY_S_RE, name).is_some_and(|n| n >= 10) {
            return PunchHole;
        }
        if GALAXY_S_RECENT_RE.is_match(name) {
            return PunchHole;
        }
        return NoNotch;
    }

    if name.contains("galaxy a") {
        // Order matters: the >= 70 band can never fire after >= 51.
        if let Some(n) = model_number(&GALAXY_A_RE, name) {
            if n >= 51 {
                return PunchHole;
            }
            if (30..=50).contains(&n) {
                return Teardrop;
            }
            if n >= 70 {
                return PunchHole;
            }
            if (10..30).contains(&n) {
                return Teardrop;
            }
        }
        if GALAXY_A_S_SUFFIX_RE.is_match(name) {
            return Teardrop;
        }
        if GALAXY_A_PUNCH_RE.is_match(name) {
            return PunchHole;
        }
        return Teardrop;
    }

    if name.contains("galaxy m") {
        if let Some(n) = model_number(&GALAXY_M_RE, name) {
            if n >= 51 {
                return PunchHole;
            }
            if n >= 30 {
                return Teardrop;
            }
        }
        return Teardrop;
    }

    if name.contains("galaxy f") {
        return Teardrop;
    }

    PunchHole
}

fn pixel(name: &str) -> NotchCategory {
    if name.contains("pixel 3") && name.contains("xl") {
        return Wide;
    }
    if name.contains("pixel 3") && !name.contains("xl") && !name.contains("3a") {
        return NoNotch;
    }
    if name.contains("3a") || name.contains("4a") {
        return PunchHole;
    }
    // Unreachable for 4a names; left in place.
    if name.contains("pixel 4") && !name.contains("4a") {
        return NoNotch;
    }
    if PIXEL_RECENT_RE.is_match(name) {
        return PunchHole;
    }
    PunchHole
}

fn oneplus(name: &str) -> NotchCategory {
    if name.contains("6t")
        || (name.contains("oneplus 7") && !name.contains("7t") && !name.contains("pro"))
    {
        return Teardrop;
    }
    // Pop-up selfie camera.
    if (name.contains('7') || name.contains("7t")) && name.contains("pro") {
        return NoNotch;
    }
    if ONEPLUS_RECENT_RE.is_match(name) {
        return PunchHole;
    }
    PunchHole
}

fn xiaomi(name: &str) -> NotchCategory {
    if name.contains("mi mix") {
        return NoNotch;
    }
    if name.contains("mi 9") {
        return Teardrop;
    }
    if MI_RECENT_RE.is_match(name) {
        return PunchHole;
    }

    if name.contains("redmi note") {
        if let Some(n) = model_number(&REDMI_NOTE_RE, name) {
            if n >= 10 {
                return PunchHole;
            }
            if n >= 7 {
                return Teardrop;
            }
        }
        return Teardrop;
    }

    if name.contains("redmi") {
        if REDMI_NUMBERED_RE.is_match(name) && !name.contains("note") {
            return Teardrop;
        }
        return Teardrop;
    }

    if name.contains("poco") {
        if name.contains("f1") {
            return Wide;
        }
        return PunchHole;
    }

    if XIAOMI_NUMBERED_RE.is_match(name) {
        return PunchHole;
    }
    Teardrop
}

fn oppo(name: &str) -> NotchCategory {
    if name.contains("find x") {
        if has_any(name, &["find x3", "find x5", "find x6", "find x7"]) {
            return PunchHole;
        }
        return PunchHole;
    }
    if name.contains("reno") {
        // Reno 10x Zoom used a pop-up camera.
        if name.contains("10x") {
            return NoNotch;
        }
        return PunchHole;
    }
    if name.contains("oppo a") {
        return Teardrop;
    }
    if name.contains("oppo f") {
        return Teardrop;
    }
    Teardrop
}

fn vivo(name: &str) -> NotchCategory {
    if name.contains("vivo v") {
        return Teardrop;
    }
    if name.contains("vivo y") {
        return Teardrop;
    }
    if name.contains("vivo x") {
        return PunchHole;
    }
    if name.contains("nex") {
        return NoNotch;
    }
    if name.contains("iqoo") {
        return PunchHole;
    }
    Teardrop
}

fn realme(name: &str) -> NotchCategory {
    if name.contains("gt") {
        return PunchHole;
    }
    if let Some(n) = model_number(&REALME_NUMBERED_RE, name) {
        return if n >= 8 { PunchHole } else { Teardrop };
    }
    if name.contains("realme c") {
        return Teardrop;
    }
    if name.contains("narzo") {
        return PunchHole;
    }
    Teardrop
}

fn huawei(name: &str) -> NotchCategory {
    if name.contains("p30") {
        return Teardrop;
    }
    if has_any(name, &["p40", "p50", "p60"]) {
        return Pill;
    }
    if name.contains("mate 20") {
        return Wide;
    }
    if has_any(name, &["mate 30", "mate 40", "mate 50"]) {
        return Wide;
    }
    if name.contains("nova") {
        return Teardrop;
    }
    if name.contains("honor") {
        if name.contains("magic") {
            return PunchHole;
        }
        return Teardrop;
    }
    Teardrop
}

fn motorola(name: &str) -> NotchCategory {
    if name.contains("edge") {
        return PunchHole;
    }
    if name.contains("moto g") {
        if name.contains("5g") || MOTO_G_NUMBERED_RE.is_match(name) {
            return PunchHole;
        }
        return Teardrop;
    }
    if name.contains("razr") {
        return PunchHole;
    }
    Teardrop
}

fn nothing(_: &str) -> NotchCategory {
    PunchHole
}

/// Xperia phones keep a top bezel.
fn sony(_: &str) -> NotchCategory {
    NoNotch
}

fn asus(name: &str) -> NotchCategory {
    if name.contains("rog") {
        return NoNotch;
    }
    // Flip camera.
    if name.contains("zenfone 6") || name.contains("zenfone 7") {
        return NoNotch;
    }
    if ZENFONE_RECENT_RE.is_match(name) {
        return PunchHole;
    }
    PunchHole
}

fn nokia(_: &str) -> NotchCategory {
    Teardrop
}

/// Tecno, Infinix and itel.
fn transsion(_: &str) -> NotchCategory {
    Teardrop
}

fn lg(name: &str) -> NotchCategory {
    if name.contains("v60") || name.contains("velvet") {
        return Teardrop;
    }
    NoNotch
}
