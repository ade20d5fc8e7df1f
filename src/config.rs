use anyhow::{bail, Context, Result};
use config::{Config, Environment};
use reqwest::Url;
use serde::{Deserialize, Deserializer};

const DEFAULT_BASE_URL: &str = "https://www.gsmarena.com";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Upstream site and request headers. Every key can be overridden from the
/// environment, e.g. `PHONE_LOOKUP_BASE_URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(deserialize_with = "deserialize_base_url")]
    pub base_url: Url,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

/// Parse an upstream site address. The result is an http(s) URL whose path
/// ends in `/`, with no query or fragment, so pages can be appended to it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).with_context(|| format!("Invalid base URL {:?}", raw))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        bail!("Invalid base URL {:?}: expected an http or https address", raw);
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn deserialize_base_url<'de, D>(deserializer: D) -> std::result::Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_base_url(&raw).map_err(|e| serde::de::Error::custom(format!("{:#}", e)))
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("PHONE_LOOKUP"))
    }

    fn from_env(env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("accept", DEFAULT_ACCEPT)?
            .set_default("accept_language", DEFAULT_ACCEPT_LANGUAGE)?
            .add_source(env)
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Result<Self> {
        if let Some(raw) = base_url {
            self.base_url = parse_base_url(&raw)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("PHONE_LOOKUP").source(Some(map))
    }

    #[test]
    fn defaults_match_upstream_site() {
        let s = Settings::from_env(env(&[])).unwrap();
        assert_eq!(s.base_url.as_str(), "https://www.gsmarena.com/");
        assert_eq!(s.accept_language, "en-US,en;q=0.5");
        assert!(s.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn environment_overrides() {
        let s = Settings::from_env(env(&[
            ("PHONE_LOOKUP_BASE_URL", "http://localhost:8080/"),
            ("PHONE_LOOKUP_ACCEPT_LANGUAGE", "de-DE"),
        ]))
        .unwrap();
        assert_eq!(s.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(s.accept_language, "de-DE");
    }

    #[test]
    fn cli_flag_wins() {
        let defaults = Settings::from_env(env(&[])).unwrap();
        let s = defaults.clone().with_base_url(Some("http://mirror.test".into())).unwrap();
        assert_eq!(s.base_url.as_str(), "http://mirror.test/");
        let s = defaults.with_base_url(None).unwrap();
        assert_eq!(s.base_url.as_str(), "https://www.gsmarena.com/");
    }

    #[test]
    fn base_url_keeps_path_prefix_and_drops_query() {
        let url = parse_base_url(" https://mirror.test/gsm?lang=de#top ").unwrap();
        assert_eq!(url.as_str(), "https://mirror.test/gsm/");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        for raw in ["gsm.test", "", "ftp://gsm.test", "mailto:someone@gsm.test"] {
            let err = parse_base_url(raw).unwrap_err();
            assert!(err.to_string().starts_with("Invalid base URL"), "{raw}: {err}");
        }

        let err = Settings::from_env(env(&[("PHONE_LOOKUP_BASE_URL", "gsm.test")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid settings");
        assert!(format!("{:#}", err).contains("Invalid base URL \"gsm.test\""));

        let defaults = Settings::from_env(env(&[])).unwrap();
        assert!(defaults.with_base_url(Some("not a url".into())).is_err());
    }
}
