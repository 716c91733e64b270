//! Game constants and the page query-string overrides.

use crate::hit::HitRule;
use crate::lang::Language;

pub const DEFAULT_OPTION_COUNT: usize = 10;
pub const FEEDBACK_MS: i32 = 2000;
pub const FURIGANA_SETTINGS_KEY: &str = "furiganaEnabled";
pub const BACKGROUND_SRC: &str = "./assets/image.svg";

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub lang: Language,
    /// How many words are sampled into the option set.
    pub option_count: usize,
    /// How long feedback popups stay visible.
    pub feedback_ms: i32,
    pub hit_rule: HitRule,
    /// Serve masks from `./masks/{lang}/` instead of the CDN.
    pub local_masks: bool,
    pub settings_key: &'static str,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lang: Language::default(),
            option_count: DEFAULT_OPTION_COUNT,
            feedback_ms: FEEDBACK_MS,
            hit_rule: HitRule::default(),
            local_masks: false,
            settings_key: FURIGANA_SETTINGS_KEY,
        }
    }
}

impl GameConfig {
    /// Build a config from `location.search`, e.g. `?lang=ja&debug=1&options=6&threshold=200`.
    /// Unparseable values keep their defaults.
    pub fn from_query(search: &str) -> Self {
        let mut cfg = Self {
            lang: Language::from_code(query_param(search, "lang").as_deref()),
            ..Self::default()
        };
        if let Some(v) = query_param(search, "debug") {
            cfg.local_masks = matches!(v.as_str(), "" | "1" | "true");
        }
        if let Some(n) = query_param(search, "options").and_then(|v| v.parse::<usize>().ok()) {
            if n > 0 {
                cfg.option_count = n;
            }
        }
        // 0 would count empty pixels as hits
        if let Some(t) = query_param(search, "threshold").and_then(|v| v.parse::<u8>().ok()) {
            if t > 0 {
                cfg.hit_rule = HitRule::AtLeast(t);
            }
        }
        cfg
    }
}

/// Value of `key` in a `?a=b&c=d` string. Keys without `=` yield an empty value.
pub fn query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let mut it = pair.splitn(2, '=');
            let k = it.next()?;
            (k == key).then(|| it.next().unwrap_or("").to_string())
        })
}
