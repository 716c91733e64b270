//! Supported languages, their asset locations, and the word-list / ruby
//! annotation data formats.

use std::collections::HashMap;

use crate::error::GameError;

const CLOUDINARY_EN_URL: &str = "https://res.cloudinary.com/dnkit8npf/image/upload/v1732122102";
const CLOUDINARY_JA_URL: &str = "https://res.cloudinary.com/dnkit8npf/image/upload/v1732122190";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ja];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Label for the language-select header button.
    pub fn caption(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "日本語",
        }
    }

    /// Unknown or missing codes fall back to English.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("ja") => Language::Ja,
            _ => Language::En,
        }
    }

    /// Only Japanese ships phonetic (furigana) annotations.
    pub fn has_annotations(self) -> bool {
        matches!(self, Language::Ja)
    }

    pub fn wordlist_path(self) -> String {
        format!("./assets/wordlist_{}.json", self.code())
    }

    pub fn annotations_path(self) -> Option<&'static str> {
        match self {
            Language::Ja => Some("./assets/furigana_ja.json"),
            Language::En => None,
        }
    }

    /// Mask image location for `word`. `local` serves masks from `./masks/` instead of the CDN.
    pub fn mask_url(self, word: &str, local: bool) -> String {
        if local {
            return format!("./masks/{}/{}.png", self.code(), word);
        }
        match self {
            Language::En => format!("{CLOUDINARY_EN_URL}/{word}.png"),
            Language::Ja => format!("{CLOUDINARY_JA_URL}/{word}.png"),
        }
    }
}

/// One ruby run: base text and its (possibly empty) reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RubySegment {
    pub base: String,
    pub annotation: String,
}

/// Word -> ordered ruby segments.
pub type AnnotationMap = HashMap<String, Vec<RubySegment>>;

pub fn parse_word_list(json: &str) -> Result<Vec<String>, GameError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse `[[word, [[base, annotation], ...]], ...]`.
pub fn parse_annotations(json: &str) -> Result<AnnotationMap, GameError> {
    let rows: Vec<(String, Vec<(String, String)>)> = serde_json::from_str(json)?;
    Ok(rows
        .into_iter()
        .map(|(word, segs)| {
            let segs = segs
                .into_iter()
                .map(|(base, annotation)| RubySegment { base, annotation })
                .collect();
            (word, segs)
        })
        .collect())
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render segments as `<ruby>` markup; segments without a reading get no `<rt>`.
pub fn ruby_html(segments: &[RubySegment]) -> String {
    let mut html = String::from("<div>");
    for seg in segments {
        html.push_str("<ruby>");
        html.push_str(&escape_html(&seg.base));
        if !seg.annotation.is_empty() {
            html.push_str("<rt>");
            html.push_str(&escape_html(&seg.annotation));
            html.push_str("</rt>");
        }
        html.push_str("</ruby>");
    }
    html.push_str("</div>");
    html
}
