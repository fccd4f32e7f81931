use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThumbnailStyle {
    Minimal,
    NeonCyberpunk,
    Cinematic,
    Retro,
    Abstract,
    ThreeD,
}

impl ThumbnailStyle {
    pub const ALL: [ThumbnailStyle; 6] = [
        ThumbnailStyle::Minimal,
        ThumbnailStyle::NeonCyberpunk,
        ThumbnailStyle::Cinematic,
        ThumbnailStyle::Retro,
        ThumbnailStyle::Abstract,
        ThumbnailStyle::ThreeD,
    ];

    /// Dictionary key under `dashboard.styles`.
    pub fn key(self) -> &'static str {
        match self {
            ThumbnailStyle::Minimal => "minimal",
            ThumbnailStyle::NeonCyberpunk => "neonCyberpunk",
            ThumbnailStyle::Cinematic => "cinematic",
            ThumbnailStyle::Retro => "retro",
            ThumbnailStyle::Abstract => "abstract",
            ThumbnailStyle::ThreeD => "threeD",
        }
    }

    /// How the style reads inside a prompt.
    pub fn prompt_phrase(self) -> &'static str {
        match self {
            ThumbnailStyle::Minimal => "minimal",
            ThumbnailStyle::NeonCyberpunk => "neon cyberpunk",
            ThumbnailStyle::Cinematic => "cinematic",
            ThumbnailStyle::Retro => "retro",
            ThumbnailStyle::Abstract => "abstract",
            ThumbnailStyle::ThreeD => "3D rendered",
        }
    }

    pub fn title_key(self) -> String {
        format!("dashboard.styles.{}.title", self.key())
    }

    pub fn description_key(self) -> String {
        format!("dashboard.styles.{}.description", self.key())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Landscape,
    Square,
    Portrait,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Landscape, OutputFormat::Square, OutputFormat::Portrait];

    pub fn key(self) -> &'static str {
        match self {
            OutputFormat::Landscape => "landscape",
            OutputFormat::Square => "square",
            OutputFormat::Portrait => "portrait",
        }
    }

    pub fn aspect_ratio(self) -> &'static str {
        match self {
            OutputFormat::Landscape => "16:9",
            OutputFormat::Square => "1:1",
            OutputFormat::Portrait => "9:16",
        }
    }

    pub fn label_key(self) -> String {
        format!("dashboard.formats.{}", self.key())
    }

    pub fn from_key(key: &str) -> Option<OutputFormat> {
        OutputFormat::ALL.into_iter().find(|format| format.key() == key)
    }
}

/// Folds the form fields into the single prompt sent for generation.
pub fn compose_prompt(
    prompt: &str,
    style: Option<ThumbnailStyle>,
    trigger: &str,
    format: OutputFormat,
) -> String {
    let prompt = prompt.split_whitespace().collect::<Vec<_>>().join(" ");
    if prompt.is_empty() {
        return prompt;
    }
    let trigger = trigger.trim();

    let mut parts = vec![prompt];
    if let Some(style) = style {
        parts.push(format!("in {} style", style.prompt_phrase()));
    }
    if !trigger.is_empty() {
        parts.push(format!("incorporating {trigger}"));
    }
    parts.push(format!("{} aspect ratio", format.aspect_ratio()));

    parts.join(", ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedThumbnail {
    pub id: u64,
    pub url: String,
    pub prompt: String,
    pub style: Option<ThumbnailStyle>,
    pub trigger_keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u32,
    pub prompt: String,
    pub style: ThumbnailStyle,
    pub image_url: String,
    pub created_on: NaiveDate,
}

/// History is not persisted; the page shows these rows.
pub fn sample_history() -> Vec<HistoryEntry> {
    let entry = |id, prompt: &str, style, image: &str, (y, m, d)| HistoryEntry {
        id,
        prompt: prompt.to_string(),
        style,
        image_url: format!("/images/samples/{image}"),
        created_on: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
    };

    vec![
        entry(1, "Gaming setup reveal with RGB lighting", ThumbnailStyle::NeonCyberpunk, "gaming-setup.svg", (2024, 3, 14)),
        entry(2, "Sourdough baking tutorial, flour everywhere", ThumbnailStyle::Minimal, "sourdough.svg", (2024, 3, 9)),
        entry(3, "Mountain road trip at golden hour", ThumbnailStyle::Cinematic, "road-trip.svg", (2024, 2, 27)),
        entry(4, "Synthwave music mix cover", ThumbnailStyle::Retro, "synthwave.svg", (2024, 2, 18)),
        entry(5, "Product launch for a smart water bottle", ThumbnailStyle::ThreeD, "bottle.svg", (2024, 2, 2)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_prompt_with_everything() {
        let prompt = compose_prompt(
            "  a   chef\n flipping pancakes ",
            Some(ThumbnailStyle::NeonCyberpunk),
            " breakfast ",
            OutputFormat::Landscape,
        );
        assert_eq!(
            prompt,
            "a chef flipping pancakes, in neon cyberpunk style, incorporating breakfast, 16:9 aspect ratio"
        );
    }

    #[test]
    fn test_compose_prompt_skips_empty_parts() {
        let prompt = compose_prompt("a cat", None, "   ", OutputFormat::Square);
        assert_eq!(prompt, "a cat, 1:1 aspect ratio");
    }

    #[test]
    fn test_blank_prompt_stays_blank() {
        let prompt = compose_prompt("  \n ", Some(ThumbnailStyle::Retro), "vinyl", OutputFormat::Portrait);
        assert!(prompt.is_empty());
    }

    #[test]
    fn test_style_keys_are_translated() {
        use crate::i18n::{translate, Language};

        for style in ThumbnailStyle::ALL {
            assert_ne!(translate(Language::English, &style.title_key()), style.title_key());
        }
        for format in OutputFormat::ALL {
            assert_ne!(translate(Language::English, &format.label_key()), format.label_key());
            assert_eq!(OutputFormat::from_key(format.key()), Some(format));
        }
    }

    #[test]
    fn test_sample_history_is_newest_first() {
        let history = sample_history();
        assert_eq!(history.len(), 5);
        assert!(history.windows(2).all(|pair| pair[0].created_on >= pair[1].created_on));
    }
}
