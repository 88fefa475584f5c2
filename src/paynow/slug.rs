//! Product slug parsing
//!
//! A slug such as `vip-10x-1-year` is split on hyphens and run through an ordered rule
//! table. The first rule whose predicate accepts the tokens builds the descriptor; the
//! generic rule catches everything else.

use crate::config::SlugVocabulary;
use derive_more::Display;

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const GLOBAL_SERVER: &str = "Global";

/// Structural category of a slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum SlugKind {
    #[default]
    #[display("generic")]
    Generic,
    #[display("credits")]
    Credits,
    #[display("tag")]
    Tag,
    #[display("namecolor")]
    NameColor,
}

/// Display fields extracted from a slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugDescriptor {
    pub product_name: String,
    pub server_name: String,
    pub runtime_text: Option<String>,
    pub kind: SlugKind,
}

impl Default for SlugDescriptor {
    fn default() -> Self {
        Self {
            product_name: UNKNOWN_PRODUCT.to_string(),
            server_name: GLOBAL_SERVER.to_string(),
            runtime_text: None,
            kind: SlugKind::Generic,
        }
    }
}

impl SlugDescriptor {
    fn global(product_name: String, kind: SlugKind) -> Self {
        Self {
            product_name,
            kind,
            ..Default::default()
        }
    }

    /// Runtime suffix is only meaningful for generic products
    #[must_use]
    pub fn display_runtime(&self) -> Option<&str> {
        match self.kind {
            SlugKind::Generic => self.runtime_text.as_deref(),
            _ => None,
        }
    }
}

/// A special-purpose slug grammar: predicate plus builder
struct SlugRule {
    kind: SlugKind,
    applies: fn(&[&str]) -> bool,
    build: fn(&[&str], &SlugVocabulary) -> String,
}

/// Checked in order; first match wins.
const RULES: &[SlugRule] = &[
    SlugRule {
        kind: SlugKind::Credits,
        applies: |tokens| tokens.contains(&"credits"),
        build: build_credits,
    },
    SlugRule {
        kind: SlugKind::Tag,
        applies: |tokens| tokens.contains(&"tag"),
        build: build_tag,
    },
    SlugRule {
        kind: SlugKind::NameColor,
        applies: |tokens| tokens.contains(&"name") && tokens.contains(&"color"),
        build: build_name_color,
    },
];

/// Parses slugs against a vocabulary
#[derive(Debug, Clone, Copy)]
pub struct SlugParser<'a> {
    vocabulary: &'a SlugVocabulary,
}

impl<'a> SlugParser<'a> {
    #[must_use]
    pub fn new(vocabulary: &'a SlugVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Parse a slug into its descriptor. Never fails.
    #[must_use]
    pub fn parse(&self, slug: Option<&str>) -> SlugDescriptor {
        let Some(slug) = slug else {
            return SlugDescriptor::default();
        };

        let lowered = slug.trim().to_lowercase();
        let tokens: Vec<&str> = lowered.split('-').filter(|t| !t.is_empty()).collect();
        if tokens.is_empty() {
            return SlugDescriptor::default();
        }

        for rule in RULES {
            if (rule.applies)(&tokens) {
                let name = (rule.build)(&tokens, self.vocabulary);
                return SlugDescriptor::global(name, rule.kind);
            }
        }

        self.parse_generic(&tokens)
    }

    fn parse_generic(&self, tokens: &[&str]) -> SlugDescriptor {
        let mut remaining: Vec<&str> = tokens.to_vec();

        let server_name = remaining
            .iter()
            .position(|token| self.vocabulary.server(token).is_some())
            .and_then(|idx| {
                let token = remaining.remove(idx);
                self.vocabulary.server(token).map(str::to_string)
            });

        let runtime_text = take_runtime(&mut remaining);

        let product_name = join_display_words(&remaining, self.vocabulary);

        SlugDescriptor {
            product_name: if product_name.is_empty() {
                UNKNOWN_PRODUCT.to_string()
            } else {
                product_name
            },
            server_name: server_name.unwrap_or_else(|| GLOBAL_SERVER.to_string()),
            runtime_text,
            kind: SlugKind::Generic,
        }
    }
}

fn build_credits(tokens: &[&str], _vocabulary: &SlugVocabulary) -> String {
    match tokens.iter().find(|token| is_numeric(token)) {
        Some(amount) => format!("{amount} Credits"),
        None => "Credits".to_string(),
    }
}

fn build_tag(tokens: &[&str], vocabulary: &SlugVocabulary) -> String {
    let prefix_len = tokens.iter().position(|t| *t == "tag").unwrap_or(0);
    with_suffix(join_display_words(&tokens[..prefix_len], vocabulary), "Tag")
}

fn build_name_color(tokens: &[&str], vocabulary: &SlugVocabulary) -> String {
    let prefix_len = tokens.iter().position(|t| *t == "name").unwrap_or(0);
    with_suffix(
        join_display_words(&tokens[..prefix_len], vocabulary),
        "Name Color",
    )
}

fn with_suffix(prefix: String, suffix: &str) -> String {
    if prefix.is_empty() {
        suffix.to_string()
    } else {
        format!("{prefix} {suffix}")
    }
}

/// Scan right-to-left for the first runtime expression and remove it from `tokens`.
fn take_runtime(tokens: &mut Vec<&str>) -> Option<String> {
    for idx in (0..tokens.len()).rev() {
        let token = tokens[idx];

        if let Some(text) = fixed_runtime(token) {
            tokens.remove(idx);
            return Some(text.to_string());
        }

        if let Some((count, unit)) = compact_runtime(token) {
            tokens.remove(idx);
            return Some(runtime_label(count, unit));
        }

        // `1-year` arrives as two tokens
        if let Some(unit) = runtime_unit(token) {
            if idx > 0 && is_numeric(tokens[idx - 1]) {
                let count = tokens[idx - 1];
                let text = runtime_label(count, unit);
                tokens.drain(idx - 1..=idx);
                return Some(text);
            }
        }
    }
    None
}

fn fixed_runtime(token: &str) -> Option<&'static str> {
    match token {
        "permanent" | "lifetime" => Some("Permanent"),
        "monthly" => Some("Monthly"),
        "weekly" => Some("Weekly"),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuntimeUnit {
    Year,
    Month,
}

fn runtime_unit(token: &str) -> Option<RuntimeUnit> {
    match token {
        "year" | "years" => Some(RuntimeUnit::Year),
        "month" | "months" => Some(RuntimeUnit::Month),
        _ => None,
    }
}

/// `3months`, `1year`
fn compact_runtime(token: &str) -> Option<(&str, RuntimeUnit)> {
    let split = token.find(|c: char| !c.is_ascii_digit())?;
    let (count, unit) = token.split_at(split);
    if count.is_empty() {
        return None;
    }
    runtime_unit(unit).map(|unit| (count, unit))
}

fn runtime_label(count: &str, unit: RuntimeUnit) -> String {
    let singular = count.trim_start_matches('0') == "1";
    let word = match (unit, singular) {
        (RuntimeUnit::Year, true) => "Year",
        (RuntimeUnit::Year, false) => "Years",
        (RuntimeUnit::Month, true) => "Month",
        (RuntimeUnit::Month, false) => "Months",
    };
    format!("{count} {word}")
}

/// One or more ASCII digits, nothing else.
#[must_use]
pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn display_word(token: &str, vocabulary: &SlugVocabulary) -> String {
    if let Some(replacement) = vocabulary.word(token) {
        return replacement.to_string();
    }
    if is_numeric(token) {
        return token.to_string();
    }
    capitalize(token)
}

fn join_display_words(tokens: &[&str], vocabulary: &SlugVocabulary) -> String {
    tokens
        .iter()
        .map(|token| display_word(token, vocabulary))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character, leave the rest untouched.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(slug: Option<&str>) -> SlugDescriptor {
        let vocabulary = SlugVocabulary::default();
        SlugParser::new(&vocabulary).parse(slug)
    }

    #[test]
    fn test_missing_and_empty_slugs_fall_back() {
        let expected = SlugDescriptor {
            product_name: "Unknown Product".to_string(),
            server_name: "Global".to_string(),
            runtime_text: None,
            kind: SlugKind::Generic,
        };
        assert_eq!(parse(None), expected);
        assert_eq!(parse(Some("")), expected);
        assert_eq!(parse(Some("---")), expected);
    }

    #[test]
    fn test_credits() {
        let descriptor = parse(Some("500-credits"));
        assert_eq!(descriptor.product_name, "500 Credits");
        assert_eq!(descriptor.server_name, "Global");
        assert_eq!(descriptor.runtime_text, None);
        assert_eq!(descriptor.kind, SlugKind::Credits);

        // Server and runtime tokens are ignored for credits
        let descriptor = parse(Some("10x-credits-monthly"));
        assert_eq!(descriptor.product_name, "Credits");
        assert_eq!(descriptor.server_name, "Global");
        assert_eq!(descriptor.runtime_text, None);
    }

    #[test]
    fn test_credits_picks_first_numeric_token() {
        assert_eq!(parse(Some("credits-250-bonus-50")).product_name, "250 Credits");
    }

    #[test]
    fn test_tag() {
        let descriptor = parse(Some("gg-tag"));
        assert_eq!(descriptor.product_name, "GG Tag");
        assert_eq!(descriptor.server_name, "Global");
        assert_eq!(descriptor.kind, SlugKind::Tag);

        assert_eq!(parse(Some("tag")).product_name, "Tag");
        assert_eq!(parse(Some("shiny-pink-tag-10x")).product_name, "Shiny Pink Tag");
    }

    #[test]
    fn test_name_color() {
        let descriptor = parse(Some("gold-name-color"));
        assert_eq!(descriptor.product_name, "Gold Name Color");
        assert_eq!(descriptor.server_name, "Global");
        assert_eq!(descriptor.runtime_text, None);
        assert_eq!(descriptor.kind, SlugKind::NameColor);

        assert_eq!(parse(Some("name-color")).product_name, "Name Color");
    }

    #[test]
    fn test_rule_precedence() {
        // credits beats tag, tag beats name-color
        assert_eq!(parse(Some("tag-credits")).kind, SlugKind::Credits);
        assert_eq!(parse(Some("name-color-tag")).kind, SlugKind::Tag);
        // `name` alone is just a word
        assert_eq!(parse(Some("name-change")).kind, SlugKind::Generic);
    }

    #[test]
    fn test_generic_with_server_and_runtime() {
        let descriptor = parse(Some("all-kits-global-monthly"));
        assert_eq!(descriptor.product_name, "All Kits");
        assert_eq!(descriptor.server_name, "Global");
        assert_eq!(descriptor.runtime_text.as_deref(), Some("Monthly"));
        assert_eq!(descriptor.kind, SlugKind::Generic);
    }

    #[test]
    fn test_generic_split_year_runtime() {
        let descriptor = parse(Some("vip-10x-1-year"));
        assert_eq!(descriptor.product_name, "VIP");
        assert_eq!(descriptor.server_name, "10x");
        assert_eq!(descriptor.runtime_text.as_deref(), Some("1 Year"));
    }

    #[test]
    fn test_generic_runtime_forms() {
        assert_eq!(parse(Some("vip-2-years")).runtime_text.as_deref(), Some("2 Years"));
        assert_eq!(parse(Some("vip-1year")).runtime_text.as_deref(), Some("1 Year"));
        assert_eq!(parse(Some("vip-6months")).runtime_text.as_deref(), Some("6 Months"));
        assert_eq!(parse(Some("vip-1-month")).runtime_text.as_deref(), Some("1 Month"));
        assert_eq!(parse(Some("vip-lifetime")).runtime_text.as_deref(), Some("Permanent"));
        assert_eq!(parse(Some("vip-permanent")).runtime_text.as_deref(), Some("Permanent"));
        assert_eq!(parse(Some("vip-weekly")).runtime_text.as_deref(), Some("Weekly"));
        assert_eq!(parse(Some("vip")).runtime_text, None);
    }

    #[test]
    fn test_runtime_scan_is_right_to_left() {
        let descriptor = parse(Some("monthly-bundle-weekly"));
        assert_eq!(descriptor.runtime_text.as_deref(), Some("Weekly"));
        assert_eq!(descriptor.product_name, "Monthly Bundle");
    }

    #[test]
    fn test_only_first_server_token_is_taken() {
        let descriptor = parse(Some("kit-solo-duo"));
        assert_eq!(descriptor.server_name, "Solo");
        assert_eq!(descriptor.product_name, "Kit Duo");
    }

    #[test]
    fn test_word_replacements_and_numbers() {
        assert_eq!(parse(Some("vip-rf")).product_name, "VIP Random Farming");
        assert_eq!(parse(Some("starter-kit-2")).product_name, "Starter Kit 2");
        assert_eq!(parse(Some("VIP-Kit")).product_name, "VIP Kit");
    }

    #[test]
    fn test_only_tokens_consumed_falls_back_to_unknown() {
        let descriptor = parse(Some("10x-monthly"));
        assert_eq!(descriptor.product_name, "Unknown Product");
        assert_eq!(descriptor.server_name, "10x");
        assert_eq!(descriptor.runtime_text.as_deref(), Some("Monthly"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let mut vocabulary = SlugVocabulary::default();
        vocabulary.servers.insert("eu".to_string(), "EU Main".to_string());
        vocabulary.words.insert("kit".to_string(), "Loadout".to_string());
        let descriptor = SlugParser::new(&vocabulary).parse(Some("kit-eu-weekly"));
        assert_eq!(descriptor.product_name, "Loadout");
        assert_eq!(descriptor.server_name, "EU Main");
    }

    #[test]
    fn test_display_runtime_only_for_generic() {
        let mut descriptor = parse(Some("500-credits"));
        descriptor.runtime_text = Some("Monthly".to_string());
        assert_eq!(descriptor.display_runtime(), None);
        assert_eq!(parse(Some("vip-weekly")).display_runtime(), Some("Weekly"));
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("0"));
        assert!(is_numeric("500"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("10x"));
        assert!(!is_numeric("-5"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SlugKind::NameColor.to_string(), "namecolor");
        assert_eq!(SlugKind::Credits.to_string(), "credits");
    }
}
