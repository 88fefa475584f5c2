//! Steam ID requirements for new tickets
//!
//! The ticket type comes from the channel name. Every type except Discord-related tickets
//! needs at least the creator's Steam ID; reports also need the reported player's.

use crate::steam::extract_steam_ids;
use derive_more::Display;
use poise::serenity_prelude::{CreateEmbed, Timestamp};

const WARNING_COLOUR: u32 = 0xFF6B_6B;

/// Labels that mark an answer as describing the reported player
const SUSPECT_LABEL_HINTS: &[&str] = &[
    "suspect", "target", "reporting", "reported", "cheater", "offender",
];

const FORMATS_WITH_LEGACY: &str = "• Steam64 ID: `76561198XXXXXXXXX`\n\
    • Steam Profile URL: `https://steamcommunity.com/profiles/76561198XXXXXXXXX`\n\
    • Steam Vanity URL: `https://steamcommunity.com/id/yourname`\n\
    • STEAM_0 format: `STEAM_0:1:12345678`";

const FORMATS: &str = "• Steam64 ID: `76561198XXXXXXXXX`\n\
    • Steam Profile URL: `https://steamcommunity.com/profiles/76561198XXXXXXXXX`\n\
    • Steam Vanity URL: `https://steamcommunity.com/id/yourname`";

/// Ticket category as derived from the channel name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TicketType {
    #[display("discord")]
    Discord,
    #[display("report")]
    Report,
    #[display("appeal")]
    Appeal,
    #[display("payment")]
    Payment,
    #[display("general")]
    General,
}

impl TicketType {
    #[must_use]
    pub fn from_channel_name(channel_name: &str) -> Self {
        let name = channel_name.to_lowercase();
        if name.contains("discord") {
            Self::Discord
        } else if name.contains("report") {
            Self::Report
        } else if name.contains("appeal") || name.contains("ban") {
            Self::Appeal
        } else if name.contains("payment") {
            Self::Payment
        } else {
            Self::General
        }
    }

    /// Whether Steam lookups make sense for this ticket at all
    #[must_use]
    pub fn wants_steam(self) -> bool {
        self != Self::Discord
    }
}

/// What the ticket creator forgot to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MissingInfo {
    #[display("both")]
    Both,
    #[display("reporter")]
    Reporter,
    #[display("suspect")]
    Suspect,
    #[display("player")]
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Missing {
        ticket_type: TicketType,
        missing: MissingInfo,
    },
}

impl Validation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// One question/answer pair from the ticket form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalAnswer {
    pub label: String,
    pub value: String,
}

impl ModalAnswer {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    fn is_about_suspect(&self) -> bool {
        let label = self.label.to_lowercase();
        SUSPECT_LABEL_HINTS.iter().any(|hint| label.contains(hint))
    }
}

/// All Steam ids across the answers, unique and in order
#[must_use]
pub fn collect_steam_ids(answers: &[ModalAnswer]) -> Vec<String> {
    let text = answers
        .iter()
        .map(|a| a.value.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    extract_steam_ids(&text)
}

fn collect_report_ids(answers: &[ModalAnswer]) -> (Vec<String>, Vec<String>) {
    let (suspect_answers, reporter_answers): (Vec<ModalAnswer>, Vec<ModalAnswer>) =
        answers.iter().cloned().partition(ModalAnswer::is_about_suspect);

    let mut reporter_ids = collect_steam_ids(&reporter_answers);
    let mut suspect_ids: Vec<String> = collect_steam_ids(&suspect_answers)
        .into_iter()
        .filter(|id| !reporter_ids.contains(id))
        .collect();

    // Everything pasted into one answer: first id is the reporter
    if suspect_ids.is_empty() && reporter_ids.len() > 1 {
        suspect_ids = reporter_ids.split_off(1);
    }
    (reporter_ids, suspect_ids)
}

#[must_use]
pub fn validate_steam_ids(channel_name: &str, answers: &[ModalAnswer]) -> Validation {
    let ticket_type = TicketType::from_channel_name(channel_name);
    let missing = |missing| Validation::Missing {
        ticket_type,
        missing,
    };

    match ticket_type {
        TicketType::Discord => Validation::Valid,
        TicketType::Report => {
            let (reporter_ids, suspect_ids) = collect_report_ids(answers);
            match (reporter_ids.is_empty(), suspect_ids.is_empty()) {
                (true, true) => missing(MissingInfo::Both),
                (true, false) => missing(MissingInfo::Reporter),
                (false, true) => missing(MissingInfo::Suspect),
                (false, false) => Validation::Valid,
            }
        }
        TicketType::Appeal | TicketType::Payment | TicketType::General => {
            if collect_steam_ids(answers).is_empty() {
                missing(MissingInfo::Player)
            } else {
                Validation::Valid
            }
        }
    }
}

/// Explain to the ticket creator what is missing and how to provide it
#[must_use]
pub fn missing_info_embed(ticket_type: TicketType, missing: MissingInfo) -> CreateEmbed {
    let required = |value: &str| ("📋 Required Information", value.to_string(), false);
    let how = |intro: &str, formats: &str| ("💡 How to Provide", format!("{intro}\n{formats}"), false);
    let send_one = "Please send a message with your Steam ID in any of these formats:";

    let (description, fields) = match (ticket_type, missing) {
        (TicketType::Report, MissingInfo::Reporter) => (
            "Your report ticket is missing your own Steam ID.",
            vec![
                required("**Your own Steam ID** (the player creating this report)"),
                how(send_one, FORMATS_WITH_LEGACY),
            ],
        ),
        (TicketType::Report, MissingInfo::Suspect) => (
            "Your report ticket is missing the Steam ID of the player you're reporting.",
            vec![
                required("**The Steam ID of the player you're reporting**"),
                how(
                    "Please send a message with their Steam ID in any of these formats:",
                    FORMATS_WITH_LEGACY,
                ),
            ],
        ),
        (TicketType::Report, _) => (
            "Your report ticket is missing required Steam ID information. Please provide the following:",
            vec![
                required("**1. Your Steam ID**\n**2. The Steam ID of the player you're reporting**"),
                how(
                    "Please send a message in this ticket with both Steam IDs in any of these formats:",
                    FORMATS_WITH_LEGACY,
                ),
                (
                    "📝 Example",
                    "```My Steam ID: 76561198123456789\nReported player: 76561198987654321```"
                        .to_string(),
                    false,
                ),
            ],
        ),
        (TicketType::Appeal, _) => (
            "Your appeal ticket is missing your Steam ID.",
            vec![
                required("**Your Steam ID** (the banned account)"),
                how(send_one, FORMATS_WITH_LEGACY),
            ],
        ),
        (TicketType::Payment, _) => (
            "Your payment ticket is missing your Steam ID.",
            vec![
                required("**Your Steam ID** (to verify your purchases and inventory)"),
                how(send_one, FORMATS),
            ],
        ),
        (TicketType::General | TicketType::Discord, _) => (
            "This ticket is missing required Steam ID information.",
            vec![required("**Your Steam ID**"), how(send_one, FORMATS)],
        ),
    };

    CreateEmbed::new()
        .colour(WARNING_COLOUR)
        .title("⚠️ Missing Required Information")
        .description(description)
        .fields(fields)
        .timestamp(Timestamp::now())
}
