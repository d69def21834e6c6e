//! Text of feed cards and intel rows, shared by the TUI and plain-text output.

use honeyguard_schema::{Interaction, IntelItem};

pub const EMPTY_FEED: &str = "Waiting for live signals from honeypot...";
pub const EMPTY_INTEL: &str = "No actionable intel extracted yet.";
pub const REPORT_IDLE: &str = "Report to NPCI";
pub const REPORT_BUSY: &str = "Reporting...";

const ID_PREFIX_CHARS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCard {
    pub threat: bool,
    pub badge: &'static str,
    pub timestamp: String,
    pub id: String,
    pub suspicion: String,
    pub orchestrator: String,
    pub target: String,
    pub reply: String,
}

impl FeedCard {
    pub fn from_interaction(interaction: &Interaction) -> Self {
        let reasoning = if interaction.reasoning.is_empty() {
            "Analyzing conversation flow..."
        } else {
            interaction.reasoning.as_str()
        };
        let level = interaction
            .suspicion_level
            .as_ref()
            .map(|l| l.as_str())
            .unwrap_or_default();

        Self {
            threat: interaction.scam_detected,
            badge: if interaction.scam_detected {
                "THREAT DETECTED"
            } else {
                "NORMAL TRAFFIC"
            },
            timestamp: interaction.timestamp.clone(),
            id: format!(
                "ID: {}...",
                prefix(interaction.client_id.as_deref().unwrap_or_default())
            ),
            suspicion: format!("SUSPICION: {level}"),
            orchestrator: format!("ORCHESTRATOR: {reasoning}"),
            target: format!("TARGET: \"{}\"", interaction.message_text()),
            reply: format!("MRS. SHARMA: \"{}\"", interaction.reply),
        }
    }
}

fn prefix(id: &str) -> String {
    id.chars().take(ID_PREFIX_CHARS).collect()
}

/// Abbreviated source of an intel row, or `N/A` when unknown.
pub fn source_label(item: &IntelItem) -> String {
    if item.source.is_empty() {
        "N/A".to_string()
    } else {
        format!("{}...", prefix(&item.source))
    }
}

pub fn report_label(reporting: bool) -> &'static str {
    if reporting {
        REPORT_BUSY
    } else {
        REPORT_IDLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use honeyguard_schema::{IntelKind, MessageBody, SuspicionLevel};

    #[test]
    fn threat_card_text() {
        let interaction = Interaction {
            timestamp: "2026-02-10 10:42:07".into(),
            client_id: Some("9b2f7c1e-1111-2222".into()),
            message: Some(MessageBody::from("Pay now")),
            reply: "Kaun bol raha hai?".into(),
            scam_detected: true,
            suspicion_level: Some(SuspicionLevel::High),
            reasoning: "Urgency plus payment demand".into(),
            ..Interaction::default()
        };
        let card = FeedCard::from_interaction(&interaction);
        assert!(card.threat);
        assert_eq!(card.badge, "THREAT DETECTED");
        assert_eq!(card.id, "ID: 9b2f7c1e...");
        assert_eq!(card.suspicion, "SUSPICION: HIGH");
        assert_eq!(card.orchestrator, "ORCHESTRATOR: Urgency plus payment demand");
        assert_eq!(card.target, "TARGET: \"Pay now\"");
        assert_eq!(card.reply, "MRS. SHARMA: \"Kaun bol raha hai?\"");
    }

    #[test]
    fn sparse_interaction_uses_placeholders() {
        let card = FeedCard::from_interaction(&Interaction::default());
        assert_eq!(card.badge, "NORMAL TRAFFIC");
        assert_eq!(card.id, "ID: ...");
        assert_eq!(card.suspicion, "SUSPICION: ");
        assert_eq!(card.orchestrator, "ORCHESTRATOR: Analyzing conversation flow...");
        assert_eq!(card.target, "TARGET: \"\"");
    }

    #[test]
    fn source_is_truncated_or_na() {
        let mut item = IntelItem {
            kind: IntelKind::Upi,
            value: "abc@upi".into(),
            source: "abcdefghijkl".into(),
        };
        assert_eq!(source_label(&item), "abcdefgh...");
        item.source = "abc".into();
        assert_eq!(source_label(&item), "abc...");
        item.source.clear();
        assert_eq!(source_label(&item), "N/A");
    }

    #[test]
    fn report_label_tracks_flag() {
        assert_eq!(report_label(false), "Report to NPCI");
        assert_eq!(report_label(true), "Reporting...");
    }
}
