use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use honeyguard_client::ApiClient;
use honeyguard_core::DashboardState;
use honeyguard_schema::{BusMessage, IntelItem, StatsResponse};
use honeyguard_tui::cards::{self, FeedCard, EMPTY_FEED, EMPTY_INTEL};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Metrics {
    pub scammers_engaged: usize,
    pub upi_ids_flagged: usize,
}

/// One poll of both endpoints.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub stats: StatsResponse,
    pub intel: Vec<IntelItem>,
    pub metrics: Metrics,
}

impl Snapshot {
    pub async fn take(client: &ApiClient) -> Self {
        let (stats, intel) = tokio::join!(client.fetch_dashboard_data(), client.fetch_intel());
        Self::from_parts(stats, intel, Utc::now())
    }

    pub fn from_parts(stats: StatsResponse, intel: Vec<IntelItem>, taken_at: DateTime<Utc>) -> Self {
        let mut state = DashboardState::new();
        state.apply(BusMessage::StatsRefreshed {
            stats: stats.clone(),
            at: taken_at,
        });
        let metrics = Metrics {
            scammers_engaged: state.scammer_count(),
            upi_ids_flagged: state.upi_flagged_count(),
        };
        Self {
            taken_at,
            stats,
            intel,
            metrics,
        }
    }

    pub fn render_text(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "Scammers Engaged  {}", self.metrics.scammers_engaged)?;
        writeln!(out, "UPI IDs Flagged   {}", self.metrics.upi_ids_flagged)?;
        writeln!(out)?;

        writeln!(out, "== Agent Intelligence Feed ==")?;
        let interactions = self.stats.interactions.as_deref().unwrap_or_default();
        if interactions.is_empty() {
            writeln!(out, "{EMPTY_FEED}")?;
        }
        for interaction in interactions {
            let card = FeedCard::from_interaction(interaction);
            writeln!(
                out,
                "[{}] {}  {}  {}",
                card.badge, card.timestamp, card.id, card.suspicion
            )?;
            writeln!(out, "  {}", card.orchestrator)?;
            writeln!(out, "  {}", card.target)?;
            writeln!(out, "  {}", card.reply)?;
        }
        writeln!(out)?;

        writeln!(out, "== Intel Database ==")?;
        if self.intel.is_empty() {
            writeln!(out, "{EMPTY_INTEL}")?;
            return Ok(out);
        }
        let value_width = self
            .intel
            .iter()
            .map(|i| i.value.chars().count())
            .max()
            .unwrap_or(0)
            .max("VALUE".len());
        writeln!(out, "{:<6} {:<value_width$} SOURCE", "TYPE", "VALUE")?;
        for item in &self.intel {
            writeln!(
                out,
                "{:<6} {:<value_width$} {}",
                item.kind.as_str(),
                item.value,
                cards::source_label(item)
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use honeyguard_schema::{ExtractedIntelligence, Interaction, IntelKind, SuspicionLevel};

    #[test]
    fn empty_snapshot_shows_placeholders() {
        let snapshot = Snapshot::from_parts(StatsResponse::empty(), vec![], Utc::now());
        let text = snapshot.render_text().unwrap();
        assert!(text.contains("Scammers Engaged  0"));
        assert!(text.contains("UPI IDs Flagged   0"));
        assert!(text.contains("Waiting for live signals from honeypot..."));
        assert!(text.contains("No actionable intel extracted yet."));
    }

    #[test]
    fn populated_snapshot_lists_cards_and_intel() {
        let stats = StatsResponse {
            interactions: Some(vec![Interaction {
                client_id: Some("9b2f7c1e-1111".into()),
                scam_detected: true,
                suspicion_level: Some(SuspicionLevel::High),
                extracted_intelligence: Some(ExtractedIntelligence {
                    upi_id: Some("abc@upi".into()),
                    ..ExtractedIntelligence::default()
                }),
                ..Interaction::default()
            }]),
            turn_counts: Some([("9b2f7c1e-1111".to_string(), 4)].into_iter().collect()),
        };
        let intel = vec![IntelItem {
            kind: IntelKind::Upi,
            value: "abc@upi".into(),
            source: "9b2f7c1e-1111".into(),
        }];
        let snapshot = Snapshot::from_parts(stats, intel, Utc::now());
        let text = snapshot.render_text().unwrap();

        assert!(text.contains("Scammers Engaged  1"));
        assert!(text.contains("UPI IDs Flagged   1"));
        assert!(text.contains("[THREAT DETECTED]"));
        assert!(text.contains("SUSPICION: HIGH"));
        assert!(text.contains("UPI    abc@upi 9b2f7c1e..."));
    }

    #[test]
    fn json_carries_metrics() {
        let snapshot = Snapshot::from_parts(StatsResponse::empty(), vec![], Utc::now());
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["metrics"]["scammers_engaged"], 0);
        assert_eq!(value["stats"]["interactions"], serde_json::json!([]));
        assert_eq!(value["intel"], serde_json::json!([]));
    }
}
