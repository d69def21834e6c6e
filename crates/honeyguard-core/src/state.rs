use chrono::{DateTime, Utc};
use honeyguard_schema::{BusMessage, Interaction, IntelItem, ReportResult, TurnCounts};

use crate::hotspot::{self, Hotspot};

/// Everything the dashboard renders. Poll results replace whole fields; nothing
/// is merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    interactions: Vec<Interaction>,
    turn_counts: TurnCounts,
    intel: Vec<IntelItem>,
    reporting: bool,
    alert: Option<ReportResult>,
    last_stats_at: Option<DateTime<Utc>>,
    last_intel_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single update entry point for everything the background tasks produce.
    pub fn apply(&mut self, msg: BusMessage) {
        match msg {
            BusMessage::StatsRefreshed { stats, at } => {
                if let Some(interactions) = stats.interactions {
                    self.interactions = interactions;
                }
                if let Some(turn_counts) = stats.turn_counts {
                    self.turn_counts = turn_counts;
                }
                self.last_stats_at = Some(at);
            }
            BusMessage::IntelRefreshed { items, at } => {
                self.intel = items;
                self.last_intel_at = Some(at);
            }
            BusMessage::ReportCompleted { result, .. } => {
                if !self.reporting {
                    tracing::debug!("report result arrived with no report pending");
                }
                self.alert = Some(result);
            }
        }
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn turn_counts(&self) -> &TurnCounts {
        &self.turn_counts
    }

    pub fn intel(&self) -> &[IntelItem] {
        &self.intel
    }

    pub fn last_stats_at(&self) -> Option<DateTime<Utc>> {
        self.last_stats_at
    }

    pub fn last_intel_at(&self) -> Option<DateTime<Utc>> {
        self.last_intel_at
    }

    pub fn is_reporting(&self) -> bool {
        self.reporting
    }

    /// Marks a report as in flight. Returns `false`, changing nothing, when
    /// one already is.
    pub fn begin_report(&mut self) -> bool {
        if self.reporting {
            return false;
        }
        self.reporting = true;
        true
    }

    /// The report outcome waiting to be acknowledged, if any.
    pub fn alert(&self) -> Option<&ReportResult> {
        self.alert.as_ref()
    }

    /// Dismisses the report dialog and re-enables the report action.
    pub fn acknowledge_alert(&mut self) -> Option<ReportResult> {
        let alert = self.alert.take();
        if alert.is_some() {
            self.reporting = false;
        }
        alert
    }

    pub fn scammer_count(&self) -> usize {
        self.turn_counts.len()
    }

    pub fn upi_flagged_count(&self) -> usize {
        self.interactions.iter().filter(|i| i.has_upi()).count()
    }

    pub fn hotspots(&self) -> Vec<Hotspot> {
        hotspot::hotspots(&self.interactions)
    }
}
