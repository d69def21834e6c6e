use std::collections::{HashSet, VecDeque};

use honeyguard_schema::{
    Interaction, IntelItem, IntelKind, MessageBody, ReportResult, StatsResponse, TurnCounts,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::extract::extract;
use crate::script::{self, SCRIPTS};

/// Newest-first log size kept by the mock.
pub const MAX_INTERACTIONS: usize = 100;

/// Concurrent scripted scammers the ticker keeps alive.
const ACTIVE_CONVERSATIONS: usize = 3;

#[derive(Debug, Clone)]
struct Conversation {
    client_id: String,
    script: usize,
    next_line: usize,
}

/// In-memory stand-in for the honeypot backend.
pub struct Honeypot {
    interactions: VecDeque<Interaction>,
    turn_counts: TurnCounts,
    conversations: Vec<Conversation>,
    cursor: usize,
    rng: StdRng,
}

impl Honeypot {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut honeypot = Self {
            interactions: VecDeque::new(),
            turn_counts: TurnCounts::new(),
            conversations: Vec::new(),
            cursor: 0,
            rng,
        };
        for _ in 0..ACTIVE_CONVERSATIONS {
            let conversation = honeypot.new_conversation();
            honeypot.conversations.push(conversation);
        }
        honeypot
    }

    fn new_conversation(&mut self) -> Conversation {
        Conversation {
            client_id: uuid::Uuid::new_v4().to_string(),
            script: self.rng.gen_range(0..SCRIPTS.len()),
            next_line: 0,
        }
    }

    /// Plays the next scripted line of one conversation, round-robin. A
    /// finished conversation is replaced by a fresh scammer.
    pub fn tick(&mut self) -> Interaction {
        let idx = self.cursor % self.conversations.len();
        self.cursor = self.cursor.wrapping_add(1);

        let (client_id, line) = {
            let conversation = &mut self.conversations[idx];
            let lines = SCRIPTS[conversation.script];
            let line = lines[conversation.next_line];
            conversation.next_line += 1;
            (conversation.client_id.clone(), line)
        };
        if self.conversations[idx].next_line >= SCRIPTS[self.conversations[idx].script].len() {
            self.conversations[idx] = self.new_conversation();
        }

        self.ingest(&client_id, MessageBody::Text(line.to_string()))
    }

    /// Records one scammer message and the persona's answer.
    pub fn ingest(&mut self, client_id: &str, message: MessageBody) -> Interaction {
        let text = message.text();
        let intel = extract(&text);
        let assessment = script::assess(&text, !intel.is_empty());

        let turns = self.turn_counts.entry(client_id.to_string()).or_insert(0);
        *turns += 1;
        let turns_count = *turns;

        let reply = script::persona_reply(&assessment, turns_count.saturating_sub(1));
        let interaction = Interaction {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            client_id: Some(client_id.to_string()),
            message: Some(message),
            reply: reply.to_string(),
            extracted_intelligence: Some(intel),
            scam_detected: assessment.scam_detected,
            suspicion_level: Some(assessment.suspicion_level),
            reasoning: assessment.reasoning,
            turns_count,
        };

        tracing::debug!(
            client_id,
            turns_count,
            scam = interaction.scam_detected,
            "honeypot interaction recorded"
        );
        self.interactions.push_front(interaction.clone());
        if self.interactions.len() > MAX_INTERACTIONS {
            self.interactions.truncate(MAX_INTERACTIONS);
            self.prune_turn_counts();
        }
        interaction
    }

    /// Drops counts for clients that left the bounded log and are not mid-script.
    fn prune_turn_counts(&mut self) {
        let live: HashSet<&str> = self
            .interactions
            .iter()
            .filter_map(Interaction::client_id)
            .chain(self.conversations.iter().map(|c| c.client_id.as_str()))
            .collect();
        self.turn_counts.retain(|client_id, _| live.contains(client_id.as_str()));
    }

    pub fn stats(&self) -> StatsResponse {
        StatsResponse {
            interactions: Some(self.interactions.iter().cloned().collect()),
            turn_counts: Some(self.turn_counts.clone()),
        }
    }

    /// Classified intel from the interaction log, unique by (type, value),
    /// oldest first.
    pub fn intel(&self) -> Vec<IntelItem> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for interaction in self.interactions.iter().rev() {
            let Some(intel) = &interaction.extracted_intelligence else {
                continue;
            };
            let source = interaction.client_id.clone().unwrap_or_default();
            let found = intel
                .upi_id
                .iter()
                .map(|v| (IntelKind::Upi, v))
                .chain(intel.bank_details.iter().map(|v| (IntelKind::Bank, v)))
                .chain(intel.phishing_links.iter().map(|v| (IntelKind::Link, v)));
            for (kind, value) in found {
                if seen.insert((kind.clone(), value.clone())) {
                    items.push(IntelItem {
                        kind,
                        value: value.clone(),
                        source: source.clone(),
                    });
                }
            }
        }
        items
    }

    pub fn report(&self) -> ReportResult {
        let upi_count = self
            .intel()
            .iter()
            .filter(|item| item.kind == IntelKind::Upi)
            .count();
        tracing::info!(upi_count, "mock report to NPCI");
        ReportResult {
            status: "success".to_string(),
            message: format!("Reported {upi_count} UPI IDs to NPCI."),
        }
    }

    /// Answer shape of the honeypot's ingest endpoint.
    pub fn ingest_response(interaction: &Interaction) -> serde_json::Value {
        json!({
            "reply_to_scammer": interaction.reply,
            "scam_detected": interaction.scam_detected,
            "suspicion_level": interaction.suspicion_level,
            "extracted_intelligence": interaction.extracted_intelligence,
            "engagement_metrics": { "turns_count": interaction.turns_count },
        })
    }
}

impl Default for Honeypot {
    fn default() -> Self {
        Self::new()
    }
}
