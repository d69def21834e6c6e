//! Pseudo-geographic placement of active scammers on the threat map.

use honeyguard_schema::Interaction;

/// A map marker. `x` and `y` are percentages in `[30, 69]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotspot {
    pub client_id: String,
    pub x: u32,
    pub y: u32,
}

impl Hotspot {
    pub fn for_client(client_id: &str) -> Self {
        let hash = client_hash(client_id);
        Self {
            client_id: client_id.to_string(),
            x: 30 + (hash % 40) as u32,
            y: 30 + (hash.wrapping_mul(13) % 40) as u32,
        }
    }
}

/// Sum of the UTF-16 code units of `client_id`.
pub fn client_hash(client_id: &str) -> u64 {
    client_id.encode_utf16().map(u64::from).sum()
}

/// One marker per distinct non-empty client id, in order of first appearance.
pub fn hotspots(interactions: &[Interaction]) -> Vec<Hotspot> {
    let mut seen = std::collections::HashSet::new();
    interactions
        .iter()
        .filter_map(Interaction::client_id)
        .filter(|id| seen.insert(*id))
        .map(Hotspot::for_client)
        .collect()
}
