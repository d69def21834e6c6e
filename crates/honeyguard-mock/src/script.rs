//! Canned scammer scripts and persona lines the mock honeypot plays back.

use honeyguard_schema::SuspicionLevel;

pub const SCRIPTS: &[&[&str]] = &[
    &[
        "Hello madam. I am calling from your bank. Urgent verification needed.",
        "Madam why are you not replying? I need 5000rs immediately to unblock card.",
        "Are you listening? Send money to police@axisb immediately or police will come.",
        "Ok tell me your OTP then. I am waiting.",
        "You are wasting my time. Last warning.",
    ],
    &[
        "Congratulations! You have won KBC lottery of 25 lakh rupees.",
        "To claim prize pay processing fee 4999 to kbc.prize@ybl today only.",
        "Also fill form at https://kbc-lottery-claim.example/form for verification.",
        "Why are you replying so fast? Are you a bot?",
    ],
    &[
        "Dear customer your electricity connection will be cut tonight at 9:30 pm.",
        "Update your bill details at http://power-bill-update.example now.",
        "Deposit pending amount in 50200012345678 IFSC HDFC0001234 to avoid disconnection.",
        "Video call me right now, I need to see you.",
    ],
    &[
        "Hi aunty, this is Rahul from courier office. Your parcel is held at customs.",
        "Customs duty is 2300 only. Pay on customs.clear@okhdfcbank please.",
        "Madam you are not listening. This is final notice.",
    ],
];

const SCAM_MARKERS: &[&str] = &[
    "otp", "pay", "send money", "urgent", "unblock", "lottery", "prize", "fee", "kyc", "deposit",
    "customs", "duty", "bill", "cut tonight", "police",
];

const BOT_PROBES: &[&str] = &["bot", "video call", "replying so fast", "are you real"];

const IMPATIENCE: &[&str] = &[
    "not replying",
    "are you listening",
    "not listening",
    "wasting my time",
    "last warning",
    "final notice",
];

const ENGAGE_REPLIES: &[&str] = &[
    "Haan beta, bolo bolo. Kaunsa bank? Mera toh do do account hai.",
    "Arre itna paisa? Ruko, main apne bete ko phone karti hoon pehle.",
    "Beta yeh UPI kya hota hai? Mujhe thoda dheere dheere samjhao.",
    "Achha achha, form bharna hai? Chashma kahan rakh diya maine...",
];

const DEFUSE_REPLIES: &[&str] = &[
    "Sorry beta, nani aa gayi thi, main sun rahi hoon. Aap bolo.",
    "Maaf karna beta, main chashma dhoond rahi thi. Haan, batao kya karna hai?",
    "Arre nahi beta, main toh yahin hoon, bas doodh ubal raha tha.",
];

const NORMAL_REPLIES: &[&str] = &[
    "Namaste beta, kaun bol raha hai?",
    "Haan ji, sab theek hai. Aap kaise ho?",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub scam_detected: bool,
    pub suspicion_level: SuspicionLevel,
    pub reasoning: String,
}

/// Keyword read of one message, standing in for the orchestrator model.
pub fn assess(message: &str, has_intel: bool) -> Assessment {
    let lower = message.to_lowercase();
    let markers: Vec<&str> = SCAM_MARKERS
        .iter()
        .copied()
        .filter(|m| lower.contains(m))
        .collect();
    let scam_detected = has_intel || !markers.is_empty();

    let (suspicion_level, reasoning) = if BOT_PROBES.iter().any(|p| lower.contains(p)) {
        (
            SuspicionLevel::High,
            "Scammer is probing whether the target is automated; switching to defuse.".to_string(),
        )
    } else if IMPATIENCE.iter().any(|p| lower.contains(p)) {
        (
            SuspicionLevel::Medium,
            "Scammer is getting impatient with delayed replies.".to_string(),
        )
    } else if has_intel {
        (
            SuspicionLevel::Low,
            "Payment or link details shared; scammer is following the script.".to_string(),
        )
    } else if !markers.is_empty() {
        (
            SuspicionLevel::Low,
            format!("Scam pattern detected: {}.", markers.join(", ")),
        )
    } else {
        (SuspicionLevel::Low, String::new())
    };

    Assessment {
        scam_detected,
        suspicion_level,
        reasoning,
    }
}

/// Mrs. Sharma's line for this turn.
pub fn persona_reply(assessment: &Assessment, turn: u64) -> &'static str {
    let pool = match (&assessment.suspicion_level, assessment.scam_detected) {
        (SuspicionLevel::High | SuspicionLevel::Medium, _) => DEFUSE_REPLIES,
        (_, true) => ENGAGE_REPLIES,
        (_, false) => NORMAL_REPLIES,
    };
    pool[turn as usize % pool.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_probe_is_high_suspicion() {
        let a = assess("Why are you replying so fast? Are you a bot?", false);
        assert_eq!(a.suspicion_level, SuspicionLevel::High);
        assert!(DEFUSE_REPLIES.contains(&persona_reply(&a, 0)));
    }

    #[test]
    fn impatience_is_medium() {
        let a = assess("You are wasting my time. Last warning.", false);
        assert_eq!(a.suspicion_level, SuspicionLevel::Medium);
        assert!(!a.scam_detected);
    }

    #[test]
    fn payment_request_is_a_scam() {
        let a = assess("Ok tell me your OTP then.", false);
        assert!(a.scam_detected);
        assert_eq!(a.suspicion_level, SuspicionLevel::Low);
        assert!(a.reasoning.contains("otp"));
        assert!(ENGAGE_REPLIES.contains(&persona_reply(&a, 7)));
    }

    #[test]
    fn extracted_intel_flags_scam() {
        let a = assess("kbc.prize@ybl", true);
        assert!(a.scam_detected);
    }

    #[test]
    fn small_talk_is_normal_traffic() {
        let a = assess("Good morning", false);
        assert!(!a.scam_detected);
        assert!(a.reasoning.is_empty());
        assert!(NORMAL_REPLIES.contains(&persona_reply(&a, 3)));
    }
}
