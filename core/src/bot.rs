//! FAQ bot — keyword-overlap canned answers plus the complaint-status path.
//!
//! The matcher is deliberately crude: a bag-of-words overlap score with
//! bidirectional substring containment. The tie-break (first entry with the
//! strictly highest score) is observable behavior — do not "improve" it.

use crate::{
    config::BotConfig,
    lifecycle::{ComplaintLifecycle, ComplaintView},
    rng::ReplyRng,
    types::ComplaintStatus,
};

pub const LOGIN_REQUIRED: &str =
    "I need to know who you are to check your complaints. Please log in first.";
pub const DATA_UNAVAILABLE: &str =
    "Sorry, I'm having trouble accessing your complaint data right now. Please try again later.";
pub const NO_COMPLAINTS_YET: &str =
    "You haven't submitted any complaints yet. Use the form to submit your first complaint!";
pub const NO_PENDING: &str =
    "Great news! You have no pending complaints. All your issues have been resolved.";
pub const NO_RESOLVED: &str =
    "You haven't had any complaints resolved yet. Your submitted complaints are still being processed.";
pub const NO_MATCH: &str = "I couldn't find any complaints matching your request.";

const RECENT_LIMIT: usize = 3;
const DESCRIPTION_PREVIEW_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Pending,
    Resolved,
    Recent,
    All,
}

pub struct FaqBot {
    config: BotConfig,
}

impl FaqBot {
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }

    /// Map free text to the best canned answer, or a fallback reply drawn
    /// from the injected RNG stream when nothing scores.
    pub fn match_faq(&self, message: &str, rng: &mut ReplyRng) -> String {
        if message.trim().is_empty() {
            return self.config.empty_prompt.clone();
        }

        let words = tokenize(message);

        let mut best_match = None;
        let mut best_score = 0u32;
        for entry in &self.config.faq {
            let mut score = 0u32;
            for keyword in &entry.keywords {
                for word in &words {
                    // Bidirectional containment, not exact match.
                    if word.contains(keyword.as_str()) || keyword.contains(word.as_str()) {
                        score += 1;
                    }
                }
            }
            if score > best_score {
                best_score = score;
                best_match = Some(entry);
            }
        }

        match best_match {
            Some(entry) if best_score >= 1 => entry.answer.clone(),
            _ => rng.pick(&self.config.fallback_replies).clone(),
        }
    }

    /// True when the text mentions any of the complaint-lookup triggers.
    /// The surrounding layer uses this to route to complaint_status_reply.
    pub fn wants_complaint_lookup(&self, message: &str) -> bool {
        let text = message.to_lowercase();
        self.config
            .intents
            .lookup_triggers
            .iter()
            .any(|t| text.contains(t.as_str()))
    }

    /// Summarize the user's own complaints, filtered by the asked intent.
    /// Soft-fails into guidance replies: a missing user id or a storage
    /// error never surfaces as an error to the chat surface.
    pub fn complaint_status_reply(
        &self,
        user_id: Option<&str>,
        message: &str,
        lifecycle: &ComplaintLifecycle,
    ) -> String {
        let Some(user_id) = user_id.filter(|u| !u.trim().is_empty()) else {
            return LOGIN_REQUIRED.to_string();
        };

        let complaints = match lifecycle.for_user(user_id) {
            Ok(list) => list,
            Err(e) => {
                log::error!("Complaint lookup failed for {user_id}: {e}");
                return DATA_UNAVAILABLE.to_string();
            }
        };
        if complaints.is_empty() {
            return NO_COMPLAINTS_YET.to_string();
        }

        let text = message.to_lowercase();
        let contains_any =
            |terms: &[String]| terms.iter().any(|t| text.contains(t.as_str()));

        // Intent precedence: pending > resolved > recent > all.
        // Exactly one branch's filter applies.
        let intent = if contains_any(&self.config.intents.pending_terms) {
            Intent::Pending
        } else if contains_any(&self.config.intents.resolved_terms) {
            Intent::Resolved
        } else if contains_any(&self.config.intents.recent_terms) {
            Intent::Recent
        } else {
            Intent::All
        };

        let total = complaints.len();
        let filtered: Vec<&ComplaintView> = match intent {
            Intent::Pending => complaints
                .iter()
                .filter(|c| c.record.status != ComplaintStatus::Resolved)
                .collect(),
            Intent::Resolved => complaints
                .iter()
                .filter(|c| c.record.status == ComplaintStatus::Resolved)
                .collect(),
            Intent::Recent => complaints.iter().take(RECENT_LIMIT).collect(),
            Intent::All => complaints.iter().collect(),
        };

        if filtered.is_empty() {
            return match intent {
                Intent::Pending => NO_PENDING.to_string(),
                Intent::Resolved => NO_RESOLVED.to_string(),
                _ => NO_MATCH.to_string(),
            };
        }

        let mut reply = match intent {
            Intent::Recent => "Here are your recent complaints:\n\n".to_string(),
            Intent::Pending => format!(
                "You have {} pending complaint{}:\n\n",
                filtered.len(),
                plural(filtered.len())
            ),
            Intent::Resolved => format!(
                "You have {} resolved complaint{}:\n\n",
                filtered.len(),
                plural(filtered.len())
            ),
            Intent::All => {
                format!("You have {} complaint{} in total:\n\n", total, plural(total))
            }
        };

        for (index, c) in filtered.iter().enumerate() {
            reply.push_str(&format!(
                "{}. {}\n   Status: {}\n   Priority: {}\n   Submitted: {} ago\n   Location: {}\n\n",
                index + 1,
                preview(&c.record.description),
                c.record.status.display(),
                c.display_priority,
                c.time_passed,
                c.record.address,
            ));
        }

        if filtered
            .iter()
            .any(|c| c.record.status == ComplaintStatus::UnderAction)
        {
            reply.push_str(
                "Complaints marked as 'Under Action' are being actively worked on by our team.\n",
            );
        }
        if filtered
            .iter()
            .any(|c| c.record.status == ComplaintStatus::New)
        {
            reply.push_str("New complaints are awaiting classification (usually takes a minute).\n");
        }
        reply.push_str("\nYou can also check the 'My Past Complaints' section for more details.");
        reply
    }
}

/// Lowercase, strip everything outside [a-z0-9 whitespace], split, and
/// drop tokens of length <= 2.
fn tokenize(message: &str) -> Vec<String> {
    let lowered = message.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    stripped
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .map(str::to_string)
        .collect()
}

/// First 40 chars of the description, with an ellipsis when truncated.
fn preview(description: &str) -> String {
    let mut out: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    if description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
