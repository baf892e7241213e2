//! Static configuration, loaded once at process start from the data
//! directory and passed into components by reference.
//!
//! RULE: Nothing here mutates after load. The FAQ table, intent keyword
//! sets, classifier keyword tables and deadline policy are plain data —
//! changing behavior means editing the JSON files, not the code.

use crate::types::Priority;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// One canned FAQ answer and the keywords that select it.
/// Table order matters: ties in the matcher resolve to the earliest entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub keywords: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FaqFile {
    empty_prompt: String,
    fallback_replies: Vec<String>,
    entries: Vec<FaqEntry>,
}

/// Substring sets driving the complaint-intent path.
/// All checks run against the lowercased raw text, so multi-word phrases
/// like "not resolved" are legal members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentKeywords {
    /// Any of these in the text routes the message to the complaint path.
    pub lookup_triggers: Vec<String>,
    pub recent_terms: Vec<String>,
    pub pending_terms: Vec<String>,
    pub resolved_terms: Vec<String>,
}

/// Everything the bot needs, bundled for injection.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub empty_prompt: String,
    pub fallback_replies: Vec<String>,
    pub faq: Vec<FaqEntry>,
    pub intents: IntentKeywords,
}

/// One department and its trigger keywords.
/// Vec, not map: tie-breaks go to the earliest department in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DepartmentFile {
    departments: Vec<DepartmentKeywords>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityKeywords {
    pub priority: Priority,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PriorityFile {
    priorities: Vec<PriorityKeywords>,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub departments: Vec<DepartmentKeywords>,
    pub priorities: Vec<PriorityKeywords>,
}

/// Resolution windows per priority, in whole hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlinePolicy {
    pub high_hours: i64,
    pub medium_hours: i64,
    pub low_hours: i64,
}

impl DeadlinePolicy {
    pub fn window_for(&self, priority: Priority) -> Duration {
        let hours = match priority {
            Priority::High => self.high_hours,
            Priority::Medium => self.medium_hours,
            Priority::Low => self.low_hours,
        };
        Duration::hours(hours)
    }
}

/// The full immutable configuration for one process.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub bot: BotConfig,
    pub classifier: ClassifierConfig,
    pub deadlines: DeadlinePolicy,
}

impl DeskConfig {
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let faq_path = format!("{data_dir}/bot/faq_entries.json");
        let faq_content = std::fs::read_to_string(&faq_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {faq_path}: {e}"))?;
        let faq_file: FaqFile = serde_json::from_str(&faq_content)?;
        if faq_file.entries.is_empty() {
            anyhow::bail!("{faq_path}: FAQ table is empty");
        }
        if faq_file.fallback_replies.is_empty() {
            anyhow::bail!("{faq_path}: no fallback replies");
        }

        let intent_path = format!("{data_dir}/bot/intent_keywords.json");
        let intent_content = std::fs::read_to_string(&intent_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {intent_path}: {e}"))?;
        let intents: IntentKeywords = serde_json::from_str(&intent_content)?;

        let dept_path = format!("{data_dir}/classifier/department_keywords.json");
        let dept_content = std::fs::read_to_string(&dept_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {dept_path}: {e}"))?;
        let dept_file: DepartmentFile = serde_json::from_str(&dept_content)?;
        if dept_file.departments.is_empty() {
            anyhow::bail!("{dept_path}: no departments");
        }

        let prio_path = format!("{data_dir}/classifier/priority_keywords.json");
        let prio_content = std::fs::read_to_string(&prio_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {prio_path}: {e}"))?;
        let prio_file: PriorityFile = serde_json::from_str(&prio_content)?;
        if prio_file.priorities.is_empty() {
            anyhow::bail!("{prio_path}: no priorities");
        }

        let deadline_path = format!("{data_dir}/lifecycle/deadline_policy.json");
        let deadline_content = std::fs::read_to_string(&deadline_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {deadline_path}: {e}"))?;
        let deadlines: DeadlinePolicy = serde_json::from_str(&deadline_content)?;

        Ok(Self {
            bot: BotConfig {
                empty_prompt: faq_file.empty_prompt,
                fallback_replies: faq_file.fallback_replies,
                faq: faq_file.entries,
                intents,
            },
            classifier: ClassifierConfig {
                departments: dept_file.departments,
                priorities: prio_file.priorities,
            },
            deadlines,
        })
    }
}
