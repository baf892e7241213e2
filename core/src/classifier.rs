//! Department/priority classification.
//!
//! The lifecycle only depends on the Classifier trait; classification is
//! best-effort and its failures never fail a submission. The keyword
//! scorer below is the stock implementation: count keyword hits per
//! department and per priority over the cleaned description, highest
//! count wins, earliest table entry wins ties (including all-zero).

use crate::config::ClassifierConfig;
use crate::types::Priority;

#[derive(Debug, Clone)]
pub struct Classification {
    pub department: String,
    pub priority: Priority,
    pub department_confidence: u32,
    pub priority_confidence: u32,
}

pub trait Classifier: Send {
    fn classify(&self, description: &str) -> anyhow::Result<Classification>;
}

/// Config-driven keyword scorer.
pub struct KeywordClassifier {
    config: ClassifierConfig,
}

impl KeywordClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }
}

/// Lowercase, letters only, collapsed single spaces.
fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() {
            out.push(ch);
        } else {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn keyword_score(text: &str, keywords: &[String]) -> u32 {
    keywords.iter().filter(|k| text.contains(k.as_str())).count() as u32
}

/// Highest score wins; strict `>` keeps the first-seen entry on ties.
fn best_scoring<'a, T>(items: &'a [T], score_of: impl Fn(&T) -> u32) -> Option<(&'a T, u32)> {
    let mut iter = items.iter();
    let first = iter.next()?;
    let mut best = (first, score_of(first));
    for item in iter {
        let score = score_of(item);
        if score > best.1 {
            best = (item, score);
        }
    }
    Some(best)
}

impl Classifier for KeywordClassifier {
    fn classify(&self, description: &str) -> anyhow::Result<Classification> {
        let text = clean(description);

        let (dept, dept_score) =
            best_scoring(&self.config.departments, |d| keyword_score(&text, &d.keywords))
                .ok_or_else(|| anyhow::anyhow!("no departments configured"))?;
        let (prio, prio_score) =
            best_scoring(&self.config.priorities, |p| keyword_score(&text, &p.keywords))
                .ok_or_else(|| anyhow::anyhow!("no priorities configured"))?;

        Ok(Classification {
            department: dept.name.clone(),
            priority: prio.priority,
            department_confidence: dept_score * 20,
            priority_confidence: prio_score * 25,
        })
    }
}
