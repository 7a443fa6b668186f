use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ProjectId = i64;

/// What to do with a domain name that has no `.` separator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum InvalidNamePolicy {
    /// 立即中止整批處理，不提交任何規則
    #[default]
    Abort,
    /// 略過該筆並記錄警告
    Skip,
}

impl std::fmt::Display for InvalidNamePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidNamePolicy::Abort => write!(f, "abort"),
            InvalidNamePolicy::Skip => write!(f, "skip"),
        }
    }
}

/// 一個專案對應一條規則
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub project_id: ProjectId,
    pub regexp: String,
}

/// Per-project postfix frequencies, iterated in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostfixCounts {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl PostfixCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `postfix` with a count of 0 unless it is already present.
    pub fn seed(&mut self, postfix: &str) {
        if !self.counts.contains_key(postfix) {
            self.order.push(postfix.to_string());
            self.counts.insert(postfix.to_string(), 0);
        }
    }

    pub fn increment(&mut self, postfix: &str) {
        match self.counts.get_mut(postfix) {
            Some(count) => *count += 1,
            None => {
                self.order.push(postfix.to_string());
                self.counts.insert(postfix.to_string(), 1);
            }
        }
    }

    pub fn contains(&self, postfix: &str) -> bool {
        self.counts.contains_key(postfix)
    }

    pub fn get(&self, postfix: &str) -> Option<usize> {
        self.counts.get(postfix).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .map(move |postfix| (postfix.as_str(), self.counts[postfix]))
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for PostfixCounts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (postfix, count) in iter {
            let postfix = postfix.into();
            if !map.counts.contains_key(&postfix) {
                map.order.push(postfix.clone());
            }
            map.counts.insert(postfix, count);
        }
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub postfix_counts: PostfixCounts,
    pub exceptions: Vec<String>,
    /// Names dropped under the `skip` invalid-name policy.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rule: Rule,
    pub exceptions: usize,
    pub garbage_postfixes: usize,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    pub rules_staged: usize,
    pub committed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub projects: usize,
    pub rules_staged: usize,
    pub committed: bool,
    pub exceptions: usize,
    pub garbage_postfixes: usize,
    pub skipped_names: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
