use crate::domain::model::{Classification, InvalidNamePolicy, PostfixCounts};
use crate::utils::error::{EtlError, Result};

/// Returns everything after the first `.` of `name`.
///
/// This doubles as the only structural check on stored names: a bare label
/// is rejected with [`EtlError::InvalidName`].
pub fn postfix(name: &str) -> Result<&str> {
    match name.find('.') {
        Some(pos) => Ok(&name[pos + 1..]),
        None => Err(EtlError::InvalidName {
            name: name.to_string(),
        }),
    }
}

/// Splits one project's names into postfix frequencies and exceptions.
///
/// Pass 1 seeds every postfix with 0: if `sub.x.com` exists then `x.com` is
/// considered real. Pass 2 records names that are themselves seeded postfixes
/// as exceptions and counts the postfix of every other name.
pub fn classify(names: &[String], policy: InvalidNamePolicy) -> Result<Classification> {
    let mut skipped = Vec::new();
    let valid: Vec<&str> = match policy {
        InvalidNamePolicy::Abort => names.iter().map(String::as_str).collect(),
        InvalidNamePolicy::Skip => names
            .iter()
            .filter_map(|name| {
                if postfix(name).is_ok() {
                    Some(name.as_str())
                } else {
                    tracing::warn!("⚠️ Skipping malformed domain name: {}", name);
                    skipped.push(name.clone());
                    None
                }
            })
            .collect(),
    };

    let mut postfix_counts = PostfixCounts::new();
    for name in &valid {
        postfix_counts.seed(postfix(name)?);
    }

    let mut exceptions = Vec::new();
    for name in &valid {
        if postfix_counts.contains(name) {
            exceptions.push(name.to_string());
        } else {
            postfix_counts.increment(postfix(name)?);
        }
    }

    Ok(Classification {
        postfix_counts,
        exceptions,
        skipped,
    })
}
