use crate::domain::model::PostfixCounts;

/// Default threshold above which a postfix count marks its names as garbage.
pub const DEFAULT_TOO_MANY: usize = 50;

/// Character class of one domain label. No internationalized names expected.
pub const DOMAIN_NAME_CHARS: &str = r"[a-zA-Z0-9\-]";

/// Escapes literal dots only; domain labels carry no other regex metacharacters.
pub fn escape_dots(value: &str) -> String {
    value.replace('.', r"\.")
}

/// Builds the garbage pattern for one project.
///
/// Every postfix counted strictly more than `too_many` times becomes a
/// `label.postfix` alternative; every exception becomes a leading
/// `(?!^name$)` lookahead. Both inputs empty yields an empty string.
pub fn assemble_regex(postfix_counts: &PostfixCounts, exceptions: &[String], too_many: usize) -> String {
    let garbage: Vec<String> = postfix_counts
        .iter()
        .filter(|(_, count)| *count > too_many)
        .map(|(postfix, _)| format!(r"{}+\.{}", DOMAIN_NAME_CHARS, escape_dots(postfix)))
        .collect();

    let mut result = String::new();
    for name in exceptions {
        result.push_str(&format!("(?!^{}$)", escape_dots(name)));
    }

    result + &garbage.join("|")
}
