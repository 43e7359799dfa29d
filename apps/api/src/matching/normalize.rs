/// Canonical form of a skill label: lower-cased, trimmed, with `-` and `_`
/// replaced by spaces. Total and idempotent.
pub fn normalize_skill(skill: &str) -> String {
    skill
        .trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .trim()
        .to_string()
}
