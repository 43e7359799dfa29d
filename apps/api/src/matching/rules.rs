//! Rule-based matcher: deterministic first pass over the ecosystem graph.
//!
//! Per candidate skill, the first rule that fires wins:
//! 1. exact (normalized forms equal)          → 1.0
//! 2. candidate's ecosystem lists required    → 0.9
//! 3. required's ecosystem lists candidate    → 0.85
//! 4. substring either way, above the length floor → 0.7 / 0.6
//!
//! Every candidate is scanned; `best_match` keeps the highest confidence,
//! first-encountered on ties.

use tracing::debug;

use crate::matching::ecosystem::implies;
use crate::matching::models::{MatchType, SkillMatch};
use crate::matching::normalize::normalize_skill;

const EXACT_CONFIDENCE: f64 = 1.0;
const FORWARD_ECOSYSTEM_CONFIDENCE: f64 = 0.9;
const REVERSE_ECOSYSTEM_CONFIDENCE: f64 = 0.85;
const LONG_PARTIAL_CONFIDENCE: f64 = 0.7;
const SHORT_PARTIAL_CONFIDENCE: f64 = 0.6;

/// Substring matches need required > 3 chars and candidate > 2 chars, so
/// "C" never matches inside "Cloud Platforms".
const MIN_PARTIAL_REQUIRED_LEN: usize = 3;
const MIN_PARTIAL_CANDIDATE_LEN: usize = 2;
/// Required skills longer than this earn the higher partial confidence.
const LONG_PARTIAL_REQUIRED_LEN: usize = 5;

/// Every candidate skill that supports `required_skill`, one entry per candidate at most.
pub fn find_matches(required_skill: &str, candidate_skills: &[String]) -> Vec<SkillMatch> {
    let required = normalize_skill(required_skill);

    candidate_skills
        .iter()
        .filter_map(|candidate_skill| match_candidate(required_skill, &required, candidate_skill))
        .collect()
}

/// The single strongest supporting candidate for `required_skill`, if any.
pub fn best_match(required_skill: &str, candidate_skills: &[String]) -> Option<SkillMatch> {
    let mut best: Option<SkillMatch> = None;

    for skill_match in find_matches(required_skill, candidate_skills) {
        let better = best
            .as_ref()
            .map_or(true, |current| skill_match.confidence > current.confidence);
        if better {
            best = Some(skill_match);
        }
    }

    best
}

/// Runs `best_match` for every required skill, in order. Unmatched skills are skipped.
pub fn match_all(required_skills: &[String], candidate_skills: &[String]) -> Vec<SkillMatch> {
    let matches: Vec<SkillMatch> = required_skills
        .iter()
        .filter_map(|required| best_match(required, candidate_skills))
        .collect();

    debug!(
        "Rule-based pass resolved {}/{} required skills",
        matches.len(),
        required_skills.len()
    );

    matches
}

fn match_candidate(
    required_skill: &str,
    required: &str,
    candidate_skill: &str,
) -> Option<SkillMatch> {
    let candidate = normalize_skill(candidate_skill);

    let (match_type, confidence, reasoning) = if required == candidate {
        (
            MatchType::Exact,
            EXACT_CONFIDENCE,
            "Exact skill match".to_string(),
        )
    } else if implies(&candidate, required) {
        (
            MatchType::Ecosystem,
            FORWARD_ECOSYSTEM_CONFIDENCE,
            format!("{candidate_skill} ecosystem includes {required_skill}"),
        )
    } else if implies(required, &candidate) {
        (
            MatchType::Ecosystem,
            REVERSE_ECOSYSTEM_CONFIDENCE,
            format!("{required_skill} is part of {candidate_skill} ecosystem"),
        )
    } else if let Some(confidence) = partial_confidence(required, &candidate) {
        (
            MatchType::Partial,
            confidence,
            format!("Partial match between {required_skill} and {candidate_skill}"),
        )
    } else {
        return None;
    };

    Some(SkillMatch {
        required_skill: required_skill.to_string(),
        candidate_skill: candidate_skill.to_string(),
        match_type,
        confidence,
        reasoning,
    })
}

fn partial_confidence(required: &str, candidate: &str) -> Option<f64> {
    let required_len = required.chars().count();
    let candidate_len = candidate.chars().count();

    if required_len <= MIN_PARTIAL_REQUIRED_LEN || candidate_len <= MIN_PARTIAL_CANDIDATE_LEN {
        return None;
    }

    if !(candidate.contains(required) || required.contains(candidate)) {
        return None;
    }

    if required_len > LONG_PARTIAL_REQUIRED_LEN {
        Some(LONG_PARTIAL_CONFIDENCE)
    } else {
        Some(SHORT_PARTIAL_CONFIDENCE)
    }
}
