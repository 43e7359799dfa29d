//! AI-assisted matcher: second pass for required skills the graph could not resolve.
//!
//! Any provider failure, empty completion, or unparseable reply yields `None`.
//! Nothing here retries or returns an error; the aggregator treats `None` as
//! "every remaining required skill is missing".

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::{json_list, JSON_ONLY_SYSTEM};
use crate::llm_client::{CompletionOptions, CompletionProvider};
use crate::matching::models::{MatchType, SkillMatch};
use crate::matching::normalize::normalize_skill;
use crate::matching::prompts::{SKILL_MATCH_PROMPT_TEMPLATE, SKILL_MATCH_SYSTEM};

pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Characters of raw completion echoed into debug logs.
const LOG_PREVIEW_CHARS: usize = 200;

/// A validated AI proposal, restricted to the skills it was asked about.
#[derive(Debug, Clone, PartialEq)]
pub struct AiProposal {
    /// At most one entry per required skill, highest confidence kept.
    pub matches: Vec<SkillMatch>,
    pub missing_skills: Vec<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProposal {
    #[serde(default)]
    matched_skills: Vec<RawMatch>,
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    analysis_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    #[serde(alias = "job_skill")]
    required_skill: String,
    #[serde(alias = "resume_skill")]
    candidate_skill: String,
    #[serde(default)]
    match_type: Option<String>,
    confidence: f64,
    #[serde(default)]
    reasoning: String,
}

/// Delegates unresolved skills to a completion provider.
#[derive(Clone)]
pub struct AiMatcher {
    provider: Arc<dyn CompletionProvider>,
    options: CompletionOptions,
    system: String,
}

impl AiMatcher {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: String) -> Self {
        Self {
            provider,
            options: CompletionOptions {
                model,
                temperature: DEFAULT_TEMPERATURE,
                max_tokens: DEFAULT_MAX_TOKENS,
            },
            system: format!("{SKILL_MATCH_SYSTEM} {JSON_ONLY_SYSTEM}"),
        }
    }

    /// Asks the provider to resolve `remaining` against `candidates`.
    /// Returns `None` without calling out when there is nothing to resolve.
    pub async fn resolve(&self, remaining: &[String], candidates: &[String]) -> Option<AiProposal> {
        if remaining.is_empty() {
            debug!("No unresolved skills, skipping AI pass");
            return None;
        }

        let prompt = build_prompt(remaining, candidates);
        info!("AI pass for {} unresolved skills", remaining.len());

        let text = match self
            .provider
            .complete(&prompt, &self.system, &self.options)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("AI skill matching failed: {e}");
                return None;
            }
        };

        debug!(
            "Raw AI response: {}",
            text.chars().take(LOG_PREVIEW_CHARS).collect::<String>()
        );

        let proposal = parse_proposal(&text, remaining, candidates);
        if proposal.is_none() {
            warn!("AI response contained no usable JSON proposal");
        }
        proposal
    }
}

fn build_prompt(remaining: &[String], candidates: &[String]) -> String {
    SKILL_MATCH_PROMPT_TEMPLATE
        .replace("{job_skills}", &json_list(remaining))
        .replace("{resume_skills}", &json_list(candidates))
}

/// Parses a completion into a proposal scoped to `remaining` and `candidates`.
///
/// Proposed matches naming a required skill outside `remaining`, or a
/// candidate skill not on the resume, are dropped. Surviving entries are
/// rewritten to the caller's original spelling so downstream set logic lines up.
pub fn parse_proposal(text: &str, remaining: &[String], candidates: &[String]) -> Option<AiProposal> {
    let json = extract_json_object(text)?;
    let raw: RawProposal = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("AI proposal did not match the expected schema: {e}");
            return None;
        }
    };

    let required_by_norm = index_by_normalized(remaining);
    let candidate_by_norm = index_by_normalized(candidates);

    let mut matches: Vec<SkillMatch> = Vec::new();
    let mut position_by_required: HashMap<String, usize> = HashMap::new();
    for proposed in raw.matched_skills {
        let Some(required) = required_by_norm.get(&normalize_skill(&proposed.required_skill)) else {
            debug!("Dropping AI match for unknown required skill '{}'", proposed.required_skill);
            continue;
        };
        let Some(candidate) = candidate_by_norm.get(&normalize_skill(&proposed.candidate_skill))
        else {
            debug!("Dropping AI match for unknown resume skill '{}'", proposed.candidate_skill);
            continue;
        };

        let skill_match = SkillMatch {
            required_skill: (*required).clone(),
            candidate_skill: (*candidate).clone(),
            match_type: MatchType::AiProposed,
            confidence: proposed.confidence.clamp(0.0, 1.0),
            reasoning: describe(&proposed),
        };

        match position_by_required.get(&skill_match.required_skill).copied() {
            Some(i) if skill_match.confidence > matches[i].confidence => matches[i] = skill_match,
            Some(_) => {}
            None => {
                position_by_required.insert(skill_match.required_skill.clone(), matches.len());
                matches.push(skill_match);
            }
        }
    }

    let missing_skills = raw
        .missing_skills
        .iter()
        .filter_map(|skill| {
            let original = required_by_norm.get(&normalize_skill(skill));
            if original.is_none() {
                debug!("Dropping AI missing entry for unknown required skill '{skill}'");
            }
            original.map(|original| (*original).clone())
        })
        .collect();

    Some(AiProposal {
        matches,
        missing_skills,
        summary: raw.analysis_summary.filter(|s| !s.trim().is_empty()),
    })
}

fn index_by_normalized(skills: &[String]) -> HashMap<String, &String> {
    let mut index = HashMap::new();
    for skill in skills {
        index.entry(normalize_skill(skill)).or_insert(skill);
    }
    index
}

fn describe(proposed: &RawMatch) -> String {
    let reasoning = proposed.reasoning.trim();
    match proposed.match_type.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() && !reasoning.is_empty() => {
            format!("{reasoning} ({label})")
        }
        Some(label) if !label.is_empty() => format!("AI proposed {label} match"),
        _ if !reasoning.is_empty() => reasoning.to_string(),
        _ => "AI proposed match".to_string(),
    }
}

/// Returns the first balanced `{ ... }` span in `text` that parses as a JSON
/// object. Tolerates code fences and leading or trailing prose.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut start = 0;

    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(close) = matching_brace(bytes, open) {
            let candidate = &text[open..=close];
            if serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(candidate).is_ok()
            {
                return Some(candidate);
            }
        }
        start = open + 1;
    }

    None
}

/// Index of the `}` closing the `{` at `open`, skipping braces inside string literals.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
