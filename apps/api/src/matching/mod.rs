// Skill matching engine.
// Flow: rules::match_all (graph-backed first pass) → ai::AiMatcher::resolve
//       (completion-provider second pass for leftovers) → aggregate::aggregate.
// All completion calls go through the injected CompletionProvider.

pub mod aggregate;
pub mod ai;
pub mod ecosystem;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod rules;

use std::sync::Arc;

use tracing::info;

use crate::llm_client::CompletionProvider;
use crate::matching::aggregate::aggregate;
use crate::matching::ai::AiMatcher;
use crate::matching::models::{AnalysisResult, SkillMatch};

/// Entry point for skill analysis. Holds no per-request state, so one
/// instance is shared across every concurrent request.
#[derive(Clone)]
pub struct SkillMatcher {
    ai: AiMatcher,
}

impl SkillMatcher {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: String) -> Self {
        Self {
            ai: AiMatcher::new(provider, model),
        }
    }

    /// Rule-based pass, then one AI call for whatever the rules left unresolved.
    pub async fn analyze(
        &self,
        required_skills: &[String],
        candidate_skills: &[String],
    ) -> AnalysisResult {
        info!(
            "Comprehensive skill analysis: {} required, {} candidate",
            required_skills.len(),
            candidate_skills.len()
        );

        let rule_matches = rules::match_all(required_skills, candidate_skills);
        let remaining = unresolved(required_skills, &rule_matches);
        let ai = self.ai.resolve(&remaining, candidate_skills).await;

        let result = aggregate(rule_matches, ai, required_skills, candidate_skills);
        log_result(&result);
        result
    }

    /// Graph-backed matching only. Never calls the completion provider.
    pub fn analyze_rule_based(
        &self,
        required_skills: &[String],
        candidate_skills: &[String],
    ) -> AnalysisResult {
        let rule_matches = rules::match_all(required_skills, candidate_skills);
        let result = aggregate(rule_matches, None, required_skills, candidate_skills);
        log_result(&result);
        result
    }

    /// Sends every required skill to the AI pass, skipping the rules.
    pub async fn analyze_ai_only(
        &self,
        required_skills: &[String],
        candidate_skills: &[String],
    ) -> AnalysisResult {
        let ai = self.ai.resolve(required_skills, candidate_skills).await;
        let result = aggregate(Vec::new(), ai, required_skills, candidate_skills);
        log_result(&result);
        result
    }
}

fn unresolved(required_skills: &[String], matches: &[SkillMatch]) -> Vec<String> {
    required_skills
        .iter()
        .filter(|skill| !matches.iter().any(|m| &m.required_skill == *skill))
        .cloned()
        .collect()
}

fn log_result(result: &AnalysisResult) {
    info!(
        "Skill analysis complete: {:.1}% ({:?}) via {:?}, {} matched, {} missing",
        result.match_percentage,
        result.match_level,
        result.analysis_method,
        result.matched_skills.len(),
        result.missing_skills.len()
    );
}
