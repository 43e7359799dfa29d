//! Aggregator: merges rule-based and AI matches into one `AnalysisResult`.

use std::collections::HashSet;

use crate::matching::ai::AiProposal;
use crate::matching::models::{AnalysisMethod, AnalysisResult, MatchLevel, SkillMatch};

/// Upper bound on `bonus_skills` in a report.
pub const MAX_BONUS_SKILLS: usize = 10;

/// Builds the final report.
///
/// Rule matches always win over AI matches for the same required skill.
/// `missing_skills` only ever holds required skills with no surviving match.
/// When the AI answered, the skills it flagged come first.
pub fn aggregate(
    rule_matches: Vec<SkillMatch>,
    ai: Option<AiProposal>,
    required_skills: &[String],
    candidate_skills: &[String],
) -> AnalysisResult {
    let required_set: HashSet<&str> = required_skills.iter().map(String::as_str).collect();
    let mut resolved: HashSet<String> = HashSet::new();
    let mut matched_skills: Vec<SkillMatch> = Vec::new();

    let mut rule_count = 0;
    for skill_match in rule_matches {
        if resolved.insert(skill_match.required_skill.clone()) {
            matched_skills.push(skill_match);
            rule_count += 1;
        }
    }

    let mut ai_count = 0;
    let ai_ran = ai.is_some();
    let (missing_skills, ai_summary) = match ai {
        Some(proposal) => {
            for skill_match in proposal.matches {
                if required_set.contains(skill_match.required_skill.as_str())
                    && resolved.insert(skill_match.required_skill.clone())
                {
                    matched_skills.push(skill_match);
                    ai_count += 1;
                }
            }
            // The model's ordering leads; unresolved skills it omitted follow.
            let mut missing: Vec<String> = Vec::new();
            for skill in proposal.missing_skills.iter().chain(required_skills) {
                if required_set.contains(skill.as_str())
                    && !resolved.contains(skill)
                    && !missing.contains(skill)
                {
                    missing.push(skill.clone());
                }
            }
            (missing, proposal.summary)
        }
        None => {
            let missing = required_skills
                .iter()
                .filter(|skill| !resolved.contains(*skill))
                .cloned()
                .collect();
            (missing, None)
        }
    };

    let used_candidates: HashSet<&str> = matched_skills
        .iter()
        .map(|m| m.candidate_skill.as_str())
        .collect();
    let bonus_skills: Vec<String> = candidate_skills
        .iter()
        .filter(|skill| !used_candidates.contains(skill.as_str()))
        .take(MAX_BONUS_SKILLS)
        .cloned()
        .collect();

    let total = required_skills.len();
    let matched_count = required_skills
        .iter()
        .filter(|skill| resolved.contains(*skill))
        .count();
    let match_percentage = if total == 0 {
        0.0
    } else {
        matched_count as f64 / total as f64 * 100.0
    };

    let confidence_score = if matched_skills.is_empty() {
        0.0
    } else {
        matched_skills.iter().map(|m| m.confidence).sum::<f64>() / matched_skills.len() as f64
    };

    let analysis_method = if rule_count > 0 && ai_count > 0 {
        AnalysisMethod::Hybrid
    } else if ai_ran && rule_count == 0 {
        AnalysisMethod::AiOnly
    } else {
        AnalysisMethod::RuleBased
    };

    let analysis_summary = ai_summary
        .unwrap_or_else(|| format!("Matched {matched_count}/{total} required skills"));

    AnalysisResult {
        match_percentage: round_to(match_percentage, 1),
        match_level: MatchLevel::from_percentage(match_percentage),
        analysis_method,
        confidence_score: round_to(confidence_score, 2),
        matched_skills,
        missing_skills,
        bonus_skills,
        analysis_summary,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::models::MatchType;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn skill_match(
        required: &str,
        candidate: &str,
        match_type: MatchType,
        confidence: f64,
    ) -> SkillMatch {
        SkillMatch {
            required_skill: required.to_string(),
            candidate_skill: candidate.to_string(),
            match_type,
            confidence,
            reasoning: "test".to_string(),
        }
    }

    fn proposal(matches: Vec<SkillMatch>, missing: &[&str], summary: Option<&str>) -> AiProposal {
        AiProposal {
            matches,
            missing_skills: skills(missing),
            summary: summary.map(str::to_string),
        }
    }

    #[test]
    fn test_rule_only_full_match() {
        let required = skills(&["SQL"]);
        let candidates = skills(&["PostgreSQL", "Go"]);
        let rules = vec![skill_match("SQL", "PostgreSQL", MatchType::Ecosystem, 0.9)];

        let result = aggregate(rules, None, &required, &candidates);
        assert_eq!(result.match_percentage, 100.0);
        assert_eq!(result.match_level, MatchLevel::Excellent);
        assert_eq!(result.analysis_method, AnalysisMethod::RuleBased);
        assert_eq!(result.confidence_score, 0.9);
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.bonus_skills, skills(&["Go"]));
        assert_eq!(result.analysis_summary, "Matched 1/1 required skills");
    }

    #[test]
    fn test_no_ai_marks_unresolved_missing() {
        let required = skills(&["Quantum Cryptanalysis"]);
        let candidates = skills(&["Python"]);

        let result = aggregate(vec![], None, &required, &candidates);
        assert_eq!(result.missing_skills, skills(&["Quantum Cryptanalysis"]));
        assert_eq!(result.match_percentage, 0.0);
        assert_eq!(result.match_level, MatchLevel::Poor);
        assert_eq!(result.confidence_score, 0.0);
        assert_eq!(result.bonus_skills, skills(&["Python"]));
    }

    #[test]
    fn test_empty_required_is_zero_percent() {
        let result = aggregate(vec![], None, &[], &skills(&["Python", "Go"]));
        assert_eq!(result.match_percentage, 0.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.analysis_summary, "Matched 0/0 required skills");
    }

    #[test]
    fn test_hybrid_merges_ai_for_unresolved_only() {
        let required = skills(&["SQL", "Kafka", "Terraform"]);
        let candidates = skills(&["PostgreSQL", "RabbitMQ", "Vim"]);
        let rules = vec![skill_match("SQL", "PostgreSQL", MatchType::Ecosystem, 0.9)];
        let ai = proposal(
            vec![
                // rule result must not be overwritten
                skill_match("SQL", "RabbitMQ", MatchType::AiProposed, 1.0),
                skill_match("Kafka", "RabbitMQ", MatchType::AiProposed, 0.7),
            ],
            &["Terraform"],
            Some("Solid backend overlap"),
        );

        let result = aggregate(rules, Some(ai), &required, &candidates);
        assert_eq!(result.analysis_method, AnalysisMethod::Hybrid);
        assert_eq!(result.matched_skills.len(), 2);
        assert_eq!(result.matched_skills[0].candidate_skill, "PostgreSQL");
        assert_eq!(result.matched_skills[1].required_skill, "Kafka");
        assert_eq!(result.missing_skills, skills(&["Terraform"]));
        assert_eq!(result.bonus_skills, skills(&["Vim"]));
        assert_eq!(result.match_percentage, 66.7);
        assert_eq!(result.match_level, MatchLevel::Good);
        assert_eq!(result.confidence_score, 0.8);
        assert_eq!(result.analysis_summary, "Solid backend overlap");
    }

    #[test]
    fn test_ai_only_when_rules_contribute_nothing() {
        let required = skills(&["Kafka"]);
        let candidates = skills(&["RabbitMQ"]);
        let ai = proposal(
            vec![skill_match("Kafka", "RabbitMQ", MatchType::AiProposed, 0.75)],
            &[],
            None,
        );

        let result = aggregate(vec![], Some(ai), &required, &candidates);
        assert_eq!(result.analysis_method, AnalysisMethod::AiOnly);
        assert_eq!(result.match_percentage, 100.0);
        assert_eq!(result.analysis_summary, "Matched 1/1 required skills");
        assert!(result.bonus_skills.is_empty());
    }

    #[test]
    fn test_ai_missing_list_drops_resolved_skills() {
        let required = skills(&["SQL", "Kafka"]);
        let rules = vec![skill_match("SQL", "MySQL", MatchType::Ecosystem, 0.9)];
        let ai = proposal(vec![], &["SQL", "Kafka"], None);

        let result = aggregate(rules, Some(ai), &required, &skills(&["MySQL"]));
        assert_eq!(result.missing_skills, skills(&["Kafka"]));
        assert_eq!(result.analysis_method, AnalysisMethod::RuleBased);
    }

    #[test]
    fn test_ai_missing_list_cannot_invent_or_drop_required_skills() {
        let required = skills(&["Kafka"]);
        let ai = proposal(
            vec![],
            &["Only truly missing specialized skills", "Kubernetes"],
            None,
        );

        let result = aggregate(vec![], Some(ai), &required, &skills(&["Go"]));
        assert_eq!(result.missing_skills, skills(&["Kafka"]));
    }

    #[test]
    fn test_ai_missing_order_leads_then_omitted_required_follow() {
        let required = skills(&["Terraform", "Kafka", "Helm"]);
        let ai = proposal(vec![], &["Helm", "Helm"], None);

        let result = aggregate(vec![], Some(ai), &required, &[]);
        assert_eq!(result.missing_skills, skills(&["Helm", "Terraform", "Kafka"]));
    }

    #[test]
    fn test_ai_matches_for_unknown_required_skills_are_ignored() {
        let required = skills(&["Kafka"]);
        let ai = proposal(
            vec![skill_match("Rust", "RabbitMQ", MatchType::AiProposed, 0.9)],
            &["Kafka"],
            None,
        );
        let result = aggregate(vec![], Some(ai), &required, &skills(&["RabbitMQ"]));
        assert!(result.matched_skills.is_empty());
        assert_eq!(result.match_percentage, 0.0);
    }

    #[test]
    fn test_one_match_per_required_skill() {
        let required = skills(&["SQL", "SQL"]);
        let rules = vec![
            skill_match("SQL", "PostgreSQL", MatchType::Ecosystem, 0.9),
            skill_match("SQL", "PostgreSQL", MatchType::Ecosystem, 0.9),
        ];
        let result = aggregate(rules, None, &required, &skills(&["PostgreSQL"]));
        assert_eq!(result.matched_skills.len(), 1);
        assert_eq!(result.match_percentage, 100.0);
    }

    #[test]
    fn test_bonus_skills_capped_and_ordered() {
        let candidates: Vec<String> = (0..15).map(|i| format!("Skill{i}")).collect();
        let rules = vec![skill_match("Skill0", "Skill0", MatchType::Exact, 1.0)];
        let result = aggregate(rules, None, &skills(&["Skill0"]), &candidates);
        assert_eq!(result.bonus_skills.len(), MAX_BONUS_SKILLS);
        assert_eq!(result.bonus_skills[0], "Skill1");
        assert_eq!(result.bonus_skills[9], "Skill10");
    }

    #[test]
    fn test_duplicate_candidates_produce_duplicate_bonus_entries() {
        let result = aggregate(vec![], None, &[], &skills(&["Go", "Go"]));
        assert_eq!(result.bonus_skills, skills(&["Go", "Go"]));
    }

    #[test]
    fn test_percentage_always_bounded() {
        let required = skills(&["A1", "B2", "C3"]);
        let rules = vec![
            skill_match("A1", "x", MatchType::Exact, 1.0),
            skill_match("B2", "y", MatchType::Exact, 1.0),
            skill_match("C3", "z", MatchType::Exact, 1.0),
        ];
        let ai = proposal(
            vec![skill_match("A1", "w", MatchType::AiProposed, 0.5)],
            &[],
            None,
        );
        let result = aggregate(rules, Some(ai), &required, &[]);
        assert!((0.0..=100.0).contains(&result.match_percentage));
        assert_eq!(result.matched_skills.len(), 3);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(66.666, 1), 66.7);
        assert_eq!(round_to(0.816, 2), 0.82);
    }
}
