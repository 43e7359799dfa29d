//! Result types shared by every matching stage.

use serde::{Deserialize, Serialize};

/// How a required skill was resolved against a candidate skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Ecosystem,
    Partial,
    AiProposed,
}

/// One resolved correspondence between a required skill and a candidate skill.
/// Both skill strings are kept exactly as supplied, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub required_skill: String,
    pub candidate_skill: String,
    pub match_type: MatchType,
    pub confidence: f64, // 0.0 – 1.0
    pub reasoning: String,
}

/// Qualitative band derived from the match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    #[serde(rename = "Excellent Match")]
    Excellent,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Fair Match")]
    Fair,
    #[serde(rename = "Poor Match")]
    Poor,
}

impl MatchLevel {
    /// ≥80 excellent, ≥60 good, ≥40 fair, otherwise poor.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            MatchLevel::Excellent
        } else if percentage >= 60.0 {
            MatchLevel::Good
        } else if percentage >= 40.0 {
            MatchLevel::Fair
        } else {
            MatchLevel::Poor
        }
    }
}

/// Which stages contributed to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    RuleBased,
    AiOnly,
    Hybrid,
}

/// Final report for one analysis request. Built once by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub match_percentage: f64, // 0 – 100
    pub match_level: MatchLevel,
    pub analysis_method: AnalysisMethod,
    pub confidence_score: f64,
    pub matched_skills: Vec<SkillMatch>,
    pub missing_skills: Vec<String>,
    pub bonus_skills: Vec<String>,
    pub analysis_summary: String,
}
