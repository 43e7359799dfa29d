// Credit metering for billable actions.
// Every analysis or generation request is charged against the caller's balance
// through the CreditLedger trait; handlers never touch balances directly.

pub mod handlers;
pub mod ledger;

use serde::{Deserialize, Serialize};

/// A billable action. Generated-content kinds are distinct variants so each
/// carries its own price without string lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    JobSearch,
    CoverLetter,
    ColdEmail,
    LinkedinDm,
    LinkedinConnectionNote,
    ResumeAnalysis,
    SkillAnalysis,
    BulkApplication,
    PremiumFeature,
}

impl ActionType {
    /// Credits debited per use.
    pub fn cost(self) -> i64 {
        match self {
            ActionType::JobSearch
            | ActionType::CoverLetter
            | ActionType::ColdEmail
            | ActionType::LinkedinDm
            | ActionType::LinkedinConnectionNote
            | ActionType::SkillAnalysis => 1,
            ActionType::ResumeAnalysis => 2,
            ActionType::PremiumFeature => 3,
            ActionType::BulkApplication => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs() {
        assert_eq!(ActionType::SkillAnalysis.cost(), 1);
        assert_eq!(ActionType::CoverLetter.cost(), 1);
        assert_eq!(ActionType::ResumeAnalysis.cost(), 2);
        assert_eq!(ActionType::PremiumFeature.cost(), 3);
        assert_eq!(ActionType::BulkApplication.cost(), 5);
    }

    #[test]
    fn test_action_type_serde_snake_case() {
        let action: ActionType = serde_json::from_str(r#""linkedin_connection_note""#).unwrap();
        assert_eq!(action, ActionType::LinkedinConnectionNote);
        let json = serde_json::to_string(&ActionType::ColdEmail).unwrap();
        assert_eq!(json, r#""cold_email""#);
    }

    #[test]
    fn test_unknown_action_type_rejected() {
        assert!(serde_json::from_str::<ActionType>(r#""teleport""#).is_err());
    }
}
