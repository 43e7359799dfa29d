use std::sync::Arc;

use crate::credits::ledger::CreditLedger;
use crate::matching::SkillMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless apart from the injected completion provider; shared by every request.
    pub matcher: SkillMatcher,
    /// Pluggable ledger. Default: InMemoryLedger.
    pub ledger: Arc<dyn CreditLedger>,
}
