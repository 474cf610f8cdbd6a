//! Decision-outcome classification.
//!
//! Every node-crossing decision ends in exactly one outcome.  The enum makes
//! exhaustiveness and exclusivity structural; the four-boolean projection
//! exists only for record export.

/// The classification of one node-crossing decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecisionOutcome {
    /// Deviated because the intended street is a forbidden one-way.
    Compliance,
    /// Faced a forbidden one-way and entered it anyway — or deviated onto an
    /// alternative that was itself forbidden.
    NonCompliance,
    /// Deviated although the intended street was unrestricted.
    RandomRerouting,
    /// Stayed on an unrestricted intended street.
    NoRouteChange,
}

impl DecisionOutcome {
    /// Classify a decision.
    ///
    /// `alt_forbidden` only matters when the agent deviated: walking onto a
    /// restricted alternative is non-compliance regardless of why the agent
    /// left its intended route.
    pub fn classify(deviated: bool, one_way: bool, alt_forbidden: bool) -> Self {
        match (deviated, one_way) {
            (true, _) if alt_forbidden => DecisionOutcome::NonCompliance,
            (true, true) => DecisionOutcome::Compliance,
            (true, false) => DecisionOutcome::RandomRerouting,
            (false, true) => DecisionOutcome::NonCompliance,
            (false, false) => DecisionOutcome::NoRouteChange,
        }
    }

    /// Project into the four mutually-exclusive export flags.
    pub fn flags(self) -> OutcomeFlags {
        OutcomeFlags {
            compliance: self == DecisionOutcome::Compliance,
            non_compliance: self == DecisionOutcome::NonCompliance,
            random_rerouting: self == DecisionOutcome::RandomRerouting,
            no_route_change: self == DecisionOutcome::NoRouteChange,
        }
    }
}

impl std::fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DecisionOutcome::Compliance => "compliance",
            DecisionOutcome::NonCompliance => "non_compliance",
            DecisionOutcome::RandomRerouting => "random_rerouting",
            DecisionOutcome::NoRouteChange => "no_route_change",
        };
        f.write_str(s)
    }
}

/// Boolean projection of [`DecisionOutcome`] for position records.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutcomeFlags {
    pub compliance: bool,
    pub non_compliance: bool,
    pub random_rerouting: bool,
    pub no_route_change: bool,
}

impl OutcomeFlags {
    /// Number of flags set — 1 after a decision, 0 between decisions.
    pub fn count_set(self) -> usize {
        usize::from(self.compliance)
            + usize::from(self.non_compliance)
            + usize::from(self.random_rerouting)
            + usize::from(self.no_route_change)
    }
}
