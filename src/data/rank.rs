use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::filter::{filter_catalog, Requirement};
use super::model::{Catalog, PumpRecord};

// ---------------------------------------------------------------------------
// Ranking strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankStrategy {
    #[default]
    BestMatch,
    FlowAscending,
    FlowDescending,
    HeadAscending,
    HeadDescending,
    ModelName,
}

impl RankStrategy {
    pub const ALL: [RankStrategy; 6] = [
        RankStrategy::BestMatch,
        RankStrategy::FlowAscending,
        RankStrategy::FlowDescending,
        RankStrategy::HeadAscending,
        RankStrategy::HeadDescending,
        RankStrategy::ModelName,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RankStrategy::BestMatch => "Best match",
            RankStrategy::FlowAscending => "Flow (low → high)",
            RankStrategy::FlowDescending => "Flow (high → low)",
            RankStrategy::HeadAscending => "Head (low → high)",
            RankStrategy::HeadDescending => "Head (high → low)",
            RankStrategy::ModelName => "Model name",
        }
    }
}

/// A candidate pump with its closeness score (lower is better).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub pump: PumpRecord,
    pub match_score: f64,
}

/// Unweighted sum of absolute flow (LPM) and head (m) differences.
pub fn match_score(pump: &PumpRecord, requirement: &Requirement) -> f64 {
    (pump.rated_flow_lpm - requirement.flow_lpm).abs() + (pump.rated_head_m - requirement.head_m).abs()
}

/// Order a filtered subset. Every sort is stable, so ties keep catalog order.
pub fn rank(subset: &[&PumpRecord], requirement: &Requirement, strategy: RankStrategy) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = subset
        .iter()
        .map(|&pump| MatchResult {
            pump: pump.clone(),
            match_score: match_score(pump, requirement),
        })
        .collect();

    let order: fn(&MatchResult, &MatchResult) -> Ordering = match strategy {
        RankStrategy::BestMatch => |a, b| a.match_score.total_cmp(&b.match_score),
        RankStrategy::FlowAscending => |a, b| a.pump.rated_flow_lpm.total_cmp(&b.pump.rated_flow_lpm),
        RankStrategy::FlowDescending => |a, b| b.pump.rated_flow_lpm.total_cmp(&a.pump.rated_flow_lpm),
        RankStrategy::HeadAscending => |a, b| a.pump.rated_head_m.total_cmp(&b.pump.rated_head_m),
        RankStrategy::HeadDescending => |a, b| b.pump.rated_head_m.total_cmp(&a.pump.rated_head_m),
        RankStrategy::ModelName => |a, b| a.pump.model.cmp(&b.pump.model),
    };
    results.sort_by(order);
    results
}

// ---------------------------------------------------------------------------
// Display limit
// ---------------------------------------------------------------------------

pub const MIN_DISPLAY_PERCENT: u8 = 5;
pub const MAX_DISPLAY_PERCENT: u8 = 100;

/// Keep the best `ceil(N × percent / 100)` rows (at least one when N > 0).
/// `percent` is clamped to 5..=100.
pub fn limit_top_percent<T>(mut ordered: Vec<T>, percent: u8) -> Vec<T> {
    let percent = percent.clamp(MIN_DISPLAY_PERCENT, MAX_DISPLAY_PERCENT) as usize;
    let n = ordered.len();
    if n == 0 {
        return ordered;
    }
    let keep = (n * percent).div_ceil(100).max(1);
    ordered.truncate(keep);
    ordered
}

// ---------------------------------------------------------------------------
// Full search pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Matches(Vec<MatchResult>),
    NoMatches,
}

/// Filter, rank, then truncate: the order matters, since the display limit
/// must see ranked rows. Both steps see the same sanitized requirement.
pub fn search(catalog: &Catalog, requirement: &Requirement, strategy: RankStrategy, percent: u8) -> SearchOutcome {
    let requirement = &requirement.clone().sanitized();
    let subset = filter_catalog(catalog, requirement);
    log::debug!(
        "{} of {} pumps pass filters for {requirement:?}",
        subset.len(),
        catalog.len()
    );
    if subset.is_empty() {
        return SearchOutcome::NoMatches;
    }
    let ranked = rank(&subset, requirement, strategy);
    SearchOutcome::Matches(limit_top_percent(ranked, percent))
}
