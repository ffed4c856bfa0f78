//! Read-side feedback aggregation for the dashboard.
//!
//! Nothing is materialized: the counts are derived from whatever feedback
//! set the caller can currently see, on every request.

use serde::Serialize;

use crate::feedback::Sentiment;

/// Sentiment counts over a caller's visible feedback plus team size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_feedback: i64,
    pub positive_feedback: i64,
    pub neutral_feedback: i64,
    pub negative_feedback: i64,
    /// Number of direct reports; always 0 for callers without a team.
    pub team_members_count: i64,
}

impl DashboardStats {
    /// Count sentiments and attach the team size.
    pub fn compute<I>(sentiments: I, team_members_count: i64) -> Self
    where
        I: IntoIterator<Item = Sentiment>,
    {
        let mut stats = DashboardStats {
            team_members_count,
            ..Self::default()
        };
        for sentiment in sentiments {
            stats.total_feedback += 1;
            match sentiment {
                Sentiment::Positive => stats.positive_feedback += 1,
                Sentiment::Neutral => stats.neutral_feedback += 1,
                Sentiment::Negative => stats.negative_feedback += 1,
            }
        }
        stats
    }
}
