//! Point, level and rank-score arithmetic. Everything here is a pure
//! function of the counters so a sweep can always rebuild the derived
//! fields from scratch.

use crate::models::leaderboard::{Contributions, LeaderboardEntry, Level};
use crate::utils::round2;

pub const POINTS_ACCEPTED_MENTORSHIP: i64 = 10;
pub const POINTS_MENTORSHIP_SESSION: i64 = 20;
pub const POINTS_INTERVIEW_EXPERIENCE: i64 = 15;
pub const POINTS_RESOURCE_SHARED: i64 = 10;
pub const POINTS_MOCK_INTERVIEW: i64 = 25;
pub const POINTS_FIVE_STAR_RATING: i64 = 10;
pub const POINTS_COMPANY_INSIGHT: i64 = 15;
pub const POINTS_QUESTION_ANSWERED: i64 = 5;
pub const POINTS_HELPFUL_RATING: i64 = 2;
pub const POINTS_MISSED_REQUEST: i64 = -5;

/// Bonus points per full week of consecutive activity.
pub const STREAK_WEEK_BONUS: i64 = 5;

/// Weighted sum over the full counter set plus the streak bonus, clamped at
/// zero. Penalties can erase points but never push the total negative.
pub fn compute_points(contributions: &Contributions, streak_current: i32) -> i64 {
    let raw = contributions.accepted_mentorships as i64 * POINTS_ACCEPTED_MENTORSHIP
        + contributions.mentorship_sessions as i64 * POINTS_MENTORSHIP_SESSION
        + contributions.interview_experiences as i64 * POINTS_INTERVIEW_EXPERIENCE
        + contributions.resources_shared as i64 * POINTS_RESOURCE_SHARED
        + contributions.mock_interviews as i64 * POINTS_MOCK_INTERVIEW
        + contributions.five_star_ratings as i64 * POINTS_FIVE_STAR_RATING
        + contributions.company_insights as i64 * POINTS_COMPANY_INSIGHT
        + contributions.questions_answered as i64 * POINTS_QUESTION_ANSWERED
        + contributions.helpful_ratings as i64 * POINTS_HELPFUL_RATING
        + contributions.missed_requests as i64 * POINTS_MISSED_REQUEST
        + (streak_current as i64 / 7) * STREAK_WEEK_BONUS;

    raw.max(0)
}

/// Comparison key for the global ordering: 70% points, 30% rating rescaled
/// onto the point range (a perfect 5.0 average is worth 30 score-points).
pub fn rank_score(points: i64, average_rating: f64) -> f64 {
    round2(points as f64 * 0.7 + average_rating * 20.0 * 0.3)
}

/// Rebuilds every derived field of an entry from its counters.
pub fn recompute(entry: &mut LeaderboardEntry) {
    entry.points = compute_points(&entry.contributions, entry.streak.current);
    entry.level = Level::for_points(entry.points);
    entry.rank_score = rank_score(entry.points, entry.rating.average);
}
