use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::utils::round2;

/// A tracked contribution event. Controllers hand one of these to
/// `LeaderboardService::track_activity`; the textual form is what external
/// callers and the top-by-contribution endpoint use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Activity {
    AcceptMentorship,
    CompleteMentorship,
    UploadInterview,
    ShareResource,
    ConductWorkshop,
    ShareInsight,
    AnswerQuestion,
    MissRequest,
}

impl std::str::FromStr for Activity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept_mentorship" => Ok(Activity::AcceptMentorship),
            "complete_mentorship" => Ok(Activity::CompleteMentorship),
            "upload_interview" => Ok(Activity::UploadInterview),
            "share_resource" => Ok(Activity::ShareResource),
            "conduct_workshop" => Ok(Activity::ConductWorkshop),
            "share_insight" => Ok(Activity::ShareInsight),
            "answer_question" => Ok(Activity::AnswerQuestion),
            "miss_request" => Ok(Activity::MissRequest),
            other => Err(AppError::UnknownActivity(other.to_string())),
        }
    }
}

/// Per-user counters of discrete contribution events. Counters only grow;
/// `missed_requests` is the one that weighs against the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Contributions {
    #[serde(default)]
    pub accepted_mentorships: i32,
    #[serde(default)]
    pub mentorship_sessions: i32,
    #[serde(default)]
    pub interview_experiences: i32,
    #[serde(default)]
    pub resources_shared: i32,
    #[serde(default)]
    pub mock_interviews: i32,
    #[serde(default)]
    pub five_star_ratings: i32,
    #[serde(default)]
    pub company_insights: i32,
    #[serde(default)]
    pub questions_answered: i32,
    #[serde(default)]
    pub helpful_ratings: i32,
    #[serde(default)]
    pub missed_requests: i32,
}

impl Contributions {
    pub fn increment(&mut self, activity: Activity) {
        match activity {
            Activity::AcceptMentorship => self.accepted_mentorships += 1,
            Activity::CompleteMentorship => self.mentorship_sessions += 1,
            Activity::UploadInterview => self.interview_experiences += 1,
            Activity::ShareResource => self.resources_shared += 1,
            Activity::ConductWorkshop => self.mock_interviews += 1,
            Activity::ShareInsight => self.company_insights += 1,
            Activity::AnswerQuestion => self.questions_answered += 1,
            Activity::MissRequest => self.missed_requests += 1,
        }
    }

    /// Maps a counter name to its document path for sorted reads.
    /// The set is closed; anything else is a caller error.
    pub fn sort_field(kind: &str) -> Result<&'static str, AppError> {
        match kind {
            "accepted_mentorships" => Ok("contributions.accepted_mentorships"),
            "mentorship_sessions" => Ok("contributions.mentorship_sessions"),
            "interview_experiences" => Ok("contributions.interview_experiences"),
            "resources_shared" => Ok("contributions.resources_shared"),
            "mock_interviews" => Ok("contributions.mock_interviews"),
            "five_star_ratings" => Ok("contributions.five_star_ratings"),
            "company_insights" => Ok("contributions.company_insights"),
            "questions_answered" => Ok("contributions.questions_answered"),
            "helpful_ratings" => Ok("contributions.helpful_ratings"),
            "missed_requests" => Ok("contributions.missed_requests"),
            other => Err(AppError::UnknownActivity(other.to_string())),
        }
    }
}

/// Running mean of ratings received, append-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RatingStats {
    pub sum: f64,
    pub total: i32,
    pub average: f64,
}

impl RatingStats {
    pub fn add(&mut self, value: i32) -> Result<(), AppError> {
        if !(1..=5).contains(&value) {
            return Err(AppError::InvalidRating(value));
        }
        self.sum += value as f64;
        self.total += 1;
        self.average = round2(self.sum / self.total as f64);
        Ok(())
    }
}

/// Consecutive-day activity counter, day granularity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Streak {
    pub current: i32,
    pub longest: i32,
    #[schema(value_type = Option<String>)]
    pub last_activity_date: Option<bson::DateTime>,
}

impl Streak {
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        match self.last_activity_date.map(|d| d.to_chrono().date_naive()) {
            None => {
                self.current = 1;
                self.longest = self.longest.max(1);
                self.last_activity_date = Some(bson::DateTime::from_chrono(now));
            }
            Some(last_day) => {
                let gap = (today - last_day).num_days();
                if gap <= 0 {
                    // Same-day repeat, or a clock that went backwards; either
                    // way the streak and the stored date stay as they are.
                    return;
                }
                if gap == 1 {
                    self.current += 1;
                    self.longest = self.longest.max(self.current);
                } else {
                    self.current = 1;
                }
                self.last_activity_date = Some(bson::DateTime::from_chrono(now));
            }
        }
    }
}

/// Tier derived from total points, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Level {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Level {
    pub fn for_points(points: i64) -> Self {
        match points {
            p if p >= 500 => Level::Diamond,
            p if p >= 300 => Level::Platinum,
            p if p >= 200 => Level::Gold,
            p if p >= 100 => Level::Silver,
            _ => Level::Bronze,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Bronze
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Badge {
    pub name: String,
    pub icon: String,
    pub description: String,
    #[schema(value_type = String)]
    pub earned_at: bson::DateTime,
}

/// One document per user, created lazily on first contribution or first
/// leaderboard view. `points`, `level` and `rank_score` are always derived
/// from the counters, never written directly; `rank` is only meaningful
/// relative to the most recent global recalculation pass (0 = unranked).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    #[schema(value_type = String)]
    pub user_id: ObjectId,
    #[serde(default)]
    pub contributions: Contributions,
    #[serde(default)]
    pub rating: RatingStats,
    #[serde(default)]
    pub streak: Streak,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub rank_score: f64,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

impl LeaderboardEntry {
    pub fn new(user_id: ObjectId) -> Self {
        LeaderboardEntry {
            id: None,
            user_id,
            contributions: Contributions::default(),
            rating: RatingStats::default(),
            streak: Streak::default(),
            points: 0,
            level: Level::Bronze,
            rank_score: 0.0,
            rank: 0,
            badges: vec![],
        }
    }
}

/// A ranked entry joined with its user for the public leaderboard read.
#[derive(Serialize, ToSchema)]
pub struct LeaderboardEntryWithUser {
    pub entry: LeaderboardEntry,
    pub user: Option<crate::models::user::UserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn streak_starts_at_one() {
        let mut streak = Streak::default();
        streak.record_activity(day(2026, 3, 1));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn streak_continues_on_consecutive_days() {
        let mut streak = Streak::default();
        streak.record_activity(day(2026, 3, 1));
        streak.record_activity(day(2026, 3, 2));
        assert_eq!(streak.current, 2);
        assert_eq!(streak.longest, 2);
    }

    #[test]
    fn streak_same_day_is_idempotent() {
        let mut streak = Streak::default();
        streak.record_activity(day(2026, 3, 1));
        let stamped = streak.last_activity_date;
        streak.record_activity(day(2026, 3, 1));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.last_activity_date, stamped);
    }

    #[test]
    fn streak_breaks_after_gap() {
        let mut streak = Streak::default();
        streak.record_activity(day(2026, 3, 1));
        streak.record_activity(day(2026, 3, 2));
        streak.record_activity(day(2026, 3, 7));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 2);
    }

    #[test]
    fn streak_ignores_backwards_clock() {
        let mut streak = Streak::default();
        streak.record_activity(day(2026, 3, 5));
        streak.record_activity(day(2026, 3, 3));
        assert_eq!(streak.current, 1);
        assert_eq!(
            streak.last_activity_date.unwrap().to_chrono().date_naive(),
            day(2026, 3, 5).date_naive()
        );
    }

    #[test]
    fn rating_average_over_two_values() {
        let mut rating = RatingStats::default();
        rating.add(5).unwrap();
        rating.add(1).unwrap();
        assert_eq!(rating.total, 2);
        assert_eq!(rating.average, 3.0);
    }

    #[test]
    fn rating_rejects_out_of_range_without_mutation() {
        let mut rating = RatingStats::default();
        assert!(matches!(rating.add(0), Err(AppError::InvalidRating(0))));
        assert!(matches!(rating.add(6), Err(AppError::InvalidRating(6))));
        assert_eq!(rating.total, 0);
        assert_eq!(rating.sum, 0.0);
        assert_eq!(rating.average, 0.0);
    }

    #[test]
    fn level_thresholds_are_inclusive_lower_bounds() {
        assert_eq!(Level::for_points(0), Level::Bronze);
        assert_eq!(Level::for_points(99), Level::Bronze);
        assert_eq!(Level::for_points(100), Level::Silver);
        assert_eq!(Level::for_points(200), Level::Gold);
        assert_eq!(Level::for_points(300), Level::Platinum);
        assert_eq!(Level::for_points(499), Level::Platinum);
        assert_eq!(Level::for_points(500), Level::Diamond);
    }

    #[test]
    fn level_order_matches_tier_order() {
        assert!(Level::Bronze < Level::Silver);
        assert!(Level::Silver < Level::Gold);
        assert!(Level::Gold < Level::Platinum);
        assert!(Level::Platinum < Level::Diamond);
    }

    #[test]
    fn activity_tags_round_trip() {
        assert_eq!(
            Activity::from_str("conduct_workshop").unwrap(),
            Activity::ConductWorkshop
        );
        assert!(matches!(
            Activity::from_str("write_poem"),
            Err(AppError::UnknownActivity(_))
        ));
    }

    #[test]
    fn unknown_counter_name_is_rejected() {
        assert!(Contributions::sort_field("questions_answered").is_ok());
        assert!(matches!(
            Contributions::sort_field("karma"),
            Err(AppError::UnknownActivity(_))
        ));
    }
}
