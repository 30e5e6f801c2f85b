use std::sync::Arc;

use chrono::Utc;
use futures::stream::TryStreamExt;
use mongodb::{Collection, Database, bson::{self, doc, oid::ObjectId}};
use tracing::warn;

use crate::error::AppError;
use crate::models::leaderboard::{
    Activity, Badge, Contributions, LeaderboardEntry, LeaderboardEntryWithUser,
};
use crate::models::user::{User, UserResponse};
use crate::services::scoring;

/// Orchestrates contribution tracking: every event loads the user's entry,
/// updates the streak and the matching counter, rebuilds the derived fields
/// from scratch and triggers a global re-rank. Entries are written
/// last-write-wins with no version check; two concurrent events for the same
/// user race and the later write sticks.
pub struct LeaderboardService {
    collection: Collection<LeaderboardEntry>,
}

impl LeaderboardService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            collection: db.collection("leaderboards"),
        }
    }

    /// Read-through creation: the entry appears with zeroed counters the
    /// first time anything asks for it.
    pub async fn ensure_entry(&self, user_id: ObjectId) -> Result<LeaderboardEntry, AppError> {
        if let Some(entry) = self.collection.find_one(doc! { "user_id": user_id }).await? {
            return Ok(entry);
        }

        let mut entry = LeaderboardEntry::new(user_id);
        let insert_result = self.collection.insert_one(&entry).await?;
        entry.id = insert_result.inserted_id.as_object_id();
        Ok(entry)
    }

    /// Records one contribution event for a user and refreshes the global
    /// ranking. Derived fields are always recomputed from the full counter
    /// set, never patched incrementally, so a repeated sweep cannot
    /// double-apply anything.
    pub async fn track_activity(&self, user_id: ObjectId, activity: Activity) -> Result<(), AppError> {
        let mut entry = self.ensure_entry(user_id).await?;
        entry.streak.record_activity(Utc::now());
        entry.contributions.increment(activity);
        scoring::recompute(&mut entry);
        self.save(&entry).await?;
        self.rerank_all().await
    }

    /// Records a rating received by a user. Every rating counts as a helpful
    /// rating; a 5 additionally counts as a five-star one.
    pub async fn add_rating(&self, user_id: ObjectId, value: i32) -> Result<(), AppError> {
        if !(1..=5).contains(&value) {
            return Err(AppError::InvalidRating(value));
        }

        let mut entry = self.ensure_entry(user_id).await?;
        entry.streak.record_activity(Utc::now());
        entry.rating.add(value)?;
        entry.contributions.helpful_ratings += 1;
        if value == 5 {
            entry.contributions.five_star_ratings += 1;
        }
        scoring::recompute(&mut entry);
        self.save(&entry).await?;
        self.rerank_all().await
    }

    async fn save(&self, entry: &LeaderboardEntry) -> Result<(), AppError> {
        self.collection
            .replace_one(doc! { "user_id": entry.user_id }, entry)
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Re-sorts the whole population by rank score (ties broken by points,
    /// then average rating) and renumbers ranks 1..N. A single entry's write
    /// failure is logged and skipped; the pass keeps going.
    pub async fn rerank_all(&self) -> Result<(), AppError> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "rank_score": -1, "points": -1, "rating.average": -1 })
            .await?;

        let mut rank = 1;
        while let Some(entry) = cursor.try_next().await? {
            let update = self
                .collection
                .update_one(doc! { "user_id": entry.user_id }, doc! { "$set": { "rank": rank } })
                .await;
            if let Err(e) = update {
                warn!("failed to persist rank {rank} for user {}: {e}", entry.user_id);
            }
            rank += 1;
        }
        Ok(())
    }

    /// The sweep: rebuild every entry's derived fields from its counters,
    /// then re-rank. Used by the scheduled jobs; also what heals any entry a
    /// best-effort tracking call failed to update.
    pub async fn recalculate_all(&self) -> Result<(), AppError> {
        let mut cursor = self.collection.find(doc! {}).await?;
        while let Some(mut entry) = cursor.try_next().await? {
            scoring::recompute(&mut entry);
            if let Err(e) = self.save(&entry).await {
                warn!("sweep: failed to persist entry for user {}: {e}", entry.user_id);
            }
        }
        self.rerank_all().await
    }

    /// Top-N rank-ordered entries with user details joined in. Pure read;
    /// entries not yet touched by a recalculation pass carry rank 0 and are
    /// left out.
    pub async fn top(&self, limit: i64) -> Result<Vec<LeaderboardEntryWithUser>, AppError> {
        let pipeline = vec![
            doc! { "$match": { "rank": { "$gte": 1 } } },
            doc! { "$sort": { "rank": 1 } },
            doc! { "$limit": limit },
            doc! { "$lookup": { "from": "users", "localField": "user_id", "foreignField": "_id", "as": "user_info" } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let mut results = Vec::new();
        while let Some(mut document) = cursor.try_next().await? {
            let user: Option<User> = document
                .remove("user_info")
                .and_then(|b| b.as_array().and_then(|a| a.first().cloned()))
                .and_then(|u| bson::from_bson(u).ok());
            let entry: LeaderboardEntry = bson::from_document(document)?;
            results.push(LeaderboardEntryWithUser {
                entry,
                user: user.map(UserResponse::from),
            });
        }
        Ok(results)
    }

    /// One user's entry, created with defaults on first view.
    pub async fn entry_for(&self, user_id: ObjectId) -> Result<LeaderboardEntry, AppError> {
        self.ensure_entry(user_id).await
    }

    /// Top-K entries by a single named counter, e.g. the most prolific
    /// interview-experience authors.
    pub async fn top_by_contribution(
        &self,
        kind: &str,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let field = Contributions::sort_field(kind)?;
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { field: -1 })
            .limit(limit)
            .await?;

        let mut entries = Vec::new();
        while let Some(entry) = cursor.try_next().await? {
            entries.push(entry);
        }
        Ok(entries)
    }

    pub async fn award_badge(&self, user_id: ObjectId, badge: Badge) -> Result<(), AppError> {
        self.ensure_entry(user_id).await?;
        self.collection
            .update_one(
                doc! { "user_id": user_id },
                doc! { "$push": { "badges": bson::to_bson(&badge)? } },
            )
            .await?;
        Ok(())
    }
}
