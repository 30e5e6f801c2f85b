use std::sync::Arc;

use chrono::Utc;
use futures::stream::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, doc, oid::ObjectId},
    options::ReturnDocument,
};
use tracing::warn;

use crate::error::AppError;
use crate::models::leaderboard::Activity;
use crate::models::mentorship::{MentorshipRequest, RequestStatus};
use crate::services::leaderboard_service::LeaderboardService;

/// Pending requests older than this are expired and penalized.
pub const REQUEST_EXPIRY_DAYS: i64 = 3;

/// Mentorship request lifecycle. Accepting or completing a request awards
/// leaderboard points as a best-effort side effect: the status transition is
/// the business action and always stands, even when the award fails.
pub struct MentorshipService {
    collection: Collection<MentorshipRequest>,
    leaderboard: Arc<LeaderboardService>,
}

impl MentorshipService {
    pub fn new(db: Arc<Database>, leaderboard: Arc<LeaderboardService>) -> Self {
        Self {
            collection: db.collection("mentorship_requests"),
            leaderboard,
        }
    }

    pub async fn create_request(
        &self,
        student_id: ObjectId,
        alumni_id: ObjectId,
        topic: String,
        message: Option<String>,
    ) -> Result<MentorshipRequest, AppError> {
        let mut request = MentorshipRequest {
            id: None,
            student_id,
            alumni_id,
            topic,
            message,
            status: RequestStatus::Pending,
            created_at: bson::DateTime::now(),
            responded_at: None,
        };

        let insert_result = self.collection.insert_one(&request).await?;
        request.id = insert_result.inserted_id.as_object_id();
        Ok(request)
    }

    pub async fn get_request(&self, request_id: ObjectId) -> Result<MentorshipRequest, AppError> {
        self.collection
            .find_one(doc! { "_id": request_id })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("mentorship request {request_id}")))
    }

    pub async fn accept(&self, request_id: ObjectId) -> Result<MentorshipRequest, AppError> {
        let request = self
            .transition(request_id, RequestStatus::Pending, RequestStatus::Accepted)
            .await?;
        self.track_best_effort(request.alumni_id, Activity::AcceptMentorship).await;
        Ok(request)
    }

    pub async fn reject(&self, request_id: ObjectId) -> Result<MentorshipRequest, AppError> {
        self.transition(request_id, RequestStatus::Pending, RequestStatus::Rejected)
            .await
    }

    pub async fn complete(&self, request_id: ObjectId) -> Result<MentorshipRequest, AppError> {
        let request = self
            .transition(request_id, RequestStatus::Accepted, RequestStatus::Completed)
            .await?;
        self.track_best_effort(request.alumni_id, Activity::CompleteMentorship).await;
        Ok(request)
    }

    /// Conditional update: the filter on the expected current status is what
    /// makes each transition fire at most once under concurrent calls.
    async fn transition(
        &self,
        request_id: ObjectId,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<MentorshipRequest, AppError> {
        self.collection
            .find_one_and_update(
                doc! { "_id": request_id, "status": bson::to_bson(&from)? },
                doc! { "$set": { "status": bson::to_bson(&to)?, "responded_at": bson::DateTime::now() } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("mentorship request {request_id} in state {from:?}")))
    }

    /// The expired-request scan: every pending request past the age cutoff is
    /// flipped to Expired and its alumni penalized once. The status flip comes
    /// first and is conditional on the request still being Pending, so a
    /// rerun of the scan never penalizes the same request twice.
    pub async fn expire_stale(&self) -> Result<u64, AppError> {
        let cutoff =
            bson::DateTime::from_chrono(Utc::now() - chrono::Duration::days(REQUEST_EXPIRY_DAYS));
        let mut cursor = self
            .collection
            .find(doc! { "status": "Pending", "created_at": { "$lt": cutoff } })
            .await?;

        let mut expired = 0u64;
        while let Some(request) = cursor.try_next().await? {
            let Some(request_id) = request.id else { continue };

            let update = self
                .collection
                .update_one(
                    doc! { "_id": request_id, "status": "Pending" },
                    doc! { "$set": { "status": "Expired" } },
                )
                .await;
            match update {
                Ok(result) if result.modified_count == 1 => {
                    expired += 1;
                    self.track_best_effort(request.alumni_id, Activity::MissRequest).await;
                }
                // Raced with an accept/reject or an overlapping scan; the
                // request already left Pending and owes no penalty here.
                Ok(_) => {}
                Err(e) => {
                    warn!("failed to expire mentorship request {request_id}: {e}");
                }
            }
        }
        Ok(expired)
    }

    async fn track_best_effort(&self, alumni_id: ObjectId, activity: Activity) {
        if let Err(e) = self.leaderboard.track_activity(alumni_id, activity).await {
            warn!("leaderboard update for {alumni_id} failed after {activity:?}: {e}");
        }
    }
}
