use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Expired,
}

/// A student's mentorship request to an alumni. Pending requests left
/// unanswered past the expiry window are marked `Expired` by the scanner
/// and count against the alumni.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MentorshipRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    #[schema(value_type = String)]
    pub student_id: ObjectId,
    #[schema(value_type = String)]
    pub alumni_id: ObjectId,
    pub topic: String,
    pub message: Option<String>,
    pub status: RequestStatus,
    #[schema(value_type = String)]
    pub created_at: bson::DateTime,
    #[schema(value_type = Option<String>)]
    pub responded_at: Option<bson::DateTime>,
}

#[derive(Serialize, ToSchema)]
pub struct MentorshipRequestResponse {
    pub id: Option<String>,
    pub student_id: String,
    pub alumni_id: String,
    pub topic: String,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub created_at: String,
}

impl From<MentorshipRequest> for MentorshipRequestResponse {
    fn from(r: MentorshipRequest) -> Self {
        MentorshipRequestResponse {
            id: r.id.map(|oid| oid.to_hex()),
            student_id: r.student_id.to_hex(),
            alumni_id: r.alumni_id.to_hex(),
            topic: r.topic,
            message: r.message,
            status: r.status,
            created_at: r.created_at.to_chrono().to_rfc3339(),
        }
    }
}
