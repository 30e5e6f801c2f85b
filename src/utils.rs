use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Claims {
    pub sub: String,  // User ID
    pub role: String,
    pub exp: usize,
}

/// Tokens are normally minted by the auth service; this stays here for the
/// test harness and shares the same claim shape.
pub fn generate_jwt(user_id: &str, role: &str, secret: &str) -> String {
    let expiration = chrono::Utc::now() + chrono::Duration::hours(24);
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
}

pub fn validate_jwt(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims).ok()
}

/// Round to two decimal places, the precision stored for averages and scores.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
