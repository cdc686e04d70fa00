use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token payload. `sub` is the user id; timestamps are unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}
