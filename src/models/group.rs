use serde::{Deserialize, Serialize};

/// Entry of `GET /groups/:id/members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub username: String,
    pub access_level: u32,
}

/// Entry of `GET /groups/:id/projects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}
