//! User identity type for core messages.

use serde::{Deserialize, Serialize};

/// Author identity (id, username, display name) and whether it is an automated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub is_bot: bool,
}
