/*
 * Responsibility
 * - Handler から見える「認証済み主体」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - token の検証ロジックは middleware/services 側の責務
 * - Principal は request 単位で作り直す。request を跨いで共有しない
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed role set. The role travels inside the token as a claim and is
/// trusted at face value until the token expires; it is never re-read from
/// storage during authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Owner,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
            Role::Client => "CLIENT",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "OWNER" => Ok(Role::Owner),
            "CLIENT" => Ok(Role::Client),
            _ => Err(()),
        }
    }
}

/// The identity attached to one authenticated request.
///
/// Built by the bearer middleware from a verified token, inserted into the
/// request extensions, and dropped when the request ends. An anonymous
/// request simply has no `Principal` in its extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub identity: String,
    pub role: Role,
}

impl Principal {
    pub fn new(identity: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
