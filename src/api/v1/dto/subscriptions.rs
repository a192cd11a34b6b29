use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i32,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub user_id: i64,
    pub restaurant_id: i64,
    pub rating: i32,
}

impl From<crate::repos::subscription_repo::SubscriptionRow> for SubscriptionResponse {
    fn from(s: crate::repos::subscription_repo::SubscriptionRow) -> Self {
        Self {
            user_id: s.user_id,
            restaurant_id: s.restaurant_id,
            rating: s.rating,
        }
    }
}
