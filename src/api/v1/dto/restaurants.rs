use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RestaurantResponse {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub owner_id: Option<i64>,
}

impl From<crate::repos::restaurant_repo::RestaurantRow> for RestaurantResponse {
    fn from(r: crate::repos::restaurant_repo::RestaurantRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            category: r.category,
            address: r.address,
            description: r.description,
            rating: r.rating,
            owner_id: r.owner_id,
        }
    }
}
