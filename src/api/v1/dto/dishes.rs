use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateDishRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDishRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DishResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub restaurant_id: i64,
}

impl From<crate::repos::dish_repo::DishRow> for DishResponse {
    fn from(d: crate::repos::dish_repo::DishRow) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            price: d.price,
            restaurant_id: d.restaurant_id,
        }
    }
}
