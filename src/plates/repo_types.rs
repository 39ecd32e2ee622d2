use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Dish categories a plate may be filed under.
pub const CATEGORIES: &[&str] = &[
    "Appetizer", "Soup", "Salad", "Sandwich", "Burger", "Pizza", "Pasta", "Meat", "Seafood",
    "Vegetarian", "Vegan", "Dessert", "Beverage", "Breakfast", "Brunch", "Lunch", "Dinner",
    "Snack", "Side Dish", "Sushi", "Noodle", "Rice Dish", "BBQ", "Taco", "Curry", "Fried Food",
    "Stew", "Wrap", "Deli", "Ice Cream", "Cake", "Pie",
];

/// Plate record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Plate {
    pub id: i64,
    pub user_id: Option<i64>,        // None for anonymous and seeded posts
    pub restaurant: String,
    pub plate: String,               // dish name
    pub category: Option<String>,
    pub address: String,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub rating: Option<i64>,         // 1..=5, None until rated
    pub comment: Option<String>,
    pub photo: Option<String>,       // storage key
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Plate {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Fields supplied when posting a plate.
#[derive(Debug, Clone, Default)]
pub struct NewPlate {
    pub user_id: Option<i64>,
    pub restaurant: String,
    pub plate: String,
    pub category: Option<String>,
    pub address: String,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub photo: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
