//! Demo plates for empty databases.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::{
    error::AppError,
    plates::{repo, repo_types::NewPlate},
    state::AppState,
};

type SeedRow = (
    &'static str, // restaurant
    &'static str, // plate
    &'static str, // category
    &'static str, // address
    &'static str, // zipcode
    &'static str, // city
    &'static str, // state
    i64,          // rating
    &'static str, // comment
    &'static str, // photo
    f64,          // latitude
    f64,          // longitude
);

const DEFAULT_PLATES: &[SeedRow] = &[
    ("Big Burger Place", "Classic Cheeseburger", "Burger", "123 Main St, Metropolis, NY, USA", "10001", "Metropolis", "NY", 5, "Juicy! Perfect cheese.", "burger.jpg", 40.7128, -74.0060),
    ("Sushi World", "Salmon Nigiri", "Sushi", "456 Ocean Ave, San Francisco, CA, USA", "94105", "San Francisco", "CA", 4, "Fresh and bright.", "sushi.jpg", 37.7749, -122.4194),
    ("Pasta Palace", "Spaghetti Carbonara", "Pasta", "789 Italian Rd, Chicago, IL, USA", "60601", "Chicago", "IL", 5, "Creamy and rich.", "carbonara.jpg", 41.8781, -87.6298),
    ("Vegan Table", "Quinoa Salad", "Salad", "321 Green St, Portland, OR, USA", "97201", "Portland", "OR", 3, "Healthy, but a bit bland.", "quinoa.jpg", 45.5051, -122.6750),
    ("Taco Spot", "Carne Asada Taco", "Taco", "654 Fiesta Blvd, Austin, TX, USA", "78701", "Austin", "TX", 5, "Spicy and flavorful.", "taco.jpg", 30.2672, -97.7431),
    ("Sweet Treats", "Chocolate Cake", "Cake", "987 Dessert Ln, Miami, FL, USA", "33101", "Miami", "FL", 4, "Very rich, moist.", "cake.jpg", 25.7617, -80.1918),
    ("Breakfast Barn", "Pancakes", "Breakfast", "246 Morning Dr, Denver, CO, USA", "80202", "Denver", "CO", 5, "Fluffy stacks!", "pancakes.jpg", 39.7392, -104.9903),
];

const ROCHESTER_PLATES: &[SeedRow] = &[
    ("Lilac City Grill", "New England Clam Chowder", "Soup", "103 N Main St, Rochester, NH, USA", "03867", "Rochester", "NH", 5, "Creamy and full of clams.", "clamchowder.jpg", 43.3045, -70.9786),
    ("Spaulding Steak & Ale", "Prime Rib", "Meat", "500 Spaulding Turnpike, Rochester, NH, USA", "03867", "Rochester", "NH", 4, "Tender, juicy prime rib.", "primerib.jpg", 43.3040, -70.9872),
    ("China Palace", "General Tso's Chicken", "Fried Food", "21 S Main St, Rochester, NH, USA", "03867", "Rochester", "NH", 4, "Crispy and tangy.", "generaltso.jpg", 43.3018, -70.9727),
    ("Revolution Taproom & Grill", "Fish Tacos", "Taco", "61 N Main St, Rochester, NH, USA", "03867", "Rochester", "NH", 5, "Fresh and zesty tacos.", "fishtacos.jpg", 43.3057, -70.9782),
    ("Dos Amigos Burritos", "Vegetarian Burrito", "Vegetarian", "55 N Main St, Rochester, NH, USA", "03867", "Rochester", "NH", 5, "Loaded with veggies!", "vegburrito.jpg", 43.3052, -70.9783),
    ("Granite Steak & Grill", "Cheesecake", "Dessert", "11 Farmington Rd, Rochester, NH, USA", "03867", "Rochester", "NH", 5, "Rich and creamy.", "cheesecake.jpg", 43.2971, -70.9765),
    ("La Corona Mexican Restaurant", "Chicken Enchiladas", "Wrap", "83 S Main St, Rochester, NH, USA", "03867", "Rochester", "NH", 4, "Spicy and satisfying.", "enchiladas.jpg", 43.2993, -70.9726),
];

pub fn dataset(name: &str) -> Option<&'static [SeedRow]> {
    match name {
        "default" => Some(DEFAULT_PLATES),
        "rochester" => Some(ROCHESTER_PLATES),
        _ => None,
    }
}

fn to_new_plate(row: &SeedRow) -> NewPlate {
    let &(restaurant, plate, category, address, zipcode, city, state, rating, comment, photo, lat, lng) =
        row;
    NewPlate {
        user_id: None,
        restaurant: restaurant.into(),
        plate: plate.into(),
        category: Some(category.into()),
        address: address.into(),
        zipcode: Some(zipcode.into()),
        city: Some(city.into()),
        state: Some(state.into()),
        rating: Some(rating),
        comment: Some(comment.into()),
        photo: Some(photo.into()),
        latitude: Some(lat),
        longitude: Some(lng),
    }
}

pub async fn load(db: &SqlitePool, rows: &[SeedRow]) -> anyhow::Result<usize> {
    for row in rows {
        repo::insert(db, &to_new_plate(row)).await?;
    }
    Ok(rows.len())
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub dataset: String,
    pub inserted: usize,
}

pub fn seed_routes() -> Router<AppState> {
    Router::new().route("/seed/:dataset", post(seed_dataset))
}

#[instrument(skip(state))]
pub async fn seed_dataset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SeedResponse>, AppError> {
    let rows = dataset(&name).ok_or(AppError::NotFound("Seed dataset"))?;
    let inserted = load(&state.db, rows).await?;
    info!(dataset = %name, inserted, "demo plates loaded");
    Ok(Json(SeedResponse {
        dataset: name,
        inserted,
    }))
}
