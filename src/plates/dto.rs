use serde::{Deserialize, Serialize};

use super::repo_types::{NewPlate, Plate, CATEGORIES};
use crate::error::AppError;

/// Plate as returned to clients, with a fetchable photo URL.
#[derive(Debug, Serialize)]
pub struct PlateView {
    #[serde(flatten)]
    pub plate: Plate,
    pub photo_url: Option<String>,
}

/// Text fields of the `POST /plates` multipart form, as received.
#[derive(Debug, Default)]
pub struct PlateForm {
    pub restaurant: Option<String>,
    pub plate: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub rating: Option<String>,
    pub comment: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn required(v: Option<String>, field: &str) -> Result<String, AppError> {
    non_blank(v).ok_or_else(|| AppError::validation(format!("{} is required", field)))
}

/// Coordinates that are not finite numbers are stored as absent.
fn coordinate(v: Option<String>) -> Option<f64> {
    non_blank(v)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

pub fn check_rating(rating: i64) -> Result<i64, AppError> {
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        Err(AppError::validation("Rating must be between 1 and 5"))
    }
}

impl PlateForm {
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "restaurant" => &mut self.restaurant,
            "plate" => &mut self.plate,
            "category" => &mut self.category,
            "address" => &mut self.address,
            "zipcode" => &mut self.zipcode,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "rating" => &mut self.rating,
            "comment" => &mut self.comment,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn into_new_plate(
        self,
        user_id: Option<i64>,
        photo: Option<String>,
    ) -> Result<NewPlate, AppError> {
        let category = non_blank(self.category);
        if let Some(c) = &category {
            if !CATEGORIES.contains(&c.as_str()) {
                return Err(AppError::validation(format!("Unknown category {}", c)));
            }
        }
        let rating = match non_blank(self.rating) {
            Some(r) => Some(check_rating(
                r.parse::<i64>()
                    .map_err(|_| AppError::validation("Rating must be a whole number"))?,
            )?),
            None => None,
        };
        Ok(NewPlate {
            user_id,
            restaurant: required(self.restaurant, "restaurant")?,
            plate: required(self.plate, "plate")?,
            category,
            address: required(self.address, "address")?,
            zipcode: non_blank(self.zipcode),
            city: non_blank(self.city),
            state: non_blank(self.state),
            rating,
            comment: non_blank(self.comment),
            photo,
            latitude: coordinate(self.latitude),
            longitude: coordinate(self.longitude),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpinParams {
    #[serde(default)]
    pub zipcode: String,
}

#[derive(Debug, Serialize)]
pub struct SpinResponse {
    pub zipcode: String,
    pub plate: Option<PlateView>,
}
