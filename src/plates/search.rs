use serde::Deserialize;

use super::{
    geo::{within_radius, RadiusQuery},
    repo_types::Plate,
};

/// Query string of `GET /search`. Numbers arrive as text so that a malformed
/// value falls back to text search instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub radius: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    Text(String),
    Radius(RadiusQuery),
}

impl SearchParams {
    /// Radius mode needs all three numbers; otherwise the text query is used.
    pub fn mode(&self) -> SearchMode {
        let number = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|n| n.is_finite())
        };
        match (number(&self.radius), number(&self.lat), number(&self.lng)) {
            (Some(radius_miles), Some(lat), Some(lng)) => SearchMode::Radius(RadiusQuery {
                lat,
                lng,
                radius_miles,
            }),
            _ => SearchMode::Text(self.q.clone()),
        }
    }
}

/// Case-insensitive substring match on any of the descriptive fields.
pub fn matches_text(plate: &Plate, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    let fields = [
        Some(plate.restaurant.as_str()),
        Some(plate.plate.as_str()),
        plate.category.as_deref(),
        Some(plate.address.as_str()),
        plate.zipcode.as_deref(),
        plate.city.as_deref(),
        plate.state.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(needle_lower))
}

pub fn filter_text(plates: Vec<Plate>, query: &str) -> Vec<Plate> {
    let needle = query.to_lowercase();
    plates
        .into_iter()
        .filter(|p| matches_text(p, &needle))
        .collect()
}

/// Apply the selected filter to plates already in store order.
pub fn apply(plates: Vec<Plate>, mode: &SearchMode) -> Vec<Plate> {
    match mode {
        SearchMode::Text(q) => filter_text(plates, q),
        SearchMode::Radius(r) => within_radius(plates, r),
    }
}
