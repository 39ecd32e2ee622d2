//! Great-circle distances for radius search.

use super::repo_types::Plate;

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A validated search center and radius, in degrees and miles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_miles: f64,
}

/// Haversine distance in miles between two `(lat, lng)` points given in degrees.
pub fn haversine_miles(a: (f64, f64), b: (f64, f64)) -> f64 {
    let lat1 = a.0.to_radians();
    let lat2 = b.0.to_radians();
    let dlat = (b.0 - a.0).to_radians();
    let dlon = (b.1 - a.1).to_radians();

    let h = (dlat / 2.0).sin() * (dlat / 2.0).sin()
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin() * (dlon / 2.0).sin();
    // Rounding can push `h` past 1 for nearly antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Plates strictly closer than the radius, in the order given.
///
/// Plates without usable coordinates are skipped; a plate exactly on the
/// boundary is left out.
pub fn within_radius(plates: Vec<Plate>, q: &RadiusQuery) -> Vec<Plate> {
    let center = (q.lat, q.lng);
    plates
        .into_iter()
        .filter(|p| {
            p.coordinates()
                .map(|point| haversine_miles(center, point) < q.radius_miles)
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn plate_at(id: i64, lat: Option<f64>, lng: Option<f64>) -> Plate {
        Plate {
            id,
            user_id: None,
            restaurant: format!("R{id}"),
            plate: format!("P{id}"),
            category: None,
            address: "somewhere".into(),
            zipcode: None,
            city: None,
            state: None,
            rating: None,
            comment: None,
            photo: None,
            latitude: lat,
            longitude: lng,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    const NYC: (f64, f64) = (40.7128, -74.0060);
    const SF: (f64, f64) = (37.7749, -122.4194);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_miles(NYC, NYC), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_miles(NYC, SF);
        let ba = haversine_miles(SF, NYC);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn new_york_to_san_francisco_is_about_2570_miles() {
        let d = haversine_miles(NYC, SF);
        assert!((2560.0..2580.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_69_miles() {
        let d = haversine_miles((0.0, 0.0), (1.0, 0.0));
        assert!((d - 69.09).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodal_points_have_finite_distance() {
        for lat in -89..=89 {
            for lng in -180..=0 {
                let a = (lat as f64, lng as f64);
                let b = (-a.0, a.1 + 180.0);
                let d = haversine_miles(a, b);
                assert!(d.is_finite(), "{a:?} -> {b:?}");
                assert!(d <= std::f64::consts::PI * EARTH_RADIUS_MILES + 1e-6);
            }
        }
    }

    #[test]
    fn opposite_side_plate_is_inside_a_huge_radius() {
        let plates = vec![plate_at(1, Some(82.0), Some(0.0))];
        let q = RadiusQuery { lat: -82.0, lng: -180.0, radius_miles: 13000.0 };
        assert_eq!(within_radius(plates, &q).len(), 1);
    }

    #[test]
    fn filter_keeps_nearby_and_skips_missing_coordinates() {
        let plates = vec![
            plate_at(4, Some(NYC.0), Some(NYC.1)),
            plate_at(3, None, None),
            plate_at(2, Some(SF.0), Some(SF.1)),
            plate_at(1, Some(40.7130), None),
        ];
        let q = RadiusQuery { lat: NYC.0, lng: NYC.1, radius_miles: 1.0 };
        let ids: Vec<i64> = within_radius(plates, &q).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn boundary_distance_is_excluded() {
        let target = (1.0, 0.0);
        let exact = haversine_miles((0.0, 0.0), target);
        let plates = vec![plate_at(1, Some(target.0), Some(target.1))];

        let at_boundary = RadiusQuery { lat: 0.0, lng: 0.0, radius_miles: exact };
        assert!(within_radius(plates.clone(), &at_boundary).is_empty());

        let just_beyond = RadiusQuery { lat: 0.0, lng: 0.0, radius_miles: exact + 1e-6 };
        assert_eq!(within_radius(plates, &just_beyond).len(), 1);
    }

    #[test]
    fn filter_preserves_input_order_not_distance() {
        let plates = vec![
            plate_at(2, Some(40.72), Some(-74.0)),
            plate_at(1, Some(40.7128), Some(-74.0060)),
        ];
        let q = RadiusQuery { lat: NYC.0, lng: NYC.1, radius_miles: 5.0 };
        let ids: Vec<i64> = within_radius(plates, &q).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn every_result_is_inside_and_every_exclusion_is_outside() {
        let plates: Vec<Plate> = (0..40)
            .map(|i| {
                let f = i as f64;
                plate_at(i, Some(40.0 + f * 0.05), Some(-74.0 + f * 0.03))
            })
            .collect();
        let q = RadiusQuery { lat: 40.5, lng: -73.7, radius_miles: 25.0 };
        let kept = within_radius(plates.clone(), &q);
        for p in &plates {
            let d = haversine_miles((q.lat, q.lng), p.coordinates().unwrap());
            let in_result = kept.iter().any(|k| k.id == p.id);
            assert_eq!(in_result, d < q.radius_miles, "plate {} at {d} miles", p.id);
        }
    }
}
