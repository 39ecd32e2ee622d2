use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{
    dto::{check_rating, PlateForm, PlateView},
    repo,
    repo_types::Plate,
    search::{self, SearchMode},
    spin,
};
use crate::{
    error::AppError,
    images::services::{ext_from_mime, photo_url, store_plate_photo, UploadItem},
    state::AppState,
};

/// Validate the form, store the photo if any, insert the plate.
pub async fn create_plate(
    state: &AppState,
    user_id: Option<i64>,
    form: PlateForm,
    photo: Option<UploadItem>,
) -> Result<Plate, AppError> {
    // No upload happens for a rejected form.
    let mut new = form.into_new_plate(user_id, None)?;
    if let Some(img) = photo {
        if ext_from_mime(&img.content_type).is_none() {
            return Err(AppError::validation("Photo must be a JPEG, PNG, WebP, HEIC or GIF image"));
        }
        new.photo = Some(store_plate_photo(state.storage.as_ref(), img).await?);
    }
    let id = repo::insert(&state.db, &new).await?;
    info!(plate_id = id, ?user_id, restaurant = %new.restaurant, "plate posted");
    repo::get(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Plate"))
}

/// Set rating and comment on an unrated plate owned by `user_id`.
pub async fn rate_plate(
    db: &SqlitePool,
    user_id: i64,
    plate_id: i64,
    rating: i64,
    comment: Option<&str>,
) -> Result<Plate, AppError> {
    let rating = check_rating(rating)?;
    let plate = repo::get(db, plate_id)
        .await?
        .ok_or(AppError::NotFound("Plate"))?;
    if plate.user_id != Some(user_id) {
        warn!(user_id, plate_id, owner = ?plate.user_id, "rating rejected: not the owner");
        return Err(AppError::Forbidden);
    }
    if plate.rating.is_some() {
        return Err(AppError::Conflict("Plate has already been rated".into()));
    }
    let comment = comment.map(str::trim).filter(|c| !c.is_empty());
    if !repo::update_rating_and_comment(db, plate_id, rating, comment).await? {
        // Lost a race with another rating of the same plate.
        return Err(AppError::Conflict("Plate has already been rated".into()));
    }
    info!(user_id, plate_id, rating, "plate rated");
    repo::get(db, plate_id)
        .await?
        .ok_or(AppError::NotFound("Plate"))
}

pub async fn search(db: &SqlitePool, mode: &SearchMode) -> anyhow::Result<Vec<Plate>> {
    let plates = repo::list_all(db).await?;
    Ok(search::apply(plates, mode))
}

/// One random plate in the zip code, or `None` when there is nothing to pick.
pub async fn spin(db: &SqlitePool, zipcode: &str) -> anyhow::Result<Option<Plate>> {
    let candidates = repo::list_by_zipcode(db, zipcode).await?;
    Ok(spin::pick(candidates, &mut rand::thread_rng()))
}

pub async fn to_view(state: &AppState, plate: Plate) -> PlateView {
    let photo_url = match &plate.photo {
        Some(key) => match photo_url(state.storage.as_ref(), key).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, plate_id = plate.id, "photo url unavailable");
                None
            }
        },
        None => None,
    };
    PlateView { plate, photo_url }
}

pub async fn to_views(state: &AppState, plates: Vec<Plate>) -> Vec<PlateView> {
    let mut out = Vec::with_capacity(plates.len());
    for p in plates {
        out.push(to_view(state, p).await);
    }
    out
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::{auth::services::register_user, plates::repo::sample, plates::search::SearchParams};

    fn form(pairs: &[(&str, &str)]) -> PlateForm {
        let mut f = PlateForm::default();
        for (k, v) in pairs {
            f.set(k, v.to_string());
        }
        f
    }

    #[tokio::test]
    async fn radius_search_includes_plate_at_center() {
        let state = AppState::for_tests().await;
        let mut new = sample("Big Burger Place", "Classic Cheeseburger");
        new.latitude = Some(40.7128);
        new.longitude = Some(-74.0060);
        let id = repo::insert(&state.db, &new).await.unwrap();

        let params = SearchParams {
            q: String::new(),
            radius: Some("1".into()),
            lat: Some("40.7128".into()),
            lng: Some("-74.0060".into()),
        };
        let found = search(&state.db, &params.mode()).await.unwrap();
        assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![id]);
    }

    #[tokio::test]
    async fn radius_search_excludes_far_plate() {
        let state = AppState::for_tests().await;
        let mut new = sample("Null Island Cafe", "Nothing");
        new.latitude = Some(0.0);
        new.longitude = Some(0.0);
        repo::insert(&state.db, &new).await.unwrap();

        let params = SearchParams {
            q: String::new(),
            radius: Some("5".into()),
            lat: Some("10".into()),
            lng: Some("10".into()),
        };
        assert!(search(&state.db, &params.mode()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn text_search_runs_against_store_order() {
        let state = AppState::for_tests().await;
        let a = repo::insert(&state.db, &sample("Taco Spot", "Fish Tacos")).await.unwrap();
        repo::insert(&state.db, &sample("Sushi World", "Nigiri")).await.unwrap();
        let c = repo::insert(&state.db, &sample("TACO Bell", "Crunchwrap")).await.unwrap();

        let found = search(&state.db, &SearchMode::Text("taco".into())).await.unwrap();
        assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![c, a]);
        assert_eq!(search(&state.db, &SearchMode::Text(String::new())).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn rating_someone_elses_plate_is_forbidden_and_unchanged() {
        let state = AppState::for_tests().await;
        let owner = register_user(&state.db, "owner", "password123", None).await.unwrap();
        let other = register_user(&state.db, "other", "password123", None).await.unwrap();
        let mut new = sample("A", "a");
        new.user_id = Some(owner.id);
        let id = repo::insert(&state.db, &new).await.unwrap();

        let err = rate_plate(&state.db, other.id, id, 5, Some("mine now")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        let plate = repo::get(&state.db, id).await.unwrap().unwrap();
        assert_eq!(plate.rating, None);
        assert_eq!(plate.comment, None);

        let rated = rate_plate(&state.db, owner.id, id, 4, Some(" tasty ")).await.unwrap();
        assert_eq!(rated.rating, Some(4));
        assert_eq!(rated.comment.as_deref(), Some("tasty"));
    }

    #[tokio::test]
    async fn second_rating_is_rejected_and_first_kept() {
        let state = AppState::for_tests().await;
        let owner = register_user(&state.db, "owner", "password123", None).await.unwrap();
        let mut new = sample("A", "a");
        new.user_id = Some(owner.id);
        let id = repo::insert(&state.db, &new).await.unwrap();

        rate_plate(&state.db, owner.id, id, 2, Some("meh")).await.unwrap();
        let err = rate_plate(&state.db, owner.id, id, 5, Some("changed")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let plate = repo::get(&state.db, id).await.unwrap().unwrap();
        assert_eq!(plate.rating, Some(2));
        assert_eq!(plate.comment.as_deref(), Some("meh"));
    }

    #[tokio::test]
    async fn anonymous_plate_cannot_be_rated() {
        let state = AppState::for_tests().await;
        let user = register_user(&state.db, "alice", "password123", None).await.unwrap();
        let id = repo::insert(&state.db, &sample("A", "a")).await.unwrap();
        assert!(matches!(
            rate_plate(&state.db, user.id, id, 3, None).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn rating_missing_plate_or_bad_value() {
        let state = AppState::for_tests().await;
        assert!(matches!(
            rate_plate(&state.db, 1, 404, 3, None).await,
            Err(AppError::NotFound("Plate"))
        ));
        assert!(matches!(
            rate_plate(&state.db, 1, 404, 9, None).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn spin_with_zero_and_one_match() {
        let state = AppState::for_tests().await;
        assert!(spin(&state.db, "03867").await.unwrap().is_none());

        let mut new = sample("Lilac City Grill", "Chowder");
        new.zipcode = Some("03867".into());
        let id = repo::insert(&state.db, &new).await.unwrap();
        for _ in 0..5 {
            assert_eq!(spin(&state.db, "03867").await.unwrap().map(|p| p.id), Some(id));
        }
        assert!(spin(&state.db, "10001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_plate_stores_photo_key() {
        let state = AppState::for_tests().await;
        let plate = create_plate(
            &state,
            None,
            form(&[("restaurant", "R"), ("plate", "P"), ("address", "A")]),
            Some(UploadItem {
                body: Bytes::from_static(b"png"),
                content_type: "image/png".into(),
            }),
        )
        .await
        .unwrap();
        let key = plate.photo.clone().expect("photo key");
        assert!(key.ends_with(".png"));

        let view = to_view(&state, plate).await;
        assert_eq!(view.photo_url, Some(format!("https://fake.local/{}", key)));
    }

    #[tokio::test]
    async fn create_plate_rejects_bad_form_before_upload() {
        let state = AppState::for_tests().await;
        let err = create_plate(&state, None, form(&[("restaurant", "R")]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(repo::list_all(&state.db).await.unwrap().is_empty());
    }
}
