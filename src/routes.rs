use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    entities::movie,
    error::{AppError, AppResult},
    models::{AddForm, EditForm, FindQuery, NewMovie},
    templates,
};

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let mut movies = state.store.list_all().await?;
    sort_by_ranking(&mut movies);
    Ok(Html(templates::index_page(&movies)))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page(None))
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> AppResult<Html<String>> {
    let title = form.title.trim().to_string();
    if title.is_empty() {
        return Ok(Html(templates::add_page(Some("Movie title is required."))));
    }

    let options = state.tmdb.search(&title).await?;
    tracing::debug!(query = %title, results = options.len(), "searched metadata provider");

    Ok(Html(templates::select_page(&title, &options)))
}

pub async fn find(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FindQuery>,
) -> AppResult<Redirect> {
    let Some(id) = query.id else {
        return Err(AppError::BadRequest("missing id query parameter".to_string()));
    };

    let detail = state.tmdb.detail(id).await?;
    let year = detail.release_year().ok_or_else(|| {
        AppError::Provider(anyhow::anyhow!("movie {id} has no usable release date"))
    })?;

    let img_url = format!(
        "{}{}",
        state.config.tmdb_image_base_url,
        detail.poster_path.as_deref().unwrap_or_default()
    );

    let created = state
        .store
        .create(NewMovie {
            title: detail.title,
            year,
            description: detail.overview.unwrap_or_default(),
            img_url,
        })
        .await?;

    tracing::debug!(id = created.id, title = %created.title, "created movie from provider detail");

    Ok(Redirect::to(&format!("/edit/{}", created.id)))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let movie = state.store.get(id).await?;
    Ok(Html(templates::edit_page(&movie, None)))
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let movie = state.store.get(id).await?;

    let rating: f64 = match form.rating.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            return Ok(Html(templates::edit_page(&movie, Some("Rating must be a number.")))
                .into_response());
        },
    };

    let ranking: i32 = match form.rank.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            return Ok(Html(templates::edit_page(&movie, Some("Rank must be a whole number.")))
                .into_response());
        },
    };

    let review = form.review.trim().to_string();
    if review.is_empty() {
        return Ok(Html(templates::edit_page(&movie, Some("Review is required."))).into_response());
    }

    state.store.update_review(id, rating, review, ranking).await?;

    Ok(Redirect::to("/").into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    state.store.delete(id).await?;
    Ok(Redirect::to("/"))
}

/// Display order: ranking descending. The stable sort keeps the store's
/// title ordering among ties, and unranked records sink to the end.
fn sort_by_ranking(movies: &mut [movie::Model]) {
    movies.sort_by_key(|m| std::cmp::Reverse(m.ranking.unwrap_or(i32::MIN)));
}

#[cfg(test)]
mod tests {
    use super::sort_by_ranking;
    use crate::entities::movie;

    fn model(title: &str, ranking: Option<i32>) -> movie::Model {
        movie::Model {
            id: 0,
            title: title.to_string(),
            year: 2000,
            description: String::new(),
            rating: None,
            ranking,
            review: None,
            img_url: String::new(),
        }
    }

    #[test]
    fn orders_by_ranking_descending() {
        let mut movies =
            vec![model("A", Some(8)), model("B", Some(5)), model("C", Some(9))];
        sort_by_ranking(&mut movies);
        let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B"]);
    }

    #[test]
    fn ties_keep_title_order_and_unranked_sink() {
        let mut movies = vec![
            model("Alien", Some(7)),
            model("Brazil", Some(7)),
            model("Casablanca", None),
        ];
        sort_by_ranking(&mut movies);
        let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Alien", "Brazil", "Casablanca"]);
    }
}
