use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{MovieCandidate, MovieDetail},
};

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String, rps: u32) -> Self {
        let limiter =
            Arc::new(RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps.max(1)).unwrap())));
        Self { client, api_key, base_url, limiter }
    }

    /// Search movies by title. An empty result list is a normal outcome.
    pub async fn search(&self, title: &str) -> AppResult<Vec<MovieCandidate>> {
        self.limiter.until_ready().await;

        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: SearchResponse = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let candidates = resp
            .results
            .into_iter()
            .map(|m| MovieCandidate {
                id: m.id,
                title: m.title.unwrap_or_default(),
                release_date: m.release_date.filter(|d| !d.is_empty()),
                poster_path: m.poster_path,
                overview: m.overview,
            })
            .collect();

        Ok(candidates)
    }

    /// Fetch the detail payload for one movie; called once per add flow.
    pub async fn detail(&self, id: i32) -> AppResult<MovieDetail> {
        self.limiter.until_ready().await;

        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), id);
        let resp: DetailResponse = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(MovieDetail {
            title: resp.title.unwrap_or_default(),
            release_date: resp.release_date.filter(|d| !d.is_empty()),
            poster_path: resp.poster_path,
            overview: resp.overview,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchMovie>,
}

#[derive(Debug, Deserialize)]
struct SearchMovie {
    id: i32,
    title: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    title: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
}
