//! Shared test harness: in-memory database, the full application served on a
//! random port, and a stub metadata provider for add-flow tests.

#![allow(dead_code)]

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query},
    routing::get,
};
use migration::{Migrator, MigratorTrait};
use reelrank::{
    AppState, build_router, config::Config, models::NewMovie, store::MovieStore, tmdb::TmdbClient,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};

pub struct TestApp {
    pub addr: SocketAddr,
    pub store: MovieStore,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn in_memory_db() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// Serve the application with a provider base URL that is never contacted.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_provider("http://127.0.0.1:9".to_string()).await
}

pub async fn spawn_app_with_provider(tmdb_base_url: String) -> TestApp {
    let db = in_memory_db().await;
    let store = MovieStore::new(db);

    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        tmdb_api_key: "test-key".to_string(),
        tmdb_base_url: tmdb_base_url.clone(),
        tmdb_image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
        database_url: "sqlite::memory:".to_string(),
        tmdb_rps: 50,
    };

    let tmdb = TmdbClient::new(reqwest::Client::new(), "test-key".to_string(), tmdb_base_url, 50);

    let state =
        Arc::new(AppState { config: Arc::new(config), store: store.clone(), tmdb: Arc::new(tmdb) });

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Redirects stay unfollowed so tests can assert on them directly.
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, store, client }
}

/// Stub TMDB server with canned search and detail payloads.
pub async fn spawn_tmdb_stub() -> SocketAddr {
    async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let query = params.get("query").cloned().unwrap_or_default();
        if query == "Nothing" {
            return Json(json!({ "results": [] }));
        }
        Json(json!({
            "results": [
                {
                    "id": 603,
                    "title": "The Matrix",
                    "release_date": "1999-03-30",
                    "poster_path": "/matrix.jpg",
                    "overview": "A hacker learns the truth about his reality."
                },
                {
                    "id": 604,
                    "title": "The Matrix Reloaded",
                    "release_date": "2003-05-15",
                    "poster_path": "/reloaded.jpg",
                    "overview": "Neo returns."
                }
            ]
        }))
    }

    async fn detail(Path(id): Path<i32>) -> Json<Value> {
        match id {
            603 => Json(json!({
                "id": 603,
                "title": "The Matrix",
                "release_date": "1999-03-30",
                "poster_path": "/matrix.jpg",
                "overview": "A hacker learns the truth about his reality."
            })),
            // No release date at all.
            999 => Json(json!({
                "id": 999,
                "title": "Lost Reel",
                "overview": "Shelved before release."
            })),
            _ => Json(json!({
                "id": id,
                "title": "Unknown",
                "release_date": "2000-01-01",
                "poster_path": null,
                "overview": "n/a"
            })),
        }
    }

    let app =
        Router::new().route("/search/movie", get(search)).route("/movie/{id}", get(detail));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn new_movie(title: &str) -> NewMovie {
    NewMovie {
        title: title.to_string(),
        year: 2000,
        description: format!("{title} description"),
        img_url: format!("https://image.tmdb.org/t/p/w500/{title}.jpg"),
    }
}

/// Seed a record through the store, then rank it the way the edit flow would.
pub async fn seed_ranked_movie(store: &MovieStore, title: &str, ranking: i32) -> i32 {
    let movie = store.create(new_movie(title)).await.expect("create movie");
    store
        .update_review(movie.id, 7.0, format!("{title} review"), ranking)
        .await
        .expect("rank movie");
    movie.id
}
