use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, QueryOrder, Set,
};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::NewMovie,
};

/// Persistence handle for movie records, injected into each handler via
/// application state.
#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// All records, ordered by title ascending.
    pub async fn list_all(&self) -> AppResult<Vec<movie::Model>> {
        let movies = movie::Entity::find()
            .order_by_asc(movie::Column::Title)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    pub async fn get(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id).one(&self.db).await?.ok_or(AppError::NotFound)
    }

    /// Insert a new record with rating, ranking, and review unset. A duplicate
    /// title surfaces as [`AppError::Conflict`].
    pub async fn create(&self, new: NewMovie) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(None),
            ranking: Set(None),
            review: Set(None),
            img_url: Set(new.img_url),
        };

        let res = movie::Entity::insert(model).exec(&self.db).await?;
        self.get(res.last_insert_id).await
    }

    /// Overwrite exactly the rating, review, and ranking columns.
    pub async fn update_review(
        &self,
        id: i32,
        rating: f64,
        review: String,
        ranking: i32,
    ) -> AppResult<movie::Model> {
        let mut model: movie::ActiveModel = self.get(id).await?.into();
        model.rating = Set(Some(rating));
        model.review = Set(Some(review));
        model.ranking = Set(Some(ranking));

        let updated = model.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
