use serde::Deserialize;

/// Title-entry form on the add page.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub title: String,
}

/// Edit form; values arrive as raw strings and are coerced in the handler.
#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub rating: String,
    pub review: String,
    pub rank: String,
}

#[derive(Debug, Deserialize)]
pub struct FindQuery {
    pub id: Option<i32>,
}

/// One search result from the metadata provider.
#[derive(Clone, Debug)]
pub struct MovieCandidate {
    pub id: i32,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
}

/// Full detail payload for a single movie.
#[derive(Clone, Debug)]
pub struct MovieDetail {
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
}

impl MovieDetail {
    /// Release year as the 4-digit prefix of the release date, when usable.
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        date.get(..4)?.parse().ok()
    }
}

/// Input for a new record; rating, ranking, and review start unset.
#[derive(Clone, Debug)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}
