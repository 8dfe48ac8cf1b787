use serde::Deserialize;

use cinedeck_core::models::Movie;

use super::error::FetchError;

/// A movie record as the catalog backend serves it.
#[derive(Debug, Deserialize)]
pub struct CatalogMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub poster: String,
}

impl TryFrom<CatalogMovie> for Movie {
    type Error = FetchError;

    fn try_from(raw: CatalogMovie) -> Result<Self, Self::Error> {
        let movie = Movie {
            id: raw.id,
            title: raw.title,
            year: raw.year,
            director: raw.director,
            genres: raw.genre,
            plot: raw.plot,
            rating: raw.rating,
            poster_url: raw.poster,
        };
        if !movie.has_valid_rating() {
            return Err(FetchError::Malformed(format!(
                "movie {} has rating {} outside 0-10",
                movie.id, movie.rating
            )));
        }
        Ok(movie)
    }
}

/// Decode the full collection. A body that is not an array of records is
/// `Malformed`; records with an out-of-range rating are skipped.
pub fn parse_collection(body: &str) -> Result<Vec<Movie>, FetchError> {
    let raw: Vec<CatalogMovie> =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    let total = raw.len();
    let movies: Vec<Movie> = raw
        .into_iter()
        .filter_map(|record| match Movie::try_from(record) {
            Ok(movie) => Some(movie),
            Err(e) => {
                tracing::warn!("Skipping catalog record: {e}");
                None
            }
        })
        .collect();
    if movies.len() < total {
        tracing::debug!(kept = movies.len(), total, "Catalog records filtered");
    }
    Ok(movies)
}

/// Decode a single record. `null` and `{}` mean the id does not exist.
pub fn parse_single(id: u64, body: &str) -> Result<Movie, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Err(FetchError::NotFound(id));
    }

    let raw: CatalogMovie =
        serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))?;
    Movie::try_from(raw)
}
