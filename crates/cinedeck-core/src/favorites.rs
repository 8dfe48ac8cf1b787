use crate::models::Movie;

/// The user's favorited movies: unique by id, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesSet {
    movies: Vec<Movie>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from persisted data. Later duplicates of an id are dropped.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let mut set = Self::new();
        for movie in movies {
            set.insert(movie);
        }
        set
    }

    /// Append `movie` unless its id is already present. Returns whether the
    /// set changed.
    pub fn insert(&mut self, movie: Movie) -> bool {
        if self.contains(movie.id) {
            return false;
        }
        self.movies.push(movie);
        true
    }

    /// Drop the entry with `id`. Returns whether the set changed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.movies.len();
        self.movies.retain(|m| m.id != id);
        self.movies.len() != before
    }

    pub fn contains(&self, id: u64) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Serialized form written under the `favorites` key.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.movies)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let movies: Vec<Movie> = serde_json::from_str(raw)?;
        Ok(Self::from_movies(movies))
    }
}
