use serde::{Deserialize, Serialize};

/// Highest rating the catalog hands out.
pub const MAX_RATING: f32 = 10.0;

/// A catalog movie. Identity is `id`; everything else is display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub year: u32,
    pub director: String,
    pub genres: Vec<String>,
    pub plot: String,
    pub rating: f32,
    pub poster_url: String,
}

impl Movie {
    /// Case-insensitive substring match on the title.
    ///
    /// `needle` must already be lowercased.
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
    }

    /// Whether the rating sits on the 0–10 scale.
    pub fn has_valid_rating(&self) -> bool {
        self.rating.is_finite() && (0.0..=MAX_RATING).contains(&self.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, rating: f32) -> Movie {
        Movie {
            id: 1,
            title: title.into(),
            year: 2008,
            director: "Christopher Nolan".into(),
            genres: vec!["Action".into(), "Crime".into()],
            plot: String::new(),
            rating,
            poster_url: String::new(),
        }
    }

    #[test]
    fn test_title_contains_ignores_case() {
        let m = movie("The Dark Knight", 9.0);
        assert!(m.title_contains("dark"));
        assert!(m.title_contains("knight"));
        assert!(!m.title_contains("batman"));
    }

    #[test]
    fn test_rating_bounds() {
        assert!(movie("A", 0.0).has_valid_rating());
        assert!(movie("A", 10.0).has_valid_rating());
        assert!(!movie("A", 10.5).has_valid_rating());
        assert!(!movie("A", -1.0).has_valid_rating());
        assert!(!movie("A", f32::NAN).has_valid_rating());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(movie("A", 5.0)).unwrap();
        assert!(json.get("posterUrl").is_some());
        assert!(json.get("poster_url").is_none());
    }
}
