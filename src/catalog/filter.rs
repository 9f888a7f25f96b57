//! Client side search and filtering of the trail list
use super::{Difficulty, Park, ParkRef, Trail};
use std::collections::BTreeSet;

/// Longest trail shown when no length filter was chosen
pub const DEFAULT_MAX_LENGTH_KM: f64 = 50.0;

/// Active filters applied to the trail list, empty fields don't filter anything
#[derive(Clone, Debug, PartialEq)]
pub struct TrailFilter {
    pub search: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub park: Option<String>,
    pub max_length_km: f64,
}

impl Default for TrailFilter {
    fn default() -> Self {
        TrailFilter {
            search: None,
            difficulty: None,
            park: None,
            max_length_km: DEFAULT_MAX_LENGTH_KM,
        }
    }
}

impl TrailFilter {
    pub fn with_max_length(max_length_km: f64) -> Self {
        TrailFilter {
            max_length_km,
            ..Self::default()
        }
    }

    /// Reset every filter, keeping the configured length limit
    pub fn clear(&mut self, max_length_km: f64) {
        *self = Self::with_max_length(max_length_km);
    }

    /// True if the trail passes every active filter. `parks` is used to resolve park ids.
    pub fn matches(&self, trail: &Trail, parks: &[Park]) -> bool {
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            if !trail.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }

        if let Some(difficulty) = self.difficulty {
            if trail.difficulty != difficulty {
                return false;
            }
        }

        if let Some(park) = self.park.as_deref().filter(|p| !p.is_empty()) {
            match park_name(trail, parks) {
                Some(name) if name == park => {}
                _ => return false,
            }
        }

        trail.length_km <= self.max_length_km
    }

    /// Trails passing the filters, in their original order
    pub fn apply<'a>(&self, trails: &'a [Trail], parks: &[Park]) -> Vec<&'a Trail> {
        trails.iter().filter(|t| self.matches(t, parks)).collect()
    }
}

/// Name of the park a trail belongs to, if it can be resolved
pub fn park_name<'a>(trail: &'a Trail, parks: &'a [Park]) -> Option<&'a str> {
    match trail.park.as_ref()? {
        ParkRef::Name(name) => Some(name.as_str()),
        ParkRef::Id(id) => parks
            .iter()
            .find(|p| p.id == Some(*id))
            .map(|p| p.name.as_str()),
    }
}

/// Unique park names sorted alphabetically
pub fn park_names(parks: &[Park]) -> Vec<&str> {
    parks
        .iter()
        .map(|p| p.name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail(name: &str, difficulty: Difficulty, length_km: f64, park: Option<ParkRef>) -> Trail {
        Trail {
            id: None,
            name: name.to_string(),
            difficulty,
            length_km,
            elevation_gain_m: 0.0,
            description: None,
            park,
            path: Vec::new(),
        }
    }

    fn park(id: u64, name: &str) -> Park {
        Park {
            id: Some(id),
            name: name.to_string(),
            location: None,
            area_hectares: None,
            boundary: Vec::new(),
        }
    }

    fn sample() -> (Vec<Trail>, Vec<Park>) {
        let parks = vec![park(1, "Ticknock"), park(2, "Ballyhoura")];
        let trails = vec![
            trail("Wicklow Way MTB", Difficulty::Beginner, 16.3, Some(ParkRef::Id(1))),
            trail("Ballyhoura Blue", Difficulty::Beginner, 7.9, Some(ParkRef::Id(2))),
            trail(
                "Davagh Forest Red",
                Difficulty::Intermediate,
                14.6,
                Some(ParkRef::Name("Davagh".to_string())),
            ),
            trail("Long Haul", Difficulty::Expert, 82.0, None),
        ];
        (trails, parks)
    }

    fn names<'a>(trails: &[&'a Trail]) -> Vec<&'a str> {
        trails.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_default_filter_only_limits_length() {
        let (trails, parks) = sample();
        let shown = TrailFilter::default().apply(&trails, &parks);
        assert_eq!(shown.len(), 3);
        let shown = TrailFilter::with_max_length(100.0).apply(&trails, &parks);
        assert_eq!(shown.len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (trails, parks) = sample();
        let filter = TrailFilter {
            search: Some("BLUE".to_string()),
            ..TrailFilter::default()
        };
        assert_eq!(names(&filter.apply(&trails, &parks)), vec!["Ballyhoura Blue"]);
    }

    #[test]
    fn test_difficulty_and_length() {
        let (trails, parks) = sample();
        let filter = TrailFilter {
            difficulty: Some(Difficulty::Beginner),
            max_length_km: 10.0,
            ..TrailFilter::default()
        };
        assert_eq!(names(&filter.apply(&trails, &parks)), vec!["Ballyhoura Blue"]);
    }

    #[test]
    fn test_park_by_id_and_name() {
        let (trails, parks) = sample();
        let mut filter = TrailFilter {
            park: Some("Ticknock".to_string()),
            ..TrailFilter::default()
        };
        assert_eq!(names(&filter.apply(&trails, &parks)), vec!["Wicklow Way MTB"]);
        filter.park = Some("Davagh".to_string());
        assert_eq!(names(&filter.apply(&trails, &parks)), vec!["Davagh Forest Red"]);
    }

    #[test]
    fn test_clear() {
        let mut filter = TrailFilter {
            search: Some("x".to_string()),
            difficulty: Some(Difficulty::Expert),
            park: Some("y".to_string()),
            max_length_km: 5.0,
        };
        filter.clear(30.0);
        assert_eq!(filter, TrailFilter::with_max_length(30.0));
    }

    #[test]
    fn test_park_names_unique_and_sorted() {
        let parks = vec![park(1, "Ticknock"), park(2, "Ballyhoura"), park(3, "Ticknock")];
        assert_eq!(park_names(&parks), vec!["Ballyhoura", "Ticknock"]);
    }
}
