//! Film profile registry.
//!
//! The registry is format-agnostic to the core: profiles either come from
//! the built-in table (the parameters shipped with the app) or from an
//! external JSON catalog. The core only reads each film's `params`.
//!
//! This module also hosts the query surface the host application consumes:
//! `corrected_exposure(film_id, base_seconds)` and `curve(film_id, grid)`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CurvePoint, FilmProfile};
use crate::error::AppError;
use crate::model;

pub mod films;

/// An in-memory film catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    films: Vec<FilmProfile>,
}

impl Catalog {
    /// The built-in profiles.
    pub fn builtin() -> Self {
        Self {
            films: films::builtin_films(),
        }
    }

    /// Load a catalog from a JSON file (an array of film profiles).
    ///
    /// Every parameter set is re-checked on load; a malformed profile is a
    /// configuration error, not something to ship around.
    pub fn from_json(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(2, format!("Failed to open catalog '{}': {e}", path.display()))
        })?;
        let films: Vec<FilmProfile> = serde_json::from_reader(file)
            .map_err(|e| AppError::new(2, format!("Invalid catalog JSON: {e}")))?;
        for film in &films {
            film.params
                .check()
                .map_err(|e| AppError::new(2, format!("Film '{}': {e}", film.id)))?;
        }
        Ok(Self { films })
    }

    pub fn films(&self) -> &[FilmProfile] {
        &self.films
    }

    pub fn get(&self, id: &str) -> Option<&FilmProfile> {
        self.films.iter().find(|f| f.id == id)
    }

    fn require(&self, id: &str) -> Result<&FilmProfile, AppError> {
        self.get(id)
            .ok_or_else(|| AppError::new(2, format!("Unknown film id '{id}'.")))
    }

    /// Corrected exposure time (whole seconds) for one film and base time.
    pub fn corrected_exposure(&self, id: &str, base_seconds: f64) -> Result<f64, AppError> {
        if !(base_seconds.is_finite() && base_seconds > 0.0) {
            return Err(AppError::new(
                2,
                format!("Base exposure must be finite and > 0 (got {base_seconds})."),
            ));
        }
        let film = self.require(id)?;
        Ok(model::corrected(base_seconds, &film.params))
    }

    /// Corrected curve over a time grid (for display).
    pub fn curve(&self, id: &str, grid: &[f64]) -> Result<Vec<CurvePoint>, AppError> {
        let film = self.require(id)?;
        Ok(model::curve(&film.params, grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CANONICAL_GRID;

    #[test]
    fn builtin_catalog_has_unique_ids() {
        let catalog = Catalog::builtin();
        let mut ids: Vec<&str> = catalog.films().iter().map(|f| f.id.as_str()).collect();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
        // Every parametrized profile the legacy app shipped is carried.
        assert!(n >= 44);
    }

    #[test]
    fn corrected_exposure_query() {
        let catalog = Catalog::builtin();
        // Portra 400 at 30 minutes saturates at 4x.
        let corrected = catalog.corrected_exposure("kodak_portra400", 1800.0).unwrap();
        assert_eq!(corrected, 7200.0);
        // Toe: nothing to compensate.
        assert_eq!(catalog.corrected_exposure("kodak_portra400", 10.0).unwrap(), 10.0);
    }

    #[test]
    fn unknown_film_is_a_config_error() {
        let catalog = Catalog::builtin();
        let err = catalog.corrected_exposure("nope", 60.0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(catalog.curve("nope", &CANONICAL_GRID).is_err());
    }

    #[test]
    fn nonpositive_base_is_rejected() {
        let catalog = Catalog::builtin();
        assert!(catalog.corrected_exposure("kodak_portra400", 0.0).is_err());
        assert!(catalog.corrected_exposure("kodak_portra400", -5.0).is_err());
    }

    #[test]
    fn curve_query_covers_grid() {
        let catalog = Catalog::builtin();
        let pts = catalog.curve("ilford_hp5", &CANONICAL_GRID).unwrap();
        assert_eq!(pts.len(), CANONICAL_GRID.len());
        assert!(pts.iter().all(|p| p.corrected_seconds >= p.base_seconds));
    }
}
