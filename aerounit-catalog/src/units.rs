//! Unit catalog - units indexed by id, symbol and label

use std::collections::{HashMap, HashSet};
use aerounit_core::{EngineError, Unit, UnitId};
use tracing::warn;

/// Index over the units published by the catalog service
#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    units: Vec<Unit>,
    by_id: HashMap<UnitId, usize>,
    /// Lowercased symbols and labels
    names: HashMap<String, usize>,
}

impl UnitCatalog {
    pub fn new(units: impl IntoIterator<Item = Unit>) -> Self {
        let mut catalog = UnitCatalog::default();
        for unit in units {
            catalog.register(unit);
        }
        catalog
    }

    fn register(&mut self, unit: Unit) {
        if self.by_id.contains_key(&unit.id) {
            warn!(unit = %unit.id, "duplicate unit id in catalog, keeping first");
            return;
        }
        let idx = self.units.len();
        self.by_id.insert(unit.id.clone(), idx);
        // Symbol wins over a label that happens to collide with it
        self.names.entry(unit.symbol.to_lowercase()).or_insert(idx);
        self.names.entry(unit.label.to_lowercase()).or_insert(idx);
        self.units.push(unit);
    }

    pub fn get(&self, id: &UnitId) -> Option<&Unit> {
        self.by_id.get(id).map(|&idx| &self.units[idx])
    }

    /// Find a unit by symbol or label, ignoring case.
    ///
    /// On a miss the error suggests up to five similar symbols.
    pub fn lookup(&self, name: &str) -> Result<&Unit, EngineError> {
        let key = name.trim().to_lowercase();
        if let Some(&idx) = self.names.get(&key) {
            return Ok(&self.units[idx]);
        }

        let mut err = EngineError::unknown_unit(name.trim());
        let similar = self.find_similar(&key);
        if !similar.is_empty() {
            let suggestions: Vec<&str> = similar.iter().take(5).copied().collect();
            err = err.with_suggestion(format!("Similar: {}", suggestions.join(", ")));
        }
        Err(err)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit symbols ranked by similarity to `query`
    fn find_similar(&self, query: &str) -> Vec<&str> {
        let mut matches: Vec<(&str, usize)> = self.units.iter()
            .filter_map(|unit| {
                let score = Self::similarity_score(query, &unit.symbol.to_lowercase())
                    .max(Self::similarity_score(query, &unit.label.to_lowercase()));
                (score > 0).then_some((unit.symbol.as_str(), score))
            })
            .collect();

        // Higher score first, stable for equal scores
        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(symbol, _)| symbol).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        if query.is_empty() || candidate.is_empty() {
            return 0;
        }

        let mut score = 0;
        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        // A single shared letter is noise for two- and three-letter symbols
        if common >= 2 {
            score += common * 2;
        }

        score
    }
}
