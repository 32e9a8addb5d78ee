// src/application/services/logo_catalog.rs
use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::logo::{compare_leagues, search_key, ManifestEntry, TeamLogo};

/// The searchable catalog of club logos built from the manifest
#[derive(Debug, Clone, Default)]
pub struct LogoCatalog {
    logos: Vec<TeamLogo>,
}

impl LogoCatalog {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        let logos: Vec<TeamLogo> = entries.into_iter().map(TeamLogo::from_manifest).collect();
        debug!("Catalog holds {} logos", logos.len());
        Self { logos }
    }

    pub fn all(&self) -> &[TeamLogo] {
        &self.logos
    }

    pub fn len(&self) -> usize {
        self.logos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logos.is_empty()
    }

    /// Logos filtered by league (case-insensitive exact) and by a name
    /// substring compared in upper-cased NFKC form
    #[instrument(skip(self), level = "debug")]
    pub fn logos(&self, league: Option<&str>, search: Option<&str>) -> Vec<TeamLogo> {
        let league = league.filter(|l| !l.is_empty()).map(str::to_uppercase);
        let term = search.filter(|s| !s.is_empty()).map(search_key);

        self.logos
            .iter()
            .filter(|logo| match &league {
                Some(league) => logo.league.as_deref().unwrap_or("").to_uppercase() == *league,
                None => true,
            })
            .filter(|logo| match &term {
                Some(term) => search_key(&logo.name).contains(term.as_str()),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Distinct leagues, priority leagues first
    pub fn leagues(&self) -> Vec<String> {
        self.logos
            .iter()
            .map(|logo| logo.league_or_default().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .sorted_by(|a, b| compare_leagues(a, b))
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&TeamLogo> {
        self.logos.iter().find(|logo| logo.id == id)
    }

    /// Logos whose id is in `ids`, in catalog order
    pub fn by_ids(&self, ids: &[String]) -> Vec<TeamLogo> {
        self.logos
            .iter()
            .filter(|logo| ids.contains(&logo.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::logo::UNCATEGORIZED_LEAGUE;

    fn entry(name: &str, league: Option<&str>) -> ManifestEntry {
        ManifestEntry {
            name: name.to_string(),
            path: format!("assets/logos/{}.png", name),
            league: league.map(str::to_string),
        }
    }

    fn catalog() -> LogoCatalog {
        LogoCatalog::new(vec![
            entry("ΠΑΟΚ", Some("SUPERLEAGUE")),
            entry("ΑΕΚ", Some("SUPERLEAGUE")),
            entry("Panionios", Some("SUPERLEAGUE 2")),
            entry("Ionikos", Some("Γ ΕΘΝΙΚΗ")),
            entry("Chios Stars", Some("ΕΠΣ ΧΙΟΥ")),
            entry("Loose", None),
        ])
    }

    #[test]
    fn given_league_in_other_case_when_logos_then_matches() {
        let found = catalog().logos(Some("superleague"), None);
        let ids: Vec<&str> = found.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["paok", "aek"]);
    }

    #[test]
    fn given_search_term_when_logos_then_substring_on_name() {
        let cat = catalog();
        assert_eq!(cat.logos(None, Some("ion")).len(), 2);
        assert_eq!(cat.logos(None, Some("παοκ")).len(), 1);
        assert_eq!(cat.logos(Some("SUPERLEAGUE 2"), Some("ion")).len(), 1);
        assert_eq!(cat.logos(None, Some("")).len(), 6);
    }

    #[test]
    fn given_catalog_when_leagues_then_priority_order_and_uncategorized() {
        assert_eq!(
            catalog().leagues(),
            vec![
                "SUPERLEAGUE".to_string(),
                "SUPERLEAGUE 2".to_string(),
                "Γ ΕΘΝΙΚΗ".to_string(),
                UNCATEGORIZED_LEAGUE.to_string(),
                "ΕΠΣ ΧΙΟΥ".to_string(),
            ]
        );
    }

    #[test]
    fn given_ids_when_by_ids_then_catalog_order() {
        let cat = catalog();
        let found = cat.by_ids(&["aek".to_string(), "paok".to_string(), "ghost".to_string()]);
        let ids: Vec<&str> = found.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["paok", "aek"]);
        assert_eq!(cat.find("chios-stars").map(|l| l.name.as_str()), Some("Chios Stars"));
        assert!(cat.find("ghost").is_none());
    }
}
