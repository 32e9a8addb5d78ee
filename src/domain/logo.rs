// src/domain/logo.rs
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// League label used when a logo carries none
pub const UNCATEGORIZED_LEAGUE: &str = "Uncategorized";

/// Leagues listed first, in this order, before the alphabetical rest
pub const PRIORITY_LEAGUES: [&str; 3] = ["SUPERLEAGUE", "SUPERLEAGUE 2", "Γ ΕΘΝΙΚΗ"];

const DEFAULT_LEAGUE_LOGO: &str = "/assets/league-logos/default-league.png";

/// Leagues that ship a logo under `/assets/league-logos/<name>.png`
const LEAGUES_WITH_LOGO: &[&str] = &[
    "SUPERLEAGUE", "SUPERLEAGUE 2", "Γ ΕΘΝΙΚΗ",
    "ΕΠΣ ΑΘΗΝΩΝ", "ΕΠΣ ΠΕΙΡΑΙΑ", "ΕΠΣ ΑΝΑΤΟΛΙΚΗΣ ΑΤΤΙΚΗΣ", "ΕΠΣ ΔΥΤΙΚΗΣ ΑΤΤΙΚΗΣ",
    "ΕΠΣ ΑΙΤΩΛΟΑΚΑΡΝΑΝΙΑΣ", "ΕΠΣ ΑΡΓΟΛΙΔΑΣ", "ΕΠΣ ΑΡΚΑΔΙΑΣ", "ΕΠΣ ΑΡΤΑΣ", "ΕΠΣ ΑΧΑΪΑΣ",
    "ΕΠΣ ΒΟΙΩΤΙΑΣ", "ΕΠΣ ΔΡΑΜΑΣ", "ΕΠΣ ΔΩΔΕΚΑΝΗΣΟΥ", "ΕΠΣ ΕΒΡΟΥ", "ΕΠΣ ΕΥΒΟΙΑΣ",
    "ΕΠΣ ΕΥΡΥΤΑΝΙΑΣ", "ΕΠΣ ΕΥΡΩΠΑ", "ΕΠΣ ΗΛΕΙΑΣ", "ΕΠΣ ΗΜΑΘΙΑΣ", "ΕΠΣ ΗΠΕΙΡΟΥ",
    "ΕΠΣ ΗΡΑΚΛΕΙΟΥ", "ΕΠΣ ΘΕΣΠΡΩΤΙΑΣ", "ΕΠΣ ΘΕΣΣΑΛΙΑΣ", "ΕΠΣ ΘΡΑΚΗΣ", "ΕΠΣ ΚΑΒΑΛΑΣ",
    "ΕΠΣ ΚΑΡΔΙΤΣΑΣ", "ΕΠΣ ΚΑΣΤΟΡΙΑΣ", "ΕΠΣ ΚΕΦΑΛΛΗΝΙΑΣ-ΙΘΑΚΗΣ", "ΕΠΣ ΚΙΛΚΙΣ",
    "ΕΠΣ ΚΟΖΑΝΗΣ", "ΕΠΣ ΚΟΡΙΝΘΙΑΣ", "ΕΠΣ ΚΥΚΛΑΔΩΝ", "ΕΠΣ ΛΑΚΩΝΙΑΣ", "ΕΠΣ ΛΑΡΙΣΑΣ",
    "ΕΠΣ ΛΑΣΙΘΙΟΥ", "ΕΠΣ ΛΕΣΒΟΥ-ΛΗΜΝΟΥ", "ΕΠΣ ΜΑΚΕΔΟΝΙΑΣ", "ΕΠΣ ΜΕΣΣΗΝΙΑΣ",
    "ΕΠΣ ΞΑΝΘΗΣ", "ΕΠΣ ΠΕΛΛΑΣ", "ΕΠΣ ΠΙΕΡΙΑΣ", "ΕΠΣ ΠΡΕΒΕΖΑΣ-ΛΕΥΚΑΔΑΣ", "ΕΠΣ ΡΕΘΥΜΝΟΥ",
    "ΕΠΣ ΣΑΜΟΥ", "ΕΠΣ ΣΕΡΡΩΝ", "ΕΠΣ ΤΡΙΚΑΛΩΝ", "ΕΠΣ ΦΘΙΩΤΙΔΑΣ", "ΕΠΣ ΦΛΩΡΙΝΑΣ",
    "ΕΠΣ ΦΩΚΙΔΑΣ", "ΕΠΣ ΧΑΛΚΙΔΙΚΗΣ", "ΕΠΣ ΧΑΝΙΩΝ", "ΕΠΣ ΧΙΟΥ", "ΕΠΣ ΖΑΚΥΝΘΟΥ",
    "ΕΠΣ ΚΕΡΚΥΡΑΣ", "ΕΠΣ ΓΡΕΒΕΝΩΝ",
];

/// Canonical names of the top-flight clubs and their established ids
const KNOWN_TEAM_IDS: &[(&str, &str)] = &[
    ("ΑΟ ΠΑΝΑΘΗΝΑΙΚΟΣ", "panathinaikos"),
    ("ΑΕΚ", "aek"),
    ("ΠΑΟΚ", "paok"),
    ("ΣΦΠ ΟΛΥΜΠΙΑΚΟΣ", "olympiakos"),
    ("ΑΣ ΑΡΗΣ ΘΕΣΣΑΛΟΝΙΚΗΣ", "aris"),
    ("ΠΑΣ ΛΑΜΙΑ", "lamia"),
    ("ΟΦΗ", "ofi"),
    ("ΝΠΣ ΒΟΛΟΣ", "volos"),
    ("ΑΓΣ ΑΣΤΕΡΑΣ ΤΡΙΠΟΛΗΣ", "asteras-tripolis"),
    ("ΓΦΣ ΠΑΝΑΙΤΩΛΙΚΟΣ", "panetolikos"),
    ("ΑΠΣ ΑΤΡΟΜΗΤΟΣ ΑΘΗΝΩΝ", "atromitos"),
    ("ΜΓΣ ΠΑΝΣΕΡΡΑΪΚΟΣ", "panserraikos"),
    ("ΓΣ ΚΑΛΛΙΘΕΑ", "kallithea"),
    ("ΑΠΟ ΛΕΒΑΔΕΙΑΚΟΣ", "levadiakos"),
];

/// One record of the logo manifest as produced by the offline scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
}

/// A catalogued club logo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLogo {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
}

impl TeamLogo {
    pub fn from_manifest(entry: ManifestEntry) -> Self {
        Self {
            id: team_id_for(&entry.name),
            name: entry.name,
            path: entry.path,
            league: entry.league,
        }
    }

    /// League label, falling back to [`UNCATEGORIZED_LEAGUE`]
    pub fn league_or_default(&self) -> &str {
        self.league.as_deref().unwrap_or(UNCATEGORIZED_LEAGUE)
    }
}

impl fmt::Display for TeamLogo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.name, self.id, self.league_or_default())
    }
}

/// Stable identifier for a team name.
///
/// Known clubs map to their established ids; every other name becomes a
/// lowercase slug with diacritics stripped and runs of other characters
/// collapsed into single hyphens.
pub fn team_id_for(name: &str) -> String {
    if let Some((_, id)) = KNOWN_TEAM_IDS.iter().find(|(known, _)| *known == name) {
        return id.to_string();
    }

    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
    {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Upper-cased NFKC form used for catalog search
pub fn search_key(value: &str) -> String {
    value.to_uppercase().nfkc().collect()
}

/// Ordering for league names: priority leagues first, the rest alphabetical
pub fn compare_leagues(a: &str, b: &str) -> Ordering {
    let rank = |league: &str| PRIORITY_LEAGUES.iter().position(|p| *p == league);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Image path of a league's own logo
pub fn league_logo_path(league: &str) -> String {
    if LEAGUES_WITH_LOGO.contains(&league) {
        format!("/assets/league-logos/{}.png", league)
    } else {
        DEFAULT_LEAGUE_LOGO.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_known_greek_name_when_team_id_for_then_returns_mapped_id() {
        assert_eq!(team_id_for("ΠΑΟΚ"), "paok");
        assert_eq!(team_id_for("ΑΓΣ ΑΣΤΕΡΑΣ ΤΡΙΠΟΛΗΣ"), "asteras-tripolis");
    }

    #[test]
    fn given_latin_name_when_team_id_for_then_slugifies() {
        assert_eq!(team_id_for("Panionios GSS"), "panionios-gss");
        assert_eq!(team_id_for("  Ionikos -- Nikaias! "), "ionikos-nikaias");
        assert_eq!(team_id_for("Café Olympique"), "cafe-olympique");
    }

    #[test]
    fn given_unmapped_greek_name_when_team_id_for_then_drops_non_latin() {
        // Greek letters are not in [a-z0-9]; only digits survive
        assert_eq!(team_id_for("ΑΕ ΛΑΡΙΣΑ 1964"), "1964");
        assert_eq!(team_id_for("ΑΠΟΛΛΩΝ"), "");
    }

    #[test]
    fn given_leagues_when_sorted_then_priority_first() {
        let mut leagues = vec!["ΕΠΣ ΧΙΟΥ", "Γ ΕΘΝΙΚΗ", "Other", "SUPERLEAGUE 2", "SUPERLEAGUE"];
        leagues.sort_by(|a, b| compare_leagues(a, b));
        assert_eq!(
            leagues,
            vec!["SUPERLEAGUE", "SUPERLEAGUE 2", "Γ ΕΘΝΙΚΗ", "Other", "ΕΠΣ ΧΙΟΥ"]
        );
    }

    #[test]
    fn given_league_when_league_logo_path_then_known_or_default() {
        assert_eq!(
            league_logo_path("SUPERLEAGUE"),
            "/assets/league-logos/SUPERLEAGUE.png"
        );
        assert_eq!(
            league_logo_path("Unknown League"),
            "/assets/league-logos/default-league.png"
        );
    }

    #[test]
    fn given_manifest_entry_without_league_when_convert_then_uncategorized() {
        let logo = TeamLogo::from_manifest(ManifestEntry {
            name: "ΠΑΟΚ".to_string(),
            path: "assets/logos/paok.png".to_string(),
            league: None,
        });
        assert_eq!(logo.id, "paok");
        assert_eq!(logo.league_or_default(), UNCATEGORIZED_LEAGUE);
    }

    #[test]
    fn given_mixed_case_when_search_key_then_upper_nfkc() {
        assert_eq!(search_key("paok"), "PAOK");
        assert_eq!(search_key("ﬁ"), "FI");
    }
}
