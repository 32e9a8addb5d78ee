// src/application/services/team_directory.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::team_info::{TeamInfo, TeamsDocument};

/// Descriptive club records read from the teams document
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    document: TeamsDocument,
}

impl TeamDirectory {
    pub fn new(document: TeamsDocument) -> Self {
        Self { document }
    }

    pub fn team_info(&self, team_id: &str) -> ApplicationResult<&TeamInfo> {
        self.document
            .teams
            .get(team_id)
            .ok_or_else(|| ApplicationError::TeamNotFound(team_id.to_string()))
    }

    pub fn all_team_info(&self) -> Vec<&TeamInfo> {
        self.document.teams.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team_info::{Achievements, Stadium, TeamColors};

    fn info(id: &str) -> TeamInfo {
        TeamInfo {
            id: id.to_string(),
            name: id.to_uppercase(),
            full_name: format!("{} FC", id),
            path: format!("assets/logos/{}.png", id),
            founded: 1924,
            stadium: Stadium {
                name: "Stadium".to_string(),
                capacity: 10000,
                location: "Athens".to_string(),
                image: None,
            },
            colors: TeamColors {
                primary: "Yellow".to_string(),
                secondary: "Black".to_string(),
            },
            history: String::new(),
            achievements: Achievements {
                league_titles: 13,
                cup_titles: 16,
                other_titles: None,
            },
            website: None,
            social_media: None,
        }
    }

    #[test]
    fn given_document_when_team_info_then_found_or_not_found() {
        let mut document = TeamsDocument::default();
        document.teams.insert("aek".to_string(), info("aek"));
        let directory = TeamDirectory::new(document);

        assert_eq!(directory.team_info("aek").unwrap().founded, 1924);
        assert!(matches!(
            directory.team_info("ghost"),
            Err(ApplicationError::TeamNotFound(id)) if id == "ghost"
        ));
        assert_eq!(directory.all_team_info().len(), 1);
    }
}
