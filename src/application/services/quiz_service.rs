// src/application/services/quiz_service.rs
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::logo::TeamLogo;
use crate::domain::quiz::{QuizAnswer, QuizGame, QuizSettings, QuizStats};
use crate::domain::repositories::key_value_store::{KeyValueStore, QUIZ_STATS_KEY};

/// Runs one quiz game at a time and keeps statistics across games
#[derive(Debug)]
pub struct QuizService {
    store: Arc<dyn KeyValueStore>,
    game: Mutex<Option<QuizGame>>,
    stats: Mutex<QuizStats>,
}

impl QuizService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let stats = match store.get(QUIZ_STATS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Quiz stats unreadable, starting fresh: {}", e);
                QuizStats::default()
            }),
            Ok(None) => QuizStats::default(),
            Err(e) => {
                warn!("Could not read quiz stats: {}", e);
                QuizStats::default()
            }
        };
        Self {
            store,
            game: Mutex::new(None),
            stats: Mutex::new(stats),
        }
    }

    /// Starts a game, replacing any game in progress
    #[instrument(skip(self, logos, rng), level = "debug")]
    pub fn new_game<R: Rng + ?Sized>(
        &self,
        settings: &QuizSettings,
        logos: &[TeamLogo],
        rng: &mut R,
    ) -> QuizGame {
        let game = QuizGame::new(settings, logos, Utc::now(), rng);
        debug!("Generated {} questions", game.total_questions);
        *self.game.lock() = Some(game.clone());
        game
    }

    pub fn current_game(&self) -> Option<QuizGame> {
        self.game.lock().clone()
    }

    pub fn submit_answer(
        &self,
        question_id: &str,
        selected_answer: &str,
        time_spent: u32,
    ) -> ApplicationResult<QuizAnswer> {
        let mut guard = self.game.lock();
        let game = guard.as_mut().ok_or(ApplicationError::NoActiveGame)?;
        game.submit_answer(question_id, selected_answer, time_spent)
            .cloned()
            .ok_or_else(|| ApplicationError::Validation(format!("Unknown question {}", question_id)))
    }

    /// False once every question has been shown
    pub fn next_question(&self) -> ApplicationResult<bool> {
        let mut guard = self.game.lock();
        let game = guard.as_mut().ok_or(ApplicationError::NoActiveGame)?;
        Ok(game.next_question())
    }

    /// Ends the game and folds it into the persisted statistics
    #[instrument(skip(self), level = "debug")]
    pub fn finish_game(&self) -> ApplicationResult<QuizGame> {
        let mut game = self.game.lock().take().ok_or(ApplicationError::NoActiveGame)?;
        game.finish(Utc::now());

        let mut stats = self.stats.lock();
        stats.record(game.clone());
        self.store.set(QUIZ_STATS_KEY, &serde_json::to_string(&*stats)?)?;
        Ok(game)
    }

    pub fn stats(&self) -> QuizStats {
        self.stats.lock().clone()
    }

    pub fn reset_stats(&self) -> ApplicationResult<()> {
        *self.stats.lock() = QuizStats::default();
        self.store.remove(QUIZ_STATS_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quiz::DifficultySetting;
    use crate::infrastructure::storage::InMemoryKeyValueStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn logos() -> Vec<TeamLogo> {
        ["alpha", "beta", "gamma", "delta", "epsilon"]
            .iter()
            .map(|id| TeamLogo {
                id: id.to_string(),
                name: id.to_uppercase(),
                path: format!("assets/logos/SUPERLEAGUE/{}.png", id),
                league: Some("SUPERLEAGUE".to_string()),
            })
            .collect()
    }

    #[test]
    fn given_no_game_when_submit_then_no_active_game() {
        let service = QuizService::new(Arc::new(InMemoryKeyValueStore::new()));
        assert!(matches!(
            service.submit_answer("question-0", "x", 1),
            Err(ApplicationError::NoActiveGame)
        ));
        assert!(service.finish_game().is_err());
    }

    #[test]
    fn given_played_game_when_finish_then_stats_persist_across_instances() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let service = QuizService::new(store.clone());
        let mut rng = StdRng::seed_from_u64(5);
        let settings = QuizSettings {
            difficulty: DifficultySetting::Easy,
            question_count: 3,
            ..Default::default()
        };

        let game = service.new_game(&settings, &logos(), &mut rng);
        for question in &game.questions {
            service
                .submit_answer(&question.id, &question.correct_answer, 2)
                .unwrap();
            service.next_question().unwrap();
        }
        let finished = service.finish_game().unwrap();
        assert_eq!(finished.score, 30);
        assert!(service.current_game().is_none());

        let reloaded = QuizService::new(store);
        let stats = reloaded.stats();
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.correct_answers, 3);
        assert_eq!(stats.best_score, 30);

        reloaded.reset_stats().unwrap();
        assert_eq!(reloaded.stats(), QuizStats::default());
    }
}
