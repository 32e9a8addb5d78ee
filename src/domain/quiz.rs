// src/domain/quiz.rs
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::collection::random_base36;
use crate::domain::logo::TeamLogo;

const UNKNOWN_LEAGUE_ANSWER: &str = "Unknown";
const DISTRACTOR_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizMode {
    #[default]
    GuessTeam,
    GuessLeague,
    Mixed,
}

impl QuizMode {
    pub const ALL: [QuizMode; 3] = [QuizMode::GuessTeam, QuizMode::GuessLeague, QuizMode::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizMode::GuessTeam => "guess-team",
            QuizMode::GuessLeague => "guess-league",
            QuizMode::Mixed => "mixed",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuizMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown quiz mode '{}' (guess-team, guess-league, mixed)", s))
    }
}

/// Difficulty of a single question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn points(&self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }
}

/// Difficulty chosen for a whole game; `Mixed` draws per question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultySetting {
    Easy,
    #[default]
    Medium,
    Hard,
    Mixed,
}

impl DifficultySetting {
    /// Whether logos from this league are eligible at this setting
    pub fn admits(&self, league: Option<&str>) -> bool {
        match self {
            DifficultySetting::Easy => matches!(league, Some("SUPERLEAGUE" | "SUPERLEAGUE 2")),
            DifficultySetting::Medium => {
                matches!(league, Some("SUPERLEAGUE" | "SUPERLEAGUE 2" | "Γ ΕΘΝΙΚΗ"))
            }
            DifficultySetting::Hard | DifficultySetting::Mixed => true,
        }
    }

    /// Mixed: 40% easy, 40% medium, 20% hard
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Difficulty {
        match self {
            DifficultySetting::Easy => Difficulty::Easy,
            DifficultySetting::Medium => Difficulty::Medium,
            DifficultySetting::Hard => Difficulty::Hard,
            DifficultySetting::Mixed => {
                let roll: f64 = rng.gen();
                if roll < 0.4 {
                    Difficulty::Easy
                } else if roll < 0.8 {
                    Difficulty::Medium
                } else {
                    Difficulty::Hard
                }
            }
        }
    }
}

impl fmt::Display for DifficultySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DifficultySetting::Easy => "easy",
            DifficultySetting::Medium => "medium",
            DifficultySetting::Hard => "hard",
            DifficultySetting::Mixed => "mixed",
        })
    }
}

impl FromStr for DifficultySetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(DifficultySetting::Easy),
            "medium" => Ok(DifficultySetting::Medium),
            "hard" => Ok(DifficultySetting::Hard),
            "mixed" => Ok(DifficultySetting::Mixed),
            _ => Err(format!("unknown difficulty '{}' (easy, medium, hard, mixed)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    pub mode: QuizMode,
    pub difficulty: DifficultySetting,
    pub question_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            mode: QuizMode::GuessTeam,
            difficulty: DifficultySetting::Medium,
            question_count: 10,
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub logo_path: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Seconds
    pub time_spent: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGame {
    pub id: String,
    pub mode: QuizMode,
    pub questions: Vec<QuizQuestion>,
    pub current_question_index: usize,
    pub score: u32,
    pub total_questions: usize,
    pub time_started: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ended: Option<DateTime<Utc>>,
    pub answers: Vec<QuizAnswer>,
}

impl QuizGame {
    /// Builds a game from the catalog.
    ///
    /// Logos are shuffled, filtered by difficulty and truncated to the
    /// requested count. Each question offers the answer plus up to three
    /// distinct distractors drawn from the eligible logos.
    pub fn new<R: Rng + ?Sized>(
        settings: &QuizSettings,
        logos: &[TeamLogo],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let eligible: Vec<&TeamLogo> = logos
            .iter()
            .filter(|logo| settings.difficulty.admits(logo.league.as_deref()))
            .collect();

        let mut picked = eligible.clone();
        picked.shuffle(rng);
        picked.truncate(settings.question_count);

        let mut questions: Vec<QuizQuestion> = picked
            .iter()
            .enumerate()
            .map(|(index, logo)| build_question(index, logo, &eligible, settings, rng))
            .collect();
        questions.shuffle(rng);

        Self {
            id: format!("game-{}-{}", now.timestamp_millis(), random_base36(rng, 9)),
            mode: settings.mode,
            total_questions: questions.len(),
            questions,
            current_question_index: 0,
            score: 0,
            time_started: now,
            time_ended: None,
            answers: Vec::new(),
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_question_index)
    }

    /// Records an answer; `None` when the question id is unknown
    pub fn submit_answer(
        &mut self,
        question_id: &str,
        selected_answer: &str,
        time_spent: u32,
    ) -> Option<&QuizAnswer> {
        let question = self.questions.iter().find(|q| q.id == question_id)?;
        let is_correct = selected_answer == question.correct_answer;
        let points = if is_correct { question.points } else { 0 };

        let answer = QuizAnswer {
            question_id: question_id.to_string(),
            selected_answer: selected_answer.to_string(),
            correct_answer: question.correct_answer.clone(),
            is_correct,
            time_spent,
            points,
        };
        self.score += points;
        self.answers.push(answer);
        self.answers.last()
    }

    /// Advances to the next question; false once past the last one
    pub fn next_question(&mut self) -> bool {
        if self.current_question_index < self.questions.len() {
            self.current_question_index += 1;
        }
        self.current_question_index < self.questions.len()
    }

    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.time_ended = Some(now);
    }

    pub fn is_finished(&self) -> bool {
        self.time_ended.is_some()
    }

    pub fn correct_answers(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    /// Wall-clock seconds between start and finish
    pub fn duration_secs(&self) -> Option<f64> {
        self.time_ended
            .map(|end| (end - self.time_started).num_milliseconds() as f64 / 1000.0)
    }
}

fn build_question<R: Rng + ?Sized>(
    index: usize,
    logo: &TeamLogo,
    pool: &[&TeamLogo],
    settings: &QuizSettings,
    rng: &mut R,
) -> QuizQuestion {
    let difficulty = settings.difficulty.draw(rng);
    let team_question = match settings.mode {
        QuizMode::GuessTeam => true,
        QuizMode::GuessLeague => false,
        QuizMode::Mixed => rng.gen_bool(0.5),
    };

    let (correct_answer, mut distractors) = if team_question {
        let others: Vec<String> = pool
            .iter()
            .filter(|other| other.id != logo.id && other.name != logo.name)
            .map(|other| other.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        (logo.name.clone(), others)
    } else {
        let answer = logo
            .league
            .clone()
            .unwrap_or_else(|| UNKNOWN_LEAGUE_ANSWER.to_string());
        let others: Vec<String> = pool
            .iter()
            .filter_map(|other| other.league.clone())
            .filter(|league| *league != answer)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        (answer, others)
    };

    distractors.shuffle(rng);
    distractors.truncate(DISTRACTOR_COUNT);

    let mut options = Vec::with_capacity(distractors.len() + 1);
    options.push(correct_answer.clone());
    options.extend(distractors);
    options.shuffle(rng);

    QuizQuestion {
        id: format!("question-{}", index),
        logo_path: logo.path.clone(),
        correct_answer,
        options,
        difficulty,
        points: difficulty.points(),
    }
}

/// Aggregate results over every finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub total_games: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub average_score: u32,
    pub best_score: u32,
    /// Seconds
    pub average_time: u32,
    pub favorite_mode: QuizMode,
    pub games_played: Vec<QuizGame>,
}

impl Default for QuizStats {
    fn default() -> Self {
        Self {
            total_games: 0,
            total_questions: 0,
            correct_answers: 0,
            average_score: 0,
            best_score: 0,
            average_time: 0,
            favorite_mode: QuizMode::GuessTeam,
            games_played: Vec::new(),
        }
    }
}

impl QuizStats {
    /// Folds a finished game into the totals
    pub fn record(&mut self, game: QuizGame) {
        self.total_games += 1;
        self.total_questions += game.total_questions as u32;
        self.correct_answers += game.correct_answers() as u32;
        self.best_score = self.best_score.max(game.score);
        self.games_played.push(game);

        let games = &self.games_played;
        let total_score: u64 = games.iter().map(|g| u64::from(g.score)).sum();
        self.average_score = (total_score as f64 / games.len() as f64).round() as u32;

        let durations: Vec<f64> = games.iter().filter_map(QuizGame::duration_secs).collect();
        self.average_time = if durations.is_empty() {
            0
        } else {
            (durations.iter().sum::<f64>() / durations.len() as f64).round() as u32
        };

        self.favorite_mode = favorite_mode(games);
    }
}

/// Most played mode; ties keep the mode that reached the count first
fn favorite_mode(games: &[QuizGame]) -> QuizMode {
    let mut counts: Vec<(QuizMode, usize)> = Vec::new();
    for game in games {
        match counts.iter_mut().find(|(mode, _)| *mode == game.mode) {
            Some((_, count)) => *count += 1,
            None => counts.push((game.mode, 1)),
        }
    }

    let count_of = |mode: QuizMode| {
        counts
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    };
    counts
        .iter()
        .fold(QuizMode::GuessTeam, |favorite, (mode, count)| {
            if *count > count_of(favorite) {
                *mode
            } else {
                favorite
            }
        })
}
