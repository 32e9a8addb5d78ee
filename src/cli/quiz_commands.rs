// src/cli/quiz_commands.rs
use std::io::Write;
use std::time::Instant;

use crossterm::style::Stylize;
use rand::Rng;
use rustyline::DefaultEditor;
use tracing::{debug, instrument};

use crate::cli::display::write_quiz_stats;
use crate::cli::error::{CliError, CliResult};
use crate::domain::quiz::{QuizGame, QuizMode, QuizQuestion, QuizSettings};
use crate::infrastructure::di::ServiceContainer;

/// Resolves a typed answer: a 1-based option number or the option text
pub fn parse_choice<'a>(input: &str, options: &'a [String]) -> Option<&'a str> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).map(String::as_str);
    }
    options
        .iter()
        .find(|option| option.to_lowercase() == input.to_lowercase())
        .map(String::as_str)
}

fn question_prompt(mode: QuizMode) -> &'static str {
    match mode {
        QuizMode::GuessTeam => "Which team does this logo belong to?",
        QuizMode::GuessLeague => "Which league does this team play in?",
        QuizMode::Mixed => "Name the team or its league:",
    }
}

fn write_question<W: Write>(
    out: &mut W,
    game: &QuizGame,
    question: &QuizQuestion,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} {}/{}  ({} points)",
        "Question".bold(),
        game.current_question_index + 1,
        game.total_questions,
        question.points
    )?;
    writeln!(out, "Logo: {}", question.logo_path.as_str().blue())?;
    writeln!(out, "{}", question_prompt(game.mode))?;
    for (i, option) in question.options.iter().enumerate() {
        writeln!(out, "  {}) {}", i + 1, option)?;
    }
    Ok(())
}

/// Plays a whole game, asking `answer` for each question.
///
/// `answer` returns `None` to stop early; the game is finished and recorded
/// either way.
#[instrument(skip(out, services, rng, answer))]
pub fn play<W, R, F>(
    out: &mut W,
    services: &ServiceContainer,
    settings: &QuizSettings,
    rng: &mut R,
    mut answer: F,
) -> CliResult<QuizGame>
where
    W: Write,
    R: Rng + ?Sized,
    F: FnMut(&QuizQuestion) -> CliResult<Option<String>>,
{
    let logos = services.logo_catalog.all();
    if !logos
        .iter()
        .any(|logo| settings.difficulty.admits(logo.league.as_deref()))
    {
        return Err(CliError::CommandFailed(format!(
            "No logos are eligible at difficulty {}",
            settings.difficulty
        )));
    }

    let quiz = &services.quiz_service;
    quiz.new_game(settings, logos, rng);

    loop {
        let Some(game) = quiz.current_game() else {
            break;
        };
        let Some(question) = game.current_question().cloned() else {
            break;
        };
        write_question(out, &game, &question)?;

        let started = Instant::now();
        let Some(selected) = answer(&question)? else {
            debug!("Quiz stopped early");
            break;
        };
        let elapsed = started.elapsed().as_secs() as u32;

        let result = quiz.submit_answer(&question.id, &selected, elapsed)?;
        if result.is_correct {
            writeln!(out, "{} +{}", "Correct!".green(), result.points)?;
        } else {
            writeln!(
                out,
                "{} The answer was {}",
                "Wrong.".red(),
                result.correct_answer.as_str().bold()
            )?;
        }

        if !quiz.next_question()? {
            break;
        }
    }

    let game = quiz.finish_game()?;
    writeln!(out)?;
    writeln!(
        out,
        "Final score: {} ({}/{} correct)",
        game.score.to_string().bold(),
        game.correct_answers(),
        game.total_questions
    )?;
    Ok(game)
}

/// Interactive game on the terminal
pub fn play_interactive(services: &ServiceContainer, settings: &QuizSettings) -> CliResult<()> {
    let mut rl = DefaultEditor::new()?;
    let mut stdout = std::io::stdout();

    let result = play(
        &mut stdout,
        services,
        settings,
        &mut rand::thread_rng(),
        |question| loop {
            match rl.readline("Answer (number or name, q to quit): ") {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => return Ok(None),
                Ok(line) => match parse_choice(&line, &question.options) {
                    Some(choice) => return Ok(Some(choice.to_string())),
                    None => eprintln!("Pick 1-{}", question.options.len()),
                },
                Err(rustyline::error::ReadlineError::Interrupted)
                | Err(rustyline::error::ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        },
    );
    result.map(|_| ())
}

pub fn show_stats<W: Write>(out: &mut W, services: &ServiceContainer) -> CliResult<()> {
    write_quiz_stats(out, &services.quiz_service.stats())?;
    Ok(())
}
