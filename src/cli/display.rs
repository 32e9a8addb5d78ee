// src/cli/display.rs
use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::application::services::collection_catalog::CollectionWithLogos;
use crate::application::services::tag_store::{PublishReport, RemoteOutcome};
use crate::domain::collection::Collection;
use crate::domain::logo::TeamLogo;
use crate::domain::quiz::QuizStats;
use crate::domain::tag::Tag;
use crate::domain::tag_data::TeamTags;
use crate::domain::team_info::TeamInfo;

pub fn write_team_tags<W: Write>(out: &mut W, team_id: &str, tags: &[Tag]) -> io::Result<()> {
    if tags.is_empty() {
        writeln!(out, "{}: {}", team_id.blue(), "(no tags)".dark_grey())
    } else {
        writeln!(out, "{}: {}", team_id.blue(), Tag::format_tags(tags).green())
    }
}

pub fn write_tag_table<W: Write>(
    out: &mut W,
    team_tags: &TeamTags,
) -> io::Result<()> {
    for (team_id, tags) in team_tags {
        write_team_tags(out, team_id, tags)?;
    }
    Ok(())
}

pub fn write_vocabulary<W: Write>(out: &mut W, tags: &[Tag]) -> io::Result<()> {
    writeln!(out, "{} ({})", "Available tags".bold(), tags.len())?;
    for tag in tags {
        writeln!(out, "  {}", tag.value().green())?;
    }
    Ok(())
}

pub fn write_logos<W: Write>(out: &mut W, logos: &[TeamLogo]) -> io::Result<()> {
    for logo in logos {
        writeln!(
            out,
            "{:<28} {:<24} {}",
            logo.name,
            logo.id.as_str().blue(),
            logo.league_or_default().dark_grey()
        )?;
    }
    Ok(())
}

pub fn write_collections<W: Write>(out: &mut W, collections: &[Collection]) -> io::Result<()> {
    for collection in collections {
        let mut flags = Vec::new();
        if collection.is_featured() {
            flags.push("featured");
        }
        if !collection.is_public {
            flags.push("private");
        }
        writeln!(
            out,
            "{} {} ({} logos){}",
            collection.id.as_str().blue(),
            collection.name.as_str().bold(),
            collection.logo_ids.len(),
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            }
        )?;
    }
    Ok(())
}

pub fn write_collection_detail<W: Write>(
    out: &mut W,
    detail: &CollectionWithLogos,
) -> io::Result<()> {
    let collection = &detail.collection;
    writeln!(out, "{}", collection.name.as_str().bold())?;
    if !collection.description.is_empty() {
        writeln!(out, "{}", collection.description)?;
    }
    if !collection.tags.is_empty() {
        writeln!(out, "Tags: {}", collection.tags.join(", ").green())?;
    }
    writeln!(
        out,
        "Updated: {}",
        collection.updated_at.format("%Y-%m-%d %H:%M")
    )?;
    writeln!(out)?;
    write_logos(out, &detail.logos)?;

    let missing = collection.logo_ids.len().saturating_sub(detail.logos.len());
    if missing > 0 {
        writeln!(out, "{}", format!("{} logo ids not in the catalog", missing).yellow())?;
    }
    Ok(())
}

pub fn write_team_info<W: Write>(out: &mut W, info: &TeamInfo) -> io::Result<()> {
    writeln!(out, "{} ({})", info.full_name.as_str().bold(), info.name)?;
    writeln!(out, "Founded:  {}", info.founded)?;
    writeln!(
        out,
        "Stadium:  {}, {} ({} seats)",
        info.stadium.name, info.stadium.location, info.stadium.capacity
    )?;
    writeln!(out, "Colors:   {} / {}", info.colors.primary, info.colors.secondary)?;
    writeln!(
        out,
        "Titles:   {} league, {} cup",
        info.achievements.league_titles, info.achievements.cup_titles
    )?;
    if let Some(other) = &info.achievements.other_titles {
        for (title, count) in other {
            writeln!(out, "          {} {}", count, title)?;
        }
    }
    if let Some(website) = &info.website {
        writeln!(out, "Website:  {}", website)?;
    }
    if !info.history.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", info.history)?;
    }
    Ok(())
}

fn write_outcome<W: Write>(out: &mut W, file: &str, outcome: &RemoteOutcome) -> io::Result<()> {
    match outcome {
        RemoteOutcome::Disabled => writeln!(out, "  {}: saved locally only", file),
        RemoteOutcome::Saved => writeln!(out, "  {}: {}", file, "saved to server".green()),
        RemoteOutcome::Fallback {
            error,
            download,
            copied_to_clipboard,
        } => {
            writeln!(out, "  {}: {} ({})", file, "server save failed".red(), error)?;
            if let Some(path) = download {
                writeln!(out, "    copy {} into place manually", path.display())?;
            }
            if *copied_to_clipboard {
                writeln!(out, "    contents copied to the clipboard")?;
            }
            Ok(())
        }
    }
}

pub fn write_publish_report<W: Write>(out: &mut W, report: &PublishReport) -> io::Result<()> {
    writeln!(out, "{}", "Changes committed locally.".green())?;
    write_outcome(out, "team-tags.json", &report.team_tags)?;
    write_outcome(out, "available-tags.json", &report.available_tags)
}

pub fn write_quiz_stats<W: Write>(out: &mut W, stats: &QuizStats) -> io::Result<()> {
    writeln!(out, "{}", "Quiz statistics".bold())?;
    writeln!(out, "Games played:    {}", stats.total_games)?;
    writeln!(
        out,
        "Correct answers: {}/{}",
        stats.correct_answers, stats.total_questions
    )?;
    writeln!(out, "Average score:   {}", stats.average_score)?;
    writeln!(out, "Best score:      {}", stats.best_score)?;
    writeln!(out, "Average time:    {}s", stats.average_time)?;
    writeln!(out, "Favorite mode:   {}", stats.favorite_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::default_collections;
    use crate::util::testing::tag;
    use std::path::PathBuf;

    fn rendered<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn given_team_without_tags_when_written_then_placeholder() {
        let text = rendered(|out| write_team_tags(out, "ofi", &[]));
        assert!(text.contains("ofi"));
        assert!(text.contains("(no tags)"));

        let text = rendered(|out| write_team_tags(out, "paok", &[tag("Black"), tag("White")]));
        assert!(text.contains("Black, White"));
    }

    #[test]
    fn given_private_collection_when_listed_then_flagged() {
        let mut collections = default_collections();
        collections[0].is_public = false;
        let text = rendered(|out| write_collections(out, &collections));
        assert_eq!(text.lines().count(), collections.len());
        assert!(text.contains("private"));
        assert!(text.contains("featured"));
    }

    #[test]
    fn given_fallback_report_when_written_then_download_path_shown() {
        let report = PublishReport {
            team_tags: RemoteOutcome::Saved,
            available_tags: RemoteOutcome::Fallback {
                error: "connection refused".to_string(),
                download: Some(PathBuf::from("/tmp/available-tags.json")),
                copied_to_clipboard: false,
            },
        };
        let text = rendered(|out| write_publish_report(out, &report));
        assert!(text.contains("/tmp/available-tags.json"));
        assert!(text.contains("connection refused"));
    }
}
