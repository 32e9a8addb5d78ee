use assert_cmd::Command;
use gflogos::config::{ENV_ADMIN_PASSWORD, ENV_DATA_DIR, ENV_EXPORT_DIR, ENV_PORT, ENV_SERVER_URL};
use gflogos::infrastructure::json::write_json_pretty;
use gflogos::util::testing::init_test_env;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Config file pointing every path into `dir`, with the remote disabled
fn write_config(dir: &Path) -> PathBuf {
    let manifest = dir.join("logos-manifest.json");
    write_json_pretty(&manifest, &init_test_env().manifest).unwrap();

    let config = format!(
        r#"
data_dir = "{data}"
export_dir = "{exports}"
server_url = ""

[catalog]
manifest_path = "{manifest}"
teams_info_path = "{teams}"
collections_file = "{collections}"
"#,
        data = dir.join("data").display(),
        exports = dir.join("exports").display(),
        manifest = manifest.display(),
        teams = dir.join("teams.json").display(),
        collections = dir.join("collections.json").display(),
    );
    let path = dir.join("config.toml");
    fs::write(&path, config).unwrap();
    path
}

fn gflogos(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gflogos").unwrap();
    for var in [ENV_DATA_DIR, ENV_SERVER_URL, ENV_ADMIN_PASSWORD, ENV_PORT, ENV_EXPORT_DIR] {
        cmd.env_remove(var);
    }
    cmd.arg("--no-color").arg("-c").arg(config);
    cmd
}

#[test]
fn given_help_when_run_then_lists_commands() {
    Command::cargo_bin("gflogos")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("collections"))
        .stdout(predicate::str::contains("quiz"));
}

#[test]
fn given_generate_config_when_run_then_toml_printed() {
    Command::cargo_bin("gflogos")
        .unwrap()
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("server_url"))
        .stdout(predicate::str::contains("[catalog]"));
}

#[test]
fn given_manifest_when_listing_leagues_then_priority_first() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let output = gflogos(&config).arg("leagues").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let first: Vec<&str> = stdout
        .lines()
        .map(|line| line.split("  ").next().unwrap().trim_end())
        .collect();
    assert_eq!(first[..3], ["SUPERLEAGUE", "SUPERLEAGUE 2", "Γ ΕΘΝΙΚΗ"]);
}

#[test]
fn given_search_when_listing_logos_as_json_then_matches_only() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    gflogos(&config)
        .args(["logos", "--search", "παοκ", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"paok\""))
        .stdout(predicate::str::contains("ΑΕΚ").not());
}

#[test]
fn given_defaults_when_showing_team_tags_then_seeded_tags() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    gflogos(&config)
        .args(["tags", "paok"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Double-headed Eagle"));
}

#[test]
fn given_wrong_password_when_importing_then_usage_exit_code() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let file = temp.path().join("import.json");
    fs::write(&file, r#"{"availableTags":[],"teamTags":{}}"#).unwrap();

    gflogos(&config)
        .args(["import", file.to_str().unwrap(), "--password", "nope"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("Admin login required"));
}

#[test]
fn given_export_then_import_when_run_then_tags_survive_in_data_dir() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let file = temp.path().join("out/tags.json");

    gflogos(&config)
        .args(["export", "-o", file.to_str().unwrap(), "--format", "plain"])
        .assert()
        .success();
    assert!(fs::read_to_string(&file).unwrap().contains("\"availableTags\""));

    gflogos(&config)
        .args(["import", file.to_str().unwrap(), "--password", "stavrosadmin"])
        .assert()
        .success();
    assert!(temp.path().join("data/greek_football_tags.json").exists());
}

#[test]
fn given_featured_flag_when_listing_collections_then_only_featured() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    gflogos(&config)
        .args(["collections", "--featured"])
        .assert()
        .success()
        .stdout(predicate::str::contains("big-4-teams"))
        .stdout(predicate::str::contains("athens-teams").not());
}

#[test]
fn given_bash_when_completion_then_script_on_stdout() {
    Command::cargo_bin("gflogos")
        .unwrap()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gflogos"))
        .stderr(predicate::str::contains("# Outputting bash completion script"));
}

#[test]
fn given_missing_config_file_when_run_then_usage_error() {
    Command::cargo_bin("gflogos")
        .unwrap()
        .args(["-c", "/nonexistent/gflogos.toml", "leagues"])
        .assert()
        .code(64);
}
