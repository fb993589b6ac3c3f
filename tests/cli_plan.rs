//! Integration tests for the `chyron plan` command.
//!
//! Offline plans exercise the whole layout path through the real binary:
//! wrapping, speaker stacking, and the final filter graph bytes on stdout.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `chyron` binary.
fn chyron() -> Command {
    Command::cargo_bin("chyron").expect("binary 'chyron' should be built")
}

// ─── Offline plans ───────────────────────────────────────────────────────────

#[test]
fn offline_single_speaker_prints_full_graph() {
    chyron()
        .args(["plan", "--title", "Rust in Production", "--speaker", "Jane Doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("🎬 Rust in Production"))
        .stdout(predicate::str::contains("   Jane Doe"))
        .stdout(predicate::str::contains("   Map: [outt] [outa]"))
        .stdout(predicate::str::contains(
            "[0:v:0][0:a:0][1:v:0][1:a:0]concat=n=2:v=1:a=1 [outv] [outa];\
             [outv]drawtext=fontfile=assets/fonts/OpenSans-Bold.ttf:fontsize=52:fontcolor=white:\
             x=(w-text_w)/2:y=200:text='Rust in Production':enable=if(gt(t\\, 1)\\,lt(t\\, 12)),\
             drawtext=fontfile=assets/fonts/OpenSans-Bold.ttf:fontsize=52:fontcolor=white:\
             x=(w-text_w)/2:y=200:text='Jane Doe':enable=if(gt(t\\, 13)\\,lt(t\\, 24))[outt]",
        ));
}

#[test]
fn offline_two_speakers_stack_with_lift() {
    chyron()
        .args([
            "plan",
            "--title",
            "Observability at Scale",
            "--speaker",
            "Ana Gill",
            "--speaker",
            "Bo Chen",
            "--tagline",
            "CTO, Example Corp",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("   Ana Gill (CTO, Example Corp)"))
        .stdout(predicate::str::contains("   Bo Chen"))
        .stdout(predicate::str::contains(":y=90:"))
        .stdout(predicate::str::contains(":y=160:"))
        .stdout(predicate::str::contains(":y=370:"))
        .stdout(predicate::str::contains("OpenSans-Regular"));
}

#[test]
fn tagline_positions_align_with_speakers() {
    // An empty tagline means "none" for the speaker at that position.
    chyron()
        .args([
            "plan",
            "--title",
            "Pairing on Postmortems",
            "--speaker",
            "Ana Gill",
            "--speaker",
            "Bo Chen",
            "--tagline",
            "",
            "--tagline",
            "Staff Engineer",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(":y=140:"))
        .stdout(predicate::str::contains(":y=320:"))
        .stdout(predicate::str::contains(":y=390:"));
}

#[test]
fn single_token_speaker_has_no_last_name() {
    chyron()
        .args(["plan", "--title", "One Name Only", "--speaker", "Teller"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text='Teller':"));
}

#[test]
fn colon_in_title_becomes_dash() {
    chyron()
        .args([
            "plan",
            "--title",
            "Compilers: A Love Story",
            "--speaker",
            "Jane Doe",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("text='Compilers - A Love Story'"));
}

#[test]
fn apostrophes_escaped_for_drawtext() {
    chyron()
        .args(["plan", "--title", "Why O'Caml Won", "--speaker", "Jane Doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text='Why O'\\''Caml Won'"));
}

#[test]
fn long_title_wraps_to_second_row() {
    chyron()
        .args([
            "plan",
            "--title",
            "Watching the watchers with open telemetry",
            "--speaker",
            "Jane Doe",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("text='Watching the watchers with open'"))
        .stdout(predicate::str::contains(":y=270:"));
}

// ─── Trimming ────────────────────────────────────────────────────────────────

#[test]
fn trimmed_flag_truncates_both_streams() {
    chyron()
        .args([
            "plan",
            "--title",
            "Rust in Production",
            "--speaker",
            "Jane Doe",
            "--trimmed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(";[outt]trim=end=25[outc]"))
        .stdout(predicate::str::contains(";[outa]atrim=end=25[outac]"))
        .stdout(predicate::str::contains("   Map: [outc] [outac]"));
}

#[test]
fn config_render_trimmed_also_truncates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("chyron.toml"), "[render]\ntrimmed = true\n").unwrap();

    chyron()
        .current_dir(dir.path())
        .args(["plan", "--title", "Rust in Production", "--speaker", "Jane Doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("   Map: [outc] [outac]"));
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[test]
fn timing_from_config_file_in_cwd() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("chyron.toml"),
        "[timing]\ntitle_start = 2.0\ntitle_end = 10.5\n",
    )
    .unwrap();

    chyron()
        .current_dir(dir.path())
        .args(["plan", "--title", "Rust in Production", "--speaker", "Jane Doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gt(t\\, 2)"))
        .stdout(predicate::str::contains("lt(t\\, 10.5)"));
}

#[test]
fn layout_from_explicit_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[layout]\ntitle_base_y = 333\n").unwrap();

    chyron()
        .current_dir(dir.path())
        .args([
            "--config",
            "custom.toml",
            "plan",
            "--title",
            "Rust in Production",
            "--speaker",
            "Jane Doe",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(":y=333:"));
}

// ─── Argument validation ─────────────────────────────────────────────────────

#[test]
fn missing_title_and_code_fails() {
    chyron()
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --code"));
}

#[test]
fn offline_requires_speakers() {
    chyron()
        .args(["plan", "--title", "Rust in Production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one --speaker"));
}

#[test]
fn code_conflicts_with_title() {
    chyron()
        .args(["plan", "--code", "abc", "--title", "Rust in Production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn three_speakers_rejected() {
    chyron()
        .args([
            "plan",
            "--title",
            "Panel",
            "--speaker",
            "A B",
            "--speaker",
            "C D",
            "--speaker",
            "E F",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected one or two speakers"));
}
