//! Integration tests for the gridsearch binaries.
//!
//! Spawns the engine process, feeds it JSON lines on stdin and checks the
//! submissions it writes to stdout.

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, ExitStatus, Stdio};

use gridsearch::protocol::{ActionKind, ActionSubmission};

const ENGINE: &str = env!("CARGO_BIN_EXE_gridsearch");
const PLAYOUT: &str = env!("CARGO_BIN_EXE_playout");

/// Spawns `exe` with `args`, writes `input` lines to its stdin and returns
/// its exit status with the stdout lines.
fn run_bin(exe: &str, args: &[&str], input: &[&str]) -> (ExitStatus, Vec<String>) {
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap_or_else(|e| panic!("failed to start {}: {}", exe, e));

    let mut stdin = child.stdin.take().unwrap();
    for line in input {
        writeln!(stdin, "{}", line).unwrap();
    }
    drop(stdin);

    let reader = BufReader::new(child.stdout.take().unwrap());
    let out = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    (status, out)
}

/// Runs the engine over `lines` and expects a clean exit.
fn run_engine(args: &[&str], lines: &[&str]) -> Vec<String> {
    let (status, out) = run_bin(ENGINE, args, lines);
    assert!(status.success());
    out
}

fn parse(line: &str) -> ActionSubmission {
    serde_json::from_str(line).expect("submission should be valid JSON")
}

/// 2x2 board with values [[0, 1], [2, 3]] and the agent at the origin.
const SMALL: &str = r#"{"width":2,"height":2,"points":[0,1,2,3],"agents":[{"x":0,"y":0}],"turn":0,"totalTurn":1}"#;

/// 4x3 board worth walking through: a cheap first step leads to a 9.
const CORRIDOR: &str = r#"{"width":4,"height":3,"points":[0,1,9,2,3,0,0,0,0,0,0,0],"agents":[{"x":0,"y":0}],"turn":0,"totalTurn":4}"#;

#[test]
fn greedy_takes_the_richer_neighbour() {
    let lines = run_engine(&["--policy", "greedy"], &[SMALL]);
    assert_eq!(
        lines,
        vec![r#"{"actions":[{"agentId":0,"type":"MOVE","x":0,"y":1}]}"#.to_string()]
    );
}

#[test]
fn beam_looks_past_the_first_step() {
    let lines = run_engine(
        &["--policy", "beam", "--beam-width", "3", "--beam-depth", "2"],
        &[CORRIDOR],
    );
    assert_eq!(lines.len(), 1);
    let submission = parse(&lines[0]);
    assert_eq!(submission.actions.len(), 1);
    let action = submission.actions[0];
    assert_eq!(action.kind, ActionKind::Move);
    assert_eq!((action.x, action.y), (1, 0));
}

#[test]
fn parallel_beam_matches_sequential() {
    let seq = run_engine(&["--policy", "beam"], &[CORRIDOR, SMALL]);
    let par = run_engine(&["--policy", "beam", "--parallel"], &[CORRIDOR, SMALL]);
    assert_eq!(seq, par);
    assert_eq!(seq.len(), 2);
}

#[test]
fn seeded_random_is_reproducible() {
    let args = ["--policy", "random", "--seed", "42"];
    let a = run_engine(&args, &[CORRIDOR, CORRIDOR, CORRIDOR]);
    let b = run_engine(&args, &[CORRIDOR, CORRIDOR, CORRIDOR]);
    assert_eq!(a, b);
}

#[test]
fn bad_lines_are_skipped() {
    let out_of_range = r#"{"width":2,"height":2,"points":[0,1,2,3],"agents":[{"x":5,"y":0}],"turn":0,"totalTurn":1}"#;
    let oversized = r#"{"width":4294967296,"height":4294967296,"points":[],"agents":[{"x":0,"y":0}],"turn":0,"totalTurn":1}"#;
    let lines = run_engine(
        &["--policy", "greedy"],
        &["not json", "", out_of_range, oversized, SMALL],
    );
    assert_eq!(lines.len(), 1);
    assert_eq!(parse(&lines[0]).actions[0].y, 1);
}

#[test]
fn repolled_turn_does_not_undo_the_stay() {
    let t0 = r#"{"width":3,"height":1,"points":[0,5,0],"agents":[{"x":0,"y":0}],"turn":0,"totalTurn":4}"#;
    let t1 = r#"{"width":3,"height":1,"points":[7,0,0],"agents":[{"x":1,"y":0}],"turn":1,"totalTurn":4}"#;
    let lines = run_engine(&["--policy", "greedy"], &[t0, t1, t1, t1]);
    assert_eq!(
        lines,
        vec![
            r#"{"actions":[{"agentId":0,"type":"MOVE","x":1,"y":0}]}"#.to_string(),
            r#"{"actions":[]}"#.to_string(),
            r#"{"actions":[]}"#.to_string(),
            r#"{"actions":[]}"#.to_string(),
        ]
    );
}

#[test]
fn earlier_turn_starts_a_new_match() {
    let t0 = r#"{"width":3,"height":1,"points":[0,5,0],"agents":[{"x":0,"y":0}],"turn":0,"totalTurn":4}"#;
    let t1 = r#"{"width":3,"height":1,"points":[7,0,0],"agents":[{"x":1,"y":0}],"turn":1,"totalTurn":4}"#;
    let fresh = r#"{"width":3,"height":1,"points":[7,0,0],"agents":[{"x":1,"y":0}],"turn":0,"totalTurn":4}"#;
    let lines = run_engine(&["--policy", "greedy"], &[t0, t1, fresh]);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], r#"{"actions":[]}"#);
    assert_eq!(parse(&lines[2]).actions[0].x, 0);
}

#[test]
fn terminal_snapshot_yields_no_actions() {
    let done = r#"{"width":2,"height":2,"points":[0,1,2,3],"agents":[{"x":0,"y":0}],"turn":1,"totalTurn":1}"#;
    let lines = run_engine(&["--policy", "greedy"], &[done]);
    assert_eq!(lines, vec![r#"{"actions":[]}"#.to_string()]);
}

#[test]
fn unplaced_agents_are_put_on_the_best_cells() {
    let snapshot = r#"{"width":3,"height":1,"points":[4,9,7],"agents":[{"x":-1,"y":-1},{"x":-1,"y":-1}],"turn":0,"totalTurn":5}"#;
    let lines = run_engine(&["--dry-run"], &[snapshot]);
    assert_eq!(
        lines,
        vec![
            r#"{"actions":[{"agentId":0,"type":"PUT","x":1,"y":0},{"agentId":1,"type":"PUT","x":2,"y":0}],"dryRun":true}"#
                .to_string()
        ]
    );
}

#[test]
fn match_documents_play_as_the_chosen_player() {
    let view = r#"{"status":"gaming","turn":2,"totalTurn":10,"startedAtUnixTime":1700000000,
        "field":{"width":3,"height":1,"points":[0,2,8],
            "tiles":[{"type":0,"player":null},{"type":0,"player":null},{"type":1,"player":0}]},
        "players":[{"agents":[{"x":0,"y":0}]},{"agents":[{"x":1,"y":0}]}]}"#
        .replace('\n', " ");
    let ended = r#"{"status":"ended","totalTurn":10,"field":{"width":1,"height":1,"points":[0]}}"#;

    let lines = run_engine(&["--policy", "greedy", "--player", "1"], &[view.as_str(), ended]);
    assert_eq!(lines.len(), 1);
    let action = parse(&lines[0]).actions[0];
    assert_eq!(action.kind, ActionKind::Remove);
    assert_eq!((action.x, action.y), (2, 0));
}

#[test]
fn missing_config_file_fails() {
    let (status, out) = run_bin(ENGINE, &["--config", "/nonexistent/gridsearch.json"], &[]);
    assert!(!status.success());
    assert!(out.is_empty());
}

#[test]
fn playout_writes_one_record_per_game() {
    let (status, out) = run_bin(
        PLAYOUT,
        &["--games", "3", "--seed", "7", "--policy", "greedy", "--quiet"],
        &[],
    );
    assert!(status.success());
    let records: Vec<serde_json::Value> = out
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["board_seed"], 7);
    assert_eq!(records[2]["board_seed"], 9);
    assert_eq!(records[0]["turns"].as_array().unwrap().len(), 4);
}
