use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_spooknloot"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch spooknloot binary")
}

#[test]
fn short_session_prints_summary() {
    let output = run(&["--seed", "7", "--frames", "120"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("frames simulated:  120"));
    assert!(stdout.contains("levels cleared:"));
    assert!(stdout.contains("mode reached:"));
}

#[test]
fn seeded_sessions_are_reproducible() {
    let first = run(&["--seed", "42", "--frames", "600", "--dump-level"]);
    let second = run(&["--seed", "42", "--frames", "600", "--dump-level"]);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert!(String::from_utf8_lossy(&first.stdout).contains('E'));
}

#[test]
fn missing_config_file_is_reported() {
    let output = run(&["--config", "/nonexistent/spooknloot.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read configuration"));
}
