use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "maze-chase"])
        .status()
        .expect("failed to invoke cargo check for maze-chase CLI binary");

    assert!(status.success(), "cargo check --bin maze-chase should succeed");
}

#[test]
fn help_lists_every_flag() {
    let output = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["run", "--quiet", "--bin", "maze-chase", "--", "--help"])
        .output()
        .expect("failed to invoke maze-chase --help");

    assert!(output.status.success(), "--help should exit cleanly");
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--config",
        "--seed",
        "--wrap-edges",
        "--ticks-per-second",
        "--pacing",
        "--log-file",
        "--pursuer-glyphs",
    ] {
        assert!(help.contains(flag), "help text is missing {flag}");
    }
}
