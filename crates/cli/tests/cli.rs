use assert_cmd::Command;

fn adoptme() -> Command {
    let mut cmd = Command::cargo_bin("adoptme").unwrap();
    cmd.env("ADOPTME_CONFIG_DIR", env!("CARGO_MANIFEST_DIR"))
        .env_remove("ADOPTME_ENV")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = adoptme().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for command in ["serve", "seed", "config"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn config_prints_settings_json() {
    let output = adoptme()
        .arg("config")
        .env("ADOPTME__SERVER__PORT", "9191")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"port\": 9191"));
    assert!(stdout.contains("\"environment\": \"local\""));
}

#[test]
fn seed_without_snapshot_fails() {
    let output = adoptme()
        .args(["seed", "--users", "1", "--pets", "1"])
        .env_remove("ADOPTME__DATABASE__SNAPSHOT_PATH")
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("snapshot_path"));
}

#[test]
fn unknown_environment_is_rejected() {
    let output = adoptme()
        .arg("config")
        .env("ADOPTME_ENV", "moon")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
