use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run the binary with its config isolated in a temporary directory
fn transcript(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("transcript").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("TRANSCRIPT_SERVER_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    transcript(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_show_uses_defaults() {
    let home = TempDir::new().unwrap();
    transcript(&home)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Configuration"))
        .stdout(predicate::str::contains("https://corsproxy.io/?"))
        .stdout(predicate::str::contains("ko -> en -> auto"));
}

#[test]
fn test_fetch_rejects_invalid_video() {
    let home = TempDir::new().unwrap();
    transcript(&home)
        .args(["fetch", "definitely not a video"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid video id or URL"));
}

#[test]
fn test_fetch_prints_server_transcript() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/transcript")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("videoId".into(), "dQw4w9WgXcQ".into()),
            mockito::Matcher::UrlEncoded("lang".into(), "ko".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"success":true,"transcript":"안녕 하세요","lang":"ko"}"#)
        .create();

    let home = TempDir::new().unwrap();
    transcript(&home)
        .args([
            "--quiet",
            "fetch",
            "https://youtu.be/dQw4w9WgXcQ",
            "--server-url",
        ])
        .arg(server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("안녕 하세요"))
        .stderr(predicate::str::contains("success (server: ko)"));

    mock.assert();
}

#[test]
fn test_fetch_writes_json_file() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/transcript")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success":true,"transcript":"hello there","lang":"en"}"#)
        .create();

    let home = TempDir::new().unwrap();
    let out = home.path().join("out.json");
    transcript(&home)
        .args(["--quiet", "fetch", "dQw4w9WgXcQ", "--format", "json", "--server-url"])
        .arg(server.url())
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Transcript saved to"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(saved["text"], "hello there");
    assert_eq!(saved["source"], "server");
}

#[test]
fn test_fetch_failure_is_generic() {
    let home = TempDir::new().unwrap();
    // Nothing listens on port 1, so the relay is refused straight away.
    std::fs::write(
        home.path().join("config.yaml"),
        r#"server:
  base_url: http://127.0.0.1:1
  enabled: true
relay:
  url_prefix: "http://127.0.0.1:1/?"
  enabled: true
languages:
  primary: ko
  secondary: en
http:
  timeout_secs: 5
  user_agent: test
serve:
  bind: 127.0.0.1:8888
"#,
    )
    .unwrap();

    // Logs may name the failing strategy; only the surfaced message is checked.
    transcript(&home)
        .env("RUST_LOG", "off")
        .args(["--quiet", "fetch", "dQw4w9WgXcQ", "--no-server"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to fetch transcript from every source"))
        .stderr(predicate::str::contains("upstream unreachable").not());
}
