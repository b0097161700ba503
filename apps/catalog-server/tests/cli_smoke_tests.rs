//! CLI smoke tests for the catalog-server binary.
//!
//! Each test runs the built binary with a config rooted in a temp dir so
//! nothing touches the real home directory.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog-server"));
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd
}

fn run_catalog_server(args: &[&str]) -> std::process::Output {
    server_command()
        .args(args)
        .output()
        .expect("Failed to execute catalog-server")
}

fn write_data(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("items.json"),
        r#"[
  {"name": "Stick", "namespacedId": "stick", "description": "A stick.", "image": "stick.png", "stackSize": 64, "renewable": true},
  {"name": "Coal", "namespacedId": "coal", "description": "Fuel.", "image": "coal.png", "stackSize": 64, "renewable": false}
]"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("blocks.json"),
        r#"[{"name": "Stone", "namespacedId": "stone", "description": "Rock.", "image": "stone.png", "item": "Stone", "tool": "Pickaxe", "flammable": false, "transparent": false, "luminance": 0, "blastResistance": 6, "colors": []}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("recipes.json"),
        r#"[{"item": "Torch", "quantity": 4, "shapeless": false, "recipe": [null, null, null, null, "Coal", null, null, "Stick", null]}]"#,
    )
    .unwrap();
}

/// Temp dir with `home/`, `data/` and a `config.yaml` pointing at both.
fn workspace(extra_yaml: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let data = tmp.path().join("data");
    write_data(&data);
    let config = tmp.path().join("config.yaml");
    let yaml = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 8087

logging:
  default:
    console_level: info
    file: "logs/catalog.log"
    file_level: debug
    max_backups: 2
    max_size_mb: 1

modules:
  catalog:
    data_dir: "{data}"
{extra_yaml}
"#,
        home = tmp.path().join("home").to_string_lossy().replace('\\', "/"),
        data = data.to_string_lossy().replace('\\', "/"),
    );
    std::fs::write(&config, yaml).expect("Failed to write config file");
    (tmp, config)
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn http_get(port: u16, path: &str) -> Option<String> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).ok()?;
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .ok()?;
    write!(
        stream,
        "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    )
    .ok()?;
    let mut response = String::new();
    stream.read_to_string(&mut response).ok()?;
    Some(response)
}

struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

#[test]
fn test_cli_help_command() {
    let output = run_catalog_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--data-dir"), "Should mention data dir option");
}

#[test]
fn test_cli_version_command() {
    let output = run_catalog_server(&["--version"]);
    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("catalog-server 0.1.0"), "{stdout}");
}

#[test]
fn test_cli_invalid_command() {
    let output = run_catalog_server(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "{stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_catalog_server(&["-c", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"), "{stderr}");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed").unwrap();

    let output = run_catalog_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "{stderr}");
}

#[test]
fn test_cli_check_passes_with_valid_data() {
    let (tmp, config) = workspace("");
    let output = run_catalog_server(&["--config", config.to_str().unwrap(), "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");
    assert!(stdout.contains("Configuration check passed"));
    assert!(tmp.path().join("home").is_dir(), "home_dir is created");
}

#[test]
fn test_cli_check_reports_broken_data() {
    let (tmp, config) = workspace("");
    std::fs::write(tmp.path().join("data/blocks.json"), "{ not an array").unwrap();

    let output = run_catalog_server(&["--config", config.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("blocks"), "{stderr}");
}

#[test]
fn test_cli_data_dir_flag_overrides_config() {
    let (tmp, config) = workspace("");
    let empty = tmp.path().join("empty");
    std::fs::create_dir_all(&empty).unwrap();

    let output = run_catalog_server(&[
        "--config",
        config.to_str().unwrap(),
        "--data-dir",
        empty.to_str().unwrap(),
        "check",
    ]);
    assert!(
        !output.status.success(),
        "an empty data dir has no collections to load"
    );
}

#[test]
fn test_cli_print_config() {
    let (_tmp, config) = workspace("");
    let output = run_catalog_server(&[
        "--config",
        config.to_str().unwrap(),
        "--port",
        "9191",
        "-vv",
        "--print-config",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9191"), "{stdout}");
    assert!(stdout.contains("console_level: trace"), "{stdout}");
    assert!(stdout.contains("data_dir:"), "{stdout}");
}

#[test]
fn test_cli_unknown_config_key_is_rejected() {
    let (_tmp, config) = workspace("database:\n  url: \"sqlite://x.db\"\n");
    let output = run_catalog_server(&["--config", config.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_run_with_invalid_bind_address() {
    let (_tmp, config) = workspace("  api_ingress:\n    bind_addr: \"not-an-address\"\n");
    let output = run_catalog_server(&["--config", config.to_str().unwrap(), "run"]);
    assert!(!output.status.success(), "Should fail with invalid bind address");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid bind address"), "{stderr}");
}

#[test]
fn test_cli_run_serves_queries() {
    let (tmp, config) = workspace("");
    let port = free_port();
    let child = server_command()
        .args(["--config", config.to_str().unwrap(), "--port"])
        .arg(port.to_string())
        .arg("run")
        .spawn()
        .expect("Failed to start catalog-server");
    let _guard = KillOnDrop(child);

    let deadline = Instant::now() + Duration::from_secs(15);
    let health = loop {
        if let Some(resp) = http_get(port, "/health") {
            break resp;
        }
        assert!(Instant::now() < deadline, "server did not come up on {port}");
        std::thread::sleep(Duration::from_millis(100));
    };
    assert!(health.starts_with("HTTP/1.1 200"), "{health}");

    let items = http_get(port, "/items?fields=name&sort=name").unwrap();
    assert!(items.starts_with("HTTP/1.1 200"), "{items}");
    assert!(items.contains(r#"[{"name":"Coal"},{"name":"Stick"}]"#), "{items}");

    let recipe = http_get(port, "/crafting-recipes/1?fields=recipe&itemFields=namespacedId").unwrap();
    assert!(recipe.contains(r#""coal""#), "{recipe}");

    let bad = http_get(port, "/items?page=2").unwrap();
    assert!(bad.starts_with("HTTP/1.1 400"), "{bad}");

    assert!(tmp.path().join("home/logs").is_dir(), "file logging is set up");
}
