//! Integration tests for the `arfa` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// `arfa` running in `dir`, isolated from the user's config and env.
fn arfa(dir: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("arfa");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("ARFA_PROJECT__DEFAULT_NAME")
        .env_remove("ARFA_ROUTER__PAGES_ROOT")
        .env_remove("ARFA_ROUTER__GUARD_POLICY");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small pages directory with a guarded dashboard.
fn pages(root: &Path) {
    write(root, "pages/index.tsx", "export default () => null;");
    write(root, "pages/about.tsx", "export default () => null;");
    write(root, "pages/blog/[id].tsx", "export default () => null;");
    write(root, "pages/blog/[...slug].tsx", "export default () => null;");
    write(root, "pages/_layout.tsx", "export default (p) => p.children;");
    write(
        root,
        "pages/dashboard/_layout.tsx",
        "export function protect() { return false; }\nexport const protectRedirect = \"/login\";\n",
    );
    write(root, "pages/dashboard/index.tsx", "export default () => null;");
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("routes"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_argument_exits_2() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["routes", "--frobnicate"])
        .assert()
        .code(2);
}

#[test]
fn test_no_arguments_prints_help_and_exits_2() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path()).assert().code(2);
}

// ── new ───────────────────────────────────────────────────────────────────────

#[test]
fn test_new_project_success() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["new", "shop", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cd shop"))
        .stdout(predicate::str::contains("npm install"))
        .stdout(predicate::str::contains("npm run dev"));

    let root = temp.path().join("shop");
    assert!(root.join("index.html").is_file());
    assert!(root.join("src/main.tsx").is_file());
    assert!(root.join("src/pages/dashboard/_layout.tsx").is_file());

    let manifest = fs::read_to_string(root.join("package.json")).unwrap();
    assert!(manifest.starts_with("{\n  \"name\": \"shop\","));
    assert!(manifest.contains("\"private\": true"));
}

#[test]
fn test_new_without_name_uses_default_when_not_interactive() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path()).arg("new").write_stdin("").assert().success();
    assert!(temp.path().join("my-arfa-app/package.json").is_file());
}

#[test]
fn test_new_default_name_from_environment() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .env("ARFA_PROJECT__DEFAULT_NAME", "from-env")
        .args(["new", "--yes"])
        .assert()
        .success();
    assert!(temp.path().join("from-env").is_dir());
}

#[test]
fn test_new_project_dry_run() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["new", "preview", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package.json"))
        .stdout(predicate::str::contains("src/pages/index.tsx"));

    assert!(!temp.path().join("preview").exists());
}

#[test]
fn test_new_into_non_empty_directory_fails() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "taken/notes.txt", "keep");

    arfa(temp.path())
        .args(["new", "taken", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(temp.path().join("taken/notes.txt")).unwrap(), "keep");
    assert!(!temp.path().join("taken/package.json").exists());
}

#[test]
fn test_new_into_empty_directory_succeeds() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("empty")).unwrap();

    arfa(temp.path()).args(["new", "empty", "--yes"]).assert().success();
    assert!(temp.path().join("empty/package.json").is_file());
}

#[test]
fn test_error_invalid_project_name() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["new", "My App", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name"))
        .stderr(predicate::str::contains("lowercase"));

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_new_from_template_directory() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "tpl/package.json", "{\"name\":\"tpl\",\"version\":\"1.0.0\"}");
    write(temp.path(), "tpl/src/pages/index.tsx", "// home");
    write(temp.path(), "tpl/node_modules/x/index.js", "");

    arfa(temp.path())
        .args(["new", "custom", "--yes", "--template-dir", "tpl"])
        .assert()
        .success();

    let root = temp.path().join("custom");
    assert_eq!(
        fs::read_to_string(root.join("package.json")).unwrap(),
        "{\n  \"name\": \"custom\",\n  \"version\": \"1.0.0\",\n  \"private\": true\n}"
    );
    assert!(root.join("src/pages/index.tsx").is_file());
    assert!(!root.join("node_modules").exists());
}

#[test]
fn test_new_with_missing_template_directory_exits_3() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["new", "x", "--yes", "--template-dir", "nowhere"])
        .assert()
        .code(3);
    assert!(!temp.path().join("x").exists());
}

// ── routes ────────────────────────────────────────────────────────────────────

#[test]
fn test_routes_table() {
    let temp = TempDir::new().unwrap();
    pages(temp.path());

    arfa(temp.path())
        .args(["routes", "pages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/about"))
        .stdout(predicate::str::contains("/blog/[id]"))
        .stdout(predicate::str::contains("/blog/[...slug]"))
        .stdout(predicate::str::contains("guard \u{2192} /login"))
        .stdout(predicate::str::contains("404: built-in"));
}

#[test]
fn test_routes_json_in_precedence_order() {
    let temp = TempDir::new().unwrap();
    pages(temp.path());

    let out = arfa(temp.path())
        .args(["routes", "pages", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let routes: Vec<&str> = doc["routes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["route"].as_str().unwrap())
        .collect();
    // Statics first, deeper first; dynamic ties keep scan (file name) order.
    assert_eq!(
        routes,
        ["/about", "/dashboard", "/", "/blog/[...slug]", "/blog/[id]"]
    );
    assert_eq!(doc["guard_policy"], "pass-through");
    assert_eq!(doc["app"], false);
}

#[test]
fn test_routes_match_catch_all() {
    let temp = TempDir::new().unwrap();
    pages(temp.path());

    arfa(temp.path())
        .args(["routes", "pages", "--match", "blog/2024/recap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Path:    /blog/2024/recap"))
        .stdout(predicate::str::contains("Params:  slug=2024/recap"));
}

#[test]
fn test_routes_match_json_reports_layout_chain() {
    let temp = TempDir::new().unwrap();
    pages(temp.path());

    let out = arfa(temp.path())
        .args(["--output-format", "json", "routes", "pages", "--match", "/dashboard"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["route"]["file"], "./pages/dashboard/index.tsx");
    assert_eq!(doc["layouts"][0]["dir"], "/");
    assert_eq!(doc["layouts"][1]["guard_redirect"], "/login");
}

#[test]
fn test_routes_respects_configured_pages_root() {
    let temp = TempDir::new().unwrap();
    pages(temp.path());

    let out = arfa(temp.path())
        .env("ARFA_ROUTER__PAGES_ROOT", "/src/pages")
        .args(["routes", "pages", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["routes"][0]["file"], "/src/pages/about.tsx");
    assert_eq!(doc["routes"][0]["route"], "/about");
}

#[test]
fn test_routes_missing_directory_exits_3() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["routes", "missing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing"));
}

// ── completions ───────────────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("arfa"));
}

// ── config ────────────────────────────────────────────────────────────────────

#[test]
fn test_config_get_from_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "arfa.toml", "[router]\nguard_policy = \"enforce\"\n");

    arfa(temp.path())
        .args(["--config", "arfa.toml", "config", "get", "router.guard_policy"])
        .assert()
        .success()
        .stdout("enforce\n");
}

#[test]
fn test_config_list_shows_sections() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[project]"))
        .stdout(predicate::str::contains("default_name = \"my-arfa-app\""))
        .stdout(predicate::str::contains("[router]"));
}

#[test]
fn test_config_path_prefers_flag() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "custom.toml", "");

    arfa(temp.path())
        .args(["config", "path", "--config", "custom.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_unknown_key_exits_1() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["config", "get", "nope.nothing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_missing_config_file_exits_4() {
    let temp = TempDir::new().unwrap();
    arfa(temp.path())
        .args(["--config", "absent.toml", "config", "list"])
        .assert()
        .code(4);
}

#[test]
fn test_invalid_config_value_exits_4() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "arfa.toml", "[router]\nguard_policy = \"maybe\"\n");

    arfa(temp.path())
        .args(["--config", "arfa.toml", "routes"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}
