use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn seed_project(dir: &Path) {
    write_file(&dir.join("README.md"), "# Demo project\n");
    write_file(&dir.join("package.json"), "{\"name\":\"demo\"}\n");
    write_file(&dir.join("src/index.js"), "console.log(1);\n");
    write_file(&dir.join("node_modules/left-pad/index.js"), "module.exports = 1;\n");
}

fn codepack(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_codepack"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn cli_writes_markdown_in_priority_order_and_excludes_dependencies() {
    let src = tempdir().unwrap();
    seed_project(src.path());
    let out = tempdir().unwrap();
    let base = out.path().join("ctx");

    let output = codepack(&[src.path().to_str().unwrap(), "-o", base.to_str().unwrap()]);
    assert!(output.status.success());

    let text = fs::read_to_string(out.path().join("ctx.md")).unwrap();
    let readme = text.find("### README.md").unwrap();
    let manifest = text.find("### package.json").unwrap();
    let entry = text.find("### src/index.js").unwrap();
    assert!(readme < manifest && manifest < entry);
    assert!(!text.contains("left-pad"));
}

#[test]
fn cli_reports_oversized_files_as_skipped_without_content() {
    let src = tempdir().unwrap();
    seed_project(src.path());
    write_file(&src.path().join("big.js"), &"x".repeat(600 * 1024));
    let out = tempdir().unwrap();
    let base = out.path().join("ctx");

    let output = codepack(&[src.path().to_str().unwrap(), "-o", base.to_str().unwrap()]);
    assert!(output.status.success());

    let text = fs::read_to_string(out.path().join("ctx.md")).unwrap();
    assert!(text.contains("- big.js (600 KB)"));
    assert!(!text.contains("### big.js"));
}

#[test]
fn cli_all_formats_writes_nine_consistent_documents() {
    let src = tempdir().unwrap();
    seed_project(src.path());
    let out = tempdir().unwrap();
    let base = out.path().join("ctx");

    let output = codepack(&[
        src.path().to_str().unwrap(),
        "-o",
        base.to_str().unwrap(),
        "--all-formats",
    ]);
    assert!(output.status.success());

    let extensions = [
        "md",
        "smart.md",
        "mdyaml.md",
        "json",
        "yaml",
        "toml",
        "jsonld",
        "msgpack.txt",
        "dsl",
    ];
    for extension in extensions {
        assert!(
            out.path().join(format!("ctx.{extension}")).exists(),
            "missing ctx.{extension}"
        );
    }

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("ctx.json")).unwrap()).unwrap();
    let yaml: serde_yml::Value =
        serde_yml::from_str(&fs::read_to_string(out.path().join("ctx.yaml")).unwrap()).unwrap();
    let json_total = json["metadata"]["totalFiles"].as_u64().unwrap();
    let yaml_total = yaml["metadata"]["totalFiles"].as_u64().unwrap();
    assert_eq!(json_total, 3);
    assert_eq!(json_total, yaml_total);

    // The msgpack archive carries the same document between its sentinels.
    let archive = fs::read_to_string(out.path().join("ctx.msgpack.txt")).unwrap();
    let start = archive.find("MSGPACK_BASE64_START").unwrap();
    let end = archive.find("MSGPACK_BASE64_END").unwrap();
    let encoded: String = archive[start..end]
        .lines()
        .skip(1)
        .collect::<Vec<_>>()
        .join("");
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .unwrap();
    let decoded: serde_json::Value = rmp_serde::from_slice(&bytes).unwrap();
    assert_eq!(decoded["metadata"]["totalFiles"].as_u64().unwrap(), 3);
}

#[test]
fn cli_honors_gitignore_unless_disabled() {
    let src = tempdir().unwrap();
    seed_project(src.path());
    write_file(&src.path().join(".gitignore"), "generated.js\n");
    write_file(&src.path().join("generated.js"), "var g = 1;\n");
    let out = tempdir().unwrap();

    let base = out.path().join("with");
    let output = codepack(&[src.path().to_str().unwrap(), "-o", base.to_str().unwrap()]);
    assert!(output.status.success());
    let text = fs::read_to_string(out.path().join("with.md")).unwrap();
    assert!(!text.contains("### generated.js"));

    let base = out.path().join("without");
    let output = codepack(&[
        src.path().to_str().unwrap(),
        "-o",
        base.to_str().unwrap(),
        "--no-gitignore",
    ]);
    assert!(output.status.success());
    let text = fs::read_to_string(out.path().join("without.md")).unwrap();
    assert!(text.contains("### generated.js"));
}

#[test]
fn cli_exclude_patterns_stack_on_builtins() {
    let src = tempdir().unwrap();
    seed_project(src.path());
    write_file(&src.path().join("fixtures/data.json"), "{}\n");
    let out = tempdir().unwrap();
    let base = out.path().join("ctx");

    let output = codepack(&[
        src.path().to_str().unwrap(),
        "-o",
        base.to_str().unwrap(),
        "-e",
        "fixtures/",
    ]);
    assert!(output.status.success());
    let text = fs::read_to_string(out.path().join("ctx.md")).unwrap();
    assert!(!text.contains("fixtures/data.json"));
    assert!(text.contains("### package.json"));
}

#[test]
fn cli_compact_strips_comments() {
    let src = tempdir().unwrap();
    write_file(
        &src.path().join("src/app.js"),
        "// setup\nconst a = 1;\n\n\n\nconst b = 2;\n",
    );
    let out = tempdir().unwrap();
    let base = out.path().join("ctx");

    let output = codepack(&[
        src.path().to_str().unwrap(),
        "-o",
        base.to_str().unwrap(),
        "--compact",
    ]);
    assert!(output.status.success());
    let text = fs::read_to_string(out.path().join("ctx.md")).unwrap();
    assert!(!text.contains("// setup"));
    assert!(text.contains("const a = 1;"));
}

#[test]
fn cli_dry_run_writes_nothing() {
    let src = tempdir().unwrap();
    seed_project(src.path());
    let out = tempdir().unwrap();
    let base = out.path().join("ctx");

    let output = codepack(&[
        src.path().to_str().unwrap(),
        "-o",
        base.to_str().unwrap(),
        "--dry-run",
        "--all-formats",
    ]);
    assert!(output.status.success());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn cli_rejects_missing_source_directory() {
    let out = tempdir().unwrap();
    let base = out.path().join("ctx");

    let output = codepack(&[
        "/definitely/not/a/real/dir",
        "-o",
        base.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid path"));
}

#[test]
fn cli_rejects_unknown_format_with_a_message() {
    let src = tempdir().unwrap();
    seed_project(src.path());
    let out = tempdir().unwrap();
    let base = out.path().join("ctx");

    let output = codepack(&[
        src.path().to_str().unwrap(),
        "-o",
        base.to_str().unwrap(),
        "-f",
        "parquet",
    ]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Unsupported format"));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn cli_completions_print_a_script() {
    let output = codepack(&["--completions", "bash"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("codepack"));
}
