use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::{tempdir, TempDir};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

fn copy_tree(from: &Path, to: &Path) {
    fs::create_dir_all(to).expect("mkdir");
    for entry in fs::read_dir(from).expect("read_dir") {
        let entry = entry.expect("dir entry");
        let target = to.join(entry.file_name());
        if entry.file_type().expect("file type").is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).expect("copy fixture");
        }
    }
}

/// Scratch copy of the VS2010 sample solution under `<tmp>/in`.
fn sample() -> (TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    copy_tree(&fixture("vs2010"), &dir.path().join("in"));
    let solution = dir.path().join("in").join("Sample.sln");
    (dir, solution)
}

fn sln_downgrade() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sln-downgrade"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn json_report(cmd: &mut Command) -> Value {
    let assert = cmd.arg("--format").arg("json").assert().success();
    serde_json::from_slice(&assert.get_output().stdout).expect("json report")
}

#[test]
fn convert_to_2008_rewrites_solution_and_projects() {
    let (dir, solution) = sample();
    let out = dir.path().join("out");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .arg("--output")
        .arg(path_as_str(&out))
        .arg("--solution-postfix")
        .arg("_vs2008")
        .arg("--project-postfix")
        .arg("_vs2008")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "convert_summary target=2008 converted=2 already_converted=0 skipped=2",
        ));

    let source = fs::read_to_string(&solution).expect("read source solution");
    let expected = source
        .replace("Format Version 11.00", "Format Version 10.00")
        .replace("# Visual Studio 2010", "# Visual Studio 2008")
        .replace(r#""App", "App\App.csproj""#, r#""App_vs2008", "App\App_vs2008.csproj""#)
        .replace(r#""Lib", "Lib\Lib.vbproj""#, r#""Lib_vs2008", "Lib\Lib_vs2008.vbproj""#);
    let converted = fs::read_to_string(out.join("Sample_vs2008.sln")).expect("read solution");
    assert_eq!(converted, expected);

    let app = fs::read_to_string(out.join("App").join("App_vs2008.csproj")).expect("read app");
    assert!(app.contains(r#"<Project ToolsVersion="3.5" DefaultTargets="Build""#));
    assert!(app.contains("<ProductVersion>9.0.21022</ProductVersion>"));
    assert!(app.contains("<TargetFrameworkVersion>v3.5</TargetFrameworkVersion>"));
    assert!(app.contains(r#"<ProjectReference Include="..\Lib\Lib_vs2008.vbproj">"#));
    assert!(app.contains(r#"<Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets" />"#));
    assert!(app.contains("  <!-- To modify your build process"));
    assert!(app.contains("  <Target Name=\"AfterBuild\">\n  </Target>\n  -->\n</Project>\n"));

    let lib = fs::read_to_string(out.join("Lib").join("Lib_vs2008.vbproj")).expect("read lib");
    assert!(!lib.contains("OldToolsVersion"));
    assert!(lib.contains("<TargetFrameworkVersion>v3.5</TargetFrameworkVersion>"));
    assert!(lib.contains(r#"\Microsoft\Silverlight\v3.0\Microsoft.Silverlight.VisualBasic.targets"#));

    assert!(!out.join("Native").exists());
    assert!(!out.join("Solution Items").exists());
    let original_app = fs::read_to_string(fixture("vs2010/App/App.csproj")).expect("fixture");
    assert_eq!(
        fs::read_to_string(dir.path().join("in").join("App").join("App.csproj")).expect("source app"),
        original_app
    );
}

#[test]
fn convert_to_2005_removes_tools_version_and_framework() {
    let (dir, solution) = sample();
    let out = dir.path().join("out");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .arg("--target")
        .arg("2005")
        .arg("--output")
        .arg(path_as_str(&out))
        .assert()
        .success();

    let converted = fs::read_to_string(out.join("Sample.sln")).expect("read solution");
    assert!(converted.contains("Microsoft Visual Studio Solution File, Format Version 9.00\r\n"));
    assert!(converted.contains("# Visual Studio 2005\r\n"));

    let app = fs::read_to_string(out.join("App").join("App.csproj")).expect("read app");
    assert!(app.contains(r#"<Project DefaultTargets="Build" xmlns="#));
    assert!(!app.contains("ToolsVersion"));
    assert!(!app.contains("TargetFrameworkVersion"));
    assert!(app.contains("<ProductVersion>8.0.50727</ProductVersion>"));
    assert!(app.contains(r#"<Import Project="$(MSBuildBinPath)\Microsoft.CSharp.targets" />"#));
    assert!(app.contains(r#"<ProjectReference Include="..\Lib\Lib.vbproj">"#));
}

#[test]
fn second_run_reports_already_converted() {
    let (dir, solution) = sample();
    let out = dir.path().join("out");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .arg("--output")
        .arg(path_as_str(&out))
        .assert()
        .success();
    let app_path = out.join("App").join("App.csproj");
    let first_pass = fs::read(&app_path).expect("read app");

    let report = json_report(sln_downgrade().arg(path_as_str(&out.join("Sample.sln"))));

    let statuses: Vec<_> = report["projects"]
        .as_array()
        .expect("projects")
        .iter()
        .map(|p| p["outcome"]["status"].as_str().expect("status").to_string())
        .collect();
    assert_eq!(statuses, vec!["already_converted", "already_converted"]);
    assert_eq!(fs::read(&app_path).expect("read app"), first_pass);
}

#[test]
fn json_report_lists_skipped_entries() {
    let (dir, solution) = sample();

    let report = json_report(
        sln_downgrade()
            .arg(path_as_str(&solution))
            .arg("--output")
            .arg(path_as_str(&dir.path().join("out"))),
    );

    assert_eq!(report["target"], "2008");
    let skipped: Vec<_> = report["skipped"]
        .as_array()
        .expect("skipped")
        .iter()
        .map(|s| (s["line"].as_u64().expect("line"), s["reason"].as_str().expect("reason").to_string()))
        .collect();
    assert_eq!(
        skipped,
        vec![
            (7, "unsupported-extension".to_string()),
            (9, "virtual-folder".to_string()),
        ]
    );
    assert_eq!(report["projects"][0]["name"], "App");
    assert_eq!(report["projects"][0]["outcome"]["status"], "converted");
}

#[test]
fn solution_without_recognized_lines_gains_only_the_marker() {
    let dir = tempdir().expect("tempdir");
    let solution = dir.path().join("Plain.sln");
    let body = b"Global\r\n\tGlobalSection(SolutionProperties) = preSolution\n\tEndGlobalSection\r\nEndGlobal";
    fs::write(&solution, body).expect("write");
    let out = dir.path().join("out");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .arg("--output")
        .arg(path_as_str(&out))
        .assert()
        .success();

    let mut expected = b"\xEF\xBB\xBF\r\n".to_vec();
    expected.extend_from_slice(body);
    assert_eq!(fs::read(out.join("Plain.sln")).expect("read"), expected);
}

#[test]
fn config_file_next_to_solution_is_applied() {
    let (dir, solution) = sample();
    fs::write(
        dir.path().join("in").join("sln-downgrade.toml"),
        "target = \"2010\"\noutput = \"../converted\"\n\n[project]\npostfix = \"-old\"\n",
    )
    .expect("write config");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .assert()
        .success()
        .stdout(predicate::str::contains("target=2010"));

    let converted = dir.path().join("in").join("..").join("converted");
    let solution_text = fs::read_to_string(converted.join("Sample.sln")).expect("read solution");
    assert!(solution_text.contains("# Visual Studio 2010\r\n"));
    assert!(solution_text.contains(r#""App-old", "App\App-old.csproj""#));
    assert!(converted.join("Lib").join("Lib-old.vbproj").is_file());
}

#[test]
fn cli_target_overrides_config_file() {
    let (dir, solution) = sample();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "target = \"2010\"\n").expect("write config");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .arg("--config")
        .arg(path_as_str(&config))
        .arg("--target")
        .arg("2012")
        .arg("--output")
        .arg(path_as_str(&dir.path().join("out")))
        .assert()
        .success()
        .stdout(predicate::str::contains("target=2012"));
}

#[test]
fn unsupported_target_fails_before_writing() {
    let (dir, solution) = sample();
    let out = dir.path().join("out");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .arg("--target")
        .arg("2003")
        .arg("--output")
        .arg(path_as_str(&out))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported target format '2003'"));

    assert!(!out.exists());
}

#[test]
fn unsupported_target_is_reported_before_reading_config() {
    let (dir, solution) = sample();
    fs::write(dir.path().join("in").join("sln-downgrade.toml"), "target = [unclosed\n")
        .expect("write config");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .arg("--target")
        .arg("2003")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported target format '2003'"))
        .stderr(predicate::str::contains("configuration").not());
}

#[test]
fn missing_solution_fails() {
    let dir = tempdir().expect("tempdir");

    sln_downgrade()
        .arg(path_as_str(&dir.path().join("Absent.sln")))
        .assert()
        .failure()
        .stderr(predicate::str::contains("solution file not found"));
}

#[test]
fn invalid_config_key_fails() {
    let (dir, solution) = sample();
    fs::write(dir.path().join("in").join("sln-downgrade.toml"), "tagret = \"2005\"\n")
        .expect("write config");

    sln_downgrade()
        .arg(path_as_str(&solution))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn missing_solution_argument_prints_usage() {
    sln_downgrade()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
