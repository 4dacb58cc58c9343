use std::path::PathBuf;

use msbuild_xml::{parse, parse_file, write, write_file};
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parse_write_parse_round_trip_preserves_tree_shape() {
    let first = parse_file(&fixture("fixtures/vs2010/App/App.csproj")).expect("initial parse");

    let written = write(&first).expect("write should succeed");
    let second = parse(&written).expect("re-parse should succeed");

    assert_eq!(first, second);
}

#[test]
fn write_reproduces_two_space_indented_fixture_text() {
    let source_path = fixture("fixtures/vs2010/Lib/Lib.vbproj");
    let original = std::fs::read_to_string(&source_path).expect("read fixture");

    let doc = parse_file(&source_path).expect("parse should succeed");
    let written = String::from_utf8(write(&doc).expect("write")).expect("utf-8");

    assert_eq!(written, original);
}

#[test]
fn write_keeps_the_stock_build_process_comment() {
    let source_path = fixture("fixtures/vs2010/App/App.csproj");
    let original = std::fs::read_to_string(&source_path).expect("read fixture");

    let doc = parse_file(&source_path).expect("parse should succeed");
    let written = String::from_utf8(write(&doc).expect("write")).expect("utf-8");

    assert!(written.contains("  <!-- To modify your build process"));
    assert!(written.contains("  <Target Name=\"BeforeBuild\">\n  </Target>\n"));
    assert_eq!(written, original);
}

#[test]
fn missing_final_line_break_is_not_added() {
    let source = b"<Project>\n  <A>1</A>\n</Project>";

    let written = write(&parse(source).expect("parse")).expect("write");

    assert_eq!(written, source.to_vec());
}

#[test]
fn crlf_and_bom_survive_a_file_round_trip() {
    let source = b"\xEF\xBB\xBF<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n<Project ToolsVersion=\"4.0\">\r\n  <PropertyGroup>\r\n    <A>1</A>\r\n  </PropertyGroup>\r\n  <!-- keep\r\n  me -->\r\n</Project>\r\n";
    let out_dir = tempfile::tempdir().expect("tempdir should be created");
    let out_path = out_dir.path().join("roundtrip.csproj");

    let doc = parse(source).expect("parse should succeed");
    write_file(&doc, &out_path).expect("write_file should succeed");

    let bytes = std::fs::read(&out_path).expect("read back");
    assert_eq!(bytes, source.to_vec());
}
