use std::path::PathBuf;
use std::process::Command;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_engrave")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "engrave.exe"
            } else {
                "engrave"
            });
            p
        })
}

#[test]
fn cli_frame_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("hero.png");

    let status = Command::new(exe())
        .args(["frame", "--progress", "0.5", "--width", "64", "--height", "48"])
        .arg("--assets")
        .arg(dir.path())
        .arg("--out")
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out_path).unwrap();
    assert_eq!((img.width(), img.height()), (64, 48));
}

#[test]
fn cli_tool_prints_sections() {
    let dir = tempfile::tempdir().unwrap();
    let tools = dir.path().join("content").join("tools");
    std::fs::create_dir_all(&tools).unwrap();
    std::fs::write(tools.join("ue.md"), "---\ntitle: Unreal\n---\n![a](a.png)\n\nText").unwrap();

    let output = Command::new(exe())
        .args(["tool", "ue", "--assets"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains("tool-page__section-img"));
    assert!(html.contains("tool-page__footer"));
}

#[test]
fn cli_tool_missing_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    let status = Command::new(exe())
        .args(["tool", "maya", "--assets"])
        .arg(dir.path())
        .status()
        .unwrap();
    assert!(!status.success());
}
