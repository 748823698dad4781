use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("texplot"));
}

#[test]
fn demo_writes_raw_markup() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("demo.tikz");
    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.args(["demo", "--out", out.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Wrote 3 series"));

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.matches("\\addplot [").count(), 2);
    assert_eq!(text.matches("\\addplot+ [ycomb, red,").count(), 1);
    assert!(text.contains("axis lines=center,"));
    assert!(text.contains("xmin = 0.000000, xmax = 10.000000,"));
    assert!(text.contains("\\addlegendentry{$y_d[n]$}"));
    // 1000 + 1000 samples plus 11 stems
    assert_eq!(text.lines().filter(|l| l.starts_with("    (")).count(), 2011);
}

#[test]
fn csv_columns_become_series() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.csv");
    fs::write(&input, "t,a,b\n0,1,2\n1,3,4\n2,5,6\n").unwrap();
    let out = dir.path().join("data.tikz");

    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.args([
        "csv",
        input.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--colors",
        "red,blue",
        "--ylim",
        "-1:7",
        "--width",
        "10",
        "--height",
        "6",
        "--legend-pos",
        "north west",
        "--grid",
    ]);
    cmd.assert().success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("ymin = -1.000000, ymax = 7.000000,"));
    assert!(text.contains("width=10.000000 cm,"));
    assert!(text.contains("legend pos=north west,"));
    assert!(text.contains("grid=major,"));
    let red = text.find("color=red,").unwrap();
    let blue = text.find("color=blue,").unwrap();
    assert!(red < blue);
    assert!(text.contains("\\addlegendentry{a}\n"));
    assert!(text.contains("    (2.000000,6.000000)\n"));
}

#[test]
fn csv_stem_mode() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("seq.csv");
    fs::write(&input, "n,x\n0,1\n1,0.75\n").unwrap();
    let out = dir.path().join("seq.tikz");

    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.args(["csv", input.to_str().unwrap(), "--out", out.to_str().unwrap(), "--stem"]);
    cmd.assert().success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\\addplot+ [ycomb, , mark=*"));
}

#[test]
fn csv_rejects_non_numeric_cells() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "t,a\n0,zero\n").unwrap();
    let out = dir.path().join("bad.tikz");

    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.args(["csv", input.to_str().unwrap(), "--out", out.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a number"));
    assert!(!out.exists());
}

#[test]
fn bad_axis_style_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.csv");
    fs::write(&input, "t,a\n0,1\n").unwrap();

    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.args([
        "csv",
        input.to_str().unwrap(),
        "--out",
        "unused.tikz",
        "--axis",
        "polar",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown axis style"));
}

#[test]
fn render_json_description() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("fig.json");
    fs::write(
        &input,
        r#"{
            "axis_style": "centered",
            "x_label": "$t$",
            "legend_position": "south-west",
            "series": [
                {"kind": "stem", "color": "red", "legend": "$h[n]$", "points": [[0, 1], [1, 0.5]]}
            ]
        }"#,
    )
    .unwrap();
    let out = dir.path().join("fig.tikz");

    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.args(["render", input.to_str().unwrap(), "--out", out.to_str().unwrap()]);
    cmd.assert().success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("axis lines=center,"));
    assert!(text.contains("xlabel={$t$},"));
    assert!(text.contains("legend pos=south west,"));
    assert!(text.contains("\\addplot+ [ycomb, red,"));
    assert!(text.contains("\\addlegendentry{$h[n]$}"));
}

#[test]
fn render_without_target_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("fig.json");
    fs::write(&input, r#"{"series": []}"#).unwrap();

    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.args(["render", input.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no target path"));
}

#[test]
fn bad_timeout_only_fails_compiled_targets() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("demo.tikz");
    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.env("TEXPLOT_COMPILE_TIMEOUT", "soon")
        .args(["demo", "--out", out.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Wrote 3 series"));
    assert!(out.exists());

    let pdf = dir.path().join("demo.pdf");
    let mut cmd = Command::cargo_bin("texplot").unwrap();
    cmd.env("TEXPLOT_COMPILE_TIMEOUT", "soon")
        .args(["demo", "--out", pdf.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid timeout `soon`"));
    assert!(!dir.path().join("demo.tex").exists());
}
