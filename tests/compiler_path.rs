//! A relative compiler path names a program relative to where the caller runs, even though
//! the compiler itself runs in the target's directory.
#![cfg(unix)]

use std::fs;
use tempfile::tempdir;
use texplot::{Compiler, Figure};

#[test]
fn relative_compiler_path_is_resolved_from_the_callers_directory() {
    // Tool directory below the current directory, so it can be named relatively.
    let tools = tempfile::Builder::new()
        .prefix("texplot-tools")
        .tempdir_in(".")
        .unwrap();
    std::os::unix::fs::symlink("/bin/sh", tools.path().join("latex")).unwrap();
    let script = tools.path().join("fake-latex.sh");
    fs::write(
        &script,
        "for last; do :; done\nbase=\"${last%.tex}\"\ntouch \"$base.pdf\" \"$base.aux\" \"$base.log\"\n",
    )
    .unwrap();

    let dir_name = tools.path().file_name().unwrap().to_str().unwrap();
    let mut compiler = Compiler::new(format!("./{dir_name}/latex"));
    compiler.args = vec![fs::canonicalize(&script).unwrap().to_string_lossy().into_owned()];

    let work = tempdir().unwrap();
    let target = work.path().join("plot.pdf");
    let mut fig = Figure::new(&target);
    fig.add_line_series(&[0.0, 1.0], &[0.0, 1.0], None, None).unwrap();
    fig.save_with(&compiler).unwrap();

    assert!(target.exists());
    assert!(!work.path().join("plot.tex").exists());
}
