//! Save pipeline: raw markup, or a standalone document compiled by an external LaTeX
//! compiler.
//!
//! ### Modes
//! - Target ending in `.pdf` or `.png` (exact, case-sensitive): write `<stem>.tex`,
//!   run the compiler next to it, then remove `<stem>.tex`, `<stem>.aux` and `<stem>.log`
//!   (and the intermediate `<stem>.pdf` a PNG conversion goes through).
//! - Anything else: write the markup to the target as-is.
//!
//! Files are written through a temp file in the destination directory and persisted
//! over the final name, so a failed write never leaves a half-written target behind.
//! An existing target keeps its permissions; a new one gets the usual umask-filtered mode.
use crate::error::{PlotError, Result};
use crate::figure::Figure;
use crate::markup::{self, DocumentOptions};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

/// Environment variable naming the compiler program.
pub const ENV_COMPILER: &str = "TEXPLOT_COMPILER";
/// Environment variable holding the compiler timeout in seconds.
pub const ENV_TIMEOUT: &str = "TEXPLOT_COMPILE_TIMEOUT";

const DEFAULT_COMPILER: &str = "pdflatex";
const INTERMEDIATE_EXT: &str = "tex";
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Document formats produced by the external compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompiledFormat {
    Pdf,
    Png,
}

impl CompiledFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            CompiledFormat::Pdf => "pdf",
            CompiledFormat::Png => "png",
        }
    }

    fn document_options(&self) -> DocumentOptions {
        match self {
            CompiledFormat::Pdf => DocumentOptions::default(),
            CompiledFormat::Png => DocumentOptions {
                class_options: vec!["convert={outext=.png}".to_string()],
            },
        }
    }

    /// Files left next to the target by a successful run that are not the result.
    fn intermediate_exts(&self) -> &'static [&'static str] {
        match self {
            CompiledFormat::Pdf => &[INTERMEDIATE_EXT, "aux", "log"],
            CompiledFormat::Png => &[INTERMEDIATE_EXT, "aux", "log", "pdf"],
        }
    }

    /// `standalone` converts to PNG through an external call, which needs shell escape.
    fn compiler_args(&self) -> &'static [&'static str] {
        match self {
            CompiledFormat::Pdf => &[],
            CompiledFormat::Png => &["-shell-escape"],
        }
    }
}

/// Which branch of the pipeline a target selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Raw,
    Compiled(CompiledFormat),
}

impl OutputMode {
    pub fn for_target(target: &Path) -> Self {
        match target.extension().and_then(|e| e.to_str()) {
            Some("pdf") => OutputMode::Compiled(CompiledFormat::Pdf),
            Some("png") => OutputMode::Compiled(CompiledFormat::Png),
            _ => OutputMode::Raw,
        }
    }
}

/// External compiler configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiler {
    pub program: String,
    /// Extra arguments placed before the input file name.
    pub args: Vec<String>,
    /// Kill the compiler if it runs longer than this.
    ///
    /// Only the compiler process itself is killed. Programs it started (e.g. the image
    /// conversion run through `-shell-escape` for PNG output) may outlive it.
    pub timeout: Option<Duration>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMPILER.to_string(),
            args: Vec::new(),
            timeout: None,
        }
    }
}

impl Compiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Defaults overridden by `TEXPLOT_COMPILER` and `TEXPLOT_COMPILE_TIMEOUT` (seconds).
    pub fn from_env() -> Result<Self> {
        let mut compiler = Self::default();
        if let Ok(program) = std::env::var(ENV_COMPILER)
            && !program.trim().is_empty()
        {
            compiler.program = program.trim().to_string();
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT) {
            compiler.timeout = Some(parse_timeout_secs(&raw)?);
        }
        Ok(compiler)
    }
}

/// Parse a positive number of seconds, e.g. `30` or `2.5`.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs: f64 = raw.trim().parse().map_err(|_| {
        PlotError::InvalidArgument(format!("invalid timeout `{raw}`, expected seconds"))
    })?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(PlotError::InvalidArgument(format!(
            "timeout must be a positive number of seconds, got `{raw}`"
        )));
    }
    Ok(Duration::from_secs_f64(secs))
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub mode: OutputMode,
    /// The file the caller asked for.
    pub output: PathBuf,
    /// Intermediate artifacts deleted after compiling.
    pub removed: Vec<PathBuf>,
}

/// Write `figure` to its target. Consumes the figure.
pub fn save(figure: Figure, compiler: &Compiler) -> Result<Saved> {
    let target = figure.target().to_path_buf();
    if target.as_os_str().is_empty() {
        return Err(PlotError::InvalidArgument("figure has no target path".into()));
    }
    let mode = OutputMode::for_target(&target);
    log::debug!(
        "saving {} series to {} ({:?})",
        figure.series().len(),
        target.display(),
        mode
    );
    match mode {
        OutputMode::Raw => {
            write_atomic(&target, |w| markup::render_figure(&figure, w))?;
            drop(figure);
            log::info!("wrote markup to {}", target.display());
            Ok(Saved {
                mode,
                output: target,
                removed: Vec::new(),
            })
        }
        OutputMode::Compiled(format) => save_compiled(figure, &target, format, compiler),
    }
}

fn save_compiled(
    figure: Figure,
    target: &Path,
    format: CompiledFormat,
    compiler: &Compiler,
) -> Result<Saved> {
    let dir = parent_dir(target);
    let tex_path = target.with_extension(INTERMEDIATE_EXT);
    let tex_name = tex_path
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| PlotError::InvalidArgument(format!("no file name in {}", target.display())))?;

    let opts = format.document_options();
    write_atomic(&tex_path, |w| markup::write_document(&figure, &opts, w))?;
    drop(figure);
    log::debug!("wrote intermediate {}", tex_path.display());

    let cwd = std::env::current_dir().map_err(|source| PlotError::CompilerSpawn {
        program: compiler.program.clone(),
        source,
    })?;
    let program = resolve_program(&compiler.program, &cwd);
    let mut cmd = Command::new(&program);
    cmd.args(&compiler.args)
        .args(format.compiler_args())
        .arg(&tex_name)
        .current_dir(&dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    let child = cmd.spawn().map_err(|source| PlotError::CompilerSpawn {
        program: compiler.program.clone(),
        source,
    })?;
    let status = wait_for(child, compiler)?;
    if !status.success() {
        let log = target.with_extension("log");
        log::warn!(
            "{} failed on {}; intermediates kept for inspection",
            compiler.program,
            tex_path.display()
        );
        return Err(PlotError::CompilerFailed {
            program: compiler.program.clone(),
            status,
            log,
        });
    }

    let exts = format.intermediate_exts();
    let mut removed = Vec::with_capacity(exts.len());
    for ext in exts {
        let path = target.with_extension(ext);
        fs::remove_file(&path).map_err(|source| PlotError::CleanupFailed {
            path: path.clone(),
            source,
        })?;
        removed.push(path);
    }

    if target.exists() {
        log::info!("compiled {}", target.display());
    } else {
        log::warn!(
            "{} succeeded but {} was not produced",
            compiler.program,
            target.display()
        );
    }
    Ok(Saved {
        mode: OutputMode::Compiled(format),
        output: target.to_path_buf(),
        removed,
    })
}

fn wait_for(mut child: Child, compiler: &Compiler) -> Result<ExitStatus> {
    let run_err = |source: std::io::Error| PlotError::CompilerWait {
        program: compiler.program.clone(),
        source,
    };
    let Some(limit) = compiler.timeout else {
        return child.wait().map_err(run_err);
    };
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(run_err)? {
            return Ok(status);
        }
        if started.elapsed() >= limit {
            // already exited between the checks is fine; reap either way
            let _ = child.kill();
            let _ = child.wait();
            return Err(PlotError::CompilerTimedOut {
                program: compiler.program.clone(),
                timeout: limit,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Anchor a relative program path like `./mylatex` at the caller's working directory,
/// since the compiler runs inside the target's directory. Bare names go through `PATH`.
fn resolve_program(program: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        cwd.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Directory holding `path`; `.` for bare file names.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Render into a temp file beside `path`, then move it into place.
fn write_atomic<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut fs::File>) -> std::io::Result<()>,
{
    let dir = parent_dir(path);
    let mut tmp = new_temp_file(&dir).map_err(|e| PlotError::io(path, e))?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| PlotError::io(path, e))?;
    }
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        render(&mut w).map_err(|e| PlotError::io(path, e))?;
        w.flush().map_err(|e| PlotError::io(path, e))?;
    }
    tmp.persist(path).map_err(|e| PlotError::io(path, e.error))?;
    Ok(())
}

/// Temp files default to 0600; ask for 0666 so the umask decides, as for a plain create.
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_suffix() {
        let m = |s: &str| OutputMode::for_target(Path::new(s));
        assert_eq!(m("a/fig.pdf"), OutputMode::Compiled(CompiledFormat::Pdf));
        assert_eq!(m("fig.png"), OutputMode::Compiled(CompiledFormat::Png));
        assert_eq!(m("fig.PDF"), OutputMode::Raw);
        assert_eq!(m("fig.tikz"), OutputMode::Raw);
        assert_eq!(m("fig.ps"), OutputMode::Raw);
        assert_eq!(m("fig"), OutputMode::Raw);
        assert_eq!(m("fig.pdf.txt"), OutputMode::Raw);
    }

    #[test]
    fn parent_of_bare_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("fig.pdf")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("a/b/fig.pdf")), PathBuf::from("a/b"));
    }

    #[test]
    fn relative_program_paths_are_anchored() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_program("./mylatex", cwd), PathBuf::from("/work/./mylatex"));
        assert_eq!(resolve_program("bin/latex", cwd), PathBuf::from("/work/bin/latex"));
        assert_eq!(resolve_program("pdflatex", cwd), PathBuf::from("pdflatex"));
        assert_eq!(resolve_program("/usr/bin/pdflatex", cwd), PathBuf::from("/usr/bin/pdflatex"));
    }

    #[test]
    fn png_also_drops_the_intermediate_pdf() {
        assert_eq!(CompiledFormat::Pdf.intermediate_exts(), &["tex", "aux", "log"]);
        assert_eq!(CompiledFormat::Png.intermediate_exts(), &["tex", "aux", "log", "pdf"]);
    }

    #[test]
    fn timeout_parsing() {
        assert_eq!(parse_timeout_secs("2.5").unwrap(), Duration::from_millis(2500));
        assert!(parse_timeout_secs("0").is_err());
        assert!(parse_timeout_secs("soon").is_err());
    }

    #[test]
    fn missing_target_is_invalid() {
        let fig = Figure::default();
        let err = save(fig, &Compiler::default()).unwrap_err();
        assert!(matches!(err, PlotError::InvalidArgument(_)));
    }
}
