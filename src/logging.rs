use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::subscriber::{DefaultGuard, set_default};
use tracing_subscriber::EnvFilter;

use crate::pipeline::PipelineContext;

const DEBUG_LOG: &str = "debug.log";

/// Create the log file, along with any directories the output prefix names.
fn create_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the diagnostic sink for the current run.
///
/// The subscriber is scoped to the returned guard rather than installed
/// process-wide. Verbose runs log at debug level into `<prefix>debug.log`,
/// falling back to stdout if the file cannot be created; quiet runs only
/// report warnings on stderr.
pub fn init(ctx: &PipelineContext) -> DefaultGuard {
    if !ctx.verbose {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter("warn"))
            .with_writer(std::io::stderr)
            .finish();
        return set_default(subscriber);
    }

    let path = ctx.output_path(DEBUG_LOG);
    match create_log_file(&path) {
        Ok(file) => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(filter("debug"))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            set_default(subscriber)
        }
        Err(err) => {
            eprintln!(
                "Warning: could not open {} for writing ({}). Debug output will go to the console.",
                path.display(),
                err
            );
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(filter("debug"))
                .with_writer(std::io::stdout)
                .finish();
            set_default(subscriber)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_directories_are_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = PipelineContext::new().with_output_prefix(format!("{}/a/b/run_", dir.path().display()));
        let path = ctx.output_path(DEBUG_LOG);

        create_log_file(&path).unwrap();
        assert!(dir.path().join("a/b/run_debug.log").exists());
    }
}
