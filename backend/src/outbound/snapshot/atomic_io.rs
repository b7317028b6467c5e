//! Atomic snapshot writes.
//!
//! Contents go to a hidden temporary file in the target directory which is
//! then renamed over the target, so readers see either the old snapshot or
//! the new one and never a partial write.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` in `dir` with `contents`.
///
/// `file_name` must be a bare file name; the caller validates it.
pub(crate) fn write_atomic(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    let tmp_name = temp_name(file_name);
    write_temp_file(dir, &tmp_name, contents)?;
    if let Err(err) = replace(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    sync_directory(dir);
    Ok(())
}

fn temp_name(file_name: &str) -> String {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!(".{file_name}.tmp.{}.{nanos}.{counter}", std::process::id())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    let written = file.write_all(contents).and_then(|()| file.sync_all());
    if written.is_err() {
        drop(file);
        drop(dir.remove_file(tmp_name));
    }
    written
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows refuses to rename over an existing file.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort: some platforms cannot fsync a directory handle.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}
