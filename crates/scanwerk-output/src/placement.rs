// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archive placement — collision-safe naming and tag aliasing.
//
// One placed artifact lands at
// `<root>[/<tag1>/<year>]/<name-or-scan_HHMMSS>[.<n>].<ext>`.  The first tag
// owns the real file; every later tag gets a symbolic link with its own
// independently collision-resolved path.  Alias failures are logged and
// skipped, never fatal to the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Local};
use tracing::{debug, info, instrument, warn};

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::PlacementResult;
use scanwerk_core::ScanOptions;

/// Places finished artifacts into the archive tree.
pub struct Placer {
    root: PathBuf,
    tags: Vec<String>,
    name: Option<String>,
}

impl Placer {
    pub fn from_options(options: &ScanOptions) -> Self {
        Self {
            root: options.output_root.clone(),
            tags: options.tags.clone(),
            name: options.name.clone(),
        }
    }

    /// Place one source artifact: copy it to the primary destination and
    /// create one alias link per secondary tag.
    ///
    /// The clock is read once per artifact, so the primary and every alias
    /// share the same default name and year directory even across a second
    /// or year boundary.
    #[instrument(skip_all, fields(source = %source.display(), extension))]
    pub fn place(&self, source: &Path, extension: &str) -> Result<PlacementResult> {
        let stamp = Local::now();
        let primary_dir = self.directory_for(self.tags.first(), &stamp);
        fs::create_dir_all(&primary_dir).map_err(|err| {
            ScanwerkError::Placement(format!("create {}: {err}", primary_dir.display()))
        })?;

        let primary = next_free_path(&primary_dir, &self.file_name_root(&stamp), extension);
        fs::copy(source, &primary).map_err(|err| {
            ScanwerkError::Placement(format!("copy to {}: {err}", primary.display()))
        })?;
        info!(path = %primary.display(), "artifact placed");

        let mut aliases = Vec::new();
        for tag in self.tags.iter().skip(1) {
            match self.place_alias(tag, &primary, extension, &stamp) {
                Ok(alias) => {
                    debug!(tag = %tag, path = %alias.display(), "alias created");
                    aliases.push(alias);
                }
                Err(err) => {
                    warn!(tag = %tag, %err, "could not create alias; continuing");
                }
            }
        }

        Ok(PlacementResult { primary, aliases })
    }

    /// Create the alias link for one secondary tag, with its own directory
    /// and collision resolution.
    fn place_alias(
        &self,
        tag: &str,
        primary: &Path,
        extension: &str,
        stamp: &DateTime<Local>,
    ) -> Result<PathBuf> {
        let alias_dir = self.directory_for(Some(&tag.to_string()), stamp);
        fs::create_dir_all(&alias_dir).map_err(|err| {
            ScanwerkError::Placement(format!("create {}: {err}", alias_dir.display()))
        })?;

        let alias = next_free_path(&alias_dir, &self.file_name_root(stamp), extension);
        make_symlink(primary, &alias).map_err(|err| {
            ScanwerkError::Placement(format!("link {}: {err}", alias.display()))
        })?;
        Ok(alias)
    }

    /// `<root>` for untagged runs, `<root>/<tag>/<year>` otherwise.
    fn directory_for(&self, tag: Option<&String>, stamp: &DateTime<Local>) -> PathBuf {
        match tag {
            Some(tag) => self.root.join(tag).join(stamp.format("%Y").to_string()),
            None => self.root.clone(),
        }
    }

    /// Explicit configured name, or the `scan_HHMMSS` timestamp default.
    fn file_name_root(&self, stamp: &DateTime<Local>) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => stamp.format("scan_%H%M%S").to_string(),
        }
    }
}

/// First free path of the form `<base>.<ext>`, then `<base>.<n>.<ext>` with
/// n counting up from 0.
fn next_free_path(dir: &Path, base: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{base}.{extension}"));
    if !candidate.exists() {
        return candidate;
    }
    let mut n: u32 = 0;
    loop {
        let candidate = dir.join(format!("{base}.{n}.{extension}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(unix)]
fn make_symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn make_symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

/// Ask the OS to open a file in its default handler.  Best-effort: spawn
/// failures are logged and ignored.
pub fn open_path(path: &Path) {
    #[cfg(target_os = "macos")]
    let program = "open";
    #[cfg(target_os = "windows")]
    let program = "cmd";
    #[cfg(all(unix, not(target_os = "macos")))]
    let program = "xdg-open";

    let mut command = Command::new(program);
    #[cfg(target_os = "windows")]
    command.args(["/C", "start", ""]);
    command.arg(path);

    debug!(path = %path.display(), "opening in default handler");
    if let Err(err) = command.spawn() {
        warn!(%err, "could not open file");
    }
}
