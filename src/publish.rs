use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// One rendered document, addressed relative to the output directory.
#[derive(Debug)]
pub struct Artifact {
    pub rel_path: String,
    pub content: String,
}

impl Artifact {
    pub fn new(rel_path: impl Into<String>, content: String) -> Self {
        Artifact {
            rel_path: rel_path.into(),
            content,
        }
    }
}

/// All-or-nothing publish. Every artifact is written to a staging directory,
/// files the generator does not own are carried over, and the staged tree
/// replaces the live one with a single directory rename. A failure anywhere
/// before that rename leaves the previously published site untouched, and
/// the swap itself removes detail pages for jobs that closed.
pub fn publish(artifacts: &[Artifact], out_dir: &Path) -> Result<()> {
    let staging = out_dir.with_extension("staging");
    if staging.exists() {
        fs::remove_dir_all(&staging).context("failed to clear stale staging dir")?;
    }
    fs::create_dir_all(&staging)
        .with_context(|| format!("failed to create {}", staging.display()))?;

    for artifact in artifacts {
        let dest = staging.join(&artifact.rel_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&dest, &artifact.content)
            .with_context(|| format!("failed to stage {}", artifact.rel_path))?;
    }

    if out_dir.exists() {
        carry_unmanaged(out_dir, &staging)?;
    }

    // Stage complete; swap the whole tree into place.
    let previous = out_dir.with_extension("previous");
    if previous.exists() {
        fs::remove_dir_all(&previous).context("failed to clear stale backup dir")?;
    }
    if out_dir.exists() {
        fs::rename(out_dir, &previous)
            .with_context(|| format!("failed to move {} aside", out_dir.display()))?;
    }
    fs::rename(&staging, out_dir)
        .with_context(|| format!("failed to move staged site to {}", out_dir.display()))?;
    fs::remove_dir_all(&previous).ok();

    info!(count = artifacts.len(), dir = %out_dir.display(), "artifacts published");
    Ok(())
}

/// Copy previously published files the generator does not own (stylesheets,
/// images) into the staged tree so the swap keeps them. Top-level .html
/// pages and feeds/ are managed content: stale entries there are dropped by
/// not being carried.
fn carry_unmanaged(out_dir: &Path, staging: &Path) -> Result<()> {
    for entry in fs::read_dir(out_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let dest = staging.join(&name);
        if dest.exists() {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            if name == "feeds" {
                continue;
            }
            copy_tree(&path, &dest)?;
        } else {
            if path.extension().and_then(|e| e.to_str()) == Some("html") {
                continue;
            }
            fs::copy(&path, &dest)
                .with_context(|| format!("failed to carry over {}", path.display()))?;
        }
    }
    Ok(())
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let to = dest.join(entry.file_name());
        if entry.path().is_dir() {
            copy_tree(&entry.path(), &to)?;
        } else {
            fs::copy(entry.path(), &to)?;
        }
    }
    Ok(())
}
