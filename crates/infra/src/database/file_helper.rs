//! Line-oriented text file helpers used by the flat-file backend.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Create `path` (and its parent directories) when it does not exist yet.
pub async fn ensure_exists(path: &Path) -> io::Result<()> {
    if fs::try_exists(path).await? {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    Ok(())
}

/// All lines of the file, without line terminators.
pub async fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path).await?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Write `lines`, each followed by `\n`.
///
/// With `append` the lines are added at the end of the file. Otherwise the file
/// is replaced through a temporary sibling and a rename, so readers never see a
/// half-written file.
pub async fn write_lines(path: &Path, lines: &[String], append: bool) -> io::Result<()> {
    let mut buffer = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        buffer.push_str(line);
        buffer.push('\n');
    }

    if append {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;
        return Ok(());
    }

    let tmp = temp_path(path);
    fs::write(&tmp, buffer.as_bytes()).await?;
    fs::rename(&tmp, path).await
}

/// The last non-blank line with its 1-based line number, if any.
pub async fn last_line(path: &Path) -> io::Result<Option<(usize, String)>> {
    let lines = read_lines(path).await?;
    Ok(lines
        .into_iter()
        .enumerate()
        .rev()
        .find(|(_, l)| !l.trim().is_empty())
        .map(|(index, line)| (index + 1, line)))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
