use std::path::Path;

/// Copy a file or symlink, overwriting the destination.
///
/// Symlinks are recreated as symlinks pointing at the same target rather
/// than dereferenced, so restoring a backup yields the original link.
pub(crate) fn copy_entry(src: &Path, dst: &Path) -> std::io::Result<()> {
    let meta = std::fs::symlink_metadata(src)?;

    if meta.file_type().is_symlink() {
        let target = std::fs::read_link(src)?;
        if std::fs::symlink_metadata(dst).is_ok() {
            std::fs::remove_file(dst)?;
        }
        make_symlink(&target, dst)
    } else {
        std::fs::copy(src, dst).map(|_| ())
    }
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
