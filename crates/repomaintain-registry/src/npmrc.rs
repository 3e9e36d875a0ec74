use std::path::Path;

use regex::Regex;
use repomaintain_core::Component;
use tracing::warn;

use crate::error::RegistryError;

const NPMRC_FILE: &str = ".npmrc";

/// Copy the root `.npmrc` into every non-root component directory.
///
/// With `remove_registries` the scope-to-registry assignment lines are
/// commented out first, so publishing to npmjs.org is not redirected to a
/// scoped registry.
///
/// # Errors
///
/// A missing root `.npmrc` is an error only with `must_exist`; otherwise it
/// logs a warning and does nothing.
pub fn link_npmrc(
    root: &Path,
    components: &[Component],
    must_exist: bool,
    remove_registries: bool,
) -> Result<(), RegistryError> {
    let npmrc = root.join(NPMRC_FILE);

    if !npmrc.exists() {
        if must_exist {
            return Err(RegistryError::NpmrcMissing { path: npmrc });
        }
        warn!(path = %npmrc.display(), "could not read .npmrc, file does not exist");
        return Ok(());
    }

    let mut content =
        std::fs::read_to_string(&npmrc).map_err(|source| RegistryError::NpmrcRead {
            path: npmrc.clone(),
            source,
        })?;

    if remove_registries {
        #[allow(clippy::unwrap_used)] // pattern is a literal
        let assignment = Regex::new(r"(?m)^\s*(@.+:registry=)").unwrap();
        content = assignment.replace_all(&content, ";$1").into_owned();
    }

    for component in components.iter().filter(|c| !c.is_root()) {
        let target = component.location.join(NPMRC_FILE);
        std::fs::write(&target, &content).map_err(|source| RegistryError::NpmrcWrite {
            path: target.clone(),
            source,
        })?;
    }

    Ok(())
}

/// Remove a previously linked `.npmrc` from a component directory. The root's
/// own file is never touched.
pub fn unlink_npmrc(component: &Component) {
    if component.is_root() {
        return;
    }

    let npmrc = component.location.join(NPMRC_FILE);
    if let Err(err) = std::fs::remove_file(&npmrc) {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %npmrc.display(), error = %err, "failed to remove linked .npmrc");
        }
    }
}
