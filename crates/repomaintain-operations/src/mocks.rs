//! Scripted collaborators for operation tests.
//!
//! Interaction mocks consume queued answers in prompt order; the other mocks
//! record every call so tests can assert on what an operation actually did.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use repomaintain_core::{Component, Registry, ToolError};
use repomaintain_git::{CommitInfo, GitError, TagInfo};
use repomaintain_pinned::{PinnedDependency, PinnedError, PinnedStore};
use semver::Version;
use serde_json::Value;

use crate::traits::{GitAccess, InteractionProvider, PackageTools, RegistryAccess};
use crate::Result;

const MOCK_SHA: &str = "0123456789abcdef0123456789abcdef01234567";

/// Write `manifest` as `root/<name>/package.json` and describe it as a
/// public component. Name, version and privacy are taken from the JSON.
pub fn manifest_component(root: &Path, name: &str, manifest: &str) -> Component {
    let location = root.join(name);
    std::fs::create_dir_all(&location).expect("create component directory");
    std::fs::write(location.join("package.json"), manifest).expect("write manifest");

    let parsed: Value = serde_json::from_str(manifest).expect("valid manifest json");
    Component {
        name: name.to_string(),
        version: parsed
            .get("version")
            .and_then(Value::as_str)
            .map(|v| Version::parse(v).expect("valid version")),
        private: parsed
            .get("private")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        location,
    }
}

/// Write a minimal root manifest into `dir` and return the synthetic root
/// component for it.
pub fn root_component(dir: &Path) -> Component {
    std::fs::write(
        dir.join("package.json"),
        "{\n  \"name\": \"root\",\n  \"private\": true\n}\n",
    )
    .expect("write root manifest");
    Component::root(dir.to_path_buf())
}

fn tool_failure(command: &str) -> crate::OperationError {
    ToolError::NonZeroExit {
        command: command.to_string(),
        code: 1,
        stderr: String::new(),
    }
    .into()
}

#[derive(Default)]
pub struct MockInteraction {
    confirms: Mutex<VecDeque<Option<bool>>>,
    selects: Mutex<VecDeque<Option<usize>>>,
    multi_selects: Mutex<VecDeque<Option<Vec<usize>>>>,
    inputs: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockInteraction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_confirm(self, answer: Option<bool>) -> Self {
        self.confirms.lock().expect("lock").push_back(answer);
        self
    }

    #[must_use]
    pub fn with_select(self, answer: Option<usize>) -> Self {
        self.selects.lock().expect("lock").push_back(answer);
        self
    }

    #[must_use]
    pub fn with_multi_select(self, answer: Option<Vec<usize>>) -> Self {
        self.multi_selects.lock().expect("lock").push_back(answer);
        self
    }

    #[must_use]
    pub fn with_input(self, answer: Option<&str>) -> Self {
        self.inputs
            .lock()
            .expect("lock")
            .push_back(answer.map(ToString::to_string));
        self
    }

    /// All prompts shown so far, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("lock").clone()
    }

    fn record(&self, prompt: &str) {
        self.prompts.lock().expect("lock").push(prompt.to_string());
    }
}

impl InteractionProvider for MockInteraction {
    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>> {
        self.record(prompt);
        Ok(self
            .confirms
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Some(default)))
    }

    fn select(&self, prompt: &str, _items: &[String]) -> Result<Option<usize>> {
        self.record(prompt);
        Ok(self
            .selects
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted select: {prompt}")))
    }

    fn multi_select(&self, prompt: &str, _items: &[String]) -> Result<Option<Vec<usize>>> {
        self.record(prompt);
        Ok(self
            .multi_selects
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted multi select: {prompt}")))
    }

    fn input(&self, prompt: &str) -> Result<Option<String>> {
        self.record(prompt);
        Ok(self
            .inputs
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted input: {prompt}")))
    }
}

#[derive(Default)]
pub struct MockGit {
    dirty: Vec<String>,
    has_staged: bool,
    remote: Option<String>,
    staged: Mutex<Vec<PathBuf>>,
    commits: Mutex<Vec<String>>,
    tags: Mutex<Vec<String>>,
    pushed: Mutex<Vec<String>>,
}

impl MockGit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dirty_manifests(mut self, paths: Vec<String>) -> Self {
        self.dirty = paths;
        self
    }

    #[must_use]
    pub fn with_staged_changes(mut self, has_staged: bool) -> Self {
        self.has_staged = has_staged;
        self
    }

    #[must_use]
    pub fn with_remote_url(mut self, url: &str) -> Self {
        self.remote = Some(url.to_string());
        self
    }

    #[must_use]
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged.lock().expect("lock").clone()
    }

    #[must_use]
    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().expect("lock").clone()
    }

    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.tags.lock().expect("lock").clone()
    }

    #[must_use]
    pub fn pushed_refs(&self) -> Vec<String> {
        self.pushed.lock().expect("lock").clone()
    }
}

impl GitAccess for MockGit {
    fn require_clean_manifests(&self, _root: &Path) -> Result<()> {
        if self.dirty.is_empty() {
            Ok(())
        } else {
            Err(GitError::DirtyManifests {
                paths: self.dirty.clone(),
            }
            .into())
        }
    }

    fn stage_files(&self, _root: &Path, paths: &[&Path]) -> Result<()> {
        self.staged
            .lock()
            .expect("lock")
            .extend(paths.iter().map(|p| p.to_path_buf()));
        Ok(())
    }

    fn has_staged_changes(&self, _root: &Path) -> Result<bool> {
        Ok(self.has_staged)
    }

    fn commit(&self, _root: &Path, message: &str) -> Result<CommitInfo> {
        self.commits.lock().expect("lock").push(message.to_string());
        Ok(CommitInfo {
            sha: MOCK_SHA.to_string(),
            message: message.to_string(),
        })
    }

    fn create_tag(&self, _root: &Path, name: &str) -> Result<TagInfo> {
        self.tags.lock().expect("lock").push(name.to_string());
        Ok(TagInfo {
            name: name.to_string(),
            target_sha: MOCK_SHA.to_string(),
        })
    }

    fn current_branch(&self, _root: &Path) -> Result<String> {
        Ok("main".to_string())
    }

    fn remote_url(&self, _root: &Path) -> Result<Option<String>> {
        Ok(self.remote.clone())
    }

    fn push(&self, _root: &Path, refspecs: &[String]) -> Result<()> {
        self.pushed
            .lock()
            .expect("lock")
            .extend(refspecs.iter().cloned());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockRegistry {
    existing: BTreeSet<String>,
    peers: BTreeMap<String, BTreeMap<String, String>>,
    peer_queries: Mutex<Vec<String>>,
    published: Mutex<Vec<(String, Registry, bool)>>,
    linked: Mutex<Vec<String>>,
    unlinked: Mutex<Vec<String>>,
}

impl MockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name@version` as already published to every registry.
    #[must_use]
    pub fn with_existing(mut self, name: &str, version: &str) -> Self {
        self.existing.insert(format!("{name}@{version}"));
        self
    }

    #[must_use]
    pub fn with_peer_requirement(
        mut self,
        dependent: &str,
        version: &str,
        peer: &str,
        requirement: &str,
    ) -> Self {
        self.peers
            .entry(format!("{dependent}@{version}"))
            .or_default()
            .insert(peer.to_string(), requirement.to_string());
        self
    }

    /// Publish calls as (component directory name, registry, dry run).
    #[must_use]
    pub fn published(&self) -> Vec<(String, Registry, bool)> {
        self.published.lock().expect("lock").clone()
    }

    #[must_use]
    pub fn peer_queries(&self) -> Vec<String> {
        self.peer_queries.lock().expect("lock").clone()
    }

    #[must_use]
    pub fn linked(&self) -> Vec<String> {
        self.linked.lock().expect("lock").clone()
    }
}

impl RegistryAccess for MockRegistry {
    fn ensure_authenticated(&self, _root: &Path, _registry: Registry) -> Result<()> {
        Ok(())
    }

    fn exists(&self, _root: &Path, name: &str, version: &Version, _registry: Registry) -> bool {
        self.existing.contains(&format!("{name}@{version}"))
    }

    fn publish(&self, component_dir: &Path, registry: Registry, dry_run: bool) -> Result<()> {
        let name = component_dir
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        self.published
            .lock()
            .expect("lock")
            .push((name, registry, dry_run));
        Ok(())
    }

    fn peer_requirements(
        &self,
        _root: &Path,
        name: &str,
        version: &Version,
    ) -> BTreeMap<String, String> {
        let key = format!("{name}@{version}");
        self.peer_queries.lock().expect("lock").push(key.clone());
        self.peers.get(&key).cloned().unwrap_or_default()
    }

    fn link_npmrc(
        &self,
        _root: &Path,
        components: &[Component],
        _must_exist: bool,
        _remove_registries: bool,
    ) -> Result<()> {
        self.linked
            .lock()
            .expect("lock")
            .extend(components.iter().map(|c| c.name.clone()));
        Ok(())
    }

    fn unlink_npmrc(&self, component: &Component) {
        self.unlinked
            .lock()
            .expect("lock")
            .push(component.name.clone());
    }
}

pub struct MockTools {
    components: Vec<Component>,
    fail_update: bool,
    fail_audit: bool,
    fail_ncu: bool,
    calls: Mutex<Vec<String>>,
}

impl MockTools {
    #[must_use]
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            components,
            fail_update: false,
            fail_audit: false,
            fail_ncu: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_update_failure(mut self) -> Self {
        self.fail_update = true;
        self
    }

    #[must_use]
    pub fn with_audit_failure(mut self) -> Self {
        self.fail_audit = true;
        self
    }

    #[must_use]
    pub fn with_ncu_failure(mut self) -> Self {
        self.fail_ncu = true;
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }
}

impl PackageTools for MockTools {
    fn discover(&self, _root: &Path) -> Result<Vec<Component>> {
        self.record("discover".to_string());
        Ok(self.components.clone())
    }

    fn outdated(&self, _cwd: &Path) -> Result<()> {
        self.record("outdated".to_string());
        Ok(())
    }

    fn update(&self, _cwd: &Path) -> Result<()> {
        self.record("update".to_string());
        if self.fail_update {
            return Err(tool_failure("npm update"));
        }
        Ok(())
    }

    fn audit_fix(&self, _cwd: &Path) -> Result<()> {
        self.record("audit-fix".to_string());
        if self.fail_audit {
            return Err(tool_failure("npm audit fix"));
        }
        Ok(())
    }

    fn ncu_upgrade(
        &self,
        _cwd: &Path,
        target: &str,
        filter: &str,
        reject: Option<&str>,
    ) -> Result<()> {
        self.record(format!("ncu {target} {filter} {}", reject.unwrap_or("")));
        if self.fail_ncu {
            return Err(tool_failure("ncu"));
        }
        Ok(())
    }

    fn run_hook(&self, _cwd: &Path, hook: &str, args: &[&str]) -> Result<()> {
        self.record(format!("hook {hook} {}", args.join(" ")));
        Ok(())
    }

    fn reinstall(&self, _root: &Path) -> Result<()> {
        self.record("reinstall".to_string());
        Ok(())
    }
}

pub struct MockPinnedStore {
    pinned: Vec<PinnedDependency>,
    page_change: bool,
    updates: Mutex<Vec<(String, String)>>,
}

impl MockPinnedStore {
    #[must_use]
    pub fn new(pinned: Vec<PinnedDependency>) -> Self {
        Self {
            pinned,
            page_change: false,
            updates: Mutex::new(Vec::new()),
        }
    }

    /// Report the next repositories sync as an actual page modification.
    #[must_use]
    pub fn with_page_change(mut self) -> Self {
        self.page_change = true;
        self
    }

    /// Sync calls as (comma-joined in-use names, repository name).
    #[must_use]
    pub fn repository_updates(&self) -> Vec<(String, String)> {
        self.updates.lock().expect("lock").clone()
    }
}

impl PinnedStore for MockPinnedStore {
    fn fetch(&self) -> std::result::Result<Vec<PinnedDependency>, PinnedError> {
        Ok(self.pinned.clone())
    }

    fn update_repositories(
        &self,
        in_use: &[String],
        repo_name: &str,
    ) -> std::result::Result<bool, PinnedError> {
        self.updates
            .lock()
            .expect("lock")
            .push((in_use.join(","), repo_name.to_string()));
        Ok(self.page_change)
    }
}
