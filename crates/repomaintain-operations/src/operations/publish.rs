use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use repomaintain_core::{BumpType, Component, Registry};
use repomaintain_git::CommitInfo;
use repomaintain_manifest::{reconcile_to_target, ForcedUpdate, Manifest};
use repomaintain_range::{bump_version, coerce};
use repomaintain_txn::FileTransaction;
use repomaintain_workspace::{PublishMode, RepositoryConfig};
use semver::Version;
use tracing::warn;

use crate::error::OperationError;
use crate::traits::{GitAccess, InteractionProvider, PackageTools, RegistryAccess};
use crate::Result;

#[derive(Debug, Default, Clone)]
pub struct PublishInput {
    pub dry_run: bool,
    pub no_git: bool,
    pub always_ask: bool,
    pub skip_existing: bool,
    pub keep_version: bool,
}

/// One component selected for publishing, together with its target version.
#[derive(Debug, Clone)]
pub struct PlannedRelease {
    pub component: Component,
    pub new_version: Version,
}

#[derive(Debug)]
pub struct PublishOutput {
    pub published: Vec<(String, Version)>,
    pub commit: Option<CommitInfo>,
    pub tags: Vec<String>,
    pub pushed: bool,
}

struct PublishContext<'a> {
    root: &'a Path,
    components: &'a [Component],
    plan: &'a [PlannedRelease],
    registries: &'a [Registry],
    input: &'a PublishInput,
    no_git: bool,
}

/// Drives one publish invocation: component and version selection, registry
/// confirmation, preflight, versioning, per-component publishing, commit and
/// tag creation, push, and cleanup.
///
/// All manifests are staged in a file transaction before the first mutation;
/// a dry run rolls the transaction back at the end, any failure rolls it
/// back on the way out, and a real run discards the backups.
pub struct ReleaseCoordinator<I, G, R, T> {
    interaction: I,
    git: G,
    registry: R,
    tools: T,
}

impl<I, G, R, T> ReleaseCoordinator<I, G, R, T>
where
    I: InteractionProvider,
    G: GitAccess,
    R: RegistryAccess,
    T: PackageTools,
{
    pub fn new(interaction: I, git: G, registry: R, tools: T) -> Self {
        Self {
            interaction,
            git,
            registry,
            tools,
        }
    }

    /// # Errors
    ///
    /// Returns an error for failed preconditions (no public components,
    /// mismatched shared versions, no registry, dirty manifests), failed
    /// subprocesses, and user cancellation.
    pub fn execute(&self, root: &Path, input: &PublishInput) -> Result<PublishOutput> {
        let no_git = input.no_git || input.dry_run;
        let components = self.tools.discover(root)?;
        let config = RepositoryConfig::load(root)?;

        let plan = self.select_releases(root, &components, &config, input)?;
        let registries = self.select_registries(root)?;

        if !no_git {
            self.git.require_clean_manifests(root)?;
        }
        let mut txn = FileTransaction::new();
        for component in &components {
            txn.stage(&component.manifest_path(), true)?;
        }

        let ctx = PublishContext {
            root,
            components: &components,
            plan: &plan,
            registries: &registries,
            input,
            no_git,
        };
        let result = self.run_publish(&ctx, &config);

        for component in &components {
            self.registry.unlink_npmrc(component);
        }

        match result {
            Ok(output) => {
                if input.dry_run {
                    txn.rollback()?;
                } else {
                    txn.commit()?;
                }
                Ok(output)
            }
            Err(err) => {
                if let Err(rollback) = txn.rollback() {
                    warn!(error = %rollback, "rollback after failed publish was incomplete");
                }
                Err(err)
            }
        }
    }

    fn run_publish(
        &self,
        ctx: &PublishContext<'_>,
        config: &RepositoryConfig,
    ) -> Result<PublishOutput> {
        let hook_args = global_hook_args(ctx.input.dry_run, ctx.plan);
        let hook_refs: Vec<&str> = hook_args.iter().map(String::as_str).collect();
        self.tools.run_hook(ctx.root, "pre-publish-global", &hook_refs)?;

        self.apply_versions(ctx)?;

        let mut published = Vec::new();
        for planned in ctx.plan {
            self.publish_component(ctx, planned)?;
            published.push((planned.component.name.clone(), planned.new_version.clone()));
        }

        let (commit, tags) = if ctx.no_git {
            (None, Vec::new())
        } else {
            let (commit, tags) = self.commit_and_tag(ctx, config)?;
            (Some(commit), tags)
        };

        self.tools.run_hook(ctx.root, "post-publish-global", &hook_refs)?;

        let pushed = if commit.is_some() {
            self.confirm_and_push(ctx.root, &tags)?
        } else {
            false
        };

        Ok(PublishOutput {
            published,
            commit,
            tags,
            pushed,
        })
    }

    /// Bump the selected components' own versions and rewrite every internal
    /// dependency range to the new targets. Rewrites that fall outside the
    /// previously declared range need explicit confirmation.
    fn apply_versions(&self, ctx: &PublishContext<'_>) -> Result<()> {
        let targets: BTreeMap<String, Version> = ctx
            .plan
            .iter()
            .map(|p| (p.component.name.clone(), p.new_version.clone()))
            .collect();

        let mut forced: Vec<(String, ForcedUpdate)> = Vec::new();
        for component in ctx.components {
            let mut manifest = Manifest::load(&component.manifest_path())?;
            if let Some(target) = targets.get(&component.name) {
                manifest.set_version(target);
            }
            for update in reconcile_to_target(&mut manifest, &targets) {
                forced.push((component.name.clone(), update));
            }
            manifest.save()?;
        }

        if forced.is_empty() {
            return Ok(());
        }

        for (component, update) in &forced {
            warn!(
                component = %component,
                dependency = %update.name,
                change = %format!("{} -> {}", update.old_range, update.new_range),
                "internal dependency updated regardless of its declared range"
            );
        }
        let proceed = self
            .interaction
            .confirm(
                "Internal dependencies have been updated regardless of existing version ranges. Proceed?",
                true,
            )?
            .unwrap_or(false);
        if proceed {
            Ok(())
        } else {
            Err(OperationError::Cancelled)
        }
    }

    fn publish_component(&self, ctx: &PublishContext<'_>, planned: &PlannedRelease) -> Result<()> {
        let component = &planned.component;
        let dry_run = if ctx.input.dry_run { "true" } else { "false" };
        let version = planned.new_version.to_string();
        let hook_args = [dry_run, component.name.as_str(), version.as_str()];

        self.tools
            .run_hook(&component.location, "pre-publish", &hook_args)?;

        for registry in ctx.registries {
            if self
                .registry
                .exists(ctx.root, &component.name, &planned.new_version, *registry)
            {
                if ctx.input.skip_existing {
                    warn!(
                        component = %component.name,
                        version = %planned.new_version,
                        registry = registry.label(),
                        "version already published, skipping"
                    );
                    continue;
                }
                return Err(OperationError::AlreadyPublished {
                    name: component.name.clone(),
                    version: planned.new_version.clone(),
                    registry: *registry,
                });
            }

            match registry {
                // GitHub authorization comes from the root .npmrc.
                Registry::Github => self.registry.link_npmrc(
                    ctx.root,
                    std::slice::from_ref(component),
                    true,
                    false,
                )?,
                // npm authorization comes from the CLI login session; a
                // linked .npmrc would redirect scoped packages elsewhere.
                Registry::Npm => self.registry.unlink_npmrc(component),
            }
            self.registry
                .publish(&component.location, *registry, ctx.input.dry_run)?;
        }

        self.tools
            .run_hook(&component.location, "post-publish", &hook_args)
    }

    fn select_releases(
        &self,
        root: &Path,
        components: &[Component],
        config: &RepositoryConfig,
        input: &PublishInput,
    ) -> Result<Vec<PlannedRelease>> {
        let public: Vec<&Component> = components.iter().filter(|c| !c.private).collect();
        if public.is_empty() {
            return Err(OperationError::NoPublicComponents);
        }

        let mode = self.select_mode(config, input.always_ask)?;
        if config.publish_mode != Some(mode) {
            RepositoryConfig::store(root, Some(mode), None)?;
        }

        match mode {
            PublishMode::All => {
                let current = shared_version(&public)?;
                let new_version = if input.keep_version {
                    current
                } else {
                    self.ask_new_version(&current, None)?
                };
                Ok(public
                    .into_iter()
                    .map(|component| PlannedRelease {
                        component: component.clone(),
                        new_version: new_version.clone(),
                    })
                    .collect())
            }
            PublishMode::Independent => {
                let names: Vec<String> = public.iter().map(|c| c.name.clone()).collect();
                let indices = self
                    .interaction
                    .multi_select(
                        "Select all public components that should be published",
                        &names,
                    )?
                    .ok_or(OperationError::Cancelled)?;
                if indices.is_empty() {
                    return Err(OperationError::EmptySelection);
                }

                let mut plan = Vec::new();
                for index in indices {
                    let component = public[index];
                    let current =
                        component
                            .version
                            .clone()
                            .ok_or_else(|| OperationError::MissingVersion {
                                name: component.name.clone(),
                            })?;
                    let new_version = if input.keep_version {
                        current
                    } else {
                        self.ask_new_version(&current, Some(&component.name))?
                    };
                    plan.push(PlannedRelease {
                        component: component.clone(),
                        new_version,
                    });
                }
                Ok(plan)
            }
        }
    }

    fn select_mode(&self, config: &RepositoryConfig, always_ask: bool) -> Result<PublishMode> {
        if !always_ask {
            if let Some(mode) = config.publish_mode {
                return Ok(mode);
            }
        }

        let items = vec![
            "All public components.".to_string(),
            "Select individual components.".to_string(),
        ];
        let index = self
            .interaction
            .select("What should get published", &items)?
            .ok_or(OperationError::Cancelled)?;
        Ok(if index == 0 {
            PublishMode::All
        } else {
            PublishMode::Independent
        })
    }

    fn ask_new_version(&self, current: &Version, component: Option<&str>) -> Result<Version> {
        let mut prompt = format!("Select a new version (currently {current})");
        if let Some(name) = component {
            prompt.push_str(&format!(" for component {name}"));
        }

        let bumps = [BumpType::Patch, BumpType::Minor, BumpType::Major];
        let mut items: Vec<String> = bumps
            .iter()
            .map(|bump| bump_version(current, *bump).to_string())
            .collect();
        items.push("A custom version.".to_string());

        let index = self
            .interaction
            .select(&prompt, &items)?
            .ok_or(OperationError::Cancelled)?;
        match bumps.get(index) {
            Some(bump) => Ok(bump_version(current, *bump)),
            None => self.ask_custom_version(),
        }
    }

    fn ask_custom_version(&self) -> Result<Version> {
        let raw = self
            .interaction
            .input("Custom version")?
            .ok_or(OperationError::Cancelled)?;
        let trimmed = raw.trim();

        let Some(version) = coerce(trimmed) else {
            return Err(OperationError::InvalidCustomVersion {
                input: trimmed.to_string(),
            });
        };

        if version.to_string() != trimmed {
            let proceed = self
                .interaction
                .confirm(
                    &format!("The custom version you entered got coerced to '{version}'. Proceed?"),
                    true,
                )?
                .unwrap_or(false);
            if !proceed {
                return Err(OperationError::Cancelled);
            }
        }
        Ok(version)
    }

    fn select_registries(&self, root: &Path) -> Result<Vec<Registry>> {
        let mut registries = Vec::new();
        if self
            .interaction
            .confirm("Publish to the GitHub registry?", true)?
            .ok_or(OperationError::Cancelled)?
        {
            registries.push(Registry::Github);
        }
        if self
            .interaction
            .confirm("Publish to the NPM registry?", true)?
            .ok_or(OperationError::Cancelled)?
        {
            registries.push(Registry::Npm);
        }

        if registries.is_empty() {
            return Err(OperationError::NoRegistrySelected);
        }
        if registries.contains(&Registry::Npm) {
            self.registry.ensure_authenticated(root, Registry::Npm)?;
        }
        Ok(registries)
    }

    fn commit_and_tag(
        &self,
        ctx: &PublishContext<'_>,
        config: &RepositoryConfig,
    ) -> Result<(CommitInfo, Vec<String>)> {
        let paths: Vec<PathBuf> = ctx.components.iter().map(Component::manifest_path).collect();
        let refs: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
        self.git.stage_files(ctx.root, &refs)?;
        let commit = self.git.commit(ctx.root, "Publish")?;

        let unique: BTreeSet<&Version> = ctx.plan.iter().map(|p| &p.new_version).collect();
        let mut tags = Vec::new();
        if let (Some(version), 1) = (unique.iter().next(), unique.len()) {
            let tag_name = self.resolve_tag_name(ctx.root, config)?;
            let tag = self.git.create_tag(ctx.root, &format!("{tag_name}@{version}"))?;
            tags.push(tag.name);
        } else {
            for planned in ctx.plan {
                let tag = self.git.create_tag(
                    ctx.root,
                    &format!("{}@{}", planned.component.name, planned.new_version),
                )?;
                tags.push(tag.name);
            }
        }
        Ok((commit, tags))
    }

    fn resolve_tag_name(&self, root: &Path, config: &RepositoryConfig) -> Result<String> {
        if let Some(name) = &config.publish_tag_name {
            return Ok(name.clone());
        }

        loop {
            let raw = self
                .interaction
                .input("Git tag name (non-empty string)")?
                .ok_or(OperationError::Cancelled)?;
            let name = raw.trim().replace(' ', "_");
            if !name.is_empty() {
                RepositoryConfig::store(root, None, Some(&name))?;
                return Ok(name);
            }
        }
    }

    fn confirm_and_push(&self, root: &Path, tags: &[String]) -> Result<bool> {
        let branch = self.git.current_branch(root)?;
        let mut refspecs = vec![format!("refs/heads/{branch}")];
        refspecs.extend(tags.iter().map(|tag| format!("refs/tags/{tag}")));

        let proceed = self
            .interaction
            .confirm("Push to Git 'origin'?", true)?
            .unwrap_or(false);
        if !proceed {
            return Ok(false);
        }
        self.git.push(root, &refspecs)?;
        Ok(true)
    }
}

fn shared_version(public: &[&Component]) -> Result<Version> {
    let first = public.first().and_then(|c| c.version.clone());
    let uniform = public.iter().all(|c| c.version == first);

    if let (Some(version), true) = (first, uniform) {
        return Ok(version);
    }
    Err(OperationError::SharedVersionMismatch {
        components: public
            .iter()
            .map(|c| {
                let version = c
                    .version
                    .as_ref()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string);
                format!("  * {}, {version}", c.name)
            })
            .collect(),
    })
}

fn global_hook_args(dry_run: bool, plan: &[PlannedRelease]) -> Vec<String> {
    let releases: Vec<serde_json::Value> = plan
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.component.name,
                "new_version": p.new_version.to_string(),
            })
        })
        .collect();

    vec![
        if dry_run { "true" } else { "false" }.to_string(),
        serde_json::Value::Array(releases).to_string(),
    ]
}
