//! The generation orchestrator.
//!
//! Combines collector output with the templates to run, applies
//! facet/guard/filter checks, renders, and reconciles the target directory
//! against what was actually produced. The target directory is treated as a
//! fully derived artifact set: after a successful run it equals the image of
//! `(model, templates)` regardless of what was on disk beforehand. Stale
//! renames, manually added files, and outputs of removed model elements are
//! all corrected by the final deletion pass.
//!
//! Execution is single-threaded and synchronous. A rendering failure aborts
//! the run before the deletion pass, leaving already-rendered files in place
//! and stale files untouched; rerunning the whole generation is the unit of
//! recovery.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::collector::{GenerationTargets, collect_targets};
use crate::application::error::GenerationError;
use crate::application::ports::Filesystem;
use crate::domain::{Element, ElementRef, Registry, RenderError, Template};
use crate::error::{ArtifexError, ArtifexResult};

/// Optional per-element filter: `(target qualified key, element) -> keep?`.
pub type ElementFilter = dyn Fn(&str, &dyn Element) -> bool + Send + Sync;

/// Counters describing what one generation run did to the target directory.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    /// Files written because they were new or their content changed.
    pub files_written: usize,
    /// Files left untouched because the rendered content was byte-identical.
    pub files_unchanged: usize,
    /// Stale files removed by the reconciliation pass.
    pub files_deleted: usize,
    /// Directories removed because they ended up empty.
    pub directories_deleted: usize,
}

/// Drives generation runs against a populated [`Registry`].
pub struct Generator<'a> {
    registry: &'a Registry,
    filesystem: &'a dyn Filesystem,
}

impl<'a> Generator<'a> {
    pub fn new(registry: &'a Registry, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            registry,
            filesystem,
        }
    }

    /// Generate files from `templates` into `target_dir`, then delete
    /// everything under `target_dir` that this run did not produce.
    ///
    /// Traversal starts from `root` as an element of kind `root_key` and
    /// covers all transitively contained elements. Templates run in the
    /// caller-supplied order; within one template, elements render in
    /// discovery order.
    #[instrument(skip_all, fields(root = root_key, target_dir = %target_dir.display()))]
    pub fn generate(
        &self,
        root_key: &str,
        root: ElementRef,
        target_dir: &Path,
        templates: &[Template],
        filter: Option<&ElementFilter>,
    ) -> ArtifexResult<GenerationStats> {
        // Everything currently on disk is considered stale until a template
        // claims it.
        let mut live_files: BTreeSet<PathBuf> = self
            .filesystem
            .walk(target_dir)
            .map_err(ArtifexError::from)?
            .into_iter()
            .collect();

        debug!(
            templates = ?templates.iter().map(Template::name).collect::<Vec<_>>(),
            "templates to process"
        );

        let targets = collect_targets(self.registry.targets(), root_key, root)?;

        let mut produced: HashMap<PathBuf, String> = HashMap::new();
        let mut stats = GenerationStats::default();

        for template in templates {
            debug!(template = template.name(), "evaluating template");
            let Some(pairs) = targets.pairs(template.target_key()) else {
                continue;
            };

            for (scope, element) in pairs {
                if !template.applicable(scope.as_ref()) {
                    continue;
                }
                if let Some(filter) = filter
                    && !filter(template.target_key(), element.as_ref())
                {
                    continue;
                }
                self.render(
                    template,
                    target_dir,
                    element,
                    &mut live_files,
                    &mut produced,
                    &mut stats,
                )?;
            }
        }

        self.delete_unproduced(&live_files, &mut stats)?;

        info!(
            written = stats.files_written,
            unchanged = stats.files_unchanged,
            deleted = stats.files_deleted,
            "generator completed"
        );
        Ok(stats)
    }

    /// Render one template for one element.
    ///
    /// Any failure — context, guard, path pattern, body, or filesystem — is
    /// wrapped into a single [`GenerationError`] carrying the template name,
    /// target kind, and element identity.
    fn render(
        &self,
        template: &Template,
        target_dir: &Path,
        element: &ElementRef,
        live_files: &mut BTreeSet<PathBuf>,
        produced: &mut HashMap<PathBuf, String>,
        stats: &mut GenerationStats,
    ) -> Result<(), GenerationError> {
        self.try_render(template, target_dir, element, live_files, produced, stats)
            .map_err(|cause| GenerationError {
                template: template.name().to_string(),
                target: template.target_key().to_string(),
                element: Template::name_for_element(element.as_ref()),
                cause,
            })
    }

    fn try_render(
        &self,
        template: &Template,
        target_dir: &Path,
        element: &ElementRef,
        live_files: &mut BTreeSet<PathBuf>,
        produced: &mut HashMap<PathBuf, String>,
        stats: &mut GenerationStats,
    ) -> Result<(), RenderError> {
        debug!(
            template = template.name(),
            target = template.target_key(),
            element = %Template::name_for_element(element.as_ref()),
            "generating"
        );

        let ctx = template.create_context(element);
        if !template.guard_allows(&ctx)? {
            return Ok(());
        }

        let relative = ctx.interpolate(template.output_path_pattern())?;
        let path = target_dir.join(relative);

        // Two templates producing the same path within one run would silently
        // overwrite each other; reject instead.
        if let Some(earlier) = produced.insert(path.clone(), template.name().to_string()) {
            return Err(RenderError::OutputPathCollision {
                path,
                earlier_template: earlier,
            });
        }
        live_files.remove(&path);

        let content = template.render_body(&ctx)?;

        if self.filesystem.read_file(&path)?.as_deref() == Some(content.as_str()) {
            // Byte-identical content: leave the file (and its mtime) alone.
            debug!(path = %path.display(), "skipped generation due to no changes");
            stats.files_unchanged += 1;
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&path, &content)?;
        debug!(path = %path.display(), "generated");
        stats.files_written += 1;
        Ok(())
    }

    /// Delete every path not claimed during this run.
    ///
    /// Reverse lexicographic order processes the deepest paths first, so
    /// files disappear before the directories containing them are examined;
    /// a directory is removed only if nothing remains inside it.
    fn delete_unproduced(
        &self,
        live_files: &BTreeSet<PathBuf>,
        stats: &mut GenerationStats,
    ) -> Result<(), ArtifexError> {
        for path in live_files.iter().rev() {
            if self.filesystem.is_dir(path) {
                if self.filesystem.dir_is_empty(path)? {
                    debug!(path = %path.display(), "removing as no longer generated");
                    self.filesystem.remove_dir(path)?;
                    stats.directories_deleted += 1;
                }
            } else {
                debug!(path = %path.display(), "removing as no longer generated");
                self.filesystem.remove_file(path)?;
                stats.files_deleted += 1;
            }
        }
        Ok(())
    }
}
