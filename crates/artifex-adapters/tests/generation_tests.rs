//! End-to-end generation runs over the in-memory and local filesystems.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use artifex_adapters::{FnBody, InterpolatedBody, LocalFilesystem, MemoryFilesystem};
use artifex_core::prelude::*;

// ── Model fixture ─────────────────────────────────────────────────────────────

struct Attribute {
    name: String,
    qualified_name: String,
}

impl Element for Attribute {
    fn name(&self) -> String {
        self.name.clone()
    }
    fn qualified_name(&self) -> String {
        self.qualified_name.clone()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Entity {
    name: String,
    qualified_name: String,
    attributes: Vec<Arc<Attribute>>,
}

impl Element for Entity {
    fn name(&self) -> String {
        self.name.clone()
    }
    fn qualified_name(&self) -> String {
        self.qualified_name.clone()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct PersistenceUnit {
    name: String,
}

impl Element for PersistenceUnit {
    fn name(&self) -> String {
        self.name.clone()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Repository {
    name: String,
    entities: Vec<Arc<Entity>>,
    jpa_units: Option<Vec<Arc<PersistenceUnit>>>,
}

impl Element for Repository {
    fn name(&self) -> String {
        self.name.clone()
    }
    fn facet_enabled(&self, facet: &str) -> bool {
        facet == "jpa" && self.jpa_units.is_some()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn model(entity_names: &[&str], jpa_units: Option<&[&str]>) -> ElementRef {
    let entities = entity_names
        .iter()
        .map(|name| {
            Arc::new(Entity {
                name: name.to_string(),
                qualified_name: format!("MyRepo.{name}"),
                attributes: (1..=2)
                    .map(|n| {
                        Arc::new(Attribute {
                            name: format!("{name}Attr{n}"),
                            qualified_name: format!("MyRepo.{name}.{name}Attr{n}"),
                        })
                    })
                    .collect(),
            })
        })
        .collect();
    Arc::new(Repository {
        name: "MyRepo".into(),
        entities,
        jpa_units: jpa_units.map(|units| {
            units
                .iter()
                .map(|name| Arc::new(PersistenceUnit { name: name.to_string() }))
                .collect()
        }),
    })
}

fn schema() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_target("repository", None, TargetOptions::new())
        .unwrap();
    registry
        .register_target(
            "entity",
            Some("repository"),
            TargetOptions::new().accessor(|element| {
                let Some(repo) = element.as_any().downcast_ref::<Repository>() else {
                    return Children::None;
                };
                repo.entities
                    .iter()
                    .map(|e| e.clone() as ElementRef)
                    .collect()
            }),
        )
        .unwrap();
    registry
        .register_target(
            "attribute",
            Some("entity"),
            TargetOptions::new().accessor(|element| {
                let Some(entity) = element.as_any().downcast_ref::<Entity>() else {
                    return Children::None;
                };
                entity
                    .attributes
                    .iter()
                    .map(|a| a.clone() as ElementRef)
                    .collect()
            }),
        )
        .unwrap();
    registry
        .register_target(
            "unit",
            Some("repository"),
            TargetOptions::new().facet("jpa").accessor(|element| {
                let Some(repo) = element.as_any().downcast_ref::<Repository>() else {
                    return Children::None;
                };
                match &repo.jpa_units {
                    Some(units) => units.iter().map(|u| u.clone() as ElementRef).collect(),
                    None => Children::None,
                }
            }),
        )
        .unwrap();
    registry
}

fn java_set(registry: &mut Registry) -> Vec<Template> {
    registry
        .define_template_set("java", TemplateSetOptions::new())
        .unwrap();
    registry
        .add_template(
            "java",
            Template::new(
                "repository",
                "repository.java",
                "main/java/{repository.name}.java",
                InterpolatedBody::new("Repository: {repository.name}\n"),
            ),
        )
        .unwrap();
    registry
        .add_template(
            "java",
            Template::new(
                "entity",
                "entity.java",
                "main/java/{entity.path}.java",
                InterpolatedBody::new("Entity: {entity.name}\n"),
            ),
        )
        .unwrap();
    registry
        .add_template(
            "java",
            Template::new(
                "attribute",
                "attribute.java",
                "main/java/{attribute.path}.java",
                InterpolatedBody::new("Attribute: {attribute.name}\n"),
            ),
        )
        .unwrap();
    registry
        .add_template(
            "java",
            Template::new(
                "jpa.unit",
                "unit.xml",
                "main/java/units/{unit.name}.xml",
                InterpolatedBody::new("<unit name=\"{unit.name}\"/>\n"),
            ),
        )
        .unwrap();
    registry.load_templates_from_sets(&["java"]).unwrap()
}

fn out() -> PathBuf {
    PathBuf::from("/out")
}

fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}

// ── Full run against the memory filesystem ────────────────────────────────────

#[test]
fn generates_the_tree_and_reconciles_stale_content() {
    let mut registry = schema();
    let templates = java_set(&mut registry);
    let fs = MemoryFilesystem::new();

    // Leftovers from a previous layout plus one file that is already up to
    // date.
    fs.create_dir_all(Path::new("/out/some/dir/to/delete")).unwrap();
    fs.create_dir_all(Path::new("/out/main/java")).unwrap();
    fs.write_file(Path::new("/out/main/java/Touched.java"), "stale").unwrap();
    fs.write_file(Path::new("/out/main/java/MyRepo.java"), "Repository: MyRepo\n")
        .unwrap();
    let seed_writes = fs.write_count();

    let generator = Generator::new(&registry, &fs);
    let stats = generator
        .generate(
            "repository",
            model(&["MyEntityA", "MyEntityB"], Some(&["MyUnit1", "MyUnit2"])),
            &out(),
            &templates,
            None,
        )
        .unwrap();

    assert_eq!(
        stats,
        GenerationStats {
            files_written: 8,
            files_unchanged: 1,
            files_deleted: 1,
            directories_deleted: 4,
        }
    );
    assert_eq!(fs.write_count(), seed_writes + 8);

    assert_eq!(
        fs.file_paths(),
        sorted(vec![
            PathBuf::from("/out/main/java/MyRepo.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityA.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityB.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityA/MyEntityAAttr1.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityA/MyEntityAAttr2.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityB/MyEntityBAttr1.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityB/MyEntityBAttr2.java"),
            PathBuf::from("/out/main/java/units/MyUnit1.xml"),
            PathBuf::from("/out/main/java/units/MyUnit2.xml"),
        ])
    );
    assert_eq!(
        fs.read_file(Path::new("/out/main/java/MyRepo/MyEntityA.java"))
            .unwrap()
            .as_deref(),
        Some("Entity: MyEntityA\n")
    );
    // The stale file and the empty directory chain are gone.
    assert_eq!(fs.read_file(Path::new("/out/main/java/Touched.java")).unwrap(), None);
    assert!(!fs.is_dir(Path::new("/out/some")));
    // Directories holding generated files survive.
    assert!(fs.is_dir(Path::new("/out/main/java")));
}

#[test]
fn second_run_writes_nothing() {
    let mut registry = schema();
    let templates = java_set(&mut registry);
    let fs = MemoryFilesystem::new();
    let generator = Generator::new(&registry, &fs);

    let root = || model(&["MyEntityA", "MyEntityB"], Some(&["MyUnit1"]));
    let first = generator
        .generate("repository", root(), &out(), &templates, None)
        .unwrap();
    assert_eq!(first.files_written, 8);
    let writes = fs.write_count();

    let second = generator
        .generate("repository", root(), &out(), &templates, None)
        .unwrap();
    assert_eq!(
        second,
        GenerationStats {
            files_written: 0,
            files_unchanged: 8,
            files_deleted: 0,
            directories_deleted: 0,
        }
    );
    assert_eq!(fs.write_count(), writes);
}

#[test]
fn identical_runs_produce_identical_trees() {
    let mut registry = schema();
    let templates = java_set(&mut registry);

    let run = || {
        let fs = MemoryFilesystem::new();
        let generator = Generator::new(&registry, &fs);
        generator
            .generate(
                "repository",
                model(&["MyEntityA", "MyEntityB"], Some(&["MyUnit1"])),
                &out(),
                &templates,
                None,
            )
            .unwrap();
        let mut snapshot: Vec<(PathBuf, String)> = fs
            .file_paths()
            .into_iter()
            .map(|p| {
                let content = fs.read_file(&p).unwrap().unwrap_or_default();
                (p, content)
            })
            .collect();
        snapshot.sort();
        snapshot
    };

    assert_eq!(run(), run());
}

// ── Model evolution ───────────────────────────────────────────────────────────

#[test]
fn outputs_of_removed_elements_are_deleted() {
    let mut registry = schema();
    let templates = java_set(&mut registry);
    let fs = MemoryFilesystem::new();
    let generator = Generator::new(&registry, &fs);

    generator
        .generate(
            "repository",
            model(&["MyEntityA", "MyEntityB"], None),
            &out(),
            &templates,
            None,
        )
        .unwrap();
    assert!(fs
        .file_paths()
        .contains(&PathBuf::from("/out/main/java/MyRepo/MyEntityB.java")));

    let stats = generator
        .generate("repository", model(&["MyEntityA"], None), &out(), &templates, None)
        .unwrap();

    // MyEntityB.java plus its two attribute files, and the now-empty
    // MyEntityB directory.
    assert_eq!(stats.files_written, 0);
    assert_eq!(stats.files_deleted, 3);
    assert_eq!(stats.directories_deleted, 1);
    assert_eq!(
        fs.file_paths(),
        sorted(vec![
            PathBuf::from("/out/main/java/MyRepo.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityA.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityA/MyEntityAAttr1.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityA/MyEntityAAttr2.java"),
        ])
    );
}

// ── Gating ────────────────────────────────────────────────────────────────────

#[test]
fn facet_gates_both_templates_and_target_kinds() {
    let mut registry = schema();
    registry
        .define_template_set("jpa", TemplateSetOptions::new())
        .unwrap();
    registry
        .add_template(
            "jpa",
            Template::new(
                "repository",
                "persistence.xml",
                "conf/persistence.xml",
                InterpolatedBody::new("<persistence/>\n"),
            )
            .with_facet("jpa"),
        )
        .unwrap();
    registry
        .add_template(
            "jpa",
            Template::new(
                "jpa.unit",
                "unit.xml",
                "conf/units/{unit.name}.xml",
                InterpolatedBody::new("<unit/>\n"),
            ),
        )
        .unwrap();
    let templates = registry.load_templates_from_sets(&["jpa"]).unwrap();

    let fs = MemoryFilesystem::new();
    let generator = Generator::new(&registry, &fs);

    let stats = generator
        .generate("repository", model(&["MyEntityA"], None), &out(), &templates, None)
        .unwrap();
    assert_eq!(stats.files_written, 0);
    assert!(fs.file_paths().is_empty());

    let stats = generator
        .generate(
            "repository",
            model(&["MyEntityA"], Some(&["MyUnit1"])),
            &out(),
            &templates,
            None,
        )
        .unwrap();
    assert_eq!(stats.files_written, 2);
    assert_eq!(
        fs.file_paths(),
        vec![
            PathBuf::from("/out/conf/persistence.xml"),
            PathBuf::from("/out/conf/units/MyUnit1.xml"),
        ]
    );
}

#[test]
fn guard_skips_elements_without_output() {
    let mut registry = schema();
    registry
        .define_template_set("guarded", TemplateSetOptions::new())
        .unwrap();
    registry
        .add_template(
            "guarded",
            Template::new(
                "entity",
                "entity.java",
                "main/{entity.name}.java",
                InterpolatedBody::new("Entity: {entity.name}\n"),
            )
            .with_guard(|ctx| {
                Ok(ctx
                    .element("entity")
                    .is_some_and(|e| e.qualified_name() == "MyRepo.MyEntityB"))
            }),
        )
        .unwrap();
    let templates = registry.load_templates_from_sets(&["guarded"]).unwrap();

    let fs = MemoryFilesystem::new();
    let generator = Generator::new(&registry, &fs);
    let stats = generator
        .generate(
            "repository",
            model(&["MyEntityA", "MyEntityB"], None),
            &out(),
            &templates,
            None,
        )
        .unwrap();

    assert_eq!(stats.files_written, 1);
    assert_eq!(fs.file_paths(), vec![PathBuf::from("/out/main/MyEntityB.java")]);
}

#[test]
fn element_filter_excludes_kinds_and_reclaims_their_files() {
    let mut registry = schema();
    let templates = java_set(&mut registry);
    let fs = MemoryFilesystem::new();
    let generator = Generator::new(&registry, &fs);

    generator
        .generate(
            "repository",
            model(&["MyEntityA"], None),
            &out(),
            &templates,
            None,
        )
        .unwrap();
    assert_eq!(fs.file_paths().len(), 4);

    // Filtered out elements render nothing, so their previous outputs count
    // as stale.
    let no_attributes = |key: &str, _element: &dyn Element| key != "attribute";
    let stats = generator
        .generate(
            "repository",
            model(&["MyEntityA"], None),
            &out(),
            &templates,
            Some(&no_attributes),
        )
        .unwrap();

    assert_eq!(stats.files_deleted, 2);
    assert_eq!(
        fs.file_paths(),
        sorted(vec![
            PathBuf::from("/out/main/java/MyRepo.java"),
            PathBuf::from("/out/main/java/MyRepo/MyEntityA.java"),
        ])
    );
}

// ── Failure handling ──────────────────────────────────────────────────────────

#[test]
fn body_failure_aborts_the_run_and_skips_the_deletion_pass() {
    let mut registry = schema();
    registry
        .define_template_set("broken", TemplateSetOptions::new())
        .unwrap();
    registry
        .add_template(
            "broken",
            Template::new(
                "repository",
                "ok.txt",
                "ok.txt",
                InterpolatedBody::new("fine\n"),
            ),
        )
        .unwrap();
    registry
        .add_template(
            "broken",
            Template::new(
                "entity",
                "broken.txt",
                "broken/{entity.name}.txt",
                FnBody::new(|_ctx: &RenderContext| {
                    Err(RenderError::Body("template exploded".into()))
                }),
            ),
        )
        .unwrap();
    let templates = registry.load_templates_from_sets(&["broken"]).unwrap();

    let fs = MemoryFilesystem::new();
    fs.create_dir_all(Path::new("/out")).unwrap();
    fs.write_file(Path::new("/out/leftover.txt"), "stale").unwrap();

    let generator = Generator::new(&registry, &fs);
    let err = generator
        .generate(
            "repository",
            model(&["MyEntityA"], None),
            &out(),
            &templates,
            None,
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "error generating broken:broken.txt for entity MyRepo.MyEntityA"
    );
    // The template that ran before the failure left its output, and the
    // stale file survives because reconciliation never ran.
    assert_eq!(
        fs.read_file(Path::new("/out/ok.txt")).unwrap().as_deref(),
        Some("fine\n")
    );
    assert_eq!(
        fs.read_file(Path::new("/out/leftover.txt")).unwrap().as_deref(),
        Some("stale")
    );
}

#[test]
fn conflicting_output_paths_are_rejected() {
    let mut registry = schema();
    registry
        .define_template_set("clash", TemplateSetOptions::new())
        .unwrap();
    for key in ["first.txt", "second.txt"] {
        registry
            .add_template(
                "clash",
                Template::new(
                    "repository",
                    key,
                    "shared/output.txt",
                    InterpolatedBody::new("content from {repository.name}\n"),
                ),
            )
            .unwrap();
    }
    let templates = registry.load_templates_from_sets(&["clash"]).unwrap();

    let fs = MemoryFilesystem::new();
    let generator = Generator::new(&registry, &fs);
    let err = generator
        .generate(
            "repository",
            model(&[], None),
            &out(),
            &templates,
            None,
        )
        .unwrap_err();

    let source = std::error::Error::source(&err)
        .map(ToString::to_string)
        .unwrap_or_default();
    assert!(source.contains("/out/shared/output.txt"), "got: {source}");
    assert!(source.contains("clash:first.txt"), "got: {source}");
}

// ── Local filesystem ──────────────────────────────────────────────────────────

#[test]
fn local_filesystem_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("generated");

    let mut registry = schema();
    let templates = java_set(&mut registry);
    let fs = LocalFilesystem::new();
    let generator = Generator::new(&registry, &fs);

    let stats = generator
        .generate(
            "repository",
            model(&["MyEntityA", "MyEntityB"], None),
            &target,
            &templates,
            None,
        )
        .unwrap();
    assert_eq!(stats.files_written, 7);
    assert_eq!(
        std::fs::read_to_string(target.join("main/java/MyRepo.java")).unwrap(),
        "Repository: MyRepo\n"
    );

    let stats = generator
        .generate(
            "repository",
            model(&["MyEntityA"], None),
            &target,
            &templates,
            None,
        )
        .unwrap();
    assert_eq!(stats.files_written, 0);
    assert_eq!(stats.files_deleted, 3);
    assert_eq!(stats.directories_deleted, 1);
    assert!(!target.join("main/java/MyRepo/MyEntityB").exists());
    assert!(!target.join("main/java/MyRepo/MyEntityB.java").exists());
    assert!(target.join("main/java/MyRepo/MyEntityA.java").exists());
}
