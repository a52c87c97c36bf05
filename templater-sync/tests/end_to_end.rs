//! Full mirror + render runs against a real temporary directory.

use std::fs;
use std::path::Path;

use assert_fs::prelude::*;
use predicates::prelude::*;
use templater_core::{Config, FileConfigSource, ParameterSet};
use templater_renderer::RenderSettings;
use templater_sync::{OsFileSystem, Pipeline, RunState, SyncError};

const BODY: &str = "${project} by ${author}\n";
const STATIC: &str = "static content\n";

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn params() -> ParameterSet {
    ParameterSet::new([("project", "example-project"), ("author", "Lucas")]).expect("params")
}

fn seed_source(root: &assert_fs::TempDir) {
    root.child("sourceFolder/test.txt.ftl").write_str(BODY).unwrap();
    root.child("sourceFolder/secondary-folder/${project}-file.txt.ftl")
        .write_str(BODY)
        .unwrap();
    root.child("sourceFolder/static.txt").write_str(STATIC).unwrap();
}

fn collect_files(root: &Path) -> Vec<(String, Vec<u8>)> {
    walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn example_project_scenario() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    seed_source(&tmp);

    let config = Config::new("sourceFolder", "targetFolder", params(), tmp.path());
    let mut pipeline = Pipeline::new(&OsFileSystem, RenderSettings::default());
    let report = pipeline.run(&config).expect("run");

    assert_eq!(pipeline.state(), RunState::Done);
    assert!(report.render.is_clean());
    assert_eq!(report.render.rendered.len(), 2);
    assert_eq!(report.render.untouched, 1);

    let target = tmp.child("targetFolder");
    target.child("static.txt").assert(STATIC);
    target.child("test.txt").assert("example-project by Lucas\n");
    target
        .child("secondary-folder/example-project-file.txt")
        .assert("example-project by Lucas\n");
    target.child("test.txt.ftl").assert(predicate::path::missing());
    target
        .child("secondary-folder/${project}-file.txt.ftl")
        .assert(predicate::path::missing());

    // Source is never modified.
    tmp.child("sourceFolder/test.txt.ftl").assert(BODY);
}

#[test]
fn no_marker_files_survive_a_clean_run() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    seed_source(&tmp);
    tmp.child("sourceFolder/deep/er/x.md.ftl").write_str("${author}").unwrap();

    let config = Config::new("sourceFolder", "targetFolder", params(), tmp.path());
    Pipeline::new(&OsFileSystem, RenderSettings::default())
        .run(&config)
        .expect("run");

    for (rel, _) in collect_files(&tmp.path().join("targetFolder")) {
        assert!(!rel.ends_with(".ftl"), "marker survived: {rel}");
    }
}

#[test]
fn rerun_yields_identical_target() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    seed_source(&tmp);
    let config = Config::new("sourceFolder", "targetFolder", params(), tmp.path());

    Pipeline::new(&OsFileSystem, RenderSettings::default())
        .run(&config)
        .unwrap();
    let first = collect_files(&tmp.path().join("targetFolder"));

    tmp.child("targetFolder/leftover.txt").write_str("stale").unwrap();
    let report = Pipeline::new(&OsFileSystem, RenderSettings::default())
        .run(&config)
        .unwrap();
    let second = collect_files(&tmp.path().join("targetFolder"));

    assert!(report.mirror.cleaned);
    assert_eq!(first, second);
}

#[test]
fn non_marker_files_are_byte_identical() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    let bytes: Vec<u8> = (0u8..=255).collect();
    tmp.child("src/blob.bin").write_binary(&bytes).unwrap();
    tmp.child("src/crlf.txt").write_str("a\r\nb\r\n${project}\r\n").unwrap();

    let config = Config::new("src", "out", params(), tmp.path());
    Pipeline::new(&OsFileSystem, RenderSettings::default())
        .run(&config)
        .unwrap();

    tmp.child("out/blob.bin").assert(predicate::path::eq_file(tmp.path().join("src/blob.bin")));
    tmp.child("out/crlf.txt").assert("a\r\nb\r\n${project}\r\n");
}

#[test]
fn failing_marker_does_not_block_siblings() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("src/a.txt.ftl").write_str("${project}").unwrap();
    tmp.child("src/b.txt.ftl").write_str("${missing}").unwrap();
    tmp.child("src/c.txt.ftl").write_str("${author}").unwrap();

    let config = Config::new("src", "out", params(), tmp.path());
    let mut pipeline = Pipeline::new(&OsFileSystem, RenderSettings::default());
    let report = pipeline.run(&config).unwrap();

    assert_eq!(pipeline.state(), RunState::Done);
    assert_eq!(report.render.failures.len(), 1);
    tmp.child("out/a.txt").assert("example-project");
    tmp.child("out/c.txt").assert("Lucas");
    tmp.child("out/b.txt").assert(predicate::path::missing());
}

#[test]
fn names_rendering_to_markers_fail_and_keep_the_marker() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("src/${name}.ftl").write_str("body").unwrap();
    tmp.child("src/notes.ftl.ftl").write_str("body").unwrap();
    tmp.child("src/ok.txt.ftl").write_str("${name}").unwrap();

    let params = ParameterSet::new([("name", "readme.ftl")]).unwrap();
    let config = Config::new("src", "out", params, tmp.path());
    let report = Pipeline::new(&OsFileSystem, RenderSettings::default())
        .run(&config)
        .unwrap();

    assert_eq!(report.render.failures.len(), 2);
    tmp.child("out/ok.txt").assert("readme.ftl");
    tmp.child("out/readme.ftl").assert(predicate::path::missing());
    tmp.child("out/notes.ftl").assert(predicate::path::missing());
    tmp.child("out/notes.ftl.ftl").assert("body");
}

#[test]
fn target_nested_in_source_is_rendered_and_rerun_is_stable() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    seed_source(&tmp);
    let config = Config::new("sourceFolder", "sourceFolder/out", params(), tmp.path());

    Pipeline::new(&OsFileSystem, RenderSettings::default())
        .run(&config)
        .expect("first run");
    let first = collect_files(&tmp.path().join("sourceFolder/out"));

    Pipeline::new(&OsFileSystem, RenderSettings::default())
        .run(&config)
        .expect("second run");
    let second = collect_files(&tmp.path().join("sourceFolder/out"));

    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|(rel, _)| rel.as_str()).collect();
    assert_eq!(
        names,
        vec!["secondary-folder/example-project-file.txt", "static.txt", "test.txt"]
    );
    tmp.child("sourceFolder/test.txt.ftl").assert(BODY);
}

#[test]
fn source_inside_target_is_refused() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    seed_source(&tmp);

    let config = Config::new("sourceFolder", ".", params(), tmp.path());
    let err = Pipeline::new(&OsFileSystem, RenderSettings::default())
        .run(&config)
        .unwrap_err();

    assert!(matches!(err, SyncError::OverlappingFolders { .. }));
    tmp.child("sourceFolder/static.txt").assert(STATIC);
}

#[test]
fn missing_source_aborts_before_touching_target() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("out/keep.txt").write_str("keep").unwrap();

    let config = Config::new("absent", "out", params(), tmp.path());
    let mut pipeline = Pipeline::new(&OsFileSystem, RenderSettings::default());
    let err = pipeline.run(&config).unwrap_err();

    assert!(matches!(err, SyncError::SourceMissing { .. }));
    assert_eq!(pipeline.state(), RunState::Failed);
    tmp.child("out/keep.txt").assert("keep");
}

#[test]
fn invalid_config_file_aborts_before_any_mutation() {
    init_logs();
    let tmp = assert_fs::TempDir::new().unwrap();
    seed_source(&tmp);
    tmp.child("config.json")
        .write_str(
            r#"{"sourceFolder":"sourceFolder","targetFolder":"targetFolder","parameters":{"bad-key":"x"}}"#,
        )
        .unwrap();

    let mut pipeline = Pipeline::new(&OsFileSystem, RenderSettings::default());
    let err = pipeline
        .run(&FileConfigSource::new(tmp.path().join("config.json")))
        .unwrap_err();

    assert!(matches!(err, SyncError::Config(_)));
    tmp.child("targetFolder").assert(predicate::path::missing());
}
