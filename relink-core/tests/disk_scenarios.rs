//! End-to-end passes against a scratch project on the real filesystem.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use relink_aio::DiskFs;
use relink_common::model::{
    DependencySpecifier, PassStatus, RepairStage, RepairSummary, Unavailability, Verdict,
};
use relink_common::{Config, Manifest};
use relink_core::Reconciler;
use tempfile::TempDir;

/// Layout:
///   <tmp>/outer/app        project root
///   <tmp>/outer/lib-a      declared target of `file:../lib-a`
///   <tmp>/lib-a            a stale copy one level further up
///   <tmp>/registry         global link registry
struct Scratch {
    _dir: TempDir,
    root: PathBuf,
    config: Config,
}

impl Scratch {
    fn new(manifest: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let project = root.join("outer").join("app");
        fs::create_dir_all(project.join("node_modules")).unwrap();
        fs::create_dir_all(root.join("registry")).unwrap();
        fs::write(project.join("package.json"), manifest).unwrap();
        let config = Config::with_roots(&project, root.join("registry"));
        Self {
            _dir: dir,
            root,
            config,
        }
    }

    fn package(&self, relative: &str) -> PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("package.json"), "{}").unwrap();
        path
    }

    fn store_link(&self, name: &str, target: impl AsRef<Path>) {
        symlink(target, self.config.store_entry_path(name)).unwrap();
    }

    fn specifiers(&self) -> Vec<DependencySpecifier> {
        Manifest::load(&self.config.manifest_path())
            .unwrap()
            .dependencies()
            .unwrap()
    }
}

const LIB_A: &str = r#"{"name":"app","dependencies":{"lib-a":"file:../lib-a","left-pad":"^1.3.0"}}"#;

#[tokio::test]
async fn stale_link_is_detected_and_rechained() {
    let scratch = Scratch::new(LIB_A);
    let declared = scratch.package("outer/lib-a");
    let stale = scratch.package("lib-a");
    scratch.store_link("lib-a", "../../../lib-a");

    let reconciler = Reconciler::new(&DiskFs, &scratch.config);
    let report = reconciler.inspect(&scratch.specifiers()).await;

    assert!(report.unavailable.is_empty());
    let checked = &report.checked[0];
    assert_eq!(checked.verdict, Verdict::Mismatched);
    assert_eq!(checked.dependency.expected_installed_path, declared);
    assert_eq!(checked.dependency.canonical_path, stale);
    assert!(!checked.dependency.global_registry_exists);

    let report = reconciler.run(&scratch.specifiers(), |_| true).await;
    assert_eq!(report.status(), PassStatus::Clean);
    assert_eq!(report.repair_outcomes()[0].reached, RepairStage::Repaired);

    let registry_entry = scratch.config.registry_entry_path("lib-a");
    assert_eq!(
        fs::read_link(scratch.config.store_entry_path("lib-a")).unwrap(),
        registry_entry
    );
    assert_eq!(fs::read_link(&registry_entry).unwrap(), declared);

    let again = reconciler.inspect(&scratch.specifiers()).await;
    assert_eq!(again.checked[0].verdict, Verdict::Ok);
    assert_eq!(again.status(), PassStatus::Clean);
}

#[tokio::test]
async fn stale_registry_link_is_replaced() {
    let scratch = Scratch::new(LIB_A);
    let declared = scratch.package("outer/lib-a");
    let stale = scratch.package("lib-a");
    let registry_entry = scratch.config.registry_entry_path("lib-a");
    symlink(&stale, &registry_entry).unwrap();
    scratch.store_link("lib-a", &registry_entry);

    let reconciler = Reconciler::new(&DiskFs, &scratch.config);
    let report = reconciler.run(&scratch.specifiers(), |_| true).await;
    assert!(report.checked[0].dependency.global_registry_exists);
    assert_eq!(report.status(), PassStatus::Clean);
    assert_eq!(fs::read_link(&registry_entry).unwrap(), declared);
    assert!(stale.join("package.json").exists());
}

#[tokio::test]
async fn installed_copy_is_replaced_by_a_link() {
    let scratch = Scratch::new(LIB_A);
    let declared = scratch.package("outer/lib-a");
    let copy = scratch.config.store_entry_path("lib-a");
    fs::create_dir_all(copy.join("dist")).unwrap();
    fs::write(copy.join("dist").join("index.js"), "").unwrap();

    let reconciler = Reconciler::new(&DiskFs, &scratch.config);
    let report = reconciler.run(&scratch.specifiers(), |_| true).await;
    assert_eq!(report.checked[0].dependency.canonical_path, copy);
    assert_eq!(report.status(), PassStatus::Clean);
    assert_eq!(fs::canonicalize(&copy).unwrap(), declared);
}

#[tokio::test]
async fn missing_declared_target_is_reported_without_repair() {
    let scratch = Scratch::new(LIB_A);
    let stale = scratch.package("lib-a");
    scratch.store_link("lib-a", &stale);

    let report = Reconciler::new(&DiskFs, &scratch.config)
        .run(&scratch.specifiers(), |_| panic!("must not be asked"))
        .await;

    assert_eq!(report.unavailable.len(), 1);
    let missing = &report.unavailable[0];
    assert_eq!(missing.reason, Unavailability::MissingDeclaredTarget);
    assert_eq!(missing.dependency.name, "lib-a");
    assert_eq!(missing.dependency.specifier, "file:../lib-a");
    assert!(matches!(report.repair, RepairSummary::NotAttempted));
    assert_eq!(report.status(), PassStatus::IssuesRemain);
    assert_eq!(
        fs::read_link(scratch.config.store_entry_path("lib-a")).unwrap(),
        stale
    );
}

#[tokio::test]
async fn dangling_store_link_is_missing_store_entry() {
    let scratch = Scratch::new(LIB_A);
    scratch.package("outer/lib-a");
    scratch.store_link("lib-a", scratch.root.join("registry").join("lib-a"));

    let report = Reconciler::new(&DiskFs, &scratch.config)
        .inspect(&scratch.specifiers())
        .await;

    assert!(report.checked.is_empty());
    assert_eq!(report.unavailable.len(), 1);
    assert_eq!(report.unavailable[0].reason, Unavailability::MissingStoreEntry);
    assert_eq!(report.status(), PassStatus::IssuesRemain);
}
