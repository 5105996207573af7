//! End-to-end flows across discovery, cleaning, installing and packing

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::cleaner::Cleaner;
use crate::{
    AddonError, ExclusionSet, FieldRequirement, Installer, Packager, Scanner, Settings, Symlinker,
    extract_metadata,
};

fn write_module(root: &Path, name: &str, valid: bool) -> PathBuf {
    let module = root.join(format!("{name}.py"));
    if valid {
        fs::write(
            &module,
            format!(r#"bl_info = {{"name": "{name}", "version": (0, 5, 0), "blender": (2, 93, 0)}}"#),
        )
        .unwrap();
    } else {
        fs::write(&module, "").unwrap();
    }
    module
}

fn write_package(root: &Path, name: &str, valid: bool) -> PathBuf {
    let package = root.join(name);
    let sub = package.join("sub_folder");
    fs::create_dir_all(&sub).unwrap();
    for suffix in [".py", ".txt", ".tmp", ".pyc"] {
        fs::write(sub.join(format!("dummy_file{suffix}")), "").unwrap();
    }
    fs::create_dir(package.join("__pycache__")).unwrap();
    fs::write(package.join("__pycache__/mod.pyc"), "").unwrap();

    let init = package.join("__init__.py");
    if valid {
        fs::write(
            init,
            format!(
                "bl_info = {{\n    \"name\": \"{name}\",\n    \"version\": (0, 2, 5),\n    \"blender\": (2, 93, 0),\n}}\n"
            ),
        )
        .unwrap();
    } else {
        fs::write(init, "").unwrap();
    }
    package
}

/// Layout shared by the flows: src/ with valid and invalid addons, plus
/// empty output/ and addons/ directories
fn project() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(tmp.path().join("output")).unwrap();
    fs::create_dir_all(tmp.path().join("addons")).unwrap();

    write_module(&src, "valid_module", true);
    write_module(&src, "valid_module_2", true);
    write_module(&src, "invalid_module", false);
    write_package(&src, "valid_package", true);
    write_package(&src, "valid_package_2", true);
    write_package(&src, "invalid_package", false);

    (tmp, src)
}

#[test]
fn test_install_flow_replaces_previous_install() {
    let (tmp, src) = project();
    let addons = tmp.path().join("addons");
    fs::write(addons.join("existing_module.py"), "untouched").unwrap();

    let settings = Settings {
        excluded_names: vec!["valid_module_2.py".to_string()],
        ..Settings::default()
    };
    let discovery = Scanner::discover(&src, &settings.exclusions()).unwrap();
    assert_eq!(
        discovery.names(),
        vec!["valid_module.py", "valid_package", "valid_package_2"]
    );

    let installer = Installer::new(&addons);
    // twice: the second run must clear the first one's copies
    for _ in 0..2 {
        let cleared = installer.clear_old(&discovery.names());
        assert!(cleared.is_success());
        assert!(installer.install_all(&discovery.units).is_success());
    }

    assert!(addons.join("valid_module.py").is_file());
    assert!(addons.join("valid_package/sub_folder/dummy_file.txt").is_file());
    assert!(!addons.join("valid_module_2.py").exists());
    assert_eq!(
        fs::read_to_string(addons.join("existing_module.py")).unwrap(),
        "untouched"
    );
}

#[test]
#[cfg(unix)]
fn test_symlink_flow_after_copy_install() {
    let (tmp, src) = project();
    let addons = tmp.path().join("addons");

    let discovery = Scanner::discover(&src, &ExclusionSet::new()).unwrap();
    let installer = Installer::new(&addons);
    assert!(installer.install_all(&discovery.units).is_success());

    let cleared = installer.clear_old(&discovery.names());
    assert_eq!(cleared.processed, discovery.units.len());

    let linked = Symlinker::new(&addons).link_all(&discovery.units);
    assert!(linked.is_success());
    for unit in &discovery.units {
        let link = addons.join(&unit.name);
        assert!(fs::symlink_metadata(&link).unwrap().is_symlink());
        assert_eq!(
            dunce::canonicalize(&link).unwrap(),
            dunce::canonicalize(&unit.path).unwrap()
        );
    }
}

#[test]
fn test_pack_flow_cleans_and_names_archives() {
    let (tmp, src) = project();
    let output = tmp.path().join("output");

    let discovery = Scanner::discover(&src, &ExclusionSet::new()).unwrap();
    let cleaner = Cleaner::new(Settings::default().suffixes());
    let mut packager = Packager::new(&src, &output);

    let mut total_removed = 0;
    for unit in &discovery.units {
        let metadata = extract_metadata(&unit.path).unwrap();
        let name = Packager::name_for(&metadata, FieldRequirement::Strict).unwrap();
        total_removed += cleaner.clean(&unit.path).unwrap();
        packager.pack(&unit.path, &name).unwrap();
    }

    // two packages, each with one cache dir and one .pyc file
    assert_eq!(total_removed, 4);

    let archive = output.join("valid_package (v0.2.5).zip");
    let names: Vec<String> = ZipArchive::new(File::open(&archive).unwrap())
        .unwrap()
        .file_names()
        .map(str::to_string)
        .collect();
    assert!(names.iter().all(|n| n.starts_with("valid_package/")));
    assert!(!names.iter().any(|n| n.contains("__pycache__") || n.ends_with(".pyc")));
    assert!(output.join("valid_module (v0.5.0).zip").is_file());
}

#[test]
fn test_pack_flow_missing_field_only_stops_that_unit() {
    let (tmp, src) = project();
    let output = tmp.path().join("output");
    fs::write(src.join("no_version.py"), r#"bl_info = {"name": "No Version"}"#).unwrap();

    let discovery = Scanner::discover(&src, &ExclusionSet::new()).unwrap();
    let mut packager = Packager::new(&src, &output);
    let mut result = crate::BatchResult::default();

    for unit in &discovery.units {
        let outcome = extract_metadata(&unit.path)
            .and_then(|m| Packager::name_for(&m, FieldRequirement::Basic))
            .and_then(|name| packager.pack(&unit.path, &name));
        result.record(&unit.name, outcome);
    }

    assert_eq!(result.processed, 4);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].name, "no_version.py");
    assert!(matches!(
        result.failures[0].error,
        AddonError::MissingMetadataField { key: "version" }
    ));
}

#[test]
fn test_discover_nothing_valid() {
    let tmp = TempDir::new().unwrap();
    write_module(tmp.path(), "invalid_module", false);
    write_package(tmp.path(), "invalid_package", false);

    let err = Scanner::discover(tmp.path(), &ExclusionSet::new()).unwrap_err();

    assert!(matches!(err, AddonError::NoAddonsFound { skipped: 2, .. }));
}
