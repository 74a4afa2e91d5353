//! Tests for DataLoader and the service container

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use sunburst::application::options::ROLE;
use sunburst::application::services::DataLoader;
use sunburst::application::ApplicationError;
use sunburst::config::Settings;
use sunburst::domain::{ColorScaleSpec, LabelSource, SumBy};
use sunburst::infrastructure::di::ServiceContainer;
use sunburst::infrastructure::traits::{FileSystem, RealFileSystem};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write test file");
    path
}

fn loader() -> DataLoader {
    DataLoader::new(Arc::new(RealFileSystem))
}

/// In-memory filesystem recording writes.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }
}

#[test]
fn given_json_tree_with_extra_fields_when_loading_then_kept() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_file(
        &temp,
        "tree.json",
        r#"{
            "name": "root",
            "children": [
                {"name": "a", "size": 3, "id": "node-a", "label": null},
                {"name": "b", "size": 2, "eventKey": "bee", "style": {"fill": "red"}}
            ]
        }"#,
    );

    // Act
    let tree = loader().load_tree(&path).unwrap();

    // Assert
    let children = tree.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].size, Some(3.0));
    assert_eq!(children[0].extra.get("id"), Some(&serde_json::json!("node-a")));
    assert_eq!(children[1].event_key.as_deref(), Some("bee"));
    assert!(children[1].style.is_some());
}

#[test]
fn given_toml_tree_when_loading_then_nested_children() {
    let temp = TempDir::new().unwrap();
    let path = write_file(
        &temp,
        "tree.toml",
        r#"
name = "root"

[[children]]
name = "a"
size = 1.5

[[children]]
name = "b"

[[children.children]]
name = "b1"
size = 2
"#,
    );

    let tree = loader().load_tree(&path).unwrap();

    assert_eq!(tree.children()[1].children()[0].name, "b1");
    assert_eq!(tree.children()[1].children()[0].size, Some(2.0));
}

#[test]
fn given_theme_file_when_loading_then_roles_parsed() {
    let temp = TempDir::new().unwrap();
    let path = write_file(
        &temp,
        "theme.toml",
        r#"
[sunburst]
width = 500
colorScale = "warm"
sortData = true

[sunburst.style.labels]
fontSize = 12
"#,
    );

    let theme = loader().load_theme(&path).unwrap();

    let role = theme.role(ROLE).unwrap();
    assert_eq!(role.width, Some(500.0));
    assert_eq!(role.color_scale, Some(ColorScaleSpec::Named("warm".into())));
    assert_eq!(role.sort_data, Some(true));
    assert!(role.style.as_ref().unwrap().labels.contains_key("fontSize"));
}

#[test]
fn given_options_file_when_loading_then_camel_case_surface() {
    let temp = TempDir::new().unwrap();
    let path = write_file(
        &temp,
        "options.json",
        r#"{"sumBy": "count", "labels": ["x", null], "activeNodeIndex": 3}"#,
    );

    let options = loader().load_options(&path).unwrap();

    assert_eq!(options.sum_by, Some(SumBy::Count));
    assert_eq!(options.active_node_index, Some(3));
    assert!(matches!(options.labels, Some(LabelSource::Indexed(ref v)) if v.len() == 2));
}

#[test]
fn given_malformed_json_when_loading_then_parse_error_names_file() {
    let temp = TempDir::new().unwrap();
    let path = write_file(&temp, "broken.json", r#"{"name": "#);

    let result = loader().load_tree(&path);

    match result {
        Err(ApplicationError::Parse { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn given_unknown_extension_when_loading_then_unsupported_format() {
    let temp = TempDir::new().unwrap();
    let path = write_file(&temp, "tree.yaml", "name: root");

    let result = loader().load_tree(&path);

    assert!(matches!(result, Err(ApplicationError::UnsupportedFormat(_))));
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let temp = TempDir::new().unwrap();

    let result = loader().load_tree(&temp.path().join("absent.json"));

    assert!(matches!(result, Err(ApplicationError::OperationFailed { .. })));
}

#[test]
fn given_memory_fs_when_container_renders_then_theme_from_settings_applies() {
    // Arrange
    let fs = MemoryFileSystem::default()
        .with_file("/themes/t.json", r#"{"sunburst": {"width": 250, "height": 250}}"#);
    let settings = Settings {
        theme_file: Some(PathBuf::from("/themes/t.json")),
        ..Settings::default()
    };
    let container = ServiceContainer::with_deps(settings, Arc::new(fs));

    // Act
    let options = container.base_options().unwrap();
    let props = container.sunburst.base_props(&options).unwrap();
    container
        .write_output(Path::new("/out/chart.json"), &props.to_json(false).unwrap())
        .unwrap();

    // Assert
    assert_eq!(props.parent.width, 250.0);
    assert_eq!(props.parent.radius, 95.0);
    assert!(container.fs.exists(Path::new("/out/chart.json")));
}

#[test]
fn given_real_fs_when_writing_nested_output_then_parents_created() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested/dir/chart.json");

    RealFileSystem.write(&target, "{}").unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");
}
