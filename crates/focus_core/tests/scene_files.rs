//! The shipped level scenes survive a save and reload unchanged

use std::path::PathBuf;

use focus_core::Scene;

const EPSILON: f32 = 1e-4;

fn level_path(index: usize) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../assets/levels")
        .join(format!("level{}.ron", index))
}

fn assert_same_scene(expected: &Scene, actual: &Scene) {
    assert_eq!(expected.model_count(), actual.model_count());
    for (_, model) in expected.models() {
        let rebuilt = actual.model_by_name(&model.name).unwrap();
        let error = (rebuilt.transform - model.transform).norm();
        assert!(error < EPSILON, "{} in {} moved by {}", model.name, expected.name(), error);
        assert_eq!(rebuilt.material_index, model.material_index);
        assert_eq!(rebuilt.is_focus_target, model.is_focus_target);
        assert_eq!(rebuilt.is_leaf, model.is_leaf);
        assert_eq!(rebuilt.transparent, model.transparent);
    }
    assert!((expected.camera().translation - actual.camera().translation).norm() < EPSILON);
    assert!((expected.camera().forward() - actual.camera().forward()).norm() < EPSILON);
    assert_eq!(expected.background_color(), actual.background_color());
    assert_eq!(expected.materials().len(), actual.materials().len());
}

#[test]
fn test_every_level_rebuilds_from_its_template() {
    for index in 1..=4 {
        let scene = Scene::load(level_path(index)).unwrap();
        let rebuilt = Scene::from_template(&scene.to_template().unwrap()).unwrap();
        assert_same_scene(&scene, &rebuilt);
    }
}

#[test]
fn test_every_level_survives_save_and_load() {
    for index in 1..=4 {
        let scene = Scene::load(level_path(index)).unwrap();
        let path = std::env::temp_dir().join(format!("focus_level{}_{}.ron", index, std::process::id()));
        scene.save(&path).unwrap();

        let loaded = Scene::load(&path);
        std::fs::remove_file(&path).ok();
        assert_same_scene(&scene, &loaded.unwrap());
    }
}

#[test]
fn test_quarter_turn_walls_keep_their_orientation() {
    let scene = Scene::load(level_path(1)).unwrap();
    let saved = scene.to_template().unwrap();
    let wall = saved.models.iter().find(|m| m.name == "Wall3").unwrap();
    assert!((wall.rotation[1] - 90.0).abs() < 1e-3, "{:?}", wall.rotation);
    assert!(wall.rotation[0].abs() < 1e-3 && wall.rotation[2].abs() < 1e-3);
}
