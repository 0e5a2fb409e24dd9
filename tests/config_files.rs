mod common;

use std::io::Write;

use common::*;
use egui::Modifiers;
use liveselect::{ClickMode, ConfigError, DragMode, SelectConfig, SelectDirection, SelectionChart};

#[test]
fn yaml_config_drives_a_chart() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "dragmode: lasso\nclickmode: event+select\nselectdirection: any\nconstants:\n  select_throttle_ms: 0\n"
    )
    .unwrap();

    let cfg = SelectConfig::load(file.path()).unwrap();
    assert_eq!(cfg.dragmode, DragMode::Lasso);
    assert_eq!(cfg.clickmode, ClickMode::EVENT_SELECT);
    assert_eq!(cfg.constants.select_throttle_ms, 0.0);
    assert_eq!(cfg.constants.min_drag_px, 8.0, "unset constants keep defaults");

    let mut chart = SelectionChart::new(cfg);
    chart.add_subplot(xy_subplot()).unwrap();
    chart
        .add_trace(liveselect::ScatterTrace::new("mock", "xy", mock_points()))
        .unwrap();
    let mut ptr = Pointer::default();
    ptr.drag_spaced(&mut chart, &LASSO_PATH, Modifiers::NONE, 1.0);
    assert_eq!(selected(&chart, 0), Some(vec![10]));
}

#[test]
fn json_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("select.json");
    let cfg = SelectConfig {
        dragmode: DragMode::Select,
        clickmode: ClickMode::SELECT,
        selectdirection: SelectDirection::D,
        ..Default::default()
    };
    cfg.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"clickmode\": \"select\""));
    assert_eq!(SelectConfig::load(&path).unwrap(), cfg);
}

#[test]
fn bad_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();

    let toml = dir.path().join("select.toml");
    std::fs::write(&toml, "dragmode = 'select'").unwrap();
    assert!(matches!(SelectConfig::load(&toml), Err(ConfigError::UnknownFormat(_))));

    let missing = dir.path().join("missing.yaml");
    assert!(matches!(SelectConfig::load(&missing), Err(ConfigError::Io { .. })));

    let negative = dir.path().join("negative.json");
    std::fs::write(&negative, r#"{"constants": {"min_drag_px": -1}}"#).unwrap();
    assert!(matches!(
        SelectConfig::load(&negative),
        Err(ConfigError::InvalidConstant { name: "min_drag_px", .. })
    ));

    let clickmode = dir.path().join("clickmode.json");
    std::fs::write(&clickmode, r#"{"clickmode": "event+hover"}"#).unwrap();
    assert!(matches!(SelectConfig::load(&clickmode), Err(ConfigError::Json(_))));
}
