use std::io::Write;

use umbra::config::{ShadowAddressMode, ShadowDepthFormat, ShadowSettings};

#[test]
fn settings_load_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{
            "cascade_count": 4,
            "width": 1024,
            "height": 1024,
            "format": "depth24_plus",
            "address_mode": "clamp_to_edge",
            "z_multiplier": 5.0
        }}"#
    )
    .expect("write settings");

    let settings = ShadowSettings::load(file.path()).expect("settings load");
    assert_eq!(settings.cascade_count, 4);
    assert_eq!(settings.width, 1024);
    assert_eq!(settings.format, ShadowDepthFormat::Depth24Plus);
    assert_eq!(settings.address_mode, ShadowAddressMode::ClampToEdge);
    assert!((settings.z_multiplier - 5.0).abs() < f32::EPSILON);
}

#[test]
fn out_of_range_cascade_count_fails_load() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{ "cascade_count": 0 }}"#).expect("write settings");
    let err = ShadowSettings::load(file.path()).expect_err("zero cascades rejected");
    assert!(format!("{err:#}").contains("cascade_count"));
}

#[test]
fn malformed_json_reports_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "not json").expect("write settings");
    let err = ShadowSettings::load(file.path()).expect_err("parse failure");
    assert!(format!("{err:#}").contains("parse"));
}

#[test]
fn missing_file_reports_path() {
    let err = ShadowSettings::load("/definitely/not/here.json").expect_err("read failure");
    assert!(format!("{err:#}").contains("not/here.json"));
}
