//! 계좌 매핑 파일 로드 통합 테스트

use proptest::prelude::*;
use simplefin_core::{AccountMapping, CoreError, MappingPolicy};
use std::io::Write;

fn write_mapping_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_valid_file() {
    let file = write_mapping_file(
        r#"{"mappings":[{"account_id":"A1","custom_name":"Checking"}],"ignore_list":["A2"]}"#,
    );

    let policy = MappingPolicy::load(Some(file.path())).unwrap();

    assert_eq!(policy.display_name("A1", "Everyday Checking"), "Checking");
    assert!(policy.is_ignored("A2"));
    assert!(!policy.is_ignored("A1"));
}

#[test]
fn test_missing_file_is_empty_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");

    let policy = MappingPolicy::load(Some(&path)).unwrap();
    assert_eq!(policy, MappingPolicy::empty());
}

#[test]
fn test_malformed_file_is_error() {
    let file = write_mapping_file(r#"{"mappings": [ not json"#);

    let err = MappingPolicy::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, CoreError::MappingParse { .. }));
}

#[test]
fn test_wrong_shape_is_error() {
    let file = write_mapping_file(r#"{"mappings": {"A1": "Checking"}}"#);

    let err = MappingPolicy::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, CoreError::MappingParse { .. }));
}

#[test]
fn test_directory_path_is_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = MappingPolicy::load(Some(dir.path())).unwrap_err();
    assert!(matches!(err, CoreError::MappingRead { .. }));
}

proptest! {
    #[test]
    fn prop_display_name_uses_mapping_or_fallback(
        mapped in proptest::collection::btree_map("[A-Z][0-9]{1,3}", "[a-z]{1,8}", 0..8),
        lookup_id in "[A-Z][0-9]{1,3}",
        fallback in "[a-z ]{0,12}",
    ) {
        let policy = MappingPolicy {
            mappings: mapped
                .iter()
                .map(|(id, name)| AccountMapping {
                    account_id: id.clone(),
                    custom_name: name.clone(),
                })
                .collect(),
            ignore_list: Vec::new(),
        };

        let expected = mapped.get(&lookup_id).map(String::as_str).unwrap_or(fallback.as_str());
        prop_assert_eq!(policy.display_name(&lookup_id, &fallback), expected);
        prop_assert!(!policy.is_ignored(&lookup_id));
    }
}
