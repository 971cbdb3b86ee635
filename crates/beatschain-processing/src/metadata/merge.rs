use beatschain_core::MetadataMap;

/// Overlay user overrides on extracted metadata. User keys win on conflict.
pub fn merge_metadata(extracted: MetadataMap, overrides: &MetadataMap) -> MetadataMap {
    let mut merged = extracted;
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatschain_core::ExtractedMetadata;
    use serde_json::json;

    fn map(value: serde_json::Value) -> MetadataMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_user_keys_win() {
        let extracted = ExtractedMetadata {
            title: Some("Y".to_string()),
            duration: Some(180.0),
            ..Default::default()
        };

        let merged = merge_metadata(extracted.to_metadata_map(), &map(json!({ "title": "X" })));

        assert_eq!(merged, map(json!({ "title": "X", "duration": 180.0 })));
    }

    #[test]
    fn test_one_sided_keys_pass_through() {
        let merged = merge_metadata(
            map(json!({ "artist": "DJ Test", "bpm": 120 })),
            &map(json!({ "genre": "House", "bpm": 124 })),
        );

        assert_eq!(merged.len(), 3);
        assert_eq!(merged["artist"], json!("DJ Test"));
        assert_eq!(merged["genre"], json!("House"));
        assert_eq!(merged["bpm"], json!(124));
    }

    #[test]
    fn test_empty_sides() {
        assert!(merge_metadata(MetadataMap::new(), &MetadataMap::new()).is_empty());

        let only_user = merge_metadata(MetadataMap::new(), &map(json!({ "title": "X" })));
        assert_eq!(only_user["title"], json!("X"));
    }
}
