/// Options recognized by the pipeline. Unknown keys in a serialized config
/// are rejected by serde; missing keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Run the general citation-grammar scan.
    pub use_library_extractor: bool,
    /// Run the reporter-specific pattern table.
    pub use_pattern_extractor: bool,
    pub extract_case_names: bool,
    pub extract_dates: bool,
    pub enable_clustering: bool,
    pub enable_verification: bool,
    /// Character distance under which two citations count as "nearby"
    /// for parallel-citation merging.
    pub proximity_window_chars: usize,
    /// Minimum name similarity a candidate must clear during
    /// multi-candidate disambiguation.
    pub name_similarity_threshold: f64,
    pub debug_mode: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        ProcessingConfig {
            use_library_extractor: true,
            use_pattern_extractor: true,
            extract_case_names: true,
            extract_dates: true,
            enable_clustering: true,
            enable_verification: true,
            proximity_window_chars: 300,
            name_similarity_threshold: 0.6,
            debug_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_enable_full_pipeline() {
        let config = ProcessingConfig::default();
        assert!(config.use_pattern_extractor);
        assert!(config.use_library_extractor);
        assert!(config.enable_clustering);
        assert!(config.enable_verification);
        assert_eq!(config.proximity_window_chars, 300);
        assert!((config.name_similarity_threshold - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: ProcessingConfig =
            serde_json::from_str(r#"{"enable_verification": false, "proximity_window_chars": 80}"#)
                .unwrap();
        assert!(!config.enable_verification);
        assert_eq!(config.proximity_window_chars, 80);
        assert!(config.extract_case_names, "untouched fields keep defaults");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let parsed = serde_json::from_str::<ProcessingConfig>(r#"{"enable_verfication": false}"#);
        assert!(parsed.is_err(), "misspelled keys should not silently no-op");
    }
}
