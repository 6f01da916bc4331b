//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::Config;
use super::validator::ConfigValidator;
use crate::logging::LogLevel;
use proptest::prelude::*;
use std::path::PathBuf;

fn log_level_strategy() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Quiet),
        Just(LogLevel::Normal),
        Just(LogLevel::Verbose),
    ]
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of("/[a-z]{1,10}(/[a-z]{1,10}){0,2}"),
        prop::option::of("[a-z]{1,12}\\.db"),
        prop::option::of(1u64..=3600),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(log_level_strategy()),
    )
        .prop_map(
            |(data_dir, database_file, wait, autoinit, read_only, log_mode)| Config {
                data_dir: data_dir.map(PathBuf::from),
                database_file,
                maximum_lock_wait_seconds: wait,
                disable_autoinit: autoinit,
                read_only,
                log_mode,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Every field set in the higher layer wins; unset fields fall through.
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(result.data_dir, high.data_dir.or(low.data_dir));
        prop_assert_eq!(result.database_file, high.database_file.or(low.database_file));
        prop_assert_eq!(
            result.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
        prop_assert_eq!(result.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));
        prop_assert_eq!(result.read_only, high.read_only.or(low.read_only));
        prop_assert_eq!(result.log_mode, high.log_mode.or(low.log_mode));
    }

    // Merging an empty layer changes nothing.
    #[test]
    fn config_merge_empty_is_identity(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &Config::default());
        prop_assert_eq!(result, config);
    }

    // Generated configs are valid and survive a YAML round trip.
    #[test]
    fn config_yaml_roundtrip(config in config_strategy()) {
        ConfigValidator::validate(&config).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
