// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn empty_file_is_the_default() {
    assert_eq!(DaemonConfig::parse("").unwrap(), DaemonConfig::default());
}

#[test]
fn missing_file_is_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = DaemonConfig::load(&dir.path().join("choresd.toml")).unwrap();
    assert_eq!(config, DaemonConfig::default());
}

#[test]
fn durations_use_human_units() {
    let config = DaemonConfig::parse(
        r#"
scan_interval = "5m"
day_offset_minutes = -300
default_reminder_lead = "30m"
event_log = false
"#,
    )
    .unwrap();

    assert_eq!(config.scan_interval, Duration::from_secs(300));
    assert_eq!(config.default_reminder_lead, Some(Duration::from_secs(1800)));
    assert_eq!(config.manager_config().day_offset_minutes, -300);
    assert!(!config.event_log);
}

#[test]
fn nonsense_is_rejected() {
    assert!(matches!(
        DaemonConfig::parse(r#"scan_interval = "0s""#),
        Err(ConfigError::ZeroInterval)
    ));
    assert!(matches!(
        DaemonConfig::parse("day_offset_minutes = 2000"),
        Err(ConfigError::Offset(2000))
    ));
    assert!(matches!(
        DaemonConfig::parse("scan_every = 3"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn default_reminder_fills_only_unset_chores() {
    let config = DaemonConfig {
        default_reminder_lead: Some(Duration::from_secs(600)),
        ..DaemonConfig::default()
    };
    let mut own = ChoreDef::new("dishes", "Dishes");
    own.reminder_lead = Some(Duration::from_secs(60));
    let mut manifest = HouseholdManifest {
        kids: Vec::new(),
        chores: vec![own, ChoreDef::new("trash", "Trash")],
    };

    config.apply_defaults(&mut manifest);

    assert_eq!(manifest.chores[0].reminder_lead, Some(Duration::from_secs(60)));
    assert_eq!(manifest.chores[1].reminder_lead, Some(Duration::from_secs(600)));
}
