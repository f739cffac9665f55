#[cfg(test)]
mod tests {
    use babylog::libs::error::StoreError;
    use babylog::libs::settings::{Settings, DEFAULT_DISPLAY_NAME, NAME_KEY};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SettingsTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for SettingsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("settings.json");
            SettingsTestContext { _temp_dir: temp_dir, path }
        }
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_missing_file_starts_empty(ctx: &mut SettingsTestContext) {
        let settings = Settings::open(&ctx.path).unwrap();

        assert_eq!(settings.name(), None);
        assert_eq!(settings.profile(), None);
        assert_eq!(settings.display_name(), DEFAULT_DISPLAY_NAME);
        assert!(!ctx.path.exists());
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_name_persists_across_reopen(ctx: &mut SettingsTestContext) {
        let mut settings = Settings::open(&ctx.path).unwrap();
        settings.set_name("  Mia ").unwrap();

        let reopened = Settings::open(&ctx.path).unwrap();
        assert_eq!(reopened.name().as_deref(), Some("Mia"));
        assert_eq!(reopened.profile().unwrap().name, "Mia");
        assert_eq!(reopened.display_name(), "Mia");
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_empty_name_is_rejected(ctx: &mut SettingsTestContext) {
        let mut settings = Settings::open(&ctx.path).unwrap();

        let err = settings.set_name("   ").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!ctx.path.exists());
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_generic_values_and_remove(ctx: &mut SettingsTestContext) {
        let mut settings = Settings::open(&ctx.path).unwrap();
        settings.set("reminder_minutes", &45u32).unwrap();
        settings.set_name("Leo").unwrap();

        let mut reopened = Settings::open(&ctx.path).unwrap();
        assert_eq!(reopened.get::<u32>("reminder_minutes").unwrap(), Some(45));
        assert_eq!(reopened.get::<u32>("missing").unwrap(), None);

        assert!(reopened.remove(NAME_KEY).unwrap());
        assert!(!reopened.remove(NAME_KEY).unwrap());
        assert_eq!(Settings::open(&ctx.path).unwrap().name(), None);
        assert!(!ctx.path.with_extension("json.tmp").exists());
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_corrupt_file_is_an_error(ctx: &mut SettingsTestContext) {
        std::fs::write(&ctx.path, "{not json").unwrap();

        let err = Settings::open(&ctx.path).unwrap_err();
        assert!(matches!(err, StoreError::Settings(_)));
    }
}
