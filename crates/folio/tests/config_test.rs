//! Configuration layering tests.

use folio::{DEFAULT_CONFIG, FolioConfig};
use std::path::PathBuf;

#[test]
fn bundled_defaults_parse() -> anyhow::Result<()> {
    let config = FolioConfig::defaults()?;

    assert_eq!(config.model.name, "gemini-2.0-flash");
    assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
    assert_eq!(*config.model.retry.max_retries(), 3);
    assert_eq!(*config.generation.outline_max_tokens(), 4096);
    assert_eq!(*config.generation.summary_max_tokens(), 500);
    assert_eq!(*config.generation.summary_input_chars(), 8000);
    assert_eq!(config.paths.output_dir, PathBuf::from("folio-output"));
    assert_eq!(config.logging.level, "info");
    assert!(config.notifications.webhook_url.is_none());
    assert!(DEFAULT_CONFIG.contains("[generation]"));
    Ok(())
}

#[test]
fn file_overrides_only_what_it_names() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("folio.toml");
    std::fs::write(
        &path,
        "[generation]\nchapter_max_tokens = 2048\n\n[outline]\nfallback_cap = 4\n\n[notifications]\nwebhook_url = \"http://localhost:9/hook\"\n",
    )?;

    let config = FolioConfig::from_file(&path)?;

    assert_eq!(*config.generation.chapter_max_tokens(), 2048);
    assert_eq!(*config.generation.outline_max_tokens(), 4096);
    assert_eq!(*config.outline.fallback_cap(), Some(4));
    assert_eq!(config.model.provider, "gemini");
    assert_eq!(
        config.notifications.webhook_url.as_deref(),
        Some("http://localhost:9/hook")
    );
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    assert!(FolioConfig::from_file("/definitely/not/here/folio.toml").is_err());
}

#[test]
fn unknown_provider_is_rejected() -> anyhow::Result<()> {
    let mut config = FolioConfig::defaults()?;
    config.model.provider = "carrier-pigeon".to_string();

    let err = config.text_generator().unwrap_err();
    assert!(err.to_string().contains("Unsupported model provider"));
    Ok(())
}
