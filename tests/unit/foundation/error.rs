use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CardError::content("x").to_string().contains("content error:"));
    assert!(CardError::raster("x").to_string().contains("raster error:"));
    assert!(CardError::capture("x").to_string().contains("capture error:"));
    assert!(CardError::storage("x").to_string().contains("storage error:"));
    assert!(
        CardError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn session_active_counts_as_capture_failure() {
    assert!(CardError::SessionActive.is_capture());
    assert!(CardError::capture("boom").is_capture());
    assert!(!CardError::raster("boom").is_capture());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_become_serde_errors() {
    let err = serde_json::from_str::<u32>("nope").unwrap_err();
    let err = CardError::from(err);
    assert!(matches!(err, CardError::Serde(_)));
}
