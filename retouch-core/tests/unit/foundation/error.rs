use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RetouchError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RetouchError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        RetouchError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(RetouchError::codec("x").to_string().contains("codec error:"));
    assert!(
        RetouchError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RetouchError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
