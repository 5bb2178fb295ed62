use std::collections::HashMap;

use serde_json::Value;

use crate::error::AppError;

pub const VALID_TAGS: [&str; 19] = [
    "Arrangement",
    "Verse", "Verse 1", "Verse 2", "Verse 3", "Verse 4", "Verse 5",
    "Chorus", "Chorus 1", "Chorus 2", "Chorus 3", "Chorus 4", "Chorus 5",
    "Pre-Chorus", "Bridge", "Tag", "Intro", "Outro", "Intermezzo",
];

pub fn is_valid_tag(tag: &str) -> bool {
    VALID_TAGS.contains(&tag)
}

/// A chord sheet is a JSON object mapping section tags to their text.
pub fn validate(chord_sheet: &Value) -> Result<(), AppError> {
    let sections: HashMap<String, String> = serde_json::from_value(chord_sheet.clone())
        .map_err(|e| AppError::BadRequest(format!("could not parse chordsheet: {}", e)))?;

    if let Some(tag) = sections.keys().find(|tag| !is_valid_tag(tag)) {
        return Err(AppError::BadRequest(format!("{} is not a valid tag", tag)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn accepts_known_sections() {
        assert!(validate(&json!({})).is_ok());
        assert!(validate(&json!({"Verse": "Test"})).is_ok());
        assert!(validate(&json!({"Verse 1": "G D", "Pre-Chorus": "Em C", "Arrangement": "V1 C"})).is_ok());
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = validate(&json!({"V": "Test"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.public_message(), "V is not a valid tag");
    }

    #[test]
    fn rejects_non_object_or_non_string_values() {
        for sheet in [json!("Verse"), json!(["Verse"]), json!({"Verse": 1}), json!(null)] {
            let err = validate(&sheet).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest);
            assert!(err.public_message().starts_with("could not parse chordsheet"));
        }
    }
}
