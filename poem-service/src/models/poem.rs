use serde::{Deserialize, Serialize};

/// Parameters for a single poem.
///
/// Every field is required but otherwise free text: `length` is usually a
/// stanza count ("3") or a preset name ("short"), and is passed to the model
/// as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemRequest {
    pub theme: String,
    pub length: String,
    pub rhyme_scheme: String,
    pub poet_style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemResponse {
    pub poem: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_rejected() {
        let err = serde_json::from_str::<PoemRequest>(
            r#"{"theme":"autumn","length":"3","rhyme_scheme":"ABAB"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("poet_style"));
    }

    #[test]
    fn empty_strings_are_accepted() {
        let req: PoemRequest = serde_json::from_str(
            r#"{"theme":"","length":"","rhyme_scheme":"","poet_style":""}"#,
        )
        .unwrap();
        assert!(req.theme.is_empty());
    }
}
