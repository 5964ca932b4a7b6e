use serde::{Deserialize, Serialize};

/// The three editable captions rendered into every thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFields {
    pub corner_label: String,
    pub headline_line1: String,
    pub headline_line2: String,
}

impl Default for TextFields {
    fn default() -> Self {
        Self {
            corner_label: "ROGÉRIO MORRO DA CRUZ".to_string(),
            headline_line1: "NÃO É SÓ UM NOME,".to_string(),
            headline_line2: "É UMA HISTÓRIA!".to_string(),
        }
    }
}

impl TextFields {
    pub fn new(
        corner_label: impl Into<String>,
        headline_line1: impl Into<String>,
        headline_line2: impl Into<String>,
    ) -> Self {
        Self {
            corner_label: corner_label.into(),
            headline_line1: headline_line1.into(),
            headline_line2: headline_line2.into(),
        }
    }
}
