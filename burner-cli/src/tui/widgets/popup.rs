#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopupType {
    Info,
    Error,
    Expired,
}

/// Modal message, dismissed by any key
pub struct Popup {
    pub popup_type: PopupType,
    pub title: String,
    pub content: String,
    pub details: Vec<String>,
}

impl Popup {
    pub fn new(popup_type: PopupType, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            popup_type,
            title: title.into(),
            content: content.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}
