//! Placeholder content for panel types whose real content lives elsewhere
//!
//! Shows the panel title and a short message. The message can be overridden
//! per panel through `settings.message`.

use crate::model::PanelConfig;
use crate::panel::{ContentError, ContentSlot, PanelContent};

#[derive(Debug, Clone)]
pub struct PlaceholderContent {
    title: String,
    message: String,
}

impl PlaceholderContent {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Build from a panel config, preferring its `settings.message`
    pub fn for_panel(config: &PanelConfig, fallback: &str) -> Self {
        let message = config
            .settings
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or(fallback);
        Self::new(config.title.clone(), message)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl PanelContent for PlaceholderContent {
    fn mount(&mut self, slot: &mut ContentSlot) -> Result<(), ContentError> {
        slot.set_lines(vec![self.title.clone(), String::new(), self.message.clone()]);
        Ok(())
    }

    fn unmount(&mut self, slot: &mut ContentSlot) {
        slot.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_message_wins() {
        let mut config = PanelConfig::new("notes-1", "notes").with_title("Notes");
        config.settings = serde_json::json!({ "message": "Session 3" });
        let content = PlaceholderContent::for_panel(&config, "default");
        assert_eq!(content.message(), "Session 3");

        let plain = PanelConfig::new("notes-2", "notes");
        assert_eq!(PlaceholderContent::for_panel(&plain, "default").message(), "default");
    }
}
