//! Named layouts - saved aggregates of panel configs

use serde::{Deserialize, Serialize};

use super::panel::PanelConfig;

/// A saved arrangement of panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

impl Layout {
    /// Build a layout id from its display name ("My Layout" -> "my-layout")
    pub fn id_for_name(name: &str) -> String {
        let slug: String = name
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let slug = slug.trim_matches('-').to_string();
        if slug.is_empty() {
            "layout".to_string()
        } else {
            slug
        }
    }
}
