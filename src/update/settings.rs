//! Settings handlers

use crate::messages::Action;
use crate::model::AppSettings;

pub fn update_settings(settings: &mut AppSettings, action: &Action) {
    match action {
        Action::UpdateSettings(update) => settings.apply(update),
        Action::SetTheme(theme) => settings.theme = *theme,
        Action::ResetSettings => *settings = AppSettings::default(),
        _ => {}
    }
}
