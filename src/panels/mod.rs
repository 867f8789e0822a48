//! Built-in panel types
//!
//! ## Available Panels
//!
//! - **notes**: session notes
//! - **dice**: dice roller
//! - **reference**: rules reference browser
//!
//! All three mount [`PlaceholderContent`] until their real content is
//! plugged in through the registry.

mod placeholder;

pub use placeholder::PlaceholderContent;

use crate::geometry::Size;
use crate::panel::{ContentRegistry, PanelContent, PanelDescriptor, RegistryError};

struct Builtin {
    panel_type: &'static str,
    title: &'static str,
    default_size: (f64, f64),
    min_size: Option<(f64, f64)>,
    message: &'static str,
}

const BUILTINS: [Builtin; 3] = [
    Builtin {
        panel_type: "notes",
        title: "Notes",
        default_size: (400.0, 300.0),
        min_size: Some((200.0, 150.0)),
        message: "No notes yet.",
    },
    Builtin {
        panel_type: "dice",
        title: "Dice Roller",
        default_size: (320.0, 240.0),
        min_size: Some((160.0, 120.0)),
        message: "Pick dice to roll.",
    },
    Builtin {
        panel_type: "reference",
        title: "Reference",
        default_size: (480.0, 360.0),
        min_size: None,
        message: "Search the reference library.",
    },
];

/// Panel types registered by [`register_builtin`]
pub fn builtin_types() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|b| b.panel_type)
}

/// Register every built-in panel type
pub fn register_builtin(registry: &mut ContentRegistry) -> Result<(), RegistryError> {
    for builtin in &BUILTINS {
        let (w, h) = builtin.default_size;
        let descriptor = PanelDescriptor::new(builtin.panel_type, builtin.title)
            .with_default_size(w, h)
            .with_limits(builtin.min_size.map(|(w, h)| Size::new(w, h)), None);
        let message = builtin.message;
        registry.register(descriptor, move |config| {
            Ok(Box::new(PlaceholderContent::for_panel(config, message)) as Box<dyn PanelContent>)
        })?;
    }
    Ok(())
}

/// Registry holding just the built-in types
pub fn builtin_registry() -> Result<ContentRegistry, RegistryError> {
    let mut registry = ContentRegistry::new();
    register_builtin(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_register_once() {
        let mut registry = builtin_registry().unwrap();
        assert_eq!(registry.types().count(), 3);
        assert!(matches!(
            register_builtin(&mut registry),
            Err(RegistryError::Duplicate(_))
        ));
        let notes = registry.descriptor(&"notes".into()).unwrap();
        assert_eq!(notes.default_size, Some(Size::new(400.0, 300.0)));
    }
}
