//! Panel content providers and the typed registry that builds them
//!
//! Every panel type is registered up front with a descriptor and a factory.
//! Registration validates the descriptor, so an unknown or malformed type is
//! reported when the desktop is set up, and `create_panel` can reject an
//! unknown type before anything is dispatched.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::geometry::Size;
use crate::model::{PanelConfig, PanelType};

use super::element::ContentSlot;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    #[error("no content registered for panel type `{0}`")]
    UnknownType(PanelType),
    #[error("failed to load `{panel_type}` content: {message}")]
    Load {
        panel_type: PanelType,
        message: String,
    },
    #[error("failed to mount content: {0}")]
    Mount(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("panel type must not be empty")]
    EmptyType,
    #[error("panel type `{0}` is already registered")]
    Duplicate(PanelType),
    #[error("panel type `{panel_type}` declares an invalid {what}")]
    InvalidSize {
        panel_type: PanelType,
        what: &'static str,
    },
}

/// A mountable unit of panel content
pub trait PanelContent {
    fn mount(&mut self, slot: &mut ContentSlot) -> Result<(), ContentError>;
    fn unmount(&mut self, slot: &mut ContentSlot);
}

/// Builds content for one panel
pub type ContentFactory = Rc<dyn Fn(&PanelConfig) -> Result<Box<dyn PanelContent>, ContentError>>;

/// Static facts about a panel type
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDescriptor {
    pub panel_type: PanelType,
    /// Title given to new panels of this type
    pub title: String,
    pub default_size: Option<Size>,
    pub min_size: Option<Size>,
    pub max_size: Option<Size>,
}

impl PanelDescriptor {
    pub fn new(panel_type: impl Into<PanelType>, title: impl Into<String>) -> Self {
        Self {
            panel_type: panel_type.into(),
            title: title.into(),
            default_size: None,
            min_size: None,
            max_size: None,
        }
    }

    pub fn with_default_size(mut self, width: f64, height: f64) -> Self {
        self.default_size = Some(Size::new(width, height));
        self
    }

    pub fn with_limits(mut self, min: Option<Size>, max: Option<Size>) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.panel_type.as_str().trim().is_empty() {
            return Err(RegistryError::EmptyType);
        }
        let valid = |s: &Option<Size>| {
            s.map_or(true, |s| s.is_finite() && s.width > 0.0 && s.height > 0.0)
        };
        for (size, what) in [
            (&self.default_size, "default size"),
            (&self.min_size, "minimum size"),
            (&self.max_size, "maximum size"),
        ] {
            if !valid(size) {
                return Err(RegistryError::InvalidSize {
                    panel_type: self.panel_type.clone(),
                    what,
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if max.width < min.width || max.height < min.height {
                return Err(RegistryError::InvalidSize {
                    panel_type: self.panel_type.clone(),
                    what: "size range",
                });
            }
        }
        Ok(())
    }
}

struct Entry {
    descriptor: PanelDescriptor,
    factory: ContentFactory,
}

/// Panel type -> descriptor and content factory
#[derive(Default)]
pub struct ContentRegistry {
    entries: BTreeMap<PanelType, Entry>,
}

impl fmt::Debug for ContentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRegistry")
            .field("types", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        descriptor: PanelDescriptor,
        factory: impl Fn(&PanelConfig) -> Result<Box<dyn PanelContent>, ContentError> + 'static,
    ) -> Result<(), RegistryError> {
        descriptor.validate()?;
        if self.entries.contains_key(&descriptor.panel_type) {
            return Err(RegistryError::Duplicate(descriptor.panel_type));
        }
        tracing::debug!(target: "panel", panel_type = %descriptor.panel_type, "registered content");
        self.entries.insert(
            descriptor.panel_type.clone(),
            Entry {
                descriptor,
                factory: Rc::new(factory),
            },
        );
        Ok(())
    }

    pub fn contains(&self, panel_type: &PanelType) -> bool {
        self.entries.contains_key(panel_type)
    }

    pub fn descriptor(&self, panel_type: &PanelType) -> Option<&PanelDescriptor> {
        self.entries.get(panel_type).map(|e| &e.descriptor)
    }

    pub fn types(&self) -> impl Iterator<Item = &PanelType> {
        self.entries.keys()
    }

    /// Factory for `panel_type`, for deferred construction
    pub fn factory(&self, panel_type: &PanelType) -> Option<ContentFactory> {
        self.entries.get(panel_type).map(|e| e.factory.clone())
    }

    pub fn create(&self, config: &PanelConfig) -> Result<Box<dyn PanelContent>, ContentError> {
        let factory = self
            .factory(&config.panel_type)
            .ok_or_else(|| ContentError::UnknownType(config.panel_type.clone()))?;
        factory(config)
    }
}

/// Content that was built outside the registry and handed to the panel
pub struct StaticContent {
    lines: Vec<String>,
}

impl StaticContent {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl PanelContent for StaticContent {
    fn mount(&mut self, slot: &mut ContentSlot) -> Result<(), ContentError> {
        slot.set_lines(self.lines.clone());
        Ok(())
    }

    fn unmount(&mut self, slot: &mut ContentSlot) {
        slot.clear();
    }
}
