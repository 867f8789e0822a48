//! Panel configuration - the canonical, persisted description of one panel

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size, SizeLimits};

/// Stable unique identifier of a panel
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Content-kind tag of a panel (e.g. "notes", "dice", "reference")
///
/// Tags are resolved through the content registry, which rejects unknown
/// kinds when a panel is created rather than when its content loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelType(pub String);

impl PanelType {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

fn default_true() -> bool {
    true
}

fn default_size() -> Size {
    Size::new(400.0, 300.0)
}

/// Canonical panel description owned by the layout store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfig {
    pub id: PanelId,
    #[serde(rename = "type")]
    pub panel_type: PanelType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default = "default_size")]
    pub size: Size,
    #[serde(default)]
    pub z_index: i64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(default = "default_true")]
    pub draggable: bool,
    #[serde(default = "default_true")]
    pub closable: bool,
    #[serde(default = "default_true")]
    pub collapsible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<Size>,
    /// Opaque payload owned by the panel's content
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl PanelConfig {
    pub fn new(id: impl Into<PanelId>, panel_type: impl Into<PanelType>) -> Self {
        let panel_type = panel_type.into();
        Self {
            id: id.into(),
            title: panel_type.to_string(),
            panel_type,
            position: Point::new(100.0, 100.0),
            size: default_size(),
            z_index: 0,
            visible: true,
            resizable: true,
            draggable: true,
            closable: true,
            collapsible: true,
            min_size: None,
            max_size: None,
            settings: serde_json::Value::Null,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_limits(mut self, min: Option<Size>, max: Option<Size>) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    pub fn limits(&self) -> SizeLimits {
        SizeLimits::new(self.min_size, self.max_size)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Bring the config back inside its invariants: finite geometry and a
    /// size within the declared limits
    pub fn normalized(mut self) -> Self {
        if !self.position.is_finite() {
            self.position = Point::default();
        }
        if !self.size.is_finite() {
            self.size = default_size();
        }
        self.size = self.limits().clamp(self.size);
        self
    }
}

impl From<String> for PanelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Partial update merged into an existing [`PanelConfig`]
///
/// Every field is optional; absent fields leave the config untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelUpdate {
    pub title: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub z_index: Option<i64>,
    pub visible: Option<bool>,
    pub resizable: Option<bool>,
    pub draggable: Option<bool>,
    pub closable: Option<bool>,
    pub collapsible: Option<bool>,
    pub settings: Option<serde_json::Value>,
}

impl PanelUpdate {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn geometry(position: Point, size: Size) -> Self {
        Self {
            position: Some(position),
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn z_index(z_index: i64) -> Self {
        Self {
            z_index: Some(z_index),
            ..Default::default()
        }
    }

    pub fn interaction(draggable: bool, resizable: bool) -> Self {
        Self {
            draggable: Some(draggable),
            resizable: Some(resizable),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// An update is malformed when it carries non-finite geometry
    pub fn is_well_formed(&self) -> bool {
        self.position.map_or(true, |p| p.is_finite())
            && self
                .size
                .map_or(true, |s| s.is_finite() && s.width >= 0.0 && s.height >= 0.0)
    }
}
