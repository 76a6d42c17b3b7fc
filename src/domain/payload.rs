use std::fmt;

use serde::{Deserialize, Serialize};

/// Node payload used by the CLI: a label plus optional canvas placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<(i32, i32)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NodeData {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            position: None,
            color: None,
        }
    }

    /// Terminal color name used when the label is printed, e.g. `"red"`.
    pub fn colored(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    /// Euclidean distance to `other`, rounded to two decimals.
    /// `None` unless both nodes are placed.
    pub fn distance_to(&self, other: &NodeData) -> Option<f64> {
        let (x1, y1) = self.position?;
        let (x2, y2) = other.position?;
        let dx = f64::from(x2 - x1);
        let dy = f64::from(y2 - y1);
        Some(((dx * dx + dy * dy).sqrt() * 100.0).round() / 100.0)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Edge payload used by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub distance: f64,
}

impl EdgeData {
    pub fn new(distance: f64) -> Self {
        Self { distance }
    }
}

impl fmt::Display for EdgeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.distance)
    }
}
