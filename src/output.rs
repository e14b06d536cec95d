//! Output types for React frontend consumption.
//!
//! These structs are serialized to JSON and sent to the frontend, which
//! keys bubbles by member id and walks the tree with its own tree layout.

use serde::Serialize;

use crate::error::LayoutError;
use crate::hierarchy::HierarchyNode;
use crate::layout::{Bubble, BubbleLink, Placement};
use crate::roster::{marker_radius, Team};

/// A placed bubble, top-left anchored.
#[derive(Debug, Clone, Serialize)]
pub struct BubbleOutput {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
    pub placement: Placement,
}

impl From<&Bubble<'_>> for BubbleOutput {
    fn from(b: &Bubble<'_>) -> Self {
        Self {
            id: b.member.id.clone(),
            name: b.member.name.clone(),
            x: b.x,
            y: b.y,
            diameter: b.diameter,
            placement: b.placement,
        }
    }
}

/// One org-chart node with its rendering hints.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNodeOutput {
    pub id: String,
    pub name: String,
    pub position: String,
    pub team: Team,
    pub marker_radius: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNodeOutput>,
}

impl From<&HierarchyNode<'_>> for TreeNodeOutput {
    fn from(node: &HierarchyNode<'_>) -> Self {
        let m = node.member;
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            position: m.position.clone(),
            team: Team::classify(m),
            marker_radius: marker_radius(m),
            children: node.children.iter().map(TreeNodeOutput::from).collect(),
        }
    }
}

/// Error information for the frontend
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Machine-readable kind, e.g. "root_not_found"
    pub kind: String,
    pub message: String,
}

impl From<&LayoutError> for ErrorInfo {
    fn from(e: &LayoutError) -> Self {
        Self { kind: e.kind().to_string(), message: e.to_string() }
    }
}

/// Bubble cloud result
#[derive(Debug, Clone, Default, Serialize)]
pub struct CloudOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bubbles: Vec<BubbleOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<BubbleLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Org tree result
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<TreeNodeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl CloudOutput {
    pub fn failed(e: &LayoutError) -> Self {
        Self { error: Some(e.into()), ..Self::default() }
    }
}

impl TreeOutput {
    pub fn failed(e: &LayoutError) -> Self {
        Self { root: None, error: Some(e.into()) }
    }
}
