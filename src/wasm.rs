//! WASM bindings for the teamviz-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Each one has a pure `*_output` counterpart that does the work and can be
//! called natively (tests, non-browser hosts).

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::LayoutError;
use crate::hierarchy::build_tree;
use crate::layout::{nearby_links, place_with, PackConfig, DEFAULT_LINK_DISTANCE};
use crate::model::Member;
use crate::output::{BubbleOutput, CloudOutput, TreeNodeOutput, TreeOutput};
use crate::roster::{self, ViewportConfig};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

fn parse_members(members_json: &str) -> Result<Vec<Member>, LayoutError> {
    Ok(serde_json::from_str(members_json)?)
}

/// Empty or whitespace-only config means defaults.
fn parse_config(config_json: &str) -> Result<PackConfig, LayoutError> {
    if config_json.trim().is_empty() {
        return Ok(PackConfig::default());
    }
    Ok(serde_json::from_str(config_json)?)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        let message = e.to_string().replace('"', "'");
        format!(r#"{{"error":{{"kind":"serialize","message":"{message}"}}}}"#)
    })
}

pub fn cloud_output(
    members_json: &str,
    width: f64,
    height: f64,
    config_json: &str,
) -> Result<CloudOutput, LayoutError> {
    let members = parse_members(members_json)?;
    let cfg = parse_config(config_json)?;
    let bubbles = place_with(&members, width, height, &cfg)?;
    Ok(CloudOutput {
        bubbles: bubbles.iter().map(BubbleOutput::from).collect(),
        links: nearby_links(&bubbles, DEFAULT_LINK_DISTANCE),
        error: None,
    })
}

pub fn tree_output(members_json: &str, root_id: &str) -> Result<TreeOutput, LayoutError> {
    let members = parse_members(members_json)?;
    let tree = build_tree(&members, root_id)?;
    Ok(TreeOutput { root: Some(TreeNodeOutput::from(&tree)), error: None })
}

pub fn category_ids(members_json: &str, category: &str) -> Result<Vec<String>, LayoutError> {
    let members = parse_members(members_json)?;
    Ok(roster::members_for_category(&members, category)
        .into_iter()
        .map(|m| m.id.clone())
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

pub fn container_output(
    viewport_width: f64,
    viewport_height: f64,
    member_count: usize,
) -> ContainerSize {
    let cfg = ViewportConfig::default();
    let (width, height) =
        roster::container_size(viewport_width, viewport_height, member_count, &cfg);
    ContainerSize { width, height }
}

/// Lay out a bubble cloud. `config_json` may be empty for defaults.
#[wasm_bindgen]
pub fn place_bubbles(members_json: &str, width: f64, height: f64, config_json: &str) -> String {
    let output = match cloud_output(members_json, width, height, config_json) {
        Ok(output) => output,
        Err(e) => {
            console_error(&format!("Error placing bubbles: {}", e));
            CloudOutput::failed(&e)
        }
    };
    to_json(&output)
}

/// Build the org tree rooted at `root_id`.
#[wasm_bindgen]
pub fn build_org_tree(members_json: &str, root_id: &str) -> String {
    let output = match tree_output(members_json, root_id) {
        Ok(output) => output,
        Err(e) => {
            console_error(&format!("Error building org tree: {}", e));
            TreeOutput::failed(&e)
        }
    };
    to_json(&output)
}

/// Ids of the members in a category tab, highest rank first.
/// Returns a JSON array of strings.
#[wasm_bindgen]
pub fn category_members(members_json: &str, category: &str) -> String {
    match category_ids(members_json, category) {
        Ok(ids) => to_json(&ids),
        Err(e) => {
            console_error(&format!("Error reading members: {}", e));
            "[]".to_string()
        }
    }
}

/// Container size for the bubble cloud, as `{ "width", "height" }`.
#[wasm_bindgen]
pub fn container_size(viewport_width: f64, viewport_height: f64, member_count: usize) -> String {
    to_json(&container_output(viewport_width, viewport_height, member_count))
}
