use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::read_json;
use crate::engine::loading::{LoadFuture, ModelLoader, ModelNode};
use crate::engine::scene::{MeshBounds, NodeKind};
use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelNodeKind {
    #[default]
    Mesh,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsDocument {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// One node of a JSON model description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub name: String,
    #[serde(default)]
    pub kind: ModelNodeKind,
    #[serde(default)]
    pub bounds: Option<BoundsDocument>,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub children: Vec<ModelDocument>,
}

impl ModelDocument {
    pub fn into_node(self) -> ModelNode {
        ModelNode {
            name: self.name,
            kind: match self.kind {
                ModelNodeKind::Mesh => NodeKind::Mesh,
                ModelNodeKind::Group => NodeKind::Group,
            },
            transform: Transform::from_translation(Vec3::from_array(self.translation)),
            bounds: self
                .bounds
                .map(|b| MeshBounds::new(Vec3::from_array(b.min), Vec3::from_array(b.max))),
            children: self.children.into_iter().map(Self::into_node).collect(),
        }
    }
}

/// Reads JSON model descriptions located under the runtime asset path.
#[derive(Debug, Default)]
pub struct JsonModelLoader {
    runtime_asset_path: String,
}

impl JsonModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runtime_asset_path(&self) -> &str {
        &self.runtime_asset_path
    }

    /// Absolute paths and URLs with a scheme are used as given; anything
    /// else is looked up under the runtime asset path.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') || url.contains("://") {
            url.to_string()
        } else {
            format!("{}{}", self.runtime_asset_path, url)
        }
    }

    fn read(&self, url: &str) -> Result<ModelNode, LoadError> {
        let path = self.resolve(url);
        let document: ModelDocument = read_json(&path)?;
        Ok(document.into_node())
    }
}

impl ModelLoader for JsonModelLoader {
    fn set_runtime_asset_path(&mut self, path: &str) {
        self.runtime_asset_path = path.to_string();
    }

    fn load(&mut self, url: &str) -> LoadFuture<ModelNode> {
        Box::pin(futures::future::ready(self.read(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_converts_to_node_tree() {
        let document: ModelDocument = serde_json::from_str(
            r#"{
                "name": "pavilion",
                "bounds": { "min": [-1, 0, -1], "max": [1, 2, 1] },
                "translation": [3, 0, 0],
                "children": [
                    { "name": "roof", "kind": "group" },
                    { "name": "column", "bounds": { "min": [0, 0, 0], "max": [0.2, 2, 0.2] } }
                ]
            }"#,
        )
        .unwrap();

        let node = document.into_node();
        assert_eq!(node.kind, NodeKind::Mesh);
        assert_eq!(node.transform.translation, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(node.bounds.unwrap().max, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(node.children[0].kind, NodeKind::Group);
        assert!(node.children[0].bounds.is_none());
        assert_eq!(node.children[1].name, "column");
    }

    #[test]
    fn paths_are_relative_to_the_runtime_asset_path() {
        let mut loader = JsonModelLoader::new();
        loader.set_runtime_asset_path("./no-such-dir/");
        let result = futures::FutureExt::now_or_never(loader.load("model.json"));
        match result {
            Some(Err(LoadError::NotFound(path))) => assert_eq!(path, "./no-such-dir/model.json"),
            other => panic!("unexpected result: {:?}", other.map(|r| r.is_ok())),
        }
    }

    #[test]
    fn absolute_paths_ignore_the_runtime_asset_path() {
        let mut loader = JsonModelLoader::new();
        loader.set_runtime_asset_path("./assets/");
        assert_eq!(loader.resolve("/data/x.json"), "/data/x.json");
        assert_eq!(loader.resolve("file:///data/x.json"), "file:///data/x.json");
        assert_eq!(loader.resolve("models/x.json"), "./assets/models/x.json");

        let result = futures::FutureExt::now_or_never(loader.load("/no-such-dir/x.json"));
        match result {
            Some(Err(LoadError::NotFound(path))) => assert_eq!(path, "/no-such-dir/x.json"),
            other => panic!("unexpected result: {:?}", other.map(|r| r.is_ok())),
        }
    }
}
