//! JSON tree fixtures.
//!
//! ```json
//! {
//!   "nodes": [{ "path": "/", "type": "Root" }, { "path": "/docs", "type": "Folder" }],
//!   "references": [{ "source": "/docs", "target": "/", "reftype": "parent", "source_integrity": true }]
//! }
//! ```
//!
//! Nodes are added in fixture order. Parents need not exist. Reference types
//! are identified by name and integrity flags together.

use std::fs;
use std::path::Path;

use anyhow::Context;
use omap_core::{
    AddOptions, ObjectId, ObjectMap, ObjectMapConfig, ObjectPath, ReferenceType, Resource,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub nodes: Vec<FixtureNode>,
    #[serde(default)]
    pub references: Vec<FixtureReference>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureNode {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip)]
    oid: Option<ObjectId>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureReference {
    pub source: String,
    pub target: String,
    pub reftype: String,
    #[serde(default)]
    pub source_integrity: bool,
    #[serde(default)]
    pub target_integrity: bool,
}

impl FixtureReference {
    fn reftype(&self) -> ReferenceType {
        let mut reftype = ReferenceType::new(self.reftype.as_str());
        if self.source_integrity {
            reftype = reftype.with_source_integrity();
        }
        if self.target_integrity {
            reftype = reftype.with_target_integrity();
        }
        reftype
    }
}

impl Resource for FixtureNode {
    fn oid(&self) -> Option<ObjectId> {
        self.oid
    }

    fn set_oid(&mut self, oid: ObjectId) {
        self.oid = Some(oid);
    }

    fn path(&self) -> Option<ObjectPath> {
        ObjectPath::parse(&self.path).ok()
    }

    fn type_name(&self) -> &str {
        &self.kind
    }
}

impl Fixture {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("parsing fixture JSON")
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading fixture {}", path.display()))
    }

    /// Build an object map holding every node and reference of the fixture.
    pub fn build(mut self, config: ObjectMapConfig) -> anyhow::Result<ObjectMap> {
        let mut map = ObjectMap::with_config(config);
        for node in &mut self.nodes {
            let path = parse_path(&node.path)?;
            map.add(node, &path, AddOptions::default())
                .with_context(|| format!("adding node {path}"))?;
        }
        for reference in &self.references {
            let source = parse_path(&reference.source)?;
            let target = parse_path(&reference.target)?;
            let reftype = reference.reftype();
            map.connect(&source, &target, &reftype)
                .with_context(|| format!("connecting {source} -> {target} ({reftype})"))?;
        }
        debug!(
            nodes = map.len(),
            reftypes = map.get_reftypes().count(),
            "built object map from fixture"
        );
        Ok(map)
    }
}

pub fn parse_path(raw: &str) -> anyhow::Result<ObjectPath> {
    ObjectPath::parse(raw).with_context(|| format!("invalid path {raw:?}"))
}

pub fn read_config(path: Option<&Path>) -> anyhow::Result<ObjectMapConfig> {
    let Some(path) = path else {
        return Ok(ObjectMapConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Ok(ObjectMapConfig::from_toml_str(&text)?)
}

#[cfg(test)]
pub(crate) const SAMPLE: &str = r#"{
    "nodes": [
        { "path": "/", "type": "Root" },
        { "path": "/docs", "type": "Folder" },
        { "path": "/docs/a", "type": "Document" },
        { "path": "/docs/b", "type": "Document" }
    ],
    "references": [
        { "source": "/docs/a", "target": "/docs/b", "reftype": "cites" },
        { "source": "/docs/b", "target": "/", "reftype": "owner", "source_integrity": true }
    ]
}"#;
