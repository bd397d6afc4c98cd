use anyhow::Context;
use models::{PolicySpec, PolicyStatus};
use std::path::Path;

/// Document is a loaded policy document. Documents are either a bare
/// PolicySpec, or a custom resource object having `spec` and `status` fields.
#[derive(Debug, Default, PartialEq)]
pub struct Document {
    pub spec: PolicySpec,
    pub status: Option<PolicyStatus>,
}

// Resource is the subset of a custom resource object which we read.
// Other fields (apiVersion, kind, metadata) are ignored.
#[derive(serde::Deserialize)]
struct Resource {
    spec: PolicySpec,
    #[serde(default)]
    status: Option<PolicyStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the Format of a path from its extension. YAML is the default,
    /// and as YAML is a superset of JSON it also reads most JSON documents.
    pub fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

impl Document {
    /// The spec which was last applied, if this document records one,
    /// and otherwise the document's spec.
    pub fn into_applied(self) -> PolicySpec {
        match self.status {
            Some(PolicyStatus {
                applied_spec: Some(applied),
                ..
            }) => applied,
            _ => {
                tracing::warn!(
                    policy = %self.spec.name,
                    "document has no applied spec; using its spec as observed"
                );
                self.spec
            }
        }
    }
}

/// Load a Document from `path`, or from stdin if `path` is "-".
pub fn load(path: &str) -> anyhow::Result<Document> {
    let content = if path == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
    };
    parse(&content, Format::from_path(path)).with_context(|| format!("failed to parse {path}"))
}

pub fn parse(content: &str, format: Format) -> anyhow::Result<Document> {
    let doc: serde_json::Value = match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Yaml => serde_yaml::from_str(content)?,
    };

    if doc.get("spec").is_some() {
        let Resource { spec, status } = serde_json::from_value(doc)?;
        Ok(Document { spec, status })
    } else {
        Ok(Document {
            spec: serde_json::from_value(doc)?,
            status: None,
        })
    }
}
