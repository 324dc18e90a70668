//! Audit manifest: the JSON file the `audit` and `score` commands read

use crate::engine::AuditInput;
use crate::models::{PageContext, SiteDescriptor};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPage {
    pub page_id: String,
    pub url: String,
    #[serde(default)]
    pub rendered: Option<PathBuf>,
    #[serde(default, rename = "static")]
    pub static_html: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditManifest {
    pub audit_id: String,
    pub site: SiteDescriptor,
    #[serde(default)]
    pub pages: Vec<ManifestPage>,
    /// Directory HTML paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl AuditManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let mut manifest: AuditManifest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        manifest.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(manifest)
    }

    pub fn page_ids(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.page_id.clone()).collect()
    }

    fn read_html(&self, file: Option<&PathBuf>) -> Result<Option<String>> {
        let Some(file) = file else {
            return Ok(None);
        };
        let path = self.base_dir.join(file);
        let html = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(html))
    }

    /// Read every page's HTML and build the engine input
    pub fn to_input(&self) -> Result<AuditInput> {
        let pages = self
            .pages
            .iter()
            .map(|page| {
                Ok(PageContext {
                    page_id: page.page_id.clone(),
                    url: page.url.clone(),
                    rendered_html: self.read_html(page.rendered.as_ref())?,
                    static_html: self.read_html(page.static_html.as_ref())?,
                    site: self.site.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AuditInput {
            audit_id: self.audit_id.clone(),
            site: self.site.clone(),
            pages,
        })
    }
}
