//! Export artifact: the whole store as one self-describing JSON document

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Counters, Sample};
use crate::constants::EXPORT_SCHEMA_VERSION;
use crate::logic::features::{LayoutInfo, FEATURE_COUNT};
use crate::logic::labeling::LABELING_SCHEME;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlMeta {
    pub enabled: bool,
    pub threshold: f32,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAlertMeta {
    pub enabled: bool,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub feature_dim: usize,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_names: Vec<String>,
    pub labeling: String,
    pub ml: MlMeta,
    pub page_alert: PageAlertMeta,
}

impl ExportMeta {
    pub fn new(ml_enabled: bool, threshold: f32, page_alert_enabled: bool) -> Self {
        let layout = LayoutInfo::current();
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            feature_dim: FEATURE_COUNT,
            feature_version: layout.feature_version,
            layout_hash: layout.layout_hash,
            feature_names: layout.feature_names,
            labeling: LABELING_SCHEME.to_string(),
            ml: MlMeta {
                enabled: ml_enabled,
                threshold,
                note: "externalScore/externalLabel added per sample when available".to_string(),
            },
            page_alert: PageAlertMeta {
                enabled: page_alert_enabled,
                note: "relay notified when externalLabel = 1".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub meta: ExportMeta,
    pub stats: Counters,
    pub data: Vec<Sample>,
}

impl ExportArtifact {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// `traffic_features_{unix_millis}.json`
    pub fn file_name(&self) -> String {
        format!("traffic_features_{}.json", self.meta.exported_at.timestamp_millis())
    }

    /// Write into `dir` and return the file path
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let json = self
            .to_json_pretty()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&path, json)?;

        log::info!("Exported {} samples to {}", self.data.len(), path.display());
        Ok(path)
    }
}
