//! Metric and dimension catalogs backing the correction pickers.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetricEntry {
    pub id: String,
    pub name: String,
}

impl MetricEntry {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Searchable list of canonical metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricCatalog {
    entries: Vec<MetricEntry>,
}

impl MetricCatalog {
    pub fn new(entries: Vec<MetricEntry>) -> Self {
        Self { entries }
    }

    /// Entries whose name contains `query` (case-insensitive) or whose id
    /// contains it. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&MetricEntry> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.name.to_lowercase().contains(&needle)
                    || entry.id.contains(&needle)
            })
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&MetricEntry> {
        let id = id.trim();
        self.entries.iter().find(|entry| entry.id == id)
    }
}

/// Dimensions a constraint or group-by correction may name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionCatalog {
    names: Vec<String>,
}

impl DimensionCatalog {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.names.iter().any(|known| known == name)
    }
}

/// Pickers available while correcting parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub metrics: MetricCatalog,
    pub dimensions: DimensionCatalog,
}

impl Catalog {
    pub fn new(metrics: MetricCatalog, dimensions: DimensionCatalog) -> Self {
        Self {
            metrics,
            dimensions,
        }
    }
}

pub fn default_metrics() -> Vec<MetricEntry> {
    vec![
        MetricEntry::new("61535", "总新签佣金"),
        MetricEntry::new("61536", "总新签单量"),
        MetricEntry::new("61537", "总新签GTV"),
        MetricEntry::new("61538", "新房认购套均佣金"),
        MetricEntry::new("61539", "应收佣金打折率"),
    ]
}

pub fn default_dimensions() -> Vec<String> {
    ["业绩城市", "大区", "子品牌", "业务类型", "月份", "季度", "年份"]
        .into_iter()
        .map(str::to_string)
        .collect()
}
