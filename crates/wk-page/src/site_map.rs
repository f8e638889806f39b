//! Hierarchical site map from a flat page list.
//!
//! # Architecture
//!
//! Nodes are first collected in a flat `Vec` with parent/children
//! relationships tracked by indices and a prefix index for reuse of
//! ancestors. The flat form is then assembled into an owned forest of
//! [`SiteMapNode`]s for presentation.
//!
//! Every distinct path prefix across the input gets exactly one node. A
//! prefix that is also a page name becomes a page node; any other prefix
//! becomes a virtual folder node.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::identifier::{Culture, PageName};

/// Page listing entry as supplied by the repository store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page name (culture-independent identity).
    pub page_name: String,
    /// Culture of this version, `None` for the neutral file.
    #[serde(default)]
    pub culture: Option<Culture>,
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Last modification time (Unix timestamp, seconds).
    #[serde(default)]
    pub last_modified: Option<i64>,
    /// Author of the last modification.
    #[serde(default)]
    pub last_modified_by: Option<String>,
}

impl PageRecord {
    /// Create a record with only a page name.
    #[must_use]
    pub fn new(page_name: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            culture: None,
            title: None,
            last_modified: None,
            last_modified_by: None,
        }
    }
}

/// Navigation node for one path prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SiteMapNode {
    /// Full path prefix this node stands for.
    pub page_name: String,
    /// Last segment of the prefix.
    pub display_name: String,
    /// Page title (page nodes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Culture of the record the node was populated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture: Option<Culture>,
    /// Last modification time (Unix timestamp, seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
    /// Author of the last modification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    /// Zero-based depth.
    pub level: usize,
    /// True if a page exists at exactly this prefix.
    pub has_page: bool,
    /// Child nodes in first-creation order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SiteMapNode>,
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    /// Full path prefix.
    pub page_name: String,
    /// Display name.
    pub display_name: String,
    /// Whether the ancestor is a real page (links only make sense then).
    pub has_page: bool,
}

/// Ordered forest of site map nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiteMap {
    roots: Vec<SiteMapNode>,
}

impl SiteMap {
    /// Root-level nodes.
    #[must_use]
    pub fn roots(&self) -> &[SiteMapNode] {
        &self.roots
    }

    /// Consume the map and return its root nodes.
    #[must_use]
    pub fn into_roots(self) -> Vec<SiteMapNode> {
        self.roots
    }

    /// Total number of nodes in the forest.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[SiteMapNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }

    /// Find the node for a page name.
    #[must_use]
    pub fn find(&self, page_name: &str) -> Option<&SiteMapNode> {
        self.path_to(page_name)?.pop()
    }

    /// Build breadcrumbs for a page: its ancestors, root first.
    ///
    /// Returns an empty list for root-level pages and unknown names.
    #[must_use]
    pub fn breadcrumbs(&self, page_name: &str) -> Vec<BreadcrumbItem> {
        let Some(mut path) = self.path_to(page_name) else {
            return Vec::new();
        };
        path.pop();
        path.into_iter()
            .map(|node| BreadcrumbItem {
                page_name: node.page_name.clone(),
                display_name: node.display_name.clone(),
                has_page: node.has_page,
            })
            .collect()
    }

    /// Nodes from the root down to `page_name`, inclusive.
    fn path_to(&self, page_name: &str) -> Option<Vec<&SiteMapNode>> {
        let mut path = Vec::new();
        let mut level = self.roots.as_slice();
        let mut prefix = String::new();

        for segment in page_name.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            let node = level.iter().find(|n| n.page_name == prefix)?;
            path.push(node);
            level = &node.children;
        }

        Some(path)
    }
}

/// Builder for [`SiteMap`] keeping nodes in a flat list.
struct SiteMapBuilder {
    nodes: Vec<SiteMapNode>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    prefix_index: HashMap<String, usize>,
}

impl SiteMapBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            children: Vec::new(),
            roots: Vec::new(),
            prefix_index: HashMap::new(),
        }
    }

    /// Add a node under `parent_idx` (or at root) and index it by prefix.
    fn add_node(&mut self, node: SiteMapNode, parent_idx: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.prefix_index.insert(node.page_name.clone(), idx);
        self.nodes.push(node);
        self.children.push(Vec::new());

        if let Some(parent) = parent_idx {
            self.children[parent].push(idx);
        } else {
            self.roots.push(idx);
        }

        idx
    }

    fn build(mut self) -> SiteMap {
        fn assemble(
            idx: usize,
            nodes: &mut [SiteMapNode],
            children: &[Vec<usize>],
        ) -> SiteMapNode {
            let kids = children[idx]
                .iter()
                .map(|&child| assemble(child, nodes, children))
                .collect();
            let mut node = std::mem::take(&mut nodes[idx]);
            node.children = kids;
            node
        }

        let roots = self
            .roots
            .iter()
            .map(|&root| assemble(root, &mut self.nodes, &self.children))
            .collect();
        SiteMap { roots }
    }
}

/// Pick the record a page node is populated from: the neutral version if
/// present, otherwise the first record.
fn representative<'a>(records: &[&'a PageRecord], neutral: &Culture) -> &'a PageRecord {
    records
        .iter()
        .copied()
        .find(|r| r.culture.as_ref().is_none_or(|c| c == neutral))
        .unwrap_or(records[0])
}

/// Build the site map forest from a flat page list.
///
/// Records sharing a page name (different cultures) collapse into one page
/// node. Records with invalid page names are skipped.
#[must_use]
pub fn build_site_map(pages: &[PageRecord], neutral: &Culture) -> SiteMap {
    // BTreeMap gives ordinal ordering of page names.
    let mut groups: BTreeMap<PageName, Vec<&PageRecord>> = BTreeMap::new();
    for record in pages {
        match PageName::new(record.page_name.as_str()) {
            Ok(name) => groups.entry(name).or_default().push(record),
            Err(e) => {
                tracing::warn!(
                    page = %record.page_name,
                    error = %e,
                    "Skipping invalid page record"
                );
            }
        }
    }

    let mut builder = SiteMapBuilder::new();
    for (name, records) in &groups {
        let mut parent_idx = None;
        let mut prefix = String::new();

        for (level, segment) in name.segments().enumerate() {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            if let Some(&idx) = builder.prefix_index.get(&prefix) {
                parent_idx = Some(idx);
                continue;
            }

            let node = if prefix == name.as_str() {
                let record = representative(records, neutral);
                SiteMapNode {
                    page_name: prefix.clone(),
                    display_name: segment.to_owned(),
                    title: record.title.clone(),
                    culture: record.culture.clone(),
                    last_modified: record.last_modified,
                    last_modified_by: record.last_modified_by.clone(),
                    level,
                    has_page: true,
                    children: Vec::new(),
                }
            } else {
                SiteMapNode {
                    page_name: prefix.clone(),
                    display_name: segment.to_owned(),
                    level,
                    ..SiteMapNode::default()
                }
            };
            parent_idx = Some(builder.add_node(node, parent_idx));
        }
    }

    tracing::debug!(
        page_count = groups.len(),
        node_count = builder.nodes.len(),
        "Site map built"
    );
    builder.build()
}
