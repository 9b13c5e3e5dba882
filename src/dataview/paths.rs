//! URL templates for the Dataviews API
//!
//! ```text
//! {api_root}/Tenants/{tenant}/Namespaces/{namespace}/Dataviews
//!     /{dataview}
//!         /Datagroups[/{datagroup}]
//!         /preview/interpolated
//!         /data/interpolated
//! ```

use std::borrow::Cow;

/// Percent-encode one path segment
fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Dataview URL family for one tenant
///
/// The tenant prefix is fixed when the value is built; each method only
/// substitutes the per-call segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataviewPaths {
    namespaces: String,
}

impl DataviewPaths {
    pub fn new(api_root: &str, tenant_id: &str) -> Self {
        Self {
            namespaces: format!(
                "{}/Tenants/{}/Namespaces",
                api_root.trim_end_matches('/'),
                segment(tenant_id)
            ),
        }
    }

    /// `.../Namespaces/{namespace}/Dataviews`
    pub fn dataviews(&self, namespace_id: &str) -> String {
        format!("{}/{}/Dataviews", self.namespaces, segment(namespace_id))
    }

    /// `.../Dataviews/{dataview}`
    pub fn dataview(&self, namespace_id: &str, dataview_id: &str) -> String {
        format!("{}/{}", self.dataviews(namespace_id), segment(dataview_id))
    }

    /// `.../Dataviews/{dataview}/Datagroups`
    pub fn datagroups(&self, namespace_id: &str, dataview_id: &str) -> String {
        format!("{}/Datagroups", self.dataview(namespace_id, dataview_id))
    }

    /// `.../Dataviews/{dataview}/Datagroups/{datagroup}`
    pub fn datagroup(&self, namespace_id: &str, dataview_id: &str, datagroup_id: &str) -> String {
        format!(
            "{}/{}",
            self.datagroups(namespace_id, dataview_id),
            segment(datagroup_id)
        )
    }

    /// `.../Dataviews/{dataview}/preview/interpolated`
    pub fn preview_interpolated(&self, namespace_id: &str, dataview_id: &str) -> String {
        format!("{}/preview/interpolated", self.dataview(namespace_id, dataview_id))
    }

    /// `.../Dataviews/{dataview}/data/interpolated`
    pub fn data_interpolated(&self, namespace_id: &str, dataview_id: &str) -> String {
        format!("{}/data/interpolated", self.dataview(namespace_id, dataview_id))
    }
}
