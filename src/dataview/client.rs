//! Dataviews client
//!
//! Maps the Dataviews REST API onto typed calls. Each call is one round trip
//! through the shared [`SdsClient`]; nothing is cached between calls.

use super::models::{json_kind, Datagroup, Dataview, Decodable};
use super::paths::DataviewPaths;
use super::query::{DataviewData, DecodeMode, InterpolatedQuery, Paging, PreviewQuery};
use crate::error::{require, Result, SdsError};
use crate::sds::SdsClient;
use serde_json::Value;

/// Key of the datagroup array in the list response
const DATAGROUPS_KEY: &str = "DataGroups";

/// Client for the Dataviews API
#[derive(Clone, Debug)]
pub struct DataviewsClient {
    base: SdsClient,
    paths: DataviewPaths,
}

impl DataviewsClient {
    pub fn new(base: SdsClient) -> Self {
        let paths = DataviewPaths::new(base.api_root(), base.tenant_id());
        Self { base, paths }
    }

    pub fn base(&self) -> &SdsClient {
        &self.base
    }

    pub fn paths(&self) -> &DataviewPaths {
        &self.paths
    }

    /// Create a dataview, or get the existing one if it matches
    pub async fn create_dataview(&self, namespace_id: &str, dataview: &Dataview) -> Result<Dataview> {
        require(namespace_id, "namespace_id")?;
        dataview.validate()?;

        tracing::info!("Creating dataview {} in namespace {}", dataview.id, namespace_id);

        let url = self.paths.dataview(namespace_id, &dataview.id);
        let response = self
            .base
            .post(
                &url,
                &dataview.to_json()?,
                &format!("Failed to create dataview, {}.", dataview.id),
            )
            .await?;

        if response.is_null() {
            return Ok(dataview.clone());
        }
        Dataview::decode(response)
    }

    /// Replace a dataview definition
    pub async fn update_dataview(&self, namespace_id: &str, dataview: &Dataview) -> Result<Dataview> {
        require(namespace_id, "namespace_id")?;
        dataview.validate()?;

        tracing::info!("Updating dataview {} in namespace {}", dataview.id, namespace_id);

        let url = self.paths.dataview(namespace_id, &dataview.id);
        let response = self
            .base
            .put(
                &url,
                &dataview.to_json()?,
                &format!("Failed to update dataview, {}.", dataview.id),
            )
            .await?;

        // Some deployments answer a PUT with 204 and no body
        if response.is_null() {
            return Ok(dataview.clone());
        }
        Dataview::decode(response)
    }

    pub async fn delete_dataview(&self, namespace_id: &str, dataview_id: &str) -> Result<()> {
        require(namespace_id, "namespace_id")?;
        require(dataview_id, "dataview_id")?;

        tracing::info!("Deleting dataview {} in namespace {}", dataview_id, namespace_id);

        let url = self.paths.dataview(namespace_id, dataview_id);
        self.base
            .delete(&url, &format!("Failed to delete dataview, {}.", dataview_id))
            .await
    }

    pub async fn get_dataview(&self, namespace_id: &str, dataview_id: &str) -> Result<Dataview> {
        require(namespace_id, "namespace_id")?;
        require(dataview_id, "dataview_id")?;

        let url = self.paths.dataview(namespace_id, dataview_id);
        let response = self
            .base
            .get(&url, &[], &format!("Failed to get dataview, {}.", dataview_id))
            .await?;

        Dataview::decode(response)
    }

    /// List dataviews in server order
    pub async fn list_dataviews(&self, namespace_id: &str, paging: Paging) -> Result<Vec<Dataview>> {
        require(namespace_id, "namespace_id")?;

        let url = self.paths.dataviews(namespace_id);
        let response = self
            .base
            .get(&url, &paging.params(), "Failed to get dataviews.")
            .await?;

        Vec::<Dataview>::decode(response)
    }

    /// List the datagroups of a dataview
    pub async fn list_datagroups(
        &self,
        namespace_id: &str,
        dataview_id: &str,
        paging: Paging,
    ) -> Result<Vec<Datagroup>> {
        let envelope = self
            .list_datagroups_raw(namespace_id, dataview_id, paging)
            .await?;

        match envelope {
            Value::Object(mut map) => match map.remove(DATAGROUPS_KEY) {
                Some(groups) => Vec::<Datagroup>::decode(groups),
                None => Err(SdsError::InvalidResponse(format!(
                    "Datagroup response for dataview {} has no {} field",
                    dataview_id, DATAGROUPS_KEY
                ))),
            },
            other => Err(SdsError::InvalidResponse(format!(
                "Expected a datagroup envelope object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// List the datagroups of a dataview, returning the response envelope
    /// as decoded JSON
    pub async fn list_datagroups_raw(
        &self,
        namespace_id: &str,
        dataview_id: &str,
        paging: Paging,
    ) -> Result<Value> {
        require(namespace_id, "namespace_id")?;
        require(dataview_id, "dataview_id")?;

        let url = self.paths.datagroups(namespace_id, dataview_id);
        self.base
            .get(
                &url,
                &paging.params(),
                &format!("Failed to get datagroups for dataview, {}.", dataview_id),
            )
            .await
    }

    pub async fn get_datagroup(
        &self,
        namespace_id: &str,
        dataview_id: &str,
        datagroup_id: &str,
    ) -> Result<Datagroup> {
        require(namespace_id, "namespace_id")?;
        require(dataview_id, "dataview_id")?;
        require(datagroup_id, "datagroup_id")?;

        let url = self.paths.datagroup(namespace_id, dataview_id, datagroup_id);
        let response = self
            .base
            .get(
                &url,
                &[],
                &format!(
                    "Failed to get datagroup, {}, for dataview, {}.",
                    datagroup_id, dataview_id
                ),
            )
            .await?;

        Datagroup::decode(response)
    }

    /// Preview interpolated data for a dataview
    ///
    /// With `query.form` set the body comes back as [`DataviewData::Text`].
    pub async fn get_preview<T: Decodable>(
        &self,
        namespace_id: &str,
        dataview_id: &str,
        query: &PreviewQuery,
        mode: DecodeMode,
    ) -> Result<DataviewData<T>> {
        require(namespace_id, "namespace_id")?;
        require(dataview_id, "dataview_id")?;

        let url = self.paths.preview_interpolated(namespace_id, dataview_id);
        self.fetch_data(
            &url,
            &query.params(),
            query.form.is_some(),
            mode,
            &format!("Failed to get dataview preview for dataview, {}.", dataview_id),
        )
        .await
    }

    /// Interpolated data for a dataview
    ///
    /// `query.session_id` lets the server continue a previous paged read.
    pub async fn get_interpolated<T: Decodable>(
        &self,
        namespace_id: &str,
        dataview_id: &str,
        query: &InterpolatedQuery,
        mode: DecodeMode,
    ) -> Result<DataviewData<T>> {
        require(namespace_id, "namespace_id")?;
        require(dataview_id, "dataview_id")?;

        let url = self.paths.data_interpolated(namespace_id, dataview_id);
        self.fetch_data(
            &url,
            &query.params(),
            query.form.is_some(),
            mode,
            &format!(
                "Failed to get dataview data interpolated for dataview, {}.",
                dataview_id
            ),
        )
        .await
    }

    async fn fetch_data<T: Decodable>(
        &self,
        url: &str,
        params: &[(&str, String)],
        as_text: bool,
        mode: DecodeMode,
        context: &str,
    ) -> Result<DataviewData<T>> {
        if as_text {
            let text = self.base.get_text(url, params, context).await?;
            return Ok(DataviewData::Text(text));
        }

        let content = self.base.get(url, params, context).await?;
        match mode {
            DecodeMode::Structured => Ok(DataviewData::Structured(content)),
            DecodeMode::Typed => Ok(DataviewData::Typed(T::decode(content)?)),
        }
    }
}
