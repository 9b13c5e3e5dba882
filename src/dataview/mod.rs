//! Dataviews API
//!
//! - [`client`] - [`DataviewsClient`], one method per REST operation
//! - [`models`] - [`Dataview`] and [`Datagroup`] documents, [`Decodable`]
//! - [`paths`] - URL templates for a tenant
//! - [`query`] - Paging, preview and interpolated-data parameters
//!
//! # Example
//!
//! ```ignore
//! use sds_dataviews::dataview::{Dataview, DataviewsClient, Paging};
//!
//! async fn example(client: &DataviewsClient) -> sds_dataviews::Result<()> {
//!     let created = client.create_dataview("ns1", &Dataview::new("dv1")).await?;
//!     let all = client.list_dataviews("ns1", Paging::default()).await?;
//!     client.delete_dataview("ns1", &created.id).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod models;
pub mod paths;
pub mod query;

pub use client::DataviewsClient;
pub use models::{decode_with_serde, Datagroup, Dataview, Decodable};
pub use paths::DataviewPaths;
pub use query::{
    DataviewData, DecodeMode, InterpolatedQuery, Paging, PreviewQuery, DEFAULT_COUNT, DEFAULT_SKIP,
};
