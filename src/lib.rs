//! Client for the Dataviews API of the Sequential Data Store (SDS) service.
//!
//! [`sds::SdsClient`] carries the API root, tenant and credentials;
//! [`dataview::DataviewsClient`] builds on it to create, read, update and
//! delete dataviews, list their datagroups, and fetch interpolated data.

pub mod config;
pub mod dataview;
pub mod error;
pub mod sds;

pub use config::Config;
pub use dataview::{
    DataviewData, Datagroup, Dataview, DataviewsClient, Decodable, DecodeMode, InterpolatedQuery,
    Paging, PreviewQuery,
};
pub use error::{format_sds_error, Result, SdsError};
