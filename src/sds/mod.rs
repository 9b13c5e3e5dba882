//! SDS API interaction module
//!
//! Transport and tenant context shared by every SDS resource client.
//!
//! # Module Structure
//!
//! - [`auth`] - Bearer tokens (static or OAuth2 client credentials)
//! - [`client`] - Base client: API root, tenant, headers, response checks
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use sds_dataviews::sds::{SdsClient, SdsCredentials};
//!
//! fn example() -> sds_dataviews::Result<()> {
//!     let creds = SdsCredentials::client_credentials("https://dat-b.example.com", "id", "secret");
//!     let client = SdsClient::new("https://dat-b.example.com", "v1", "my-tenant", creds)?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;

pub use auth::{CredentialSource, SdsCredentials};
pub use client::{SdsClient, DEFAULT_API_VERSION};
pub use http::{check_response, SdsHttpClient, SdsResponse};
