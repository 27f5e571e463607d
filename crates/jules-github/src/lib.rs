//! GitHub REST integration for the Jules board.
//!
//! Provides the authenticated API client, the label-backed status store, and
//! the multi-repository issue aggregator. Issue labels are the only durable
//! state this system owns; everything here either reads them or rewrites them
//! wholesale.

mod aggregator;
mod api_client;
mod error;
mod label_store;
mod payload;
mod transport;

pub use aggregator::{IssueAggregator, IssueFetchReport, RepoFetchError};
pub use api_client::{GithubApiClient, GithubApiConfig};
pub use error::GithubError;
pub use label_store::LabelStateStore;
pub use payload::{GithubIssuePayload, GithubLabel};
