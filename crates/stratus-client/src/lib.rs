//! Client for the Stratus DevOps API.
//!
//! [`DevopsApi`] is the seam between the typed models and the transport.
//! [`HttpClient`] implements it over HTTPS; [`CompositeOperations`] layers
//! action-and-wait calls on top of any implementation.

pub mod api;
pub mod composite;
pub mod http;
pub mod paginate;
pub mod response;

pub use api::{DevopsApi, ListProjectsRequest};
pub use composite::{ActionOutcome, CompositeError, CompositeOperations, CompositeResult, OperationPlan, PollTarget};
pub use http::HttpClient;
pub use paginate::list_all_projects;
pub use response::{ApiResponse, RequestOptions, ResponseHeaders};
