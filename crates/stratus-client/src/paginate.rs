//! Following `opc-next-page` across list calls.

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use stratus_core::{Error, Result};
use stratus_core::models::ProjectSummary;
use tracing::debug;

use crate::api::{DevopsApi, ListProjectsRequest};
use crate::response::RequestOptions;

/// Every project matching `request`, fetching pages lazily.
pub fn list_all_projects<'a, A>(
    api: &'a A,
    request: ListProjectsRequest,
    opts: RequestOptions,
) -> BoxStream<'a, Result<ProjectSummary>>
where
    A: DevopsApi + ?Sized,
{
    stream::try_unfold(Some(request), move |next| {
        let opts = opts.clone();
        async move {
            let Some(request) = next else {
                return Ok::<_, Error>(None);
            };
            let response = api.list_projects(&request, &opts).await?;
            debug!(
                items = response.data.items.len(),
                next_page = response.headers.opc_next_page.as_deref().unwrap_or("<none>"),
                "Fetched project page"
            );
            let following = response.headers.opc_next_page.map(|page| ListProjectsRequest {
                page: Some(page),
                ..request
            });
            Ok(Some((response.data.items, following)))
        }
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
    .try_flatten()
    .boxed()
}
