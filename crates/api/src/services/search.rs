//! Free-text review search.

use tracing::instrument;

use shopsphere_core::{ActivityAction, ProductId};

use super::{ServiceError, activity};
use crate::models::{ClientInfo, NewActivity, Page, Pagination, Review, SearchQuery};
use crate::stores::Stores;

/// Shortest accepted query, in characters, after trimming.
pub const MIN_QUERY_LEN: usize = 2;

/// Search service.
pub struct SearchService<'a> {
    stores: &'a Stores,
}

impl<'a> SearchService<'a> {
    /// Create a search service over the given stores.
    #[must_use]
    pub const fn new(stores: &'a Stores) -> Self {
        Self { stores }
    }

    /// Relevance-ranked search over review titles and bodies.
    ///
    /// `total` counts every match regardless of the page window.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the trimmed query is shorter
    /// than [`MIN_QUERY_LEN`].
    #[instrument(skip_all, fields(product_id = ?product_id))]
    pub async fn search(
        &self,
        text: Option<&str>,
        product_id: Option<ProductId>,
        page: Pagination,
        client: &ClientInfo,
    ) -> Result<(SearchQuery, Page<Review>), ServiceError> {
        let text = text.map(str::trim).unwrap_or_default();
        if text.chars().count() < MIN_QUERY_LEN {
            return Err(ServiceError::Validation(format!(
                "Search query must be at least {MIN_QUERY_LEN} characters"
            )));
        }

        let query = SearchQuery {
            text: text.to_owned(),
            product_id,
            page,
        };
        let results = self.stores.reviews.search(&query).await?;

        let mut entry = NewActivity::new(None, ActivityAction::Search)
            .meta("query", query.text.as_str())
            .meta("total", results.total)
            .client(client);
        if let Some(product) = product_id {
            entry = entry.meta("productId", product.as_i32());
        }
        activity::record(self.stores.activity.as_ref(), entry).await;

        Ok((query, results))
    }
}
