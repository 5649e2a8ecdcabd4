use crate::client::ReadingError;
use crate::models::{ReadingRequest, ReadingResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can turn birth data into planet positions.
/// The HTTP client is the production source; tests substitute their own.
#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Issue exactly one request for `request`
    async fn fetch_reading(
        &self,
        request: &ReadingRequest,
    ) -> Result<ReadingResult, ReadingError>;

    fn source_name(&self) -> &'static str;
}

#[async_trait]
impl<T: ReadingSource + ?Sized> ReadingSource for Arc<T> {
    async fn fetch_reading(
        &self,
        request: &ReadingRequest,
    ) -> Result<ReadingResult, ReadingError> {
        (**self).fetch_reading(request).await
    }

    fn source_name(&self) -> &'static str {
        (**self).source_name()
    }
}
