use std::future::Future;

use crate::error::RecommendError;

/// One typed stage of a recommendation run.
///
/// Stages consume the previous stage's output by value; an error stops the run.
pub trait Step: Send + Sync {
    type Input: Send;
    type Output: Send;

    /// Stage label for log spans.
    const NAME: &'static str;

    fn run(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, RecommendError>> + Send;
}
