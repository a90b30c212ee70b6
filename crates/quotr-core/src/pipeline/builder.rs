use std::future::Future;
use std::time::Instant;

use tracing::Instrument;

use super::step::Step;
use crate::error::RecommendError;

/// A typed sequence of steps, run front to back.
pub trait Runnable: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn run(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, RecommendError>> + Send;

    /// Append the stage labels of this sequence, in run order.
    fn stages(&self, out: &mut Vec<&'static str>);
}

/// Run one step inside its own span, logging duration and failures.
async fn run_step<S: Step>(step: &S, input: S::Input) -> Result<S::Output, RecommendError> {
    let started = Instant::now();
    let span = tracing::debug_span!("step", name = S::NAME);
    let result = step.run(input).instrument(span).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &result {
        Ok(_) => tracing::debug!(step = S::NAME, elapsed_ms, "step finished"),
        Err(e) => tracing::debug!(step = S::NAME, elapsed_ms, kind = ?e.kind(), "step failed"),
    }
    result
}

pub struct Start<S>(S);

impl<S: Step> Runnable for Start<S> {
    type Input = S::Input;
    type Output = S::Output;

    async fn run(&self, input: Self::Input) -> Result<Self::Output, RecommendError> {
        run_step(&self.0, input).await
    }

    fn stages(&self, out: &mut Vec<&'static str>) {
        out.push(S::NAME);
    }
}

/// `prev` followed by `next`, whose input is `prev`'s output.
pub struct Chain<Prev, Next> {
    prev: Prev,
    next: Next,
}

impl<Prev, Next> Runnable for Chain<Prev, Next>
where
    Prev: Runnable,
    Next: Step<Input = Prev::Output>,
{
    type Input = Prev::Input;
    type Output = Next::Output;

    async fn run(&self, input: Self::Input) -> Result<Self::Output, RecommendError> {
        let carried = self.prev.run(input).await?;
        run_step(&self.next, carried).await
    }

    fn stages(&self, out: &mut Vec<&'static str>) {
        self.prev.stages(out);
        out.push(Next::NAME);
    }
}

/// Builder and runner for a step sequence: `Pipeline::start(a).step(b).step(c)`.
pub struct Pipeline<R> {
    steps: R,
}

impl Pipeline<()> {
    #[must_use]
    pub fn start<S: Step>(step: S) -> Pipeline<Start<S>> {
        Pipeline { steps: Start(step) }
    }
}

impl<R: Runnable> Pipeline<R> {
    #[must_use]
    pub fn step<T: Step<Input = R::Output>>(self, step: T) -> Pipeline<Chain<R, T>> {
        Pipeline {
            steps: Chain {
                prev: self.steps,
                next: step,
            },
        }
    }

    /// Stage labels in run order.
    #[must_use]
    pub fn stages(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.steps.stages(&mut out);
        out
    }

    /// Run every stage inside one `recommend` span.
    ///
    /// # Errors
    ///
    /// Returns the first `RecommendError` raised by a step; later steps do not run.
    pub async fn run(&self, input: R::Input) -> Result<R::Output, RecommendError> {
        let span = tracing::info_span!("recommend");
        self.steps.run(input).instrument(span).await
    }
}
