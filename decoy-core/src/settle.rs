//! Settlement engine
//!
//! Settling takes the located entry out of the store before resolving its
//! future, so a request can be settled or popped exactly once.

use crate::deferred::ResponseFuture;
use crate::error::{HttpError, SettleError};
use crate::locator::{Selector, locate};
use crate::queue::MockQueue;
use crate::store::QueuedRequest;
use crate::types::{PendingRequest, RequestCriteria, ResponseOverrides};

impl MockQueue {
    /// Resolve the selected request with `response`, filling omitted fields
    /// from the configured defaults.
    ///
    /// Fails with [`SettleError::NoPendingRequest`] when nothing matches,
    /// unless `silent` is set.
    pub fn settle_success(
        &self,
        response: impl Into<ResponseOverrides>,
        selector: impl Into<Selector>,
        silent: bool,
    ) -> Result<(), SettleError> {
        let selector = selector.into();
        let located = locate(&mut self.store.lock(), selector);
        self.resolve_located(located, &selector.to_string(), response.into(), silent)
    }

    /// Reject the selected request with `error`, passed through unchanged.
    pub fn settle_failure(
        &self,
        error: HttpError,
        selector: impl Into<Selector>,
        silent: bool,
    ) -> Result<(), SettleError> {
        let selector = selector.into();
        let located = locate(&mut self.store.lock(), selector);
        self.reject_located(located, &selector.to_string(), error, silent)
    }

    /// Resolve the newest request matching `criteria`.
    pub fn settle_success_for(
        &self,
        criteria: &RequestCriteria,
        response: impl Into<ResponseOverrides>,
        silent: bool,
    ) -> Result<(), SettleError> {
        let located = self.take_matching(criteria);
        self.resolve_located(located, &criteria.to_string(), response.into(), silent)
    }

    /// Reject the newest request matching `criteria`.
    pub fn settle_failure_for(
        &self,
        criteria: &RequestCriteria,
        error: HttpError,
        silent: bool,
    ) -> Result<(), SettleError> {
        let located = self.take_matching(criteria);
        self.reject_located(located, &criteria.to_string(), error, silent)
    }

    /// Resolve the oldest request, using the configured silent mode.
    pub fn respond(&self, response: impl Into<ResponseOverrides>) -> Result<(), SettleError> {
        self.settle_success(response, Selector::Oldest, self.config.silent_by_default)
    }

    /// Reject the oldest request, using the configured silent mode.
    pub fn fail(&self, error: HttpError) -> Result<(), SettleError> {
        self.settle_failure(error, Selector::Oldest, self.config.silent_by_default)
    }

    /// Remove the selected request without settling it and return its future.
    pub fn pop_future(&self, selector: impl Into<Selector>) -> Option<ResponseFuture> {
        self.pop_request(selector).map(|r| r.future)
    }

    /// Remove the selected request without settling it.
    ///
    /// The request's future is abandoned and never completes.
    pub fn pop_request(&self, selector: impl Into<Selector>) -> Option<PendingRequest> {
        let entry = locate(&mut self.store.lock(), selector.into())?;
        tracing::debug!(
            entry_id = %entry.request.id,
            url = ?entry.request.url,
            "popped mock request"
        );
        Some(entry.request)
    }

    fn take_matching(&self, criteria: &RequestCriteria) -> Option<QueuedRequest> {
        let mut store = self.store.lock();
        let id = store.find_newest(|r| criteria.matches(r))?.id;
        store.remove_by_entry(id)
    }

    fn resolve_located(
        &self,
        located: Option<QueuedRequest>,
        wanted: &str,
        response: ResponseOverrides,
        silent: bool,
    ) -> Result<(), SettleError> {
        let Some(entry) = require(located, wanted, silent)? else {
            return Ok(());
        };
        let response = response.fill(&self.config.response);

        tracing::debug!(
            entry_id = %entry.request.id,
            url = ?entry.request.url,
            status = response.status,
            "resolving mock request"
        );
        entry.settler.resolve(response);
        Ok(())
    }

    fn reject_located(
        &self,
        located: Option<QueuedRequest>,
        wanted: &str,
        error: HttpError,
        silent: bool,
    ) -> Result<(), SettleError> {
        let Some(entry) = require(located, wanted, silent)? else {
            return Ok(());
        };

        tracing::debug!(
            entry_id = %entry.request.id,
            url = ?entry.request.url,
            error = error.error_code(),
            "rejecting mock request"
        );
        entry.settler.reject(error);
        Ok(())
    }
}

fn require(
    located: Option<QueuedRequest>,
    wanted: &str,
    silent: bool,
) -> Result<Option<QueuedRequest>, SettleError> {
    match located {
        Some(entry) => Ok(Some(entry)),
        None if silent => {
            tracing::debug!(selector = wanted, "no pending request to settle (silent)");
            Ok(None)
        }
        None => {
            tracing::warn!(selector = wanted, "no pending request to settle");
            Err(SettleError::NoPendingRequest {
                selector: wanted.to_string(),
            })
        }
    }
}
