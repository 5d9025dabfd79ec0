//! HEAD Prober (C4, spec.md §4.4): issues a `HEAD` request per resource
//! through the host scheduler and retry policy, producing a [`ProbeOutcome`]
//! the decision engine's pass 1 can reconcile against stored metadata.

use crate::events::ProbeEvent;
use hdx_sweep_core::events::{EventListener, EventListeners};
use hdx_sweep_core::{ProbeOutcome, ResourceRecord, Status};
use hdx_sweep_retry::{Failure, RetryPolicy};
use hdx_sweep_scheduler::HostScheduler;
use std::sync::Arc;

pub struct HeadProber {
    client: reqwest::Client,
    scheduler: Arc<HostScheduler>,
    retry: RetryPolicy,
    listeners: EventListeners<ProbeEvent>,
}

impl HeadProber {
    pub fn new(client: reqwest::Client, scheduler: Arc<HostScheduler>, retry: RetryPolicy) -> Self {
        Self {
            client,
            scheduler,
            retry,
            listeners: EventListeners::new(),
        }
    }

    pub fn with_listener<L: EventListener<ProbeEvent> + 'static>(mut self, listener: L) -> Self {
        self.listeners.add(listener);
        self
    }

    /// Probes one resource with `HEAD`, honoring the host's rate/concurrency
    /// budget and the retry policy. Never returns an `Err`: a transport
    /// failure or an exhausted retry both become a [`Status`]-carrying
    /// outcome, per spec.md §7's "the decision engine never raises" policy.
    pub async fn probe(&self, record: &ResourceRecord) -> ProbeOutcome {
        let netloc = record
            .netloc()
            .expect("resource table only admits records with a parseable netloc");

        let _permit = self.scheduler.acquire(&netloc).await;

        let result = self
            .retry
            .run(|_attempt| self.do_head(record.url.as_str()))
            .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(Failure::Http(code)) => ProbeOutcome::failed(Status::Http(code)),
            Err(Failure::Transport) => ProbeOutcome::failed(Status::TransportFailure),
        };

        self.listeners.emit(&ProbeEvent::HeadCompleted {
            resource_id: record.resource_id.clone(),
            status: outcome.status,
        });
        outcome
    }

    async fn do_head(&self, url: &str) -> Result<ProbeOutcome, Failure> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|_| Failure::Transport)?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(Failure::Http(status.as_u16()));
        }

        let size = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let last_modified = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ProbeOutcome {
            size,
            last_modified,
            digest: etag,
            status: Status::Http(200),
        })
    }
}
