//! GET+Hash Prober (C5, spec.md §4.5): downloads a resource's body while
//! streaming it through an MD5 hash, validates the declared format against
//! the observed mimetype/signature/size, and (for XLSX workbooks not on the
//! ignore list) re-hashes the parsed worksheet rows for a content-stable
//! digest.

use crate::events::ProbeEvent;
use crate::xlsx::{hex_encode, xlsx_canonical_digest};
use futures::StreamExt;
use hdx_sweep_core::events::{EventListener, EventListeners};
use hdx_sweep_core::format::{
    expected_mimetypes, expected_signatures, IGNORE_MIMETYPES, MAX_HASHABLE_BYTES, XLSX_MIMETYPE,
    ZIP_SIGNATURE,
};
use hdx_sweep_core::{ProbeOutcome, ResourceRecord, Status};
use hdx_sweep_retry::{Failure, RetryPolicy};
use hdx_sweep_scheduler::HostScheduler;
use md5::{Digest, Md5};
use std::sync::Arc;

pub struct GetProber {
    client: reqwest::Client,
    scheduler: Arc<HostScheduler>,
    retry: RetryPolicy,
    /// Substring that, when present in a URL, suppresses the XLSX canonical
    /// digest special case (spec.md §4.5 step 5).
    xlsx_url_ignore: Option<String>,
    listeners: EventListeners<ProbeEvent>,
}

impl GetProber {
    pub fn new(
        client: reqwest::Client,
        scheduler: Arc<HostScheduler>,
        retry: RetryPolicy,
        xlsx_url_ignore: Option<String>,
    ) -> Self {
        Self {
            client,
            scheduler,
            retry,
            xlsx_url_ignore,
            listeners: EventListeners::new(),
        }
    }

    pub fn with_listener<L: EventListener<ProbeEvent> + 'static>(mut self, listener: L) -> Self {
        self.listeners.add(listener);
        self
    }

    /// Probes one resource with `GET`, streaming and hashing its body. Like
    /// [`crate::head::HeadProber::probe`], never returns an `Err`.
    pub async fn probe(&self, record: &ResourceRecord) -> ProbeOutcome {
        let netloc = record
            .netloc()
            .expect("resource table only admits records with a parseable netloc");

        let _permit = self.scheduler.acquire(&netloc).await;

        let result = self.retry.run(|_attempt| self.do_get(record)).await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(Failure::Http(code)) => ProbeOutcome::failed(Status::Http(code)),
            Err(Failure::Transport) => ProbeOutcome::failed(Status::TransportFailure),
        };

        self.listeners.emit(&ProbeEvent::GetCompleted {
            resource_id: record.resource_id.clone(),
            status: outcome.status,
        });
        outcome
    }

    async fn do_get(&self, record: &ResourceRecord) -> Result<ProbeOutcome, Failure> {
        let response = self
            .client
            .get(record.url.clone())
            .send()
            .await
            .map_err(|_| Failure::Transport)?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(Failure::Http(status.as_u16()));
        }

        let content_length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let last_modified = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_default();
        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // ETag short-circuit (spec.md §4.5 step 2): the catalog treats ETag
        // as an acceptable content identifier, so the body is never read.
        if let Some(etag) = etag {
            return Ok(ProbeOutcome {
                size: content_length,
                last_modified,
                digest: Some(etag),
                status: Status::Http(200),
            });
        }

        // Too-large-to-hash (spec.md §4.5 step 3): only reachable without an
        // ETag, since the ETag branch above already returned.
        if content_length.map(|len| len > MAX_HASHABLE_BYTES).unwrap_or(false) {
            return Ok(ProbeOutcome {
                size: content_length,
                last_modified,
                digest: None,
                status: Status::TooLarge,
            });
        }

        let wants_xlsx_buffer = record.format == "xlsx"
            && is_xlsx_mimetype(&content_type)
            && self
                .xlsx_url_ignore
                .as_deref()
                .map(|ignore| !record.url.as_str().contains(ignore))
                .unwrap_or(true);

        let mut stream = response.bytes_stream();
        let mut hasher = Md5::new();
        let mut byte_count: u64 = 0;
        let mut signature: Vec<u8> = Vec::new();
        let mut xlsx_buffer: Option<Vec<u8>> = None;
        let mut first_chunk = true;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|_| Failure::Transport)?;
            if first_chunk {
                signature = chunk.iter().take(4).copied().collect();
                if wants_xlsx_buffer && signature == ZIP_SIGNATURE {
                    xlsx_buffer = Some(Vec::new());
                }
                first_chunk = false;
            }
            hasher.update(&chunk);
            byte_count += chunk.len() as u64;
            if let Some(buffer) = xlsx_buffer.as_mut() {
                buffer.extend_from_slice(&chunk);
            }
        }

        let digest = match xlsx_buffer {
            Some(buffer) => xlsx_canonical_digest(&buffer).map_err(|_| Failure::Transport)?,
            None => hex_encode(&hasher.finalize()),
        };

        let status = validate(&record.format, &content_type, &signature, content_length, byte_count);

        Ok(ProbeOutcome {
            size: content_length.or(Some(byte_count)),
            last_modified,
            digest: Some(digest),
            status,
        })
    }
}

fn is_xlsx_mimetype(content_type: &str) -> bool {
    content_type == XLSX_MIMETYPE || IGNORE_MIMETYPES.contains(&content_type)
}

/// Post-stream validation precedence (spec.md §4.5 steps 6-8): mimetype,
/// then signature, then declared-vs-observed size. The first mismatch wins.
fn validate(
    format: &str,
    content_type: &str,
    signature: &[u8],
    content_length: Option<u64>,
    byte_count: u64,
) -> Status {
    if !IGNORE_MIMETYPES.contains(&content_type) {
        if let Some(expected) = expected_mimetypes(format) {
            if !expected.iter().any(|m| content_type.contains(m)) {
                return Status::MimetypeMismatch;
            }
        }
    }

    if let Some(expected) = expected_signatures(format) {
        let matches = expected
            .iter()
            .any(|sig| signature.len() >= sig.len() && &signature[..sig.len()] == *sig);
        if !matches {
            return Status::SignatureMismatch;
        }
    }

    if let Some(declared) = content_length {
        if declared != byte_count {
            return Status::SizeMismatch;
        }
    }

    Status::Success
}
