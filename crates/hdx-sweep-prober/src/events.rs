//! Prober events, following the same [`hdx_sweep_core::events`] pattern as
//! `hdx_sweep_retry::events::RetryEvent`.

use hdx_sweep_core::events::SweepEvent;
use hdx_sweep_core::{ResourceId, Status};

#[derive(Debug, Clone)]
pub enum ProbeEvent {
    /// A HEAD probe completed (successfully or not).
    HeadCompleted {
        resource_id: ResourceId,
        status: Status,
    },
    /// A GET+hash probe completed.
    GetCompleted {
        resource_id: ResourceId,
        status: Status,
    },
}

impl SweepEvent for ProbeEvent {
    fn kind(&self) -> &'static str {
        match self {
            ProbeEvent::HeadCompleted { .. } => "probe_head_completed",
            ProbeEvent::GetCompleted { .. } => "probe_get_completed",
        }
    }
}
