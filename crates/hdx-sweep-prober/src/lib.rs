//! HEAD Prober and GET+Hash Prober (C4, C5, spec.md §4.4-§4.5): the two
//! probes the decision engine (C6) reconciles against stored catalog
//! metadata.

pub mod client;
pub mod events;
pub mod get;
pub mod head;
pub mod xlsx;

pub use client::build_client;
pub use events::ProbeEvent;
pub use get::GetProber;
pub use head::HeadProber;
pub use xlsx::xlsx_canonical_digest;
