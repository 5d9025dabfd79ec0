//! The sweep driver: orchestrates C1 (load) → C2/C3/C4 (HEAD probe) → C6
//! pass 1 → C2/C3/C5 (GET probe) → C6 pass 2 → C7 (plan aggregation), per
//! spec.md §1's pipeline.

use hdx_sweep_core::{AuditRow, ResourceRecord, ResourceTable, SweepConfig, SweepError, SweepResult};
use hdx_sweep_decision::{decide_get, decide_head, AuditReport};
use hdx_sweep_plan::RevisionPlan;
use hdx_sweep_prober::{build_client, GetProber, HeadProber};
use hdx_sweep_scheduler::HostScheduler;
use hdx_sweep_retry::RetryPolicy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

pub struct SweepOutcome {
    pub audit: AuditReport,
    pub plan: RevisionPlan,
}

/// Runs one full sweep (or one shard of one, when `table` was already
/// scoped to a shard prefix) over every record in `table`.
pub async fn run_sweep(config: &SweepConfig, table: &ResourceTable) -> SweepResult<SweepOutcome> {
    let client = build_client(&config.user_agent, &config.timeouts)
        .map_err(|e| SweepError::ProbeClientUnavailable(e.to_string()))?;
    let scheduler = Arc::new(HostScheduler::new(
        table.netlocs().iter().cloned(),
        config.scheduler.clone(),
    ));

    let head_prober = Arc::new(HeadProber::new(
        client.clone(),
        Arc::clone(&scheduler),
        RetryPolicy::new(config.retry.clone()),
    ));
    let get_prober = Arc::new(GetProber::new(
        client,
        scheduler,
        RetryPolicy::new(config.retry.clone()),
        config.xlsx_url_ignore.clone(),
    ));

    let phase1_start = Instant::now();
    let mut audits: HashMap<_, AuditRow> = HashMap::with_capacity(table.len());
    let mut plan = RevisionPlan::new();
    let mut phase2_worklist = Vec::new();

    let mut phase1_tasks: JoinSet<(ResourceRecord, hdx_sweep_core::ProbeOutcome)> = JoinSet::new();
    for record in table.records() {
        let record = record.clone();
        let prober = Arc::clone(&head_prober);
        phase1_tasks.spawn(async move {
            let outcome = prober.probe(&record).await;
            (record, outcome)
        });
    }

    while let Some(result) = phase1_tasks.join_next().await {
        let (record, outcome) = result.expect("head probe task panicked");
        let decision = decide_head(&record, &outcome);
        if let Some(patch) = decision.patch {
            plan.add_patch(record.dataset_id.clone(), record.resource_id.clone(), patch);
        }
        if decision.enqueue_phase2 {
            phase2_worklist.push(record.clone());
        }
        audits.insert(record.resource_id.clone(), decision.audit);
    }
    tracing::info!(elapsed = ?phase1_start.elapsed(), resources = table.len(), "phase 1 (HEAD) complete");

    let phase2_start = Instant::now();
    let mut phase2_tasks: JoinSet<(ResourceRecord, hdx_sweep_core::ProbeOutcome)> = JoinSet::new();
    let phase2_count = phase2_worklist.len();
    for record in phase2_worklist {
        let prober = Arc::clone(&get_prober);
        phase2_tasks.spawn(async move {
            let outcome = prober.probe(&record).await;
            (record, outcome)
        });
    }

    let today = chrono::Utc::now();
    while let Some(result) = phase2_tasks.join_next().await {
        let (record, outcome) = result.expect("get probe task panicked");
        let audit = audits
            .get_mut(&record.resource_id)
            .expect("every phase-2 resource has a phase-1 audit row");
        if let Some(patch) = decide_get(audit, &record, &outcome, today) {
            plan.add_patch(record.dataset_id.clone(), record.resource_id.clone(), patch);
        }
    }
    tracing::info!(elapsed = ?phase2_start.elapsed(), resources = phase2_count, "phase 2 (GET+hash) complete");

    let mut report = AuditReport::new();
    for audit in audits.into_values() {
        report.push(audit);
    }

    Ok(SweepOutcome { audit: report, plan })
}
