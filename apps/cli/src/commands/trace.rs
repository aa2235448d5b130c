use anyhow::Result;
use w3rt_trace::{generate_audit_report, list_runs, load_run_events, query_events, EventFilter};

use crate::cli::TraceCommand;

pub fn run(cmd: &TraceCommand) -> Result<()> {
    match cmd {
        TraceCommand::Ls { dir } => {
            for run_id in list_runs(dir)? {
                println!("{run_id}");
            }
        }
        TraceCommand::Show { run_id, dir, types } => {
            let events = if types.is_empty() {
                load_run_events(dir, run_id)?
            } else {
                let wanted: std::collections::BTreeSet<_> =
                    types.iter().filter_map(|t| parse_event_type(t)).collect();
                query_events(dir, &EventFilter { run_id: Some(run_id.clone()), types: Some(wanted), ..Default::default() })?
            };
            for event in events {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        TraceCommand::Audit { dir, from, to } => {
            let report = generate_audit_report(dir, *from, *to)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn parse_event_type(s: &str) -> Option<w3rt_trace::EventType> {
    use w3rt_trace::EventType::*;
    Some(match s {
        "run.started" => RunStarted,
        "run.finished" => RunFinished,
        "step.started" => StepStarted,
        "step.finished" => StepFinished,
        "tool.called" => ToolCalled,
        "tool.result" => ToolResult,
        "tool.error" => ToolError,
        "policy.decision" => PolicyDecision,
        "tx.built" => TxBuilt,
        "tx.simulated" => TxSimulated,
        "tx.submitted" => TxSubmitted,
        "tx.confirmed" => TxConfirmed,
        other => {
            tracing::warn!(event_type = other, "unknown event type, ignoring");
            return None;
        }
    })
}
