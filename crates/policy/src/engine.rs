//! The policy decision function itself: a pure, total mapping from
//! configuration and call context to a single [`Decision`].

use w3rt_expr::eval_str;

use crate::config::{PolicyConfig, RuleAction};
use crate::decision::{Decision, DecisionContext, SideEffect};

const MAINNET: &str = "mainnet";
const SOLANA: &str = "solana";

/// Evaluate the ordered decision list against `cfg`/`ctx`. The first
/// matching rule group wins; falling through all of them yields `allow`.
#[must_use]
pub fn decide(cfg: &PolicyConfig, ctx: &DecisionContext) -> Decision {
    let is_broadcast = ctx.side_effect == Some(SideEffect::Broadcast);

    // 1. Mainnet enabled.
    if ctx.network == MAINNET && !cfg.network(MAINNET).enabled {
        return block("MAINNET_DISABLED", "mainnet is disabled", vec!["networks.mainnet.enabled".into()]);
    }

    // 2. Simulation gate.
    if ctx.network == MAINNET
        && cfg.network(MAINNET).require_simulation
        && is_broadcast
        && ctx.simulation_ok != Some(true)
    {
        return block(
            "SIMULATION_REQUIRED",
            "simulation is required before broadcasting on mainnet",
            vec!["networks.mainnet.requireSimulation".into(), "simulationOk".into()],
        );
    }

    // 3. Action allowlist.
    if !cfg.allowlist.actions.is_empty() && !cfg.allowlist.actions.iter().any(|a| a == &ctx.action) {
        return block(
            "ACTION_NOT_ALLOWED",
            &format!("action not allowed: {}", ctx.action),
            vec!["allowlist.actions".into(), "action".into()],
        );
    }

    // 4. Solana program allowlist (fail-closed).
    if ctx.chain == SOLANA && !cfg.allowlist.solana_programs.is_empty() {
        if ctx.program_ids_known != Some(true) {
            return block(
                "PROGRAMS_UNKNOWN",
                "program ids for this transaction are not known",
                vec!["allowlist.solanaPrograms".into(), "programIdsKnown".into()],
            );
        }
        if let Some(offender) = ctx
            .program_ids
            .iter()
            .find(|id| !cfg.allowlist.solana_programs.contains(id))
        {
            return block(
                "PROGRAM_NOT_ALLOWED",
                &format!("program not allowed: {offender}"),
                vec!["allowlist.solanaPrograms".into(), "programIds".into()],
            );
        }
    }

    // 5. Rate limits (broadcast only).
    if is_broadcast {
        let cooldown = cfg.transactions.cooldown_seconds.unwrap_or(0.0);
        if cooldown > 0.0 {
            if let Some(elapsed) = ctx.seconds_since_last_broadcast {
                if elapsed >= 0.0 && elapsed < cooldown {
                    let wait = (cooldown - elapsed).ceil() as i64;
                    return block(
                        "COOLDOWN_ACTIVE",
                        &format!("wait {wait}s"),
                        vec!["transactions.cooldownSeconds".into(), "secondsSinceLastBroadcast".into()],
                    );
                }
            }
        }
        let max_per_minute = cfg.transactions.max_tx_per_minute.unwrap_or(0);
        if max_per_minute > 0 {
            if let Some(count) = ctx.broadcasts_last_minute {
                if count >= max_per_minute {
                    return block(
                        "RATE_LIMIT",
                        "transaction rate limit exceeded",
                        vec!["transactions.maxTxPerMinute".into(), "broadcastsLastMinute".into()],
                    );
                }
            }
        }
    }

    // 6. Size limits.
    if let (Some(amount_sol), Some(max_sol)) = (ctx.amount_sol, cfg.transactions.max_single_sol) {
        if amount_sol > max_sol {
            return confirm(
                "AMOUNT_SOL_LARGE",
                &format!("amount {amount_sol} SOL exceeds single-transaction limit {max_sol} SOL"),
                "amount_sol_large",
                vec!["transactions.maxSingleSol".into(), "amountSol".into()],
            );
        }
    }
    if let (Some(amount_usd), Some(max_usd)) = (ctx.amount_usd, cfg.transactions.max_single_amount_usd) {
        if amount_usd > max_usd {
            return confirm(
                "AMOUNT_LARGE",
                &format!("amount ${amount_usd} exceeds single-transaction limit ${max_usd}"),
                "amount_large",
                vec!["transactions.maxSingleAmountUsd".into(), "amountUsd".into()],
            );
        }
    }

    // 7. Required simulated slippage on mainnet swaps.
    if cfg.transactions.require_simulated_slippage_on_mainnet
        && ctx.chain == SOLANA
        && ctx.network == MAINNET
        && is_broadcast
        && ctx.action == "swap"
        && ctx.simulated_slippage_bps.is_none()
    {
        return block(
            "SIMULATED_SLIPPAGE_REQUIRED",
            "simulated slippage is required for mainnet swaps",
            vec![
                "transactions.requireSimulatedSlippageOnMainnet".into(),
                "simulatedSlippageBps".into(),
            ],
        );
    }

    // 8. Slippage ceiling.
    let simulated_used = ctx.simulated_slippage_bps.is_some();
    let slippage = ctx.simulated_slippage_bps.or(ctx.slippage_bps);
    if let (Some(s), Some(max_bps)) = (slippage, cfg.transactions.max_slippage_bps) {
        if s > max_bps {
            let pct = s / 100.0;
            let (code, label) = if simulated_used {
                ("SIMULATED_SLIPPAGE_HIGH", "Simulated slippage")
            } else {
                ("SLIPPAGE_HIGH", "Requested slippage")
            };
            return confirm(
                code,
                &format!("{label}: {pct:.2}%"),
                "slippage_high",
                vec!["transactions.maxSlippageBps".into(), "slippageBps".into()],
            );
        }
    }

    // 9. Custom rules.
    let ctx_value = ctx.to_value();
    if let Some(decision) = evaluate_rules(cfg, &ctx_value) {
        return decision;
    }

    // 10. Default.
    Decision::Allow { reasons: vec![] }
}

/// Walk `cfg.rules` in declaration order and return the first decision
/// produced by a non-`allow` rule whose condition matches `ctx`. Shared
/// between policy evaluation and `when`/approval-condition callers that
/// only need the rule-list semantics (not the full decision order).
#[must_use]
pub fn evaluate_rules(cfg: &PolicyConfig, ctx: &w3rt_core::Value) -> Option<Decision> {
    for rule in &cfg.rules {
        if rule.action == RuleAction::Allow {
            continue;
        }
        if !eval_str(&rule.condition, ctx) {
            continue;
        }
        let code = format!("RULE_{}", rule.name.to_uppercase());
        let reasons = vec![format!("rules.{}", rule.name)];
        return Some(match rule.action {
            RuleAction::Warn => Decision::Warn { code, message: rule.message.clone(), reasons },
            RuleAction::Confirm => Decision::Confirm {
                code,
                message: rule.message.clone(),
                confirmation_key: format!("rule_{}", rule.name),
                reasons,
            },
            RuleAction::Block => Decision::Block { code, message: rule.message.clone(), reasons },
            RuleAction::Allow => unreachable!("allow rules are skipped above"),
        });
    }
    None
}

fn block(code: &str, message: &str, reasons: Vec<String>) -> Decision {
    Decision::Block { code: code.to_string(), message: message.to_string(), reasons }
}

fn confirm(code: &str, message: &str, confirmation_key: &str, reasons: Vec<String>) -> Decision {
    Decision::Confirm {
        code: code.to_string(),
        message: message.to_string(),
        confirmation_key: confirmation_key.to_string(),
        reasons,
    }
}
