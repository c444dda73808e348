//! Market status planning and operation gating.
//!
//! The program is the authority on which status changes it accepts. This module produces the
//! ordered single steps it expects (`Active -> PostOnly -> Paused -> Closed`) and runs them one
//! confirmed transaction at a time. A multi-step transition is never atomic: if a step fails the
//! market stays at the last confirmed status, which is reported so the caller can re-plan from
//! there.
use solana_program::{instruction::Instruction, msg};

use crate::{
    channel::Submitter,
    config::ProgramConfig,
    error::{ClientError, ClientResult},
    instruction::{self, cancel_all_orders, change_market_status, Operation},
    state::{MarketStatus, Seat, SeatApprovalStatus},
};

/// Whether the program accepts a direct change from `from` to `to`.
pub fn is_legal_step(from: MarketStatus, to: MarketStatus) -> bool {
    use MarketStatus::*;
    matches!(
        (from, to),
        (Uninitialized, Active)
            | (Active, PostOnly)
            | (PostOnly, Active)
            | (PostOnly, Paused)
            | (Paused, Active)
            | (Paused, PostOnly)
            | (Paused, Closed)
            | (Paused, Tombstoned)
    )
}

fn rank(status: MarketStatus) -> u8 {
    match status {
        MarketStatus::Uninitialized => 0,
        MarketStatus::Active => 1,
        MarketStatus::PostOnly => 2,
        MarketStatus::Paused => 3,
        MarketStatus::Closed | MarketStatus::Tombstoned => 4,
    }
}

/// An ordered list of status changes starting from a known status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    current: MarketStatus,
    steps: Vec<MarketStatus>,
}

/// Plans the shortest sequence of legal steps from `current` to `target`.
pub fn plan_transition(
    current: MarketStatus,
    target: MarketStatus,
) -> ClientResult<TransitionPlan> {
    if current == target {
        return Ok(TransitionPlan {
            current,
            steps: vec![],
        });
    }
    if current.is_terminal() {
        return Err(violation(format!("{current} is terminal")));
    }
    let steps = if rank(target) > rank(current) {
        let mut steps: Vec<MarketStatus> = [
            MarketStatus::Active,
            MarketStatus::PostOnly,
            MarketStatus::Paused,
        ]
        .into_iter()
        .filter(|s| rank(*s) > rank(current) && rank(*s) <= rank(target))
        .collect();
        if target.is_terminal() {
            steps.push(target);
        }
        steps
    } else {
        // Reopening a paused or post-only market is a single step
        vec![target]
    };
    TransitionPlan::from_steps(current, steps)
}

fn violation(reason: String) -> ClientError {
    ClientError::SequencingViolation {
        operation: Operation::ChangeMarketStatus.name(),
        reason,
    }
}

impl TransitionPlan {
    /// Checks a caller-supplied sequence of steps.
    pub fn from_steps(current: MarketStatus, steps: Vec<MarketStatus>) -> ClientResult<Self> {
        let mut from = current;
        for &to in &steps {
            if !is_legal_step(from, to) {
                return Err(violation(format!(
                    "{from} -> {to} is not a single step; plan the intermediate statuses"
                )));
            }
            from = to;
        }
        Ok(Self { current, steps })
    }

    pub fn current(&self) -> MarketStatus {
        self.current
    }

    pub fn steps(&self) -> &[MarketStatus] {
        &self.steps
    }

    pub fn target(&self) -> MarketStatus {
        self.steps.last().copied().unwrap_or(self.current)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every resting order must be cancelled before the market reaches a terminal status.
    pub fn requires_empty_book(&self) -> bool {
        self.target().is_terminal()
    }

    /// One change-market-status instruction per step, in order.
    pub fn instructions(
        &self,
        config: &ProgramConfig,
        accounts: &change_market_status::Accounts,
    ) -> ClientResult<Vec<Instruction>> {
        self.steps
            .iter()
            .map(|&market_status| {
                instruction::change_market_status(
                    config,
                    change_market_status::Accounts {
                        market: accounts.market,
                        market_authority: accounts.market_authority,
                    },
                    change_market_status::Params { market_status },
                )
            })
            .collect()
    }

    /// Submits the steps one transaction at a time, waiting for each confirmation.
    ///
    /// With `cancel_own_orders`, a cancel-all signed by the market authority is confirmed first
    /// when the plan ends in a terminal status. Orders owned by other traders are not touched.
    /// Returns the status reached.
    pub fn execute<C: Submitter + ?Sized>(
        &self,
        channel: &C,
        config: &ProgramConfig,
        accounts: &change_market_status::Accounts,
        cancel_own_orders: bool,
    ) -> ClientResult<MarketStatus> {
        let instructions = self.instructions(config, accounts)?;
        let mut reached = self.current;
        let interrupted = |reached, source| ClientError::TransitionInterrupted {
            reached,
            source: Box::new(source),
        };

        if cancel_own_orders && self.requires_empty_book() {
            let cancel = instruction::cancel_all_orders(
                config,
                cancel_all_orders::Accounts {
                    market: accounts.market,
                    trader: accounts.market_authority,
                },
            )?;
            msg!("Cancelling orders on {} before closing", accounts.market);
            if let Err(e) = channel.submit_and_confirm(&[cancel]) {
                msg!("Cancel all orders failed: {}", e);
                return Err(interrupted(reached, e));
            }
        }

        for (step, ix) in self.steps.iter().zip(instructions) {
            msg!("Setting market {} status to {}", accounts.market, step);
            match channel.submit_and_confirm(&[ix]) {
                Ok(signature) => {
                    msg!("Status {} confirmed in {}", step, signature);
                    reached = *step;
                }
                Err(e) => {
                    msg!("Status change to {} failed at {}: {}", step, reached, e);
                    return Err(interrupted(reached, e));
                }
            }
        }
        Ok(reached)
    }
}

/// Checks the documented preconditions of `operation` against the market status and the
/// trader's seat, if one exists.
pub fn check_preconditions(
    status: MarketStatus,
    seat: Option<&Seat>,
    operation: Operation,
) -> ClientResult {
    let refuse = |reason: String| ClientError::SequencingViolation {
        operation: operation.name(),
        reason,
    };
    if !status.permits(operation) {
        return Err(refuse(format!("not permitted while the market is {status}")));
    }
    match operation {
        Operation::RequestSeat => {
            if seat.is_some() {
                return Err(refuse("the trader already has a seat".to_string()));
            }
        }
        Operation::DepositFunds | Operation::PlaceLimitOrder => {
            let seat = seat.ok_or_else(|| refuse("request a seat first".to_string()))?;
            let approval = seat.approval_status()?;
            if approval != SeatApprovalStatus::Approved {
                return Err(refuse(format!("seat is {approval:?}, not Approved")));
            }
        }
        _ => {}
    }
    Ok(())
}
