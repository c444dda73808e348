use std::cell::{Cell, RefCell};

use phoenix_market_client::channel::{rejection, Simulator, Submitter};
use phoenix_market_client::instruction::{DiscriminatorTable, PhoenixInstruction};
use phoenix_market_client::lifecycle::is_legal_step;
use phoenix_market_client::state::MarketStatus;
use phoenix_market_client::ClientResult;
use solana_program::instruction::Instruction;
use solana_sdk::signature::Signature;

type Rule = Box<dyn Fn(&Instruction) -> Result<(), String>>;

/// An in-memory stand-in for the order book program.
///
/// Every call is recorded. Simulations are judged by `rule`; submissions are judged by `rule`
/// and, for status changes, by whether the step is legal from the tracked market status.
pub struct RecordingChannel {
    pub table: DiscriminatorTable,
    pub status: Cell<MarketStatus>,
    pub simulated: RefCell<Vec<Instruction>>,
    pub submitted: RefCell<Vec<Instruction>>,
    /// Submission index (0-based) that fails regardless of its content.
    pub fail_at: Cell<Option<usize>>,
    rule: Rule,
}

impl RecordingChannel {
    pub fn new(table: DiscriminatorTable, status: MarketStatus) -> Self {
        Self::with_rule(table, status, |_| Ok(()))
    }

    pub fn with_rule<F>(table: DiscriminatorTable, status: MarketStatus, rule: F) -> Self
    where
        F: Fn(&Instruction) -> Result<(), String> + 'static,
    {
        Self {
            table,
            status: Cell::new(status),
            simulated: RefCell::new(vec![]),
            submitted: RefCell::new(vec![]),
            fail_at: Cell::new(None),
            rule: Box::new(rule),
        }
    }

    fn judge(&self, instructions: &[Instruction]) -> ClientResult {
        for ix in instructions {
            (self.rule)(ix).map_err(|message| {
                rejection(
                    instructions,
                    &self.table,
                    message.clone(),
                    vec![format!("Program log: {message}")],
                )
            })?;
        }
        Ok(())
    }
}

impl Simulator for RecordingChannel {
    fn simulate(&self, instructions: &[Instruction]) -> ClientResult {
        self.simulated.borrow_mut().extend_from_slice(instructions);
        self.judge(instructions)
    }
}

impl Submitter for RecordingChannel {
    fn submit_and_confirm(&self, instructions: &[Instruction]) -> ClientResult<Signature> {
        let index = self.submitted.borrow().len();
        self.submitted.borrow_mut().extend_from_slice(instructions);
        if self.fail_at.get() == Some(index) {
            return Err(rejection(
                instructions,
                &self.table,
                "blockhash expired",
                vec![],
            ));
        }
        self.judge(instructions)?;
        for ix in instructions {
            if let Ok(PhoenixInstruction::ChangeMarketStatus(params)) =
                PhoenixInstruction::decode(&ix.data, &self.table)
            {
                let current = self.status.get();
                if !is_legal_step(current, params.market_status) {
                    return Err(rejection(
                        instructions,
                        &self.table,
                        "custom program error: 0x0",
                        vec![format!(
                            "Program log: Invalid market status transition from {current} to {}",
                            params.market_status
                        )],
                    ));
                }
                self.status.set(params.market_status);
            }
        }
        Ok(Signature::new_unique())
    }
}
