#![warn(missing_docs)]
/*!
Client-side building blocks for a Phoenix-style on-chain central limit order book.

## Overview

The order book itself lives in an external program. This crate covers everything a script needs
before handing a transaction to an RPC connection:

- deriving the program-owned addresses of vaults, seats and queues ([`pda`]),
- converting human-scale prices and sizes into the market's ticks and lots ([`quantization`]),
- encoding byte-exact instructions with their account lists ([`instruction`]),
- planning market status changes and checking which operations a status permits ([`lifecycle`]),
- probing the program for undocumented discriminators ([`discovery`]).

Everything except [`lifecycle::TransitionPlan::execute`] and the discovery probes is pure
computation. Those two talk to the network only through the [`channel::Simulator`] and
[`channel::Submitter`] traits, which callers implement on top of their RPC client.

## Ordering

Operations with an on-chain data dependency must each be confirmed before the next is sent:
request a seat, have it approved, deposit, then place orders against the deposited funds. All of
a trader's orders must be cancelled before the market is closed. The crate documents these
preconditions and [`lifecycle::check_preconditions`] checks them against fetched account state,
but it does not hold any pending state of its own.

## Discriminators

Initialize market (100), change market status (103), change seat status (104) and cancel all
orders (6) are protocol facts. The discriminators for placing an order against deposited funds,
depositing funds, requesting a seat and closing a market are not documented, so they are read from
[`config::ProgramConfig`] and can be found with [`discovery::probe`].
*/

/// The external submission channel
pub mod channel;
/// Program and market configuration
pub mod config;
/// Keypair loading
pub mod credentials;
/// Discriminator discovery by simulation
pub mod discovery;
#[doc(hidden)]
pub mod error;
/// Instruction encoding, decoding and builders
pub mod instruction;
#[doc(hidden)]
pub mod instructions;
/// Market status planning and operation gating
pub mod lifecycle;
/// Program-derived addresses
pub mod pda;
/// Price and size quantization
pub mod quantization;
/// Status codes and account views
pub mod state;
/// Utility functions
pub mod utils;

use solana_program::declare_id;

pub use error::{ClientError, ClientResult, ErrorKind};

declare_id!("PhoeNiXZ8ByJGLkxNfZRnkUfjvmuYqLR89jjFHGqdXY");
