use arrayref::array_ref;
use phoenix_market_client::channel::Submitter;
use phoenix_market_client::config::ProgramConfig;
use phoenix_market_client::discovery::{
    default_candidates, probe, probe_with_report, InstructionShape,
};
use phoenix_market_client::instruction::{
    self, cancel_all_orders, change_market_status, change_seat_status, close_market,
    deposit_funds, initialize_market, place_limit_order, request_seat, DiscriminatorTable,
    Operation, PhoenixInstruction,
};
use phoenix_market_client::lifecycle::{check_preconditions, plan_transition, TransitionPlan};
use phoenix_market_client::pda::{get_log_authority, get_seat_address, MarketAddresses};
use phoenix_market_client::quantization::MarketGranularity;
use phoenix_market_client::state::market_header::MarketSizeParams;
use phoenix_market_client::state::{MarketStatus, Seat, SeatApprovalStatus, Side};
use phoenix_market_client::{ClientError, ErrorKind};
use rand::{rngs::StdRng, Rng, SeedableRng};
use solana_program::instruction::AccountMeta;
use solana_program::pubkey::Pubkey;
use solana_program::system_program;

pub mod common;
use crate::common::utils::RecordingChannel;

fn table() -> DiscriminatorTable {
    DiscriminatorTable {
        place_limit_order_with_free_funds: Some(43),
        deposit_funds: Some(13),
        request_seat: Some(14),
        close_market: Some(7),
    }
}

fn config() -> ProgramConfig {
    ProgramConfig::new(phoenix_market_client::ID, table()).unwrap()
}

fn init_params(fee_collector: Pubkey) -> initialize_market::Params {
    initialize_market::Params {
        market_size_params: MarketSizeParams::new(512, 512, 128),
        num_quote_lots_per_quote_unit: 10_000,
        tick_size_in_quote_lots_per_base_unit: 1000,
        num_base_lots_per_base_unit: 1000,
        taker_fee_bps: 25,
        fee_collector,
        raw_base_units_per_base_unit: None,
    }
}

#[test]
fn initialize_market_wire_format() {
    let config = config();
    let market = Pubkey::new_unique();
    let creator = Pubkey::new_unique();
    let base_mint = Pubkey::new_unique();
    let quote_mint = Pubkey::new_unique();
    let fee_collector = Pubkey::new_from_array([7; 32]);
    let addresses =
        MarketAddresses::derive(&config.program_id, &market, &base_mint, &quote_mint).unwrap();

    let ix = instruction::initialize_market(
        &config,
        initialize_market::Accounts {
            market: &market,
            market_creator: &creator,
            base_mint: &base_mint,
            quote_mint: &quote_mint,
            base_vault: &addresses.base_vault,
            quote_vault: &addresses.quote_vault,
        },
        init_params(fee_collector),
    )
    .unwrap();

    assert_eq!(ix.data.len(), 92);
    assert_eq!(ix.data[0], 100);
    assert_eq!(u64::from_le_bytes(*array_ref!(ix.data, 1, 8)), 512);
    assert_eq!(u64::from_le_bytes(*array_ref!(ix.data, 17, 8)), 128);
    assert_eq!(u64::from_le_bytes(*array_ref!(ix.data, 25, 8)), 10_000);
    assert_eq!(u64::from_le_bytes(*array_ref!(ix.data, 33, 8)), 1000);
    assert_eq!(u16::from_le_bytes(*array_ref!(ix.data, 49, 2)), 25);
    assert_eq!(array_ref!(ix.data, 51, 32), &[7; 32]);
    assert_eq!(ix.data[83], 0);

    let log_authority = get_log_authority(&config.program_id).unwrap();
    assert_eq!(
        ix.accounts,
        vec![
            AccountMeta::new_readonly(config.program_id, false),
            AccountMeta::new_readonly(log_authority, false),
            AccountMeta::new(market, false),
            AccountMeta::new(creator, true),
            AccountMeta::new_readonly(base_mint, false),
            AccountMeta::new_readonly(quote_mint, false),
            AccountMeta::new(addresses.base_vault, false),
            AccountMeta::new(addresses.quote_vault, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ]
    );

    let mut scaled = init_params(fee_collector);
    scaled.raw_base_units_per_base_unit = Some(1_000_000);
    let data = PhoenixInstruction::InitializeMarket(scaled)
        .encode(&config.discriminators)
        .unwrap();
    assert_eq!(data.len(), 96);
    assert_eq!(data[83], 1);
    assert_eq!(u32::from_le_bytes(*array_ref!(data, 84, 4)), 1_000_000);
}

#[test]
fn invalid_market_parameters_fail_before_encoding() {
    let config = config();
    let key = Pubkey::new_unique();
    let accounts = || initialize_market::Accounts {
        market: &key,
        market_creator: &key,
        base_mint: &key,
        quote_mint: &key,
        base_vault: &key,
        quote_vault: &key,
    };
    let mut params = init_params(key);
    params.taker_fee_bps = 20_000;
    let err = instruction::initialize_market(&config, accounts(), params).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let mut params = init_params(key);
    params.market_size_params = MarketSizeParams::new(4096, 4096, 128);
    assert!(instruction::initialize_market(&config, accounts(), params).is_ok());
}

#[test]
fn trading_account_layouts() {
    let config = config();
    let market = Pubkey::new_unique();
    let trader = Pubkey::new_unique();
    let (seat, _) = get_seat_address(&config.program_id, &market, &trader).unwrap();
    let log_authority = get_log_authority(&config.program_id).unwrap();
    let prefix = vec![
        AccountMeta::new_readonly(config.program_id, false),
        AccountMeta::new_readonly(log_authority, false),
    ];

    let ix = instruction::request_seat(
        &config,
        request_seat::Accounts {
            market: &market,
            payer: &trader,
            seat: &seat,
        },
    )
    .unwrap();
    assert_eq!(ix.data, vec![14]);
    assert_eq!(&ix.accounts[..2], &prefix[..]);
    assert_eq!(
        &ix.accounts[2..],
        &[
            AccountMeta::new(market, false),
            AccountMeta::new(trader, true),
            AccountMeta::new(seat, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ]
    );

    let ix = instruction::cancel_all_orders(
        &config,
        cancel_all_orders::Accounts {
            market: &market,
            trader: &trader,
        },
    )
    .unwrap();
    assert_eq!(ix.data, vec![6]);
    assert_eq!(ix.accounts.len(), 4);
    assert!(ix.accounts[3].is_signer && !ix.accounts[3].is_writable);

    let granularity = MarketGranularity::new(1000, 10_000, 1000).unwrap();
    let params = place_limit_order::Params::from_float(&granularity, Side::Bid, 1.0, 3.0, 42, true)
        .unwrap();
    let ix = instruction::place_limit_order_with_free_funds(
        &config,
        place_limit_order::Accounts {
            market: &market,
            trader: &trader,
            seat: &seat,
        },
        params,
    )
    .unwrap();
    assert_eq!(ix.data.len(), 27);
    assert_eq!(ix.data[0], 43);
    assert_eq!(u64::from_le_bytes(*array_ref!(ix.data, 2, 8)), 10);
    assert_eq!(u64::from_le_bytes(*array_ref!(ix.data, 10, 8)), 3000);
    assert_eq!(u64::from_le_bytes(*array_ref!(ix.data, 18, 8)), 42);
    assert_eq!(&ix.accounts[..2], &prefix[..]);
    assert_eq!(ix.accounts[4], AccountMeta::new(seat, false));

    let base_account = Pubkey::new_unique();
    let quote_account = Pubkey::new_unique();
    let base_vault = Pubkey::new_unique();
    let quote_vault = Pubkey::new_unique();
    let ix = instruction::deposit_funds(
        &config,
        deposit_funds::Accounts {
            market: &market,
            trader: &trader,
            seat: &seat,
            base_account: &base_account,
            quote_account: &quote_account,
            base_vault: &base_vault,
            quote_vault: &quote_vault,
        },
        deposit_funds::Params {
            quote_lots_to_deposit: 2_000_000,
            base_lots_to_deposit: 0,
        },
    )
    .unwrap();
    assert_eq!(ix.data.len(), 17);
    assert_eq!(ix.data[0], 13);
    assert_eq!(u64::from_le_bytes(*array_ref!(ix.data, 1, 8)), 2_000_000);
    assert_eq!(ix.accounts.len(), 10);
    assert_eq!(ix.accounts[5], AccountMeta::new(base_account, false));
    assert_eq!(ix.accounts[8], AccountMeta::new(quote_vault, false));
    assert_eq!(ix.accounts[9], AccountMeta::new_readonly(spl_token::ID, false));
}

#[test]
fn close_market_reclaims_rent_after_closing() {
    let config = config();
    let market = Pubkey::new_unique();
    let authority = Pubkey::new_unique();
    let ix = instruction::close_market(
        &config,
        close_market::Accounts {
            market: &market,
            market_authority: &authority,
        },
    )
    .unwrap();
    assert_eq!(ix.data, vec![7]);
    assert_eq!(
        ix.accounts,
        vec![
            AccountMeta::new_readonly(config.program_id, false),
            AccountMeta::new_readonly(get_log_authority(&config.program_id).unwrap(), false),
            AccountMeta::new(market, false),
            AccountMeta::new(authority, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ]
    );

    assert!(check_preconditions(MarketStatus::Closed, None, Operation::CloseMarket).is_ok());
    assert_eq!(
        check_preconditions(MarketStatus::Paused, None, Operation::CloseMarket)
            .unwrap_err()
            .kind(),
        ErrorKind::SequencingViolation
    );

    let err = instruction::close_market(
        &ProgramConfig::default(),
        close_market::Accounts {
            market: &market,
            market_authority: &authority,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ClientError::MissingDiscriminator {
            operation: "CloseMarket"
        }
    ));
}

#[test]
fn undocumented_discriminators_are_required() {
    let config = ProgramConfig::default();
    let market = Pubkey::new_unique();
    let trader = Pubkey::new_unique();
    let err = instruction::request_seat(
        &config,
        request_seat::Accounts {
            market: &market,
            payer: &trader,
            seat: &trader,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ClientError::MissingDiscriminator {
            operation: "RequestSeat"
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn decode_inverts_encode() {
    let table = table();
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..200 {
        let size = MarketSizeParams::SUPPORTED[rng.gen_range(0..4)];
        let instructions = [
            PhoenixInstruction::InitializeMarket(initialize_market::Params {
                market_size_params: size,
                num_quote_lots_per_quote_unit: rng.gen(),
                tick_size_in_quote_lots_per_base_unit: rng.gen(),
                num_base_lots_per_base_unit: rng.gen(),
                taker_fee_bps: rng.gen_range(0..=10_000),
                fee_collector: Pubkey::new_from_array(rng.gen()),
                raw_base_units_per_base_unit: if rng.gen() { Some(rng.gen()) } else { None },
            }),
            PhoenixInstruction::ChangeMarketStatus(change_market_status::Params {
                market_status: MarketStatus::try_from(rng.gen_range(0u8..6)).unwrap(),
            }),
            PhoenixInstruction::ChangeSeatStatus(change_seat_status::Params {
                approval_status: SeatApprovalStatus::try_from(rng.gen_range(0u8..3)).unwrap(),
            }),
            PhoenixInstruction::RequestSeat,
            PhoenixInstruction::DepositFunds(deposit_funds::Params {
                quote_lots_to_deposit: rng.gen(),
                base_lots_to_deposit: rng.gen(),
            }),
            PhoenixInstruction::PlaceLimitOrderWithFreeFunds(place_limit_order::Params {
                side: if rng.gen() { Side::Bid } else { Side::Ask },
                price_in_ticks: rng.gen(),
                num_base_lots: rng.gen(),
                client_order_id: rng.gen(),
                use_only_deposited_funds: rng.gen(),
            }),
            PhoenixInstruction::CancelAllOrders,
            PhoenixInstruction::CloseMarket,
        ];
        for ix in instructions {
            let data = ix.encode(&table).unwrap();
            assert_eq!(PhoenixInstruction::decode(&data, &table).unwrap(), ix);
        }
    }
}

#[test]
fn discovery_only_simulates() {
    let config = config();
    let market = Pubkey::new_unique();
    let trader = Pubkey::new_unique();
    let channel = RecordingChannel::with_rule(table(), MarketStatus::Active, |ix| {
        if ix.data.first() == Some(&6) {
            Ok(())
        } else {
            Err("custom program error: 0x2".to_string())
        }
    });
    let shape = InstructionShape::new(
        &config.program_id,
        &cancel_all_orders::Accounts {
            market: &market,
            trader: &trader,
        },
        vec![],
    )
    .unwrap();

    assert_eq!(probe(&channel, 0..20, &shape).unwrap(), 6);
    assert_eq!(channel.simulated.borrow().len(), 7);
    assert!(channel.submitted.borrow().is_empty());

    let report = probe_with_report(&channel, default_candidates(), &shape).unwrap();
    assert_eq!(report.accepted, Some(6));
    assert_eq!(report.rejected.len(), 6);
    assert_eq!(report.rejected[0].logs, vec!["Program log: custom program error: 0x2"]);

    let err = probe(&channel, 100..110, &shape).unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
    assert!(channel.submitted.borrow().is_empty());
}

#[test]
fn close_market_step_by_step() {
    let config = config();
    let market = Pubkey::new_unique();
    let authority = Pubkey::new_unique();
    let accounts = change_market_status::Accounts {
        market: &market,
        market_authority: &authority,
    };
    let channel = RecordingChannel::new(table(), MarketStatus::Active);

    let plan = plan_transition(MarketStatus::Active, MarketStatus::Closed).unwrap();
    let reached = plan.execute(&channel, &config, &accounts, true).unwrap();
    assert_eq!(reached, MarketStatus::Closed);
    assert_eq!(channel.status.get(), MarketStatus::Closed);

    let data: Vec<Vec<u8>> = channel
        .submitted
        .borrow()
        .iter()
        .map(|ix| ix.data.clone())
        .collect();
    assert_eq!(data, vec![vec![6], vec![103, 2], vec![103, 3], vec![103, 4]]);
}

#[test]
fn interrupted_transition_resumes_from_reached_status() {
    let config = config();
    let market = Pubkey::new_unique();
    let authority = Pubkey::new_unique();
    let accounts = change_market_status::Accounts {
        market: &market,
        market_authority: &authority,
    };
    let channel = RecordingChannel::new(table(), MarketStatus::Active);
    channel.fail_at.set(Some(1));

    let plan = plan_transition(MarketStatus::Active, MarketStatus::Closed).unwrap();
    let err = plan.execute(&channel, &config, &accounts, false).unwrap_err();
    let ClientError::TransitionInterrupted { reached, source } = err else {
        panic!("expected an interrupted transition");
    };
    assert_eq!(reached, MarketStatus::PostOnly);
    assert_eq!(source.kind(), ErrorKind::ExternalRejection);

    channel.fail_at.set(None);
    let resumed = plan_transition(reached, MarketStatus::Closed).unwrap();
    assert_eq!(resumed.steps(), &[MarketStatus::Paused, MarketStatus::Closed]);
    assert_eq!(
        resumed.execute(&channel, &config, &accounts, false).unwrap(),
        MarketStatus::Closed
    );
}

#[test]
fn program_rejects_skipped_steps() {
    let config = config();
    let market = Pubkey::new_unique();
    let authority = Pubkey::new_unique();
    let accounts = change_market_status::Accounts {
        market: &market,
        market_authority: &authority,
    };

    assert!(TransitionPlan::from_steps(MarketStatus::Active, vec![MarketStatus::Closed]).is_err());

    // a raw status change is not checked locally; the program refuses it
    let channel = RecordingChannel::new(table(), MarketStatus::Active);
    let ix = instruction::change_market_status(
        &config,
        change_market_status::Accounts {
            market: &market,
            market_authority: &authority,
        },
        change_market_status::Params {
            market_status: MarketStatus::Closed,
        },
    )
    .unwrap();
    let err = channel.submit_and_confirm(&[ix]).unwrap_err();
    let ClientError::ExternalRejection {
        operation,
        discriminator,
        logs,
        ..
    } = err
    else {
        panic!("expected a program rejection");
    };
    assert_eq!(operation, "ChangeMarketStatus");
    assert_eq!(discriminator, Some(103));
    assert!(logs[0].contains("Active to Closed"));
    assert_eq!(channel.status.get(), MarketStatus::Active);

    let plan = plan_transition(MarketStatus::Active, MarketStatus::Paused).unwrap();
    assert_eq!(
        plan.execute(&channel, &config, &accounts, true).unwrap(),
        MarketStatus::Paused
    );
    // no cancel prelude when the plan stops short of a terminal status
    assert_eq!(channel.submitted.borrow().len(), 3);
}

#[test]
fn seat_must_be_approved_before_trading() {
    let market = Pubkey::new_unique();
    let trader = Pubkey::new_unique();
    let seat = Seat::new(market, trader, SeatApprovalStatus::NotApproved);
    let err = check_preconditions(MarketStatus::Active, Some(&seat), Operation::DepositFunds)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SequencingViolation);

    let seat = Seat::load(bytemuck::bytes_of(&Seat::new(
        market,
        trader,
        SeatApprovalStatus::Approved,
    )))
    .unwrap();
    assert!(check_preconditions(
        MarketStatus::PostOnly,
        Some(&seat),
        Operation::PlaceLimitOrder
    )
    .is_ok());
}
