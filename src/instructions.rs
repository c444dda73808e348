//! Parameters and account lists, one module per operation.
#[allow(missing_docs)]
pub mod cancel_all_orders;
#[allow(missing_docs)]
pub mod change_market_status;
#[allow(missing_docs)]
pub mod change_seat_status;
#[allow(missing_docs)]
pub mod close_market;
#[allow(missing_docs)]
pub mod deposit_funds;
#[allow(missing_docs)]
pub mod initialize_market;
#[allow(missing_docs)]
pub mod place_limit_order;
#[allow(missing_docs)]
pub mod request_seat;
