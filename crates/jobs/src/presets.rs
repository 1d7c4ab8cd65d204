//! Ready-made jobs

use crate::job::{jupiter_swap_task::SwapAmount, task, JupiterSwapTask, OracleJob};

/// Umbra token mint
pub const UMBRA_MINT: &str = "PRVT6TB7uss3FrUd2D9xs2zqDBsa3GbMJMwCQsgmeta";

/// USDC mint
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// Quote `base_amount` of `in_mint` in `out_mint` through Jupiter.
///
/// The swap task already yields a number, so no parse task follows it.
pub fn jupiter_swap_job(in_mint: &str, out_mint: &str, base_amount: &str, slippage: f64) -> OracleJob {
    OracleJob::single(task::Task::JupiterSwapTask(JupiterSwapTask {
        in_token_address: Some(in_mint.to_string()),
        out_token_address: Some(out_mint.to_string()),
        swap_amount: Some(SwapAmount::BaseAmountString(base_amount.to_string())),
        slippage: Some(slippage),
    }))
}

/// Price of one Umbra in USDC, 20% slippage
pub fn umbra_usdc_job() -> OracleJob {
    jupiter_swap_job(UMBRA_MINT, USDC_MINT, "1", 20.0)
}
