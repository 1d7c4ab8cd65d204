//! Transaction builders
//!
//! Feed creation goes out as a v0 transaction with a priority fee and a
//! compute limit sized from a simulation; agent calls use legacy
//! transactions.

use crate::error::{ClientError, ClientResult};
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    instruction::Instruction,
    message::{v0, VersionedMessage},
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::{Transaction, VersionedTransaction},
};

/// Upper bound the runtime accepts for a single transaction
pub const MAX_COMPUTE_UNIT_LIMIT: u32 = 1_400_000;

/// Priority fee and compute limit instructions, in that order
pub fn compute_budget_instructions(price_micro_lamports: u64, limit: u32) -> Vec<Instruction> {
    vec![
        ComputeBudgetInstruction::set_compute_unit_price(price_micro_lamports),
        ComputeBudgetInstruction::set_compute_unit_limit(limit),
    ]
}

/// Compute limit for a transaction whose simulation consumed `units_consumed`.
///
/// Without a measurement the maximum is used.
pub fn estimate_compute_limit(units_consumed: Option<u64>, multiple: f64) -> u32 {
    match units_consumed {
        Some(units) if units > 0 && multiple.is_finite() && multiple > 0.0 => {
            let scaled = (units as f64 * multiple).ceil();
            scaled.clamp(1.0, MAX_COMPUTE_UNIT_LIMIT as f64) as u32
        }
        _ => MAX_COMPUTE_UNIT_LIMIT,
    }
}

/// Compile `ixs` into a signed v0 transaction paid by `payer`.
///
/// `signers` must include the payer and every other required signer.
pub fn build_v0_transaction(
    payer: &Pubkey,
    ixs: &[Instruction],
    signers: &[&Keypair],
    recent_blockhash: Hash,
) -> ClientResult<VersionedTransaction> {
    let message = v0::Message::try_compile(payer, ixs, &[], recent_blockhash)
        .map_err(|e| ClientError::Transaction(e.to_string()))?;

    VersionedTransaction::try_new(VersionedMessage::V0(message), signers)
        .map_err(|e| ClientError::Transaction(e.to_string()))
}

/// Build a legacy transaction for a single agent instruction
pub fn build_legacy_transaction(
    instruction: Instruction,
    payer: &Keypair,
    recent_blockhash: Hash,
) -> Transaction {
    Transaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        &[payer],
        recent_blockhash,
    )
}
