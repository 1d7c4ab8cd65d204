//! Program-derived address helpers
//!
//! Seeds mirror the account constraints of the deployed programs. Every
//! function returns the address together with its canonical bump.

use crate::ids::{ASSOCIATED_TOKEN_PROGRAM_ID, SPL_TOKEN_PROGRAM_ID};
use solana_sdk::pubkey::Pubkey;

pub const AGENT_SEED: &[u8] = b"agent";
pub const CRED_SEED: &[u8] = b"cred";
pub const COUNTER_SEED: &[u8] = b"counter";
pub const CONTEXT_SEED: &[u8] = b"test-context";
pub const INTERACTION_SEED: &[u8] = b"interaction";
pub const IDENTITY_SEED: &[u8] = b"identity";

pub const SB_STATE_SEED: &[u8] = b"STATE";
pub const SB_LUT_SIGNER_SEED: &[u8] = b"LutSigner";

/// Singleton agent account of the credit-score program
pub fn agent_address(agent_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[AGENT_SEED], agent_program)
}

/// Per-user credit score account
pub fn cred_score_address(agent_program: &Pubkey, user: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CRED_SEED, user.as_ref()], agent_program)
}

/// Global context counter of the LLM oracle
pub fn counter_address(oracle_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COUNTER_SEED], oracle_program)
}

/// LLM context created when the counter read `count`
pub fn context_address(oracle_program: &Pubkey, count: u32) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONTEXT_SEED, &count.to_le_bytes()], oracle_program)
}

/// Interaction record for one payer against one context
pub fn interaction_address(
    oracle_program: &Pubkey,
    payer: &Pubkey,
    context: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[INTERACTION_SEED, payer.as_ref(), context.as_ref()],
        oracle_program,
    )
}

/// Oracle identity that signs callbacks
pub fn identity_address(oracle_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[IDENTITY_SEED], oracle_program)
}

/// Switchboard program state
pub fn state_address(switchboard_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SB_STATE_SEED], switchboard_program)
}

/// Authority of a feed's address lookup table
pub fn lut_signer_address(switchboard_program: &Pubkey, feed: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SB_LUT_SIGNER_SEED, feed.as_ref()], switchboard_program)
}

/// Associated token account of `wallet` for `mint` (classic token program)
pub fn associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), SPL_TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}
