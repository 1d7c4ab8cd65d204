//! Program ids and well-known addresses

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Credit-score agent program (Anchor)
pub const AGENT_PROGRAM_ID: Pubkey = pubkey!("FMCBSyWV6apm9XjL5oc3rSnyQLtgb38TCVUuxpHdaxvQ");

/// LLM oracle program the agent delegates prompts to
pub const LLM_ORACLE_PROGRAM_ID: Pubkey = pubkey!("LLMrieZMpbJFwN52WgmBNMxYojrpRVYXdC1RCweEbab");

/// Program that logs a pull feed's value on chain
pub const FEED_CONSUMER_PROGRAM_ID: Pubkey =
    pubkey!("3Co44vnKtvUd1RshCrEnFUferHi1x5sWwjYKuYco2yjU");

/// Switchboard on-demand program on mainnet
pub const SWITCHBOARD_MAINNET_PROGRAM_ID: Pubkey =
    pubkey!("SBondMDrcV3K4kxZR1HNVT7osZxAHVHgYXL5Ze1oMUv");

/// Switchboard on-demand program on devnet
pub const SWITCHBOARD_DEVNET_PROGRAM_ID: Pubkey =
    pubkey!("Aio4gaXjXzJNVLtzwtNVmSqGKpANtXhybbkhtAC94ji2");

/// Default oracle queue on mainnet
pub const SWITCHBOARD_MAINNET_QUEUE: Pubkey =
    pubkey!("A43DyUGA7s8eXPxqEjJY6EBu1KKbNgfxF8h17VAHn13w");

/// Default oracle queue on devnet
pub const SWITCHBOARD_DEVNET_QUEUE: Pubkey =
    pubkey!("EYiAmGSdsQTuCw413V5BzaruWuCCSDgTPtBGvLkXHbe7");

pub const SPL_TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Wrapped SOL mint
pub const NATIVE_MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");
