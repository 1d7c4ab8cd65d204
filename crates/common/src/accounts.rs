//! Decoders for the on-chain accounts the client reads

use crate::anchor::AccountReader;
use crate::error::{CommonError, CommonResult};
use solana_sdk::pubkey::Pubkey;

/// Highest score the agent program stores
pub const MAX_CRED_SCORE: u8 = 100;

/// Agent singleton: points at the LLM context holding the system prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub context: Pubkey,
    pub bump: u8,
}

impl Agent {
    pub const NAME: &'static str = "Agent";

    pub fn decode(data: &[u8]) -> CommonResult<Self> {
        let mut r = AccountReader::new(data, Self::NAME)?;
        Ok(Self {
            context: r.pubkey()?,
            bump: r.u8()?,
        })
    }
}

/// Credit score written by the oracle callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredScore {
    pub score: u8,
    pub bump: u8,
}

impl CredScore {
    pub const NAME: &'static str = "CredScore";

    pub fn decode(data: &[u8]) -> CommonResult<Self> {
        let mut r = AccountReader::new(data, Self::NAME)?;
        let score = r.u8()?;
        if score > MAX_CRED_SCORE {
            return Err(CommonError::ScoreOutOfRange(score));
        }
        Ok(Self {
            score,
            bump: r.u8()?,
        })
    }
}

/// LLM oracle context counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub count: u32,
}

impl Counter {
    pub const NAME: &'static str = "Counter";

    pub fn decode(data: &[u8]) -> CommonResult<Self> {
        let mut r = AccountReader::new(data, Self::NAME)?;
        Ok(Self { count: r.u32()? })
    }
}

/// LLM context: the system prompt shared by all interactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAccount {
    pub text: String,
}

impl ContextAccount {
    pub const NAME: &'static str = "ContextAccount";

    pub fn decode(data: &[u8]) -> CommonResult<Self> {
        let mut r = AccountReader::new(data, Self::NAME)?;
        Ok(Self { text: r.string()? })
    }
}

/// Account the oracle passes to the callback instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackAccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A prompt queued with the LLM oracle.
///
/// The oracle flips `is_processed` once it has invoked the callback; a new
/// prompt from the same user on the same context resets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionAccount {
    pub context: Pubkey,
    pub user: Pubkey,
    pub text: String,
    pub callback_program_id: Pubkey,
    pub callback_discriminator: [u8; 8],
    pub callback_account_metas: Vec<CallbackAccountMeta>,
    pub is_processed: bool,
}

impl InteractionAccount {
    pub const NAME: &'static str = "Interaction";

    pub fn decode(data: &[u8]) -> CommonResult<Self> {
        let mut r = AccountReader::new(data, Self::NAME)?;
        let context = r.pubkey()?;
        let user = r.pubkey()?;
        let text = r.string()?;
        let callback_program_id = r.pubkey()?;
        let callback_discriminator = r.array()?;

        let len = r.u32()?;
        let mut callback_account_metas = Vec::new();
        for _ in 0..len {
            callback_account_metas.push(CallbackAccountMeta {
                pubkey: r.pubkey()?,
                is_signer: r.bool()?,
                is_writable: r.bool()?,
            });
        }

        Ok(Self {
            context,
            user,
            text,
            callback_program_id,
            callback_discriminator,
            callback_account_metas,
            is_processed: r.bool()?,
        })
    }
}
