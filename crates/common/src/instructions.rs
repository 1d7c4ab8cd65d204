//! Instruction builders for the agent and feed consumer programs
//!
//! Account order follows each program's `Accounts` struct exactly; Anchor
//! resolves accounts by position.

use crate::anchor::ArgsWriter;
use crate::error::{CommonError, CommonResult};
use crate::pda;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

/// Addresses an `initialize` call touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializeAccounts {
    pub agent: Pubkey,
    pub llm_context: Pubkey,
    pub counter: Pubkey,
}

impl InitializeAccounts {
    /// The oracle creates the next context at the counter's current value
    pub fn derive(agent_program: &Pubkey, oracle_program: &Pubkey, counter_count: u32) -> Self {
        Self {
            agent: pda::agent_address(agent_program).0,
            llm_context: pda::context_address(oracle_program, counter_count).0,
            counter: pda::counter_address(oracle_program).0,
        }
    }
}

/// Build `initialize`: creates the agent and its LLM context
pub fn initialize(
    agent_program: &Pubkey,
    oracle_program: &Pubkey,
    signer: &Pubkey,
    counter_count: u32,
) -> (Instruction, InitializeAccounts) {
    let keys = InitializeAccounts::derive(agent_program, oracle_program, counter_count);

    let accounts = vec![
        AccountMeta::new(*signer, true),
        AccountMeta::new(keys.agent, false),
        AccountMeta::new(keys.llm_context, false),
        AccountMeta::new(keys.counter, false),
        AccountMeta::new_readonly(*oracle_program, false),
        AccountMeta::new_readonly(system_program::ID, false),
    ];

    let ix = Instruction {
        program_id: *agent_program,
        accounts,
        data: ArgsWriter::new("initialize").finish(),
    };
    (ix, keys)
}

/// Addresses an `interact_agent` call touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractAccounts {
    pub cred_score: Pubkey,
    pub interaction: Pubkey,
    pub agent: Pubkey,
    pub context: Pubkey,
}

/// Build `interact_agent`: sends `text` to the LLM oracle on behalf of `user`
///
/// `context` is the agent's LLM context, read from the agent account.
pub fn interact_agent(
    agent_program: &Pubkey,
    oracle_program: &Pubkey,
    user: &Pubkey,
    context: &Pubkey,
    text: &str,
) -> CommonResult<(Instruction, InteractAccounts)> {
    if text.trim().is_empty() {
        return Err(CommonError::EmptyPrompt);
    }

    let keys = InteractAccounts {
        cred_score: pda::cred_score_address(agent_program, user).0,
        interaction: pda::interaction_address(oracle_program, user, context).0,
        agent: pda::agent_address(agent_program).0,
        context: *context,
    };

    let accounts = vec![
        AccountMeta::new(*user, true),
        AccountMeta::new(keys.cred_score, false),
        AccountMeta::new(keys.interaction, false),
        AccountMeta::new_readonly(keys.agent, false),
        AccountMeta::new_readonly(keys.context, false),
        AccountMeta::new_readonly(*oracle_program, false),
        AccountMeta::new_readonly(system_program::ID, false),
    ];

    let ix = Instruction {
        program_id: *agent_program,
        accounts,
        data: ArgsWriter::new("interact_agent").string(text).finish(),
    };
    Ok((ix, keys))
}

/// Build the feed consumer's `test` instruction, which logs the feed value
/// as seen at `slot`
pub fn consume_feed(consumer_program: &Pubkey, feed: &Pubkey, slot: u64) -> Instruction {
    Instruction {
        program_id: *consumer_program,
        accounts: vec![AccountMeta::new_readonly(*feed, false)],
        data: ArgsWriter::new("test").u64(slot).finish(),
    }
}
