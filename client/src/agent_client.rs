//! Client for the credit-score agent program

use crate::error::{ClientError, ClientResult};
use crate::poller::Poller;
use crate::tx_builder;
use credfeed_common::{
    instructions, pda, Agent, ContextAccount, Counter, CredScore, InteractionAccount,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};

/// Outcome of `initialize`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Initialized {
        signature: Signature,
        agent: Pubkey,
        context: Pubkey,
    },
    /// The agent singleton already exists; nothing was sent
    AlreadyInitialized { agent: Pubkey, context: Pubkey },
}

/// Result of a submitted prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub signature: Signature,
    pub cred_score: Pubkey,
    pub interaction: Pubkey,
}

pub struct AgentClient<'a> {
    rpc: &'a RpcClient,
    payer: &'a Keypair,
    agent_program: Pubkey,
    oracle_program: Pubkey,
}

impl<'a> AgentClient<'a> {
    pub fn new(
        rpc: &'a RpcClient,
        payer: &'a Keypair,
        agent_program: Pubkey,
        oracle_program: Pubkey,
    ) -> Self {
        Self {
            rpc,
            payer,
            agent_program,
            oracle_program,
        }
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    async fn account_data(&self, address: &Pubkey) -> ClientResult<Option<Vec<u8>>> {
        let account = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await?
            .value;
        Ok(account.map(|a| a.data))
    }

    async fn required_data(&self, address: &Pubkey) -> ClientResult<Vec<u8>> {
        self.account_data(address)
            .await?
            .ok_or_else(|| ClientError::AccountNotFound(address.to_string()))
    }

    pub async fn fetch_counter(&self) -> ClientResult<Counter> {
        let address = pda::counter_address(&self.oracle_program).0;
        Ok(Counter::decode(&self.required_data(&address).await?)?)
    }

    pub async fn fetch_agent(&self) -> ClientResult<Option<Agent>> {
        let address = pda::agent_address(&self.agent_program).0;
        match self.account_data(&address).await? {
            Some(data) => Ok(Some(Agent::decode(&data)?)),
            None => Ok(None),
        }
    }

    pub async fn fetch_context(&self, context: &Pubkey) -> ClientResult<ContextAccount> {
        Ok(ContextAccount::decode(&self.required_data(context).await?)?)
    }

    pub async fn fetch_cred_score(&self, user: &Pubkey) -> ClientResult<Option<CredScore>> {
        let address = pda::cred_score_address(&self.agent_program, user).0;
        match self.account_data(&address).await? {
            Some(data) => Ok(Some(CredScore::decode(&data)?)),
            None => Ok(None),
        }
    }

    /// The oracle's record of a prompt; `None` until the interaction exists
    pub async fn fetch_interaction(
        &self,
        interaction: &Pubkey,
    ) -> ClientResult<Option<InteractionAccount>> {
        match self.account_data(interaction).await? {
            Some(data) => Ok(Some(InteractionAccount::decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn send(&self, instruction: Instruction) -> ClientResult<Signature> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let tx = tx_builder::build_legacy_transaction(instruction, self.payer, blockhash);
        Ok(self.rpc.send_and_confirm_transaction(&tx).await?)
    }

    /// Create the agent and its LLM context, unless it already exists
    pub async fn initialize(&self) -> ClientResult<InitOutcome> {
        if let Some(agent) = self.fetch_agent().await? {
            let address = pda::agent_address(&self.agent_program).0;
            log::warn!("Agent {} already initialized", address);
            return Ok(InitOutcome::AlreadyInitialized {
                agent: address,
                context: agent.context,
            });
        }

        let counter = self.fetch_counter().await?;
        let (ix, keys) = instructions::initialize(
            &self.agent_program,
            &self.oracle_program,
            &self.payer.pubkey(),
            counter.count,
        );
        log::debug!("Creating LLM context {} (counter {})", keys.llm_context, counter.count);

        let signature = self.send(ix).await?;
        log::info!("Agent initialized: {}", signature);
        Ok(InitOutcome::Initialized {
            signature,
            agent: keys.agent,
            context: keys.llm_context,
        })
    }

    /// Send `text` to the agent for scoring
    pub async fn interact(&self, text: &str) -> ClientResult<Interaction> {
        let agent_address = pda::agent_address(&self.agent_program).0;
        let agent = self
            .fetch_agent()
            .await?
            .ok_or_else(|| ClientError::AccountNotFound(agent_address.to_string()))?;

        let (ix, keys) = instructions::interact_agent(
            &self.agent_program,
            &self.oracle_program,
            &self.payer.pubkey(),
            &agent.context,
            text,
        )?;

        let signature = self.send(ix).await?;
        log::info!("Interaction {} submitted: {}", keys.interaction, signature);
        Ok(Interaction {
            signature,
            cred_score: keys.cred_score,
            interaction: keys.interaction,
        })
    }

    /// Wait until the oracle has answered `interaction`, then read `user`'s
    /// score.
    ///
    /// The score account exists (zeroed) as soon as the prompt is sent, so
    /// only the interaction's `is_processed` flag says the callback ran.
    pub async fn wait_for_score(
        &self,
        user: &Pubkey,
        interaction: &Pubkey,
        poller: &Poller,
    ) -> ClientResult<CredScore> {
        poller
            .until(move || async move {
                let pending = self.fetch_interaction(interaction).await?;
                Ok(pending.filter(|i| i.is_processed).map(|_| ()))
            })
            .await?;

        let address = pda::cred_score_address(&self.agent_program, user).0;
        self.fetch_cred_score(user)
            .await?
            .ok_or_else(|| ClientError::AccountNotFound(address.to_string()))
    }

    /// Log `feed`'s current value on chain through the consumer program
    pub async fn consume_feed(&self, feed_program: &Pubkey, feed: &Pubkey) -> ClientResult<Signature> {
        let slot = self.rpc.get_slot().await?;
        let signature = self
            .send(instructions::consume_feed(feed_program, feed, slot))
            .await?;
        log::info!("Feed {} consumed at slot {}: {}", feed, slot, signature);
        Ok(signature)
    }
}
