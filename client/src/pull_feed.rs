//! Switchboard pull feed creation

use crate::config::FeedSettings;
use crate::crossbar::CrossbarClient;
use crate::error::{ClientError, ClientResult};
use crate::tx_builder;
use borsh::BorshSerialize;
use credfeed_common::anchor;
use credfeed_common::{ids, pda};
use credfeed_jobs::JobsDocument;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcSendTransactionConfig, RpcSimulateTransactionConfig},
};
use solana_sdk::{
    address_lookup_table::{self, instruction::derive_lookup_table_address},
    commitment_config::{CommitmentConfig, CommitmentLevel},
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_program,
    transaction::VersionedTransaction,
};

pub const MAX_FEED_NAME_LEN: usize = 32;

/// On-chain variance is fixed point with 9 decimals
const VARIANCE_SCALE: f64 = 1e9;

/// Arguments of the `pull_feed_init` instruction, in wire order
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct PullFeedInitParams {
    pub feed_hash: [u8; 32],
    pub max_variance: u64,
    pub min_responses: u32,
    pub name: [u8; 32],
    pub recent_slot: u64,
    pub ipfs_hash: [u8; 32],
    pub min_sample_size: u8,
    pub max_staleness: u32,
    pub permit_write_by_authority: Option<bool>,
}

impl PullFeedInitParams {
    /// Validate `settings` and combine them with the stored feed hash
    pub fn from_settings(
        settings: &FeedSettings,
        feed_hash: [u8; 32],
        recent_slot: u64,
    ) -> ClientResult<Self> {
        validate_settings(settings)?;

        let mut name = [0u8; 32];
        name[..settings.name.len()].copy_from_slice(settings.name.as_bytes());

        Ok(Self {
            feed_hash,
            max_variance: (settings.max_variance * VARIANCE_SCALE).floor() as u64,
            min_responses: settings.min_responses,
            name,
            recent_slot,
            ipfs_hash: [0u8; 32],
            min_sample_size: settings.min_sample_size,
            max_staleness: settings.max_staleness,
            permit_write_by_authority: settings.permit_write_by_authority,
        })
    }

    pub fn data(&self) -> ClientResult<Vec<u8>> {
        anchor::instruction_data("pull_feed_init", self)
            .map_err(|e| ClientError::Transaction(e.to_string()))
    }
}

pub fn validate_settings(settings: &FeedSettings) -> ClientResult<()> {
    let invalid = |msg: String| Err(ClientError::InvalidFeedConfig(msg));

    if settings.name.is_empty() {
        return invalid("name must not be empty".to_string());
    }
    if settings.name.len() > MAX_FEED_NAME_LEN {
        return invalid(format!(
            "name is {} bytes, max {}",
            settings.name.len(),
            MAX_FEED_NAME_LEN
        ));
    }
    if !settings.max_variance.is_finite() || settings.max_variance < 0.0 {
        return invalid(format!("max_variance {} must be >= 0", settings.max_variance));
    }
    if settings.max_variance * VARIANCE_SCALE > u64::MAX as f64 {
        return invalid(format!("max_variance {} is too large", settings.max_variance));
    }
    if settings.min_responses == 0 {
        return invalid("min_responses must be at least 1".to_string());
    }
    if settings.min_sample_size == 0 {
        return invalid("min_sample_size must be at least 1".to_string());
    }
    if settings.max_staleness == 0 {
        return invalid("max_staleness must be at least 1 slot".to_string());
    }
    Ok(())
}

/// Accounts of `pull_feed_init` derived for one feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullFeedInitAccounts {
    pub program_state: Pubkey,
    pub reward_escrow: Pubkey,
    pub lut_signer: Pubkey,
    pub lut: Pubkey,
}

impl PullFeedInitAccounts {
    pub fn derive(switchboard_program: &Pubkey, feed: &Pubkey, recent_slot: u64) -> Self {
        let lut_signer = pda::lut_signer_address(switchboard_program, feed).0;
        Self {
            program_state: pda::state_address(switchboard_program).0,
            reward_escrow: pda::associated_token_address(feed, &ids::NATIVE_MINT),
            lut_signer,
            lut: derive_lookup_table_address(&lut_signer, recent_slot).0,
        }
    }
}

/// Build `pull_feed_init` with `payer` as the feed authority
pub fn build_init_instruction(
    switchboard_program: &Pubkey,
    queue: &Pubkey,
    feed: &Pubkey,
    payer: &Pubkey,
    params: &PullFeedInitParams,
) -> ClientResult<Instruction> {
    let keys = PullFeedInitAccounts::derive(switchboard_program, feed, params.recent_slot);

    let accounts = vec![
        AccountMeta::new(*feed, true),
        AccountMeta::new_readonly(*queue, false),
        AccountMeta::new_readonly(*payer, false),
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new_readonly(keys.program_state, false),
        AccountMeta::new(keys.reward_escrow, false),
        AccountMeta::new_readonly(ids::SPL_TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(ids::ASSOCIATED_TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(ids::NATIVE_MINT, false),
        AccountMeta::new_readonly(keys.lut_signer, false),
        AccountMeta::new(keys.lut, false),
        AccountMeta::new_readonly(address_lookup_table::program::ID, false),
    ];

    Ok(Instruction {
        program_id: *switchboard_program,
        accounts,
        data: params.data()?,
    })
}

/// Result of a feed creation
#[derive(Debug, Clone)]
pub struct CreatedFeed {
    pub feed: Pubkey,
    pub feed_hash: [u8; 32],
    pub signature: Signature,
}

/// Stores jobs, then builds, simulates and sends a feed's init transaction
pub struct FeedCreator<'a> {
    pub rpc: &'a RpcClient,
    pub crossbar: &'a CrossbarClient,
    pub payer: &'a Keypair,
    pub switchboard_program: Pubkey,
    pub queue: Pubkey,
    pub compute_unit_price: u64,
    pub compute_unit_limit_multiple: f64,
}

impl FeedCreator<'_> {
    pub async fn create(
        &self,
        doc: &JobsDocument,
        settings: &FeedSettings,
    ) -> ClientResult<CreatedFeed> {
        validate_settings(settings)?;

        let stored = self.crossbar.store(&self.queue, doc).await?;
        let feed_hash = stored.feed_hash_bytes()?;
        log::info!("Stored jobs at crossbar: cid {} feed hash {}", stored.cid, stored.feed_hash);

        let recent_slot = self
            .rpc
            .get_slot_with_commitment(CommitmentConfig::finalized())
            .await?;
        let params = PullFeedInitParams::from_settings(settings, feed_hash, recent_slot)?;

        let feed_keypair = Keypair::new();
        let init_ix = build_init_instruction(
            &self.switchboard_program,
            &self.queue,
            &feed_keypair.pubkey(),
            &self.payer.pubkey(),
            &params,
        )?;

        let tx = self.sized_transaction(init_ix, &feed_keypair).await?;

        let simulation = self
            .rpc
            .simulate_transaction_with_config(
                &tx,
                RpcSimulateTransactionConfig {
                    commitment: Some(CommitmentConfig::processed()),
                    ..Default::default()
                },
            )
            .await?
            .value;
        if let Some(err) = simulation.err {
            return Err(ClientError::SimulationFailed {
                err: err.to_string(),
                logs: simulation.logs.unwrap_or_default().join("\n"),
            });
        }
        log::debug!("Feed init simulation used {:?} compute units", simulation.units_consumed);

        let signature = self
            .rpc
            .send_transaction_with_config(
                &tx,
                RpcSendTransactionConfig {
                    skip_preflight: true,
                    preflight_commitment: Some(CommitmentLevel::Processed),
                    ..Default::default()
                },
            )
            .await?;

        log::info!("Feed {} initialized: {}", feed_keypair.pubkey(), signature);
        Ok(CreatedFeed {
            feed: feed_keypair.pubkey(),
            feed_hash,
            signature,
        })
    }

    /// Simulate once at the max limit, then rebuild with a measured limit
    async fn sized_transaction(
        &self,
        init_ix: Instruction,
        feed_keypair: &Keypair,
    ) -> ClientResult<VersionedTransaction> {
        let payer = self.payer.pubkey();
        let signers = [self.payer, feed_keypair];

        let blockhash = self.rpc.get_latest_blockhash().await?;
        let mut ixs = tx_builder::compute_budget_instructions(
            self.compute_unit_price,
            tx_builder::MAX_COMPUTE_UNIT_LIMIT,
        );
        ixs.push(init_ix.clone());
        let probe = tx_builder::build_v0_transaction(&payer, &ixs, &signers, blockhash)?;

        let units = self
            .rpc
            .simulate_transaction_with_config(
                &probe,
                RpcSimulateTransactionConfig {
                    replace_recent_blockhash: true,
                    commitment: Some(CommitmentConfig::processed()),
                    ..Default::default()
                },
            )
            .await?
            .value
            .units_consumed;

        let limit = tx_builder::estimate_compute_limit(units, self.compute_unit_limit_multiple);
        log::debug!("Compute unit limit for feed init: {}", limit);

        let mut ixs = tx_builder::compute_budget_instructions(self.compute_unit_price, limit);
        ixs.push(init_ix);
        tx_builder::build_v0_transaction(&payer, &ixs, &signers, blockhash)
    }
}
