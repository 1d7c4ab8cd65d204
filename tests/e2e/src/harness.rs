//! Test harness for E2E tests with solana-test-validator

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use credfeed_common::{ids, pda};
use credfeed_integration_tests::fixtures;
use solana_client::{nonblocking, rpc_client::RpcClient};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

pub const RPC_URL: &str = "http://localhost:8899";

pub const CONTEXT_TEXT: &str = "You are a DeFi Credit Agent. Only return the number.";

/// Score stored for the payer before the tests run
pub const SEEDED_SCORE: u8 = 64;

/// Find solana binary in standard locations
fn find_solana_binary(name: &str) -> Result<PathBuf> {
    // Try standard Solana install location
    let home = env::var("HOME").context("HOME not set")?;
    let standard_path = PathBuf::from(&home)
        .join(".local/share/solana/install/active_release/bin")
        .join(name);

    if standard_path.exists() {
        return Ok(standard_path);
    }

    // Fallback to PATH
    Ok(PathBuf::from(name))
}

/// Write `account` in the format accepted by `--account`
fn write_account_file(dir: &Path, address: &Pubkey, account: &Account) -> Result<PathBuf> {
    let json = serde_json::json!({
        "pubkey": address.to_string(),
        "account": {
            "lamports": account.lamports,
            "data": [STANDARD.encode(&account.data), "base64"],
            "owner": account.owner.to_string(),
            "executable": account.executable,
            "rentEpoch": 0,
            "space": account.data.len(),
        }
    });
    let path = dir.join(format!("{}.json", address));
    fs::write(&path, serde_json::to_vec_pretty(&json)?)
        .context(format!("Failed to write account file for {}", address))?;
    Ok(path)
}

/// Test validator process handle
pub struct TestValidator {
    process: Child,
    _ledger: TempDir,
}

impl TestValidator {
    /// Start a validator with `accounts` preloaded
    pub fn start(accounts: &[(Pubkey, Account)]) -> Result<Self> {
        println!("Starting solana-test-validator...");

        let ledger = tempfile::tempdir().context("Failed to create ledger dir")?;
        let mut cmd = Command::new(find_solana_binary("solana-test-validator")?);
        cmd.arg("--reset")
            .arg("--quiet")
            .arg("--ledger")
            .arg(ledger.path().join("ledger"));

        for (address, account) in accounts {
            let file = write_account_file(ledger.path(), address, account)?;
            cmd.arg("--account").arg(address.to_string()).arg(file);
        }

        let process = cmd
            .stdout(Stdio::null())
            .spawn()
            .context("Failed to start solana-test-validator")?;

        let validator = Self {
            process,
            _ledger: ledger,
        };
        validator.wait_until_healthy()?;
        Ok(validator)
    }

    fn wait_until_healthy(&self) -> Result<()> {
        let client = self.rpc_client();
        for _ in 0..60 {
            if client.get_health().is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(500));
        }
        bail!("solana-test-validator did not become healthy")
    }

    /// Get RPC client
    pub fn rpc_client(&self) -> RpcClient {
        RpcClient::new_with_commitment(RPC_URL.to_string(), CommitmentConfig::confirmed())
    }
}

impl Drop for TestValidator {
    fn drop(&mut self) {
        println!("Stopping test validator...");
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Addresses seeded into the validator
#[derive(Debug, Clone, Copy)]
pub struct SeededAccounts {
    pub agent: Pubkey,
    pub counter: Pubkey,
    pub context: Pubkey,
    pub payer_score: Pubkey,
    /// Answered interaction of the payer on the seeded context
    pub interaction: Pubkey,
}

/// Test context: validator, funded payer and seeded program accounts
pub struct TestContext {
    pub validator: TestValidator,
    pub client: nonblocking::rpc_client::RpcClient,
    pub payer: Keypair,
    pub seeded: SeededAccounts,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let payer = Keypair::new();

        let (context, _) = pda::context_address(&ids::LLM_ORACLE_PROGRAM_ID, 0);
        let (agent, agent_bump) = pda::agent_address(&ids::AGENT_PROGRAM_ID);
        let (counter, _) = pda::counter_address(&ids::LLM_ORACLE_PROGRAM_ID);
        let (payer_score, score_bump) =
            pda::cred_score_address(&ids::AGENT_PROGRAM_ID, &payer.pubkey());
        let (interaction, _) =
            pda::interaction_address(&ids::LLM_ORACLE_PROGRAM_ID, &payer.pubkey(), &context);

        let accounts = vec![
            (
                agent,
                fixtures::program_account(&ids::AGENT_PROGRAM_ID, fixtures::agent_data(&context, agent_bump)),
            ),
            (
                counter,
                fixtures::program_account(&ids::LLM_ORACLE_PROGRAM_ID, fixtures::counter_data(1)),
            ),
            (
                context,
                fixtures::program_account(&ids::LLM_ORACLE_PROGRAM_ID, fixtures::context_data(CONTEXT_TEXT)),
            ),
            (
                payer_score,
                fixtures::program_account(
                    &ids::AGENT_PROGRAM_ID,
                    fixtures::cred_score_data(SEEDED_SCORE, score_bump),
                ),
            ),
            (
                interaction,
                fixtures::program_account(
                    &ids::LLM_ORACLE_PROGRAM_ID,
                    fixtures::interaction_data(&context, &payer.pubkey(), &payer_score, "@toly", true),
                ),
            ),
        ];

        let validator = TestValidator::start(&accounts)?;

        // Request airdrop for payer
        println!("Requesting airdrop for payer: {}", payer.pubkey());
        let blocking = validator.rpc_client();
        blocking
            .request_airdrop(&payer.pubkey(), 10_000_000_000)
            .context("Failed to request airdrop")?;

        // Wait for airdrop
        for _ in 0..30 {
            if let Ok(balance) = blocking.get_balance(&payer.pubkey()) {
                if balance > 0 {
                    break;
                }
            }
            thread::sleep(Duration::from_millis(500));
        }

        let client = nonblocking::rpc_client::RpcClient::new_with_commitment(
            RPC_URL.to_string(),
            CommitmentConfig::confirmed(),
        );

        Ok(Self {
            validator,
            client,
            payer,
            seeded: SeededAccounts {
                agent,
                counter,
                context,
                payer_score,
                interaction,
            },
        })
    }

    pub fn agent_client(&self) -> credfeed_client::agent_client::AgentClient<'_> {
        credfeed_client::agent_client::AgentClient::new(
            &self.client,
            &self.payer,
            ids::AGENT_PROGRAM_ID,
            ids::LLM_ORACLE_PROGRAM_ID,
        )
    }
}
