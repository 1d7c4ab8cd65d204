//! Ledger-level checks with solana-program-test
//!
//! The agent and oracle programs are not loaded; their accounts are
//! pre-seeded so fetching and decoding can be exercised against a bank.

use credfeed_client::tx_builder;
use credfeed_common::{ids, pda, Agent, ContextAccount, Counter, CredScore};
use credfeed_integration_tests::fixtures;
use solana_program_test::{tokio, ProgramTest};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction};

#[tokio::test]
async fn test_fetch_and_decode_seeded_accounts() {
    let mut pt = ProgramTest::default();

    let user = Pubkey::new_unique();
    let (context, _) = pda::context_address(&ids::LLM_ORACLE_PROGRAM_ID, 0);
    let (agent_addr, agent_bump) = pda::agent_address(&ids::AGENT_PROGRAM_ID);
    let (counter_addr, _) = pda::counter_address(&ids::LLM_ORACLE_PROGRAM_ID);
    let (score_addr, score_bump) = pda::cred_score_address(&ids::AGENT_PROGRAM_ID, &user);

    pt.add_account(
        agent_addr,
        fixtures::program_account(&ids::AGENT_PROGRAM_ID, fixtures::agent_data(&context, agent_bump)),
    );
    pt.add_account(
        counter_addr,
        fixtures::program_account(&ids::LLM_ORACLE_PROGRAM_ID, fixtures::counter_data(1)),
    );
    pt.add_account(
        context,
        fixtures::program_account(
            &ids::LLM_ORACLE_PROGRAM_ID,
            fixtures::context_data("You are a DeFi Credit Agent."),
        ),
    );
    pt.add_account(
        score_addr,
        fixtures::program_account(&ids::AGENT_PROGRAM_ID, fixtures::cred_score_data(64, score_bump)),
    );

    let (mut banks, _payer, _blockhash) = pt.start().await;

    let agent = banks.get_account(agent_addr).await.unwrap().unwrap();
    let agent = Agent::decode(&agent.data).unwrap();
    assert_eq!(agent.context, context);
    assert_eq!(agent.bump, agent_bump);

    let counter = banks.get_account(counter_addr).await.unwrap().unwrap();
    assert_eq!(Counter::decode(&counter.data).unwrap().count, 1);

    let ctx = banks.get_account(agent.context).await.unwrap().unwrap();
    assert_eq!(
        ContextAccount::decode(&ctx.data).unwrap().text,
        "You are a DeFi Credit Agent."
    );

    let score = banks.get_account(score_addr).await.unwrap().unwrap();
    assert_eq!(CredScore::decode(&score.data).unwrap().score, 64);

    let other_user = Pubkey::new_unique();
    let (missing, _) = pda::cred_score_address(&ids::AGENT_PROGRAM_ID, &other_user);
    assert!(banks.get_account(missing).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sized_v0_transaction_is_accepted() {
    let pt = ProgramTest::default();
    let (mut banks, payer, blockhash) = pt.start().await;
    let recipient = Keypair::new();
    let transfer = system_instruction::transfer(&payer.pubkey(), &recipient.pubkey(), 1_000_000);

    // Probe at the max limit to measure consumption
    let mut ixs = tx_builder::compute_budget_instructions(75_000, tx_builder::MAX_COMPUTE_UNIT_LIMIT);
    ixs.push(transfer.clone());
    let probe = tx_builder::build_v0_transaction(&payer.pubkey(), &ixs, &[&payer], blockhash).unwrap();
    let simulation = banks.simulate_transaction(probe).await.unwrap();
    assert!(simulation.result.unwrap().is_ok());
    let units = simulation.simulation_details.map(|d| d.units_consumed);

    let limit = tx_builder::estimate_compute_limit(units, 1.3);
    assert!(limit < tx_builder::MAX_COMPUTE_UNIT_LIMIT);

    let mut ixs = tx_builder::compute_budget_instructions(75_000, limit);
    ixs.push(transfer);
    let tx = tx_builder::build_v0_transaction(&payer.pubkey(), &ixs, &[&payer], blockhash).unwrap();
    banks.process_transaction(tx).await.unwrap();

    assert_eq!(banks.get_balance(recipient.pubkey()).await.unwrap(), 1_000_000);
}

#[tokio::test]
async fn test_limit_too_low_is_rejected() {
    let pt = ProgramTest::default();
    let (mut banks, payer, blockhash) = pt.start().await;
    let recipient = Pubkey::new_unique();

    let mut ixs = tx_builder::compute_budget_instructions(0, 1);
    ixs.push(system_instruction::transfer(&payer.pubkey(), &recipient, 1_000_000));
    let tx = tx_builder::build_v0_transaction(&payer.pubkey(), &ixs, &[&payer], blockhash).unwrap();

    assert!(banks.process_transaction(tx).await.is_err());
}
