//! JSON scenario format and the step-by-step runner.

use std::collections::BTreeMap;

use anyhow::Context;
use baskex_core::gateway::mock::MockGateway;
use baskex_core::{Address, Asset, BarterEngine, EngineConfig, ANY_UNIT};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A self-contained run: engine configuration, seeded custody, and an
/// ordered list of operations.
#[derive(Serialize, Deserialize, Debug)]
pub struct Scenario {
    pub config: EngineConfig,
    /// Fungible balances minted before the first step.
    #[serde(default)]
    pub balances: Vec<FungibleSeed>,
    /// Non-fungible units minted before the first step.
    #[serde(default)]
    pub units: Vec<UnitSeed>,
    pub steps: Vec<Step>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FungibleSeed {
    pub contract: Address,
    pub owner: Address,
    pub amount: u128,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UnitSeed {
    pub contract: Address,
    pub unit: u64,
    pub owner: Address,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Create {
        caller: Address,
        offered: Vec<Asset>,
        requested: Vec<Asset>,
        payment: u128,
    },
    Cancel {
        caller: Address,
        id: u64,
    },
    Accept {
        caller: Address,
        id: u64,
        proposed: Vec<Asset>,
    },
    Withdraw {
        caller: Address,
        indices: Vec<usize>,
    },
    WithdrawAll {
        caller: Address,
    },
    SetFee {
        caller: Address,
        fee: u128,
    },
    SweepFees {
        caller: Address,
        recipient: Address,
    },
}

impl Step {
    fn caller(&self) -> &Address {
        match self {
            Self::Create { caller, .. }
            | Self::Cancel { caller, .. }
            | Self::Accept { caller, .. }
            | Self::Withdraw { caller, .. }
            | Self::WithdrawAll { caller }
            | Self::SetFee { caller, .. }
            | Self::SweepFees { caller, .. } => caller,
        }
    }
}

/// Per-party closing summary printed after the last step.
#[derive(Serialize, Debug)]
struct PartyReport {
    withdrawable: Vec<Asset>,
    requests: Vec<u64>,
}

pub fn run(scenario: Scenario) -> anyhow::Result<()> {
    let mut gateway = MockGateway::new();
    for seed in &scenario.balances {
        gateway.seed_fungible(&seed.contract, &seed.owner, seed.amount);
    }
    for seed in &scenario.units {
        gateway.seed_unit(&seed.contract, seed.unit, &seed.owner);
    }

    let mut parties: Vec<Address> = Vec::new();
    for seed in &scenario.balances {
        note_party(&mut parties, &seed.owner);
    }
    for seed in &scenario.units {
        note_party(&mut parties, &seed.owner);
    }
    for step in &scenario.steps {
        note_party(&mut parties, step.caller());
    }

    let mut engine = BarterEngine::new(scenario.config, gateway);

    for (index, step) in scenario.steps.into_iter().enumerate() {
        apply(&mut engine, step).with_context(|| format!("step {index} failed"))?;
        for notification in engine.drain_notifications() {
            info!(step = index, ?notification, "event");
        }
    }

    let report: BTreeMap<String, PartyReport> = parties
        .iter()
        .map(|party| {
            (
                party.to_string(),
                PartyReport {
                    withdrawable: engine.withdrawable(party).to_vec(),
                    requests: engine.requests_of(party).to_vec(),
                },
            )
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn apply(engine: &mut BarterEngine<MockGateway>, step: Step) -> anyhow::Result<()> {
    match step {
        Step::Create {
            caller,
            offered,
            requested,
            payment,
        } => {
            let id = engine.create_request(&caller, offered, requested, payment)?;
            info!(id, requester = %caller, "request created");
        }
        Step::Cancel { caller, id } => {
            engine.cancel_request(&caller, id)?;
            info!(id, "request cancelled");
        }
        Step::Accept {
            caller,
            id,
            proposed,
        } => {
            engine.accept_request(&caller, id, proposed)?;
            info!(id, accepter = %caller, "request accepted");
        }
        Step::Withdraw { caller, indices } => {
            let withdrawn = engine.withdraw(&caller, &indices)?;
            info!(owner = %caller, count = withdrawn.len(), "withdrawal");
        }
        Step::WithdrawAll { caller } => {
            let withdrawn = engine.withdraw_all(&caller)?;
            info!(owner = %caller, count = withdrawn.len(), "withdrawal");
        }
        Step::SetFee { caller, fee } => {
            engine.set_fee(&caller, fee)?;
            info!(fee, "fee updated");
        }
        Step::SweepFees { caller, recipient } => {
            let swept = engine.sweep_fees(&caller, &recipient)?;
            info!(recipient = %recipient, amount = swept, "fees swept");
        }
    }
    Ok(())
}

fn note_party(parties: &mut Vec<Address>, party: &Address) {
    if !parties.contains(party) {
        parties.push(party.clone());
    }
}

/// The starter scenario written by `baskex init`: a fungible-for-NFT trade
/// settled with a wildcard request.
pub fn template() -> anyhow::Result<Scenario> {
    let admin: Address = "0xad000001".parse()?;
    let fee_token: Address = "0xfeef01".parse()?;
    let token_x: Address = "0xaaaa0001".parse()?;
    let token_y: Address = "0xaaaa0002".parse()?;
    let alice: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse()?;
    let bob: Address = "0xEA674fdDe714fd979de3EdF0F56AA9716B898ec8".parse()?;

    Ok(Scenario {
        config: EngineConfig {
            admin: admin.clone(),
            fee_token: fee_token.clone(),
            creation_fee: 5,
        },
        balances: vec![
            FungibleSeed {
                contract: token_x.clone(),
                owner: alice.clone(),
                amount: 1_000,
            },
            FungibleSeed {
                contract: fee_token,
                owner: alice.clone(),
                amount: 50,
            },
        ],
        units: vec![UnitSeed {
            contract: token_y.clone(),
            unit: 7,
            owner: bob.clone(),
        }],
        steps: vec![
            Step::Create {
                caller: alice.clone(),
                offered: vec![Asset::Fungible {
                    contract: token_x,
                    amount: 100,
                }],
                requested: vec![Asset::NonFungible {
                    contract: token_y.clone(),
                    unit: ANY_UNIT,
                }],
                payment: 5,
            },
            Step::Accept {
                caller: bob.clone(),
                id: 0,
                proposed: vec![Asset::NonFungible {
                    contract: token_y,
                    unit: 7,
                }],
            },
            Step::WithdrawAll { caller: alice },
            Step::WithdrawAll { caller: bob },
            Step::SweepFees {
                caller: admin.clone(),
                recipient: admin,
            },
        ],
    })
}
