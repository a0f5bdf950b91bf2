use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde_json::Value;

use badge_attester::badges::BadgeRegistry;
use badge_attester::chain::wallet::{CLAIMER_KEY_ENV_VAR, DEPLOYER_KEY_ENV_VAR, SIGNER_KEY_ENV_VAR};
use badge_attester::chain::{ChainClient, Wallet};
use badge_attester::config::{load_config_for, AttesterConfig, ValidationScope};
use badge_attester::eas::{
    confirm_attestation, deadline_from_now, submit_attestation, uids_from_receipt,
    DelegatedAttester, EasError, EasResult, ProxyDomains,
};
use badge_attester::observability::init_logging;
use badge_attester::referral::sign_referral;
use badge_attester::revert::RevertDecoder;

#[derive(Parser)]
#[command(name = "badge-cli")]
#[command(about = "Scripts for delegated EAS badge attestations", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true, env = "BADGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a badge with the signer key and submit it with the claimer key
    Attest {
        /// Badge contract; defaults to the first configured badge
        #[arg(short, long)]
        badge: Option<String>,
    },
    /// Decode custom error revert data, e.g. 0x8baa579f
    DecodeError { data: String },
    /// Sign a profile referral of the claimer by the deployer
    Referral {
        /// Profile owner; defaults to the claimer address
        #[arg(long)]
        owner: Option<Address>,
        /// Validity window in seconds; defaults to the configured one
        #[arg(long)]
        deadline_secs: Option<u64>,
    },
    /// Ask a running server whether a recipient is eligible
    Check {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
        badge: String,
        recipient: String,
    },
    /// Ask a running server for a claim transaction
    Claim {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
        badge: String,
        recipient: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Attest { badge } => {
            let config = load(cli.config, ValidationScope::Attestation)?;
            attest(&config, badge.as_deref()).await?;
        }
        Commands::DecodeError { data } => {
            let decoded = RevertDecoder::known().decode_hex(&data)?;
            println!("error: {}", decoded.name);
            for (name, value) in decoded.rendered_args() {
                println!("  {}: {}", name, value);
            }
        }
        Commands::Referral {
            owner,
            deadline_secs,
        } => {
            let config = load(cli.config, ValidationScope::Referral)?;
            referral(&config, owner, deadline_secs).await?;
        }
        Commands::Check {
            url,
            badge,
            recipient,
        } => {
            let res = reqwest::Client::new()
                .get(format!("{}/api/check", url))
                .query(&[("badge", badge), ("recipient", recipient)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Claim {
            url,
            badge,
            recipient,
        } => {
            let res = reqwest::Client::new()
                .get(format!("{}/api/claim", url))
                .query(&[("badge", badge), ("recipient", recipient)])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn load(
    path: Option<PathBuf>,
    scope: ValidationScope,
) -> Result<AttesterConfig, Box<dyn std::error::Error>> {
    let config = load_config_for(path.as_deref(), scope)?;
    init_logging("badge_attester=warn", false);
    Ok(config)
}

async fn attest(
    config: &AttesterConfig,
    badge: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let signer = Wallet::from_env(SIGNER_KEY_ENV_VAR)?;
    let claimer = Wallet::from_env(CLAIMER_KEY_ENV_VAR)?;

    let registry = BadgeRegistry::from_config(&config.badges)?;
    let badge = match badge {
        Some(address) => registry.get(address),
        None => config
            .badges
            .first()
            .and_then(|entry| registry.get(&entry.address.to_string())),
    }
    .ok_or("no such badge configured")?;

    let client = ChainClient::new(config.chain.clone())?;
    let domains = Arc::new(ProxyDomains::from_config(config, Some(client.clone())));
    let attester = DelegatedAttester::new(&config.eas, domains)?;

    let recipient = claimer.address();
    let payload = badge.rules.create_payload(recipient).await?;
    let request = attester
        .create_badge(badge.address, recipient, payload, badge.proxy, &signer)
        .await?;

    let submitted: EasResult<_> = async {
        let tx_hash =
            submit_attestation(&config.chain.rpc_url, &claimer, badge.proxy, request).await?;
        confirm_attestation(&client, tx_hash).await
    }
    .await;

    match submitted {
        Ok(receipt) => {
            println!("tx: {}", receipt.transaction_hash);
            for uid in uids_from_receipt(config.eas.eas_address, &receipt) {
                println!("uid: {}", uid);
            }
        }
        Err(EasError::Reverted(data)) => match RevertDecoder::known().decode(&data) {
            Ok(decoded) => eprintln!("error: {}", decoded.name),
            Err(_) => eprintln!("error: reverted with {}", data),
        },
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn referral(
    config: &AttesterConfig,
    owner: Option<Address>,
    deadline_secs: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let signer = Wallet::from_env(SIGNER_KEY_ENV_VAR)?;
    let referrer = Wallet::from_env(DEPLOYER_KEY_ENV_VAR)?.address();
    let owner = match owner {
        Some(owner) => owner,
        None => Wallet::from_env(CLAIMER_KEY_ENV_VAR)?.address(),
    };

    let chain_id = ChainClient::new(config.chain.clone())?.chain_id().await?.0;
    let deadline = deadline_from_now(deadline_secs.unwrap_or(config.referral.deadline_secs));

    let signed = sign_referral(
        &signer,
        config.referral.profile_registry,
        chain_id,
        referrer,
        owner,
        deadline,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&signed)?);
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
