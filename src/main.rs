// src/main.rs
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;
use ethers::types::{Address, Bytes, H256, U256};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use safe4337::{
    BundlerClient, GasFees, NodeClient, PaymasterClient, RpcTransport, SafeAccount, SafeConfig,
    SmartAccount,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(long, env = "RPC_URL")]
    rpc_url: String,

    #[clap(long, env = "BUNDLER_URL")]
    bundler_url: String,

    #[clap(long, env = "PAYMASTER_URL")]
    paymaster_url: Option<String>,

    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Queried from the node when absent
    #[clap(long, env = "CHAIN_ID")]
    chain_id: Option<u64>,

    /// Use an existing Safe instead of the predicted one
    #[clap(long, env = "SAFE_ADDRESS")]
    safe_address: Option<Address>,

    #[clap(long, env = "SALT_NONCE", default_value_t = 0)]
    salt_nonce: u64,

    #[clap(long, default_value = "info")]
    log_level: Level,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the Safe address and whether it is deployed
    Address,
    /// Print the owners of the deployed Safe
    Owners,
    /// Print the init code of the Safe
    InitCode,
    /// Print the entry points supported by the bundler and paymaster
    EntryPoints,
    /// Send a call from the Safe as a UserOperation
    Send {
        #[clap(long)]
        to: Address,
        /// Value in wei
        #[clap(long, default_value_t = 0)]
        value: u128,
        #[clap(long, default_value = "0x")]
        data: Bytes,
        /// In wei
        #[clap(long)]
        max_fee_per_gas: u128,
        /// In wei
        #[clap(long)]
        max_priority_fee_per_gas: u128,
    },
    /// Print the receipt of a UserOperation
    Receipt { hash: H256 },
    /// Print a UserOperation by its hash
    Operation { hash: H256 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Connect the transports
    let rpc: Arc<dyn RpcTransport> = Arc::new(Provider::<Http>::try_from(args.rpc_url.as_str())?);
    let bundler: Arc<dyn RpcTransport> =
        Arc::new(Provider::<Http>::try_from(args.bundler_url.as_str())?);
    let paymaster = match &args.paymaster_url {
        Some(url) => Some(Arc::new(Provider::<Http>::try_from(url.as_str())?) as Arc<dyn RpcTransport>),
        None => None,
    };

    let chain_id = match args.chain_id {
        Some(chain_id) => chain_id,
        None => rpc.eth_chain_id().await?,
    };

    // Create the account
    let wallet = args.private_key.parse::<LocalWallet>()?;
    let config = SafeConfig::default().with_salt_nonce(U256::from(args.salt_nonce));
    let mut account = match args.safe_address {
        Some(address) => SafeAccount::at_address(address, wallet, config, rpc, bundler, chain_id),
        None => SafeAccount::from_config(wallet, config, rpc, bundler, chain_id),
    };
    if let Some(paymaster) = paymaster {
        account = account.with_paymaster(paymaster);
    }

    info!("Using Safe {:?} on chain {}", account.address(), chain_id);

    match args.command {
        Command::Address => {
            println!("{:?}", account.address());
            println!("deployed: {}", account.is_deployed().await?);
        }
        Command::Owners => {
            for owner in account.get_owners().await? {
                println!("{:?}", owner);
            }
        }
        Command::InitCode => {
            println!("0x{}", hex::encode(account.get_init_code().await?));
        }
        Command::EntryPoints => {
            println!("bundler: {:?}", account.bundler().eth_supported_entry_points().await?);
            if let Some(paymaster) = account.paymaster() {
                println!("paymaster: {:?}", paymaster.pm_supported_entry_points().await?);
            }
        }
        Command::Send {
            to,
            value,
            data,
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => {
            account.ensure_entry_point_supported().await?;
            let fees = GasFees {
                max_fee_per_gas: U256::from(max_fee_per_gas),
                max_priority_fee_per_gas: U256::from(max_priority_fee_per_gas),
            };
            let hash = account
                .send_user_operation(to, U256::from(value), data, fees)
                .await?;
            println!("{:?}", hash);
        }
        Command::Receipt { hash } => match account.bundler().eth_get_user_operation_receipt(hash).await? {
            Some(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
            None => println!("not found"),
        },
        Command::Operation { hash } => match account.bundler().eth_get_user_operation_by_hash(hash).await? {
            Some(operation) => println!("{}", serde_json::to_string_pretty(&operation)?),
            None => println!("not found"),
        },
    }

    Ok(())
}
