use clap::Parser;
use env_logger::Env;
use safe_tx_params_api::{
    app,
    handlers::{parse_address, parse_opt_address},
    models::tx_parameters::ParametersStatus,
    services::tx_parameters::ResolveRequest,
};

/// Resolves transaction parameters for a Safe against the configured node and
/// backends, and prints them as JSON.
#[derive(Parser, Debug)]
#[command(name = "resolve_params", version)]
struct Cli {
    #[arg(long, value_name = "ADDRESS")]
    safe: String,

    #[arg(long, value_name = "ADDRESS", help = "connected wallet whose nonce is fetched")]
    wallet: Option<String>,

    #[arg(long, help = "resolve for a cancel transaction")]
    cancel: bool,

    #[arg(long, help = "skip the Safe nonce lookup")]
    no_safe_nonce: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let safe = parse_address(&cli.safe, "safe address").map_err(|err| anyhow::anyhow!("{}", err))?;
    let wallet =
        parse_opt_address(cli.wallet.as_deref(), "wallet address").map_err(|err| anyhow::anyhow!("{}", err))?;

    let (tx_parameters_srv, _) = app::build_services()?;
    let params = tx_parameters_srv
        .resolve(ResolveRequest {
            wallet,
            safe,
            status: if cli.cancel {
                ParametersStatus::CancelTransaction
            } else {
                ParametersStatus::Enabled
            },
            calculate_safe_nonce: !cli.no_safe_nonce,
            ..Default::default()
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}
