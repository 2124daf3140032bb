use env_logger::Env;
use safe_tx_params_api::app;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    app::create_app().await
}
