use clap::Parser;
use phipsi_server::{serve, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .format_timestamp_millis()
        .init();

    config.validate()?;
    log::info!(
        "phipsi-server {} (default entry {}, peptide-bond cutoff {} Å)",
        env!("CARGO_PKG_VERSION"),
        config.defaults.pdb_id,
        config.analysis.peptide_bond_cutoff
    );
    serve(config).await
}
