use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = chain_proxy::cli::Cli::parse();
    if let Err(e) = chain_proxy::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
