#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mysqldiff::cli::run().await
}
