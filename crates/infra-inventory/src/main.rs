use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    infra_inventory::server::run().await
}
