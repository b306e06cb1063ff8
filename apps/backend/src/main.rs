#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flipdeck_backend::run().await
}
