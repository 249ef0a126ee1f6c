#[tokio::main]
async fn main() -> anyhow::Result<()> {
    casement_lib::run(std::env::args().collect()).await
}
