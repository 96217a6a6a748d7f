#[tokio::main]
async fn main() -> std::io::Result<()> {
    plant_shop_backend::run().await
}
