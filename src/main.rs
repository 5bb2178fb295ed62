#[tokio::main]
async fn main() {
    setlist_backend::run().await;
}
