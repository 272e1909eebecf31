#[tokio::main]
async fn main() {
    eventflow::run().await;
}
