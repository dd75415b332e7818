use video_proxy_sdk::GenerateClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = GenerateClient::new("http://localhost:8080");

    let health = client.health().await?;
    println!("Proxy {} is {}", health.version, health.status);

    println!("Requesting video...");
    let outcome = client.generate("a cat playing piano at sunset").await?;
    match (outcome.response.video_url, outcome.response.error) {
        (Some(url), _) => println!("Video ready: {}", url),
        (None, Some(error)) => eprintln!("Generation failed ({}): {}", outcome.status, error),
        (None, None) => eprintln!("Unexpected reply with status {}", outcome.status),
    }

    Ok(())
}
