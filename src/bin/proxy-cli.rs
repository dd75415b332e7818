use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Command-line client for the video generation proxy", long_about = None)]
struct Cli {
    /// Proxy base URL.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a prompt and print the resulting video URL
    Generate {
        /// Text prompt describing the video
        prompt: String,
    },
    /// Check that the proxy is up
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let ok = match cli.command {
        Commands::Generate { prompt } => {
            let res = client
                .post(format!("{}/api/generate", base))
                .json(&json!({ "prompt": prompt }))
                .send()
                .await?;
            print_response(res).await?
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Pretty-print the JSON body; returns whether the status was a success.
async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
    }
    Ok(status.is_success())
}
