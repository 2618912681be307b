use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "profile-cli")]
#[command(about = "Read and update the profile stored by profile-server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stored profile
    Get,
    /// Replace the stored profile; omitted fields are cleared
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        interests: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Get => {
            let res = client.get(format!("{base}/get-profile")).send().await?;
            print_response(res).await?;
        }
        Commands::Update {
            name,
            email,
            interests,
        } => {
            let body: Map<String, Value> = [("name", name), ("email", email), ("interests", interests)]
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key.to_string(), Value::String(v))))
                .collect();
            let res = client
                .post(format!("{base}/update-profile"))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
