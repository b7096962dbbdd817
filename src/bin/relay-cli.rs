use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde_json::Value;

use query_relay::relay::lines::LineDecoder;
use query_relay::relay::sse::DATA_PREFIX;
use query_relay::relay::QueryRequest;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for the query relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay health
    Health,
    /// Submit a query and follow its event stream
    Query {
        /// Question to ask
        q: String,
        #[arg(long, default_value_t = 1_000_000)]
        budget: i64,
        #[arg(long, default_value_t = 3)]
        max_bad_attempt: i64,
        /// Print the submission response only
        #[arg(long)]
        no_stream: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Query {
            q,
            budget,
            max_bad_attempt,
            no_stream,
        } => {
            let query = QueryRequest {
                q,
                budget,
                max_bad_attempt,
            };
            let res = client
                .post(format!("{}/api/query", cli.url))
                .json(&query)
                .send()
                .await?;
            let Some(answer) = print_response(res).await? else {
                return Ok(());
            };
            if no_stream {
                return Ok(());
            }
            match answer.get("requestId").and_then(Value::as_str) {
                Some(id) => follow_stream(&client, &cli.url, id).await?,
                None => eprintln!("Error: no requestId in response"),
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(Some(json))
}

/// Print each event payload until the stream ends, a final or error event
/// arrives, or the relay sends its close event.
async fn follow_stream(
    client: &reqwest::Client,
    url: &str,
    request_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let res = client
        .get(format!("{}/api/query", url))
        .query(&[("request_id", request_id)])
        .send()
        .await?;
    if !res.status().is_success() {
        print_response(res).await?;
        return Ok(());
    }

    let mut body = std::pin::pin!(res.bytes_stream());
    let mut decoder = LineDecoder::new();

    while let Some(chunk) = body.next().await {
        for line in decoder.push(&chunk?) {
            if line.starts_with("event:") && line["event:".len()..].trim() == "close" {
                return Ok(());
            }
            let Some(data) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            let data = data.trim_start();
            match serde_json::from_str::<Value>(data) {
                Ok(event) => {
                    println!("{}", event);
                    if matches!(event.get("type").and_then(Value::as_str), Some("final" | "error")) {
                        return Ok(());
                    }
                }
                Err(_) => println!("{}", data),
            }
        }
    }

    Ok(())
}
