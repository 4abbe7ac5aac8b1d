// Demo client: the two calls from the original quick-start, against a running gateway.
//
//   MCP_SERVER_URL=http://localhost:3000 cargo run --bin gateway-client

use serde_json::json;

use mcp_gateway::client::GatewayClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let url = std::env::var("MCP_SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = GatewayClient::new(url);

    let sum = client.call_tool("calculator", "add", vec![json!(5), json!(3)]).await?;
    println!("5 + 3 = {}", sum);

    let weather = client
        .call_tool("weather", "getTemperature", vec![json!("서울")])
        .await?;
    println!("{}", weather.as_str().unwrap_or_default());

    Ok(())
}
