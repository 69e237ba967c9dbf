//! Dataset invocation example
//!
//! Signs a sample parameter set, calls the gateway and verifies the signed
//! response.
//!
//! Credentials come from `PLATFORM_APP_ID` / `PLATFORM_SECRET_KEY` (a `.env`
//! file works too); without them the published sample credentials are used.
//! `PLATFORM_GATEWAY_URL` overrides the endpoint.
//!
//! ```bash
//! RUST_LOG=platform_core=debug cargo run --example invoke_gateway
//! ```

use anyhow::{Context, Result};
use platform_sdk::prelude::*;
use serde_json::json;

const SAMPLE_APP_ID: i64 = 7811589334259271;
const SAMPLE_SECRET: &str = "EAUJ6CIKPBMCNW36";
const SAMPLE_DATA_ID: i64 = 12;
const SAMPLE_VERSION: &str = "20200601162222";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&LogConfig::development());

    println!("=== Data Gateway Invocation Example ===\n");

    let credentials = Credentials::from_env().unwrap_or_else(|e| {
        println!("Using sample credentials ({e})");
        Credentials::new(SAMPLE_APP_ID, SAMPLE_SECRET)
    });
    let config = GatewayConfig::from_env();
    println!("Endpoint: {}", config.base_url);

    let params = json!({
        "appId": credentials.app_id,
        "dataId": SAMPLE_DATA_ID,
        "timestamp": SAMPLE_VERSION,
        "name": "布期末库存比年初增减",
        "dbCode": "hgjd",
    });

    // 1. Canonical string and signature, for inspection
    let canonical = canonicalize(&ParameterValue::from(&params), "", &[]);
    let sign = create_sign(&ParameterValue::from(&params), credentials.secret.expose_secret());
    println!("Canonical string: {canonical}");
    println!("Signature: {sign}\n");

    // 2. Full round trip
    let client = Context::context(GatewayClient::new(config, credentials), "failed to build gateway client")?;
    match client.invoke(SAMPLE_DATA_ID, SAMPLE_VERSION, &params).await {
        Ok(Some(body)) => {
            println!("ok");
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(None) => println!("Gateway answered with a non-200 status"),
        Err(e) => println!("Call failed: {}", e.report()),
    }

    let stats = client.invoker().pool_stats();
    println!(
        "\nPool: {} live, {} idle, {} leased",
        stats.live, stats.idle, stats.leased
    );

    client.shutdown().await;
    Ok(())
}
