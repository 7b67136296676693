//! Token manager walkthrough
//!
//! Run with: `RUST_LOG=sk_core=debug cargo run -p sk_core --example token_manager_demo`
//! Reads `JWT_*` variables from the environment or a `.env` file.

use sk_core::TokenManager;
use sk_shared::JwtConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = JwtConfig::from_env();
    let manager = TokenManager::from_config(&config)?;
    tracing::info!(?manager, "Token manager ready");

    let pair = manager.generate_token_pair("u1", "admin")?;
    tracing::info!(
        access_expires_in = pair.access_expires_in,
        refresh_expires_at = %pair.refresh_expires_at,
        "Issued token pair"
    );

    let claims = manager.parse_access_token(&pair.access_token)?;
    tracing::info!(
        user_id = %claims.user_id,
        user_role = %claims.user_role,
        "Access token verified"
    );

    let mut tampered = pair.access_token.clone();
    tampered.push('x');
    match manager.parse_access_token(&tampered) {
        Ok(_) => tracing::error!("Tampered token was accepted"),
        Err(e) => tracing::info!(error = %e, "Tampered token rejected"),
    }

    Ok(())
}
