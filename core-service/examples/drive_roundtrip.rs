//! Interactive PKCE sign-in followed by a Drive round trip.
//!
//! Run with:
//! ```bash
//! DRIVE_SYNC_CLIENT_ID=... \
//! DRIVE_SYNC_REDIRECT_URI=http://localhost:5173/callback \
//! cargo run -p core-service --example drive_roundtrip
//! ```
//!
//! Open the printed URL, approve access, then paste the `code` query
//! parameter from the redirect.

use core_service::{init_logging, LoggingConfig, SaveOutcome, SyncConfig, SyncService};
use std::io::{self, BufRead, Write};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::from_env()?)?;

    let service = SyncService::desktop(SyncConfig::from_env()?)?;
    let request = service.begin_authorization()?;

    println!("Open this URL and approve access:\n\n{}\n", request.url);
    print!("Authorization code: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().lock().read_line(&mut code)?;

    let tokens = service
        .complete_authorization(code.trim(), &request.pkce.code_verifier)
        .await?;
    info!(expires_in = tokens.expires_in, "Signed in");

    let previous = service.load_dataset(&tokens.access_token).await?;
    println!("Current dataset: {}", previous.as_deref().unwrap_or("<none>"));

    let payload = format!(
        r#"{{"updatedBy":"drive_roundtrip","previousBytes":{}}}"#,
        previous.as_ref().map_or(0, String::len)
    );

    match service.save_dataset(&tokens.access_token, &payload).await? {
        SaveOutcome::Created(file) => println!("Created {} ({})", file.name, file.id),
        SaveOutcome::Updated(file) => println!("Updated {} ({})", file.name, file.id),
    }

    Ok(())
}
