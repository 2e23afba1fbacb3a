//! `wework-portal` command line client.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, bail};

use wework_portal::routes::LOGIN_ERROR_MESSAGE;
use wework_portal::{
    AuthController, AuthError, HeaderView, HttpGateway, Notification, Notifier, PortalConfig,
    SqliteSessionStore, TracingNotifier,
};

const USAGE: &str = "usage: wework-portal <status | login <loginId> | logout | me>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wework_observability::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = PortalConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url, session_db = %config.session_db_path.display(), "loaded config");

    let gateway = Arc::new(HttpGateway::from_config(&config)?);
    let store = Arc::new(SqliteSessionStore::new(config.session_db_path.clone()));
    let controller = AuthController::new(gateway, store);
    let notifier = TracingNotifier;

    controller.restore_session().await?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["status"] | [] => print_status(&controller)?,
        ["login", login_id] => {
            let password = read_password()?;
            match controller.login(login_id, &password).await {
                Ok(profile) => {
                    notifier.notify(Notification::success(format!("Signed in as {}.", profile.name)));
                    print_status(&controller)?;
                }
                Err(AuthError::MissingCredentials) => {
                    notifier.notify(Notification::warn("Enter your login ID and password."));
                    bail!("missing credentials");
                }
                Err(err) => {
                    notifier.notify(Notification::error(LOGIN_ERROR_MESSAGE));
                    return Err(err).context("login failed");
                }
            }
        }
        ["logout"] => {
            controller.logout().await?;
            notifier.notify(Notification::info("Signed out."));
        }
        ["me"] => {
            let Some(profile) = controller.profile() else {
                bail!("not signed in");
            };
            println!("{}", serde_json::to_string_pretty(&*profile)?);
            let authorities = controller.fetch_authorities().await?;
            println!("{}", serde_json::to_string_pretty(&authorities)?);
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

fn print_status(controller: &AuthController) -> anyhow::Result<()> {
    let snapshot = controller.snapshot();
    let header = snapshot.profile.as_deref().map(HeaderView::from_profile);
    let status = serde_json::json!({
        "phase": snapshot.phase,
        "header": header,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn read_password() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
