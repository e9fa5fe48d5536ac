use anyhow::Context;
use shared::ApiResponse;
use tiffin_ledger::auth::Actor;
use tiffin_ledger::core::{Config, ServerState};
use tiffin_ledger::utils::logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    logger::init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );

    tracing::info!(
        work_dir = %config.work_dir,
        database = %config.database_path,
        timezone = %config.timezone,
        environment = %config.environment,
        "Starting tiffin ledger"
    );
    if config.operator_secret.is_none() {
        tracing::info!("OPERATOR_SECRET unset, operator self-registration disabled");
    }

    let state = ServerState::initialize(config)
        .await
        .context("failed to initialize ledger state")?;
    state.seed_operator().await.context("failed to seed operator")?;

    let operator = state
        .accounts
        .first_operator()
        .await?
        .context("no operator account after seeding")?;
    let stats = state.reconcile.admin_stats(Actor::new(operator.id)).await;
    match &stats {
        Ok(stats) => tracing::info!(
            month = %stats.month,
            active_subscribers = stats.active_subscribers,
            pending_approvals = stats.pending_approvals,
            pending_deliveries = stats.pending_deliveries,
            total_offerings = stats.total_offerings,
            today_published = stats.today_published,
            month_revenue = stats.month_revenue,
            total_revenue = stats.total_revenue,
            "Ledger ready"
        ),
        Err(err) => tracing::error!(
            code = err.code.code(),
            category = err.code.category().name(),
            error = %err,
            "Failed to compute stats"
        ),
    }

    // Dashboard snapshot on stdout, success or failure
    let envelope = ApiResponse::from(stats);
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    state.db.pool.close().await;
    if envelope.kind.is_some() {
        anyhow::bail!("failed to compute stats: {}", envelope.message);
    }
    Ok(())
}
