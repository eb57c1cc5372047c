//! Generate and persist a weekly journal summary for every user.

use mindspace_jobs::config::JobConfig;
use mindspace_jobs::firestore::{FirestoreClient, ServiceAccountKey};
use mindspace_jobs::llm::GeminiClient;
use mindspace_jobs::store::FirestoreUserStore;
use mindspace_jobs::summary::SummaryJob;

fn main() {
    dotenvy::dotenv().ok();
    mindspace_jobs::init_tracing();

    if let Err(e) = run() {
        tracing::error!(error = %e, "Summary run failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = JobConfig::from_env()?;
    let key = ServiceAccountKey::from_file(&config.credentials_path)?;
    let project_id = config
        .project_id
        .clone()
        .unwrap_or_else(|| key.project_id.clone());

    let client = FirestoreClient::new(key, project_id, config.http_timeout_secs)?;
    let users = FirestoreUserStore::new(client, &config.users_collection);
    let llm = GeminiClient::new(&config.gemini_api_key, config.llm_timeout_secs);

    SummaryJob::new(
        &users,
        &llm,
        &config.summary_model,
        config.journal_read_failure,
    )
    .run()?;
    Ok(())
}
