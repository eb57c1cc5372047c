//! Moderate every unverified post: classify with the model, then mark clean
//! posts verified in place or move flagged ones to the flagged collection.

use mindspace_jobs::config::JobConfig;
use mindspace_jobs::firestore::{FirestoreClient, ServiceAccountKey};
use mindspace_jobs::llm::GeminiClient;
use mindspace_jobs::moderation::ModerationJob;
use mindspace_jobs::store::FirestorePostStore;

fn main() {
    dotenvy::dotenv().ok();
    mindspace_jobs::init_tracing();

    if let Err(e) = run() {
        tracing::error!(error = %e, "Moderation run failed");
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
    let posts = FirestorePostStore::new(
        client,
        &config.posts_collection,
        &config.flagged_collection,
    );
    let llm = GeminiClient::new(&config.gemini_api_key, config.llm_timeout_secs);

    ModerationJob::new(&posts, &llm, &config.moderation_model).run()?;
    Ok(())
}
