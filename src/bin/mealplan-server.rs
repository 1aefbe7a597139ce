use clap::Parser;
use mealplan::api::Server;
use mealplan::planner::PlannerBuilder;
use mealplan::secret_store::{SecretStore, GEMINI_API_KEY};

/// Command line arguments for the meal plan web server
#[derive(Parser)]
#[clap(
    name = "mealplan-server",
    about = "Server-rendered web app for generating structured meal plans"
)]
struct ServerArgs {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Model name to use
    #[arg(long)]
    model: Option<String>,

    /// API key (falls back to GEMINI_API_KEY env, then the secret store)
    #[arg(long)]
    api_key: Option<String>,

    /// Temperature setting (0.0-1.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Maximum retry attempts for transient API failures
    #[arg(long, default_value_t = 3)]
    attempts: usize,
}

fn resolve_api_key(flag: Option<String>, store: Option<&SecretStore>) -> Option<String> {
    if let Some(key) = flag {
        return Some(key);
    }
    if let Ok(key) = std::env::var(GEMINI_API_KEY) {
        if !key.is_empty() {
            return Some(key);
        }
    }
    store.and_then(|s| s.get(GEMINI_API_KEY).cloned())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    mealplan::init_logging();
    let args = ServerArgs::parse();

    let store = SecretStore::new().ok();
    let Some(api_key) = resolve_api_key(args.api_key.clone(), store.as_ref()) else {
        eprintln!(
            "No API key found. Pass --api-key, set GEMINI_API_KEY, or run:\n  mealplan set GEMINI_API_KEY <your-key>"
        );
        std::process::exit(1);
    };

    let model = args
        .model
        .or_else(|| store.as_ref().and_then(|s| s.get_default_model().cloned()));

    let mut builder = PlannerBuilder::new()
        .api_key(api_key)
        .timeout_seconds(args.timeout)
        .resilient_attempts(args.attempts);
    if let Some(model) = model {
        builder = builder.model(model);
    }
    if let Some(temperature) = args.temperature {
        builder = builder.temperature(temperature);
    }
    let planner = builder.build()?;

    Server::new(planner).run(&args.addr).await?;
    Ok(())
}
