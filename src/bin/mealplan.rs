use clap::Parser;
use colored::*;
use mealplan::plan::flatten;
use mealplan::planner::PlannerBuilder;
use mealplan::prompt::PlanRequest;
use mealplan::render::text_table;
use mealplan::secret_store::{SecretStore, GEMINI_API_KEY};
use spinners::{Spinner, Spinners};

/// Command line arguments for the meal plan CLI
#[derive(Parser)]
#[clap(
    name = "mealplan",
    about = "Generate structured 7-day meal plans with the Gemini API"
)]
struct CliArgs {
    /// Command to execute (plan, set, get, delete)
    #[arg(index = 1)]
    command: Option<String>,

    /// Secret key for set/get/delete commands
    #[arg(index = 2)]
    key: Option<String>,

    /// Secret value for the set command
    #[arg(index = 3)]
    value: Option<String>,

    /// Diet type, e.g. "Keto", "Vegan", "Gluten-Free"
    #[arg(long, default_value = "Balanced")]
    diet: String,

    /// Daily calorie target
    #[arg(long, default_value_t = 2000)]
    calories: u32,

    /// Specific preferences or dislikes
    #[arg(long)]
    preferences: Option<String>,

    /// Preferred cuisine
    #[arg(long)]
    cuisine: Option<String>,

    /// Allergen to avoid (repeatable)
    #[arg(long = "allergen")]
    allergens: Vec<String>,

    /// Model name to use
    #[arg(long)]
    model: Option<String>,

    /// API key (falls back to GEMINI_API_KEY env, then the secret store)
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL for the API
    #[arg(long)]
    base_url: Option<String>,

    /// Temperature setting (0.0-1.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum retry attempts for transient API failures
    #[arg(long, default_value_t = 3)]
    attempts: usize,
}

/// Resolves the API key: flag, then environment, then secret store.
fn resolve_api_key(args: &CliArgs, store: Option<&SecretStore>) -> Option<String> {
    if let Some(key) = &args.api_key {
        return Some(key.clone());
    }
    if let Ok(key) = std::env::var(GEMINI_API_KEY) {
        if !key.is_empty() {
            return Some(key);
        }
    }
    store.and_then(|s| s.get(GEMINI_API_KEY).cloned())
}

/// Handles the secret management commands (set/get/delete).
fn handle_secret_command(command: &str, args: &CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SecretStore::new()?;
    let key = args
        .key
        .as_deref()
        .ok_or("Missing secret key. Usage: mealplan set|get|delete <KEY> [VALUE]")?;
    match command {
        "set" => {
            let value = args
                .value
                .as_deref()
                .ok_or("Missing secret value. Usage: mealplan set <KEY> <VALUE>")?;
            store.set(key, value)?;
            println!("{} {}", "Stored secret".green(), key.bold());
        }
        "get" => match store.get(key) {
            Some(value) => println!("{value}"),
            None => println!("{}", format!("No secret stored for {key}").yellow()),
        },
        "delete" => {
            store.delete(key)?;
            println!("{} {}", "Deleted secret".green(), key.bold());
        }
        _ => unreachable!(),
    }
    Ok(())
}

async fn run_plan(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = SecretStore::new().ok();
    let Some(api_key) = resolve_api_key(&args, store.as_ref()) else {
        eprintln!(
            "{}",
            "No API key found. Pass --api-key, set GEMINI_API_KEY, or run:\n  mealplan set GEMINI_API_KEY <your-key>"
                .red()
        );
        std::process::exit(1);
    };

    let model = args
        .model
        .clone()
        .or_else(|| store.as_ref().and_then(|s| s.get_default_model().cloned()));

    let mut builder = PlannerBuilder::new()
        .api_key(api_key)
        .resilient_attempts(args.attempts);
    if let Some(model) = model {
        builder = builder.model(model);
    }
    if let Some(base_url) = &args.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(temperature) = args.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(timeout) = args.timeout {
        builder = builder.timeout_seconds(timeout);
    }
    let planner = builder.build()?;

    let request = PlanRequest {
        diet: args.diet,
        daily_calories: args.calories,
        preferences: args.preferences,
        cuisine: args.cuisine,
        allergens: args.allergens,
    };

    let mut spinner = Spinner::new(Spinners::Dots12, "Generating and structuring plan...".into());
    let result = planner.generate_plan(&request).await;
    spinner.stop_with_newline();

    match result {
        Ok(plan) => {
            println!("{}", "Generated 7-Day Structured Meal Plan".green().bold());
            println!();
            println!("{}", text_table(&flatten(&plan)));
            println!();
            for day in &plan.days {
                println!(
                    "{} {}",
                    format!("{}:", day.day()).bold(),
                    format!("{} kcal", day.total_calories())
                );
            }
            Ok(())
        }
        Err(e) => {
            if let mealplan::error::MealPlanError::JsonError { raw_text, .. } = &e {
                eprintln!("{}", "Model returned non-JSON data:".red());
                eprintln!("{raw_text}");
            }
            Err(Box::new(e))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    mealplan::init_logging();
    let args = CliArgs::parse();

    let command = args.command.clone();
    match command.as_deref() {
        Some(cmd @ ("set" | "get" | "delete")) => handle_secret_command(cmd, &args),
        Some("plan") | None => run_plan(args).await,
        Some(other) => {
            eprintln!(
                "{}",
                format!("Unknown command: {other}. Expected plan, set, get or delete.").red()
            );
            std::process::exit(2);
        }
    }
}
