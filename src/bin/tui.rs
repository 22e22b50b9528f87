use anyhow::{Result, bail};
use clap::Parser;
use mealprep::client::ApiClient;
use mealprep::config::Config;
use mealprep::model::{MealPlan, UserId};
use mealprep::source::{DemoSource, MealPlanSource, accessible_plans};
use mealprep::week::format_range;

#[derive(Parser)]
#[command(name = "mealprep")]
#[command(about = "Browse a shared weekly meal plan in the terminal", long_about = None)]
struct Cli {
    /// Meal plan to open (defaults to `default_meal_plan` from the config)
    #[arg(long)]
    plan: Option<u64>,

    /// Use the built-in demo data instead of the API
    #[arg(long)]
    demo: bool,

    /// API base URL (overrides config file)
    #[arg(long)]
    url: Option<String>,

    /// Bearer token (overrides config file)
    #[arg(long)]
    token: Option<String>,

    /// Accept self-signed certificates
    #[arg(long)]
    insecure: bool,

    /// Print the plans accessible to `--user` and exit
    #[arg(long, requires = "user")]
    list: bool,

    /// User id for `--list`
    #[arg(long)]
    user: Option<UserId>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --- CONFIGURATION LOGIC ---
    // Try to load from file, fallback to defaults plus args
    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("{:#}; using defaults", e);
        let mut config = Config::default();
        config.apply_base_url_override(std::env::var(mealprep::config::BASE_URL_ENV).ok());
        config
    });
    if let Some(url) = cli.url {
        config.api_base_url = url;
    }
    if let Some(token) = cli.token {
        config.access_token = Some(token);
    }
    config.allow_insecure_certs |= cli.insecure;
    config.demo |= cli.demo;

    mealprep::logging::init("info")?;

    if cli.list {
        let Some(user) = cli.user else {
            bail!("--list needs --user");
        };
        let plans = if config.demo {
            list_plans(&DemoSource::new(), user).await?
        } else {
            let client = ApiClient::new(
                &config.api_base_url,
                config.access_token.as_deref(),
                config.allow_insecure_certs,
            )?
            .with_timeout(config.request_timeout());
            list_plans(&client, user).await?
        };
        if plans.is_empty() {
            println!("No meal plans for user {}", user);
        }
        for plan in plans {
            println!(
                "{:>4}  {:<32} {}",
                plan.id,
                plan.title,
                format_range(plan.start_date, plan.end_date)
            );
        }
        return Ok(());
    }

    let plan_id = cli.plan.unwrap_or(config.default_meal_plan);
    mealprep::tui::run(config, plan_id).await
}

async fn list_plans<S: MealPlanSource>(source: &S, user: UserId) -> Result<Vec<MealPlan>> {
    Ok(accessible_plans(source, user).await?)
}
