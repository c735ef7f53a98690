//! admin-dash CLI
//!
//! Terminal front end over the same session and views as the web server:
//! - Sign in and out
//! - Browse the dashboard, users, analytics and products
//! - Add users and toggle the theme

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use admin_dash::client::ApiResult;
use admin_dash::config::generate_default_config;
use admin_dash::logging::{self, LogOutput};
use admin_dash::views::format::{format_count, format_money, format_percent};
use admin_dash::views::{AnalyticsPage, DashboardPage, ProductsPage, ALL_CATEGORIES};
use admin_dash::{
    ApiClient, Config, Confirmation, DashboardApi, FileStore, GuardDecision, Identity,
    KeyValueStore, NavShell, NewUser, Product, Route, RouteGuard, SessionError, SessionStore,
    Theme, User, UserDirectory, UserStatus, ViewSlot, ViewState,
};

#[derive(Parser)]
#[command(name = "admin-dash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for the admin dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Config file (defaults to the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at the configured level instead of warnings only
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in (falls back to the demo accounts when the API is down)
    Login {
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show who is signed in
    Whoami,

    /// Overview, recent users and top products
    Dashboard,

    /// List users
    Users {
        /// Case-insensitive match on name or email
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a user (kept locally if the API refuses it)
    AddUser {
        name: String,
        email: String,
        /// active or inactive
        #[arg(long, default_value = "active")]
        status: String,
    },

    /// Daily analytics with conversion rates
    Analytics,

    /// List products
    Products {
        /// Case-insensitive match on name
        #[arg(short, long)]
        search: Option<String>,
        /// Exact category, or "all"
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show one product
    Product { id: String },

    /// Toggle light/dark theme
    Theme,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

struct App {
    session: SessionStore,
    api: Arc<dyn DashboardApi>,
    store: Arc<dyn KeyValueStore>,
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_default(cli.config.as_deref())?;
    if !cli.verbose {
        config.logging.level = "warn".to_string();
    }
    logging::init(&config.logging, LogOutput::Stderr);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.storage.path)
            .with_context(|| format!("opening store {}", config.storage.path))?,
    );
    let api: Arc<dyn DashboardApi> = Arc::new(ApiClient::new(config.api.client_config())?);
    let session = SessionStore::new(
        Arc::clone(&store),
        Arc::clone(&api),
        config.auth.token_issuer(),
    );
    session.restore();

    let app = App {
        session,
        api,
        store,
        format: cli.format,
    };

    match cli.command {
        Commands::Login { email, password } => app.login(&email, password).await,
        Commands::Logout { yes } => app.logout(yes),
        Commands::Whoami => app.whoami(),
        Commands::Dashboard => app.dashboard().await,
        Commands::Users { search } => app.users(search.as_deref().unwrap_or("")).await,
        Commands::AddUser {
            name,
            email,
            status,
        } => app.add_user(name, email, &status).await,
        Commands::Analytics => app.analytics().await,
        Commands::Products { search, category } => {
            app.products(
                search.as_deref().unwrap_or(""),
                category.as_deref().unwrap_or(ALL_CATEGORIES),
            )
            .await
        }
        Commands::Product { id } => app.product(&id).await,
        Commands::Theme => app.theme(),
        Commands::Config { .. } => Ok(()),
    }
}

impl App {
    /// Gate for data commands
    fn require_identity(&self) -> anyhow::Result<Identity> {
        match RouteGuard::new(&self.session).decide() {
            GuardDecision::Render(identity) => Ok(identity),
            GuardDecision::Redirect(_) => {
                bail!("Not signed in. Run `admin-dash-cli login <email>` first.")
            }
            GuardDecision::Placeholder => bail!("Session check did not finish"),
        }
    }

    fn header(&self, route: Route, identity: &Identity) {
        if self.format == OutputFormat::Table {
            let shell = NavShell::for_route(route)
                .with_user(&identity.email)
                .with_theme(Theme::load(self.store.as_ref()));
            println!("{}", shell.text_header());
            println!();
        }
    }

    fn print_json(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    async fn login(&self, email: &str, password: Option<String>) -> anyhow::Result<()> {
        let password = match password {
            Some(p) => p,
            None => prompt("Password: ")?,
        };

        match self.session.login(email, &password).await {
            Ok(response) => {
                match self.format {
                    OutputFormat::Json => self.print_json(&json!({
                        "id": response.id,
                        "email": response.email,
                    }))?,
                    OutputFormat::Table => {
                        println!("Signed in as {} (id {})", response.email, response.id)
                    }
                }
                Ok(())
            }
            Err(SessionError::InvalidCredentials) => bail!("Invalid email or password"),
            Err(e) => Err(e.into()),
        }
    }

    fn logout(&self, yes: bool) -> anyhow::Result<()> {
        if !self.session.current().is_authenticated() {
            self.session.logout()?;
            println!("Not signed in.");
            return Ok(());
        }

        let confirm = Confirmation::logout(Route::Dashboard.path());
        if !yes && !ask(&confirm)? {
            println!("{}", confirm.cancel_label);
            return Ok(());
        }

        self.session.logout()?;
        println!("Signed out.");
        Ok(())
    }

    fn whoami(&self) -> anyhow::Result<()> {
        let identity = self.session.identity();
        match self.format {
            OutputFormat::Json => self.print_json(&json!({
                "authenticated": identity.is_some(),
                "id": identity.as_ref().map(|i| &i.id),
                "email": identity.as_ref().map(|i| &i.email),
            })),
            OutputFormat::Table => {
                match identity {
                    Some(identity) => println!("{} (id {})", identity.email, identity.id),
                    None => println!("Not signed in."),
                }
                Ok(())
            }
        }
    }

    async fn dashboard(&self) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        let api = Arc::clone(&self.api);
        let page = load_view("dashboard", async move {
            api.get_dashboard_overview().await.map(DashboardPage::new)
        })
        .await?;

        if self.format == OutputFormat::Json {
            return self.print_json(&json!({
                "overview": page.overview(),
                "recentUsers": page.recent_users(),
                "topProducts": page.top_products(),
            }));
        }

        self.header(Route::Dashboard, &identity);
        let overview = page.overview();
        println!("Total Users:  {}", format_count(overview.total_users));
        println!("Active Users: {}", format_count(overview.active_users));
        println!("Revenue:      {}", format_money(overview.revenue));
        println!("Growth:       {}", format_percent(overview.growth));
        println!();
        println!("Recent Users");
        print_users(page.recent_users().iter());
        println!();
        println!("Top Products");
        print_products(page.top_products().iter());
        Ok(())
    }

    async fn users(&self, search: &str) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        let directory = UserDirectory::new(Arc::clone(&self.api), Arc::clone(&self.store));
        let page = load_view("users", async move { directory.load_page().await }).await?;

        let counts = page.status_counts();
        let users = page.filter(search);

        if self.format == OutputFormat::Json {
            return self.print_json(&json!({
                "total": counts.total,
                "active": counts.active,
                "inactive": counts.inactive,
                "users": users,
            }));
        }

        self.header(Route::Users, &identity);
        println!(
            "Total: {}  Active: {}  Inactive: {}",
            counts.total, counts.active, counts.inactive
        );
        println!();
        if users.is_empty() {
            println!("No users match your search.");
        } else {
            print_users(users.into_iter());
        }
        Ok(())
    }

    async fn add_user(&self, name: String, email: String, status: &str) -> anyhow::Result<()> {
        self.require_identity()?;

        let name = name.trim().to_string();
        let email = email.trim().to_string();
        if name.is_empty() || email.is_empty() {
            bail!("Name and email are required");
        }
        let status: UserStatus = status.parse().map_err(anyhow::Error::msg)?;

        let directory = UserDirectory::new(Arc::clone(&self.api), Arc::clone(&self.store));
        let outcome = directory
            .create(NewUser {
                name,
                email,
                status,
            })
            .await?;

        match self.format {
            OutputFormat::Json => self.print_json(&json!({
                "local": outcome.is_local(),
                "user": outcome.user(),
            }))?,
            OutputFormat::Table if outcome.is_local() => println!(
                "The remote API did not accept the user; saved locally as {}",
                outcome.user().id
            ),
            OutputFormat::Table => println!("Created user {}", outcome.user().id),
        }
        Ok(())
    }

    async fn analytics(&self) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        let api = Arc::clone(&self.api);
        let page = load_view("analytics", async move {
            api.list_analytics().await.map(AnalyticsPage::new)
        })
        .await?;

        let totals = page.totals();
        let rows = page.rows();

        if self.format == OutputFormat::Json {
            let rows: Vec<_> = rows
                .iter()
                .map(|r| {
                    json!({
                        "date": r.date,
                        "views": r.views,
                        "clicks": r.clicks,
                        "conversions": r.conversions,
                        "conversionRate": r.conversion_rate,
                    })
                })
                .collect();
            return self.print_json(&json!({
                "views": totals.views,
                "clicks": totals.clicks,
                "conversions": totals.conversions,
                "conversionRate": totals.conversion_rate,
                "rows": rows,
            }));
        }

        self.header(Route::Analytics, &identity);
        println!(
            "Views: {}  Clicks: {}  Conversions: {}  Rate: {}",
            format_count(totals.views),
            format_count(totals.clicks),
            format_count(totals.conversions),
            format_percent(totals.conversion_rate)
        );
        println!();
        println!(
            "{:<12} {:>10} {:>10} {:>12} {:>10}",
            "Date", "Views", "Clicks", "Conversions", "Rate"
        );
        println!("{}", "-".repeat(58));
        for row in rows {
            println!(
                "{:<12} {:>10} {:>10} {:>12} {:>10}",
                row.date,
                format_count(row.views),
                format_count(row.clicks),
                format_count(row.conversions),
                format_percent(row.conversion_rate)
            );
        }
        Ok(())
    }

    async fn products(&self, search: &str, category: &str) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        let api = Arc::clone(&self.api);
        let page = load_view("products", async move {
            api.list_products().await.map(ProductsPage::new)
        })
        .await?;

        let totals = page.totals();
        let products = page.filter(search, category);

        if self.format == OutputFormat::Json {
            return self.print_json(&json!({
                "products": totals.products,
                "sales": totals.sales,
                "revenue": totals.revenue,
                "categories": page.categories(),
                "items": products,
            }));
        }

        self.header(Route::Products, &identity);
        println!(
            "Products: {}  Sales: {}  Revenue: {}",
            format_count(totals.products as u64),
            format_count(totals.sales),
            format_money(totals.revenue)
        );
        println!("Categories: {}", page.categories().join(", "));
        println!();
        if products.is_empty() {
            println!("No products match your filters.");
        } else {
            print_products(products.into_iter());
        }
        Ok(())
    }

    async fn product(&self, id: &str) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        let api = Arc::clone(&self.api);
        let fetch_id = id.to_string();
        let product = load_view("product", async move { api.get_product(&fetch_id).await }).await?;

        if self.format == OutputFormat::Json {
            return self.print_json(&json!({
                "product": product,
                "revenue": product.revenue(),
            }));
        }

        self.header(Route::Products, &identity);
        println!("{}", product.name);
        println!("  ID:       {}", product.id);
        println!("  Category: {}", product.category);
        println!("  Price:    {}", format_money(product.price));
        println!("  Sales:    {}", format_count(product.sales));
        println!("  Revenue:  {}", format_money(product.revenue()));
        Ok(())
    }

    fn theme(&self) -> anyhow::Result<()> {
        let theme = Theme::toggle(self.store.as_ref())?;
        match self.format {
            OutputFormat::Json => self.print_json(&json!({ "theme": theme.label() })),
            OutputFormat::Table => {
                println!("Theme: {}", theme.label());
                Ok(())
            }
        }
    }
}

/// Mount a view, wait for it, and turn FAILED into an error
///
/// Ctrl+C unmounts the view so a late response is dropped.
async fn load_view<T, F>(what: &str, fetch: F) -> anyhow::Result<T>
where
    T: Clone + Send + 'static,
    F: Future<Output = ApiResult<T>> + Send + 'static,
{
    let mut slot = ViewSlot::new();
    slot.mount(fetch);

    let outcome = tokio::select! {
        state = slot.settled() => Some(state),
        _ = tokio::signal::ctrl_c() => None,
    };
    let Some(state) = outcome else {
        slot.unmount();
        bail!("Interrupted");
    };

    match state {
        ViewState::Ready(data) => Ok(data),
        ViewState::Failed(message) => {
            bail!("Could not load {}: {}. Run the command again to retry.", what, message)
        }
        ViewState::Loading => bail!("Loading {} was cancelled", what),
    }
}

fn print_users<'a>(users: impl Iterator<Item = &'a User>) {
    println!(
        "{:<14} {:<22} {:<30} {:<9} {}",
        "ID", "Name", "Email", "Status", "Joined"
    );
    println!("{}", "-".repeat(88));
    for user in users {
        println!(
            "{:<14} {:<22} {:<30} {:<9} {}",
            truncate(&user.id.to_string(), 14),
            truncate(&user.name, 22),
            truncate(&user.email, 30),
            user.status.as_str(),
            user.join_date.as_deref().unwrap_or("-")
        );
    }
}

fn print_products<'a>(products: impl Iterator<Item = &'a Product>) {
    println!(
        "{:<8} {:<24} {:<14} {:>12} {:>8} {:>14}",
        "ID", "Name", "Category", "Price", "Sales", "Revenue"
    );
    println!("{}", "-".repeat(85));
    for product in products {
        println!(
            "{:<8} {:<24} {:<14} {:>12} {:>8} {:>14}",
            truncate(&product.id.to_string(), 8),
            truncate(&product.name, 24),
            truncate(&product.category, 14),
            format_money(product.price),
            format_count(product.sales),
            format_money(product.revenue())
        );
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn ask(confirm: &Confirmation) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", confirm.message))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
