use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use bonus_catalog::catalog::views::{write_csv, BonusCardView, BonusDetailView};
use bonus_catalog::catalog::{
    catalog_router, BonusId, BonusStatus, CatalogPage, CatalogService, Category, Child,
    ChildAgeBracket, Citizenship, DisbursementType, EligibilityEngine, EligibilityProfile,
    FileBackend, FilterCriteria, InMemoryBonusRepository, IseeBracket, KeyValueFavorites,
    Residence,
};
use bonus_catalog::catalog::BonusRepository;
use bonus_catalog::config::AppConfig;
use bonus_catalog::error::AppError;
use bonus_catalog::telemetry;
use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::{Args, Parser, Subcommand, ValueEnum};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

type AppService = CatalogService<InMemoryBonusRepository, KeyValueFavorites<FileBackend>>;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "bonus-catalog",
    about = "Browse Italian government bonuses and check which ones a household qualifies for",
    version
)]
struct Cli {
    /// Dataset file, overrides CATALOG_DATASET
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List bonuses matching the search text and filters
    Search(SearchArgs),
    /// Show every detail of one bonus
    Show {
        /// Bonus identifier, e.g. assegno-unico
        id: String,
    },
    /// List the bonuses a household profile qualifies for
    Eligibility(EligibilityArgs),
    /// Inspect or edit the favorites list
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug, Default)]
struct SearchArgs {
    /// Free text matched against name and description
    #[arg(long, short = 'q', default_value = "")]
    query: String,
    /// Category tag (natalità, famiglia, casa, ...), repeatable
    #[arg(long = "category")]
    categories: Vec<Category>,
    /// Status tag (attivo, in_arrivo, scaduto, ...), repeatable
    #[arg(long)]
    status: Vec<BonusStatus>,
    /// ISEE bracket tag (0-17000, 17000-25000, 25000-40000, 40000+), repeatable
    #[arg(long, value_parser = isee_brackets())]
    isee: Vec<String>,
    /// Disbursement type (una_tantum, mensile, annuale), repeatable
    #[arg(long)]
    disbursement: Vec<DisbursementType>,
    /// Child age bracket (gravidanza, 0-1, 1-3, 3-18, 18-21, disabile), repeatable
    #[arg(long = "child-age")]
    child_ages: Vec<ChildAgeBracket>,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl SearchArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.query.clone(),
            isee: self.isee.clone(),
            categories: self.categories.clone(),
            disbursement: self.disbursement.clone(),
            child_ages: self.child_ages.clone(),
            status: self.status.clone(),
        }
    }
}

fn isee_brackets() -> PossibleValuesParser {
    PossibleValuesParser::new(
        IseeBracket::standard().map(|(tag, label)| PossibleValue::new(tag).help(label)),
    )
}

#[derive(Args, Debug)]
struct EligibilityArgs {
    /// "Italia" or a region name
    #[arg(long, default_value = "Italia")]
    residence: Residence,
    /// Italiana, UE or "Permesso soggiorno"
    #[arg(long, default_value = "Italiana")]
    citizenship: Citizenship,
    #[arg(long)]
    isee: Option<f64>,
    #[arg(long)]
    isee_sociosanitario: Option<f64>,
    #[arg(long)]
    gross_income: Option<f64>,
    /// Applicant age in years
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    household_size: Option<u32>,
    #[arg(long)]
    employment: Option<String>,
    #[arg(long)]
    owns_property: bool,
    /// Someone in the household has a certified disability
    #[arg(long)]
    household_disability: bool,
    /// Child as <bracket> or <bracket>:disabile, repeatable
    #[arg(long = "child")]
    children: Vec<Child>,
    /// Also list the bonuses the profile does not qualify for, with the reason
    #[arg(long)]
    explain: bool,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl EligibilityArgs {
    fn profile(&self) -> EligibilityProfile {
        EligibilityProfile {
            isee: self.isee,
            isee_sociosanitario: self.isee_sociosanitario,
            gross_income: self.gross_income,
            residence: Some(self.residence),
            citizenship: Some(self.citizenship),
            applicant_age: self.age,
            household_size: self.household_size,
            employment_status: self.employment.clone(),
            owns_property: self.owns_property,
            household_disability: self.household_disability,
            children: self.children.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List favorite bonuses in catalog order
    List {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Add or remove a bonus from favorites
    Toggle {
        /// Bonus identifier
        id: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(dataset) = cli.dataset {
        config.catalog.dataset_path = dataset;
    }

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => run_server(config, args).await,
        Command::Search(args) => {
            let service = build_service(&config)?;
            let page = service.search(&args.criteria());
            render_page(&page, args.format)
        }
        Command::Show { id } => {
            let service = build_service(&config)?;
            let detail = service.get(&BonusId(id))?;
            render_detail(&detail);
            Ok(())
        }
        Command::Eligibility(args) => run_eligibility(&config, &args),
        Command::Favorites { command } => {
            let service = build_service(&config)?;
            match command {
                FavoritesCommand::List { format } => {
                    render_page(&service.favorites(&FilterCriteria::default()), format)
                }
                FavoritesCommand::Toggle { id } => {
                    let id = BonusId(id);
                    let favorite = service.toggle_favorite(&id)?;
                    if favorite {
                        println!("{id} aggiunto ai preferiti");
                    } else {
                        println!("{id} rimosso dai preferiti");
                    }
                    Ok(())
                }
            }
        }
    }
}

fn build_service(config: &AppConfig) -> Result<AppService, AppError> {
    let repository = InMemoryBonusRepository::from_path(&config.catalog.dataset_path)?;
    let favorites = KeyValueFavorites::new(FileBackend::new(&config.catalog.favorites_dir));
    Ok(CatalogService::new(
        Arc::new(repository),
        Arc::new(favorites),
        EligibilityEngine::default(),
    ))
}

async fn run_server(mut config: AppConfig, mut args: ServeArgs) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let service = Arc::new(build_service(&config)?);
    let bonus_count = service.repository().all().len();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(catalog_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, bonus = bonus_count, "bonus catalog ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_eligibility(config: &AppConfig, args: &EligibilityArgs) -> Result<(), AppError> {
    let service = build_service(config)?;
    let profile = args.profile();
    let eligible = service.eligible(&profile)?;
    let total = service.repository().all().len();

    match args.format {
        OutputFormat::Json => {
            let payload = if args.explain {
                json!({
                    "eligible": eligible.len(),
                    "total": total,
                    "bonus": eligible,
                    "outcomes": service.evaluate_all(&profile),
                })
            } else {
                json!({ "eligible": eligible.len(), "total": total, "bonus": eligible })
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Csv => {
            let cards = eligible.into_iter().map(|entry| entry.card).collect::<Vec<_>>();
            write_csv(&cards, std::io::stdout().lock())?;
        }
        OutputFormat::Text => {
            println!("Bonus compatibili: {} su {}", eligible.len(), total);
            for entry in &eligible {
                println!(
                    "- {} | {} | {}",
                    entry.card.name,
                    entry.card.amount,
                    entry.outcome.decision.summary()
                );
            }

            if args.explain {
                println!("\nBonus non compatibili");
                for outcome in service.evaluate_all(&profile) {
                    if !outcome.decision.is_eligible() {
                        println!("- {}: {}", outcome.bonus_id, outcome.decision.summary());
                    }
                }
            }
        }
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn render_page(page: &CatalogPage, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(page)?),
        OutputFormat::Csv => write_csv(&page.bonus, std::io::stdout().lock())?,
        OutputFormat::Text => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", page.headline)?;
            for card in &page.bonus {
                writeln!(out, "{}", card_line(card))?;
            }
        }
    }
    Ok(())
}

fn card_line(card: &BonusCardView) -> String {
    let marker = if card.favorite { "*" } else { "-" };
    let mut line = format!(
        "{marker} {} [{}] {} | {} | {}",
        card.name,
        card.id,
        card.status,
        card.amount,
        card.disbursement
    );
    if let Some(isee) = &card.isee {
        line.push_str(&format!(" | ISEE {isee}"));
    }
    if let Some(deadline) = card.deadline {
        line.push_str(&format!(" | scade {}", deadline.format("%d/%m/%Y")));
    }
    line
}

fn render_detail(detail: &BonusDetailView) {
    let card = &detail.card;
    println!("{}{}", card.name, if card.favorite { " (preferito)" } else { "" });
    println!("Stato: {}", card.status);
    println!("Categorie: {}", card.categories.join(", "));
    println!("\n{}", detail.description);

    println!("\nImporto: {} ({})", card.amount, card.disbursement);
    for bracket in &detail.amount_brackets {
        println!("  - {bracket}");
    }
    if let Some(note) = &detail.amount_note {
        println!("  {note}");
    }

    if let Some(isee) = &card.isee {
        println!("\nISEE: {isee}");
        if let Some(note) = &detail.isee_note {
            println!("  {note}");
        }
    }

    println!("\nRequisiti");
    if let Some(citizenship) = &detail.citizenship {
        println!("- Cittadinanza: {citizenship}");
    }
    if let Some(residence) = &detail.residence {
        println!("- Residenza: {residence}");
    }
    if !detail.child_ages.is_empty() {
        println!("- Età figli: {}", detail.child_ages.join(", "));
    }
    for requirement in &detail.other_requirements {
        println!("- {}: {}", requirement.kind, requirement.description);
    }

    if card.deadline.is_some() || detail.deadline_note.is_some() {
        let date = card
            .deadline
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        match &detail.deadline_note {
            Some(note) => println!("\nScadenza: {date} ({note})"),
            None => println!("\nScadenza: {date}"),
        }
    }

    println!("\nCome fare domanda: {}", detail.application.method);
    for document in &detail.application.documents {
        println!("  - {document}");
    }
    if let Some(link) = &detail.application.link {
        println!("  {link}");
    }
    if !detail.compatible_with.is_empty() {
        println!("\nCompatibile con: {}", detail.compatible_with.join(", "));
    }
    if let Some(notes) = &detail.additional_notes {
        println!("\nNote: {notes}");
    }
    println!("\nSito ufficiale: {}", detail.official_link);
}
