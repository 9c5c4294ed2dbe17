//! formwright CLI
//!
//! Command-line front end for the dynamic form backend: inspect the fields a
//! category adds, fill in and submit a record, create categories and search
//! records.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use formwright_client::config::DEFAULT_BACKEND_URL;
use formwright_client::{
    CatalogClient, ClientConfig, ControllerError, FormSession, HttpBackend, Phase, Settled,
};
use formwright_core::{CategoryDraft, CategoryId, DraftField, SearchQuery};

/// Dynamic form client.
#[derive(Parser)]
#[command(name = "formwright")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL.
    #[arg(short, long, env = "FORMWRIGHT_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// How long the success indicator stays up, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    success_display_ms: u64,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the fields of the form.
    Fields {
        /// Include the fields of this category.
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Fill in the form and submit it.
    Submit {
        /// Category of the record.
        #[arg(short, long)]
        category: Option<String>,

        /// Field value as `key=value`; repeatable.
        #[arg(short, long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },

    /// Create a category.
    CreateCategory {
        /// Category name.
        #[arg(short, long)]
        name: String,

        /// Attribute as `name:type[:required]`; repeatable.
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Search records.
    Search {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        age: String,
        #[arg(long, default_value = "")]
        gender: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        category: String,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ClientConfig::new(cli.backend_url)
        .success_display(Duration::from_millis(cli.success_display_ms));
    let backend = HttpBackend::new(&config).context("invalid backend URL")?;

    match cli.command {
        Commands::Fields { category } => {
            let session = open_form(backend, &config, category).await?;
            let form = session.controller();

            println!("\n{:<24} {:<20} {:<10} {}", "KEY", "LABEL", "TYPE", "REQUIRED");
            println!("{:-<64}", "");
            for field in form.registry() {
                println!(
                    "{:<24} {:<20} {:<10} {}",
                    field.key,
                    field.label,
                    field.kind,
                    if field.required { "yes" } else { "" }
                );
                for option in &field.options {
                    println!("{:<24}   - {} ({})", "", option.label, option.value);
                }
            }
            println!();
        }

        Commands::Submit { category, values } => {
            let mut session = open_form(backend, &config, category).await?;

            for (key, value) in values {
                session
                    .change_field(&key, value)
                    .with_context(|| format!("cannot set `{key}`"))?;
            }

            match session.submit() {
                Ok(()) => {}
                Err(ControllerError::ValidationFailed(errors)) => {
                    eprint!("{errors}");
                    bail!("form has {} invalid field(s)", errors.len());
                }
                Err(e) => return Err(e.into()),
            }

            session
                .settle_until(|s| matches!(s, Settled::Submission(_)))
                .await;

            let form = session.controller();
            match form.phase() {
                Phase::SubmitSucceeded => {
                    info!("Form submitted successfully!");
                    if let Some(receipt) = form.last_receipt() {
                        println!("{}", serde_json::to_string_pretty(&receipt.response)?);
                    }
                }
                _ => bail!(
                    "{}",
                    form.submit_failure().unwrap_or("form submission failed")
                ),
            }
        }

        Commands::CreateCategory { name, fields } => {
            let draft = fields
                .iter()
                .map(|f| DraftField::parse(f))
                .fold(CategoryDraft::new(name), CategoryDraft::field);

            let catalog = CatalogClient::new(Arc::new(backend));
            let response = catalog.create_category(&draft).await?;
            info!(category = %draft.name, "Category created successfully");
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Search {
            name,
            age,
            gender,
            email,
            address,
            category,
        } => {
            let query = SearchQuery {
                name,
                age,
                gender,
                email,
                address,
                category,
            };
            let catalog = CatalogClient::new(Arc::new(backend));
            let users = catalog.search(&query).await?;

            if users.is_empty() {
                info!("No records found.");
            } else {
                println!("{}", serde_json::to_string_pretty(&users)?);
            }
        }
    }

    Ok(())
}

/// Loads the schemas and, if given, the fields of `category`.
async fn open_form(
    backend: HttpBackend,
    config: &ClientConfig,
    category: Option<String>,
) -> anyhow::Result<FormSession<HttpBackend>> {
    let mut session = FormSession::new(backend, config);
    session.start();
    session.settle().await;

    let form = session.controller();
    for error in [form.basic_fields().error(), form.categories().error()]
        .into_iter()
        .flatten()
    {
        warn!("{error}");
    }

    if let Some(category) = category {
        session.select_category(Some(CategoryId::new(category)))?;
        session.settle().await;
        if let Some(error) = session.controller().category_fields().error() {
            bail!("{error}");
        }
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("name=Jane Doe"),
            Ok(("name".to_string(), "Jane Doe".to_string()))
        );
        assert_eq!(
            parse_assignment("address=a=b"),
            Ok(("address".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_assignment("age="),
            Ok(("age".to_string(), String::new()))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_cli_parses_repeated_options() {
        let cli = Cli::try_parse_from([
            "formwright",
            "submit",
            "--category",
            "3",
            "--set",
            "name=Jane",
            "--set",
            "gender=female",
        ])
        .unwrap();
        assert_eq!(cli.backend_url, DEFAULT_BACKEND_URL);
        match cli.command {
            Commands::Submit { category, values } => {
                assert_eq!(category.as_deref(), Some("3"));
                assert_eq!(values.len(), 2);
            }
            _ => panic!("expected submit"),
        }
    }
}
