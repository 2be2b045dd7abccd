// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Portal - terminal client for the customer service portal.
//!
//! Each invocation starts a session against the configured backend, runs
//! one command, and ends the session.

mod render;

use std::io::IsTerminal;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use portal_core::types::{InvoiceId, ServiceCategory};
use portal_core::{JobId, PortalError, ResourceKind, SenderRole};
use portal_session::Session;
use strum::IntoEnumIterator;

/// Portal - terminal client for the customer service portal.
#[derive(Parser, Debug)]
#[command(name = "portal", version, about, long_about = None)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the home dashboard (refreshes everything).
    Dashboard,
    /// List your jobs.
    Jobs,
    /// List your invoices.
    Invoices,
    /// Start paying an invoice.
    Pay {
        /// Invoice id.
        invoice_id: i64,
    },
    /// Submit a service request.
    Request {
        /// One of: crawlspace_repairs, structural_repairs, waterproofing,
        /// mold_remediation, attic_solutions.
        #[arg(value_parser = parse_category)]
        category: ServiceCategory,
        /// What needs attention.
        description: String,
    },
    /// List submitted service requests.
    Requests,
    /// Show current promotions.
    Promos,
    /// Show frequently asked questions.
    Faqs,
    /// Show your profile and membership.
    Account,
    /// Show the message thread for a job.
    Thread {
        job_id: i64,
    },
    /// Send a message on a job's thread.
    Send {
        job_id: i64,
        text: String,
        /// Send as staff instead of as the customer.
        #[arg(long)]
        staff: bool,
    },
}

fn parse_category(raw: &str) -> Result<ServiceCategory, String> {
    ServiceCategory::from_str(raw).map_err(|_| {
        let valid: Vec<String> = ServiceCategory::iter().map(|c| c.to_string()).collect();
        format!("unknown category `{raw}`; expected one of: {}", valid.join(", "))
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match portal_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            portal_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.level);

    let Some(command) = cli.command else {
        println!("portal: use --help for available commands");
        return;
    };
    let use_color = !cli.plain && std::io::stdout().is_terminal();
    tracing::debug!(?command, base_url = %config.api.base_url, "running command");

    let session = match Session::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            report(&e, use_color);
            std::process::exit(1);
        }
    };

    let outcome = run(&session, command, use_color).await;
    session.end();

    if let Err(e) = outcome {
        report(&e, use_color);
        std::process::exit(1);
    }
}

async fn run(session: &Session, command: Commands, use_color: bool) -> Result<(), PortalError> {
    let cache = session.cache();
    match command {
        Commands::Dashboard => {
            // Partial data is still worth showing; failures were logged.
            session.refresh_all().await;
            render::print_dashboard(&session.dashboard(), use_color);
        }
        Commands::Jobs => {
            cache.refresh(ResourceKind::Jobs).await?;
            render::print_jobs(&cache.jobs(), use_color);
        }
        Commands::Invoices => {
            cache.refresh(ResourceKind::Invoices).await?;
            render::print_invoices(&cache.invoices(), use_color);
        }
        Commands::Pay { invoice_id } => {
            let intent = session.pay_invoice(InvoiceId(invoice_id)).await?;
            render::print_payment(&intent, use_color);
        }
        Commands::Request {
            category,
            description,
        } => {
            let created = session.submit_request(category, &description).await?;
            render::print_created_request(&created, use_color);
        }
        Commands::Requests => {
            cache.refresh(ResourceKind::Requests).await?;
            render::print_requests(&cache.requests(), use_color);
        }
        Commands::Promos => {
            cache.refresh(ResourceKind::Promotions).await?;
            render::print_promotions(&cache.promotions(), use_color);
        }
        Commands::Faqs => {
            cache.refresh(ResourceKind::Faqs).await?;
            render::print_faqs(&cache.faqs(), use_color);
        }
        Commands::Account => {
            let (user, membership) = tokio::join!(
                cache.refresh(ResourceKind::User),
                cache.refresh(ResourceKind::Membership),
            );
            user?;
            membership?;
            render::print_account(
                cache.user().as_deref(),
                cache.membership().as_deref(),
                use_color,
            );
        }
        Commands::Thread { job_id } => {
            let thread = session.threads().load(JobId(job_id)).await?;
            render::print_thread(job_id, &thread, use_color);
        }
        Commands::Send {
            job_id,
            text,
            staff,
        } => {
            let sender = if staff {
                SenderRole::Staff
            } else {
                SenderRole::Customer
            };
            let delivery = session.threads().send(JobId(job_id), sender, &text)?;
            let local_id = delivery.local_id();
            let state = delivery.settled().await?;

            let thread = session.threads().thread(JobId(job_id));
            if let Some(message) = thread.iter().find(|m| m.local_id == local_id) {
                render::print_message(message, use_color);
            }
            if let portal_chat::DeliveryState::Failed { reason } = state {
                return Err(PortalError::Internal(format!("message not delivered: {reason}")));
            }
        }
    }
    Ok(())
}

fn report(error: &PortalError, use_color: bool) {
    if use_color {
        use colored::Colorize;
        eprintln!("{} {error}", "error:".red().bold());
    } else {
        eprintln!("error: {error}");
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("portal={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
