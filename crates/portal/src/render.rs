// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for portal commands.
//!
//! Every printer takes a `use_color` flag; callers disable color for
//! `--plain` or when stdout is not a terminal.

use chrono::{DateTime, Utc};
use colored::Colorize;
use portal_chat::{DeliveryState, ThreadMessage};
use portal_core::types::{
    Faq, Invoice, InvoiceStatus, Job, Membership, PaymentIntent, Promotion, ServiceRequest,
    UserProfile,
};
use portal_session::Dashboard;

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn when(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unscheduled".to_string(),
    }
}

pub fn delivery_label(state: &DeliveryState) -> String {
    match state {
        DeliveryState::Pending => "sending".to_string(),
        DeliveryState::Confirmed { id } => format!("#{id}"),
        DeliveryState::Failed { reason } => format!("failed: {reason}"),
    }
}

fn heading(title: &str, use_color: bool) {
    println!();
    if use_color {
        println!("  {}", title.bold());
    } else {
        println!("  {title}");
    }
    println!("  {}", "-".repeat(40));
}

fn empty(what: &str) {
    println!("    (no {what})");
    println!();
}

pub fn print_dashboard(dashboard: &Dashboard, use_color: bool) {
    let greeting = match &dashboard.user {
        Some(user) => format!("Welcome back, {}", user.name),
        None => "Welcome".to_string(),
    };
    heading(&greeting, use_color);

    match &dashboard.next_job {
        Some(job) => println!(
            "    Next service:  {} (job {}, {})",
            when(job.scheduled_at),
            job.id,
            job.status.as_str()
        ),
        None => println!("    Next service:  none scheduled"),
    }

    let balance = money(dashboard.outstanding_balance);
    if use_color && dashboard.open_invoices > 0 {
        println!(
            "    Invoices:      {} open, {} due",
            dashboard.open_invoices.to_string().yellow(),
            balance.yellow()
        );
    } else {
        println!(
            "    Invoices:      {} open, {balance} due",
            dashboard.open_invoices
        );
    }

    match &dashboard.membership {
        Some(m) => println!("    Membership:    {} ({})", m.plan, m.status),
        None => println!("    Membership:    none"),
    }
    if let Some(promo) = &dashboard.latest_promotion {
        println!("    Promotion:     {}", promo.title);
    }
    println!();
}

pub fn print_jobs(jobs: &[Job], use_color: bool) {
    heading("Jobs", use_color);
    if jobs.is_empty() {
        return empty("jobs");
    }
    for job in jobs {
        let status = if use_color && job.status.is_upcoming() {
            job.status.as_str().green().to_string()
        } else {
            job.status.as_str().to_string()
        };
        println!(
            "    {:>6}  {:<10}  {:<22}  {}",
            job.id.0,
            status,
            when(job.scheduled_at),
            job.crm_ref.as_deref().unwrap_or("-")
        );
    }
    println!();
}

pub fn print_invoices(invoices: &[Invoice], use_color: bool) {
    heading("Invoices", use_color);
    if invoices.is_empty() {
        return empty("invoices");
    }
    for invoice in invoices {
        let status = match (&invoice.status, use_color) {
            (InvoiceStatus::Open, true) => invoice.status.as_str().yellow().to_string(),
            (InvoiceStatus::Paid, true) => invoice.status.as_str().green().to_string(),
            _ => invoice.status.as_str().to_string(),
        };
        let job = invoice
            .job_id
            .map(|id| format!("job {id}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {:>6}  {:<8}  {:>10}  {}",
            invoice.id.0,
            status,
            money(invoice.amount_due),
            job
        );
    }
    println!();
}

pub fn print_payment(intent: &PaymentIntent, use_color: bool) {
    heading("Payment started", use_color);
    println!("    Client secret: {}", intent.client_secret);
    println!("    Complete the payment in the payment sheet, then run `portal invoices`.");
    println!();
}

pub fn print_requests(requests: &[ServiceRequest], use_color: bool) {
    heading("Service requests", use_color);
    if requests.is_empty() {
        return empty("service requests");
    }
    for request in requests {
        println!(
            "    {:>6}  {:<10}  {:<18}  {}  {}",
            request.id.0,
            request.status.as_deref().unwrap_or("-"),
            request.category.as_deref().unwrap_or("-"),
            when(request.submitted_at),
            request.description.as_deref().unwrap_or("")
        );
    }
    println!();
}

pub fn print_created_request(request: &ServiceRequest, use_color: bool) {
    heading("Request submitted", use_color);
    println!("    Request {} is {}.", request.id, request.status.as_deref().unwrap_or("submitted"));
    println!();
}

pub fn print_promotions(promotions: &[Promotion], use_color: bool) {
    heading("Promotions", use_color);
    if promotions.is_empty() {
        return empty("promotions");
    }
    for promo in promotions {
        if use_color {
            println!("    {} [{}]", promo.title.bold(), promo.target_segment);
        } else {
            println!("    {} [{}]", promo.title, promo.target_segment);
        }
        println!("      {}", promo.body);
    }
    println!();
}

pub fn print_faqs(faqs: &[Faq], use_color: bool) {
    heading("Frequently asked questions", use_color);
    if faqs.is_empty() {
        return empty("FAQs");
    }
    for faq in faqs {
        println!("    Q: {}", faq.question);
        println!("    A: {}", faq.answer);
        println!();
    }
}

pub fn print_account(user: Option<&UserProfile>, membership: Option<&Membership>, use_color: bool) {
    heading("Account", use_color);
    match user {
        Some(user) => {
            println!("    Name:   {}", user.name);
            println!("    Email:  {}", user.email);
            if let Some(phone) = &user.phone {
                println!("    Phone:  {phone}");
            }
        }
        None => println!("    Profile unavailable"),
    }
    match membership {
        Some(m) => {
            let renews = m
                .renews_at
                .map(|at| format!(", renews {}", at.format("%Y-%m-%d")))
                .unwrap_or_default();
            println!("    Plan:   {} ({}{renews})", m.plan, m.status);
        }
        None => println!("    Plan:   none"),
    }
    println!();
}

pub fn print_thread(job: i64, thread: &[ThreadMessage], use_color: bool) {
    heading(&format!("Messages for job {job}"), use_color);
    if thread.is_empty() {
        return empty("messages");
    }
    for message in thread {
        print_message(message, use_color);
    }
    println!();
}

pub fn print_message(message: &ThreadMessage, use_color: bool) {
    let label = delivery_label(&message.state);
    let label = match (&message.state, use_color) {
        (DeliveryState::Failed { .. }, true) => label.red().to_string(),
        (DeliveryState::Pending, true) => label.dimmed().to_string(),
        _ => label,
    };
    println!("    [{}] {}  ({label})", message.sender, message.text);
}
