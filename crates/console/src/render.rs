//! Plain-text rendering of screens and records.

use core::fmt::Write as _;

use chrono::NaiveDate;
use clubdesk_auth::View;
use clubdesk_core::{
    Adherent, GeneralStatistics, MonthlyReport, Page, RoleChange, RoleHierarchy, StatusReport,
    Subscription, SubscriptionStatistics,
};

use crate::session::{Screen, Session};

/// Text for a screen that is not a regular view.
pub fn screen(screen: Screen) -> String {
    match screen {
        Screen::Login => "Not logged in. Run `clubdesk login <username>` first.".to_string(),
        Screen::AccessDenied { back_to } => access_denied(back_to),
        Screen::Hidden | Screen::Show(_) => String::new(),
    }
}

pub fn access_denied(back_to: View) -> String {
    format!(
        "Access denied\n\
         You do not have permission to manage members.\n\
         Back to {back_to}: `clubdesk {}`",
        back_command(back_to)
    )
}

fn back_command(view: View) -> &'static str {
    match view {
        View::Profile => "profile show",
        View::Reports => "reports general",
        View::Subscriptions => "subscriptions list",
        View::Users => "users hierarchy",
        View::List | View::Form | View::Details | View::Edit => "members list",
    }
}

pub fn session(session: &Session) -> String {
    if !session.authenticated {
        return "Not logged in.".to_string();
    }
    let subject = session.subject.as_deref().unwrap_or("(unknown)");
    let role = session.role.map_or("(none)", |role| role.as_str());
    format!("{subject} ({role})")
}

pub fn adherent(adherent: &Adherent, today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", adherent.id, adherent.full_name());
    let _ = writeln!(out, "  status:        {}", adherent.status);
    if let Some(reason) = &adherent.suspended_reason {
        let _ = writeln!(out, "  suspended:     {reason}");
    }
    let _ = writeln!(out, "  email:         {}", adherent.email);
    if !adherent.phone_number.is_empty() {
        let _ = writeln!(out, "  phone:         {}", adherent.phone_number);
    }
    let _ = writeln!(out, "  born:          {}", adherent.date_of_birth);

    let locality = [adherent.postal_code.as_deref(), adherent.city.as_deref(), adherent.country.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !adherent.address.is_empty() || !locality.is_empty() {
        let _ = writeln!(out, "  address:       {} {}", adherent.address, locality);
    }

    match &adherent.current_subscription {
        Some(subscription) => {
            let _ = writeln!(
                out,
                "  subscription:  {} until {}",
                subscription.kind, subscription.end_date
            );
        }
        None => {
            let _ = writeln!(out, "  subscription:  none");
        }
    }

    if let Some(expiry) = adherent.medical_certificate_expiry_date {
        let flag = if adherent.certificate_expired(today) { " (expired)" } else { "" };
        let _ = writeln!(out, "  certificate:   valid until {expiry}{flag}");
    }

    out.trim_end().to_string()
}

/// One line per adherent.
pub fn adherent_rows(adherents: &[Adherent]) -> String {
    if adherents.is_empty() {
        return "No members found.".to_string();
    }
    adherents
        .iter()
        .map(|a| format!("{:>6}  {:<28} {:<32} {}", a.id, a.full_name(), a.email, a.status))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn adherent_page(page: &Page<Adherent>) -> String {
    format!("{}\n{}", adherent_rows(&page.content), page_footer(page))
}

fn page_footer<T>(page: &Page<T>) -> String {
    format!(
        "-- page {}/{} ({} total)",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    )
}

pub fn subscription(subscription: &Subscription) -> String {
    let sessions = match subscription.kind.weekly_sessions() {
        Some(n) => format!("{n} sessions/week"),
        None => "unlimited sessions".to_string(),
    };
    let mut line = format!(
        "#{} {} {:.2} ({sessions}) {} → {}",
        subscription.id,
        subscription.kind,
        subscription.price,
        subscription.start_date,
        subscription.end_date
    );
    if subscription.active == Some(false) {
        line.push_str(" [inactive]");
    }
    line
}

pub fn subscription_rows(subscriptions: &[Subscription]) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions found.".to_string();
    }
    subscriptions
        .iter()
        .map(subscription)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn subscription_page(page: &Page<Subscription>) -> String {
    format!("{}\n{}", subscription_rows(&page.content), page_footer(page))
}

pub fn general_statistics(stats: &GeneralStatistics) -> String {
    format!(
        "members:    {}\n\
         active:     {}\n\
         suspended:  {}\n\
         expired:    {}",
        stats.total_adherents, stats.active_adherents, stats.suspended_adherents, stats.expired_adherents
    )
}

pub fn subscription_statistics(stats: &SubscriptionStatistics) -> String {
    let mut out = format!("total revenue: {:.2}", stats.total_revenue);
    for (kind, detail) in &stats.subscription_details {
        let _ = write!(
            out,
            "\n  {kind:<8} {:>4} subscribers at {:.2} = {:.2}",
            detail.subscriber_count, detail.price, detail.revenue
        );
    }
    out
}

pub fn status_report(report: &StatusReport) -> String {
    let mut out = report
        .counts
        .iter()
        .map(|(status, count)| format!("{status:<12} {count}"))
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(at) = report.generated_at {
        let _ = write!(out, "\n-- generated {}", at.format("%Y-%m-%d %H:%M"));
    }
    out
}

pub fn monthly_report(report: &MonthlyReport) -> String {
    format!(
        "{:04}-{:02}: {} new members, {} active",
        report.year, report.month, report.new_adherents, report.active_members
    )
}

pub fn role_hierarchy(hierarchy: &RoleHierarchy) -> String {
    hierarchy
        .iter()
        .map(|(role, inherited)| {
            if inherited.is_empty() {
                role.clone()
            } else {
                format!("{role} → {}", inherited.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn role_history(history: &[RoleChange]) -> String {
    if history.is_empty() {
        return "No role changes recorded.".to_string();
    }
    history
        .iter()
        .map(|change| {
            let when = change
                .changed_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let by = change.changed_by.as_deref().unwrap_or("-");
            let from = change.previous_role.as_deref().unwrap_or("-");
            format!("{when}  {from} → {}  by {by}", change.new_role)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
