//! Email bodies for member notifications.

use crate::ports::{Notification, PlanChangeNotice, WelcomeNotice};

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Renders the subject and bodies for `notification`.
pub fn render(notification: &Notification) -> EmailMessage {
    match notification {
        Notification::Welcome(n) => welcome(n),
        Notification::PlanChanged(n) => plan_changed(n),
    }
}

fn welcome(n: &WelcomeNotice) -> EmailMessage {
    let phone = n.phone.as_deref().unwrap_or("-");
    let text = format!(
        "Hi {name},\n\n\
         Welcome to the gym! Your membership is set up.\n\n\
         Plan: {plan}\n\
         Start date: {start}\n\
         End date: {end}\n\
         Fees paid: {fees}\n\
         Status: {status}\n\
         Age: {age}\n\
         Phone: {phone}\n\n\
         See you on the floor.",
        name = n.name,
        plan = n.plan_name,
        start = n.start_date,
        end = n.end_date,
        fees = n.fees_paid,
        status = n.status,
        age = n.age,
        phone = phone,
    );
    let html = format!(
        "<p>Hi {name},</p>\
         <p>Welcome to the gym! Your membership is set up.</p>\
         <table>\
         <tr><td>Plan</td><td>{plan}</td></tr>\
         <tr><td>Start date</td><td>{start}</td></tr>\
         <tr><td>End date</td><td>{end}</td></tr>\
         <tr><td>Fees paid</td><td>{fees}</td></tr>\
         <tr><td>Status</td><td>{status}</td></tr>\
         </table>\
         <p>See you on the floor.</p>",
        name = escape(&n.name),
        plan = escape(&n.plan_name),
        start = n.start_date,
        end = n.end_date,
        fees = n.fees_paid,
        status = n.status,
    );
    EmailMessage {
        subject: "Welcome to the gym".to_string(),
        text,
        html,
    }
}

fn plan_changed(n: &PlanChangeNotice) -> EmailMessage {
    let text = format!(
        "Hi {name},\n\n\
         Your membership plan changed from {from} to {to} on {date}.\n\
         A new membership period has started on the new plan.",
        name = n.name,
        from = n.from_plan,
        to = n.to_plan,
        date = n.changed_on,
    );
    let html = format!(
        "<p>Hi {name},</p>\
         <p>Your membership plan changed from <strong>{from}</strong> to \
         <strong>{to}</strong> on {date}.</p>\
         <p>A new membership period has started on the new plan.</p>",
        name = escape(&n.name),
        from = escape(&n.from_plan),
        to = escape(&n.to_plan),
        date = n.changed_on,
    );
    EmailMessage {
        subject: format!("Your plan is now {}", n.to_plan),
        text,
        html,
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
