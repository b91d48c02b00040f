//! Terminal output for command results.

use churnctl::api::{Feedback, Log, MlModel, Prediction, User};
use console::style;
use std::path::Path;

pub fn success(msg: &str) {
    println!("{} {msg}", style("✓").green().bold());
}

pub fn status(api_url: &str, session_path: &Path, authenticated: bool) {
    println!("{:<10} {api_url}", style("Backend").bold());
    println!("{:<10} {}", style("Session").bold(), session_path.display());
    let state = if authenticated {
        style("signed in").green()
    } else {
        style("signed out").yellow()
    };
    println!("{:<10} {state}", style("State").bold());
}

pub fn profile(user: &User) {
    println!("{:<10} {}", style("ID").bold(), user.id);
    println!("{:<10} {}", style("Username").bold(), user.username);
    println!(
        "{:<10} {}",
        style("Email").bold(),
        user.email.as_deref().unwrap_or("-")
    );
    println!("{:<10} {}", style("Role").bold(), user.role_label());
    if let Some(created) = user.created_at {
        println!(
            "{:<10} {}",
            style("Joined").bold(),
            created.format("%Y-%m-%d %H:%M")
        );
    }
}

pub fn users(users: &[User]) {
    if empty(users, "No users found") {
        return;
    }
    header(&format!("{:<6} {:<20} {:<30} {}", "ID", "USERNAME", "EMAIL", "ROLE"));
    for u in users {
        println!(
            "{:<6} {:<20} {:<30} {}",
            u.id,
            truncate(&u.username, 20),
            truncate(u.email.as_deref().unwrap_or("-"), 30),
            u.role_label()
        );
    }
}

pub fn feedback(items: &[Feedback]) {
    if empty(items, "No feedback yet") {
        return;
    }
    header(&format!(
        "{:<6} {:<11} {:<8} {:<8} {}",
        "ID", "PREDICTION", "USER", "CORRECT", "COMMENT"
    ));
    for f in items {
        let verdict = if f.correct {
            style("yes").green()
        } else {
            style("no").red()
        };
        println!(
            "{:<6} {:<11} {:<8} {:<8} {}",
            f.id,
            f.prediction_id,
            f.user_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            verdict,
            truncate(&f.comment, 50)
        );
    }
}

pub fn models(models: &[MlModel]) {
    if empty(models, "No models registered") {
        return;
    }
    header(&format!("{:<6} {:<24} {:<10} {}", "ID", "NAME", "VERSION", "DESCRIPTION"));
    for m in models {
        println!(
            "{:<6} {:<24} {:<10} {}",
            m.id,
            truncate(&m.name, 24),
            m.version.as_deref().unwrap_or("-"),
            truncate(m.description.as_deref().unwrap_or(""), 50)
        );
    }
}

pub fn logs(logs: &[Log]) {
    if empty(logs, "No logs recorded") {
        return;
    }
    header(&format!(
        "{:<6} {:<6} {:<6} {:<20} {:<30} {}",
        "ID", "USER", "MODEL", "TIMESTAMP", "INPUT", "OUTPUT"
    ));
    for l in logs {
        println!(
            "{:<6} {:<6} {:<6} {:<20} {:<30} {}",
            l.id,
            l.user_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            l.model_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            truncate(&l.timestamp, 20),
            truncate(&l.input_data, 30),
            truncate(&l.output, 30)
        );
    }
}

pub fn prediction(p: &Prediction) {
    if let Some(id) = p.id {
        println!("{:<12} {id}", style("Prediction").bold());
    }
    if let Some(pct) = p.probability_percent() {
        println!("{:<12} {pct}", style("Churn risk").bold());
    }
    if let Some(label) = &p.prediction {
        println!("{:<12} {label}", style("Outcome").bold());
    }
    for (key, value) in &p.extra {
        println!("{:<12} {value}", style(key).bold());
    }
}

pub fn predictions(items: &[Prediction]) {
    if empty(items, "No predictions yet") {
        return;
    }
    header(&format!("{:<6} {:<10} {:<10} {}", "ID", "RISK", "OUTCOME", "CREATED"));
    for p in items {
        println!(
            "{:<6} {:<10} {:<10} {}",
            p.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            p.probability_percent().unwrap_or_else(|| "-".to_string()),
            p.prediction
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            p.created_at.as_deref().unwrap_or("-")
        );
    }
}

fn header(line: &str) {
    println!("{}", style(line).bold().underlined());
}

fn empty<T>(items: &[T], msg: &str) -> bool {
    if items.is_empty() {
        println!("{}", style(msg).dim());
        return true;
    }
    false
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
