//! # Calcboard CLI Application
//!
//! Terminal front end for the calculation engine. Seeds the in-memory
//! store with the built-in calculators, prompts for each field the chosen
//! calculator declares, and drives a [`CalculatorSession`] through one
//! load → edit → submit cycle.

use std::io::{self, BufRead, Write};

use calc_core::builtins::seed_store;
use calc_core::render::{field_views, FieldView};
use calc_core::schema::RawValue;
use calc_core::session::{CalculatorSession, SessionState};
use calc_core::store::{ConfigStore, MemoryHistory};

fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return String::new();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

/// Capture one value the way a form control would: numbers parse when they
/// can, checkboxes become booleans, everything else stays text.
fn capture(view: &FieldView) -> RawValue {
    let mut label = view.label.clone();
    if let Some(unit) = &view.unit {
        label.push_str(&format!(" ({})", unit));
    }
    if let (Some(min), Some(max)) = (view.min, view.max) {
        label.push_str(&format!(" [{} - {}]", min, max));
    }
    if !view.options.is_empty() {
        let choices: Vec<String> = view
            .options
            .iter()
            .map(|o| {
                let value = serde_json::to_string(&o.value).unwrap_or_default();
                format!("{}={}", value, o.label)
            })
            .collect();
        label.push_str(&format!(" ({})", choices.join(", ")));
    }
    if view.required {
        label.push_str(" *");
    }

    let input = prompt_line(&format!("  {}: ", label));

    match view.control.as_str() {
        "checkbox" => RawValue::Bool(matches!(input.as_str(), "y" | "yes" | "true" | "1")),
        "number" => match input.parse::<f64>() {
            Ok(n) => RawValue::Number(n),
            Err(_) => RawValue::Text(input),
        },
        _ => RawValue::Text(input),
    }
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    println!("Calcboard CLI - Data-Driven Calculators");
    println!("=======================================");
    println!();

    let store = seed_store();
    let history = MemoryHistory::new();

    let active = match store.fetch_active() {
        Ok(configs) => configs,
        Err(e) => {
            eprintln!("Could not load calculators: {}", e);
            return;
        }
    };

    println!("Available calculators:");
    for config in &active {
        println!(
            "  {:<18} {}",
            config.slug,
            config.description.as_deref().unwrap_or(&config.name)
        );
    }
    println!();

    let default_slug = active.first().map(|c| c.slug.clone()).unwrap_or_default();
    let mut slug = prompt_line(&format!("Enter calculator slug [{}]: ", default_slug));
    if slug.is_empty() {
        slug = default_slug;
    }

    let mut session = CalculatorSession::new(&store, &history, None);
    session.load(&slug);

    match session.state() {
        SessionState::NotFound => {
            eprintln!("Calculator not found: '{}'", slug);
            return;
        }
        SessionState::LoadFailed(e) => {
            eprintln!("Could not load calculator: {}", e);
            return;
        }
        _ => {}
    }

    let Some(config) = session.config() else {
        eprintln!("Calculator not found: '{}'", slug);
        return;
    };
    println!();
    println!("{}", config.name);
    if let Some(description) = &config.description {
        println!("{}", description);
    }
    println!();

    let views = field_views(config);
    let mut attempts = 0;
    loop {
        for view in &views {
            let value = capture(view);
            session.set_value(&view.name, value);
        }
        session.submit();

        if session.errors().is_empty() {
            break;
        }
        println!();
        for (field, message) in session.errors() {
            println!("  {}: {}", field, message);
        }
        attempts += 1;
        if attempts >= 3 {
            eprintln!("Giving up after {} attempts.", attempts);
            return;
        }
        println!("Please correct the inputs above.");
        println!();
    }

    println!();
    println!("═══════════════════════════════════════");
    match session.display() {
        Some(display) => {
            print!("  {}: {}", display.label, display.formatted);
            if let Some(unit) = &display.unit {
                print!(" {}", unit);
            }
            println!();
            if let Some(status) = &display.status {
                print!("  Status: {}", status.status);
                if let Some(description) = &status.description {
                    print!(" - {}", description);
                }
                println!();
            }
            println!("═══════════════════════════════════════");

            println!();
            println!("JSON Output (for API use):");
            if let Ok(json) = serde_json::to_string_pretty(&display) {
                println!("{}", json);
            }
        }
        None => {
            println!("  No result for these inputs.");
            println!("═══════════════════════════════════════");
        }
    }

    if let Some(record) = history.records().last() {
        println!();
        println!("History record:");
        if let Ok(json) = serde_json::to_string_pretty(record) {
            println!("{}", json);
        }
    }
}
