use colored::*;
use terminal_size::{terminal_size, Height, Width};

use crate::session::Message;

/// Longest content shown on one echo line.
const PREVIEW_CHARS: usize = 200;

pub fn print_header(model: &str, uri: &str) {
    let (width, _) = terminal_size().unwrap_or((Width(80), Height(24)));
    let width = width.0 as usize;

    let line = "─".repeat(width);
    println!("{}", line.black().bold());

    let name = "colloquy".yellow().bold();
    let version = format!("v{}", env!("CARGO_PKG_VERSION")).black().bold();
    println!("  {} {}", name, version);

    let info = format!("  {}  •  {}", model, uri).cyan();
    println!("{}", info);

    println!("{}", line.black().bold());
}

pub fn print_step(msg: &str) {
    println!("  {} {}", "•".green(), msg);
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠️ ".yellow().bold(), msg.yellow());
}

pub fn print_error(msg: &str) {
    eprintln!("  {} {}", "❌".red().bold(), msg.red());
}

pub fn print_request(message: &Message) {
    println!(
        "{} {}",
        "Request: ".blue().bold(),
        preview(&message.content)
    );
}

pub fn print_response(message: &Message) {
    let tokens = message
        .total_tokens
        .map(|t| format!(" ({} tokens)", t))
        .unwrap_or_default();
    println!(
        "{} {}{}",
        "Response:".green().bold(),
        preview(&message.content),
        tokens.black().bold()
    );
}

pub fn print_tool_call(name: &str, arguments: &str) {
    println!(
        "  {} {} {}",
        "∴".magenta(),
        name.cyan(),
        preview(arguments).black().bold()
    );
}

fn preview(text: &str) -> String {
    let mut shown: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        shown.push('…');
    }
    shown
}
