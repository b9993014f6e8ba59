//! User-facing terminal output. Colors only when stdout is a TTY.

use owo_colors::OwoColorize;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn tagged(tag: &str, msg: &str, paint: fn(&str) -> String) -> String {
    if is_tty() {
        format!("{} {msg}", paint(tag))
    } else {
        format!("{tag} {msg}")
    }
}

pub fn print_info(msg: &str) {
    println!("{}", tagged("info:", msg, |t| t.cyan().bold().to_string()));
}

pub fn print_warn(msg: &str) {
    eprintln!("{}", tagged("warn:", msg, |t| t.yellow().bold().to_string()));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", tagged("error:", msg, |t| t.red().bold().to_string()));
}

pub fn print_success(msg: &str) {
    println!("{}", tagged("ok:", msg, |t| t.green().bold().to_string()));
}

/// One line of script output, unprefixed so it can be scripted against.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// Render a tree listing, dimming container markers on a TTY.
pub fn print_tree(listing: &str) {
    if !is_tty() {
        print!("{listing}");
        return;
    }
    for line in listing.lines() {
        match line.strip_suffix('/') {
            Some(name) => println!("{}{}", name.bold(), "/".dimmed()),
            None => println!("{line}"),
        }
    }
}
