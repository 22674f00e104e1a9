//! ASCII art banner

use crossterm::style::{Color, Stylize};

const BANNER: &str = r#"
███████╗████████╗███████╗███╗   ██╗ ██████╗██╗██╗
██╔════╝╚══██╔══╝██╔════╝████╗  ██║██╔════╝██║██║
███████╗   ██║   █████╗  ██╔██╗ ██║██║     ██║██║
╚════██║   ██║   ██╔══╝  ██║╚██╗██║██║     ██║██║
███████║   ██║   ███████╗██║ ╚████║╚██████╗██║███████╗
╚══════╝   ╚═╝   ╚══════╝╚═╝  ╚═══╝ ╚═════╝╚═╝╚══════╝
"#;

const TAGLINE: &str = "Stencil - Project Scaffolding Toolkit";

/// Print the banner with a simple per-line color cycle
pub fn show_banner() {
    let colors = [
        Color::Blue,
        Color::DarkBlue,
        Color::Cyan,
        Color::DarkCyan,
        Color::White,
        Color::Grey,
    ];
    for (i, line) in BANNER.trim_matches('\n').lines().enumerate() {
        println!("{}", line.with(colors[i % colors.len()]));
    }
    println!("{}", TAGLINE.dark_yellow().italic());
    println!();
}
