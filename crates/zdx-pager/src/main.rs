mod app;
mod cli;
mod clipboard;
mod logging;
mod paths;
mod runtime;
mod terminal;
mod transcript;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{e:#}"); // pretty anyhow chain
        std::process::exit(1);
    }
}
