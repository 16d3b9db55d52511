use clap::Parser as _;
use keenergy::commands;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(clap::Parser)]
#[clap(version, about)]
enum Commands {
    Controls(commands::controls::Args),
    Read(commands::read::Args),
    Write(commands::write::Args),
    Info(commands::info::Args),
}

fn end<E: std::error::Error>(r: Result<(), E>) {
    std::process::exit(match r {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            let mut cause = e.source();
            while let Some(e) = cause {
                eprintln!("  because: {e}");
                cause = e.source();
            }
            1
        }
    });
}

fn main() {
    let filter_description = std::env::var("KEENERGY_LOG").unwrap_or_else(|_| "warn".into());
    let filter = match filter_description.parse::<tracing_subscriber::filter::targets::Targets>() {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("warning: ignoring invalid KEENERGY_LOG: {e}");
            tracing_subscriber::filter::targets::Targets::new()
                .with_default(tracing_subscriber::filter::LevelFilter::WARN)
        }
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    match Commands::parse() {
        Commands::Controls(args) => end(commands::controls::run(args)),
        Commands::Read(args) => end(commands::read::run(args)),
        Commands::Write(args) => end(commands::write::run(args)),
        Commands::Info(args) => end(commands::info::run(args)),
    }
}
