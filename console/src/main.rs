use tracing_subscriber::EnvFilter;

mod modules;
mod utilities;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, stdout belongs to the status tables.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    modules::run()
}
