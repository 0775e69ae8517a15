use clap::Parser;
use docs_browser::{build_rocket, config::CliArgs};

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    let config = CliArgs::parse().into();
    build_rocket(config).launch().await?;
    Ok(())
}
