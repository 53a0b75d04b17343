//! Loads and checks patgate settings, printing a redacted summary

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use patgate::{config::AppSettings, Error, Result};
use std::path::PathBuf;
use tracing::{error, info, warn};
use url::Url;

#[derive(Parser)]
#[command(name = "patgate", about = "patgate settings check", version, author)]
struct Args {
    /// Path to settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print an example settings file and exit
    #[arg(long)]
    gen_config: bool,

    /// Resolve the API endpoint for this organization
    #[arg(long, value_name = "NAME")]
    organization: Option<String>,

    /// Public base URL of the app, used for the absolute redirect URI
    #[arg(long, value_name = "URL", default_value = "http://localhost:5000")]
    base_url: String,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!("{}=info", env!("CARGO_BIN_NAME").replace('-', "_"));
    patgate_common::logging::init_logging(&args.verbosity, &log_filter)?;

    if args.gen_config {
        println!("{}", AppSettings::generate_example()?);
        return Ok(());
    }

    match run(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(code = e.error_code(), "Startup aborted: {}", e);
            Err(e)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = AppSettings::load(args.config.as_deref())?;
    info!(
        "Settings loaded: authority={}, session_type={}",
        settings.authority(),
        settings.session_type()
    );

    if !settings.session_type().is_persistent() {
        warn!(
            "session_type={} keeps sessions and cached tokens in process memory; they are lost on restart",
            settings.session_type()
        );
    }

    let base_url = Url::parse(&args.base_url)
        .map_err(|e| Error::invalid_argument(format!("--base-url {}: {e}", args.base_url)))?;
    let oauth = settings.oauth_client_config(&base_url)?;

    println!("client_id          {}", oauth.client_id);
    println!("client_secret      {}", oauth.client_secret);
    println!("secret_policy      {}", settings.secret_policy());
    println!("authority          {}", settings.authority());
    println!("multi_tenant       {}", settings.is_multi_tenant());
    println!("authorize_endpoint {}", oauth.authorize_endpoint);
    println!("token_endpoint     {}", oauth.token_endpoint);
    println!("redirect_uri       {}", oauth.redirect_uri);
    println!("scope              {}", oauth.scope_string());
    println!("session_type       {}", settings.session_type());
    println!("endpoint           {}", settings.endpoint());

    if let Some(organization) = &args.organization {
        println!(
            "endpoint[{organization}] {}",
            settings.endpoint_for(organization)?
        );
    }

    Ok(())
}
