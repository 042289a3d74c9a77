use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, Level};

use noticias_core::{NoticiaSource, Result};
use noticias_sources::{ContentfulSource, LocalSource, Resolver, SupabaseSource};
use noticias_supabase::SupabaseClient;
use noticias_web::AppState;

const DEFAULT_SITE_URL: &str = "https://ad-finem.co";

#[derive(Parser, Debug)]
#[command(author, version, about = "Noticias backend: resolver, sitemap and HTTP API", long_about = None)]
struct Cli {
    /// Site base URL used for sitemap entries (falls back to $SITE_URL)
    #[arg(long)]
    site_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the static sitemap.xml from the local data directory
    Sitemap {
        /// Directory of local noticia JSON documents
        #[arg(long, default_value = "data/noticias")]
        data_dir: PathBuf,
        /// Output path for the generated file
        #[arg(long, default_value = "public/sitemap.xml")]
        out: PathBuf,
    },
    /// Resolve the noticia list (headless CMS, then local files) and print it
    List {
        #[arg(long, default_value = "data/noticias")]
        data_dir: PathBuf,
    },
    /// Serve the HTTP API and the on-demand sitemap
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: String,
        #[arg(long, default_value = "data/noticias")]
        data_dir: PathBuf,
    },
    /// Rewrite bare storage keys in the noticias table to public URLs
    NormalizeUrls,
}

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

fn site_url(cli: &Cli) -> String {
    cli.site_url
        .clone()
        .unwrap_or_else(|| std::env::var("SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.into()))
}

/// Public-listing chain: headless CMS when configured, local files
/// otherwise or on failure.
fn listing_resolver(data_dir: &Path) -> Resolver {
    Resolver::new()
        .with_source(Box::new(ContentfulSource::from_env()))
        .with_source(Box::new(LocalSource::new(data_dir)))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let site = site_url(&cli);

    match &cli.command {
        Commands::Sitemap { data_dir, out } => {
            let resolver = Resolver::new().with_source(Box::new(LocalSource::new(data_dir)));
            let noticias = resolver.resolve().await?;
            noticias_sitemap::write_static(&site, &noticias, out)?;
            info!("🗺️ {} noticias in sitemap", noticias.len());
        }
        Commands::List { data_dir } => {
            let noticias = listing_resolver(data_dir).resolve().await?;
            println!("Found {} noticias", noticias.len());
            for n in &noticias {
                let fecha = n
                    .effective_date()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "sin fecha".to_string());
                println!("📰 {} - /noticias/{} ({})", n.titulo, n.slug(), fecha);
            }
        }
        Commands::Serve { addr, data_dir } => {
            let mut state = AppState::new(site, listing_resolver(data_dir));
            let store = SupabaseSource::from_env();
            if store.is_configured() {
                info!("🏦 relational store configured, sitemap served from it");
                state = state
                    .with_sitemap_resolver(Resolver::new().with_source(Box::new(store)));
            } else {
                info!("store credentials missing, sitemap proxied from the origin");
            }
            noticias_web::serve(addr, state).await?;
        }
        Commands::NormalizeUrls => {
            let client = SupabaseClient::from_env().ok_or_else(|| {
                noticias_core::Error::Storage("supabase credentials not configured".to_string())
            })?;
            let rewritten = client.publisher().normalize_stored_refs().await?;
            println!("🔧 {} noticias actualizadas", rewritten);
        }
    }
    Ok(())
}
