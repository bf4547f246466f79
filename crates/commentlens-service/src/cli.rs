//! Command line interface

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "commentlens")]
#[command(about = "CommentLens comment analysis service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "commentlens.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    pub listen: String,

    /// Listen port
    #[arg(short = 'P', long, default_value = "8000", env = "PORT")]
    pub port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// API key for the Perspective comment analyzer
    #[arg(long, env = "GOOGLE_PERSPECTIVE_API_KEY", hide_env_values = true)]
    pub perspective_api_key: Option<String>,

    /// Comment store URL
    #[arg(long, env = "SUPABASE_URL")]
    pub store_url: Option<String>,

    /// Comment store service role key
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub store_key: Option<String>,
}
