//! # Command Line Interface
//!
//! ```text
//! gradebook [--database PATH] [--upload-dir PATH] <COMMAND>
//!
//!   init      create the database and upload directory
//!   serve     run the HTTP server
//!   list      print stored records
//!   classify  print stored records with their tier
//!   grade     OCR one document and print its average
//! ```

mod commands;

pub use commands::{
    cmd_classify, cmd_grade, cmd_init, cmd_list, cmd_serve, open_existing_store, render_classify,
    render_list, CliError,
};

use crate::config::{
    AppConfig, OcrConfig, DEFAULT_DATABASE, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT,
    DEFAULT_UPLOAD_DIR,
};
use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Grade extraction and classification from scanned report cards.
#[derive(Debug, Parser)]
#[command(name = "gradebook", version, about)]
pub struct Cli {
    /// Record database file.
    #[arg(long, global = true, env = "GRADEBOOK_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Directory uploaded documents are saved to.
    #[arg(long, global = true, env = "GRADEBOOK_UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    pub upload_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database and the upload directory.
    Init {
        /// Recreate the database if it already exists.
        #[arg(long)]
        force: bool,
    },

    /// Run the HTTP server.
    Serve(ServeArgs),

    /// Print every stored record.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print every stored record with its tier.
    Classify {
        #[arg(long)]
        json: bool,
    },

    /// OCR a single document and print the average of its grades.
    Grade {
        /// Document to read (pdf, jpg, jpeg or png).
        file: PathBuf,

        #[command(flatten)]
        ocr: OcrArgs,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "GRADEBOOK_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    #[arg(long, env = "GRADEBOOK_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum request body size, in MiB.
    #[arg(long, env = "GRADEBOOK_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: usize,

    /// Secret for signing flash cookies (at least 64 bytes). A random key is
    /// used when unset.
    #[arg(long, env = "GRADEBOOK_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[command(flatten)]
    pub ocr: OcrArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OcrArgs {
    /// tesseract executable.
    #[arg(long, env = "GRADEBOOK_TESSERACT", default_value = "tesseract")]
    pub tesseract: String,

    /// pdftoppm executable, used for PDF documents.
    #[arg(long, env = "GRADEBOOK_PDFTOPPM", default_value = "pdftoppm")]
    pub pdftoppm: String,

    /// Tesseract language code.
    #[arg(long = "lang", env = "GRADEBOOK_OCR_LANG", default_value = "eng")]
    pub language: String,

    /// Resolution for rasterising PDF pages.
    #[arg(long, env = "GRADEBOOK_OCR_DPI", default_value_t = 300)]
    pub dpi: u32,
}

impl From<OcrArgs> for OcrConfig {
    fn from(args: OcrArgs) -> Self {
        Self {
            tesseract: args.tesseract,
            pdftoppm: args.pdftoppm,
            language: args.language,
            dpi: args.dpi,
        }
    }
}

impl Cli {
    /// Server configuration for `serve`.
    #[must_use]
    pub fn app_config(&self, serve: &ServeArgs) -> AppConfig {
        AppConfig::new(self.database.clone(), self.upload_dir.clone())
            .with_bind(SocketAddr::new(serve.host, serve.port))
            .with_max_upload_mb(serve.max_upload_mb)
            .with_ocr(serve.ocr.clone().into())
            .with_secret(serve.secret.clone())
    }
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Init { force } => cmd_init(&cli.database, &cli.upload_dir, *force),
        Commands::Serve(serve) => cmd_serve(cli.app_config(serve)).await,
        Commands::List { json } => cmd_list(&cli.database, *json),
        Commands::Classify { json } => cmd_classify(&cli.database, *json),
        Commands::Grade { file, ocr, json } => cmd_grade(file, ocr.clone().into(), *json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_builds_config() {
        let cli = Cli::parse_from([
            "gradebook",
            "--database",
            "/tmp/x.redb",
            "serve",
            "--port",
            "8080",
            "--lang",
            "fra",
        ]);
        let Commands::Serve(serve) = &cli.command else {
            unreachable!("parsed serve");
        };
        let config = cli.app_config(serve);
        assert_eq!(config.database, PathBuf::from("/tmp/x.redb"));
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.ocr.language, "fra");
        assert_eq!(config.ocr.dpi, 300);
        assert_eq!(config.secret, None);
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from(["gradebook", "list", "--json", "--upload-dir", "scans"]);
        assert_eq!(cli.upload_dir, PathBuf::from("scans"));
        assert!(matches!(cli.command, Commands::List { json: true }));
    }
}
