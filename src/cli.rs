use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use docmerge::backends::Backends;
use docmerge::mailer::TlsMode;

/// Main entrypoint for docmerge when called as executable
#[derive(Parser)]
#[command(name = "docmerge", version, about)]
pub struct Cli {
    /// Spreadsheet with one recipient per row (xlsx, xlsm, xlsb, xls or ods)
    #[arg(short = 'r', long = "recipients")]
    pub recipients: PathBuf,

    /// Word document (.docx) whose body is appended to every email
    #[arg(short = 'd', long = "document")]
    pub document: PathBuf,

    /// File to attach to every email; may be repeated
    #[arg(short = 'a', long = "attach")]
    pub attachments: Vec<PathBuf>,

    /// Tera template for the email HTML, replacing the built-in invitation
    #[arg(short = 't', long = "template")]
    pub template: Option<PathBuf>,

    /// Subject line; may use template variables such as `{{ name }}`
    #[arg(short = 's', long = "subject", default_value = docmerge::backends::email::DEFAULT_SUBJECT)]
    pub subject: String,

    /// Sender, e.g. "Heritage Club <club@example.com>"
    #[arg(short = 'f', long = "from", env = "DOCMERGE_FROM")]
    pub from: Option<String>,

    /// What to do with each merged email
    #[arg(value_enum, short = 'b', long = "backend", default_value = "preview")]
    pub backend: Backends,

    /// Directory for the `file` backend
    #[arg(short = 'o', long = "out-dir", default_value = "outbox")]
    pub out_dir: PathBuf,

    /// Worksheet to read; defaults to the first one
    #[arg(long = "sheet")]
    pub sheet: Option<String>,

    /// Header of the column holding recipient names
    #[arg(long = "name-column", default_value = "Name")]
    pub name_column: String,

    /// Header of the column holding email addresses
    #[arg(long = "email-column", default_value = "Email")]
    pub email_column: String,

    /// Extra template variable available as `vars.KEY`; may be repeated
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,

    /// Reference images as inline MIME parts instead of `data:` URIs
    #[arg(long = "cid-images")]
    pub cid_images: bool,

    #[arg(long = "smtp-host", env = "DOCMERGE_SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// Defaults to the standard port for the TLS mode
    #[arg(long = "smtp-port", env = "DOCMERGE_SMTP_PORT")]
    pub smtp_port: Option<u16>,

    #[arg(value_enum, long = "smtp-tls", default_value = "starttls")]
    pub smtp_tls: TlsMode,

    #[arg(long = "smtp-user", env = "DOCMERGE_SMTP_USER")]
    pub smtp_user: Option<String>,

    #[arg(long = "smtp-password", env = "DOCMERGE_SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Only report warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also report debugging details
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => log::LevelFilter::Warn,
            (_, true) => log::LevelFilter::Debug,
            _ => log::LevelFilter::Info,
        }
    }

    pub fn vars(&self) -> BTreeMap<String, String> {
        self.vars.iter().cloned().collect()
    }
}

fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {arg:?}")),
    }
}
