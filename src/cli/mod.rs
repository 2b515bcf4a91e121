//! Command-line interface.

pub mod completions;
pub mod dump;
pub mod encrypt;
pub mod exec;
pub mod get;
pub mod init;
pub mod list;
pub mod namespaces;
pub mod output;
pub mod sync;
pub mod validate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::{Config, Overrides, Settings};
use crate::error::Result;
use output::Printer;

/// Strata - keep a tree of encrypted secret files in sync with a secret store.
#[derive(Parser, Debug)]
#[command(
    name = "strata",
    about = "Keep a tree of encrypted secret files in sync with a secret store",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Table name
    #[arg(long, global = true, env = "STRATA_TABLE")]
    pub table_name: Option<String>,

    /// Key alias used for encryption
    #[arg(long = "key", global = true, env = "STRATA_KEY")]
    pub key_alias: Option<String>,

    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Store backend (file, memory, dynamodb)
    #[arg(long, global = true, env = "STRATA_STORE")]
    pub store: Option<String>,

    /// Document path of the file store
    #[arg(long, global = true, env = "STRATA_STORE_PATH", value_name = "FILE")]
    pub store_path: Option<PathBuf>,

    /// Cipher backend (age, aws-kms)
    #[arg(long, global = true, env = "STRATA_CIPHER")]
    pub cipher: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            table: self.table_name.clone(),
            key_alias: self.key_alias.clone(),
            region: self.region.clone(),
            store: self.store.clone(),
            store_path: self.store_path.clone(),
            cipher: self.cipher.clone(),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synchronize secret files with the store
    Sync {
        /// Directory of secret files
        dir: PathBuf,
        /// Sync only this namespace
        namespace: Option<String>,
        /// Show changes without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Create the table (and the local key for the alias)
    Init,

    /// List namespaces in the store
    Namespaces,

    /// Encrypt a value
    Encrypt {
        /// KEY=VALUE, or KEY to be prompted for the value
        pair: String,
        /// Add the encrypted value to this secret file
        #[arg(long, value_name = "FILE")]
        add: Option<PathBuf>,
    },

    /// Check that every secret in a directory decrypts
    Validate {
        /// Directory of secret files
        dir: PathBuf,
    },

    /// Print the decrypted secrets of a local file
    List {
        /// Secret file
        file: PathBuf,
    },

    /// Print one decrypted value from the store
    Get {
        /// Namespace
        namespace: String,
        /// Secret key
        key: String,
    },

    /// Print the secrets of a namespace in dotenv format
    Dump {
        /// Namespace
        namespace: String,
        /// Dotenv template to fill
        #[arg(short, long, value_name = "FILE")]
        template: Option<PathBuf>,
        /// Replace values already set in the template
        #[arg(short = 'o', long = "override")]
        override_values: bool,
        /// Quote values
        #[arg(short, long)]
        quote: bool,
    },

    /// Run a command with the secrets of a namespace in its environment
    Exec {
        /// Namespace
        namespace: String,
        /// Only these keys (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let printer = Printer::from_env(cli.global.no_color);

    let config = Config::load()?;
    let settings = Settings::resolve(&config, cli.global.overrides())?;

    use Command::*;

    match cli.command {
        Sync {
            dir,
            namespace,
            dry_run,
        } => sync::execute(&settings, &printer, &dir, namespace, dry_run),
        Init => init::execute(&settings, &printer),
        Namespaces => namespaces::execute(&settings),
        Encrypt { pair, add } => encrypt::execute(&settings, &printer, &pair, add.as_deref()),
        Validate { dir } => validate::execute(&settings, &printer, &dir),
        List { file } => list::execute(&settings, &file),
        Get { namespace, key } => get::execute(&settings, &namespace, &key),
        Dump {
            namespace,
            template,
            override_values,
            quote,
        } => dump::execute(
            &settings,
            &namespace,
            template.as_deref(),
            override_values,
            quote,
        ),
        Exec {
            namespace,
            keys,
            command,
        } => exec::execute(&settings, &namespace, &keys, &command),
        Completions { shell } => completions::execute(shell),
    }
}
