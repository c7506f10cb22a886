//! CLI command definitions and execution

use clap::{Parser, Subcommand};
use kidset_cipher::{CipherError, ClaimsCipher};
use kidset_common::KidsetConfig;
use kidset_jose::{Claims, JoseCrypto};
use kidset_jwt::{JwtError, TokenIssuer, TokenVerifier};
use kidset_key::{FileKeyStorage, KeyError, KeySetManager};
use serde_json::{Value, json};
use std::path::PathBuf;
use thiserror::Error;

/// Command line arguments
#[derive(Parser)]
#[command(name = "kidset")]
#[command(about = "Rotating ES256 key sets and kid-addressed tokens")]
pub struct Cli {
    /// Path to a JSON config file (default: $KIDSET_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the key set records
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Log filter, e.g. `info` or `kidset_jwt=debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Key set administration
    #[command(subcommand)]
    Keys(KeysCommand),

    /// Token issuance and verification
    #[command(subcommand)]
    Token(TokenCommand),

    /// Encrypt a string with the secret of a key set
    ///
    /// Uses the most recently created key set unless --kid is given.
    Encrypt {
        /// Text to encrypt
        text: String,
        /// Key set id
        #[arg(long)]
        kid: Option<String>,
    },

    /// Decrypt a compact JWE produced by `encrypt`
    Decrypt {
        /// Compact JWE
        jwe: String,
        /// Key set id
        #[arg(long)]
        kid: Option<String>,
    },
}

/// `keys` subcommands
#[derive(Clone, Debug, Subcommand)]
pub enum KeysCommand {
    /// Generate and save a new key set; it becomes the latest
    Generate,

    /// Print the public half of a key set
    Show {
        /// Key set id (default: the latest)
        #[arg(long)]
        kid: Option<String>,
    },
}

/// `token` subcommands
#[derive(Clone, Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue a token signed by the latest key set
    ///
    /// Example usage:
    ///   kidset token create --claims '{"iss":"issuer1","aud":"aud1","uid":42}'
    Create {
        /// Claims as a JSON object; iss, aud and uid are required
        #[arg(long)]
        claims: String,
    },

    /// Verify a token and print its header and claims
    Decode {
        /// Compact JWS
        token: String,
        /// Claims the token must carry, as a JSON object
        #[arg(long)]
        expect: Option<String>,
    },
}

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument could not be parsed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Output could not be rendered
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    /// Key set failure
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Token failure
    #[error(transparent)]
    Jwt(#[from] JwtError),

    /// Encryption failure
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

type Manager = KeySetManager<FileKeyStorage, JoseCrypto>;

fn manager(config: &KidsetConfig) -> Manager {
    KeySetManager::new(FileKeyStorage::new(&config.store_dir), JoseCrypto::new())
}

fn parse_claims(raw: &str, flag: &str) -> Result<Claims, CliError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(_) => Err(CliError::InvalidArgument(format!("{flag} must be a JSON object"))),
        Err(e) => Err(CliError::InvalidArgument(format!("{flag}: {e}"))),
    }
}

/// Run `command` against the key store named by `config` and render its output
pub fn execute(command: &Commands, config: &KidsetConfig) -> Result<String, CliError> {
    let mut manager = manager(config);

    match command {
        Commands::Keys(KeysCommand::Generate) => {
            manager.generate_keys()?;
            manager.save_keys()?;
            Ok(manager.kid().unwrap_or_default().to_string())
        }
        Commands::Keys(KeysCommand::Show { kid }) => {
            manager.load_keys(kid.as_deref())?;
            let shown = json!({
                "kid": manager.kid(),
                "public": manager.public_key(),
                "counter": manager.counter(),
            });
            Ok(serde_json::to_string_pretty(&shown)?)
        }
        Commands::Token(TokenCommand::Create { claims }) => {
            let claims = parse_claims(claims, "--claims")?;
            Ok(TokenIssuer::new(&mut manager).create(claims)?)
        }
        Commands::Token(TokenCommand::Decode { token, expect }) => {
            let mut verifier = TokenVerifier::new(&mut manager);
            let decoded = match expect {
                Some(expect) => {
                    let expected = parse_claims(expect, "--expect")?;
                    verifier.decode_and_validate(token, &expected)?
                }
                None => verifier.decode(token)?,
            };
            Ok(serde_json::to_string_pretty(&decoded)?)
        }
        Commands::Encrypt { text, kid } => {
            Ok(ClaimsCipher::new(&mut manager).encrypt(text, kid.as_deref())?)
        }
        Commands::Decrypt { jwe, kid } => {
            Ok(ClaimsCipher::new(&mut manager).decrypt(jwe, kid.as_deref())?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::parse_from([
            "kidset",
            "--store-dir",
            "/tmp/keys",
            "token",
            "decode",
            "a.b.c",
            "--expect",
            r#"{"aud":"aud1"}"#,
        ]);
        assert_eq!(cli.store_dir, Some(PathBuf::from("/tmp/keys")));
        assert!(matches!(
            cli.command,
            Commands::Token(TokenCommand::Decode { ref token, expect: Some(_) }) if token == "a.b.c"
        ));
    }

    #[test]
    fn claims_must_be_an_object() {
        assert!(parse_claims(r#"{"uid": 1}"#, "--claims").is_ok());
        assert!(matches!(
            parse_claims("[1, 2]", "--claims"),
            Err(CliError::InvalidArgument(msg)) if msg.contains("JSON object")
        ));
        assert!(matches!(
            parse_claims("{", "--claims"),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
