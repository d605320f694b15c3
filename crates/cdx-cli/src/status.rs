//! # Status Subcommand
//!
//! Status list administration. Published lists are immutable snapshots:
//! `generate` builds and signs the initial all-clear list, `revoke`
//! flips one bit and re-signs the whole credential as a new snapshot
//! for republication. The hosted document is never edited in place.
//!
//! ## Subcommands
//!
//! - `generate` — Build and sign a fresh status list credential.
//! - `revoke` — Set (or with `--reinstate` clear) one bit and re-sign.
//!
//! The signing key is a 32-byte Ed25519 seed, hex-encoded, read from
//! `--key-file` or the `CDX_SIGNING_KEY` environment variable.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::Value;

use cdx_crypto::{EnvSigner, LocalSigner, ProofSigner};
use cdx_status::{
    credential_status_payload, extract_list_subject, StatusList, StatusPurpose,
    DEFAULT_LIST_LENGTH,
};
use cdx_vc::VerifiableCredential;

/// Environment variable holding the hex-encoded signing seed.
pub const SIGNING_KEY_ENV: &str = "CDX_SIGNING_KEY";

/// Arguments for the `cdx status` subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(subcommand)]
    pub command: StatusCommand,
}

/// Status list subcommands.
#[derive(Subcommand, Debug)]
pub enum StatusCommand {
    /// Generate a signed status list credential with every bit clear.
    Generate {
        /// URL the list will be hosted at (becomes the credential id).
        #[arg(long)]
        url: String,
        /// Issuer DID, e.g. "did:web:issuer.example".
        #[arg(long)]
        issuer: String,
        /// What a set bit means.
        #[arg(long, value_enum, default_value = "revocation")]
        purpose: PurposeArg,
        /// Number of bits in the list (must be a multiple of 8).
        #[arg(long)]
        length: Option<usize>,
        /// File to write the signed credential to.
        #[arg(long)]
        out: PathBuf,
        /// File holding the hex-encoded signing seed.
        #[arg(long)]
        key_file: Option<PathBuf>,
        /// Verification method for the proof (defaults to "<issuer>#keys-1").
        #[arg(long)]
        verification_method: Option<String>,
    },

    /// Set a status bit and re-sign the list as a new snapshot.
    Revoke {
        /// Existing signed status list credential.
        #[arg(long)]
        list: PathBuf,
        /// Zero-based bit index to flip.
        #[arg(long)]
        index: usize,
        /// Clear the bit instead of setting it.
        #[arg(long)]
        reinstate: bool,
        /// Output file (defaults to rewriting --list in place).
        #[arg(long)]
        out: Option<PathBuf>,
        /// File holding the hex-encoded signing seed.
        #[arg(long)]
        key_file: Option<PathBuf>,
    },
}

/// Status purpose accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PurposeArg {
    /// A set bit means the credential is permanently revoked.
    Revocation,
    /// A set bit means the credential is temporarily suspended.
    Suspension,
}

impl From<PurposeArg> for StatusPurpose {
    fn from(arg: PurposeArg) -> Self {
        match arg {
            PurposeArg::Revocation => StatusPurpose::Revocation,
            PurposeArg::Suspension => StatusPurpose::Suspension,
        }
    }
}

/// Execute the status subcommand.
pub fn run_status(args: &StatusArgs) -> Result<u8> {
    match &args.command {
        StatusCommand::Generate {
            url,
            issuer,
            purpose,
            length,
            out,
            key_file,
            verification_method,
        } => cmd_generate(
            url,
            issuer,
            *purpose,
            *length,
            out,
            key_file.as_deref(),
            verification_method.as_deref(),
        ),

        StatusCommand::Revoke {
            list,
            index,
            reinstate,
            out,
            key_file,
        } => cmd_revoke(list, *index, *reinstate, out.as_deref(), key_file.as_deref()),
    }
}

fn cmd_generate(
    url: &str,
    issuer: &str,
    purpose: PurposeArg,
    length: Option<usize>,
    out: &Path,
    key_file: Option<&Path>,
    verification_method: Option<&str>,
) -> Result<u8> {
    let bits = length.unwrap_or(DEFAULT_LIST_LENGTH);
    let list = match length {
        Some(n) => StatusList::new(n).context("invalid --length")?,
        None => StatusList::with_default_length(),
    };

    let vm = verification_method
        .map(str::to_string)
        .unwrap_or_else(|| format!("{issuer}#keys-1"));
    let signer = load_signer(key_file, vm)?;

    let purpose = StatusPurpose::from(purpose);
    let mut credential = credential_status_payload(url, issuer, purpose, &list)
        .context("failed to build status list payload")?;
    credential
        .sign(signer.as_ref())
        .context("failed to sign status list credential")?;

    write_credential(out, &credential)?;
    println!(
        "OK: wrote signed {purpose} list ({bits} bits) to {}",
        out.display()
    );
    Ok(0)
}

fn cmd_revoke(
    list_path: &Path,
    index: usize,
    reinstate: bool,
    out: Option<&Path>,
    key_file: Option<&Path>,
) -> Result<u8> {
    let raw = std::fs::read_to_string(list_path)
        .with_context(|| format!("failed to read {}", list_path.display()))?;
    let json: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", list_path.display()))?;

    let subject = extract_list_subject(&json).context("not a status list credential")?;
    let mut list = StatusList::decode(&subject.encoded_list)
        .context("cannot decode the encoded status list")?;
    list.set(index, !reinstate)
        .with_context(|| format!("cannot flip bit {index}"))?;

    // The new snapshot keeps the original hosting URL, issuer, purpose,
    // and verification method; only the list bytes and proof change.
    let url = json
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("list credential has no id"))?;
    let issuer = json
        .get("issuer")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("list credential has no issuer"))?;
    let vm = json
        .pointer("/proof/verificationMethod")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{issuer}#keys-1"));

    let signer = load_signer(key_file, vm)?;
    let mut credential = credential_status_payload(url, issuer, subject.status_purpose, &list)
        .context("failed to rebuild status list payload")?;
    credential
        .sign(signer.as_ref())
        .context("failed to sign status list credential")?;

    let target = out.unwrap_or(list_path);
    write_credential(target, &credential)?;

    let action = if reinstate { "reinstated" } else { "revoked" };
    println!("OK: {action} index {index}; new snapshot at {}", target.display());
    Ok(0)
}

/// Load the signing key from `--key-file` or `$CDX_SIGNING_KEY`.
fn load_signer(key_file: Option<&Path>, verification_method: String) -> Result<Box<dyn ProofSigner>> {
    match key_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read key file {}", path.display()))?;
            let seed = parse_seed(raw.trim())?;
            Ok(Box::new(LocalSigner::from_seed(&seed, verification_method)))
        }
        None => {
            let signer = EnvSigner::from_env(SIGNING_KEY_ENV, verification_method)
                .context("no --key-file given and loading the key from the environment failed")?;
            Ok(Box::new(signer))
        }
    }
}

fn parse_seed(hex: &str) -> Result<[u8; 32]> {
    let bytes = cdx_core::hex::hex_to_bytes(hex).context("signing seed is not valid hex")?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| anyhow!("signing seed must be 32 bytes, got {}", v.len()))
}

fn write_credential(path: &Path, credential: &VerifiableCredential) -> Result<()> {
    let json =
        serde_json::to_string_pretty(credential).context("failed to serialize credential")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
