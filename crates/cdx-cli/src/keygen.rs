//! # Keygen Subcommand
//!
//! Issuer onboarding: generates an Ed25519 signing seed and the
//! `did:web` DID document that publishes the matching public key as a
//! Multikey. The document must be hosted at
//! `https://<domain>/.well-known/did.json` for verifiers to resolve;
//! the seed file stays secret and feeds `cdx status` signing or the
//! issuance service via `CDX_SIGNING_KEY`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand_core::{OsRng, RngCore};

use cdx_core::hex;
use cdx_crypto::{encode_multibase, Ed25519KeyPair};
use cdx_vc::DidDocument;

/// Arguments for the `cdx keygen` subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Domain the issuer DID is anchored to, e.g. "issuer.example".
    #[arg(long)]
    pub domain: String,

    /// File to write the hex-encoded signing seed to.
    #[arg(long, default_value = "cdx-signing.key")]
    pub out: PathBuf,

    /// File to write the DID document to.
    #[arg(long, default_value = "did.json")]
    pub did_out: PathBuf,
}

/// Execute the keygen subcommand.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    let keypair = Ed25519KeyPair::from_seed(&seed);
    let multibase = encode_multibase(&keypair.public_key());
    let document = DidDocument::for_web_issuer(&args.domain, &multibase);

    std::fs::write(&args.out, hex::bytes_to_hex(&seed))
        .with_context(|| format!("failed to write seed to {}", args.out.display()))?;
    restrict_permissions(&args.out)?;

    let json = serde_json::to_string_pretty(&document)
        .context("failed to serialize DID document")?;
    std::fs::write(&args.did_out, json)
        .with_context(|| format!("failed to write DID document to {}", args.did_out.display()))?;

    println!("OK: issuer DID did:web:{}", args.domain);
    println!("  seed:         {} (keep secret)", args.out.display());
    println!(
        "  DID document: {} (host at https://{}/.well-known/did.json)",
        args.did_out.display(),
        args.domain
    );
    println!("  public key:   {multibase}");
    Ok(0)
}

/// The seed file must not be group or world readable.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
