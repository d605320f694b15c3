//! # Verify Subcommand
//!
//! Offline credential verification: checks the Ed25519 proof and expiry
//! without touching any chain. The issuer's DID document is read from a
//! local file when `--did-document` is given, otherwise fetched over
//! HTTPS. Token-registry and status-list checks need live endpoints and
//! run through the full verifier, not this subcommand.
//!
//! Exit code 0 means the proof verifies; 1 means it does not.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use cdx_vc::{did_web_to_url, split_did_url, VerifiableCredential};
use cdx_verifier::{
    resolve_verification_key, HttpDocumentLoader, StaticDocumentLoader, WebDidResolver,
};

/// Arguments for the `cdx verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential file to verify.
    #[arg(long)]
    pub credential: PathBuf,

    /// Local DID document to resolve the issuer key from, instead of
    /// fetching it over HTTPS.
    #[arg(long)]
    pub did_document: Option<PathBuf>,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.credential)
        .with_context(|| format!("failed to read {}", args.credential.display()))?;
    let credential: VerifiableCredential =
        serde_json::from_str(&raw).context("file is not a verifiable credential")?;

    let proof = match &credential.proof {
        Some(p) => p,
        None => {
            println!("FAIL: credential carries no proof");
            return Ok(1);
        }
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let key = runtime.block_on(async {
        match &args.did_document {
            Some(path) => {
                let doc_raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let doc_json: Value =
                    serde_json::from_str(&doc_raw).context("DID document is not valid JSON")?;
                // Register the local document under the URL the DID
                // resolves to, so resolution stays on the same code path
                // as live fetching.
                let (did, _) = split_did_url(&proof.verification_method);
                let url = did_web_to_url(did).context("proof names a non-did:web method")?;
                let loader = StaticDocumentLoader::new().with_document(url, doc_json);
                let resolver = WebDidResolver::new(loader);
                resolve_verification_key(&resolver, &proof.verification_method)
                    .await
                    .context("cannot resolve the verification key")
            }
            None => {
                let loader = HttpDocumentLoader::new().context("failed to build HTTP loader")?;
                let resolver = WebDidResolver::new(loader);
                resolve_verification_key(&resolver, &proof.verification_method)
                    .await
                    .context("cannot resolve the verification key")
            }
        }
    })?;

    let result = credential.verify_proof(|_| Ok(key.clone()));
    if result.ok {
        println!("OK: proof by {} verifies", result.verification_method);
        Ok(0)
    } else {
        println!(
            "FAIL: {}",
            result
                .error
                .unwrap_or_else(|| "signature verification failed".to_string())
        );
        Ok(1)
    }
}
