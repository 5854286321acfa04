//! Subcommand implementations. Each reads from `input` and writes to `output`
//! so tests can drive them without a terminal.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use tokenseal::{CipherId, CipherProfile, EncryptConfig, InstanceRegistry};
use tracing::info;

/// `encode`: read raw bytes, write one token line.
pub async fn encode<R: Read, W: Write>(
    registry: &InstanceRegistry<EncryptConfig>,
    group: &str,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let ctx = registry
        .get(group)
        .await
        .with_context(|| format!("failed to resolve encryption group {group:?}"))?;

    let mut plaintext = Vec::new();
    input.read_to_end(&mut plaintext).context("failed to read stdin")?;

    let token = ctx.encode(&plaintext).context("encode failed")?;
    writeln!(output, "{token}").context("failed to write token")?;
    Ok(())
}

/// `decode`: read one token (surrounding whitespace ignored), write the
/// plaintext bytes.
pub async fn decode<R: Read, W: Write>(
    registry: &InstanceRegistry<EncryptConfig>,
    group: &str,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let ctx = registry
        .get(group)
        .await
        .with_context(|| format!("failed to resolve encryption group {group:?}"))?;

    let mut token = String::new();
    input.read_to_string(&mut token).context("failed to read stdin")?;

    let plaintext = ctx.decode(token.trim())?;
    output.write_all(&plaintext).context("failed to write plaintext")?;
    Ok(())
}

/// `check`: build every configured group and report its cipher.
pub async fn check<W: Write>(
    registry: &InstanceRegistry<EncryptConfig>,
    groups: &[String],
    mut output: W,
) -> Result<()> {
    if groups.is_empty() {
        anyhow::bail!("no encryption groups are configured");
    }
    registry
        .preload(groups)
        .await
        .context("encryption configuration is invalid")?;
    for group in groups {
        let ctx = registry.get(group).await?;
        writeln!(output, "{group}: {}", ctx.cipher())?;
    }
    info!(groups = groups.len(), "all encryption groups resolved");
    Ok(())
}

/// `ciphers`: print the cipher profile table.
pub fn ciphers<W: Write>(mut output: W) -> Result<()> {
    for id in CipherId::ALL {
        let profile = CipherProfile::describe(id);
        let status = if profile.available { "available" } else { "unavailable" };
        writeln!(output, "{:<24}nonce={:<4}{status}", id.as_str(), profile.nonce_len)?;
    }
    Ok(())
}
