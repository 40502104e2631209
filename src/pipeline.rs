//! Deployment pipeline — the linear sequence of external steps.
//!
//! Strictly sequential: clean, lock, push, fetch, build image, generate
//! keys, render the participant list, build the deployment, run it. The
//! first failing step aborts the run; nothing is retried and no state is
//! persisted between runs.

use std::future::Future;
use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result, bail};

use crate::autonomy::Autonomy;
use crate::config::DeployConfig;
use crate::keys;
use crate::output::{OutputContext, progress};
use crate::participants::{ALL_PARTICIPANTS_ENV, AddressList};

/// Run the full deployment pipeline with `workdir` as the project root.
///
/// The fetched service lands in `workdir/<alias>`; image building, key
/// generation, and deployment steps run inside that directory. The
/// rendered participant literal is passed to `deploy build` and
/// `deploy run` as the `ALL_PARTICIPANTS` environment variable of those
/// child processes only — the convoy process environment is not mutated.
///
/// # Errors
///
/// Returns an error on the first failed external step, or if the keys
/// file written by key generation is missing or malformed.
pub async fn deploy(
    cfg: &DeployConfig,
    autonomy: &impl Autonomy,
    ctx: &OutputContext,
    workdir: &Path,
) -> Result<()> {
    clean_alias_dir(workdir, &cfg.alias, ctx)?;

    step(
        ctx,
        "Locking packages",
        "autonomy packages lock",
        autonomy.packages_lock(workdir),
    )
    .await?;
    step(
        ctx,
        "Pushing packages",
        "autonomy push-all",
        autonomy.push_all(workdir),
    )
    .await?;
    step(
        ctx,
        &format!("Fetching {}", cfg.service),
        "autonomy fetch",
        autonomy.fetch(workdir, &cfg.service, &cfg.alias),
    )
    .await?;

    let service_dir = workdir.join(&cfg.alias);
    step(
        ctx,
        "Building image",
        "autonomy build-image",
        autonomy.build_image(&service_dir),
    )
    .await?;
    step(
        ctx,
        &format!("Generating {} {} keys", cfg.participants, cfg.ledger),
        "autonomy generate-key",
        autonomy.generate_keys(&service_dir, &cfg.ledger, cfg.participants),
    )
    .await?;

    let keys_path = service_dir.join(&cfg.keys_file);
    let records = keys::load_keys(&keys_path)?;
    let addresses = AddressList::from_keys(&records);
    if addresses.is_empty() {
        ctx.warn("keys file contained no records");
    }
    let literal = addresses.render();
    ctx.kv("Participants:", &literal);

    let envs = [(ALL_PARTICIPANTS_ENV, literal.as_str())];
    step(
        ctx,
        "Building deployment",
        "autonomy deploy build",
        autonomy.deploy_build(&service_dir, &cfg.keys_file, &envs),
    )
    .await?;

    if cfg.run_deployment {
        ctx.info("Starting deployment (Ctrl-C to stop)");
        let status = autonomy
            .deploy_run(&service_dir, &cfg.build_dir, &envs)
            .await?;
        if !status.success() {
            bail!("autonomy deploy run exited with {status}");
        }
    }

    ctx.success("Deployment complete");
    Ok(())
}

/// Remove a stale service directory from a previous run, if present.
fn clean_alias_dir(workdir: &Path, alias: &str, ctx: &OutputContext) -> Result<()> {
    let dir = workdir.join(alias);
    if dir.exists() {
        std::fs::remove_dir_all(&dir)
            .with_context(|| format!("removing stale service directory {}", dir.display()))?;
        ctx.info(&format!("Removed stale {alias}/"));
    }
    Ok(())
}

/// Await one external step, showing a spinner on a TTY, and turn a
/// non-zero exit into an error carrying the command name and its stderr.
async fn step<F>(ctx: &OutputContext, msg: &str, cmd: &str, fut: F) -> Result<()>
where
    F: Future<Output = Result<Output>>,
{
    let pb = if ctx.show_progress() {
        Some(progress::spinner(msg))
    } else {
        None
    };
    match fut.await {
        Ok(output) if output.status.success() => {
            if let Some(pb) = pb {
                progress::finish_ok(&pb, msg);
            } else {
                ctx.success(msg);
            }
            Ok(())
        }
        Ok(output) => {
            if let Some(pb) = pb {
                progress::finish_error(&pb, msg);
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            if detail.is_empty() {
                bail!("{cmd} failed with {}", output.status);
            }
            bail!("{cmd} failed with {}:\n{detail}", output.status);
        }
        Err(e) => {
            if let Some(pb) = pb {
                progress::finish_error(&pb, msg);
            }
            Err(e.context(format!("{cmd} failed")))
        }
    }
}
