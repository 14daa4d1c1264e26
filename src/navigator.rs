use rand::Rng;
use tracing::debug;

use crate::error::SurfError;
use crate::host::TabHost;
use crate::visited::SharedVisited;

/// Outcome of one selection step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Navigated(String),
    WentBack,
}

/// Pick one candidate uniformly at random.
pub fn choose<'a, R>(candidates: &'a [String], rng: &mut R) -> Option<&'a String>
where
    R: Rng + ?Sized,
{
    if candidates.is_empty() {
        return None;
    }
    let index = rng.random_range(0..candidates.len());
    candidates.get(index)
}

/// Select a link and drive the host to it; a dead end (no candidates) goes
/// one step back in history instead and leaves the visited set untouched.
/// The pick is recorded as visited before navigation is attempted, so a
/// page that dies mid-navigation is not retried.
pub async fn select_and_go<H, R>(
    host: &mut H,
    candidates: &[String],
    visited: &SharedVisited,
    rng: &mut R,
) -> Result<Step, SurfError>
where
    H: TabHost + ?Sized,
    R: Rng + ?Sized,
{
    let target = match choose(candidates, rng) {
        Some(target) => target.clone(),
        None => {
            debug!("no unvisited candidates, going back");
            host.go_back().await?;
            return Ok(Step::WentBack);
        }
    };

    visited.lock().add(&target);
    host.navigate(&target).await?;
    Ok(Step::Navigated(target))
}

/// Post-navigation check: a landing that is not fully loaded or carries no
/// links sends the walk one step back instead of chaining deeper.
pub async fn verify_landing<H>(host: &mut H) -> Result<bool, SurfError>
where
    H: TabHost + ?Sized,
{
    let settled = host.page_ready().await? && !host.page_links().await?.is_empty();
    if !settled {
        debug!("landing not settled, going back");
        host.go_back().await?;
    }
    Ok(settled)
}
