use crate::{
    foundation::error::{RetouchError, RetouchResult},
    render::pipeline::DEFAULT_GRAIN_SEED,
};

/// When slider movement turns into history entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryPolicy {
    /// Every drag tick is its own entry.
    EveryTick,
    /// Ticks only preview; the value at release becomes one entry.
    #[default]
    OnRelease,
}

/// Whether mutations re-render synchronously or leave it to a [`crate::RenderWorker`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    #[default]
    Immediate,
    Deferred,
}

/// Options for [`crate::Engine`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Rayon worker threads for the pixel pipeline. `None` uses rayon defaults.
    pub threads: Option<usize>,
    pub history_policy: HistoryPolicy,
    pub grain_seed: u64,
    /// Largest `width * height` accepted for a loaded, resized or exported image.
    pub max_pixels: u64,
    pub render_mode: RenderMode,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            threads: None,
            history_policy: HistoryPolicy::default(),
            grain_seed: DEFAULT_GRAIN_SEED,
            max_pixels: 100_000_000,
            render_mode: RenderMode::default(),
        }
    }
}

impl EngineOpts {
    /// Defaults overlaid with `RETOUCH_*` environment variables. Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        if let Some(n) = get("RETOUCH_THREADS").and_then(|v| v.trim().parse::<usize>().ok()) {
            opts.threads = Some(n);
        }
        if let Some(n) = get("RETOUCH_MAX_PIXELS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            opts.max_pixels = n;
        }
        if let Some(n) = get("RETOUCH_GRAIN_SEED").and_then(|v| v.trim().parse::<u64>().ok()) {
            opts.grain_seed = n;
        }
        match get("RETOUCH_HISTORY_POLICY").as_deref().map(str::trim) {
            Some("every-tick") => opts.history_policy = HistoryPolicy::EveryTick,
            Some("on-release") => opts.history_policy = HistoryPolicy::OnRelease,
            _ => {}
        }
        opts
    }

    pub fn validate(&self) -> RetouchResult<()> {
        if self.threads == Some(0) {
            return Err(RetouchError::validation("'threads' must be >= 1 when set"));
        }
        if self.max_pixels == 0 {
            return Err(RetouchError::validation("'max_pixels' must be > 0"));
        }
        Ok(())
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> RetouchResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(RetouchError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RetouchError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
