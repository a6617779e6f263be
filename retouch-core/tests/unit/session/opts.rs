use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn env_overrides_defaults() {
    let opts = EngineOpts::from_lookup(lookup(&[
        ("RETOUCH_THREADS", "3"),
        ("RETOUCH_MAX_PIXELS", "4096"),
        ("RETOUCH_GRAIN_SEED", "99"),
        ("RETOUCH_HISTORY_POLICY", "every-tick"),
    ]));
    assert_eq!(opts.threads, Some(3));
    assert_eq!(opts.max_pixels, 4096);
    assert_eq!(opts.grain_seed, 99);
    assert_eq!(opts.history_policy, HistoryPolicy::EveryTick);
    opts.validate().unwrap();
}

#[test]
fn garbage_env_values_fall_back() {
    let opts = EngineOpts::from_lookup(lookup(&[
        ("RETOUCH_THREADS", "many"),
        ("RETOUCH_MAX_PIXELS", "0"),
        ("RETOUCH_HISTORY_POLICY", "sometimes"),
    ]));
    assert_eq!(opts, EngineOpts::default());
}

#[test]
fn zero_threads_is_invalid() {
    let opts = EngineOpts {
        threads: Some(0),
        ..EngineOpts::default()
    };
    assert!(opts.validate().is_err());
    assert!(build_thread_pool(Some(0)).is_err());
    assert!(build_thread_pool(Some(1)).is_ok());
}

#[test]
fn opts_deserialize_with_kebab_enums() {
    let opts: EngineOpts =
        serde_json::from_str(r#"{ "history_policy": "every-tick", "render_mode": "deferred" }"#)
            .unwrap();
    assert_eq!(opts.history_policy, HistoryPolicy::EveryTick);
    assert_eq!(opts.render_mode, RenderMode::Deferred);
    assert_eq!(opts.max_pixels, EngineOpts::default().max_pixels);
}
