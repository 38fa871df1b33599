use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const SAMPLE_LOG: &str = "\
2025-04-12 10:01 UTC | 40.7N, 74.0W | Frequency: 14.5 GHz | Signal Strength: 85% | Message: Routine check, systems OK.
2025-04-12 10:02 UTC | 40.8N, 74.1W | Frequency: 14.7 GHz | Signal Strength: 60% | Message: Noise detected, possible interference.
2025-04-12 10:03 UTC | 40.9N, 74.2W | Frequency: 14.6 GHz | Signal Strength: 90% | Message: Emergency: Low battery alert.";

pub const MAX_RANDOM_LINES: usize = 50;

const MESSAGES: &[&str] = &[
    "Routine check, systems OK.",
    "Noise detected, possible interference.",
    "Emergency: Low battery alert.",
    "Signal fading, adjusting antenna.",
    "Solar flare activity reported.",
    "Telemetry nominal.",
    "Emergency: Hull temperature critical.",
    "Intermittent packet loss observed.",
];

/// Builds `count` log lines one minute apart starting at `start`.
pub fn generate_random_log<R: Rng>(rng: &mut R, start: DateTime<Utc>, count: usize) -> String {
    (0..count)
        .map(|i| {
            let timestamp = start + Duration::minutes(i as i64);
            let latitude: f64 = rng.gen_range(40.0..42.0);
            let longitude: f64 = rng.gen_range(73.0..75.0);
            let frequency: f64 = rng.gen_range(140..=150) as f64 / 10.0;
            let signal: u8 = rng.gen_range(40..=100);
            let message = MESSAGES[rng.gen_range(0..MESSAGES.len())];

            format!(
                "{} | {:.1}N, {:.1}W | Frequency: {:.1} GHz | Signal Strength: {}% | Message: {}",
                timestamp.format("%Y-%m-%d %H:%M UTC"),
                latitude,
                longitude,
                frequency,
                signal,
                message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
