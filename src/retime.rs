use crate::error::RetimeError;
use crate::srt::Cue;

use std::time::Duration;

use anyhow::Result;

/// Rescales and clamps every cue in order. `speed` is the playback-rate
/// multiplier (timestamps are divided by it), `endtime` the cutoff in
/// seconds past which no cue may start or end.
pub fn retime(cues: Vec<Cue>, speed: f64, endtime: f64) -> Result<Vec<Cue>> {
    if speed == 0.0 {
        return Err(RetimeError::ZeroSpeed.into());
    }
    if !speed.is_finite() || speed < 0.0 {
        return Err(invalid("SPEED", speed));
    }
    if !endtime.is_finite() || endtime < 0.0 {
        return Err(invalid("ENDTIME", endtime));
    }

    // No cue may remain on screen longer than this after rescaling. An
    // extreme speed can push this, or any rescaled timestamp, past what
    // Duration can hold; that surfaces as an argument error, not a panic.
    let max_duration =
        Duration::try_from_secs_f64(10.0 / speed).map_err(|_| invalid("SPEED", speed))?;
    let endtime = Duration::try_from_secs_f64(endtime).map_err(|_| invalid("ENDTIME", endtime))?;

    cues.iter()
        .map(|cue| retime_cue(cue, speed, max_duration, endtime))
        .collect()
}

/// Applies the per-cue steps: rescale, cap the duration, then clamp start
/// and end against the cutoff. The two clamps are checked independently,
/// in that order, and the result is not re-ordered afterwards.
fn retime_cue(cue: &Cue, speed: f64, max_duration: Duration, endtime: Duration) -> Result<Cue> {
    let mut start = rescale(cue.start, speed)?;
    let mut end = rescale(cue.end, speed)?;

    if end.saturating_sub(start) > max_duration {
        end = start + max_duration;
    }
    if start > endtime {
        start = endtime;
    }
    if end > endtime {
        end = endtime;
    }

    Ok(Cue {
        index: cue.index,
        start,
        end,
        text: cue.text.clone(),
    })
}

/// Division via seconds-as-f64, exactly like `Duration::div_f64`, except
/// that overflow becomes an error instead of a panic.
fn rescale(timestamp: Duration, speed: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(timestamp.as_secs_f64() / speed)
        .map_err(|_| invalid("SPEED", speed))
}

fn invalid(arg: &'static str, value: f64) -> anyhow::Error {
    RetimeError::InvalidNumber {
        arg,
        value: value.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(index: usize, start_ms: u64, end_ms: u64) -> Cue {
        Cue {
            index,
            start: Duration::from_millis(start_ms),
            end: Duration::from_millis(end_ms),
            text: vec![format!("line {}", index)],
        }
    }

    #[test]
    fn test_scales_timestamps() {
        let cues = retime(vec![cue(1, 2000, 4000)], 2.0, 100.0).unwrap();

        assert_eq!(cues[0].start, Duration::from_millis(1000));
        assert_eq!(cues[0].end, Duration::from_millis(2000));
    }

    #[test]
    fn test_caps_duration() {
        // 10s..25s at speed 2 becomes 5s..12.5s, which is longer than the
        // 5s cap, so the end is pulled back to 10s.
        let cues = retime(vec![cue(1, 10_000, 25_000)], 2.0, 100.0).unwrap();

        assert_eq!(cues[0].start, Duration::from_secs(5));
        assert_eq!(cues[0].end, Duration::from_secs(10));
    }

    #[test]
    fn test_clamps_end_to_cutoff() {
        let cues = retime(vec![cue(1, 0, 5000)], 1.0, 3.0).unwrap();

        assert_eq!(cues[0].start, Duration::from_secs(0));
        assert_eq!(cues[0].end, Duration::from_secs(3));
    }

    #[test]
    fn test_clamps_start_to_cutoff() {
        let cues = retime(vec![cue(1, 8000, 9000)], 1.0, 3.0).unwrap();

        assert_eq!(cues[0].start, Duration::from_secs(3));
        assert_eq!(cues[0].end, Duration::from_secs(3));
    }

    #[test]
    fn test_cap_applies_before_cutoff() {
        // The cutoff clamp uses the already-capped end.
        let cues = retime(vec![cue(1, 0, 30_000)], 1.0, 20.0).unwrap();

        assert_eq!(cues[0].end, Duration::from_secs(10));
    }

    #[test]
    fn test_keeps_order_and_passthrough_fields() {
        let input = vec![cue(9, 5000, 6000), cue(4, 1000, 2000)];

        let cues = retime(input.clone(), 1.0, 1000.0).unwrap();

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].index, 9);
        assert_eq!(cues[0].text, input[0].text);
        assert_eq!(cues[1].index, 4);
        assert_eq!(cues[1].text, input[1].text);
    }

    #[test]
    fn test_noop_at_unit_speed() {
        let input = vec![cue(1, 1000, 4000), cue(2, 5000, 9000)];

        let once = retime(input.clone(), 1.0, 1000.0).unwrap();
        let twice = retime(once.clone(), 1.0, 1000.0).unwrap();

        assert_eq!(once, input);
        assert_eq!(twice, input);
    }

    #[test]
    fn test_zero_speed_is_an_error() {
        let err = retime(vec![cue(1, 0, 1000)], 0.0, 100.0).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RetimeError>(),
            Some(RetimeError::ZeroSpeed)
        ));
    }

    #[test]
    fn test_negative_speed_is_an_error() {
        let err = retime(vec![cue(1, 0, 1000)], -2.0, 100.0).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RetimeError>(),
            Some(RetimeError::InvalidNumber { arg: "SPEED", .. })
        ));
    }

    #[test]
    fn test_tiny_speed_is_an_error() {
        // 10/1e-19 seconds does not fit in a Duration.
        let err = retime(vec![cue(1, 0, 1000)], 1e-19, 100.0).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RetimeError>(),
            Some(RetimeError::InvalidNumber { arg: "SPEED", .. })
        ));
    }

    #[test]
    fn test_overflowing_rescale_is_an_error() {
        // 10/speed still fits in a Duration, but the rescaled start of a
        // 100-hour timestamp does not.
        let err = retime(vec![cue(1, 360_000_000, 360_001_000)], 1e-14, 100.0).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RetimeError>(),
            Some(RetimeError::InvalidNumber { arg: "SPEED", .. })
        ));
    }

    #[test]
    fn test_huge_cutoff_is_an_error() {
        let err = retime(vec![cue(1, 0, 1000)], 1.0, 1e20).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RetimeError>(),
            Some(RetimeError::InvalidNumber { arg: "ENDTIME", .. })
        ));
    }

    #[test]
    fn test_negative_cutoff_is_an_error() {
        let err = retime(vec![cue(1, 0, 1000)], 1.0, -1.0).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RetimeError>(),
            Some(RetimeError::InvalidNumber { arg: "ENDTIME", .. })
        ));
    }
}
