use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use crate::app::SiteController;
use crate::config::CounterConfig;
use crate::dom;
use crate::error::SiteError;
use crate::observer::observe_once;

/// Integer prefix of `raw`, ignoring leading whitespace and trailing garbage
/// ("1500+" reads as 1500). Values past the `i64` range saturate.
pub fn parse_target(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let signed = if negative { format!("-{digits}") } else { digits };
    Some(signed.parse::<i64>().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterFrame {
    Running(i64),
    Done(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: i64,
    increment: f64,
    current: f64,
}

impl CounterAnimation {
    pub fn new(target: i64, config: &CounterConfig) -> Self {
        // Timings that would never finish collapse to a single frame.
        let frames = match config.duration_ms / config.frame_ms {
            frames if config.frame_ms > 0.0 && frames.is_finite() => frames.max(1.0),
            _ => 1.0,
        };
        Self {
            target,
            increment: target as f64 / frames,
            current: 0.0,
        }
    }

    pub fn step(&mut self) -> CounterFrame {
        self.current += self.increment;
        if self.current < self.target as f64 {
            CounterFrame::Running(self.current.floor() as i64)
        } else {
            CounterFrame::Done(self.target)
        }
    }
}

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let counters = dom::query_all(&site.document, ".counter");
    debug!("Observing {} counters", counters.len());

    let window = site.window.clone();
    let config = site.config.counter.clone();
    observe_once(counters, None, move |element| {
        let Some(target) = element.get_attribute("data-target").as_deref().and_then(parse_target) else {
            debug!("Counter without a numeric data-target, skipping");
            return;
        };
        run_frame(window.clone(), element.clone(), CounterAnimation::new(target, &config));
    })
}

fn run_frame(window: Window, element: Element, mut animation: CounterAnimation) {
    match animation.step() {
        CounterFrame::Running(value) => {
            element.set_text_content(Some(&value.to_string()));
            let next_window = window.clone();
            let next = Closure::once_into_js(move || run_frame(next_window, element, animation));
            if let Err(e) = window.request_animation_frame(next.unchecked_ref()) {
                warn!("Counter frame not scheduled: {:?}", e);
            }
        }
        CounterFrame::Done(value) => {
            element.set_text_content(Some(&value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_like_parse_int() {
        assert_eq!(parse_target("1500"), Some(1500));
        assert_eq!(parse_target("  250+"), Some(250));
        assert_eq!(parse_target("-12"), Some(-12));
        assert_eq!(parse_target("+7"), Some(7));
        assert_eq!(parse_target("abc"), None);
        assert_eq!(parse_target(""), None);
    }

    #[test]
    fn oversized_targets_saturate() {
        assert_eq!(parse_target("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_target("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_target("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn degenerate_timing_finishes_in_one_frame() {
        let timings = [(2000.0, 0.0), (2000.0, -16.0), (0.0, 16.0), (5.0, 16.0), (f64::INFINITY, 16.0)];
        for (duration_ms, frame_ms) in timings {
            let config = CounterConfig { duration_ms, frame_ms };
            let mut animation = CounterAnimation::new(1000, &config);
            assert_eq!(animation.step(), CounterFrame::Done(1000));
        }
    }

    #[test]
    fn reaches_exact_target_after_duration() {
        let config = CounterConfig::default();
        let mut animation = CounterAnimation::new(1000, &config);
        let mut frames = Vec::new();
        loop {
            let frame = animation.step();
            frames.push(frame);
            if let CounterFrame::Done(_) = frame {
                break;
            }
        }
        // 2000ms at 16ms per frame.
        assert_eq!(frames.len(), 125);
        assert_eq!(frames.last(), Some(&CounterFrame::Done(1000)));
        assert_eq!(frames[0], CounterFrame::Running(8));
    }

    #[test]
    fn displayed_values_never_overshoot() {
        let mut animation = CounterAnimation::new(37, &CounterConfig::default());
        let mut previous = 0;
        loop {
            match animation.step() {
                CounterFrame::Running(value) => {
                    assert!(value >= previous && value < 37);
                    previous = value;
                }
                CounterFrame::Done(value) => {
                    assert_eq!(value, 37);
                    break;
                }
            }
        }
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let mut animation = CounterAnimation::new(0, &CounterConfig::default());
        assert_eq!(animation.step(), CounterFrame::Done(0));
    }
}
