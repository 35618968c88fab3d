use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use crate::app::SiteController;
use crate::config::ParallaxConfig;
use crate::dom;
use crate::error::SiteError;

const NEUTRAL_TRANSFORM: &str = "none";

/// Leading decimal number of `raw`, ignoring leading whitespace and trailing
/// garbage ("0.15px" reads as 0.15, ".5" as 0.5).
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_from = |mut at: usize| {
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        at
    };

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    trimmed[..end].parse::<f64>().ok()
}

/// Per-element factor from `data-parallax`, falling back to the default when
/// missing, unparsable or zero, and capped at the configured maximum.
pub fn speed_for(raw: Option<&str>, config: &ParallaxConfig) -> f64 {
    let speed = raw
        .and_then(parse_float_prefix)
        .filter(|speed| speed.is_finite() && *speed != 0.0)
        .unwrap_or(config.default_speed);
    speed.min(config.max_speed)
}

pub fn is_narrow(viewport_width: f64, config: &ParallaxConfig) -> bool {
    viewport_width <= config.breakpoint
}

pub fn transform_for(scroll_y: f64, speed: f64) -> String {
    format!("translate3d(0, {}px, 0)", scroll_y * speed)
}

/// The transform a `data-parallax` element gets at a given viewport width and
/// scroll position.
pub fn parallax_transform(
    viewport_width: f64,
    scroll_y: f64,
    raw_speed: Option<&str>,
    config: &ParallaxConfig,
) -> String {
    if is_narrow(viewport_width, config) {
        NEUTRAL_TRANSFORM.to_string()
    } else {
        transform_for(scroll_y, speed_for(raw_speed, config))
    }
}

#[derive(Debug, Default)]
struct ParallaxState {
    narrow: bool,
    pending_frame: Option<i32>,
}

struct Parallax {
    window: Window,
    elements: Vec<Element>,
    config: ParallaxConfig,
    state: RefCell<ParallaxState>,
}

impl Parallax {
    fn cancel_pending(&self) {
        if let Some(id) = self.state.borrow_mut().pending_frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn refresh_viewport(&self) {
        let narrow = is_narrow(self.viewport_width(), &self.config);
        self.state.borrow_mut().narrow = narrow;
        if narrow {
            for element in &self.elements {
                dom::set_style(element, "--parallax-offset", "0px");
                dom::set_style(element, "transform", NEUTRAL_TRANSFORM);
            }
            self.cancel_pending();
        }
    }

    fn schedule(self: &Rc<Self>) {
        if self.state.borrow().narrow {
            return;
        }
        let scroll_y = self.window.page_y_offset().unwrap_or(0.0);
        let width = self.viewport_width();
        self.cancel_pending();

        let this = Rc::clone(self);
        let frame = Closure::once_into_js(move || {
            this.state.borrow_mut().pending_frame = None;
            for element in &this.elements {
                let raw_speed = element.get_attribute("data-parallax");
                let transform = parallax_transform(width, scroll_y, raw_speed.as_deref(), &this.config);
                dom::set_style(element, "transform", &transform);
            }
        });
        match self.window.request_animation_frame(frame.unchecked_ref()) {
            Ok(id) => self.state.borrow_mut().pending_frame = Some(id),
            Err(e) => debug!("Parallax frame not scheduled: {:?}", e),
        }
    }
}

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let elements = dom::query_all(&site.document, "[data-parallax]");
    if elements.is_empty() {
        debug!("No parallax elements on this page");
        return Ok(());
    }

    let parallax = Rc::new(Parallax {
        window: site.window.clone(),
        elements,
        config: site.config.parallax.clone(),
        state: RefCell::new(ParallaxState::default()),
    });

    parallax.refresh_viewport();

    {
        let parallax = Rc::clone(&parallax);
        dom::listen_passive(&site.window, "resize", move |_| {
            parallax.refresh_viewport();
            parallax.schedule();
        })?;
    }
    {
        let parallax = Rc::clone(&parallax);
        dom::listen_passive(&site.window, "scroll", move |_| parallax.schedule())?;
    }

    parallax.schedule();
    info!("Parallax bound to {} elements", parallax.elements.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identity_at_or_below_breakpoint() {
        let config = ParallaxConfig::default();
        assert_eq!(parallax_transform(375.0, 900.0, Some("0.15"), &config), "none");
        assert_eq!(parallax_transform(1024.0, 900.0, Some("0.15"), &config), "none");
    }

    #[test]
    fn linear_in_scroll_above_breakpoint() {
        let config = ParallaxConfig::default();
        assert_eq!(parallax_transform(1280.0, 0.0, Some("0.1"), &config), "translate3d(0, 0px, 0)");
        assert_eq!(parallax_transform(1280.0, 100.0, Some("0.1"), &config), "translate3d(0, 10px, 0)");
        assert_eq!(parallax_transform(1280.0, 200.0, Some("0.1"), &config), "translate3d(0, 20px, 0)");
    }

    #[test]
    fn speed_is_clamped_and_defaulted() {
        let config = ParallaxConfig::default();
        assert_eq!(speed_for(Some("0.5"), &config), 0.18);
        assert_eq!(speed_for(Some("0.05"), &config), 0.05);
        assert_eq!(speed_for(Some("fast"), &config), 0.1);
        assert_eq!(speed_for(Some("0"), &config), 0.1);
        assert_eq!(speed_for(None, &config), 0.1);
    }

    #[test]
    fn speed_reads_leading_number_like_parse_float() {
        let config = ParallaxConfig::default();
        assert_eq!(speed_for(Some("0.15px"), &config), 0.15);
        assert_eq!(speed_for(Some(" .15 "), &config), 0.15);
        assert_eq!(speed_for(Some("1.2e-1x"), &config), 0.12);
        assert_eq!(speed_for(Some("px0.15"), &config), 0.1);
    }

    #[test]
    fn float_prefix_edges() {
        assert_eq!(parse_float_prefix("-0.05"), Some(-0.05));
        assert_eq!(parse_float_prefix("+2."), Some(2.0));
        assert_eq!(parse_float_prefix("3e"), Some(3.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix(""), None);
    }
}
