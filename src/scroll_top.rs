use log::{debug, info};

use crate::app::SiteController;
use crate::dom;
use crate::error::SiteError;
use crate::nav::smooth_scroll_to;

pub fn button_display(scroll_y: f64, threshold: f64) -> &'static str {
    if scroll_y > threshold {
        "flex"
    } else {
        "none"
    }
}

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let Some(button) = dom::query(&site.document, ".scroll-top-btn") else {
        debug!("No scroll-to-top button on this page");
        return Ok(());
    };

    {
        let window = site.window.clone();
        let button = button.clone();
        let threshold = site.config.scroll_top_threshold;
        dom::listen(&site.window, "scroll", move |_| {
            let scroll_y = window.page_y_offset().unwrap_or(0.0);
            dom::set_style(&button, "display", button_display(scroll_y, threshold));
        })?;
    }

    let window = site.window.clone();
    dom::listen(&button, "click", move |_| smooth_scroll_to(&window, 0.0))?;

    info!("Scroll-to-top button ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_strictly_past_threshold() {
        assert_eq!(button_display(0.0, 300.0), "none");
        assert_eq!(button_display(300.0, 300.0), "none");
        assert_eq!(button_display(301.0, 300.0), "flex");
    }
}
