use log::{debug, info};
use web_sys::{Element, ScrollBehavior, ScrollToOptions, Window};

use crate::app::SiteController;
use crate::dom;
use crate::error::SiteError;

const ACTIVE: &str = "active";

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    init_mobile_menu(site)?;
    init_smooth_scroll(site)?;
    init_active_links(site)?;
    Ok(())
}

pub fn menu_should_close(viewport_width: f64, breakpoint: f64) -> bool {
    viewport_width > breakpoint
}

/// The last section whose top, minus `offset`, has been scrolled past.
pub fn current_section<'a>(scroll_y: f64, sections: &'a [(String, f64)], offset: f64) -> Option<&'a str> {
    sections
        .iter()
        .filter(|(_, top)| scroll_y >= top - offset)
        .last()
        .map(|(id, _)| id.as_str())
}

pub fn link_targets_section(href: Option<&str>, section: Option<&str>) -> bool {
    match (href, section) {
        (Some(href), Some(id)) => href.strip_prefix('#') == Some(id),
        _ => false,
    }
}

pub fn anchor_scroll_top(target_top: f64, header_height: f64) -> f64 {
    target_top - header_height
}

pub fn smooth_scroll_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

fn close_menu(toggle: &Element, menu: &Element) {
    let _ = toggle.class_list().remove_1(ACTIVE);
    let _ = menu.class_list().remove_1(ACTIVE);
}

fn init_mobile_menu(site: &SiteController) -> Result<(), SiteError> {
    let (Some(toggle), Some(menu)) = (
        dom::query(&site.document, ".menu-toggle"),
        dom::query(&site.document, ".nav-menu"),
    ) else {
        debug!("No mobile menu on this page");
        return Ok(());
    };

    {
        let toggle_el = toggle.clone();
        let menu = menu.clone();
        dom::listen(&toggle, "click", move |_| {
            let _ = toggle_el.class_list().toggle(ACTIVE);
            let _ = menu.class_list().toggle(ACTIVE);
        })?;
    }

    for link in dom::query_all(&site.document, ".nav-link") {
        let toggle = toggle.clone();
        let menu = menu.clone();
        dom::listen(&link, "click", move |_| close_menu(&toggle, &menu))?;
    }

    let window = site.window.clone();
    let breakpoint = site.config.menu_breakpoint;
    dom::listen(&site.window, "resize", move |_| {
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0);
        if menu_should_close(width, breakpoint) {
            close_menu(&toggle, &menu);
        }
    })?;

    info!("Mobile menu ready");
    Ok(())
}

fn init_smooth_scroll(site: &SiteController) -> Result<(), SiteError> {
    let links = dom::query_all(&site.document, "a[href^=\"#\"]");
    for link in &links {
        let link_el = link.clone();
        let window = site.window.clone();
        let document = site.document.clone();
        dom::listen(link, "click", move |event| {
            event.prevent_default();
            let Some(href) = link_el.get_attribute("href") else {
                return;
            };
            // A bare "#" is not a valid selector and simply yields no target.
            let Some(target) = dom::query(&document, &href) else {
                return;
            };
            let header_height = dom::query(&document, ".header")
                .map(|header| dom::offset_height(&header))
                .unwrap_or(0.0);
            smooth_scroll_to(&window, anchor_scroll_top(dom::offset_top(&target), header_height));
        })?;
    }
    debug!("Smooth scroll bound to {} anchors", links.len());
    Ok(())
}

fn init_active_links(site: &SiteController) -> Result<(), SiteError> {
    let links = dom::query_all(&site.document, ".nav-link");
    let sections = dom::query_all(&site.document, "section[id]");
    if links.is_empty() || sections.is_empty() {
        debug!("No sections to highlight");
        return Ok(());
    }

    let window = site.window.clone();
    let offset = site.config.section_offset;
    dom::listen(&site.window, "scroll", move |_| {
        let scroll_y = window.page_y_offset().unwrap_or(0.0);
        // Offsets shift with layout, so they are read on every scroll.
        let positions: Vec<(String, f64)> = sections
            .iter()
            .map(|section| (section.id(), dom::offset_top(section)))
            .collect();
        let current = current_section(scroll_y, &positions, offset);
        for link in &links {
            let _ = link.class_list().remove_1(ACTIVE);
            if link_targets_section(link.get_attribute("href").as_deref(), current) {
                let _ = link.class_list().add_1(ACTIVE);
            }
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<(String, f64)> {
        vec![
            ("inicio".to_string(), 0.0),
            ("servicios".to_string(), 800.0),
            ("contacto".to_string(), 1600.0),
        ]
    }

    #[test]
    fn section_switches_two_hundred_pixels_early() {
        let sections = sections();
        assert_eq!(current_section(0.0, &sections, 200.0), Some("inicio"));
        assert_eq!(current_section(599.0, &sections, 200.0), Some("inicio"));
        assert_eq!(current_section(600.0, &sections, 200.0), Some("servicios"));
        assert_eq!(current_section(5000.0, &sections, 200.0), Some("contacto"));
    }

    #[test]
    fn no_section_before_the_first_one() {
        let sections = vec![("late".to_string(), 1000.0)];
        assert_eq!(current_section(10.0, &sections, 200.0), None);
    }

    #[test]
    fn link_matching() {
        assert!(link_targets_section(Some("#servicios"), Some("servicios")));
        assert!(!link_targets_section(Some("#inicio"), Some("servicios")));
        assert!(!link_targets_section(Some("#"), None));
        assert!(!link_targets_section(None, Some("servicios")));
    }

    #[test]
    fn menu_closes_only_when_wider_than_breakpoint() {
        assert!(!menu_should_close(768.0, 768.0));
        assert!(menu_should_close(769.0, 768.0));
    }

    #[test]
    fn anchor_offset_by_header() {
        assert_eq!(anchor_scroll_top(900.0, 80.0), 820.0);
    }
}
