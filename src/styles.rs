use crate::app::SiteController;
use crate::error::SiteError;

/// Rules the scripted behaviors depend on but the site stylesheet may lack.
const BEHAVIOR_CSS: &str = r#"
    .nav-link.active {
        color: var(--primary-color);
    }

    .nav-link.active::after {
        width: 100%;
    }

    img.lazy {
        opacity: 0;
        transition: opacity 0.3s;
    }

    img.lazy.loaded {
        opacity: 1;
    }
"#;

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let Some(head) = site.document.head() else {
        return Ok(());
    };
    let style = site.document.create_element("style")?;
    style.set_text_content(Some(BEHAVIOR_CSS));
    head.append_child(&style)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rules_for_scripted_classes() {
        assert!(!BEHAVIOR_CSS.contains("@keyframes"));
        for selector in [".nav-link.active", ".nav-link.active::after", "img.lazy", "img.lazy.loaded"] {
            assert!(BEHAVIOR_CSS.contains(&format!("{selector} {{")), "missing {selector}");
        }
    }
}
