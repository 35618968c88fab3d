use log::Level;
use serde::Deserialize;

use crate::error::SiteError;

/// Id of the optional `<script type="application/json">` block that overrides
/// any of the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scroll offset past which the scroll-to-top button shows.
    pub scroll_top_threshold: f64,
    /// Viewport width above which the mobile menu is force-closed.
    pub menu_breakpoint: f64,
    /// Distance above a section's top at which it counts as the current one.
    pub section_offset: f64,
    pub preloader_fade_ms: u32,
    pub whatsapp: WhatsAppConfig,
    pub parallax: ParallaxConfig,
    pub counter: CounterConfig,
    pub form: FormRules,
    pub messages: FormMessages,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            scroll_top_threshold: 300.0,
            menu_breakpoint: 768.0,
            section_offset: 200.0,
            preloader_fade_ms: 300,
            whatsapp: WhatsAppConfig::default(),
            parallax: ParallaxConfig::default(),
            counter: CounterConfig::default(),
            form: FormRules::default(),
            messages: FormMessages::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    pub phone: String,
    pub message: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            phone: "5491159198268".to_string(),
            message: "Hola, me interesa conocer más sobre los servicios de Fontana y Asociados."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Widths at or below this disable the effect, like a
    /// `(max-width: 1024px)` media query.
    pub breakpoint: f64,
    pub default_speed: f64,
    pub max_speed: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            breakpoint: 1024.0,
            default_speed: 0.1,
            max_speed: 0.18,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub duration_ms: f64,
    pub frame_ms: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000.0,
            frame_ms: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormRules {
    /// Ids of the contact form fields that take part in validation, in order.
    pub field_ids: Vec<String>,
    pub min_phone_digits: usize,
    /// Minimum trimmed length keyed by field id.
    pub min_lengths: Vec<MinLength>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinLength {
    pub field_id: String,
    pub chars: usize,
    pub message: String,
}

impl Default for FormRules {
    fn default() -> Self {
        Self {
            field_ids: ["nombre", "email", "telefono", "empresa", "servicio", "mensaje", "privacy"]
                .iter()
                .map(|id| id.to_string())
                .collect(),
            min_phone_digits: 8,
            min_lengths: vec![
                MinLength {
                    field_id: "mensaje".to_string(),
                    chars: 10,
                    message: "El mensaje debe tener al menos 10 caracteres.".to_string(),
                },
                MinLength {
                    field_id: "nombre".to_string(),
                    chars: 2,
                    message: "El nombre debe tener al menos 2 caracteres.".to_string(),
                },
            ],
        }
    }
}

impl FormRules {
    pub fn min_length_for(&self, field_id: &str) -> Option<&MinLength> {
        self.min_lengths.iter().find(|rule| rule.field_id == field_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormMessages {
    pub required: String,
    pub select_required: String,
    pub invalid_email: String,
    pub invalid_phone: String,
    pub fix_fields: String,
    pub sending: String,
    pub sent: String,
    pub send_failed: String,
}

impl Default for FormMessages {
    fn default() -> Self {
        Self {
            required: "Este campo es obligatorio.".to_string(),
            select_required: "Seleccioná una opción.".to_string(),
            invalid_email: "Ingresá un email válido.".to_string(),
            invalid_phone: "Ingresá un teléfono válido (mínimo 8 dígitos).".to_string(),
            fix_fields: "Por favor corregí los campos marcados.".to_string(),
            sending: "Enviando mensaje...".to_string(),
            sent: "¡Mensaje enviado correctamente! Nos contactaremos pronto.".to_string(),
            send_failed: "Ocurrió un problema al enviar el formulario. Podés contactarnos por teléfono o WhatsApp.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_keeps_defaults() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn partial_override_leaves_siblings_alone() {
        let config = SiteConfig::from_json(
            r#"{"parallax": {"max_speed": 0.3}, "whatsapp": {"phone": "123"}}"#,
        )
        .unwrap();
        assert_eq!(config.parallax.max_speed, 0.3);
        assert_eq!(config.parallax.breakpoint, 1024.0);
        assert_eq!(config.whatsapp.phone, "123");
        assert_eq!(config.whatsapp.message, WhatsAppConfig::default().message);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(SiteConfig::from_json("{"), Err(SiteError::Config(_))));
    }

    #[test]
    fn min_length_lookup() {
        let rules = FormRules::default();
        assert_eq!(rules.min_length_for("nombre").map(|r| r.chars), Some(2));
        assert_eq!(rules.min_length_for("mensaje").map(|r| r.chars), Some(10));
        assert!(rules.min_length_for("empresa").is_none());
    }
}
