//! Styling configuration consumed by the default modal presentation.
//!
//! Every field has a default, so a host config object only needs the values
//! it overrides:
//!
//! ```json
//! { "overlay": { "zIndex": 9999 }, "mobile": { "containerWidth": "100vw" } }
//! ```

use serde::{Deserialize, Serialize};

/// Backdrop covering the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayStyle {
    pub background: String,
    pub backdrop_filter: String,
    pub z_index: i32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            background: "rgba(0, 0, 0, 0.5)".into(),
            backdrop_filter: "blur(8px)".into(),
            z_index: 1000,
        }
    }
}

/// Dialog box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerStyle {
    pub width: String,
    pub height: String,
    pub background: String,
    pub border_radius: String,
    pub box_shadow: String,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            width: "80vw".into(),
            height: "80vh".into(),
            background: "white".into(),
            border_radius: "16px".into(),
            box_shadow: "0px 20px 40px rgba(0, 0, 0, 0.3)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderStyle {
    pub border_bottom: String,
    pub padding: String,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            border_bottom: "1px solid #e5e7eb".into(),
            padding: "20px".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleStyle {
    pub font_size: String,
    pub font_weight: String,
    pub color: String,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            font_size: "1.25rem".into(),
            font_weight: "600".into(),
            color: "#1c1f2a".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloseButtonStyle {
    pub font_size: String,
    pub color: String,
    pub hover_background: String,
}

impl Default for CloseButtonStyle {
    fn default() -> Self {
        Self {
            font_size: "1.5rem".into(),
            color: "#6b7280".into(),
            hover_background: "#f3f4f6".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentStyle {
    pub padding: String,
}

impl Default for ContentStyle {
    fn default() -> Self {
        Self {
            padding: "20px".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameStyle {
    pub border_radius: String,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            border_radius: "8px".into(),
        }
    }
}

/// Container size below the mobile breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MobileStyle {
    pub max_width: String,
    pub container_width: String,
    pub container_height: String,
}

impl Default for MobileStyle {
    fn default() -> Self {
        Self {
            max_width: "768px".into(),
            container_width: "95vw".into(),
            container_height: "90vh".into(),
        }
    }
}

/// Complete styling configuration of the modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalStyles {
    pub overlay: OverlayStyle,
    pub container: ContainerStyle,
    pub header: HeaderStyle,
    pub title: TitleStyle,
    pub close_button: CloseButtonStyle,
    pub content: ContentStyle,
    pub iframe: FrameStyle,
    pub mobile: MobileStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let styles: ModalStyles = serde_json::from_str(
            r#"{ "overlay": { "zIndex": 9999 }, "closeButton": { "color": "red" } }"#,
        )
        .unwrap();

        assert_eq!(styles.overlay.z_index, 9999);
        assert_eq!(styles.overlay.background, "rgba(0, 0, 0, 0.5)");
        assert_eq!(styles.close_button.color, "red");
        assert_eq!(styles.container, ContainerStyle::default());
    }
}
