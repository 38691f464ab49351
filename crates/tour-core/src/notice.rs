/// Advisory message for the toast collaborator. Not an error channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn image_uploaded(name: &str) -> Self {
        Self::new(
            "Image uploaded successfully",
            format!("Added {} to your tour", name),
        )
    }

    pub fn placement_enabled() -> Self {
        Self::new(
            "Hotspot mode enabled",
            "Click anywhere in the panorama to place a hotspot",
        )
    }

    pub fn placement_cancelled() -> Self {
        Self::new("Hotspot mode disabled", "Hotspot placement cancelled")
    }

    pub fn hotspot_added() -> Self {
        Self::new(
            "Hotspot added",
            "Click the new hotspot and select a scene to link it to",
        )
    }

    pub fn hotspot_linked(target_name: &str) -> Self {
        Self::new("Hotspot linked", format!("Linked to {}", target_name))
    }
}
