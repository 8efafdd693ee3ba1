//! Catalog of local models the client knows how to drive.
//!
//! The catalog backs the model menu and the image-mode invariant: exactly
//! one entry is vision-capable, and image analysis is pinned to it.

pub const DEFAULT_MODEL: &str = "huihui_ai/llama3.2-abliterate:latest";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelSpec {
    pub id: &'static str,
    /// Human-readable download size, shown in the model menu.
    pub size: &'static str,
    /// Whether the model accepts image input.
    pub vision: bool,
}

pub const CATALOG: &[ModelSpec] = &[
    ModelSpec {
        id: "huihui_ai/llama3.2-abliterate:latest",
        size: "2.2 GB",
        vision: false,
    },
    ModelSpec {
        id: "llava-phi3:latest",
        size: "2.9 GB",
        vision: true,
    },
    ModelSpec {
        id: "mannix/llama3.1-8b-abliterated:latest",
        size: "4.7 GB",
        vision: false,
    },
    ModelSpec {
        id: "deepseek-r1:7b",
        size: "4.7 GB",
        vision: false,
    },
    ModelSpec {
        id: "qwen2.5-coder:0.5b",
        size: "531 MB",
        vision: false,
    },
    ModelSpec {
        id: "llama3.2:latest",
        size: "2.0 GB",
        vision: false,
    },
    ModelSpec {
        id: "llama3.2:3b",
        size: "2.0 GB",
        vision: false,
    },
    ModelSpec {
        id: "llama2:latest",
        size: "3.8 GB",
        vision: false,
    },
    ModelSpec {
        id: "qwen2.5-coder:3b",
        size: "1.9 GB",
        vision: false,
    },
];

pub fn find(id: &str) -> Option<&'static ModelSpec> {
    CATALOG.iter().find(|spec| spec.id == id)
}

/// The single catalog entry that accepts image input.
pub fn vision_model() -> &'static ModelSpec {
    CATALOG
        .iter()
        .find(|spec| spec.vision)
        .expect("catalog always carries one vision model")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_vision_model() {
        let vision_count = CATALOG.iter().filter(|spec| spec.vision).count();
        assert_eq!(vision_count, 1);
        assert_eq!(vision_model().id, "llava-phi3:latest");
    }

    #[test]
    fn default_model_is_in_catalog() {
        assert!(find(DEFAULT_MODEL).is_some());
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!(find("gpt-4o").is_none());
    }
}
