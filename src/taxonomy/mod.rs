// Fixed category -> subcategory-hint map guiding classification. Prompt
// context only: the classifier accepts whatever category the model returns.
pub struct FeedbackTaxonomy {
    categories: Vec<(String, Vec<String>)>,
}

impl FeedbackTaxonomy {
    pub fn new() -> Self {
        let mut taxonomy = Self {
            categories: Vec::new(),
        };

        taxonomy.add_category("UI/UX", &["Design", "Navigation", "Accessibility", "Layout"]);
        taxonomy.add_category("Performance", &["Speed", "Lag", "Crash", "Loading"]);
        taxonomy.add_category(
            "Feature",
            &["Missing Feature", "Feature Request", "Feature Bug"],
        );
        taxonomy.add_category(
            "Authentication",
            &["Login", "Registration", "Password Reset"],
        );
        taxonomy.add_category(
            "Content",
            &["Information Accuracy", "Content Quality", "Updates"],
        );
        taxonomy.add_category("Technical", &["Bug", "Error", "Integration Issues"]);
        taxonomy.add_category("Other", &["General Feedback", "Praise", "Question"]);

        taxonomy
    }

    pub fn add_category(&mut self, name: &str, hints: &[&str]) {
        self.categories.push((
            name.to_string(),
            hints.iter().map(|h| h.to_string()).collect(),
        ));
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|(name, _)| name.as_str()).collect()
    }

    // JSON object for prompt embedding, categories in declaration order.
    pub fn to_prompt_json(&self) -> String {
        let mut out = String::from("{\n");
        for (i, (name, hints)) in self.categories.iter().enumerate() {
            let key = serde_json::to_string(name).unwrap_or_default();
            let values = serde_json::to_string(hints).unwrap_or_default();
            out.push_str(&format!("  {}: {}", key, values));
            if i + 1 < self.categories.len() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push('}');
        out
    }
}

impl Default for FeedbackTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_has_seven_ordered_categories() {
        let taxonomy = FeedbackTaxonomy::new();
        let names = taxonomy.category_names();
        assert_eq!(names.len(), 7);
        assert_eq!(names.first(), Some(&"UI/UX"));
        assert_eq!(names.last(), Some(&"Other"));
    }

    #[test]
    fn test_added_categories_append_after_defaults() {
        let mut taxonomy = FeedbackTaxonomy::new();
        taxonomy.add_category("Billing", &["Refund", "Subscription"]);

        let names = taxonomy.category_names();
        assert_eq!(names.len(), 8);
        assert_eq!(names.last(), Some(&"Billing"));
        assert!(taxonomy.to_prompt_json().contains("\"Refund\""));
    }

    #[test]
    fn test_prompt_json_keeps_order_and_hints() {
        let json = FeedbackTaxonomy::new().to_prompt_json();
        assert!(json.contains("\"UI/UX\": [\"Design\""));
        assert!(json.contains("\"Password Reset\""));
        let uiux = json.find("UI/UX").unwrap();
        let other = json.find("Other").unwrap();
        assert!(uiux < other);
    }
}
